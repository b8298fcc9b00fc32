use crate::core::{
    logger::LogStatus, print_error, print_info, print_success, print_warning, shell_quote,
    Result, Session,
};
use chrono::Local;

/// Saves and restores working-tree changes as a named stash entry. Every
/// other coordinator goes through this type instead of issuing stash
/// commands itself.
pub struct StashCoordinator<'s, 'a> {
    session: &'s Session<'a>,
}

impl<'s, 'a> StashCoordinator<'s, 'a> {
    pub fn new(session: &'s Session<'a>) -> Self {
        Self { session }
    }

    /// Stashes local changes, untracked files included. Returns whether a
    /// stash entry was created.
    pub fn save_changes_locally(&self) -> Result<bool> {
        if !self.session.has_local_changes() {
            print_warning("No local changes to save.");
            return Ok(false);
        }

        print_info("Changes that will be saved:");
        self.session.git("git status --short")?;

        let mut message = self.session.ask("Stash message:")?;
        if message.is_empty() {
            message = format!("Auto-stash {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        }
        self.session.logger.log_user_input("stash_message", &message);

        self.session.git(&format!(
            "git stash push --include-untracked -m {}",
            shell_quote(&message)
        ))?;

        print_success("Changes saved locally with stash.");
        self.session
            .logger
            .log_stash_operation("save", &message, LogStatus::Success);
        Ok(true)
    }

    /// Shows the latest stash and pops it once the user confirms. Returns
    /// whether the pop succeeded.
    pub fn restore_local_changes(&self) -> Result<bool> {
        let list = self.session.git_tolerant("git stash list");
        if list.stdout.is_empty() {
            print_warning("No stash to apply.");
            return Ok(false);
        }

        print_info("Latest stash:");
        self.session.git("git stash show -p stash@{0}")?;

        if !self.session.confirm("Apply this stash?")? {
            return Ok(false);
        }

        let pop = self.session.git_tolerant("git stash pop");
        if pop.success() {
            print_success("Local changes restored.");
            self.session
                .logger
                .log_stash_operation("pop", "", LogStatus::Success);
            Ok(true)
        } else {
            print_error("Could not apply the stash. There may be conflicts to resolve by hand.");
            self.session
                .logger
                .log_stash_operation("pop", "", LogStatus::Error);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::ScriptedPrompter;
    use crate::core::{LogRecord, OperationLogger, TaskflowError};
    use crate::test_utils::{sample_config, sample_settings, RecordingRunner};
    use tempfile::TempDir;

    fn stash_records(logger: &OperationLogger) -> Vec<LogRecord> {
        logger
            .read_today_log()
            .unwrap()
            .unwrap_or_default()
            .lines()
            .filter_map(LogRecord::parse)
            .filter(|r| r.operation == "STASH")
            .collect()
    }

    #[test]
    fn test_save_on_clean_tree_is_a_no_op() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::default();
        let runner = RecordingRunner::new();
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        assert!(!StashCoordinator::new(&session).save_changes_locally().unwrap());
        assert!(!runner.ran("git stash"));
        assert!(stash_records(&logger).is_empty());
    }

    #[test]
    fn test_save_uses_default_message_when_blank() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([""]);
        let runner = RecordingRunner::new().respond("git status --porcelain", 0, "?? notes.txt", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        assert!(StashCoordinator::new(&session).save_changes_locally().unwrap());

        let push = runner
            .commands()
            .into_iter()
            .find(|c| c.starts_with("git stash push"))
            .unwrap();
        assert!(push.contains("--include-untracked"));
        assert!(push.contains("Auto-stash "));

        let records = stash_records(&logger);
        assert_eq!(records.len(), 1);
        assert!(records[0].details.starts_with("Operation: save | Message: Auto-stash "));
    }

    #[test]
    fn test_restore_requires_confirmation() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new(["n"]);
        let runner = RecordingRunner::new().respond("git stash list", 0, "stash@{0}: On feature/login: wip", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        assert!(!StashCoordinator::new(&session).restore_local_changes().unwrap());
        assert!(!runner.ran("git stash pop"));
    }

    #[test]
    fn test_restore_pop_conflict_is_logged_as_error() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new(["y"]);
        let runner = RecordingRunner::new()
            .respond("git stash list", 0, "stash@{0}: On feature/login: wip", "")
            .respond("git stash pop", 1, "CONFLICT (content): Merge conflict in a.txt", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        assert!(!StashCoordinator::new(&session).restore_local_changes().unwrap());
        let records = stash_records(&logger);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, LogStatus::Error);
    }

    #[test]
    fn test_interrupt_while_asking_message_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::default();
        let runner = RecordingRunner::new().respond("git status --porcelain", 0, " M a.txt", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        let result = StashCoordinator::new(&session).save_changes_locally();
        assert!(matches!(result, Err(TaskflowError::Interrupted)));
        assert!(!runner.ran("git stash push"));
    }
}
