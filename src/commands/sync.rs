//! Pulling remote changes and publishing local ones.

use crate::commands::stash::StashCoordinator;
use crate::core::{
    classify_outcome, logger::LogStatus, print_error, print_info, print_success, print_warning,
    shell_quote, CommandOutcome, OutcomeKind, Result, Session,
};
use colored::*;

/// How many pending commits are previewed for a branch without upstream
const PREVIEW_LIMIT: usize = 5;

pub struct SyncCoordinator<'s, 'a> {
    session: &'s Session<'a>,
}

impl<'s, 'a> SyncCoordinator<'s, 'a> {
    pub fn new(session: &'s Session<'a>) -> Self {
        Self { session }
    }

    /// `git pull --rebase` of the current branch, publishing it first when
    /// the remote does not know it yet.
    pub fn pull_current_branch(&self) -> Result<()> {
        self.session.require_passphrase()?;

        let current = self.session.git("git branch --show-current")?.stdout;
        print_info(&format!("Current branch: {}", current.yellow()));

        if current == self.session.base_branch() {
            print_error(&format!("You are on the base branch '{current}'."));
            print_info("Use the rebase option to bring base changes into your feature branch.");
            return Ok(());
        }

        if !self.session.remote_branch_exists(&current) {
            print_warning(&format!("Branch {current} does not exist on the remote."));
            print_info("Publishing it...");
            self.session
                .git(&format!("git push --set-upstream origin {current}"))?;
            print_success(&format!("Branch {current} published."));
            self.session.logger.log_branch_operation(
                "publish",
                &current,
                "Published with upstream tracking",
                LogStatus::Success,
            );
            return Ok(());
        }

        if !self.session.git("git status --porcelain")?.stdout.is_empty() {
            print_warning("There are uncommitted local changes.");
            if self.session.confirm("Stash the changes before pulling?")? {
                let stash = StashCoordinator::new(self.session);
                let stashed = stash.save_changes_locally()?;
                let pulled = self.pull_with_rebase(&current);
                if stashed {
                    stash.restore_local_changes()?;
                }
                return pulled;
            }
        }

        self.pull_with_rebase(&current)
    }

    fn pull_with_rebase(&self, branch: &str) -> Result<()> {
        let pull = self
            .session
            .git_tolerant(&format!("git pull --rebase origin {branch}"));

        match classify_outcome(&pull) {
            OutcomeKind::Success => {
                print_success(&format!("Pull complete: changes downloaded into {}", branch.yellow()));
                self.session
                    .logger
                    .log_pull_operation(branch, LogStatus::Success);
            }
            OutcomeKind::Conflict => {
                print_error("There are conflicts after the pull.");
                print_info("Resolve them and run: git rebase --continue");
                self.session.logger.log_pull_operation(branch, LogStatus::Error);
            }
            _ => {
                print_error(&format!("The pull failed: {}", pull.stderr));
                self.session.logger.log_pull_operation(branch, LogStatus::Error);
            }
        }
        Ok(())
    }

    /// Plain `git pull origin <base>`; any outcome is accepted
    pub fn pull_base_branch(&self) -> Result<()> {
        self.session.require_passphrase()?;

        let base = self.session.base_branch();
        print_info(&format!("Pulling {} directly...", base.blue()));

        let pull = self.session.git_tolerant(&format!("git pull origin {base}"));
        if pull.success() {
            print_success(&format!("Pull complete: changes from {} downloaded", base.blue()));
            self.session.logger.log_pull_operation(base, LogStatus::Success);
        } else {
            let message = if pull.stderr.is_empty() {
                &pull.stdout
            } else {
                &pull.stderr
            };
            print_warning(&format!("Pull finished with warnings: {message}"));
            self.session.logger.log_pull_operation(base, LogStatus::Warning);
        }
        Ok(())
    }

    /// Commits pending changes when there are any, then pushes everything
    /// the remote does not have yet.
    pub fn upload_changes(&self) -> Result<()> {
        self.session.require_passphrase()?;

        let branch = self.session.git("git branch --show-current")?.stdout;
        let dirty = !self.session.git("git status --porcelain")?.stdout.is_empty();

        let upstream = self
            .session
            .git_tolerant(&format!("git config branch.{branch}.remote"));
        let has_upstream = upstream.success() && !upstream.stdout.is_empty();

        let mut pending = self.count_pending_commits(&branch, has_upstream);

        if !dirty && pending == 0 {
            print_warning("Nothing to upload. Everything is in sync.");
            self.session
                .logger
                .log_warning("Nothing to upload", "upload_changes");
            return Ok(());
        }

        if dirty {
            if !self.commit_changes()? {
                return Ok(());
            }
            pending += 1;
        }

        self.push_changes(&branch, has_upstream, pending)
    }

    fn count_pending_commits(&self, branch: &str, has_upstream: bool) -> usize {
        if has_upstream {
            self.session.count_commits(&format!("origin/{branch}..HEAD"))
        } else {
            self.session.count_commits("HEAD")
        }
    }

    fn commit_changes(&self) -> Result<bool> {
        print_info("Uncommitted changes detected:");
        self.session.git("git status --short")?;

        let message = self.session.ask("Commit message:")?;
        if message.is_empty() {
            print_warning("No commit message given.");
            self.session
                .logger
                .log_warning("No commit message given", "upload_changes");
            return Ok(false);
        }
        self.session.logger.log_user_input("commit_message", &message);

        self.session.git("git add .")?;
        self.session
            .git(&format!("git commit -m {}", shell_quote(&message)))?;
        print_success("Commit created.");
        Ok(true)
    }

    fn push_changes(&self, branch: &str, has_upstream: bool, pending: usize) -> Result<()> {
        print_info(&format!("Uploading {pending} commit(s) on '{branch}'"));
        self.show_pending_commits(branch, has_upstream, pending);

        if has_upstream {
            if !self.check_sync_before_push(branch)? {
                return Ok(());
            }
        } else {
            self.setup_upstream(branch)?;
        }

        let push = self.session.git_tolerant("git push");
        self.report_push(branch, &push);
        Ok(())
    }

    fn show_pending_commits(&self, branch: &str, has_upstream: bool, pending: usize) {
        let command = if has_upstream {
            format!("git log origin/{branch}..HEAD --oneline")
        } else {
            format!("git log --oneline -n {}", pending.min(PREVIEW_LIMIT))
        };

        let commits = self.session.git_tolerant(&command);
        if commits.success() && !commits.stdout.is_empty() {
            print_info("Pending commits:");
            println!("{}", commits.stdout);
        }
    }

    fn setup_upstream(&self, branch: &str) -> Result<()> {
        print_info(&format!("Setting up upstream for '{branch}'..."));
        self.session.git("git fetch origin")?;

        if self.session.remote_branch_exists(branch) {
            print_info("The branch exists on the remote. Binding to it...");
            self.session
                .git(&format!("git branch --set-upstream-to=origin/{branch} {branch}"))?;
        } else {
            print_info("Creating the branch on the remote...");
            self.session
                .git(&format!("git push --set-upstream origin {branch}"))?;
        }
        Ok(())
    }

    /// Pulls first when the remote moved ahead. Returns false when a
    /// conflict stopped the upload.
    fn check_sync_before_push(&self, branch: &str) -> Result<bool> {
        print_info(&format!("Checking that '{branch}' is in sync..."));
        self.session.git("git fetch origin")?;

        let behind = self.session.count_commits(&format!("HEAD..origin/{branch}"));
        if behind == 0 {
            return Ok(true);
        }

        print_warning(&format!("Your branch is {behind} commit(s) behind the remote."));
        if self.session.confirm("Pull first?")? {
            let pull = self.session.git_tolerant("git pull");
            if classify_outcome(&pull) == OutcomeKind::Conflict {
                print_error("There are conflicts. Resolve them by hand.");
                self.session
                    .logger
                    .log_error("Conflicts during pull", "upload_changes");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn report_push(&self, branch: &str, push: &CommandOutcome) {
        let logger = self.session.logger;

        match classify_outcome(push) {
            OutcomeKind::Success => {
                print_success("Changes uploaded.");
                let last = self.session.git_tolerant("git log -1 --oneline");
                let summary = if last.stdout.is_empty() {
                    "Unknown".to_string()
                } else {
                    last.stdout
                };
                logger.log_push_operation(branch, &summary, LogStatus::Success);
                print_info(&format!("Branch: {branch}"));
                print_info(&format!("Last commit: {summary}"));
            }
            OutcomeKind::Rejected => {
                print_error("Push rejected. You need to pull first.");
                print_info(&format!("Try: git pull --rebase origin {branch}"));
                logger.log_push_operation(branch, "Push rejected", LogStatus::Warning);
            }
            OutcomeKind::EverythingUpToDate => print_info("Everything is up to date."),
            _ => {
                print_error(&format!("The push failed: {}", push.stderr));
                logger.log_error(&push.stderr, "upload_changes");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::prompt::ScriptedPrompter;
    use crate::core::{LogRecord, OperationLogger};
    use crate::test_utils::{sample_config, sample_settings, RecordingRunner, TEST_PASSPHRASE};
    use tempfile::TempDir;

    fn records(logger: &OperationLogger) -> Vec<LogRecord> {
        logger
            .read_today_log()
            .unwrap()
            .unwrap_or_default()
            .lines()
            .filter_map(LogRecord::parse)
            .collect()
    }

    #[test]
    fn test_pull_refused_on_base_branch() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([TEST_PASSPHRASE]);
        let runner = RecordingRunner::new().respond("git branch --show-current", 0, "main", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        SyncCoordinator::new(&session).pull_current_branch().unwrap();
        assert!(!runner.ran("git pull"));
    }

    #[test]
    fn test_pull_publishes_unknown_branch() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([TEST_PASSPHRASE]);
        let runner = RecordingRunner::new().respond("git branch --show-current", 0, "feature/login", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        SyncCoordinator::new(&session).pull_current_branch().unwrap();
        assert!(runner.ran("git push --set-upstream origin feature/login"));
        assert!(!runner.ran("git pull"));
    }

    #[test]
    fn test_pull_conflict_is_reported_not_resolved() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([TEST_PASSPHRASE]);
        let runner = RecordingRunner::new()
            .respond("git branch --show-current", 0, "feature/login", "")
            .respond("git ls-remote", 0, "abc\trefs/heads/feature/login", "")
            .respond("git pull --rebase", 1, "CONFLICT (content): Merge conflict in a.txt", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        SyncCoordinator::new(&session).pull_current_branch().unwrap();
        assert!(!runner.ran("git rebase"));

        let pull = records(&logger).into_iter().find(|r| r.operation == "PULL").unwrap();
        assert_eq!(pull.status, LogStatus::Error);
    }

    #[test]
    fn test_pull_base_branch_accepts_failure() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([TEST_PASSPHRASE]);
        let runner = RecordingRunner::new().respond("git pull origin main", 1, "", "fatal: refusing");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        assert!(SyncCoordinator::new(&session).pull_base_branch().is_ok());
        let pull = records(&logger).into_iter().find(|r| r.operation == "PULL").unwrap();
        assert_eq!(pull.status, LogStatus::Warning);
    }

    #[test]
    fn test_upload_with_nothing_to_do() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([TEST_PASSPHRASE]);
        let runner = RecordingRunner::new()
            .respond("git branch --show-current", 0, "feature/login", "")
            .respond("git config branch.feature/login.remote", 0, "origin", "")
            .respond("git rev-list --count", 0, "0", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        SyncCoordinator::new(&session).upload_changes().unwrap();

        assert!(!runner.ran("git add"));
        assert!(!runner.ran("git commit"));
        assert!(!runner.ran("git push"));
        let warnings = records(&logger)
            .into_iter()
            .filter(|r| r.status == LogStatus::Warning)
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_upload_blank_commit_message_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([TEST_PASSPHRASE, ""]);
        let runner = RecordingRunner::new()
            .respond("git branch --show-current", 0, "feature/login", "")
            .respond("git status --porcelain", 0, " M a.txt", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        SyncCoordinator::new(&session).upload_changes().unwrap();
        assert!(!runner.ran("git add"));
        assert!(!runner.ran("git push"));
    }

    #[test]
    fn test_upload_new_branch_sets_upstream() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([TEST_PASSPHRASE, "Add login form"]);
        let runner = RecordingRunner::new()
            .respond("git branch --show-current", 0, "feature/login", "")
            .respond("git status --porcelain", 0, " M a.txt", "")
            .respond("git config branch.", 1, "", "")
            .respond("git rev-list --count HEAD", 0, "4", "")
            .respond("git log -1 --oneline", 0, "abc1234 Add login form", "");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        SyncCoordinator::new(&session).upload_changes().unwrap();

        let commands = runner.commands();
        let commit = commands
            .iter()
            .position(|c| c == "git commit -m 'Add login form'")
            .unwrap();
        let upstream = commands
            .iter()
            .position(|c| c == "git push --set-upstream origin feature/login")
            .unwrap();
        assert!(commit < upstream);
        assert!(commands.iter().any(|c| c == "git push"));

        let push = records(&logger).into_iter().find(|r| r.operation == "PUSH").unwrap();
        assert_eq!(push.status, LogStatus::Success);
        assert!(push.details.contains("abc1234 Add login form"));
    }

    #[test]
    fn test_rejected_push_is_a_warning() {
        let temp_dir = TempDir::new().unwrap();
        let logger = OperationLogger::new(temp_dir.path().join("logs")).unwrap();
        let settings = sample_settings();
        let config = sample_config(temp_dir.path());
        let prompter = ScriptedPrompter::new([TEST_PASSPHRASE]);
        let runner = RecordingRunner::new()
            .respond("git branch --show-current", 0, "feature/login", "")
            .respond("git config branch.", 0, "origin", "")
            .respond("git rev-list --count origin/feature/login..HEAD", 0, "2", "")
            .respond("git rev-list --count HEAD..origin", 0, "0", "")
            .respond("git push", 1, "", " ! [rejected] feature/login -> feature/login (fetch first)");
        let session = Session::new(&config, &settings, &runner, &logger, &prompter).unwrap();

        SyncCoordinator::new(&session).upload_changes().unwrap();

        let push = records(&logger).into_iter().find(|r| r.operation == "PUSH").unwrap();
        assert_eq!(push.status, LogStatus::Warning);
        assert!(push.details.contains("Push rejected"));
    }
}
