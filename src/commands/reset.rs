use crate::core::{
    logger::LogStatus, print_info, print_section_header, print_success, print_warning,
    shell_quote, Result, Session,
};
use chrono::Local;
use colored::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    Cancelled,
    /// The feature branch now matches the base branch
    Completed { backup_branch: Option<String> },
}

/// Name of the backup branch taken before a reset
pub fn backup_branch_name(feature_branch: &str, timestamp: &str) -> String {
    format!("{feature_branch}_backup_{timestamp}")
}

pub struct ResetCoordinator<'s, 'a> {
    session: &'s Session<'a>,
}

impl<'s, 'a> ResetCoordinator<'s, 'a> {
    pub fn new(session: &'s Session<'a>) -> Self {
        Self { session }
    }

    /// Turns the feature branch into an exact copy of the base branch,
    /// optionally keeping the current state on a timestamped backup branch.
    pub fn reset_to_base_with_backup(&self) -> Result<ResetOutcome> {
        self.session.require_passphrase()?;

        let base = self.session.base_branch();
        let feature = self.session.feature_branch();
        let current = self.session.git("git branch --show-current")?.stdout;

        print_section_header("Full reset to base branch");
        print_info(&format!(
            "Repo: {}",
            self.session.config.repo_path.display().to_string().magenta()
        ));
        print_info(&format!("Current branch: {}", current.yellow()));
        print_info(&format!("Reset to: {}", base.blue()));

        let has_changes = !self.session.git("git status --porcelain")?.stdout.is_empty();
        if has_changes {
            print_info("Changes detected:");
            self.session.git("git status --short")?;
        }

        if !self.session.confirm(&format!(
            "WARNING: this discards ALL your current changes and makes '{feature}' an exact copy of '{base}'. Continue?"
        ))? {
            print_info("Operation cancelled.");
            return Ok(ResetOutcome::Cancelled);
        }

        let backup_branch = if self.session.confirm("Create a backup of the current changes?")? {
            Some(self.create_backup_branch(has_changes)?)
        } else {
            None
        };

        self.reset_to_base()?;

        print_success("Reset complete.");
        print_success(&format!("Current branch: {}", feature.yellow()));
        if let Some(backup) = &backup_branch {
            print_success(&format!("Backup kept in: {}", backup.green()));
            print_info(&format!("To recover it: git checkout {backup}"));
        }

        self.session.logger.log_operation(
            "RESET_TO_BASE",
            &format!(
                "Reset to {base}, backup: {}",
                backup_branch.as_deref().unwrap_or("N/A")
            ),
            LogStatus::Success,
        );

        print_info("Final state:");
        self.session.git("git status")?;

        Ok(ResetOutcome::Completed { backup_branch })
    }

    /// Moves the current state onto a new branch and commits it there, so the
    /// backup does not depend on any stash entry.
    fn create_backup_branch(&self, has_changes: bool) -> Result<String> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let backup = backup_branch_name(self.session.feature_branch(), &timestamp);

        if has_changes {
            print_info("Saving uncommitted changes...");
            self.session.git(&format!(
                "git stash push --include-untracked -m {}",
                shell_quote(&format!("Backup before reset - {timestamp}"))
            ))?;
        }

        print_info(&format!("Creating backup branch: {backup}"));
        self.session.git(&format!("git checkout -b {backup}"))?;

        if has_changes {
            print_info("Applying the saved changes...");
            self.session.git("git stash pop")?;
            self.session.git("git add .")?;
            self.session.git(&format!(
                "git commit -m {}",
                shell_quote(&format!("Backup of changes before reset - {timestamp}"))
            ))?;
        }

        print_warning(&format!("Backup '{backup}' exists only locally."));
        self.session.logger.log_branch_operation(
            "backup",
            &backup,
            "Created before reset",
            LogStatus::Success,
        );
        Ok(backup)
    }

    fn reset_to_base(&self) -> Result<()> {
        let base = self.session.base_branch();
        let feature = self.session.feature_branch();

        if !self.session.local_branch_exists(base) {
            print_warning(&format!("Downloading base branch '{base}'..."));
            self.session
                .git(&format!("git fetch origin {base}:{base}"))?;
        }

        print_info(&format!("Updating {base}..."));
        self.session.git(&format!("git checkout -f {base}"))?;
        self.session.git("git fetch origin")?;
        self.session
            .git(&format!("git reset --hard origin/{base}"))?;

        print_info(&format!("Resetting {feature}..."));
        if self.session.local_branch_exists(feature) {
            print_info("Discarding ALL local changes...");
            self.session.git("git clean -fd")?;
            self.session.git("git reset --hard HEAD")?;
            self.session.git_tolerant("git stash clear");

            let checkout = self.session.git_tolerant(&format!("git checkout -f {feature}"));
            if checkout.success() {
                self.session.git(&format!("git reset --hard {base}"))?;
            } else {
                print_warning("Recreating the feature branch from scratch...");
                self.session
                    .git_tolerant(&format!("git branch -D {feature}"));
                self.session.git(&format!("git checkout -b {feature}"))?;
            }
        } else {
            self.session.git(&format!("git checkout -b {feature}"))?;
        }

        print_info("Final cleanup...");
        self.session.git("git clean -fd")?;
        Ok(())
    }
}
