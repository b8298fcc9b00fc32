//! The fixed six-step release procedure for the `develop`/`main` setup.
//!
//! 1. Update `develop`
//! 2. Create or reuse `feature/version-<version with dashes>`
//! 3. Commit pending changes
//! 4. Merge the version branch back into `develop`
//! 5. Push `develop`
//! 6. Optionally delete the version branch
//!
//! Any step that fails stops the procedure; nothing already done is undone.

use crate::core::{
    classify_outcome, is_affirmative, logger::LogStatus, print_error, print_info,
    print_section_header, print_success, print_warning, shell_quote, OutcomeKind, Result,
    Session,
};
use colored::*;
use semver::Version;

pub const RELEASE_FEATURE_BRANCH: &str = "develop";
pub const RELEASE_BASE_BRANCH: &str = "main";

/// What a completed release did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    pub version: Version,
    pub branch_name: String,
    pub commit_message: String,
    pub committed: bool,
    pub deleted_local: bool,
    pub deleted_remote: bool,
}

/// `1.2.0` becomes `feature/version-1-2-0`
pub fn version_branch_name(version: &Version) -> String {
    format!("feature/version-{}", version.to_string().replace('.', "-"))
}

pub struct ReleaseWorkflowCoordinator<'s, 'a> {
    session: &'s Session<'a>,
}

impl<'s, 'a> ReleaseWorkflowCoordinator<'s, 'a> {
    pub fn new(session: &'s Session<'a>) -> Self {
        Self { session }
    }

    /// Only the configuration with feature `develop`, base `main` and the
    /// identity from `GIT_CONFIG_ID` may run the release.
    pub fn is_release_configuration(&self) -> bool {
        let config_id = self.session.settings.config_id.as_deref();
        self.session.feature_branch() == RELEASE_FEATURE_BRANCH
            && self.session.base_branch() == RELEASE_BASE_BRANCH
            && config_id.is_some_and(|id| id == self.session.config.id)
    }

    /// Returns `None` when the release was refused, cancelled or stopped at
    /// a failing step.
    pub fn feature_branch_workflow(&self) -> Result<Option<ReleaseSummary>> {
        self.session.require_passphrase()?;

        print_section_header("Release workflow");

        if !self.is_release_configuration() {
            print_error(&format!(
                "This workflow only runs for '{RELEASE_FEATURE_BRANCH}' on base '{RELEASE_BASE_BRANCH}' with the release configuration id."
            ));
            self.session.logger.log_operation(
                "RELEASE_WORKFLOW",
                "Refused: configuration is not the release configuration",
                LogStatus::Warning,
            );
            return Ok(None);
        }

        if !self
            .session
            .confirm("This is for one specific task only. Are you sure?")?
        {
            print_info("Operation cancelled.");
            return Ok(None);
        }

        let version_text = self.session.ask("Version (e.g. 1.4.0):")?;
        let version = match Version::parse(&version_text) {
            Ok(version) => version,
            Err(e) => {
                print_error(&format!("'{version_text}' is not a valid version: {e}"));
                self.session
                    .logger
                    .log_warning(&format!("Invalid version '{version_text}'"), "release_workflow");
                return Ok(None);
            }
        };

        let message = self.session.ask("Commit message:")?;
        if message.is_empty() {
            print_error("A commit message is required.");
            return Ok(None);
        }

        let branch_name = version_branch_name(&version);
        let logger = self.session.logger;
        logger.log_user_input("version", &version.to_string());
        logger.log_user_input("commit_message", &message);
        logger.log_user_input("feature_name", &branch_name);

        print_info(&format!("Starting release: {}", branch_name.yellow()));

        let Some(committed) = self.run_steps(&branch_name, &message)? else {
            logger.log_operation(
                "RELEASE_WORKFLOW",
                &format!("Stopped before completing {branch_name}"),
                LogStatus::Error,
            );
            return Ok(None);
        };

        let (deleted_local, deleted_remote) = self.cleanup(&branch_name)?;

        print_success("Release workflow completed.");
        print_info(&format!("  Version branch: {}", branch_name.yellow()));
        print_info(&format!("  Commit message: {}", message.cyan()));
        print_info(&format!("  Merged into: {}", RELEASE_FEATURE_BRANCH.blue()));
        print_info(&format!("  Pushed to: {}", format!("origin/{RELEASE_FEATURE_BRANCH}").green()));

        print_info("Final state:");
        self.session.git("git status")?;

        logger.log_operation(
            "RELEASE_WORKFLOW",
            &format!("Completed: {branch_name} → {RELEASE_FEATURE_BRANCH}"),
            LogStatus::Success,
        );

        Ok(Some(ReleaseSummary {
            version,
            branch_name,
            commit_message: message,
            committed,
            deleted_local,
            deleted_remote,
        }))
    }

    /// Steps 1-5. `None` when a step stopped the workflow, otherwise whether
    /// a commit was made.
    fn run_steps(&self, branch_name: &str, message: &str) -> Result<Option<bool>> {
        let develop = RELEASE_FEATURE_BRANCH;

        print_info(&format!("STEP 1: updating {develop}..."));
        if !self.session.git_tolerant(&format!("git checkout {develop}")).success() {
            print_error(&format!("Could not switch to {develop}"));
            return Ok(None);
        }
        let pull = self.session.git_tolerant(&format!("git pull origin {develop}"));
        if !classify_outcome(&pull).is_benign() {
            print_error(&format!("Could not update {develop}"));
            return Ok(None);
        }

        print_info(&format!("STEP 2: creating branch {}...", branch_name.yellow()));
        let exists = self
            .session
            .git_tolerant(&format!("git rev-parse --verify {branch_name}"))
            .success();
        if exists {
            print_warning(&format!("Branch {branch_name} already exists; reusing it."));
            self.session.git(&format!("git checkout {branch_name}"))?;
        } else if !self
            .session
            .git_tolerant(&format!("git checkout -b {branch_name}"))
            .success()
        {
            print_error(&format!("Could not create branch {branch_name}"));
            return Ok(None);
        }

        print_info("STEP 3: committing changes...");
        let Some(committed) = self.commit_step(message)? else {
            return Ok(None);
        };

        print_info(&format!("STEP 4: back to {develop} and merging..."));
        if !self.session.git_tolerant(&format!("git checkout {develop}")).success() {
            print_error(&format!("Could not switch to {develop}"));
            return Ok(None);
        }
        let pull = self.session.git_tolerant(&format!("git pull origin {develop}"));
        if !classify_outcome(&pull).is_benign() {
            print_warning(&format!("{develop} could not be updated; merging anyway."));
        }
        let merge = self.session.git_tolerant(&format!("git merge {branch_name}"));
        match classify_outcome(&merge) {
            OutcomeKind::Success => print_success("Merge complete."),
            OutcomeKind::AlreadyUpToDate => print_info("Already up to date."),
            _ => {
                print_error(&format!("Could not merge {branch_name}"));
                return Ok(None);
            }
        }

        print_info(&format!("STEP 5: pushing {develop}..."));
        let push = self.session.git_tolerant(&format!("git push origin {develop}"));
        match classify_outcome(&push) {
            OutcomeKind::Success => print_success(&format!("Changes pushed to {develop}.")),
            OutcomeKind::EverythingUpToDate => print_info("Everything is up to date."),
            _ => {
                print_error(&format!("Could not push {develop}"));
                print_info(&format!("Try: git push origin {develop}"));
                return Ok(None);
            }
        }

        Ok(Some(committed))
    }

    fn commit_step(&self, message: &str) -> Result<Option<bool>> {
        if !self.session.has_local_changes() {
            print_warning("No changes to commit.");
            if !self.session.confirm("Continue without changes?")? {
                return Ok(None);
            }
            return Ok(Some(false));
        }

        print_info("Changes detected:");
        self.session.git("git status --short")?;

        if !self.session.git_tolerant("git add .").success() {
            print_error("Could not stage the changes.");
            return Ok(None);
        }

        let commit = self
            .session
            .git_tolerant(&format!("git commit -m {}", shell_quote(message)));
        match classify_outcome(&commit) {
            OutcomeKind::Success => {
                print_success("Commit created.");
                Ok(Some(true))
            }
            OutcomeKind::NothingToCommit => {
                print_warning("No new changes to commit.");
                Ok(Some(false))
            }
            _ => {
                print_error("The commit failed.");
                Ok(None)
            }
        }
    }

    /// Step 6. Returns which copies of the version branch were deleted.
    fn cleanup(&self, branch_name: &str) -> Result<(bool, bool)> {
        print_info("STEP 6: optional cleanup...");

        let answer = self.session.ask("Delete the local version branch? [y/N]:")?;
        self.session.logger.log_user_input("delete_local_branch", &answer);
        if !is_affirmative(&answer) {
            return Ok((false, false));
        }

        let mut deleted_local = self
            .session
            .git_tolerant(&format!("git branch -d {branch_name}"))
            .success();
        if !deleted_local {
            deleted_local = self
                .session
                .git_tolerant(&format!("git branch -D {branch_name}"))
                .success();
        }
        if deleted_local {
            print_success(&format!("Local branch {branch_name} deleted."));
            self.session
                .logger
                .log_branch_operation("delete", branch_name, "Release cleanup", LogStatus::Success);
        }

        let answer = self.session.ask("Delete it from the remote too? [y/N]:")?;
        self.session.logger.log_user_input("delete_remote_branch", &answer);
        let mut deleted_remote = false;
        if is_affirmative(&answer) {
            deleted_remote = self
                .session
                .git_tolerant(&format!("git push origin --delete {branch_name}"))
                .success();
            if deleted_remote {
                print_success(&format!("Remote branch {branch_name} deleted."));
            }
        }

        Ok((deleted_local, deleted_remote))
    }
}
