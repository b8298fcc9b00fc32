use crate::commands::stash::StashCoordinator;
use crate::core::{
    classify_outcome, logger::LogStatus, print_error, print_info, print_section_header,
    print_success, print_warning, CommandOutcome, OutcomeKind, Result, Session,
};
use colored::*;

/// Where [`RebaseCoordinator::update_base_branch`] stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUpdate {
    Updated,
    CheckoutFailed,
    /// Left on the base branch in the middle of a merge
    MergeConflict,
}

pub struct RebaseCoordinator<'s, 'a> {
    session: &'s Session<'a>,
}

impl<'s, 'a> RebaseCoordinator<'s, 'a> {
    pub fn new(session: &'s Session<'a>) -> Self {
        Self { session }
    }

    /// Rebases the current branch onto a freshly fetched base, wrapping the
    /// work in a stash when the user asks for it.
    pub fn handle_rebase(&self) -> Result<()> {
        let base = self.session.base_branch();
        let feature = self.session.feature_branch();

        print_info(&format!("REBASE: bringing {} into {}", base.blue(), feature.yellow()));

        let stash = StashCoordinator::new(self.session);
        let mut stashed = false;
        if self.session.has_local_changes()
            && self.session.confirm("Save your local changes before the rebase?")?
        {
            stashed = stash.save_changes_locally()?;
        }

        let rebased = self.fetch_and_rebase();

        // the stash comes back whatever happened to the rebase
        if stashed {
            stash.restore_local_changes()?;
        }
        rebased
    }

    fn fetch_and_rebase(&self) -> Result<()> {
        let base = self.session.base_branch();

        print_info(&format!("Updating {base} from the remote..."));
        let fetch = self
            .session
            .git_tolerant(&format!("git fetch origin {base}:{base}"));
        if !fetch.success() {
            print_warning(&format!(
                "Could not fast-forward {base}; rebasing onto the local copy."
            ));
        }

        print_info("Rebasing...");
        let rebase = self.session.git_tolerant(&format!("git rebase {base}"));
        self.report_rebase(&rebase);
        self.log_rebase(&rebase);
        Ok(())
    }

    /// Checks out the feature branch, fetches, and rebases it onto the base
    /// branch.
    pub fn get_latest_changes(&self) -> Result<()> {
        let base = self.session.base_branch();
        let feature = self.session.feature_branch();

        print_section_header("Rebase");
        print_info(&format!(
            "Repo: {}",
            self.session.config.repo_path.display().to_string().magenta()
        ));
        print_info(&format!("Feature branch: {}", feature.yellow()));
        print_info(&format!("Bringing in: {}", base.blue()));

        let checkout = self.session.git_tolerant(&format!("git checkout {feature}"));
        if !checkout.success() {
            print_error(&format!("Could not switch to branch {feature}"));
            return Ok(());
        }

        self.session.git("git fetch origin")?;

        let base_exists = self
            .session
            .git_tolerant(&format!("git rev-parse --verify {base}"))
            .success();
        if !base_exists {
            print_warning(&format!("Downloading base branch '{base}' from the remote..."));
        }

        let fetch = self
            .session
            .git_tolerant(&format!("git fetch origin {base}:{base}"));
        if !fetch.success() {
            if !base_exists {
                print_error(&format!("Could not get branch '{base}'"));
                return Ok(());
            }
            print_warning(&format!(
                "Local {base} could not be fast-forwarded; rebasing onto the local copy."
            ));
        }

        let rebase = self.session.git_tolerant(&format!("git rebase {base}"));
        self.report_rebase(&rebase);
        self.log_rebase(&rebase);
        Ok(())
    }

    fn log_rebase(&self, rebase: &CommandOutcome) {
        let status = if rebase.success() {
            LogStatus::Success
        } else {
            LogStatus::Error
        };
        self.session.logger.log_rebase_operation(
            self.session.base_branch(),
            self.session.feature_branch(),
            status,
        );
    }

    fn report_rebase(&self, rebase: &CommandOutcome) {
        let base = self.session.base_branch();

        match classify_outcome(rebase) {
            OutcomeKind::Success => {
                print_success(&format!("Rebase complete: changes from {} applied", base.blue()));
            }
            OutcomeKind::Conflict => {
                print_error("There are conflicts during the rebase.");
                print_info("Resolve them and run:");
                print_info("  git add <resolved files>");
                print_info("  git rebase --continue");
                print_info("Or use the 'Cancel rebase' menu option.");
            }
            _ => print_error(&format!("The rebase failed: {}", rebase.stderr)),
        }
    }

    /// `git rebase --abort`, tolerated when no rebase is in progress
    pub fn cancel_rebase(&self) -> Result<()> {
        self.session.require_passphrase()?;

        let abort = self.session.git_tolerant("git rebase --abort");
        if abort.success() {
            print_success("Rebase cancelled.");
            self.session
                .logger
                .log_operation("REBASE_CANCEL", "Rebase cancelled", LogStatus::Success);
        } else {
            print_warning("There is no rebase in progress to cancel.");
        }
        Ok(())
    }

    /// Brings the local base branch level with its remote and returns to the
    /// branch the user was on.
    pub fn update_base_branch(&self) -> Result<BaseUpdate> {
        self.session.require_passphrase()?;

        let base = self.session.base_branch();
        let current = self.session.git("git branch --show-current")?.stdout;

        print_section_header("Update base branch");
        print_info(&format!(
            "Repo: {}",
            self.session.config.repo_path.display().to_string().magenta()
        ));
        print_info(&format!("Current branch: {}", current.yellow()));
        print_info(&format!("Updating: {}", base.blue()));

        let stash = StashCoordinator::new(self.session);
        let mut stashed = false;
        if self.session.has_local_changes() {
            print_warning("There are uncommitted local changes.");
            if self
                .session
                .confirm("Save the changes before updating the base?")?
            {
                stashed = stash.save_changes_locally()?;
            }
        }

        let result = self.refresh_base()?;
        if result == BaseUpdate::MergeConflict {
            if stashed {
                print_info("Your changes are still in the stash.");
            }
            return Ok(result);
        }

        let mut back_on_original = true;
        if result == BaseUpdate::Updated && current != base && !current.is_empty() {
            let checkout_back = self.session.git_tolerant(&format!("git checkout {current}"));
            if checkout_back.success() {
                print_success(&format!("Back on: {}", current.yellow()));
            } else {
                print_error(&format!("Could not return to {current}"));
                back_on_original = false;
            }
        }

        if stashed && back_on_original && self.session.confirm("Restore the saved changes?")? {
            stash.restore_local_changes()?;
        }

        if result == BaseUpdate::Updated {
            self.session.logger.log_operation(
                "UPDATE_BASE_BRANCH",
                &format!("Base branch {base} updated"),
                LogStatus::Success,
            );
            if current == self.session.feature_branch() {
                print_info("Tip: consider a rebase to bring the new changes into your branch.");
            }
        }
        Ok(result)
    }

    fn refresh_base(&self) -> Result<BaseUpdate> {
        let base = self.session.base_branch();

        let base_exists = self
            .session
            .git_tolerant(&format!("git rev-parse --verify {base}"))
            .success();
        if !base_exists {
            print_warning(&format!("Downloading base branch '{base}' from the remote..."));
            self.session
                .git(&format!("git fetch origin {base}:{base}"))?;
        }

        print_info(&format!("Switching to {base}..."));
        let checkout = self.session.git_tolerant(&format!("git checkout {base}"));
        if !checkout.success() {
            print_error(&format!("Could not switch to branch {base}"));
            self.session.logger.log_operation(
                "UPDATE_BASE_BRANCH",
                &format!("Could not check out {base}: {}", checkout.stderr),
                LogStatus::Error,
            );
            return Ok(BaseUpdate::CheckoutFailed);
        }

        print_info("Updating remote references...");
        self.session.git("git fetch origin")?;

        let ahead = self.session.count_commits(&format!("origin/{base}..HEAD"));
        if ahead > 0 {
            print_warning(&format!("Branch {base} has {ahead} local commit(s)."));
            if self.session.confirm(&format!(
                "Hard reset to origin/{base}? Local commits will be lost"
            ))? {
                self.session
                    .git(&format!("git reset --hard origin/{base}"))?;
                print_success(&format!("Branch {base} reset to the remote version."));
            } else {
                let merge = self.session.git_tolerant(&format!("git merge origin/{base}"));
                if !merge.success() {
                    print_error("The merge failed. Resolve the conflicts by hand.");
                    print_info("When done, commit the merge or run: git merge --abort");
                    self.session.logger.log_operation(
                        "UPDATE_BASE_BRANCH",
                        &format!("Merge of origin/{base} into {base} failed"),
                        LogStatus::Error,
                    );
                    return Ok(BaseUpdate::MergeConflict);
                }
                print_success(&format!("Merged into {base}."));
            }
        } else {
            self.session
                .git(&format!("git reset --hard origin/{base}"))?;
            print_success(&format!("Branch {base} updated."));
        }

        let last = self.session.git_tolerant("git log -1 --oneline");
        if !last.stdout.is_empty() {
            print_info(&format!("Last commit: {}", last.stdout));
        }
        Ok(BaseUpdate::Updated)
    }
}
