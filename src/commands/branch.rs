use crate::commands::stash::StashCoordinator;
use crate::core::{
    is_plain_branch_name, is_protected, logger::LogStatus, print_error, print_info, print_rule,
    print_section_header, print_success, print_warning, shell_quote, Result, Session,
    TaskflowError,
};
use colored::*;

/// Outcome of the checkout-recovery sub-menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    CheckedOut,
    Stayed,
}

pub struct BranchCoordinator<'s, 'a> {
    session: &'s Session<'a>,
}

impl<'s, 'a> BranchCoordinator<'s, 'a> {
    pub fn new(session: &'s Session<'a>) -> Self {
        Self { session }
    }

    /// Best-effort move to the feature branch at session start. Failures
    /// are reported and the session continues on the current branch.
    pub fn auto_checkout_to_feature_branch(&self) -> Result<()> {
        if let Err(e) = self.try_auto_checkout() {
            if let TaskflowError::Interrupted = e {
                print_info(&format!("Staying on: {}", self.session.current_branch().cyan()));
                return Ok(());
            }
            print_warning(&format!("Could not verify the branch: {e}"));
            print_info("The program will continue normally.");
            self.session
                .logger
                .log_warning(&e.to_string(), "auto_checkout_to_feature_branch");
        }
        Ok(())
    }

    fn try_auto_checkout(&self) -> Result<()> {
        let feature = self.session.feature_branch();
        let current = self.session.current_branch();

        if current == feature {
            print_success(&format!("Already on the feature branch: {}", feature.yellow()));
            return Ok(());
        }

        if self.session.local_branch_exists(feature) {
            self.checkout_existing_branch(&current)
        } else if self.session.remote_branch_exists(feature) {
            self.checkout_remote_branch(&current);
            Ok(())
        } else {
            self.show_new_task_info(&current);
            Ok(())
        }
    }

    fn checkout_existing_branch(&self, current: &str) -> Result<()> {
        let feature = self.session.feature_branch();
        let logger = self.session.logger;

        print_info(&format!("Switching to the feature branch: {}", feature.yellow()));
        let checkout = self.session.git_tolerant(&format!("git checkout {feature}"));

        if checkout.success() {
            print_success(&format!("Now on branch: {}", feature.yellow()));
            logger.log_operation(
                "AUTO_CHECKOUT",
                &format!("Switched automatically to {feature}"),
                LogStatus::Success,
            );
            return Ok(());
        }

        if self.session.has_local_changes() {
            if self.recover_blocked_checkout(current)? == Recovery::Stayed {
                logger.log_operation(
                    "AUTO_CHECKOUT",
                    &format!("Stayed on {current} with uncommitted changes"),
                    LogStatus::Info,
                );
            }
            return Ok(());
        }

        print_warning(&format!("Could not switch to branch {feature}"));
        print_error(&checkout.stderr);
        print_info(&format!("Staying on: {}", current.cyan()));
        logger.log_operation(
            "AUTO_CHECKOUT",
            &format!("Could not switch to {feature}: {}", checkout.stderr),
            LogStatus::Error,
        );
        Ok(())
    }

    /// Sub-menu offered when uncommitted changes block the checkout
    fn recover_blocked_checkout(&self, current: &str) -> Result<Recovery> {
        print_warning("Uncommitted changes are blocking the checkout:");
        self.session.git("git status --short")?;

        print_info("Available options:");
        print_info("  1. Stash the changes and switch branch");
        print_info("  2. Stay on the current branch and continue");
        print_info("  3. Show the changes before deciding");

        loop {
            let choice = match self.session.ask("Select an option (1-3):") {
                Ok(choice) => choice,
                Err(TaskflowError::Interrupted) => {
                    print_info(&format!("Staying on: {}", current.cyan()));
                    return Ok(Recovery::Stayed);
                }
                Err(e) => return Err(e),
            };

            match choice.as_str() {
                "1" => {
                    if self.stash_and_checkout()? {
                        return Ok(Recovery::CheckedOut);
                    }
                    print_info(&format!("Staying on: {}", current.cyan()));
                    return Ok(Recovery::Stayed);
                }
                "2" => {
                    print_info(&format!("Staying on: {}", current.cyan()));
                    return Ok(Recovery::Stayed);
                }
                "3" => {
                    print_info("Changed files:");
                    self.session.git_tolerant("git diff --name-status");
                    print_info("Summary:");
                    self.session.git_tolerant("git diff --stat");
                }
                _ => print_warning("Invalid option. Choose 1, 2 or 3."),
            }
        }
    }

    fn stash_and_checkout(&self) -> Result<bool> {
        let feature = self.session.feature_branch();
        let stash = StashCoordinator::new(self.session);

        print_info("Saving changes temporarily...");
        stash.save_changes_locally()?;

        print_info(&format!("Switching to {}...", feature.yellow()));
        let checkout = self.session.git_tolerant(&format!("git checkout {feature}"));

        if checkout.success() {
            print_success(&format!("Now on: {}", feature.yellow()));
            print_info("Your changes are kept in the stash. Use the menu option to restore them.");
            self.session.logger.log_operation(
                "AUTO_CHECKOUT_WITH_STASH",
                &format!("Switched to {feature} after stashing"),
                LogStatus::Success,
            );
            return Ok(true);
        }

        print_error("Could not switch branch even after stashing.");
        print_info("Restoring changes...");
        stash.restore_local_changes()?;
        Ok(false)
    }

    fn checkout_remote_branch(&self, current: &str) {
        let feature = self.session.feature_branch();

        print_info(&format!(
            "Branch {} exists on the remote. Downloading...",
            feature.yellow()
        ));
        self.session.git_tolerant("git fetch origin");

        let checkout = self
            .session
            .git_tolerant(&format!("git checkout -b {feature} origin/{feature}"));
        if checkout.success() {
            print_success(&format!("Branch downloaded, now on: {}", feature.yellow()));
            self.session.logger.log_operation(
                "AUTO_CHECKOUT_REMOTE",
                &format!("Downloaded and switched to {feature} from the remote"),
                LogStatus::Success,
            );
            return;
        }

        let track = self
            .session
            .git_tolerant(&format!("git checkout --track origin/{feature}"));
        if track.success() {
            print_success(&format!("Tracking branch: {}", feature.yellow()));
            self.session.logger.log_operation(
                "AUTO_CHECKOUT_REMOTE",
                &format!("Tracking {feature} from the remote"),
                LogStatus::Success,
            );
        } else {
            print_warning("Could not download the remote branch.");
            print_info(&format!("Staying on: {}", current.cyan()));
            self.session.logger.log_operation(
                "AUTO_CHECKOUT_REMOTE",
                &format!("Could not check out {feature} from the remote"),
                LogStatus::Warning,
            );
        }
    }

    fn show_new_task_info(&self, current: &str) {
        let feature = self.session.feature_branch();

        print_rule(60);
        print_warning("NEW TASK DETECTED");
        print_info(&format!("  Branch {} does not exist yet.", feature.yellow()));
        print_info(&format!("  You are currently on: {}", current.cyan()));
        print_info("  Use the 'Create feature branch' menu option when you are ready.");
        print_rule(60);

        self.session.logger.log_operation(
            "NEW_TASK_DETECTED",
            &format!("New task detected: {feature} does not exist"),
            LogStatus::Info,
        );
    }

    /// `git branch`, with the current branch marked by git itself
    pub fn show_branches(&self) -> Result<()> {
        print_section_header("Local branches");
        self.session.git("git branch")?;
        Ok(())
    }

    /// Creates the feature branch from HEAD and checks it out. Returns
    /// whether a branch was created.
    pub fn create_branch_feature(&self) -> Result<bool> {
        self.session.require_passphrase()?;

        let feature = self.session.feature_branch();
        let logger = self.session.logger;

        let local = self
            .session
            .git_tolerant(&format!("git rev-parse --verify --quiet {feature}"));
        if local.success() {
            print_warning(&format!("Branch '{feature}' already exists locally."));
            logger.log_warning(
                &format!("Branch {feature} already exists locally"),
                "create_branch_feature",
            );
            return Ok(false);
        }

        if self.session.remote_branch_exists(feature) {
            print_warning(&format!("Branch '{feature}' already exists on the remote."));
            print_info("Use git checkout to switch to it.");
            logger.log_warning(
                &format!("Branch {feature} already exists on the remote"),
                "create_branch_feature",
            );
            return Ok(false);
        }

        print_info(&format!("Creating new branch: {feature}"));
        let create = self.session.git_tolerant(&format!("git checkout -b {feature}"));

        if create.success() {
            print_success(&format!("Branch '{feature}' created."));
            logger.log_branch_operation("create", feature, "", LogStatus::Success);
            Ok(true)
        } else {
            print_error(&format!("Could not create the branch: {}", create.stderr));
            logger.log_branch_operation("create", feature, &create.stderr, LogStatus::Error);
            Ok(false)
        }
    }

    /// Deletes a local branch chosen from a numbered list or typed by hand.
    /// Remote branches are never touched.
    pub fn delete_branch(&self) -> Result<()> {
        self.session.require_passphrase()?;

        let listing = self.session.git_tolerant("git branch");
        if !listing.success() {
            print_error("Could not list the local branches.");
            return Ok(());
        }

        let (current, branches) = parse_branch_listing(&listing.stdout);
        let deletable: Vec<&String> = branches
            .iter()
            .filter(|branch| **branch != current && !is_protected(branch))
            .collect();

        if deletable.is_empty() {
            print_warning("No branches available for deletion.");
            print_info(&format!("Current branch: {}", current.cyan()));
            return Ok(());
        }

        print_section_header("Select a branch to delete");
        print_info(&format!("Current branch: {}", current.cyan()));
        for (i, branch) in deletable.iter().enumerate() {
            println!("  {}. {}", i + 1, branch.yellow());
        }
        let manual_option = deletable.len() + 1;
        let exit_option = deletable.len() + 2;
        println!("  {manual_option}. Type another branch name");
        println!("  {exit_option}. Exit");

        let choice = self.session.ask("Select an option (number):")?;
        if choice.is_empty() {
            print_warning("No option selected.");
            return Ok(());
        }
        let Ok(choice) = choice.parse::<usize>() else {
            print_error("Enter a valid number.");
            return Ok(());
        };

        let branch_name = if choice == exit_option {
            print_info("Operation cancelled.");
            return Ok(());
        } else if choice == manual_option {
            let typed = self.session.ask("Name of the branch to delete:")?;
            if typed.is_empty() {
                print_warning("No branch given.");
                return Ok(());
            }
            if !self.is_valid_branch_name(&typed) {
                print_error(&format!("'{typed}' is not a valid branch name."));
                self.session
                    .logger
                    .log_warning(&format!("Invalid branch name: {typed}"), "delete_branch");
                return Ok(());
            }
            typed
        } else if (1..=deletable.len()).contains(&choice) {
            deletable[choice - 1].clone()
        } else {
            print_error("Invalid option.");
            return Ok(());
        };

        self.session
            .logger
            .log_user_input("branch_to_delete", &branch_name);

        if branch_name == current {
            print_error("You cannot delete the branch you are on.");
            return Ok(());
        }

        if is_protected(&branch_name)
            && !self.session.confirm(&format!(
                "'{branch_name}' is a protected branch. Delete it anyway?"
            ))?
        {
            return Ok(());
        }

        print_warning(&format!("About to delete branch: {}", branch_name.yellow()));
        if !self.session.confirm("Continue with the deletion?")? {
            print_info("Deletion cancelled.");
            return Ok(());
        }

        let delete = self
            .session
            .git_tolerant(&format!("git branch -D {}", shell_quote(&branch_name)));
        if delete.success() {
            print_success(&format!("Branch '{branch_name}' deleted locally."));
            print_info("Only the local branch was deleted; the remote was not touched.");
            self.session
                .logger
                .log_branch_operation("delete", &branch_name, "", LogStatus::Success);
        } else {
            print_error(&format!("Could not delete the branch: {}", delete.stderr));
            self.session.logger.log_branch_operation(
                "delete",
                &branch_name,
                &delete.stderr,
                LogStatus::Error,
            );
        }
        Ok(())
    }

    fn is_valid_branch_name(&self, name: &str) -> bool {
        is_plain_branch_name(name)
            && self
                .session
                .git_tolerant(&format!("git check-ref-format --branch {}", shell_quote(name)))
                .success()
    }
}

/// Splits `git branch` output into the current branch and all branch names
fn parse_branch_listing(output: &str) -> (String, Vec<String>) {
    let mut current = String::new();
    let mut branches = Vec::new();

    for line in output.lines().map(str::trim).filter(|line| !line.is_empty()) {
        match line.strip_prefix("* ") {
            Some(name) => {
                current = name.trim().to_string();
                branches.push(current.clone());
            }
            None => branches.push(line.to_string()),
        }
    }

    (current, branches)
}
