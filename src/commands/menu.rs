//! The numbered, looping session menu.

use crate::commands::{
    abort::AbortCoordinator, branch::BranchCoordinator, rebase::RebaseCoordinator,
    release::ReleaseWorkflowCoordinator, reset::ResetCoordinator, stash::StashCoordinator,
    status, sync::SyncCoordinator,
};
use crate::core::{print_error, print_info, print_rule, Result, Session, TaskflowError};
use colored::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    RepositoryStatus,
    ShowBranches,
    PullCurrentBranch,
    PullBaseBranch,
    Rebase,
    GetLatestChanges,
    UploadChanges,
    CreateFeatureBranch,
    ResetToBase,
    UpdateBaseBranch,
    DeleteBranch,
    CancelRebase,
    AbortOperation,
    ReleaseWorkflow,
    SaveStash,
    RestoreStash,
    ViewTodayLogs,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub action: MenuAction,
}

impl MenuOption {
    fn new(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// The menu entries for this session, in display order. The exit entry is
/// not part of the list; it is always numbered `len() + 1`.
pub fn menu_options(session: &Session) -> Vec<MenuOption> {
    let base = session.base_branch();
    let feature = session.feature_branch();

    vec![
        MenuOption::new("Repository status", MenuAction::RepositoryStatus),
        MenuOption::new("Show branches", MenuAction::ShowBranches),
        MenuOption::new("PULL: get my team's changes into my current branch", MenuAction::PullCurrentBranch),
        MenuOption::new(format!("DIRECT PULL: bring in {base} whatever happens"), MenuAction::PullBaseBranch),
        MenuOption::new(format!("REBASE: bring {base} into the current branch"), MenuAction::Rebase),
        MenuOption::new(format!("GUIDED REBASE: check out {feature} and rebase it onto {base}"), MenuAction::GetLatestChanges),
        MenuOption::new("Upload my changes to the remote", MenuAction::UploadChanges),
        MenuOption::new(format!("Create feature branch: {feature}"), MenuAction::CreateFeatureBranch),
        MenuOption::new(format!("FULL RESET: start again from {base} (with backup)"), MenuAction::ResetToBase),
        MenuOption::new(format!("UPDATE BASE BRANCH: get the latest {base}"), MenuAction::UpdateBaseBranch),
        MenuOption::new("Delete a branch", MenuAction::DeleteBranch),
        MenuOption::new("Cancel rebase in progress", MenuAction::CancelRebase),
        MenuOption::new("Cancel a merge, rebase or cherry-pick", MenuAction::AbortOperation),
        MenuOption::new("Release workflow (develop/main only)", MenuAction::ReleaseWorkflow),
        MenuOption::new("Save local changes (stash)", MenuAction::SaveStash),
        MenuOption::new("Restore saved changes (stash)", MenuAction::RestoreStash),
        MenuOption::new("View today's log", MenuAction::ViewTodayLogs),
    ]
}

pub fn dispatch(session: &Session, action: MenuAction) -> Result<()> {
    match action {
        MenuAction::RepositoryStatus => status::show_repository_status(session),
        MenuAction::ShowBranches => BranchCoordinator::new(session).show_branches(),
        MenuAction::PullCurrentBranch => SyncCoordinator::new(session).pull_current_branch(),
        MenuAction::PullBaseBranch => SyncCoordinator::new(session).pull_base_branch(),
        MenuAction::Rebase => RebaseCoordinator::new(session).handle_rebase(),
        MenuAction::GetLatestChanges => RebaseCoordinator::new(session).get_latest_changes(),
        MenuAction::UploadChanges => SyncCoordinator::new(session).upload_changes(),
        MenuAction::CreateFeatureBranch => {
            BranchCoordinator::new(session).create_branch_feature().map(|_| ())
        }
        MenuAction::ResetToBase => {
            ResetCoordinator::new(session).reset_to_base_with_backup().map(|_| ())
        }
        MenuAction::UpdateBaseBranch => {
            RebaseCoordinator::new(session).update_base_branch().map(|_| ())
        }
        MenuAction::DeleteBranch => BranchCoordinator::new(session).delete_branch(),
        MenuAction::CancelRebase => RebaseCoordinator::new(session).cancel_rebase(),
        MenuAction::AbortOperation => AbortCoordinator::new(session).abort_menu(),
        MenuAction::ReleaseWorkflow => ReleaseWorkflowCoordinator::new(session)
            .feature_branch_workflow()
            .map(|_| ()),
        MenuAction::SaveStash => StashCoordinator::new(session).save_changes_locally().map(|_| ()),
        MenuAction::RestoreStash => StashCoordinator::new(session).restore_local_changes().map(|_| ()),
        MenuAction::ViewTodayLogs => status::view_today_logs(session.logger),
    }
}

/// Writes the start banner and moves to the feature branch when possible
pub fn start_session(session: &Session) -> Result<()> {
    session.logger.log_program_start(session.config);
    BranchCoordinator::new(session).auto_checkout_to_feature_branch()
}

fn show_menu(options: &[MenuOption]) {
    print_rule(60);
    println!("{}", "GIT MENU:".white().bold());
    for (i, option) in options.iter().enumerate() {
        println!("[{}] {}", i + 1, option.label);
    }
    println!("[{}] Exit", options.len() + 1);
    print_rule(60);
}

/// Runs until the user picks Exit or interrupts the menu prompt. Errors from
/// an operation end the loop and reach the caller.
pub fn run_menu(session: &Session) -> Result<()> {
    let options = menu_options(session);
    let exit_option = options.len() + 1;

    loop {
        show_menu(&options);

        let selected = match session.ask("Type the number of the option to use:") {
            Ok(selected) => selected,
            Err(TaskflowError::Interrupted) => {
                print_info("Leaving the program...");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        match selected.parse::<usize>() {
            Ok(n) if n == exit_option => {
                print_info("Leaving the program...");
                return Ok(());
            }
            Ok(n) if (1..=options.len()).contains(&n) => {
                let option = &options[n - 1];
                session.logger.log_menu_selection(n, &option.label);
                dispatch(session, option.action)?;
            }
            Ok(_) => {
                print_error("Invalid option.");
                session
                    .logger
                    .log_warning(&format!("Invalid menu option: {selected}"), "show_menu");
            }
            Err(_) => {
                print_error("Please enter a valid number.");
                session
                    .logger
                    .log_warning(&format!("Invalid menu input: {selected}"), "show_menu");
            }
        }
    }
}
