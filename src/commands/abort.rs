use crate::core::{
    logger::LogStatus, print_info, print_section_header, print_success, print_warning, Result,
    Session, TaskflowError,
};

/// In-progress operations git can abort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortKind {
    Merge,
    Rebase,
    CherryPick,
}

impl AbortKind {
    pub const ALL: [AbortKind; 3] = [AbortKind::Merge, AbortKind::Rebase, AbortKind::CherryPick];

    pub fn git_command(&self) -> &'static str {
        match self {
            AbortKind::Merge => "git merge --abort",
            AbortKind::Rebase => "git rebase --abort",
            AbortKind::CherryPick => "git cherry-pick --abort",
        }
    }

    pub fn log_operation(&self) -> &'static str {
        match self {
            AbortKind::Merge => "MERGE_ABORT",
            AbortKind::Rebase => "REBASE_ABORT",
            AbortKind::CherryPick => "CHERRY_PICK_ABORT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AbortKind::Merge => "merge",
            AbortKind::Rebase => "rebase",
            AbortKind::CherryPick => "cherry-pick",
        }
    }
}

pub struct AbortCoordinator<'s, 'a> {
    session: &'s Session<'a>,
}

impl<'s, 'a> AbortCoordinator<'s, 'a> {
    pub fn new(session: &'s Session<'a>) -> Self {
        Self { session }
    }

    /// Sub-menu listing the abortable operations plus a way back
    pub fn abort_menu(&self) -> Result<()> {
        print_section_header("Cancel an operation in progress");

        for (i, kind) in AbortKind::ALL.iter().enumerate() {
            println!("  {}. Cancel {} in progress", i + 1, kind.label());
        }
        let back_option = AbortKind::ALL.len() + 1;
        println!("  {back_option}. Back");

        loop {
            let choice = match self.session.ask("Select an option:") {
                Ok(choice) => choice,
                Err(TaskflowError::Interrupted) => return Ok(()),
                Err(e) => return Err(e),
            };

            match choice.parse::<usize>() {
                Ok(n) if n == back_option => return Ok(()),
                Ok(n) if (1..=AbortKind::ALL.len()).contains(&n) => {
                    let kind = AbortKind::ALL[n - 1];
                    self.session
                        .logger
                        .log_menu_selection(n, &format!("Cancel {}", kind.label()));
                    return self.abort(kind).map(|_| ());
                }
                _ => print_warning(&format!("Invalid option. Choose 1-{back_option}.")),
            }
        }
    }

    /// Runs `git <kind> --abort`. Returns whether something was aborted.
    pub fn abort(&self, kind: AbortKind) -> Result<bool> {
        self.session.require_passphrase()?;

        let outcome = self.session.git_tolerant(kind.git_command());
        if outcome.success() {
            print_success(&format!("The {} was cancelled.", kind.label()));
            self.session.logger.log_operation(
                kind.log_operation(),
                &format!("Cancelled {}", kind.label()),
                LogStatus::Success,
            );
            Ok(true)
        } else {
            print_warning(&format!("There is no {} in progress to cancel.", kind.label()));
            print_info(&outcome.stderr);
            self.session.logger.log_operation(
                kind.log_operation(),
                &format!("No {} in progress", kind.label()),
                LogStatus::Warning,
            );
            Ok(false)
        }
    }
}
