//! The explicit context every coordinator works with.
//!
//! A [`Session`] bundles the validated configuration with handles to the
//! command runner, the operation logger and the prompter. Coordinators borrow
//! it; nothing about git state is cached here, every query runs git again.

use crate::core::branch_name::validate_branch_pair;
use crate::core::config::{Configuration, Settings};
use crate::core::error::{Result, TaskflowError};
use crate::core::logger::OperationLogger;
use crate::core::output::{print_error, print_success};
use crate::core::prompt::{is_affirmative, Prompter};
use crate::core::runner::{CommandOutcome, CommandRunner};

pub struct Session<'a> {
    pub config: &'a Configuration,
    pub settings: &'a Settings,
    pub runner: &'a dyn CommandRunner,
    pub logger: &'a OperationLogger,
    pub prompter: &'a dyn Prompter,
    base_branch: String,
    feature_branch: String,
}

impl<'a> Session<'a> {
    /// Validates the configuration before any git command can run
    pub fn new(
        config: &'a Configuration,
        settings: &'a Settings,
        runner: &'a dyn CommandRunner,
        logger: &'a OperationLogger,
        prompter: &'a dyn Prompter,
    ) -> Result<Self> {
        let validated = validate_branch_pair(
            config.base_branch.as_deref(),
            config.feature_branch.as_deref(),
        )
        .and_then(|branches| {
            if config.repo_path.exists() {
                Ok(branches)
            } else {
                Err(TaskflowError::repo_path_not_found(&config.repo_path))
            }
        });

        let (base_branch, feature_branch) = match validated {
            Ok(branches) => branches,
            Err(e) => {
                logger.log_error(&e.to_string(), "validate_configuration");
                return Err(e);
            }
        };

        Ok(Self {
            config,
            settings,
            runner,
            logger,
            prompter,
            base_branch,
            feature_branch,
        })
    }

    pub fn base_branch(&self) -> &str {
        &self.base_branch
    }

    pub fn feature_branch(&self) -> &str {
        &self.feature_branch
    }

    /// Runs a command whose failure ends the session
    pub fn git(&self, command: &str) -> Result<CommandOutcome> {
        self.runner.run(command, false)
    }

    /// Runs a command whose failure the caller interprets
    pub fn git_tolerant(&self, command: &str) -> CommandOutcome {
        self.runner
            .run(command, true)
            .unwrap_or_else(|e| CommandOutcome::new(-1, "", e.to_string()))
    }

    pub fn ask(&self, message: &str) -> Result<String> {
        self.prompter.ask(message)
    }

    /// Asks a yes/no question; anything but an explicit yes declines
    pub fn confirm(&self, message: &str) -> Result<bool> {
        let answer = self.prompter.ask(&format!("{message} [y/N]:"))?;
        self.logger.log_user_input("confirmation", &answer);

        if is_affirmative(&answer) {
            print_success("Action confirmed.");
            self.logger.log_success("Action confirmed", "confirm_action");
            Ok(true)
        } else {
            print_error("Action not confirmed.");
            self.logger.log_warning("Action not confirmed", "confirm_action");
            Ok(false)
        }
    }

    /// Shared-secret speed bump in front of mutating operations. The typed
    /// value is never logged; a mismatch ends the session.
    pub fn require_passphrase(&self) -> Result<()> {
        let input = self.prompter.ask("Passphrase:")?;
        self.logger.log_user_input("password", &input);

        if input != self.settings.passphrase {
            print_error("Wrong passphrase.");
            self.logger.log_error("Wrong passphrase", "passphrase_gate");
            return Err(TaskflowError::PassphraseRejected);
        }

        self.logger
            .log_success("Passphrase verified", "passphrase_gate");
        Ok(())
    }

    pub fn current_branch(&self) -> String {
        self.git_tolerant("git branch --show-current").stdout
    }

    pub fn has_local_changes(&self) -> bool {
        !self.git_tolerant("git status --porcelain").stdout.is_empty()
    }

    pub fn local_branch_exists(&self, branch: &str) -> bool {
        self.git_tolerant(&format!("git show-ref --verify --quiet refs/heads/{branch}"))
            .success()
    }

    pub fn remote_branch_exists(&self, branch: &str) -> bool {
        !self
            .git_tolerant(&format!("git ls-remote --heads origin {branch}"))
            .stdout
            .is_empty()
    }

    /// `git rev-list --count <range>`, zero when the range cannot be resolved
    pub fn count_commits(&self, range: &str) -> usize {
        let outcome = self.git_tolerant(&format!("git rev-list --count {range}"));
        if !outcome.success() {
            return 0;
        }
        outcome.stdout.parse().unwrap_or(0)
    }
}
