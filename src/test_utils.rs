//! Test doubles shared by the unit tests of the coordinators.

use crate::core::config::{Configuration, Settings};
use crate::core::error::{Result, TaskflowError};
use crate::core::runner::{CommandOutcome, CommandRunner};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub const TEST_PASSPHRASE: &str = "secret";

pub fn sample_settings() -> Settings {
    Settings {
        base_path: PathBuf::from("/"),
        passphrase: TEST_PASSPHRASE.to_string(),
        config_id: Some("release-config".to_string()),
        uses_default_passphrase: false,
    }
}

pub fn sample_config(repo_path: &Path) -> Configuration {
    Configuration {
        number: 1,
        id: "portal".to_string(),
        name: "Portal".to_string(),
        project: Some("Portal".to_string()),
        section: Some("Work projects".to_string()),
        task: Some("Login page".to_string()),
        repo_path: repo_path.to_path_buf(),
        base_branch: Some("main".to_string()),
        feature_branch: Some("feature/login".to_string()),
    }
}

struct Response {
    prefix: String,
    outcome: CommandOutcome,
    once: bool,
    used: bool,
}

/// Records every command and answers from canned responses matched by
/// prefix. One-shot responses are consumed before sticky ones; anything
/// unmatched succeeds with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<(String, bool)>>,
    responses: RefCell<Vec<Response>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, prefix: &str, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.push(prefix, exit_code, stdout, stderr, false)
    }

    pub fn respond_once(self, prefix: &str, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.push(prefix, exit_code, stdout, stderr, true)
    }

    fn push(self, prefix: &str, exit_code: i32, stdout: &str, stderr: &str, once: bool) -> Self {
        self.responses.borrow_mut().push(Response {
            prefix: prefix.to_string(),
            outcome: CommandOutcome::new(exit_code, stdout, stderr),
            once,
            used: false,
        });
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|(command, _)| command.clone())
            .collect()
    }

    pub fn ran(&self, prefix: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|(command, _)| command.starts_with(prefix))
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(command, _)| command.starts_with(prefix))
            .count()
    }

    pub fn tolerated_all(&self) -> bool {
        self.calls.borrow().iter().all(|(_, tolerated)| *tolerated)
    }

    fn answer(&self, command: &str) -> CommandOutcome {
        let mut responses = self.responses.borrow_mut();

        if let Some(response) = responses
            .iter_mut()
            .find(|r| r.once && !r.used && command.starts_with(&r.prefix))
        {
            response.used = true;
            return response.outcome.clone();
        }

        responses
            .iter()
            .find(|r| !r.once && command.starts_with(&r.prefix))
            .map(|r| r.outcome.clone())
            .unwrap_or_else(|| CommandOutcome::new(0, "", ""))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &str, allow_failure: bool) -> Result<CommandOutcome> {
        self.calls
            .borrow_mut()
            .push((command.to_string(), allow_failure));

        let outcome = self.answer(command);
        if !outcome.success() && !allow_failure {
            return Err(TaskflowError::command_failed(
                command,
                outcome.exit_code,
                outcome.stderr.clone(),
            ));
        }
        Ok(outcome)
    }
}
