//! Command execution against the configured repository.
//!
//! Git is invoked as whole shell command lines (`sh -c` / `cmd /C`) with the
//! repository as working directory. Every invocation is mirrored to the
//! [`OperationLogger`] as exactly one `GIT_COMMAND` record.
//!
//! # Failure policy
//! - `allow_failure = false`: a non-zero exit (or a spawn error) is reported,
//!   logged and returned as an error that ends the session in `main`.
//! - `allow_failure = true`: the failure comes back as a [`CommandOutcome`]
//!   for the caller to interpret. Spawn errors become exit code `-1`.
//!
//! No retries happen here.

use crate::core::error::{Result, TaskflowError};
use crate::core::logger::OperationLogger;
use crate::core::output::{print_command, print_error, print_success};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Result of one command invocation. Output is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn new(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into().trim().to_string(),
            stderr: stderr.into().trim().to_string(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout and stderr joined, for substring classification
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

pub trait CommandRunner {
    fn run(&self, command: &str, allow_failure: bool) -> Result<CommandOutcome>;
}

pub struct ShellRunner<'a> {
    repo_path: PathBuf,
    logger: &'a OperationLogger,
}

impl<'a> ShellRunner<'a> {
    pub fn new(repo_path: impl Into<PathBuf>, logger: &'a OperationLogger) -> Self {
        Self {
            repo_path: repo_path.into(),
            logger,
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    fn shell_command(command: &str) -> Command {
        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        }
        #[cfg(not(windows))]
        {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

impl CommandRunner for ShellRunner<'_> {
    fn run(&self, command: &str, allow_failure: bool) -> Result<CommandOutcome> {
        print_command(command);
        log::debug!("Running '{command}' in {}", self.repo_path.display());

        // stdin stays attached so git can still ask for credentials
        let output = Self::shell_command(command)
            .current_dir(&self.repo_path)
            .stdin(Stdio::inherit())
            .output();

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                print_error(&format!("Unexpected error: {e}"));
                let outcome = CommandOutcome::new(-1, "", e.to_string());
                self.logger.log_git_command(command, &outcome);
                if allow_failure {
                    return Ok(outcome);
                }
                return Err(TaskflowError::command_spawn_failed(command, e));
            }
        };

        let outcome = CommandOutcome::new(
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );

        if outcome.success() {
            if !outcome.stdout.is_empty() {
                print_success(&outcome.stdout);
            }
        } else if !allow_failure && !outcome.stderr.is_empty() {
            print_error(&outcome.stderr);
        }

        self.logger.log_git_command(command, &outcome);

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

/// Quotes free text so it reaches git as a single argument
pub fn shell_quote(text: &str) -> String {
    #[cfg(windows)]
    {
        format!("\"{}\"", text.replace('"', "\\\""))
    }
    #[cfg(not(windows))]
    {
        format!("'{}'", text.replace('\'', "'\\''"))
    }
}
