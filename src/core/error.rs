//! Domain-specific error types and error handling utilities.
//!
//! This module defines [`TaskflowError`] which covers every failure mode of a
//! git-taskflow session. It uses `thiserror` for ergonomic error definitions
//! and includes constructors for the common failure scenarios.
//!
//! # Public API
//! - [`TaskflowError`]: Main error enum covering all failure modes
//! - [`Result<T>`]: Type alias for `std::result::Result<T, TaskflowError>`
//!
//! # Error Categories
//! - **Configuration**: missing fields, invalid branch naming, unreadable config file
//! - **Commands**: a git command failed without the caller tolerating it
//! - **Session**: wrong passphrase, user interrupt
//!
//! Errors travel up to `main`, which is the only place allowed to end the process.

use std::path::PathBuf;
use thiserror::Error;

/// Domain-specific error types for git-taskflow
#[derive(Error, Debug)]
pub enum TaskflowError {
    // Configuration errors
    #[error("Missing field '{field}' in the configuration")]
    MissingField { field: String },

    #[error("Invalid branch configuration: {reason}")]
    InvalidBranchConfig { reason: String },

    #[error("Repository path does not exist: {path}")]
    RepoPathNotFound { path: PathBuf },

    #[error("Configuration file not found: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Failed to parse configuration file '{path}': {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No sections found in the configuration file")]
    NoSections,

    #[error("No configurations available in section '{section}'")]
    EmptySection { section: String },

    #[error("The selected configuration was not confirmed")]
    ConfigNotConfirmed,

    // Command errors
    #[error("Command '{command}' failed with exit code {exit_code}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("Could not run command '{command}': {source}")]
    CommandSpawnFailed {
        command: String,
        source: std::io::Error,
    },

    // Session errors
    #[error("Wrong passphrase")]
    PassphraseRejected,

    #[error("Operation interrupted by the user")]
    Interrupted,

    #[error("Failed to create log directory '{path}': {source}")]
    LogDirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results using TaskflowError
pub type Result<T> = std::result::Result<T, TaskflowError>;

impl TaskflowError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid branch configuration error
    pub fn invalid_branch_config(reason: impl Into<String>) -> Self {
        Self::InvalidBranchConfig {
            reason: reason.into(),
        }
    }

    /// Create a repository path not found error
    pub fn repo_path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RepoPathNotFound { path: path.into() }
    }

    /// Create a configuration file not found error
    pub fn config_file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigFileNotFound { path: path.into() }
    }

    /// Create a configuration parse error
    pub fn config_parse_failed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::ConfigParseFailed {
            path: path.into(),
            source,
        }
    }

    /// Create an empty section error
    pub fn empty_section(section: impl Into<String>) -> Self {
        Self::EmptySection {
            section: section.into(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(
        command: impl Into<String>,
        exit_code: i32,
        stderr: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            command: command.into(),
            exit_code,
            stderr: stderr.into(),
        }
    }

    /// Create a command spawn error
    pub fn command_spawn_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandSpawnFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a log directory creation error
    pub fn log_directory_creation_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::LogDirectoryCreationFailed {
            path: path.into(),
            source,
        }
    }

    /// True when the user asked to leave (Ctrl-C or end of input)
    pub fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Process exit code `main` uses for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_interrupt() {
            0
        } else {
            1
        }
    }
}
