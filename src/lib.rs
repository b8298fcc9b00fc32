//! Git Taskflow - an interactive assistant for a personal base/feature git
//! branching workflow.
//!
//! A session is bound to one configuration (repository, base branch, feature
//! branch). The [`commands`] module holds the workflow coordinators driven by
//! the interactive menu; [`core`] holds configuration, command execution, the
//! operation log and error handling.
//!
//! # Public API
//! The main public interface is re-exported from the [`core`] module:
//! - Configuration loading and environment settings
//! - The [`CommandRunner`] seam and its shell implementation
//! - Outcome classification of git output
//! - The daily operation log
//! - Error handling and result types

pub mod commands;
pub mod core;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export the core public API for external users
pub use core::{
    classify_outcome,
    // Command execution
    CommandOutcome,
    CommandRunner,
    // Configuration
    ConfigFile,
    Configuration,
    // Operation log
    LogRecord,
    LogStatus,
    OperationLogger,
    OutcomeKind,
    // Interaction
    Prompter,
    Result,
    ScriptedPrompter,
    Session,
    Settings,
    ShellRunner,
    StdinPrompter,
    // Error handling
    TaskflowError,
};
