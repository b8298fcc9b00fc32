//! Core functionality for git-taskflow.
//!
//! This module provides the building blocks every workflow coordinator uses:
//! configuration, command execution, outcome classification, the operation
//! log, prompting and error handling.

pub mod branch_name;
pub mod config;
pub mod dirs;
pub mod error;
pub mod logger;
pub mod outcome;
pub mod output;
pub mod prompt;
pub mod runner;
pub mod session;

// === Error handling ===
pub use error::{Result, TaskflowError};

// === Configuration ===
pub use config::{ConfigFile, ConfigRecord, ConfigSection, Configuration, Settings};

// === Command execution ===
// Shell-line runner and the classification of what git printed
pub use outcome::{classify_outcome, OutcomeKind};
pub use runner::{shell_quote, CommandOutcome, CommandRunner, ShellRunner};

// === Operation log ===
pub use logger::{LogRecord, LogStatus, OperationLogger};

// === Interaction ===
pub use prompt::{install_interrupt_handler, is_affirmative, Prompter, ScriptedPrompter, StdinPrompter};
pub use session::Session;

// === Branch rules ===
pub use branch_name::{
    is_plain_branch_name, is_protected, validate_branch_pair, PROTECTED_BRANCHES,
};

// === Output formatting ===
pub use output::{
    print_command, print_error, print_info, print_rule, print_section_header, print_success,
    print_warning,
};
