//! Append-only daily operation log.
//!
//! Every git invocation and every decision point of a session is written as one
//! line to `{logs_dir}/{YYYY-MM-DD}_git_operations.log`. The file is created on
//! the first write of the day and never rotated or deleted.
//!
//! # Public API
//! - [`OperationLogger`]: the sink, with one method per record kind
//! - [`LogRecord`]: a single parsed or formatted line
//! - [`LogStatus`]: `INFO`, `SUCCESS`, `WARNING` or `ERROR`
//!
//! # Line Format
//! ```text
//! [2024-01-15 10:30:00] [SUCCESS] GIT_COMMAND - Command: git fetch origin
//! ```
//!
//! Write failures are reported through the `log` facade and never end the session.

use crate::core::config::Configuration;
use crate::core::error::{Result, TaskflowError};
use crate::core::runner::CommandOutcome;
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Placeholder stored instead of any secret typed by the user
pub const REDACTED: &str = "***HIDDEN***";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const BANNER_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStatus {
    Info,
    Success,
    Warning,
    Error,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Info => "INFO",
            LogStatus::Success => "SUCCESS",
            LogStatus::Warning => "WARNING",
            LogStatus::Error => "ERROR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "INFO" => Some(LogStatus::Info),
            "SUCCESS" => Some(LogStatus::Success),
            "WARNING" => Some(LogStatus::Warning),
            "ERROR" => Some(LogStatus::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub timestamp: NaiveDateTime,
    pub status: LogStatus,
    pub operation: String,
    pub details: String,
}

impl LogRecord {
    pub fn now(status: LogStatus, operation: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            status,
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Parses a line written by [`LogRecord`]'s `Display`. Banner rules and
    /// blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('[')?;
        let (timestamp, rest) = rest.split_once("] [")?;
        let (status, rest) = rest.split_once("] ")?;

        let timestamp = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
        let status = LogStatus::parse(status)?;
        let (operation, details) = match rest.split_once(" - ") {
            Some((operation, details)) => (operation, details),
            None => (rest, ""),
        };

        Some(Self {
            timestamp,
            status,
            operation: operation.to_string(),
            details: details.to_string(),
        })
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.status,
            self.operation
        )?;
        if !self.details.is_empty() {
            write!(f, " - {}", self.details)?;
        }
        Ok(())
    }
}

/// File name of the log for the given day
pub fn log_file_name(date: chrono::NaiveDate) -> String {
    format!("{}_git_operations.log", date.format("%Y-%m-%d"))
}

pub struct OperationLogger {
    logs_dir: PathBuf,
}

impl OperationLogger {
    /// Opens the logger, creating the logs directory when needed
    pub fn new(logs_dir: impl Into<PathBuf>) -> Result<Self> {
        let logs_dir = logs_dir.into();
        fs::create_dir_all(&logs_dir)
            .map_err(|e| TaskflowError::log_directory_creation_failed(&logs_dir, e))?;
        log::debug!("Operation logs are written to {}", logs_dir.display());
        Ok(Self { logs_dir })
    }

    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    pub fn today_log_path(&self) -> PathBuf {
        self.logs_dir
            .join(log_file_name(Local::now().date_naive()))
    }

    /// Today's log content, or `None` when nothing was logged yet today
    pub fn read_today_log(&self) -> Result<Option<String>> {
        let path = self.today_log_path();
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn append(&self, text: &str) {
        let path = self.today_log_path();
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .and_then(|mut file| file.write_all(text.as_bytes()));

        if let Err(e) = written {
            log::warn!("Could not write to log file {}: {e}", path.display());
        }
    }

    pub fn write_record(&self, record: &LogRecord) {
        self.append(&format!("{record}\n"));
    }

    pub fn log_operation(&self, operation: &str, details: &str, status: LogStatus) {
        self.write_record(&LogRecord::now(status, operation, details));
    }

    pub fn log_git_command(&self, command: &str, outcome: &CommandOutcome) {
        let status = if outcome.success() {
            LogStatus::Success
        } else {
            LogStatus::Error
        };

        let mut details = format!("Command: {command}");
        if !outcome.success() && !outcome.stderr.is_empty() {
            details.push_str(&format!(" | Error: {}", outcome.stderr));
        }

        self.log_operation("GIT_COMMAND", &details, status);
    }

    pub fn log_menu_selection(&self, option_number: usize, description: &str) {
        self.log_operation(
            "MENU_SELECTION",
            &format!("Option {option_number}: {description}"),
            LogStatus::Info,
        );
    }

    /// Records what the user typed. Values typed as `password`/`pass` are
    /// replaced by [`REDACTED`] before they reach the file.
    pub fn log_user_input(&self, input_type: &str, value: &str) {
        let value = match input_type {
            "password" | "pass" => REDACTED,
            _ => value,
        };
        self.log_operation(
            "USER_INPUT",
            &format!("{input_type}: {value}"),
            LogStatus::Info,
        );
    }

    pub fn log_branch_operation(
        &self,
        operation: &str,
        branch_name: &str,
        details: &str,
        status: LogStatus,
    ) {
        let mut full_details = format!("Branch: {branch_name}");
        if !details.is_empty() {
            full_details.push_str(&format!(" | {details}"));
        }
        self.log_operation(
            &format!("BRANCH_{}", operation.to_uppercase()),
            &full_details,
            status,
        );
    }

    pub fn log_rebase_operation(&self, base_branch: &str, feature_branch: &str, status: LogStatus) {
        self.log_operation(
            "REBASE",
            &format!("From: {base_branch} → To: {feature_branch}"),
            status,
        );
    }

    pub fn log_pull_operation(&self, branch_name: &str, status: LogStatus) {
        self.log_operation("PULL", &format!("Branch: {branch_name}"), status);
    }

    pub fn log_push_operation(&self, branch_name: &str, commit_message: &str, status: LogStatus) {
        self.log_operation(
            "PUSH",
            &format!("Branch: {branch_name} | Commit: {commit_message}"),
            status,
        );
    }

    pub fn log_stash_operation(&self, operation: &str, stash_message: &str, status: LogStatus) {
        let mut details = format!("Operation: {operation}");
        if !stash_message.is_empty() {
            details.push_str(&format!(" | Message: {stash_message}"));
        }
        self.log_operation("STASH", &details, status);
    }

    fn with_context(message: &str, context: &str) -> String {
        if context.is_empty() {
            message.to_string()
        } else {
            format!("{context} | {message}")
        }
    }

    pub fn log_error(&self, message: &str, context: &str) {
        self.log_operation("ERROR", &Self::with_context(message, context), LogStatus::Error);
    }

    pub fn log_warning(&self, message: &str, context: &str) {
        self.log_operation(
            "WARNING",
            &Self::with_context(message, context),
            LogStatus::Warning,
        );
    }

    pub fn log_success(&self, message: &str, context: &str) {
        self.log_operation(
            "SUCCESS",
            &Self::with_context(message, context),
            LogStatus::Success,
        );
    }

    /// Writes the banner that opens a session, with the selected configuration
    pub fn log_program_start(&self, config: &Configuration) {
        let rule = "=".repeat(BANNER_WIDTH);
        let or_none = |value: &Option<String>| value.clone().unwrap_or_else(|| "None".to_string());

        let records = [
            LogRecord::now(LogStatus::Info, "PROGRAM_START", ""),
            LogRecord::now(
                LogStatus::Info,
                "CONFIG_SELECTED",
                format!("Config: {}", config.name),
            ),
            LogRecord::now(
                LogStatus::Info,
                "PROJECT_INFO",
                format!("Project: {}", or_none(&config.project)),
            ),
            LogRecord::now(
                LogStatus::Info,
                "SECTION_INFO",
                format!("Section: {}", or_none(&config.section)),
            ),
            LogRecord::now(
                LogStatus::Info,
                "TASK_INFO",
                format!("Task: {}", or_none(&config.task)),
            ),
            LogRecord::now(
                LogStatus::Info,
                "REPO_INFO",
                format!("Repo: {}", config.repo_path.display()),
            ),
            LogRecord::now(
                LogStatus::Info,
                "BRANCH_INFO",
                format!(
                    "Base branch: {} | Feature branch: {}",
                    or_none(&config.base_branch),
                    or_none(&config.feature_branch)
                ),
            ),
        ];

        let mut text = format!("\n{rule}\n");
        for record in &records {
            text.push_str(&format!("{record}\n"));
        }
        text.push_str(&format!("{rule}\n"));
        self.append(&text);
    }

    /// Writes the record and rule that close a session
    pub fn log_program_end(&self) {
        let rule = "=".repeat(BANNER_WIDTH);
        let record = LogRecord::now(LogStatus::Info, "PROGRAM_END", "");
        self.append(&format!("{record}\n{rule}\n\n"));
    }
}
