//! Helpers for reading back the operation log

#![allow(dead_code)]

use git_taskflow::core::{LogRecord, LogStatus};
use std::fs;
use std::path::Path;

/// Every parsable record of every log file in `logs_dir`, in file order
pub fn log_records(logs_dir: &Path) -> Vec<LogRecord> {
    let Ok(entries) = fs::read_dir(logs_dir) else {
        return Vec::new();
    };

    let mut files: Vec<_> = entries.filter_map(|e| e.ok()).map(|e| e.path()).collect();
    files.sort();

    files
        .iter()
        .filter_map(|path| fs::read_to_string(path).ok())
        .flat_map(|content| {
            content
                .lines()
                .filter_map(LogRecord::parse)
                .collect::<Vec<_>>()
        })
        .collect()
}

pub fn records_for<'r>(records: &'r [LogRecord], operation: &str) -> Vec<&'r LogRecord> {
    records.iter().filter(|r| r.operation == operation).collect()
}

pub fn has_record(records: &[LogRecord], operation: &str, status: LogStatus) -> bool {
    records
        .iter()
        .any(|r| r.operation == operation && r.status == status)
}

/// Commands the runner executed, as logged in `GIT_COMMAND` records
pub fn logged_commands(records: &[LogRecord]) -> Vec<String> {
    records_for(records, "GIT_COMMAND")
        .iter()
        .filter_map(|r| r.details.strip_prefix("Command: "))
        .map(|details| details.split(" | Error:").next().unwrap_or(details).to_string())
        .collect()
}
