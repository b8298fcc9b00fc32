//! Configuration file model and process environment settings.
//!
//! The configuration file groups repository setups into named sections:
//!
//! ```json
//! {
//!   "sections": {
//!     "work": {
//!       "description": "Work projects",
//!       "configs": [
//!         { "number": 1, "id": "portal", "name": "Portal", "project": "Portal",
//!           "task": "Login", "repo_path": "repos/portal",
//!           "base_branch": "main", "feature_branch": "feature/login" }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! [`Settings`] carries the environment variables read at startup.

use crate::core::error::{Result, TaskflowError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const BASE_PATH_ENV: &str = "BASE_PATH";
pub const PASSPHRASE_ENV: &str = "PASS_SENSITIVE";
pub const CONFIG_ID_ENV: &str = "GIT_CONFIG_ID";

/// Fallback passphrase when `PASS_SENSITIVE` is unset; a warning is shown
/// whenever it is in effect.
pub const DEFAULT_PASSPHRASE: &str = "1234";

#[cfg(windows)]
pub const DEFAULT_BASE_PATH: &str = "C:/";
#[cfg(not(windows))]
pub const DEFAULT_BASE_PATH: &str = "/";

/// One entry of a section's `configs` list, as written in the file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConfigRecord {
    pub number: u32,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub repo_path: Option<String>,
    #[serde(default)]
    pub base_branch: Option<String>,
    #[serde(default)]
    pub feature_branch: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ConfigSection {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub configs: Vec<ConfigRecord>,
}

impl ConfigSection {
    pub fn find(&self, number: u32) -> Option<&ConfigRecord> {
        self.configs.iter().find(|config| config.number == number)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub sections: BTreeMap<String, ConfigSection>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TaskflowError::config_file_not_found(path));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            TaskflowError::Json(source) => TaskflowError::config_parse_failed(path, source),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(content)?;
        if file.sections.is_empty() {
            return Err(TaskflowError::NoSections);
        }
        Ok(file)
    }
}

/// The session's immutable configuration, with `repo_path` already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub number: u32,
    pub id: String,
    pub name: String,
    pub project: Option<String>,
    pub section: Option<String>,
    pub task: Option<String>,
    pub repo_path: PathBuf,
    pub base_branch: Option<String>,
    pub feature_branch: Option<String>,
}

impl Configuration {
    /// Resolves a file record: joins `repo_path` onto `base_path` and records
    /// the section description.
    pub fn from_record(record: &ConfigRecord, section: &str, base_path: &Path) -> Result<Self> {
        let repo_value = record
            .repo_path
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| TaskflowError::missing_field("repo_path"))?;

        Ok(Self {
            number: record.number,
            id: record.id.clone(),
            name: record.name.clone(),
            project: record.project.clone(),
            section: Some(section.to_string()),
            task: record.task.clone(),
            repo_path: base_path.join(repo_value),
            base_branch: record.base_branch.clone(),
            feature_branch: record.feature_branch.clone(),
        })
    }
}

/// Values read from the process environment at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_path: PathBuf,
    pub passphrase: String,
    pub config_id: Option<String>,
    pub uses_default_passphrase: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let passphrase = non_empty(PASSPHRASE_ENV);
        let uses_default_passphrase = passphrase.is_none();

        Self {
            base_path: PathBuf::from(
                non_empty(BASE_PATH_ENV).unwrap_or_else(|| DEFAULT_BASE_PATH.to_string()),
            ),
            passphrase: passphrase.unwrap_or_else(|| DEFAULT_PASSPHRASE.to_string()),
            config_id: non_empty(CONFIG_ID_ENV),
            uses_default_passphrase,
        }
    }
}
