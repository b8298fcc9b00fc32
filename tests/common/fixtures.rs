//! Sessions and configuration files built on top of a [`TestRemote`]

#![allow(dead_code)]

use super::repository::*;
use git_taskflow::core::error::Result;
use git_taskflow::core::{Configuration, Settings};
use std::fs;
use std::path::{Path, PathBuf};

pub const PASSPHRASE: &str = "s3cret";
pub const BASE: &str = "main";
pub const FEATURE: &str = "feature/login";

pub fn settings() -> Settings {
    Settings {
        base_path: PathBuf::from("/"),
        passphrase: PASSPHRASE.to_string(),
        config_id: None,
        uses_default_passphrase: false,
    }
}

pub fn configuration(repo: &Path) -> Configuration {
    Configuration {
        number: 1,
        id: "portal".to_string(),
        name: "Portal".to_string(),
        project: Some("Portal".to_string()),
        section: Some("Work projects".to_string()),
        task: Some("Login page".to_string()),
        repo_path: repo.to_path_buf(),
        base_branch: Some(BASE.to_string()),
        feature_branch: Some(FEATURE.to_string()),
    }
}

/// Scenario: the work repository sits on the feature branch with one
/// committed change on top of `main`
pub fn setup_feature_branch() -> Result<TestRemote> {
    let remote = setup_remote_with_clone()?;
    git(&remote.work, &["checkout", "-b", FEATURE])?;
    create_file(&remote.work, "login.rs", "fn login() {}\n")?;
    commit_all(&remote.work, "Add login")?;
    Ok(remote)
}

/// Writes a configuration file with one `work` section pointing at
/// `repo_path`, relative to the `BASE_PATH` the binary is started with.
pub fn write_config_file(dir: &Path, repo_path: &str, feature_branch: &str) -> Result<PathBuf> {
    let content = format!(
        r#"{{
  "sections": {{
    "work": {{
      "description": "Work projects",
      "configs": [
        {{
          "number": 1,
          "id": "portal",
          "name": "Portal",
          "project": "Portal",
          "task": "Login page",
          "repo_path": "{repo_path}",
          "base_branch": "{BASE}",
          "feature_branch": "{feature_branch}"
        }}
      ]
    }}
  }}
}}"#
    );
    let path = dir.join("config.json");
    fs::write(&path, content)?;
    Ok(path)
}
