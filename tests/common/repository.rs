//! Real git repositories for workflow tests
//!
//! Every scenario gets a bare `origin` repository and a working clone with
//! `main` pushed, all inside one temporary directory.

#![allow(dead_code)]

use git_taskflow::core::error::{Result, TaskflowError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A bare remote and the working repository the session operates on. The
/// TempDir must be kept alive for the duration of the test.
pub struct TestRemote {
    pub temp_dir: TempDir,
    pub remote: PathBuf,
    pub work: PathBuf,
}

impl TestRemote {
    pub fn logs_dir(&self) -> PathBuf {
        self.temp_dir.path().join("logs")
    }

    /// Clones `origin` into `name`, runs `change` there and pushes `branch`,
    /// as another developer would.
    pub fn push_from_teammate<F>(&self, name: &str, branch: &str, change: F) -> Result<()>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        let teammate = self.temp_dir.path().join(name);
        git(
            self.temp_dir.path(),
            &["clone", &self.remote.to_string_lossy(), name],
        )?;
        configure_identity(&teammate)?;

        if git(&teammate, &["rev-parse", "--verify", "--quiet", branch]).is_err() {
            git(&teammate, &["checkout", "-b", branch])?;
        }
        change(&teammate)?;
        git(&teammate, &["push", "origin", branch])?;
        Ok(())
    }
}

/// Runs git with an argument vector and returns trimmed stdout. A non-zero
/// exit becomes an error carrying stderr.
pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;

    if !output.status.success() {
        return Err(TaskflowError::command_failed(
            format!("git {}", args.join(" ")),
            output.status.code().unwrap_or(-1),
            String::from_utf8_lossy(&output.stderr),
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn configure_identity(repo: &Path) -> Result<()> {
    git(repo, &["config", "user.name", "Test User"])?;
    git(repo, &["config", "user.email", "test@example.com"])?;
    git(repo, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Sets up `origin.git` (bare) and `work`, a repository on `main` with one
/// commit already pushed and tracking `origin/main`.
pub fn setup_remote_with_clone() -> Result<TestRemote> {
    let temp_dir = TempDir::new()?;
    let remote = temp_dir.path().join("origin.git");
    let work = temp_dir.path().join("work");
    fs::create_dir_all(&remote)?;
    fs::create_dir_all(&work)?;

    git(&remote, &["init", "--bare"])?;
    git(&remote, &["symbolic-ref", "HEAD", "refs/heads/main"])?;

    git(&work, &["init"])?;
    git(&work, &["symbolic-ref", "HEAD", "refs/heads/main"])?;
    configure_identity(&work)?;

    create_file(&work, "README.md", "# portal\n")?;
    commit_all(&work, "Initial commit")?;
    git(&work, &["remote", "add", "origin", &remote.to_string_lossy()])?;
    git(&work, &["push", "-u", "origin", "main"])?;

    Ok(TestRemote {
        temp_dir,
        remote,
        work,
    })
}

pub fn create_file(repo: &Path, filename: &str, content: &str) -> Result<()> {
    let path = repo.join(filename);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

pub fn commit_all(repo: &Path, message: &str) -> Result<()> {
    git(repo, &["add", "."])?;
    git(repo, &["commit", "-m", message])?;
    Ok(())
}

pub fn current_branch(repo: &Path) -> Result<String> {
    git(repo, &["branch", "--show-current"])
}

pub fn rev_parse(repo: &Path, rev: &str) -> Result<String> {
    git(repo, &["rev-parse", rev])
}

pub fn local_branch_exists(repo: &Path, branch: &str) -> bool {
    git(
        repo,
        &["show-ref", "--verify", "--quiet", &format!("refs/heads/{branch}")],
    )
    .is_ok()
}

pub fn is_clean(repo: &Path) -> Result<bool> {
    Ok(git(repo, &["status", "--porcelain"])?.is_empty())
}
