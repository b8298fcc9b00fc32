//! Shared utilities for the git-taskflow integration tests
//!
//! Scenarios run against real temporary repositories with a bare `origin`
//! remote so that fetch, push and ls-remote behave as they do for users.

pub mod assertions;
pub mod fixtures;
pub mod repository;
