//! Branch naming rules shared by every coordinator.

use crate::core::error::{Result, TaskflowError};

/// Branches that are never offered for deletion and never accepted as a
/// feature branch without extra confirmation
pub const PROTECTED_BRANCHES: [&str; 4] = ["main", "master", "develop", "development"];

/// Names a feature branch may never take
const RESERVED_FEATURE_NAMES: [&str; 2] = ["main", "master"];

/// Characters that would end or rewrite a shell command line
const SHELL_METACHARACTERS: &[char] = &[
    ';', '|', '&', '$', '`', '<', '>', '(', ')', '\'', '"', '\\', '*', '?', '!', '#', '{', '}',
];

pub fn is_protected(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    PROTECTED_BRANCHES.iter().any(|protected| *protected == name)
}

/// First filter for branch names typed by the user, before git's own
/// `check-ref-format` gets to see them
pub fn is_plain_branch_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && !name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || SHELL_METACHARACTERS.contains(&c))
}

/// Checks the base/feature pair of a configuration and returns the two
/// names, trimmed, when they are usable.
pub fn validate_branch_pair(
    base_branch: Option<&str>,
    feature_branch: Option<&str>,
) -> Result<(String, String)> {
    let present = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };

    let feature = present(feature_branch).ok_or_else(|| TaskflowError::missing_field("feature_branch"))?;
    let base = present(base_branch).ok_or_else(|| TaskflowError::missing_field("base_branch"))?;

    let lowered = feature.to_lowercase();
    if RESERVED_FEATURE_NAMES.iter().any(|reserved| *reserved == lowered) {
        return Err(TaskflowError::invalid_branch_config(format!(
            "the feature branch cannot be '{feature}'"
        )));
    }

    if base == feature {
        return Err(TaskflowError::invalid_branch_config(
            "the base branch and the feature branch cannot be the same",
        ));
    }

    Ok((base, feature))
}
