//! Field checks shared by the tool handlers

use serde_json::Value;

use crate::types::{GitError, GitResult};

pub const REPOSITORY_PATH: &str = "Repository path";
pub const COMMIT_MESSAGE: &str = "Commit message";
pub const BRANCH_NAME: &str = "Branch name";
pub const TARGET: &str = "Target";

/// Trimmed value of a string field that must not be blank
pub fn non_empty(value: &str, field: &'static str) -> GitResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GitError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Like [`non_empty`], but for fields received as untyped JSON
///
/// Absent, `null` and non-string values are reported separately from blank
/// strings.
pub fn required_string(value: Option<&Value>, field: &'static str) -> GitResult<String> {
    match value {
        Some(Value::String(s)) => non_empty(s, field),
        _ => Err(GitError::MissingField(field)),
    }
}

/// Checked like [`required_string`], but returned exactly as sent
pub fn required_verbatim(value: Option<&Value>, field: &'static str) -> GitResult<String> {
    match value {
        Some(Value::String(s)) => non_empty(s, field).map(|_| s.clone()),
        _ => Err(GitError::MissingField(field)),
    }
}

/// Whether `name` is acceptable as a new local branch name
///
/// Follows `git check-ref-format --branch`.
pub fn is_valid_branch_name(name: &str) -> bool {
    if name.is_empty() || name == "@" || name.starts_with('-') {
        return false;
    }
    if name.starts_with('.') || name.ends_with('/') || name.ends_with('.') {
        return false;
    }
    if name.ends_with(".lock") || name.contains("..") || name.contains("@{") {
        return false;
    }
    if name
        .chars()
        .any(|c| c.is_control() || matches!(c, ' ' | '~' | '^' | ':' | '?' | '*' | '[' | '\\'))
    {
        return false;
    }
    // every path component follows the same rules
    name.split('/').all(|component| {
        !component.is_empty() && !component.starts_with('.') && !component.ends_with(".lock")
    })
}

pub fn validate_branch_name(name: &str) -> GitResult<()> {
    if is_valid_branch_name(name) {
        Ok(())
    } else {
        Err(GitError::InvalidBranchName(name.to_string()))
    }
}
