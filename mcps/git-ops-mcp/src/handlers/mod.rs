//! Git tool handlers
//!
//! Each module holds the operation itself (callable with a [`RepoSession`])
//! and a `handle` function that parses tool arguments, runs the operation
//! and shapes the result envelope.

pub mod add;
pub mod branch_create;
pub mod branch_list;
pub mod branch_merge;
pub mod checkout;
pub mod commit;
pub mod log;
pub mod push;
pub mod status;

use mcp_common::{text_failure, CallToolResult};
use tracing::warn;

use crate::config::{Config, DefaultsConfig};
use crate::git::GitCli;
use crate::repository::RepoSession;
use crate::types::{GitError, GitResult};

/// Everything a handler needs besides its arguments
#[derive(Debug, Clone)]
pub struct ToolContext {
    pub git: GitCli,
    pub defaults: DefaultsConfig,
}

impl ToolContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            git: GitCli::from_config(&config.git),
            defaults: config.defaults.clone(),
        }
    }

    pub fn open(&self, repo_path: &str) -> GitResult<RepoSession> {
        RepoSession::resolve(repo_path, &self.git)
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// How a tool reports failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStyle {
    /// `Error: <message>`
    Prefixed,
    /// `<message>` as is (git_branch_merge, git_push)
    Bare,
}

/// Failure envelope for `err`
///
/// Parameter-shape errors never carry the `Error:` prefix.
pub fn failure(err: &GitError, style: ErrorStyle) -> CallToolResult {
    let text = match (style, err) {
        (_, GitError::InvalidParams(_)) | (ErrorStyle::Bare, _) => err.to_string(),
        (ErrorStyle::Prefixed, _) => format!("Error: {err}"),
    };
    warn!(error = %text, "git tool failed");
    text_failure(text)
}

pub fn respond<T>(
    outcome: GitResult<T>,
    style: ErrorStyle,
    render: impl FnOnce(T) -> CallToolResult,
) -> CallToolResult {
    match outcome {
        Ok(value) => render(value),
        Err(err) => failure(&err, style),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_common::{first_text, text_success};

    #[test]
    fn test_failure_styles() {
        let err = GitError::NoRemote;
        assert_eq!(
            first_text(&failure(&err, ErrorStyle::Prefixed)),
            Some("Error: No remote repository configured")
        );
        assert_eq!(
            first_text(&failure(&err, ErrorStyle::Bare)),
            Some("No remote repository configured")
        );
    }

    #[test]
    fn test_invalid_params_unprefixed() {
        let err = GitError::InvalidParams("missing field `repoPath`".into());
        let result = failure(&err, ErrorStyle::Prefixed);
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            first_text(&result),
            Some("Invalid parameters: missing field `repoPath`")
        );
    }

    #[test]
    fn test_respond_success() {
        let result = respond(Ok(3), ErrorStyle::Prefixed, |n| text_success(format!("{n}")));
        assert_eq!(first_text(&result), Some("3"));
        assert!(!result.is_error.unwrap_or(false));
    }
}
