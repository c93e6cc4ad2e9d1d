//! Type definitions for git-ops-mcp

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Tool Results
// ============================================================================

/// Result of git_add
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddResult {
    pub added_files: Vec<String>,
    pub file_count: usize,
}

/// A freshly created commit with its diff stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitSummary {
    pub hash: String,
    pub message: String,
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

impl CommitSummary {
    pub fn render(&self) -> String {
        format!(
            "Successfully created commit: {}\nMessage: {}\nFiles changed: {} ({} insertions, {} deletions)",
            self.hash, self.message, self.files_changed, self.insertions, self.deletions
        )
    }
}

/// Outcome of git_commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Nothing to commit; the working tree had no entries at all
    Clean,
    Created(CommitSummary),
}

/// Result of git_branch_create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchCreateResult {
    pub success: bool,
    pub branch_name: String,
    pub base_branch: String,
    pub message: String,
    pub checked_out: bool,
}

/// Result of git_branch_list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchListResult {
    pub current: String,
    pub local: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<Vec<String>>,
}

/// How a merge was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeType {
    Merge,
    FastForward,
    Squash,
}

impl std::fmt::Display for MergeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MergeType::Merge => "merge",
            MergeType::FastForward => "fast-forward",
            MergeType::Squash => "squash",
        };
        f.write_str(name)
    }
}

/// Result of git_branch_merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    pub source_branch: String,
    pub target_branch: String,
    pub merge_type: MergeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl MergeOutcome {
    pub fn render(&self) -> String {
        let mut text = format!(
            "Successfully merged {} into {}\nMerge type: {}",
            self.source_branch, self.target_branch, self.merge_type
        );
        if let Some(hash) = &self.commit {
            text.push_str(&format!("\nCommit: {hash}"));
        }
        text
    }
}

/// One commit in a git_log result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub hash: String,
    /// Author date, ISO 8601 with the author's offset
    pub date: String,
    /// First line of the commit message
    pub message: String,
    pub author: String,
    pub email: String,
}

/// Result of git_log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResult {
    pub logs: Vec<LogEntry>,
}

/// Result of git_checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    pub success: bool,
    pub previous_branch: String,
    pub current_branch: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_files: Option<Vec<String>>,
}

/// Commit information reported by git_push
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushedCommits {
    pub pushed: usize,
    pub hash: String,
    pub message: String,
}

/// Result of git_push
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushOutcome {
    pub success: bool,
    pub remote: String,
    pub branch: String,
    pub message: String,
    pub commits: PushedCommits,
    pub tags: Vec<String>,
    pub warnings: Vec<String>,
}

impl PushOutcome {
    pub fn render(&self) -> String {
        let mut text = self.message.clone();
        for warning in &self.warnings {
            text.push_str(&format!("\n\nWarning: {warning}"));
        }
        if !self.tags.is_empty() {
            text.push_str(&format!("\n\nTags pushed: {}", self.tags.join(", ")));
        }
        text
    }
}

// ============================================================================
// Repository Snapshots
// ============================================================================

/// Where HEAD points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadState {
    /// Checked out branch, including an unborn one; `None` when detached
    pub branch: Option<String>,
    pub detached: bool,
}

impl HeadState {
    /// Branch name, or `HEAD` when detached (what `rev-parse --abbrev-ref` prints)
    pub fn abbrev(&self) -> String {
        self.branch.clone().unwrap_or_else(|| "HEAD".to_string())
    }
}

/// A path in `git status` with its two porcelain status columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub index: char,
    pub working_dir: char,
}

impl FileEntry {
    /// Index column is neither blank nor untracked
    pub fn is_staged(&self) -> bool {
        self.index != ' ' && self.index != '?'
    }
}

/// Working tree status of a repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub current: Option<String>,
    pub detached: bool,
    pub tracking: Option<String>,
    pub ahead: usize,
    pub behind: usize,
    pub files: Vec<FileEntry>,
}

impl StatusSummary {
    fn paths_where(&self, pred: impl Fn(&FileEntry) -> bool) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| pred(f))
            .map(|f| f.path.clone())
            .collect()
    }

    pub fn staged(&self) -> Vec<String> {
        self.paths_where(|f| matches!(f.index, 'A' | 'M' | 'D' | 'R' | 'T'))
    }

    pub fn modified(&self) -> Vec<String> {
        self.paths_where(|f| f.index == 'M' || f.working_dir == 'M')
    }

    pub fn not_added(&self) -> Vec<String> {
        self.paths_where(|f| f.working_dir == '?')
    }

    pub fn deleted(&self) -> Vec<String> {
        self.paths_where(|f| f.index == 'D' || f.working_dir == 'D')
    }

    pub fn renamed(&self) -> Vec<String> {
        self.paths_where(|f| f.index == 'R')
    }

    pub fn conflicted(&self) -> Vec<String> {
        self.paths_where(|f| f.index == 'U')
    }

    /// Anything at all that would be lost or carried by a checkout
    pub fn has_changes(&self) -> bool {
        !self.files.is_empty()
    }
}

/// Local and remote-tracking branches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchSummary {
    pub head: Option<String>,
    pub detached: bool,
    pub local: Vec<String>,
    /// Remote-tracking branches as `remotes/<remote>/<name>`
    pub remote: Vec<String>,
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors produced by git tools
///
/// Display strings are the exact messages shown to MCP clients.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("{0} is required and must be a string")]
    MissingField(&'static str),

    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Repository path does not exist: {0}")]
    PathNotFound(String),

    #[error("The path '{0}' is not a git repository")]
    NotARepository(String),

    #[error("Failed to initialize git repository: {0}")]
    RepoInit(String),

    #[error("Invalid branch name: '{0}'")]
    InvalidBranchName(String),

    #[error("Branch '{0}' already exists")]
    BranchExists(String),

    #[error("Base branch '{0}' does not exist")]
    BaseBranchMissing(String),

    #[error("Source branch does not exist: {0}")]
    SourceBranchMissing(String),

    #[error("Target branch does not exist: {0}")]
    TargetBranchMissing(String),

    #[error("Merge conflict occurred. Conflicted files: {}", .0.join(", "))]
    MergeConflict(Vec<String>),

    #[error("maxCount must be a positive number")]
    InvalidMaxCount,

    #[error("Cannot checkout: You have uncommitted changes. Use force option to override.")]
    UncommittedChanges,

    #[error("Cannot push from detached HEAD state. Please checkout a branch first.")]
    DetachedHead,

    #[error("No remote repository configured")]
    NoRemote,

    #[error("Remote \"{0}\" not found")]
    RemoteNotFound(String),

    /// Push failure already translated into a user-facing explanation
    #[error("{0}")]
    PushRejected(String),

    #[error("{context}: {message}")]
    Failed {
        context: &'static str,
        message: String,
    },

    /// git exited unsuccessfully; `output` is what it printed
    #[error("{output}")]
    Command {
        args: String,
        code: Option<i32>,
        output: String,
    },

    #[error("git {args} timed out after {secs}s")]
    Timeout { args: String, secs: u64 },

    #[error("git executable not found: {0}")]
    NotInstalled(String),

    #[error("{}", .0.message())]
    Libgit(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Build a `Command` error from captured output
    ///
    /// stderr comes first; an empty capture becomes `Unknown error`.
    pub fn command(args: impl Into<String>, code: Option<i32>, stdout: &str, stderr: &str) -> Self {
        let output = [stderr.trim(), stdout.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        GitError::Command {
            args: args.into(),
            code,
            output: if output.is_empty() {
                "Unknown error".to_string()
            } else {
                output
            },
        }
    }

    /// Failures of git or libgit2 themselves, as opposed to rejected requests
    pub fn is_underlying(&self) -> bool {
        matches!(
            self,
            GitError::Command { .. }
                | GitError::Timeout { .. }
                | GitError::NotInstalled(_)
                | GitError::Libgit(_)
                | GitError::Io(_)
        )
    }

    /// Prefix underlying failures with `context`; rejected requests pass through.
    pub fn within(self, context: &'static str) -> Self {
        if self.is_underlying() {
            GitError::Failed {
                context,
                message: self.to_string(),
            }
        } else {
            self
        }
    }

    /// git reported a merge conflict in its output
    pub fn mentions_conflict(&self) -> bool {
        match self {
            GitError::Command { output, .. } => {
                output.contains("CONFLICT") || output.contains("conflict")
            }
            _ => false,
        }
    }
}

/// Result type for git operations
pub type GitResult<T> = Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_output() {
        let err = GitError::command("push origin main", Some(1), "", "fatal: boom\n");
        assert_eq!(err.to_string(), "fatal: boom");

        let err = GitError::command("merge f", Some(1), "CONFLICT (content)\n", "");
        assert_eq!(err.to_string(), "CONFLICT (content)");
        assert!(err.mentions_conflict());

        let err = GitError::command("status", Some(128), "  ", "");
        assert_eq!(err.to_string(), "Unknown error");
    }

    #[test]
    fn test_within_wraps_only_underlying_failures() {
        let err = GitError::command("add x", Some(128), "", "fatal: pathspec 'x' did not match")
            .within("Failed to add files");
        assert_eq!(
            err.to_string(),
            "Failed to add files: fatal: pathspec 'x' did not match"
        );

        let err = GitError::BranchExists("dev".into()).within("Failed to create branch");
        assert_eq!(err.to_string(), "Branch 'dev' already exists");
    }

    #[test]
    fn test_precondition_messages() {
        assert_eq!(
            GitError::EmptyField("Repository path").to_string(),
            "Repository path cannot be empty"
        );
        assert_eq!(
            GitError::MissingField("Commit message").to_string(),
            "Commit message is required and must be a string"
        );
        assert_eq!(
            GitError::MergeConflict(vec!["a.txt".into(), "b.txt".into()]).to_string(),
            "Merge conflict occurred. Conflicted files: a.txt, b.txt"
        );
        assert_eq!(
            GitError::RemoteNotFound("upstream".into()).to_string(),
            "Remote \"upstream\" not found"
        );
    }

    #[test]
    fn test_status_categories() {
        let status = StatusSummary {
            files: vec![
                FileEntry { path: "new.rs".into(), index: 'A', working_dir: ' ' },
                FileEntry { path: "both.rs".into(), index: 'M', working_dir: 'M' },
                FileEntry { path: "edit.rs".into(), index: ' ', working_dir: 'M' },
                FileEntry { path: "gone.rs".into(), index: ' ', working_dir: 'D' },
                FileEntry { path: "junk.tmp".into(), index: '?', working_dir: '?' },
                FileEntry { path: "clash.rs".into(), index: 'U', working_dir: 'U' },
            ],
            ..Default::default()
        };

        assert_eq!(status.staged(), vec!["new.rs", "both.rs"]);
        assert_eq!(status.modified(), vec!["both.rs", "edit.rs"]);
        assert_eq!(status.not_added(), vec!["junk.tmp"]);
        assert_eq!(status.deleted(), vec!["gone.rs"]);
        assert_eq!(status.conflicted(), vec!["clash.rs"]);
        assert!(status.has_changes());
        assert!(!StatusSummary::default().has_changes());
    }

    #[test]
    fn test_push_outcome_render() {
        let outcome = PushOutcome {
            success: true,
            remote: "origin".into(),
            branch: "main".into(),
            message: "Successfully pushed 2 commit(s) to origin/main".into(),
            commits: PushedCommits {
                pushed: 2,
                hash: "abc".into(),
                message: "wip".into(),
            },
            tags: vec!["v1".into(), "v2".into()],
            warnings: vec!["Force push was used".into()],
        };

        assert_eq!(
            outcome.render(),
            "Successfully pushed 2 commit(s) to origin/main\n\nWarning: Force push was used\n\nTags pushed: v1, v2"
        );
    }

    #[test]
    fn test_merge_outcome_render() {
        let mut outcome = MergeOutcome {
            source_branch: "feature".into(),
            target_branch: "main".into(),
            merge_type: MergeType::FastForward,
            commit: Some("abc123".into()),
        };
        assert_eq!(
            outcome.render(),
            "Successfully merged feature into main\nMerge type: fast-forward\nCommit: abc123"
        );

        outcome.commit = None;
        outcome.merge_type = MergeType::Squash;
        assert_eq!(
            outcome.render(),
            "Successfully merged feature into main\nMerge type: squash"
        );
    }

    #[test]
    fn test_checkout_result_roundtrip() {
        let result = CheckoutResult {
            success: true,
            previous_branch: "main".into(),
            current_branch: "main".into(),
            message: "Updated 1 path from HEAD".into(),
            modified_files: Some(vec!["a.txt".into()]),
        };
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("\"previousBranch\""));
        assert!(json.contains("\"modifiedFiles\""));
        let back: CheckoutResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
