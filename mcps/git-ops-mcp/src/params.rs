//! Parameter types for git-ops-mcp tools
//!
//! Tools receive their arguments as [`ToolArgs<T>`]: the schema of `T` is
//! what clients see, but the arguments are only parsed inside the handler so
//! that malformed input turns into an ordinary tool reply.

use std::borrow::Cow;
use std::marker::PhantomData;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::types::{GitError, GitResult};

/// Raw tool arguments advertised with the schema of `T`
pub struct ToolArgs<T> {
    raw: Value,
    _params: PhantomData<fn() -> T>,
}

impl<T> ToolArgs<T> {
    pub fn new(raw: Value) -> Self {
        Self {
            raw,
            _params: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> ToolArgs<T> {
    /// Parse into `T`; shape mismatches become `Invalid parameters: ...`
    pub fn parse(self) -> GitResult<T> {
        serde_json::from_value(self.raw).map_err(|e| GitError::InvalidParams(e.to_string()))
    }
}

impl<T> std::fmt::Debug for ToolArgs<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ToolArgs").field(&self.raw).finish()
    }
}

impl<'de, T> Deserialize<'de> for ToolArgs<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::new)
    }
}

impl<T: JsonSchema> JsonSchema for ToolArgs<T> {
    fn schema_name() -> Cow<'static, str> {
        T::schema_name()
    }

    fn schema_id() -> Cow<'static, str> {
        T::schema_id()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        T::json_schema(generator)
    }
}

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Files to stage (default: everything)
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitParams {
    /// Path to the git repository
    #[schemars(with = "String")]
    pub repo_path: Option<Value>,
    /// Commit message
    #[schemars(with = "String")]
    pub message: Option<Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusParams {
    /// Path to the git repository
    #[schemars(with = "String")]
    pub repo_path: Option<Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchCreateParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Name of the branch to create
    #[schemars(with = "String")]
    pub branch_name: Option<Value>,
    /// Branch to start from (default: current branch)
    #[serde(default)]
    pub base_branch: Option<String>,
    /// Check out the new branch after creating it
    #[serde(default)]
    pub checkout: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchListParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Include remote-tracking branches
    #[serde(default)]
    pub include_remote: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    /// Fast-forward when possible, merge commit otherwise
    #[default]
    Merge,
    /// Refuse anything but a fast-forward
    FastForward,
    /// Squash the source into a single commit
    Squash,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BranchMergeParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Branch to merge from
    pub source_branch: String,
    /// Branch to merge into (default: current branch)
    #[serde(default)]
    pub target_branch: Option<String>,
    /// Merge strategy: "merge", "fast-forward" or "squash"
    #[serde(default)]
    pub strategy: Option<MergeStrategy>,
    /// Commit message for the merge
    #[serde(default)]
    pub message: Option<String>,
    /// Stop before creating the merge commit
    #[serde(default)]
    pub no_commit: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Maximum number of commits to return (default: 10)
    #[serde(default)]
    pub max_count: Option<i64>,
    /// Branch to read history from (default: HEAD)
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Branch, tag or commit to check out
    #[schemars(with = "String")]
    pub target: Option<Value>,
    /// Discard local changes
    #[serde(default)]
    pub force: bool,
    /// Restore only these paths from the target
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushParams {
    /// Path to the git repository
    pub repo_path: String,
    /// Remote to push to (default: origin)
    #[serde(default)]
    pub remote: Option<String>,
    /// Branch to push (default: current branch)
    #[serde(default)]
    pub branch: Option<String>,
    /// Push all tags as well
    #[serde(default)]
    pub tags: bool,
    /// Force the update
    #[serde(default)]
    pub force: bool,
    /// Record the remote branch as upstream
    #[serde(default)]
    pub set_upstream: bool,
    /// Delete the branch on the remote instead of pushing it
    #[serde(default)]
    pub delete_remote: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_camel_case() {
        let args: ToolArgs<PushParams> = ToolArgs::new(json!({
            "repoPath": "/tmp/r",
            "setUpstream": true,
            "deleteRemote": false,
        }));
        let params = args.parse().unwrap();
        assert_eq!(params.repo_path, "/tmp/r");
        assert!(params.set_upstream);
        assert!(!params.force);
        assert!(params.remote.is_none());
    }

    #[test]
    fn test_parse_shape_error() {
        let args: ToolArgs<AddParams> = ToolArgs::new(json!({
            "repoPath": "/tmp/r",
            "files": "README.md",
        }));
        let err = args.parse().unwrap_err();
        assert!(matches!(err, GitError::InvalidParams(_)));
        assert!(err.to_string().starts_with("Invalid parameters: "));
    }

    #[test]
    fn test_parse_missing_required_field() {
        let args: ToolArgs<BranchMergeParams> = ToolArgs::new(json!({ "repoPath": "/tmp/r" }));
        let err = args.parse().unwrap_err();
        assert!(err.to_string().contains("sourceBranch"));
    }

    #[test]
    fn test_loose_fields_accept_any_json() {
        let args: ToolArgs<CommitParams> = ToolArgs::new(json!({ "repoPath": 7 }));
        let params = args.parse().unwrap();
        assert_eq!(params.repo_path, Some(json!(7)));
        assert!(params.message.is_none());
    }

    #[test]
    fn test_merge_strategy_names() {
        let args: ToolArgs<BranchMergeParams> = ToolArgs::new(json!({
            "repoPath": "/tmp/r",
            "sourceBranch": "feature",
            "strategy": "fast-forward",
        }));
        assert_eq!(args.parse().unwrap().strategy, Some(MergeStrategy::FastForward));

        let args: ToolArgs<BranchMergeParams> = ToolArgs::new(json!({
            "repoPath": "/tmp/r",
            "sourceBranch": "feature",
            "strategy": "octopus",
        }));
        assert!(matches!(args.parse(), Err(GitError::InvalidParams(_))));
    }

    #[test]
    fn test_schema_is_advertised() {
        let schema = schemars::schema_for!(ToolArgs<CheckoutParams>);
        let value = serde_json::to_value(&schema).unwrap();
        let properties = &value["properties"];
        assert_eq!(properties["repoPath"]["type"], "string");
        assert_eq!(properties["target"]["type"], "string");
        assert!(properties.get("files").is_some());
    }
}
