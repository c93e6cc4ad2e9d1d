//! MCP server exposing the git tools
//!
//! Each tool delegates to its handler module; handlers never fail at the
//! protocol level, so every `Result` here is `Ok`.

use mcp_common::{
    async_trait, CallToolResult, EmbeddableError, EmbeddableMcp, EmbeddableResult, McpError, Tool,
};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde_json::Value;

use crate::config::Config;
use crate::handlers::{self, ToolContext};
use crate::params::*;

/// The git-ops MCP server
#[derive(Clone)]
pub struct GitOpsMcpServer {
    context: ToolContext,
    tool_router: ToolRouter<Self>,
}

impl Default for GitOpsMcpServer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tool Router - Each tool delegates to its handler
// ============================================================================

#[tool_router]
impl GitOpsMcpServer {
    /// Server with built-in defaults
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            context: ToolContext::from_config(config),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Stage files for commit. Stages all changes when no files are given and reports every file now in the index."
    )]
    async fn git_add(
        &self,
        Parameters(args): Parameters<ToolArgs<AddParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::add::handle(&self.context, args).await)
    }

    #[tool(
        description = "Stage all changes and create a commit with the given message. Reports the commit hash and diff stats."
    )]
    async fn git_commit(
        &self,
        Parameters(args): Parameters<ToolArgs<CommitParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::commit::handle(&self.context, args).await)
    }

    #[tool(
        description = "Show the current branch, staged, modified and untracked files, and how far the branch is ahead of or behind its upstream."
    )]
    async fn git_status(
        &self,
        Parameters(args): Parameters<ToolArgs<StatusParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::status::handle(&self.context, args).await)
    }

    #[tool(
        description = "Create a new branch from a base branch (default: current branch), optionally checking it out."
    )]
    async fn git_branch_create(
        &self,
        Parameters(args): Parameters<ToolArgs<BranchCreateParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::branch_create::handle(&self.context, args).await)
    }

    #[tool(description = "List local branches and the current branch, optionally with remote-tracking branches.")]
    async fn git_branch_list(
        &self,
        Parameters(args): Parameters<ToolArgs<BranchListParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::branch_list::handle(&self.context, args).await)
    }

    #[tool(
        description = "Merge a source branch into a target branch (default: current) using a plain, fast-forward-only or squash strategy. Reports conflicted files on conflict."
    )]
    async fn git_branch_merge(
        &self,
        Parameters(args): Parameters<ToolArgs<BranchMergeParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::branch_merge::handle(&self.context, args).await)
    }

    #[tool(description = "Show recent commits (hash, date, message, author, email) for HEAD or a branch.")]
    async fn git_log(
        &self,
        Parameters(args): Parameters<ToolArgs<LogParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::log::handle(&self.context, args).await)
    }

    #[tool(
        description = "Check out a branch, tag or commit, or restore specific files from it. Refuses to switch over uncommitted changes unless forced."
    )]
    async fn git_checkout(
        &self,
        Parameters(args): Parameters<ToolArgs<CheckoutParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::checkout::handle(&self.context, args).await)
    }

    #[tool(
        description = "Push a branch to a remote (default: origin), with optional force, set-upstream, tags, or deletion of the remote branch."
    )]
    async fn git_push(
        &self,
        Parameters(args): Parameters<ToolArgs<PushParams>>,
    ) -> Result<CallToolResult, McpError> {
        Ok(handlers::push::handle(&self.context, args).await)
    }
}

#[tool_handler]
impl rmcp::ServerHandler for GitOpsMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Git operations on local repositories: stage, commit, inspect status and \
                 history, create, list and merge branches, check out, and push. Every tool \
                 takes the repository path as repoPath."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// ============================================================================
// EmbeddableMcp Implementation
// ============================================================================

#[async_trait]
impl EmbeddableMcp for GitOpsMcpServer {
    fn server_name(&self) -> &str {
        "git-ops"
    }

    fn server_description(&self) -> Option<&str> {
        Some("Git add, commit, status, branch, merge, log, checkout and push tools")
    }

    fn list_tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult> {
        let result = match name {
            "git_add" => self.git_add(Parameters(ToolArgs::new(params))).await,
            "git_commit" => self.git_commit(Parameters(ToolArgs::new(params))).await,
            "git_status" => self.git_status(Parameters(ToolArgs::new(params))).await,
            "git_branch_create" => {
                self.git_branch_create(Parameters(ToolArgs::new(params)))
                    .await
            }
            "git_branch_list" => self.git_branch_list(Parameters(ToolArgs::new(params))).await,
            "git_branch_merge" => {
                self.git_branch_merge(Parameters(ToolArgs::new(params)))
                    .await
            }
            "git_log" => self.git_log(Parameters(ToolArgs::new(params))).await,
            "git_checkout" => self.git_checkout(Parameters(ToolArgs::new(params))).await,
            "git_push" => self.git_push(Parameters(ToolArgs::new(params))).await,
            _ => return Err(EmbeddableError::ToolNotFound(name.to_string())),
        };
        result.map_err(Into::into)
    }
}
