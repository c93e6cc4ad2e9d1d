//! In-process tool execution
//!
//! [`EmbeddableMcp`] lets a host call a server's tools directly, without
//! spawning it as a subprocess. Integration tests drive servers through the
//! same entry point.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//! use git_ops_mcp::GitOpsMcpServer;
//!
//! let server = GitOpsMcpServer::new();
//! let reply = server
//!     .call_tool_text("git_status", serde_json::json!({ "repoPath": "." }))
//!     .await?;
//! println!("{}", reply.text);
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

use crate::result::first_text;

/// Errors raised by the in-process call path itself
///
/// Domain failures of a tool are not errors here: they come back as a
/// `CallToolResult` with `is_error` set.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("tool {0} returned no text content")]
    NoTextContent(String),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// Text reply of a tool call along with its error flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolText {
    pub is_error: bool,
    pub text: String,
}

/// An MCP server whose tools can be called in-process
///
/// Servers built on `#[tool_router]` implement `list_tools` by delegating to
/// `self.tool_router.list_all()` and `call_tool` with a match on the tool
/// name.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used to identify the server in host configuration
    fn server_name(&self) -> &str;

    /// All registered tools with their input schemas
    fn list_tools(&self) -> Vec<Tool>;

    /// Run the named tool with raw JSON arguments
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }

    fn tool_names(&self) -> Vec<String> {
        self.list_tools()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    /// Run a tool and return the text of its first text block
    async fn call_tool_text(&self, name: &str, params: Value) -> EmbeddableResult<ToolText> {
        let result = self.call_tool(name, params).await?;
        let text = first_text(&result)
            .ok_or_else(|| EmbeddableError::NoTextContent(name.to_string()))?
            .to_string();

        Ok(ToolText {
            is_error: result.is_error.unwrap_or(false),
            text,
        })
    }
}
