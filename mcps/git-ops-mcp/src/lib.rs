//! Git Ops MCP Library
//!
//! Git add, commit, status, branch, merge, log, checkout and push exposed as
//! MCP tools. Changes go through the `git` executable; reads go through
//! libgit2.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use git_ops_mcp::GitOpsMcpServer;
//! use mcp_common::EmbeddableMcp;
//!
//! let server = GitOpsMcpServer::new();
//! let reply = server
//!     .call_tool_text("git_log", serde_json::json!({ "repoPath": ".", "maxCount": 5 }))
//!     .await?;
//! ```

pub mod config;
pub mod git;
pub mod handlers;
pub mod params;
pub mod repository;
pub mod server;
pub mod types;
pub mod validation;

pub use config::Config;
pub use repository::RepoSession;
pub use server::GitOpsMcpServer;
pub use types::{GitError, GitResult};
