//! Shared building blocks for MCP servers
//!
//! - **Tracing**: [`init_tracing`] with a config-driven [`LoggingConfig`]
//! - **Results**: helpers producing the single-text-block result envelope
//! - **Embedding**: the [`EmbeddableMcp`] trait for in-process tool calls

pub mod embeddable;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult, ToolText};
pub use init::{init_tracing, LogFormat, LoggingConfig};
pub use result::{first_text, json_success, text_failure, text_success};

pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
