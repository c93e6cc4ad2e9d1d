//! Result envelope helpers
//!
//! Every tool answers with a single text block. Failures are still
//! well-formed tool results (flagged with `isError`) rather than protocol
//! errors.

use rmcp::model::{CallToolResult, Content, RawContent};
use serde::Serialize;

/// Successful plain text response
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Successful response carrying pretty-printed JSON
///
/// Serialization failures are reported as a failed tool result instead of
/// bubbling up to the transport.
pub fn json_success<T: Serialize>(data: &T) -> CallToolResult {
    match serde_json::to_string_pretty(data) {
        Ok(json) => text_success(json),
        Err(e) => text_failure(format!("failed to serialize result: {e}")),
    }
}

/// Failed tool result with a single text block
pub fn text_failure(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

/// Text of the first text block in a result, if any
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result.content.iter().find_map(|content| match &content.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}
