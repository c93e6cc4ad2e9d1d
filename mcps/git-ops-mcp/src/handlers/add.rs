//! git_add

use mcp_common::{json_success, CallToolResult};
use tracing::info;

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{AddParams, ToolArgs};
use crate::repository::RepoSession;
use crate::types::{AddResult, GitResult};

const CONTEXT: &str = "Failed to add files";

pub async fn handle(ctx: &ToolContext, args: ToolArgs<AddParams>) -> CallToolResult {
    respond(run(ctx, args).await, ErrorStyle::Prefixed, |result| {
        json_success(&result)
    })
}

async fn run(ctx: &ToolContext, args: ToolArgs<AddParams>) -> GitResult<AddResult> {
    let params = args.parse()?;
    let session = ctx.open(&params.repo_path)?;
    add(&session, params.files.as_deref()).await
}

/// `git add <files...>`, or `git add .`
pub fn add_args(files: Option<&[String]>) -> Vec<String> {
    let mut args = vec!["add".to_string()];
    match files {
        Some(files) if !files.is_empty() => args.extend(files.iter().cloned()),
        _ => args.push(".".to_string()),
    }
    args
}

/// Stage `files` (everything when absent) and report what is staged now
pub async fn add(session: &RepoSession, files: Option<&[String]>) -> GitResult<AddResult> {
    session
        .git(&add_args(files))
        .await
        .map_err(|e| e.within(CONTEXT))?;

    let status = session
        .inspect(inspect::status)
        .map_err(|e| e.within(CONTEXT))?;

    let added_files: Vec<String> = status
        .files
        .iter()
        .filter(|f| f.is_staged())
        .map(|f| f.path.clone())
        .collect();

    info!(count = added_files.len(), "files staged");
    Ok(AddResult {
        file_count: added_files.len(),
        added_files,
    })
}
