//! git_commit

use mcp_common::{text_success, CallToolResult};
use tracing::info;

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{CommitParams, ToolArgs};
use crate::repository::RepoSession;
use crate::types::{CommitOutcome, CommitSummary, GitResult};
use crate::validation::{required_string, required_verbatim, COMMIT_MESSAGE, REPOSITORY_PATH};

pub const NOTHING_TO_COMMIT: &str = "No changes to commit. Working tree is clean.";

pub async fn handle(ctx: &ToolContext, args: ToolArgs<CommitParams>) -> CallToolResult {
    respond(run(ctx, args).await, ErrorStyle::Prefixed, |outcome| match outcome {
        CommitOutcome::Clean => text_success(NOTHING_TO_COMMIT),
        CommitOutcome::Created(summary) => text_success(summary.render()),
    })
}

async fn run(ctx: &ToolContext, args: ToolArgs<CommitParams>) -> GitResult<CommitOutcome> {
    let params = args.parse()?;
    let message = required_verbatim(params.message.as_ref(), COMMIT_MESSAGE)?;
    let repo_path = required_string(params.repo_path.as_ref(), REPOSITORY_PATH)?;
    let session = ctx.open(&repo_path)?;
    commit(&session, &message).await
}

/// Stage everything and commit it with `message`
pub async fn commit(session: &RepoSession, message: &str) -> GitResult<CommitOutcome> {
    let status = session.inspect(inspect::status)?;
    if !status.has_changes() {
        return Ok(CommitOutcome::Clean);
    }

    session.git(&["add", "."]).await?;
    session.git(&["commit", "-m", message]).await?;

    let head = session.inspect(inspect::head_commit)?;
    info!(hash = %head.hash, files = head.files_changed, "commit created");

    Ok(CommitOutcome::Created(CommitSummary {
        hash: head.hash,
        message: message.to_string(),
        files_changed: head.files_changed,
        insertions: head.insertions,
        deletions: head.deletions,
    }))
}
