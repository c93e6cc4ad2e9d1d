//! git_log

use git2::{BranchType, Repository};
use mcp_common::{json_success, CallToolResult};
use tracing::debug;

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{LogParams, ToolArgs};
use crate::repository::RepoSession;
use crate::types::{GitError, GitResult, LogResult};

const CONTEXT: &str = "Git log failed";

pub async fn handle(ctx: &ToolContext, args: ToolArgs<LogParams>) -> CallToolResult {
    respond(run(ctx, args), ErrorStyle::Prefixed, |result| json_success(&result))
}

fn run(ctx: &ToolContext, args: ToolArgs<LogParams>) -> GitResult<LogResult> {
    let params = args.parse()?;
    let max_count = match params.max_count {
        Some(n) if n <= 0 => return Err(GitError::InvalidMaxCount),
        Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        None => ctx.defaults.log_count,
    };
    let session = ctx.open(&params.repo_path)?;
    history(&session, params.branch.as_deref(), max_count)
}

/// Full ref name for a branch given as `name`, local first, then `origin/name`
fn resolve_branch(repo: &Repository, branch: &str) -> GitResult<String> {
    if let Ok(local) = repo.find_branch(branch, BranchType::Local) {
        if let Some(name) = local.get().name() {
            return Ok(name.to_string());
        }
    }

    let remote = format!("refs/remotes/origin/{branch}");
    if repo.find_reference(&remote).is_ok() {
        return Ok(remote);
    }

    Err(GitError::Failed {
        context: CONTEXT,
        message: format!("branch not found: {branch}"),
    })
}

/// Up to `max_count` commits, newest first; empty for a repository without commits
pub fn history(session: &RepoSession, branch: Option<&str>, max_count: usize) -> GitResult<LogResult> {
    session
        .inspect(|repo| {
            if inspect::is_unborn(repo)? {
                debug!("repository has no commits");
                return Ok(LogResult::default());
            }

            let start = branch.map(|b| resolve_branch(repo, b)).transpose()?;
            let logs = inspect::log(repo, start.as_deref(), max_count)?;
            Ok(LogResult { logs })
        })
        .map_err(|e| e.within(CONTEXT))
}
