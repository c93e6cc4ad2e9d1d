//! git_push

use mcp_common::{text_success, CallToolResult};
use tracing::info;

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{PushParams, ToolArgs};
use crate::repository::RepoSession;
use crate::types::{GitError, GitResult, PushOutcome, PushedCommits};

const CONTEXT: &str = "Push failed";

pub const AUTH_FAILED: &str = "Authentication failed. Please check your credentials or SSH keys.";
pub const HOST_UNREACHABLE: &str =
    "Network error: Could not resolve host. Please check your internet connection.";
pub const NON_FAST_FORWARD: &str =
    "Push rejected: non-fast-forward update. Pull the latest changes or use force push.";

#[derive(Debug, Clone, Default)]
pub struct PushRequest {
    pub remote: String,
    /// Defaults to the current branch
    pub branch: Option<String>,
    pub tags: bool,
    pub force: bool,
    pub set_upstream: bool,
    pub delete_remote: bool,
}

pub async fn handle(ctx: &ToolContext, args: ToolArgs<PushParams>) -> CallToolResult {
    respond(run(ctx, args).await, ErrorStyle::Bare, |outcome| {
        text_success(outcome.render())
    })
}

async fn run(ctx: &ToolContext, args: ToolArgs<PushParams>) -> GitResult<PushOutcome> {
    let params = args.parse()?;
    let session = ctx.open(&params.repo_path)?;
    let request = PushRequest {
        remote: params
            .remote
            .unwrap_or_else(|| ctx.defaults.remote.clone()),
        branch: params.branch,
        tags: params.tags,
        force: params.force,
        set_upstream: params.set_upstream,
        delete_remote: params.delete_remote,
    };
    push(&session, &request).await
}

/// Arguments for `git push`
pub fn push_args(branch: &str, request: &PushRequest) -> Vec<String> {
    let mut args = vec!["push".to_string(), request.remote.clone()];
    if request.delete_remote {
        args.push("--delete".to_string());
        args.push(branch.to_string());
        return args;
    }

    args.push(branch.to_string());
    if request.force {
        args.push("--force".to_string());
    }
    if request.set_upstream {
        args.push("--set-upstream".to_string());
    }
    if request.tags {
        args.push("--tags".to_string());
    }
    args
}

/// Map well-known push failures to actionable messages
pub fn translate_push_error(err: GitError) -> GitError {
    if !err.is_underlying() {
        return err;
    }

    let text = err.to_string();
    if text.contains("Authentication failed")
        || text.contains("could not read Username")
        || text.contains("Permission denied (publickey)")
    {
        GitError::PushRejected(AUTH_FAILED.to_string())
    } else if text.contains("Could not resolve host") {
        GitError::PushRejected(HOST_UNREACHABLE.to_string())
    } else if text.contains("non-fast-forward") || text.contains("[rejected]") {
        GitError::PushRejected(NON_FAST_FORWARD.to_string())
    } else {
        err.within(CONTEXT)
    }
}

pub async fn push(session: &RepoSession, request: &PushRequest) -> GitResult<PushOutcome> {
    let head = session
        .inspect(inspect::head_state)
        .map_err(|e| e.within(CONTEXT))?;
    if head.detached {
        return Err(GitError::DetachedHead);
    }

    let branch = request
        .branch
        .clone()
        .or(head.branch)
        .unwrap_or_else(|| "main".to_string());
    let remote = request.remote.as_str();

    let remotes = session
        .inspect(inspect::remotes)
        .map_err(|e| e.within(CONTEXT))?;
    if remotes.is_empty() {
        return Err(GitError::NoRemote);
    }
    if !remotes.iter().any(|r| r == remote) {
        return Err(GitError::RemoteNotFound(remote.to_string()));
    }

    let ahead = if request.delete_remote {
        None
    } else {
        session
            .inspect(|repo| inspect::unpushed_count(repo, remote, &branch))
            .map_err(|e| e.within(CONTEXT))?
    };

    if !request.delete_remote && !request.tags && ahead == Some(0) {
        info!(%remote, %branch, "nothing to push");
        return Ok(PushOutcome {
            success: true,
            remote: remote.to_string(),
            branch,
            message: "Already up to date".to_string(),
            commits: PushedCommits::default(),
            tags: Vec::new(),
            warnings: Vec::new(),
        });
    }

    session
        .git(&push_args(&branch, request))
        .await
        .map_err(translate_push_error)?;

    if request.delete_remote {
        info!(%remote, %branch, "remote branch deleted");
        return Ok(PushOutcome {
            success: true,
            remote: remote.to_string(),
            message: format!("Successfully deleted remote branch \"{branch}\" from \"{remote}\""),
            branch,
            commits: PushedCommits::default(),
            tags: Vec::new(),
            warnings: Vec::new(),
        });
    }

    let ((hash, summary), tags) = session
        .inspect(|repo| {
            let tip = inspect::branch_tip(repo, &branch)?;
            let tags = if request.tags {
                inspect::tag_names(repo)?
            } else {
                Vec::new()
            };
            Ok((tip, tags))
        })
        .map_err(|e| e.within(CONTEXT))?;

    let pushed = ahead.filter(|n| *n > 0).unwrap_or(1);
    let mut warnings = Vec::new();
    if request.force {
        warnings.push("Force push was used".to_string());
    }

    info!(%remote, %branch, pushed, "push complete");
    Ok(PushOutcome {
        success: true,
        remote: remote.to_string(),
        message: format!("Successfully pushed {pushed} commit(s) to {remote}/{branch}"),
        branch,
        commits: PushedCommits {
            pushed,
            hash,
            message: summary,
        },
        tags,
        warnings,
    })
}
