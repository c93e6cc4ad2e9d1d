//! git_branch_create

use mcp_common::{json_success, CallToolResult};
use tracing::info;

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{BranchCreateParams, ToolArgs};
use crate::repository::RepoSession;
use crate::types::{BranchCreateResult, GitError, GitResult};
use crate::validation::{required_string, validate_branch_name, BRANCH_NAME};

const CONTEXT: &str = "Failed to create branch";

pub async fn handle(ctx: &ToolContext, args: ToolArgs<BranchCreateParams>) -> CallToolResult {
    respond(run(ctx, args).await, ErrorStyle::Prefixed, |result| {
        json_success(&result)
    })
}

async fn run(ctx: &ToolContext, args: ToolArgs<BranchCreateParams>) -> GitResult<BranchCreateResult> {
    let params = args.parse()?;
    let name = required_string(params.branch_name.as_ref(), BRANCH_NAME)?;
    validate_branch_name(&name)?;
    let session = ctx.open(&params.repo_path)?;
    create_branch(&session, &name, params.base_branch.as_deref(), params.checkout).await
}

/// Create `name` from `base` (current branch by default)
pub async fn create_branch(
    session: &RepoSession,
    name: &str,
    base: Option<&str>,
    checkout: bool,
) -> GitResult<BranchCreateResult> {
    let (exists, base_branch, base_found) = session
        .inspect(|repo| {
            let exists = inspect::local_branch_exists(repo, name);
            match base {
                Some(base) => Ok((exists, base.to_string(), inspect::branch_exists(repo, base))),
                None => Ok((exists, inspect::head_state(repo)?.abbrev(), true)),
            }
        })
        .map_err(|e| e.within(CONTEXT))?;

    if exists {
        return Err(GitError::BranchExists(name.to_string()));
    }
    if !base_found {
        return Err(GitError::BaseBranchMissing(base_branch));
    }

    session
        .git(&["branch", name, base_branch.as_str()])
        .await
        .map_err(|e| e.within(CONTEXT))?;

    if checkout {
        session
            .git(&["checkout", name])
            .await
            .map_err(|e| e.within(CONTEXT))?;
    }

    let mut message = format!("Created branch '{name}' from '{base_branch}'");
    if checkout {
        message.push_str(" and checked out");
    }
    info!(branch = name, base = %base_branch, checkout, "branch created");

    Ok(BranchCreateResult {
        success: true,
        branch_name: name.to_string(),
        base_branch,
        message,
        checked_out: checkout,
    })
}
