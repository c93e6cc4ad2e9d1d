//! git_checkout

use mcp_common::{json_success, CallToolResult};
use tracing::info;

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{CheckoutParams, ToolArgs};
use crate::repository::RepoSession;
use crate::types::{CheckoutResult, GitError, GitResult};
use crate::validation::{required_string, TARGET};

const CHECKOUT_FAILED: &str = "Checkout failed";
const OPERATION_FAILED: &str = "Git checkout failed";

pub async fn handle(ctx: &ToolContext, args: ToolArgs<CheckoutParams>) -> CallToolResult {
    respond(run(ctx, args).await, ErrorStyle::Prefixed, |result| {
        json_success(&result)
    })
}

async fn run(ctx: &ToolContext, args: ToolArgs<CheckoutParams>) -> GitResult<CheckoutResult> {
    let params = args.parse()?;
    let target = required_string(params.target.as_ref(), TARGET)?;
    let session = ctx.open(&params.repo_path)?;
    checkout(&session, &target, params.force, params.files.as_deref()).await
}

/// Arguments for `git checkout`
pub fn checkout_args(target: &str, force: bool, files: Option<&[String]>) -> Vec<String> {
    let mut args = vec!["checkout".to_string()];
    match files {
        Some(files) if !files.is_empty() => {
            args.push(target.to_string());
            args.push("--".to_string());
            args.extend(files.iter().cloned());
        }
        _ => {
            if force {
                args.push("--force".to_string());
            }
            args.push(target.to_string());
        }
    }
    args
}

/// Switch to `target`, or restore `files` from it
pub async fn checkout(
    session: &RepoSession,
    target: &str,
    force: bool,
    files: Option<&[String]>,
) -> GitResult<CheckoutResult> {
    let previous = session
        .inspect(|repo| Ok(inspect::head_state(repo)?.abbrev()))
        .map_err(|e| e.within(OPERATION_FAILED))?;

    if let Some(files) = files.filter(|f| !f.is_empty()) {
        session
            .git(&checkout_args(target, force, Some(files)))
            .await
            .map_err(|e| e.within(CHECKOUT_FAILED))?;

        let noun = if files.len() == 1 { "path" } else { "paths" };
        info!(source = %target, count = files.len(), "paths restored");
        return Ok(CheckoutResult {
            success: true,
            previous_branch: previous.clone(),
            current_branch: previous,
            message: format!("Updated {} {} from {}", files.len(), noun, target),
            modified_files: Some(files.to_vec()),
        });
    }

    if !force {
        let status = session
            .inspect(inspect::status)
            .map_err(|e| e.within(OPERATION_FAILED))?;
        if status.has_changes() {
            return Err(GitError::UncommittedChanges);
        }
    }

    if previous == target {
        return Ok(CheckoutResult {
            success: true,
            previous_branch: previous.clone(),
            current_branch: previous,
            message: format!("Already on '{target}'"),
            modified_files: None,
        });
    }

    session
        .git(&checkout_args(target, force, None))
        .await
        .map_err(|e| e.within(CHECKOUT_FAILED))?;

    let (head, short) = session
        .inspect(|repo| Ok((inspect::head_state(repo)?, inspect::short_head(repo)?)))
        .map_err(|e| e.within(OPERATION_FAILED))?;

    let (current_branch, message) = match head.branch {
        Some(branch) if !head.detached => {
            let message = format!("Switched to branch '{branch}'");
            (branch, message)
        }
        _ => ("HEAD".to_string(), format!("HEAD is now at {short}")),
    };

    info!(from = %previous, to = %current_branch, "checked out");
    Ok(CheckoutResult {
        success: true,
        previous_branch: previous,
        current_branch,
        message,
        modified_files: None,
    })
}
