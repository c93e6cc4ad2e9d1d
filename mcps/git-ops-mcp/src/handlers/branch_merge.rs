//! git_branch_merge

use mcp_common::{text_success, CallToolResult};
use tracing::{info, warn};

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{BranchMergeParams, MergeStrategy, ToolArgs};
use crate::repository::RepoSession;
use crate::types::{GitError, GitResult, MergeOutcome, MergeType};

const MERGE_FAILED: &str = "Failed to merge branch";
const OPERATION_FAILED: &str = "Merge operation failed";

#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    pub source: String,
    /// Defaults to the current branch
    pub target: Option<String>,
    pub strategy: MergeStrategy,
    pub message: Option<String>,
    pub no_commit: bool,
}

impl From<BranchMergeParams> for MergeRequest {
    fn from(params: BranchMergeParams) -> Self {
        Self {
            source: params.source_branch,
            target: params.target_branch,
            strategy: params.strategy.unwrap_or_default(),
            message: params.message,
            no_commit: params.no_commit,
        }
    }
}

pub async fn handle(ctx: &ToolContext, args: ToolArgs<BranchMergeParams>) -> CallToolResult {
    respond(run(ctx, args).await, ErrorStyle::Bare, |outcome| {
        text_success(outcome.render())
    })
}

async fn run(ctx: &ToolContext, args: ToolArgs<BranchMergeParams>) -> GitResult<MergeOutcome> {
    let params = args.parse()?;
    let session = ctx.open(&params.repo_path)?;
    merge(&session, &MergeRequest::from(params)).await
}

/// Arguments for `git merge`
///
/// A message is only passed for non-squash merges; squash merges are
/// committed separately.
pub fn merge_args(
    source: &str,
    strategy: MergeStrategy,
    message: Option<&str>,
    no_commit: bool,
) -> Vec<String> {
    let mut args = vec!["merge".to_string(), source.to_string()];
    match strategy {
        MergeStrategy::FastForward => args.push("--ff-only".to_string()),
        MergeStrategy::Squash => args.push("--squash".to_string()),
        MergeStrategy::Merge => {}
    }
    if let Some(message) = message.filter(|_| strategy != MergeStrategy::Squash) {
        args.push("-m".to_string());
        args.push(message.to_string());
    }
    if no_commit {
        args.push("--no-commit".to_string());
    }
    args
}

pub async fn merge(session: &RepoSession, request: &MergeRequest) -> GitResult<MergeOutcome> {
    let (head, local) = session
        .inspect(|repo| Ok((inspect::head_state(repo)?, inspect::branches(repo)?.local)))
        .map_err(|e| e.within(OPERATION_FAILED))?;

    let current = head.abbrev();
    let target = request.target.clone().unwrap_or_else(|| current.clone());

    if !local.contains(&request.source) {
        return Err(GitError::SourceBranchMissing(request.source.clone()));
    }
    if !local.contains(&target) {
        return Err(GitError::TargetBranchMissing(target));
    }

    if target != current {
        session
            .git(&["checkout", target.as_str()])
            .await
            .map_err(|e| e.within(OPERATION_FAILED))?;
    }

    let args = merge_args(
        &request.source,
        request.strategy,
        request.message.as_deref(),
        request.no_commit,
    );

    let output = match session.git(&args).await {
        Ok(output) => output,
        Err(e) if e.mentions_conflict() => {
            let conflicted = session
                .inspect(|repo| Ok(inspect::status(repo)?.conflicted()))
                .map_err(|e| e.within(MERGE_FAILED))?;
            warn!(files = ?conflicted, "merge stopped on conflicts");
            return Err(GitError::MergeConflict(conflicted));
        }
        Err(e) => return Err(e.within(MERGE_FAILED)),
    };

    let merge_type = if request.strategy == MergeStrategy::Squash {
        MergeType::Squash
    } else if output.contains("Fast-forward") {
        MergeType::FastForward
    } else {
        MergeType::Merge
    };

    if merge_type == MergeType::Squash && !request.no_commit {
        let message = request
            .message
            .clone()
            .unwrap_or_else(|| format!("Squashed commit from {}", request.source));
        session
            .git(&["commit", "-m", message.as_str()])
            .await
            .map_err(|e| e.within(MERGE_FAILED))?;
    }

    let commit = if request.no_commit {
        None
    } else {
        Some(
            session
                .inspect(inspect::head_hash)
                .map_err(|e| e.within(OPERATION_FAILED))?,
        )
    };

    info!(source = %request.source, target = %target, %merge_type, "merge complete");
    Ok(MergeOutcome {
        source_branch: request.source.clone(),
        target_branch: target,
        merge_type,
        commit,
    })
}
