//! git_branch_list

use mcp_common::{json_success, CallToolResult};

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{BranchListParams, ToolArgs};
use crate::repository::RepoSession;
use crate::types::{BranchListResult, BranchSummary, GitResult};

pub const DETACHED_MARKER: &str = "HEAD (detached)";

pub async fn handle(ctx: &ToolContext, args: ToolArgs<BranchListParams>) -> CallToolResult {
    respond(run(ctx, args), ErrorStyle::Prefixed, |result| json_success(&result))
}

fn run(ctx: &ToolContext, args: ToolArgs<BranchListParams>) -> GitResult<BranchListResult> {
    let params = args.parse()?;
    let session = ctx.open(&params.repo_path)?;
    list_branches(&session, params.include_remote)
}

pub fn list_branches(session: &RepoSession, include_remote: bool) -> GitResult<BranchListResult> {
    let summary = session
        .inspect(inspect::branches)
        .map_err(|e| e.within("Failed to get branch list"))?;
    Ok(to_result(summary, include_remote))
}

fn to_result(summary: BranchSummary, include_remote: bool) -> BranchListResult {
    let current = if summary.detached {
        DETACHED_MARKER.to_string()
    } else {
        summary.head.unwrap_or_default()
    };

    BranchListResult {
        current,
        local: summary.local,
        remote: include_remote.then_some(summary.remote),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> BranchSummary {
        BranchSummary {
            head: Some("main".into()),
            detached: false,
            local: vec!["feature".into(), "main".into()],
            remote: vec!["remotes/origin/main".into()],
        }
    }

    #[test]
    fn test_remote_only_when_requested() {
        let result = to_result(summary(), false);
        assert_eq!(result.current, "main");
        assert!(result.remote.is_none());
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("remote\""));

        let result = to_result(summary(), true);
        assert_eq!(result.remote, Some(vec!["remotes/origin/main".to_string()]));
    }

    #[test]
    fn test_detached_marker() {
        let mut detached = summary();
        detached.head = None;
        detached.detached = true;
        assert_eq!(to_result(detached, false).current, "HEAD (detached)");
    }
}
