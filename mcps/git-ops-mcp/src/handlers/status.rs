//! git_status

use mcp_common::{text_success, CallToolResult};

use super::{respond, ErrorStyle, ToolContext};
use crate::git::inspect;
use crate::params::{StatusParams, ToolArgs};
use crate::types::{GitResult, StatusSummary};
use crate::validation::{required_string, REPOSITORY_PATH};

pub async fn handle(ctx: &ToolContext, args: ToolArgs<StatusParams>) -> CallToolResult {
    respond(run(ctx, args), ErrorStyle::Prefixed, |(path, status)| {
        text_success(render_status(&path, &status))
    })
}

fn run(ctx: &ToolContext, args: ToolArgs<StatusParams>) -> GitResult<(String, StatusSummary)> {
    let params = args.parse()?;
    let repo_path = required_string(params.repo_path.as_ref(), REPOSITORY_PATH)?;
    let session = ctx.open(&repo_path)?;
    let status = session.inspect(inspect::status)?;
    Ok((session.display_path().to_string(), status))
}

fn section(title: &str, empty: &str, paths: &[String]) -> String {
    if paths.is_empty() {
        return empty.to_string();
    }
    let lines: Vec<String> = paths.iter().map(|p| format!("  - {p}")).collect();
    format!("{title}:\n{}", lines.join("\n"))
}

pub fn render_status(repo_path: &str, status: &StatusSummary) -> String {
    let branch = match (&status.current, status.detached) {
        (_, true) => "HEAD (detached)".to_string(),
        (Some(name), false) => name.clone(),
        (None, false) => "unknown".to_string(),
    };

    let divergence = if status.ahead > 0 || status.behind > 0 {
        format!(
            "Branch is {} commits ahead, {} commits behind",
            status.ahead, status.behind
        )
    } else {
        "Branch is up to date with remote".to_string()
    };

    [
        format!("Repository Status for: {repo_path}"),
        format!("Current branch: {branch}"),
        section("Staged files", "No staged files", &status.staged()),
        section("Modified files", "No modified files", &status.modified()),
        section("Untracked files", "No untracked files", &status.not_added()),
        divergence,
    ]
    .join("\n\n")
}
