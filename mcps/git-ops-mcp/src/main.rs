//! Git Ops MCP - git working-copy operations over stdio
//!
//! Stages, commits, branches, merges, checks out and pushes in local
//! repositories on behalf of an MCP client.

use git_ops_mcp::{Config, GitOpsMcpServer};
use rmcp::{transport::io::stdio, ServiceExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, report) = Config::load();
    mcp_common::init_tracing("git_ops_mcp", &config.logging)?;
    report.log();

    tracing::info!("Starting Git Ops MCP server");

    let server = GitOpsMcpServer::with_config(&config);
    let service = server.serve(stdio()).await?;

    tracing::info!("Git Ops MCP server running");

    service.waiting().await?;

    tracing::info!("Git Ops MCP server stopped");

    Ok(())
}
