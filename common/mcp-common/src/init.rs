//! Tracing setup for MCP servers
//!
//! stdout carries the MCP protocol frames, so every layer installed here
//! writes to stderr.

use std::str::FromStr;

use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines without ANSI colors
    #[default]
    Text,
    /// One JSON object per line, for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

/// Logging section of a server config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level applied to the server crate unless `RUST_LOG` says otherwise
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    /// `LOG_FORMAT` overrides the configured format when it parses.
    pub fn effective_format(&self) -> LogFormat {
        std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.format)
    }
}

/// Install the global tracing subscriber for an MCP server
///
/// `crate_name` is the module path used in the default filter directive
/// (for example `git_ops_mcp`). `RUST_LOG` directives are applied first,
/// so they can widen or narrow other crates freely.
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing("my_mcp", &LoggingConfig::default())?;
/// ```
pub fn init_tracing(crate_name: &str, logging: &LoggingConfig) -> anyhow::Result<()> {
    let directive = format!("{}={}", crate_name, logging.level);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let registry = tracing_subscriber::registry().with(filter);

    match logging.effective_format() {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?,
    }

    Ok(())
}
