//! Server configuration
//!
//! Config is searched in order:
//! 1. `GIT_OPS_CONFIG_PATH` env var
//! 2. `./git-ops-mcp.toml`
//! 3. `$XDG_CONFIG_HOME/git-ops-mcp/config.toml`
//! 4. `~/.git-ops-mcp.toml`
//! 5. Built-in defaults
//!
//! ```toml
//! [git]
//! binary = "/usr/bin/git"
//! timeout_secs = 60
//!
//! [defaults]
//! remote = "upstream"
//! log_count = 20
//!
//! [logging]
//! level = "debug"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use mcp_common::LoggingConfig;
use serde::Deserialize;

pub const CONFIG_ENV: &str = "GIT_OPS_CONFIG_PATH";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitConfig {
    /// git executable, looked up on PATH unless absolute
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Upper bound for a single git invocation
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl GitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultsConfig {
    /// Remote used by git_push when none is given
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Commits returned by git_log when maxCount is omitted
    #[serde(default = "default_log_count")]
    pub log_count: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            log_count: default_log_count(),
        }
    }
}

fn default_binary() -> String {
    "git".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_log_count() -> usize {
    10
}

/// Where the config came from and what was skipped on the way
///
/// Config is read before tracing is installed, so findings are collected
/// here and logged afterwards.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub source: Option<PathBuf>,
    pub problems: Vec<String>,
}

impl LoadReport {
    pub fn log(&self) {
        for problem in &self.problems {
            tracing::warn!("{}", problem);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {}", path.display()),
            None => tracing::info!("No config file found, using defaults"),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load config from the first usable location
    pub fn load() -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                if let Some(config) = Self::read(&path, &mut report) {
                    return (config, report);
                }
            } else {
                report
                    .problems
                    .push(format!("{}={} does not exist", CONFIG_ENV, env_path));
            }
        }

        for path in Self::search_paths() {
            if path.exists() {
                if let Some(config) = Self::read(&path, &mut report) {
                    return (config, report);
                }
            }
        }

        (Self::default(), report)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("git-ops-mcp.toml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("git-ops-mcp").join("config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".git-ops-mcp.toml"));
        }
        paths
    }

    fn read(path: &Path, report: &mut LoadReport) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                report
                    .problems
                    .push(format!("Failed to read config {}: {}", path.display(), e));
                return None;
            }
        };

        match Self::from_toml(&content) {
            Ok(config) => {
                report.source = Some(path.to_path_buf());
                Some(config)
            }
            Err(e) => {
                report
                    .problems
                    .push(format!("Failed to parse config {}: {}", path.display(), e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_common::LogFormat;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.git.binary, "git");
        assert_eq!(config.git.timeout(), Duration::from_secs(120));
        assert_eq!(config.defaults.remote, "origin");
        assert_eq!(config.defaults.log_count, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            [defaults]
            remote = "upstream"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.defaults.remote, "upstream");
        assert_eq!(config.defaults.log_count, 10);
        assert_eq!(config.git.binary, "git");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("[git]\ntimeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn test_read_records_problems() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[defaults\nremote = 1").unwrap();

        let mut report = LoadReport::default();
        assert!(Config::read(&path, &mut report).is_none());
        assert!(report.source.is_none());
        assert_eq!(report.problems.len(), 1);

        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[git]\ntimeout_secs = 5").unwrap();
        let config = Config::read(&good, &mut report).unwrap();
        assert_eq!(config.git.timeout_secs, 5);
        assert_eq!(report.source.as_deref(), Some(good.as_path()));
    }
}
