//! Async runner for the git executable
//!
//! Every mutating operation goes through here with a literal argument list.
//! The environment is pinned so that output is in English and git never
//! stops to ask for input (credentials, editors).

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, error, instrument};

use crate::config::GitConfig;
use crate::types::{GitError, GitResult};

/// Captured output of a successful git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle) || self.stderr.contains(needle)
    }
}

#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
    timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::from_config(&GitConfig::default())
    }
}

/// Render an argument list for logs and error messages
pub fn command_line<S: AsRef<str>>(args: &[S]) -> String {
    args.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
}

impl GitCli {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(config.binary.clone(), config.timeout())
    }

    /// Run `git <args>` inside `workdir`
    ///
    /// # Errors
    ///
    /// - [`GitError::NotInstalled`] when the binary cannot be found
    /// - [`GitError::Timeout`] when the configured limit is exceeded (the
    ///   child is killed)
    /// - [`GitError::Command`] on a non-zero exit, carrying git's output
    #[instrument(skip(self, args), fields(cmd = %command_line(args)))]
    pub async fn run<S: AsRef<str>>(&self, workdir: &Path, args: &[S]) -> GitResult<GitOutput> {
        debug!("executing: {} {}", self.binary, command_line(args));

        let child = Command::new(&self.binary)
            .args(args.iter().map(AsRef::as_ref))
            .current_dir(workdir)
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_EDITOR", "true")
            .env("GIT_MERGE_AUTOEDIT", "no")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    GitError::NotInstalled(self.binary.clone())
                } else {
                    GitError::Io(e)
                }
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                error!(secs = self.timeout.as_secs(), "git command timed out");
                GitError::Timeout {
                    args: command_line(args),
                    secs: self.timeout.as_secs(),
                }
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            let code = output.status.code();
            error!(?code, stderr = %stderr.trim(), "git command failed");
            return Err(GitError::command(command_line(args), code, &stdout, &stderr));
        }

        debug!(bytes = stdout.len(), "git command succeeded");
        Ok(GitOutput { stdout, stderr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        assert_eq!(command_line(&["push", "origin", "main"]), "push origin main");
        let owned = vec!["merge".to_string(), "--squash".to_string()];
        assert_eq!(command_line(&owned), "merge --squash");
    }

    #[test]
    fn test_output_contains() {
        let output = GitOutput {
            stdout: "Updating 1..2\nFast-forward\n".into(),
            stderr: String::new(),
        };
        assert!(output.contains("Fast-forward"));
        assert!(!output.contains("CONFLICT"));
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let cli = GitCli::new("definitely-not-a-git-binary", Duration::from_secs(5));
        let dir = tempfile::tempdir().unwrap();
        let err = cli.run(dir.path(), &["status"]).await.unwrap_err();
        assert!(matches!(err, GitError::NotInstalled(_)));
    }
}
