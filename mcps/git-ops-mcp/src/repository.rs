//! Repository resolution and the per-call session handle

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository};
use tracing::debug;

use crate::git::{GitCli, GitOutput};
use crate::types::{GitError, GitResult};
use crate::validation::{non_empty, REPOSITORY_PATH};

/// A resolved repository for the duration of one tool call
///
/// Created by [`RepoSession::resolve`] and passed to every operation. It
/// holds no open libgit2 handle: [`RepoSession::inspect`] opens the
/// repository, runs a query and closes it again.
#[derive(Debug, Clone)]
pub struct RepoSession {
    path: PathBuf,
    display: String,
    git: GitCli,
}

impl RepoSession {
    /// Validate `raw_path` and confirm it is inside a git working directory
    ///
    /// Checks run in a fixed order: blank, missing on disk, not a repository.
    pub fn resolve(raw_path: &str, git: &GitCli) -> GitResult<Self> {
        let trimmed = non_empty(raw_path, REPOSITORY_PATH)?;
        let path = PathBuf::from(&trimmed);

        if !path.exists() {
            return Err(GitError::PathNotFound(trimmed));
        }

        match Repository::discover(&path) {
            Ok(_) => {}
            Err(e) if e.code() == ErrorCode::NotFound => {
                return Err(GitError::NotARepository(trimmed));
            }
            Err(e) => return Err(GitError::RepoInit(e.message().to_string())),
        }

        debug!(path = %trimmed, "resolved repository");
        Ok(Self {
            path,
            display: trimmed,
            git: git.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The path as the caller gave it, trimmed
    pub fn display_path(&self) -> &str {
        &self.display
    }

    pub fn open(&self) -> GitResult<Repository> {
        Ok(Repository::discover(&self.path)?)
    }

    /// Run a read-only query against a freshly opened repository
    pub fn inspect<T>(&self, query: impl FnOnce(&Repository) -> GitResult<T>) -> GitResult<T> {
        let repo = self.open()?;
        query(&repo)
    }

    pub async fn git<S: AsRef<str> + Sync>(&self, args: &[S]) -> GitResult<GitOutput> {
        self.git.run(&self.path, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_blank_path() {
        let err = RepoSession::resolve("   ", &GitCli::default()).unwrap_err();
        assert_eq!(err.to_string(), "Repository path cannot be empty");
    }

    #[test]
    fn test_resolve_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let missing = missing.to_str().unwrap();

        let err = RepoSession::resolve(missing, &GitCli::default()).unwrap_err();
        assert_eq!(err.to_string(), format!("Repository path does not exist: {missing}"));
    }

    #[test]
    fn test_resolve_plain_directory() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().to_str().unwrap();

        let err = RepoSession::resolve(plain, &GitCli::default()).unwrap_err();
        assert_eq!(err.to_string(), format!("The path '{plain}' is not a git repository"));
    }

    #[test]
    fn test_resolve_trims_and_finds_repository() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();
        let padded = format!("  {}  ", dir.path().display());

        let session = RepoSession::resolve(&padded, &GitCli::default()).unwrap();
        assert_eq!(session.display_path(), dir.path().to_str().unwrap());
        assert!(session.inspect(crate::git::inspect::is_unborn).unwrap());
    }
}
