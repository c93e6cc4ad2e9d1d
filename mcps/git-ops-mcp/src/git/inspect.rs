//! Read-only repository queries through libgit2
//!
//! These functions take a borrowed `Repository` and return owned data, so
//! callers can drop the repository before awaiting anything.

use chrono::{FixedOffset, TimeZone};
use git2::{BranchType, ErrorCode, Repository, Sort, Status, StatusOptions};

use crate::types::{BranchSummary, FileEntry, GitResult, HeadState, LogEntry, StatusSummary};

/// Current HEAD, resolving unborn branches by their symbolic target
pub fn head_state(repo: &Repository) -> GitResult<HeadState> {
    if repo.head_detached()? {
        return Ok(HeadState {
            branch: None,
            detached: true,
        });
    }

    let head = repo.find_reference("HEAD")?;
    let branch = head
        .symbolic_target()
        .map(|target| target.strip_prefix("refs/heads/").unwrap_or(target).to_string());

    Ok(HeadState {
        branch,
        detached: false,
    })
}

/// HEAD names a branch that has no commits yet
///
/// `Repository::is_empty` only recognises libgit2's own initial branch
/// name, so a fresh repository on `main` must be checked through HEAD.
pub fn is_unborn(repo: &Repository) -> GitResult<bool> {
    match repo.head() {
        Ok(_) => Ok(false),
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(true),
        Err(e) => Err(e.into()),
    }
}

fn index_code(status: Status) -> char {
    if status.is_conflicted() {
        'U'
    } else if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else if status.is_index_typechange() {
        'T'
    } else if status.is_wt_new() {
        '?'
    } else {
        ' '
    }
}

fn worktree_code(status: Status) -> char {
    if status.is_conflicted() {
        'U'
    } else if status.is_wt_new() {
        '?'
    } else if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_typechange() {
        'T'
    } else {
        ' '
    }
}

/// Working tree status, untracked files listed individually
pub fn status(repo: &Repository) -> GitResult<StatusSummary> {
    let head = head_state(repo)?;

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false)
        .include_unmodified(false)
        .renames_head_to_index(true);

    let statuses = repo.statuses(Some(&mut opts))?;

    let mut files = Vec::with_capacity(statuses.len());
    for entry in statuses.iter() {
        let status = entry.status();
        // renames report the new path, like `git status` does
        let renamed_to = entry
            .head_to_index()
            .filter(|_| status.is_index_renamed())
            .and_then(|delta| delta.new_file().path().map(|p| p.to_string_lossy().to_string()));
        let path = match renamed_to {
            Some(path) => path,
            None => entry.path().unwrap_or_default().to_string(),
        };

        files.push(FileEntry {
            path,
            index: index_code(status),
            working_dir: worktree_code(status),
        });
    }

    let (tracking, ahead, behind) = match &head.branch {
        Some(name) => upstream_divergence(repo, name)?,
        None => (None, 0, 0),
    };

    Ok(StatusSummary {
        current: head.branch,
        detached: head.detached,
        tracking,
        ahead,
        behind,
        files,
    })
}

/// Upstream name and ahead/behind counts of a local branch
fn upstream_divergence(repo: &Repository, name: &str) -> GitResult<(Option<String>, usize, usize)> {
    let Ok(branch) = repo.find_branch(name, BranchType::Local) else {
        return Ok((None, 0, 0));
    };
    let Ok(upstream) = branch.upstream() else {
        return Ok((None, 0, 0));
    };

    let tracking = upstream.name()?.map(String::from);
    match (branch.get().target(), upstream.get().target()) {
        (Some(local), Some(remote)) => {
            let (ahead, behind) = repo.graph_ahead_behind(local, remote)?;
            Ok((tracking, ahead, behind))
        }
        _ => Ok((tracking, 0, 0)),
    }
}

/// Local and remote-tracking branch names, sorted
pub fn branches(repo: &Repository) -> GitResult<BranchSummary> {
    let head = head_state(repo)?;

    let mut local = Vec::new();
    for item in repo.branches(Some(BranchType::Local))? {
        let (branch, _) = item?;
        if let Some(name) = branch.name()? {
            local.push(name.to_string());
        }
    }
    local.sort();

    let mut remote = Vec::new();
    for item in repo.branches(Some(BranchType::Remote))? {
        let (branch, _) = item?;
        if let Some(name) = branch.name()? {
            remote.push(format!("remotes/{name}"));
        }
    }
    remote.sort();

    Ok(BranchSummary {
        head: head.branch,
        detached: head.detached,
        local,
        remote,
    })
}

pub fn local_branch_exists(repo: &Repository, name: &str) -> bool {
    repo.find_branch(name, BranchType::Local).is_ok()
}

/// Local branch, remote-tracking branch (`origin/x` or `remotes/origin/x`)
pub fn branch_exists(repo: &Repository, name: &str) -> bool {
    let remote_name = name.strip_prefix("remotes/").unwrap_or(name);
    local_branch_exists(repo, name) || repo.find_branch(remote_name, BranchType::Remote).is_ok()
}

fn author_date(time: git2::Time) -> String {
    FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|offset| offset.timestamp_opt(time.seconds(), 0).single())
        .map(|date| date.to_rfc3339())
        .unwrap_or_default()
}

/// Newest-first history starting at `start` (a full ref name) or HEAD
pub fn log(repo: &Repository, start: Option<&str>, max_count: usize) -> GitResult<Vec<LogEntry>> {
    let mut walk = repo.revwalk()?;
    walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    match start {
        Some(refname) => walk.push_ref(refname)?,
        None => walk.push_head()?,
    }

    walk.take(max_count)
        .map(|oid| -> GitResult<LogEntry> {
            let commit = repo.find_commit(oid?)?;
            let author = commit.author();
            Ok(LogEntry {
                hash: commit.id().to_string(),
                date: author_date(author.when()),
                message: commit.summary().unwrap_or_default().to_string(),
                author: author.name().unwrap_or_default().to_string(),
                email: author.email().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Stats of the HEAD commit against its first parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadCommit {
    pub hash: String,
    pub summary: String,
    pub files_changed: usize,
    pub insertions: usize,
    pub deletions: usize,
}

pub fn head_commit(repo: &Repository) -> GitResult<HeadCommit> {
    let commit = repo.head()?.peel_to_commit()?;
    let tree = commit.tree()?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0)?.tree()?)
    } else {
        None
    };

    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let stats = diff.stats()?;

    Ok(HeadCommit {
        hash: commit.id().to_string(),
        summary: commit.summary().unwrap_or_default().to_string(),
        files_changed: stats.files_changed(),
        insertions: stats.insertions(),
        deletions: stats.deletions(),
    })
}

pub fn head_hash(repo: &Repository) -> GitResult<String> {
    Ok(repo.head()?.peel_to_commit()?.id().to_string())
}

/// Abbreviated HEAD hash, as in "HEAD is now at 1a2b3c4"
pub fn short_head(repo: &Repository) -> GitResult<String> {
    let commit = repo.head()?.peel_to_commit()?;
    let short = commit.as_object().short_id()?;
    Ok(short.as_str().unwrap_or_default().to_string())
}

/// Hash and summary of a local branch tip
pub fn branch_tip(repo: &Repository, branch: &str) -> GitResult<(String, String)> {
    let commit = repo
        .find_branch(branch, BranchType::Local)?
        .get()
        .peel_to_commit()?;
    Ok((
        commit.id().to_string(),
        commit.summary().unwrap_or_default().to_string(),
    ))
}

pub fn remotes(repo: &Repository) -> GitResult<Vec<String>> {
    Ok(repo.remotes()?.iter().flatten().map(String::from).collect())
}

pub fn tag_names(repo: &Repository) -> GitResult<Vec<String>> {
    Ok(repo
        .tag_names(None)?
        .iter()
        .flatten()
        .map(String::from)
        .collect())
}

/// Commits on `branch` that `remote` does not have yet
///
/// Measured against `refs/remotes/<remote>/<branch>` when it exists,
/// otherwise against everything known from that remote. `None` when the
/// local branch does not exist.
pub fn unpushed_count(repo: &Repository, remote: &str, branch: &str) -> GitResult<Option<usize>> {
    let Some(local) = repo
        .find_branch(branch, BranchType::Local)
        .ok()
        .and_then(|b| b.get().target())
    else {
        return Ok(None);
    };

    let tracking = format!("refs/remotes/{remote}/{branch}");
    if let Some(upstream) = repo.find_reference(&tracking).ok().and_then(|r| r.target()) {
        let (ahead, _) = repo.graph_ahead_behind(local, upstream)?;
        return Ok(Some(ahead));
    }

    let mut walk = repo.revwalk()?;
    walk.push(local)?;
    for reference in repo.references_glob(&format!("refs/remotes/{remote}/*"))? {
        if let Some(oid) = reference?.target() {
            walk.hide(oid)?;
        }
    }

    let mut count = 0;
    for oid in walk {
        oid?;
        count += 1;
    }
    Ok(Some(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use std::path::Path;
    use tempfile::TempDir;

    /// Repository created on `master`, then moved to an unborn `main`
    fn init() -> (TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = git2::RepositoryInitOptions::new();
        opts.initial_head("master");
        let repo = Repository::init_opts(dir.path(), &opts).unwrap();
        repo.set_head("refs/heads/main").unwrap();
        (dir, repo)
    }

    fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> git2::Oid {
        let workdir = repo.workdir().unwrap();
        std::fs::write(workdir.join(name), content).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    #[test]
    fn test_head_state_unborn() {
        let (_dir, repo) = init();
        let head = head_state(&repo).unwrap();
        assert_eq!(head.branch.as_deref(), Some("main"));
        assert!(!head.detached);
    }

    #[test]
    fn test_unborn_main_is_detected() {
        let (_dir, repo) = init();
        assert!(is_unborn(&repo).unwrap());

        commit_file(&repo, "a.txt", "a\n", "first");
        assert!(!is_unborn(&repo).unwrap());
    }

    #[test]
    fn test_head_state_detached() {
        let (_dir, repo) = init();
        let first = commit_file(&repo, "a.txt", "a\n", "first");
        commit_file(&repo, "a.txt", "a\nb\n", "second");
        repo.set_head_detached(first).unwrap();

        let head = head_state(&repo).unwrap();
        assert!(head.detached);
        assert_eq!(head.abbrev(), "HEAD");
    }

    #[test]
    fn test_status_columns() {
        let (dir, repo) = init();
        commit_file(&repo, "tracked.txt", "one\n", "initial");

        std::fs::write(dir.path().join("tracked.txt"), "one\ntwo\n").unwrap();
        std::fs::write(dir.path().join("fresh.txt"), "new\n").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/deep.txt"), "x\n").unwrap();

        let summary = status(&repo).unwrap();
        assert_eq!(summary.current.as_deref(), Some("main"));
        assert_eq!(summary.modified(), vec!["tracked.txt"]);
        assert_eq!(summary.not_added(), vec!["fresh.txt", "nested/deep.txt"]);
        assert!(summary.staged().is_empty());
        assert_eq!((summary.ahead, summary.behind), (0, 0));
    }

    #[test]
    fn test_log_order_and_fields() {
        let (_dir, repo) = init();
        commit_file(&repo, "a.txt", "1\n", "first");
        commit_file(&repo, "a.txt", "1\n2\n", "second\n\nbody text");

        let logs = log(&repo, None, 10).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "second");
        assert_eq!(logs[1].message, "first");
        assert_eq!(logs[0].author, "Test User");
        assert_eq!(logs[0].email, "test@example.com");
        assert!(chrono::DateTime::parse_from_rfc3339(&logs[0].date).is_ok());

        assert_eq!(log(&repo, None, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_head_commit_stats() {
        let (_dir, repo) = init();
        commit_file(&repo, "a.txt", "1\n2\n", "first");
        let stats = head_commit(&repo).unwrap();
        assert_eq!((stats.files_changed, stats.insertions, stats.deletions), (1, 2, 0));

        commit_file(&repo, "a.txt", "1\n3\n", "second");
        let stats = head_commit(&repo).unwrap();
        assert_eq!((stats.files_changed, stats.insertions, stats.deletions), (1, 1, 1));
        assert_eq!(stats.summary, "second");
    }

    #[test]
    fn test_branches_sorted() {
        let (_dir, repo) = init();
        let oid = commit_file(&repo, "a.txt", "a\n", "first");
        let commit = repo.find_commit(oid).unwrap();
        repo.branch("zeta", &commit, false).unwrap();
        repo.branch("alpha", &commit, false).unwrap();

        let summary = branches(&repo).unwrap();
        assert_eq!(summary.local, vec!["alpha", "main", "zeta"]);
        assert!(summary.remote.is_empty());
        assert_eq!(summary.head.as_deref(), Some("main"));
        assert!(branch_exists(&repo, "alpha"));
        assert!(!branch_exists(&repo, "remotes/origin/alpha"));
    }

    #[test]
    fn test_unpushed_count_without_remote_refs() {
        let (_dir, repo) = init();
        commit_file(&repo, "a.txt", "a\n", "first");
        commit_file(&repo, "a.txt", "a\nb\n", "second");

        assert_eq!(unpushed_count(&repo, "origin", "main").unwrap(), Some(2));
        assert_eq!(unpushed_count(&repo, "origin", "missing").unwrap(), None);
    }

    #[test]
    fn test_unpushed_count_against_tracking_ref() {
        let (_dir, repo) = init();
        let first = commit_file(&repo, "a.txt", "a\n", "first");
        commit_file(&repo, "a.txt", "a\nb\n", "second");
        repo.reference("refs/remotes/origin/main", first, true, "test")
            .unwrap();

        assert_eq!(unpushed_count(&repo, "origin", "main").unwrap(), Some(1));
    }
}
