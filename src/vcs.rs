//! Version-control collaborator used by the reconciler.
//!
//! The reconciler only needs a handful of repository operations, captured by
//! the [`VersionControl`] trait.  [`GitCli`] implements them by running the
//! `git` binary through an [`Executor`].
use std::path::Path;
use std::sync::Arc;

use crate::error::VcsError;
use crate::exec::{ExecResult, Executor};

/// Name of the remote the working copy pushes to and pulls from.
pub const REMOTE_NAME: &str = "origin";

/// Kind of pending change reported for a working-copy path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// Not tracked yet (`??`).
    Untracked,
    /// Tracked and modified.
    Modified,
    /// Newly added to the index.
    Added,
    /// Deleted.
    Deleted,
    /// Renamed or copied.
    Renamed,
    /// Any other two-letter status code (e.g. unmerged).
    Other(String),
}

impl ChangeKind {
    /// Classify a two-letter short status code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        let mut chars = code.chars();
        let index = chars.next().unwrap_or(' ');
        let worktree = chars.next().unwrap_or(' ');
        if code == "??" {
            Self::Untracked
        } else if index == 'R' || index == 'C' {
            Self::Renamed
        } else if index == 'A' {
            Self::Added
        } else if index == 'D' || worktree == 'D' {
            Self::Deleted
        } else if index == 'M' || worktree == 'M' {
            Self::Modified
        } else {
            Self::Other(code.to_string())
        }
    }

    /// Whether this change counts as new or modified content for push reporting.
    #[must_use]
    pub const fn is_content_change(&self) -> bool {
        matches!(self, Self::Untracked | Self::Modified | Self::Added)
    }
}

/// One entry of the working copy's change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Raw two-letter status code.
    pub code: String,
    /// Classified change kind.
    pub kind: ChangeKind,
    /// Path relative to the working copy (destination path for renames).
    pub path: String,
}

/// Parse the output of `git status --porcelain` into [`FileChange`] entries.
///
/// Lines shorter than a status code plus separator are ignored.
#[must_use]
pub fn parse_status_short(output: &str) -> Vec<FileChange> {
    output
        .lines()
        .filter_map(|line| {
            let code = line.get(..2)?;
            let rest = line.get(3..)?.trim();
            if rest.is_empty() {
                return None;
            }
            let path = rest.rsplit_once(" -> ").map_or(rest, |(_, to)| to);
            Some(FileChange {
                code: code.to_string(),
                kind: ChangeKind::from_code(code),
                path: unquote(path),
            })
        })
        .collect()
}

/// Undo git's C-style quoting of paths containing special characters.
fn unquote(path: &str) -> String {
    let Some(inner) = path
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    else {
        return path.to_string();
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('t') => out.push('\t'),
                Some('n') => out.push('\n'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Repository operations consumed by the reconciler.
///
/// Every operation is synchronous and either succeeds or returns a
/// [`VcsError`] carrying the collaborator's diagnostic text.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl {
    /// Initialise an empty repository in `dir` on `branch`.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::CommandFailed`] if initialisation fails.
    fn init(&self, dir: &Path, branch: &str) -> Result<(), VcsError>;

    /// Register `url` as remote `name`.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::CommandFailed`] if the remote cannot be added.
    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<(), VcsError>;

    /// Fetch and merge `branch` from `remote`.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::CommandFailed`] if the pull fails.
    fn pull(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), VcsError>;

    /// List pending changes relative to the last commit.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::CommandFailed`] if the status query fails.
    fn status_short(&self, dir: &Path) -> Result<Vec<FileChange>, VcsError>;

    /// Stage every change in the working copy.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::CommandFailed`] if staging fails.
    fn add_all(&self, dir: &Path) -> Result<(), VcsError>;

    /// Commit the staged changes with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::CommandFailed`] if the commit fails (including
    /// when there is nothing to commit).
    fn commit(&self, dir: &Path, message: &str) -> Result<(), VcsError>;

    /// Push `branch` to `remote`.
    ///
    /// # Errors
    ///
    /// Returns [`VcsError::CommandFailed`] if the push fails.
    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), VcsError>;
}

/// [`VersionControl`] backed by the `git` command-line client.
#[derive(Debug, Clone)]
pub struct GitCli {
    executor: Arc<dyn Executor>,
}

impl GitCli {
    /// Create a git client that runs commands through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Whether a `git` binary is available on `PATH`.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.executor.which("git")
    }

    fn git(&self, dir: &Path, operation: &str, args: &[&str]) -> Result<ExecResult, VcsError> {
        self.executor
            .run_in(dir, "git", args)
            .map_err(|e| VcsError::CommandFailed {
                operation: operation.to_string(),
                message: format!("{e:#}"),
            })
    }
}

impl VersionControl for GitCli {
    fn init(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        let initial = format!("--initial-branch={branch}");
        self.git(dir, "init", &["init", &initial]).map(drop)
    }

    fn add_remote(&self, dir: &Path, name: &str, url: &str) -> Result<(), VcsError> {
        self.git(dir, "remote add", &["remote", "add", name, url])
            .map(drop)
    }

    fn pull(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.git(dir, "pull", &["pull", remote, branch]).map(drop)
    }

    fn status_short(&self, dir: &Path) -> Result<Vec<FileChange>, VcsError> {
        let result = self.git(dir, "status", &["status", "--porcelain"])?;
        Ok(parse_status_short(&result.stdout))
    }

    fn add_all(&self, dir: &Path) -> Result<(), VcsError> {
        self.git(dir, "add", &["add", "-A"]).map(drop)
    }

    fn commit(&self, dir: &Path, message: &str) -> Result<(), VcsError> {
        self.git(dir, "commit", &["commit", "-m", message]).map(drop)
    }

    fn push(&self, dir: &Path, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.git(dir, "push", &["push", remote, branch]).map(drop)
    }
}
