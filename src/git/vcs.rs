//! Version-control collaborator.
//!
//! All operations shell out to the system `git` binary, inheriting the
//! user's existing git config, hooks and signing setup. Only stdout, stderr
//! and the exit status are consumed.

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;
use tracing::debug;

use crate::error::VcsError;

/// Narrow interface over the repository, so the pipeline can run against
/// in-memory fakes.
#[cfg_attr(test, mockall::automock)]
pub trait Vcs {
    /// Repository-relative paths of staged files.
    fn staged_files(&self) -> Result<Vec<String>, VcsError>;

    /// Patch text of the staged changes.
    fn staged_diff(&self) -> Result<String, VcsError>;

    /// Commit the index with `message`. Returns git's stdout.
    fn commit(&self, message: &str) -> Result<String, VcsError>;

    /// Create and switch to a branch named `name`. Returns git's stdout.
    fn create_branch(&self, name: &str) -> Result<String, VcsError>;
}

/// [`Vcs`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

impl GitCli {
    /// Locate the work tree containing `start` and check that `git` is on PATH.
    pub fn discover(start: &Path) -> Result<Self, VcsError> {
        check_git_installed()?;

        let repo = Repository::discover(start).map_err(VcsError::NotARepository)?;
        let workdir = repo.workdir().ok_or(VcsError::BareRepository)?;

        debug!("Using git work tree at {}", workdir.display());
        Ok(Self {
            workdir: workdir.to_path_buf(),
        })
    }

    /// Use `workdir` as-is, without discovery.
    pub fn at(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run a git command in the work tree and return its stdout.
    fn run_git(&self, args: &[&str], operation: &str) -> Result<String, VcsError> {
        debug!("Running git {}", operation);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| VcsError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                operation: operation.to_string(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Vcs for GitCli {
    fn staged_files(&self) -> Result<Vec<String>, VcsError> {
        let out = self.run_git(&["diff", "--cached", "--name-only"], "list staged files")?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn staged_diff(&self) -> Result<String, VcsError> {
        self.run_git(
            &[
                "diff",
                "--cached",
                "--diff-algorithm=minimal",
                "--no-color",
                "--no-ext-diff",
            ],
            "diff staged changes",
        )
    }

    fn commit(&self, message: &str) -> Result<String, VcsError> {
        self.run_git(&["commit", "-m", message], "commit")
    }

    fn create_branch(&self, name: &str) -> Result<String, VcsError> {
        self.run_git(&["checkout", "-b", name], "checkout -b")
    }
}

/// Check that the `git` executable is reachable.
pub fn check_git_installed() -> Result<(), VcsError> {
    which::which("git").map(|_| ()).map_err(|_| VcsError::GitNotInstalled)
}
