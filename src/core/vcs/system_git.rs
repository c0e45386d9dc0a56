//! System git backend
//!
//! Thin typed wrappers over the `git` CLI. Every call goes through a
//! [`CommandRunner`], so the same code drives real repositories and the
//! scripted runner used in unit tests.

use crate::core::error::SyncResult;
use crate::core::exec::CommandRunner;
use std::path::{Path, PathBuf};

/// Git operations bound to one working tree
pub struct SystemGit<'r> {
  runner: &'r dyn CommandRunner,

  /// Working tree root
  pub(crate) work_tree: PathBuf,
}

impl<'r> SystemGit<'r> {
  /// Bind to a working tree; no command is run until an operation is called
  pub fn open(runner: &'r dyn CommandRunner, path: &Path) -> Self {
    Self {
      runner,
      work_tree: path.to_path_buf(),
    }
  }

  pub fn work_tree(&self) -> &Path {
    &self.work_tree
  }

  /// Run a git command that must succeed
  pub(crate) fn git(&self, args: &[&str]) -> SyncResult<String> {
    self.runner.run_strict("git", args, &self.work_tree)
  }

  /// Run a git command whose exit code is the answer
  pub(crate) fn probe(&self, args: &[&str]) -> SyncResult<i32> {
    self.runner.run_probe("git", args, &self.work_tree)
  }

  /// Run a git command whose failure means "absent"; returns trimmed stdout on success
  pub(crate) fn query(&self, args: &[&str]) -> SyncResult<Option<String>> {
    let output = self.runner.execute("git", args, &self.work_tree)?;
    Ok(output.success().then(|| output.stdout.trim().to_string()))
  }

  /// `git pull`
  pub fn pull(&self) -> SyncResult<()> {
    self.git(&["pull"])?;
    Ok(())
  }

  /// `git fetch --tags`
  pub fn fetch_tags(&self) -> SyncResult<()> {
    self.git(&["fetch", "--tags"])?;
    Ok(())
  }

  /// All local tag names (after a fetch this includes the remote's)
  pub fn list_tags(&self) -> SyncResult<Vec<String>> {
    Ok(split_lines(&self.git(&["tag"])?))
  }

  /// Tags pointing at HEAD
  pub fn tags_at_head(&self) -> SyncResult<Vec<String>> {
    Ok(split_lines(&self.git(&["tag", "--points-at", "HEAD"])?))
  }

  /// Create a lightweight tag on HEAD; fails if it already exists
  pub fn create_tag(&self, tag: &str) -> SyncResult<()> {
    self.git(&["tag", tag])?;
    Ok(())
  }

  /// Push the current branch to its upstream
  pub fn push(&self) -> SyncResult<()> {
    self.git(&["push"])?;
    Ok(())
  }

  /// Push a single tag to `remote`
  pub fn push_tag(&self, remote: &str, tag: &str) -> SyncResult<()> {
    self.git(&["push", remote, tag])?;
    Ok(())
  }

  /// Check out a branch, tag or commit
  pub fn checkout(&self, refname: &str) -> SyncResult<()> {
    self.git(&["checkout", refname])?;
    Ok(())
  }
}

/// Non-empty trimmed lines of command output
pub(crate) fn split_lines(output: &str) -> Vec<String> {
  output
    .lines()
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .collect()
}
