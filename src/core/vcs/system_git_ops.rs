//! Working-tree operations for SystemGit (dirtiness probes, stash, submodules, commits)

use super::system_git::SystemGit;
use crate::core::error::SyncResult;

impl SystemGit<'_> {
  /// Index differs from HEAD (`git diff --cached --quiet` exits non-zero)
  pub fn has_staged_changes(&self) -> SyncResult<bool> {
    Ok(self.probe(&["diff", "--cached", "--quiet"])? != 0)
  }

  /// Working tree differs from the index
  pub fn has_unstaged_changes(&self) -> SyncResult<bool> {
    Ok(self.probe(&["diff", "--quiet"])? != 0)
  }

  /// `git status --porcelain` output; empty means clean, untracked files included
  pub fn status_porcelain(&self) -> SyncResult<String> {
    self.git(&["status", "--porcelain"])
  }

  /// Any staged, unstaged or untracked change
  ///
  /// Probes run in that order and stop at the first dirty answer.
  pub fn has_local_changes(&self) -> SyncResult<bool> {
    if self.has_staged_changes()? || self.has_unstaged_changes()? {
      return Ok(true);
    }
    Ok(!self.status_porcelain()?.is_empty())
  }

  /// `git stash push -u` (untracked files included)
  pub fn stash_push(&self) -> SyncResult<()> {
    self.git(&["stash", "push", "-u"])?;
    Ok(())
  }

  /// Commit the stash ref points at, `None` when the stash is empty
  pub fn stash_head(&self) -> SyncResult<Option<String>> {
    self.query(&["rev-parse", "-q", "--verify", "refs/stash"])
  }

  /// `git stash pop`
  pub fn stash_pop(&self) -> SyncResult<()> {
    self.git(&["stash", "pop"])?;
    Ok(())
  }

  /// Move every submodule to the tip of its tracked remote branch
  pub fn update_submodules_remote(&self) -> SyncResult<()> {
    self.git(&["submodule", "update", "--remote", "--recursive"])?;
    Ok(())
  }

  /// Stage a path
  pub fn add(&self, path: &str) -> SyncResult<()> {
    self.git(&["add", path])?;
    Ok(())
  }

  /// Commit the index with `message`
  pub fn commit(&self, message: &str) -> SyncResult<()> {
    self.git(&["commit", "-m", message])?;
    Ok(())
  }
}
