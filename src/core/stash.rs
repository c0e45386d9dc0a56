//! Scoped stash transaction for one working tree
//!
//! # Invariants
//!
//! - The guard is armed only when `git stash push` actually moved `refs/stash`;
//!   dirt git cannot stash (content inside a submodule) leaves it disarmed, so
//!   an older stash entry is never popped by mistake
//! - A stash created by [`StashGuard::push`] is popped before the guard goes away
//! - [`StashGuard::close`] pops on both the success and the failure path of the
//!   guarded work and reports a failed pop as an error
//! - If the guard is dropped without `close` (a panic unwinding through the
//!   sync), `Drop` still attempts the pop, best-effort
//!
//! # Example
//!
//! ```ignore
//! let guard = if dirty { StashGuard::push(&git)? } else { StashGuard::none(&git) };
//! let result = do_risky_things(&git);
//! guard.close(result)?;
//! ```

use crate::core::error::SyncResult;
use crate::core::vcs::SystemGit;

/// A stash entry this run created and still owes a pop for
pub struct StashGuard<'g, 'r> {
  git: &'g SystemGit<'r>,
  active: bool,
}

impl<'g, 'r> StashGuard<'g, 'r> {
  /// Stash all local changes (untracked included); armed only if a stash entry was created
  pub fn push(git: &'g SystemGit<'r>) -> SyncResult<Self> {
    let before = git.stash_head()?;
    git.stash_push()?;
    let after = git.stash_head()?;

    let created = after.is_some() && after != before;
    if !created {
      log::debug!("nothing was stashed in {}", git.work_tree().display());
    }
    Ok(Self { git, active: created })
  }

  /// Guard for a clean tree; nothing to restore
  pub fn none(git: &'g SystemGit<'r>) -> Self {
    Self { git, active: false }
  }

  /// Check if a stash is still owed
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Pop the stash if one is owed; returns whether a pop ran
  pub fn release(&mut self) -> SyncResult<bool> {
    if !self.active {
      return Ok(false);
    }
    // Disarm first: a failed pop must not be retried from Drop
    self.active = false;
    self.git.stash_pop()?;
    Ok(true)
  }

  /// Restore the stash, then hand back the guarded result
  ///
  /// A failed pop wins over the guarded result because it happened last; when
  /// both failed, the earlier failure is attached as context.
  pub fn close<T>(mut self, result: SyncResult<T>) -> SyncResult<T> {
    match (result, self.release()) {
      (Ok(value), Ok(_)) => Ok(value),
      (Err(err), Ok(_)) => Err(err),
      (Ok(_), Err(pop_err)) => Err(pop_err),
      (Err(err), Err(pop_err)) => Err(pop_err.context(format!(
        "Restore was attempted after an earlier failure:\n{}",
        err
      ))),
    }
  }
}

impl Drop for StashGuard<'_, '_> {
  fn drop(&mut self) {
    // Best-effort release on drop - only reached when close() was skipped
    if self.active {
      self.active = false;
      if let Err(e) = self.git.stash_pop() {
        log::error!(
          "failed to restore stashed changes in {}: {}",
          self.git.work_tree().display(),
          e
        );
      }
    }
  }
}
