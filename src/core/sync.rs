//! Propagate the template into sibling repositories
//!
//! For each sibling, in caller order:
//!
//! 1. Skip (non-fatal) when its directory does not exist
//! 2. Stash local work (untracked included) when the tree is dirty; only a
//!    stash entry this run created is popped later
//! 3. `git pull`, advance the submodule to its remote-tracking tip, stage it
//! 4. Commit only if the index now differs from HEAD
//! 5. Pop the stash, on success and on failure alike
//!
//! Step 4 makes a second run with no upstream movement a `no-change`, never an
//! empty commit. Any failing command aborts the remaining siblings.

use crate::core::config::SyncConfig;
use crate::core::error::SyncResult;
use crate::core::exec::CommandRunner;
use crate::core::repo::Repository;
use crate::core::stash::StashGuard;
use crate::core::tag::ReleaseTag;
use crate::core::vcs::SystemGit;
use crate::ui::report::Reporter;
use serde::Serialize;
use std::path::PathBuf;

/// What happened to one sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncOutcome {
  /// Submodule pointer moved and was committed
  Committed,
  /// Submodule already at the remote tip
  NoChange,
  /// Directory missing; never touched
  SkippedMissing,
}

/// Per-sibling result line for the run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReport {
  pub name: String,
  pub path: PathBuf,
  pub outcome: SyncOutcome,
  /// Local changes were stashed and restored around the update
  pub stashed: bool,
}

/// Synchronizes sibling repositories one at a time
pub struct SiblingSync<'a> {
  runner: &'a dyn CommandRunner,
  config: &'a SyncConfig,
  reporter: &'a Reporter,
}

impl<'a> SiblingSync<'a> {
  pub fn new(runner: &'a dyn CommandRunner, config: &'a SyncConfig, reporter: &'a Reporter) -> Self {
    Self {
      runner,
      config,
      reporter,
    }
  }

  /// Sync every repository in order, stopping at the first failure
  pub fn sync_all(&self, repos: &[Repository], tag: Option<&ReleaseTag>) -> SyncResult<Vec<RepoReport>> {
    let mut reports = Vec::with_capacity(repos.len());
    for repo in repos {
      reports.push(self.sync_repository(repo, tag)?);
    }
    Ok(reports)
  }

  /// Bring one sibling's submodule up to date, preserving its local work
  pub fn sync_repository(&self, repo: &Repository, tag: Option<&ReleaseTag>) -> SyncResult<RepoReport> {
    let report = |outcome, stashed| RepoReport {
      name: repo.name.clone(),
      path: repo.path.clone(),
      outcome,
      stashed,
    };

    if !repo.exists() {
      self
        .reporter
        .warn(format!("Skipping missing repo: {}", repo.path.display()));
      return Ok(report(SyncOutcome::SkippedMissing, false));
    }

    self.reporter.line(format!("\n=== Updating {} ===", repo.name));

    let git = SystemGit::open(self.runner, &repo.path);

    let guard = if git.has_local_changes()? {
      self.reporter.step("stashing uncommitted changes");
      let guard = StashGuard::push(&git)?;
      if !guard.is_active() {
        // Dirt inside the submodule is not stashable
        self.reporter.step("nothing to stash");
      }
      guard
    } else {
      StashGuard::none(&git)
    };
    let stashed = guard.is_active();

    let result = self.update_submodule(&git, tag);

    if guard.is_active() {
      self.reporter.step("restoring stashed changes");
    }
    let outcome = guard.close(result)?;

    Ok(report(outcome, stashed))
  }

  fn update_submodule(&self, git: &SystemGit<'_>, tag: Option<&ReleaseTag>) -> SyncResult<SyncOutcome> {
    git.pull()?;
    git.update_submodules_remote()?;
    git.add(&self.config.submodule_path)?;

    if !git.has_staged_changes()? {
      self.reporter.step("no changes");
      return Ok(SyncOutcome::NoChange);
    }

    let message = self.config.messages.render(tag.map(|t| t.name.as_str()));
    git.commit(&message)?;
    self.reporter.step("committed changes");
    Ok(SyncOutcome::Committed)
  }
}
