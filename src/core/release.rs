//! Tag the primary repository and publish the tag
//!
//! All three steps must succeed. There is no rollback: if pushing fails, the
//! local tag stays behind and a re-run with the same tag fails at `git tag`.

use crate::core::error::SyncResult;
use crate::core::tag::ReleaseTag;
use crate::core::vcs::SystemGit;
use crate::ui::report::Reporter;

/// Create `tag` on HEAD, push the current branch, then push the tag to `remote`
pub fn tag_and_push(git: &SystemGit<'_>, tag: &ReleaseTag, remote: &str, reporter: &Reporter) -> SyncResult<()> {
  reporter.line(format!("▶ Tagging {} with {}", git.work_tree().display(), tag));

  git.create_tag(&tag.name)?;
  git.push()?;
  git.push_tag(remote, &tag.name)?;

  Ok(())
}
