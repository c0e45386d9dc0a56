use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::core::config::{ConfigOverrides, SyncConfig};
use crate::core::error::{ConfigError, SyncError, SyncResult};
use crate::core::exec::{CommandRunner, SystemRunner};
use crate::core::release::tag_and_push;
use crate::core::repo::{Repository, parse_repo_list, resolve_siblings};
use crate::core::sync::SiblingSync;
use crate::core::tag::{ReleaseTag, is_on_head, is_semver, newest_tag};
use crate::core::vcs::SystemGit;
use crate::ui::report::{Reporter, RunMode, RunReport};

/// Sync command parameters
pub struct SyncParams {
  /// Comma-separated sibling names
  pub repos: Option<String>,
  /// Explicit release tag
  pub version: Option<String>,
  pub config: Option<PathBuf>,
  pub submodule_path: Option<String>,
  pub remote: Option<String>,
  pub parent_dir: Option<PathBuf>,
  pub json: bool,
}

/// Entry state chosen from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  /// Tag HEAD with this tag, push, then sync
  ExplicitTag(ReleaseTag),
  /// Follow the newest release tag already on the remote
  AutoDetect,
}

impl Mode {
  /// Validate an optional explicit tag
  pub fn from_arg(version: Option<&str>) -> SyncResult<Self> {
    match version {
      Some(raw) => ReleaseTag::parse(raw)
        .map(Mode::ExplicitTag)
        .ok_or_else(|| SyncError::InvalidTag { tag: raw.to_string() }),
      None => Ok(Mode::AutoDetect),
    }
  }
}

/// Run the sync command
pub fn run_sync(params: SyncParams) -> SyncResult<()> {
  // Malformed tags are rejected before anything else is read or run
  let mode = Mode::from_arg(params.version.as_deref())?;

  let cwd = env::current_dir()?;
  let config = match &params.config {
    Some(path) => SyncConfig::load_file(path)?,
    None => SyncConfig::discover(&cwd)?,
  }
  .with_overrides(ConfigOverrides {
    submodule_path: params.submodule_path,
    remote: params.remote,
    parent_dir: params.parent_dir,
  })?;

  let names = match params.repos.as_deref().map(parse_repo_list) {
    Some(names) if !names.is_empty() => names,
    _ => config.repos.clone(),
  };
  if names.is_empty() {
    return Err(SyncError::Config(ConfigError::NoRepositories));
  }

  let reporter = Reporter::new(params.json);
  let resolved = resolve_siblings(&names, &config.siblings_dir(&cwd));
  for duplicate in &resolved.duplicates {
    reporter.warn(format!("Ignoring duplicate repo: {}", duplicate));
  }

  let runner = SystemRunner;
  let orchestrator = Orchestrator::new(&runner, &config, &reporter, &cwd, resolved.repositories);
  let report = orchestrator.run(mode)?;

  if params.json {
    writeln!(io::stdout().lock(), "{}", report.to_json()?)?;
  }

  Ok(())
}

/// Dispatches between explicit-tag and auto-detect mode, then syncs every sibling
pub struct Orchestrator<'a> {
  runner: &'a dyn CommandRunner,
  config: &'a SyncConfig,
  reporter: &'a Reporter,
  primary: PathBuf,
  siblings: Vec<Repository>,
}

impl<'a> Orchestrator<'a> {
  pub fn new(
    runner: &'a dyn CommandRunner,
    config: &'a SyncConfig,
    reporter: &'a Reporter,
    primary: &Path,
    siblings: Vec<Repository>,
  ) -> Self {
    Self {
      runner,
      config,
      reporter,
      primary: primary.to_path_buf(),
      siblings,
    }
  }

  pub fn run(&self, mode: Mode) -> SyncResult<RunReport> {
    match mode {
      Mode::ExplicitTag(tag) => self.run_explicit(tag),
      Mode::AutoDetect => self.run_auto_detect(),
    }
  }

  fn run_explicit(&self, tag: ReleaseTag) -> SyncResult<RunReport> {
    let git = SystemGit::open(self.runner, &self.primary);
    tag_and_push(&git, &tag, &self.config.remote, self.reporter)?;

    self.sync_all(RunMode::ExplicitTag, tag, false)
  }

  fn run_auto_detect(&self) -> SyncResult<RunReport> {
    let git = SystemGit::open(self.runner, &self.primary);

    self.reporter.line("No tag specified, pulling latest commits...");
    git.pull()?;
    git.fetch_tags()?;

    let tags = git.list_tags()?;
    for ignored in tags.iter().filter(|t| !is_semver(t)) {
      log::debug!("ignoring non-release tag {}", ignored);
    }

    let Some(newest) = newest_tag(&tags) else {
      self.reporter.line("No v-style tags found, exiting.");
      return Ok(RunReport {
        mode: RunMode::AutoDetect,
        tag: None,
        checked_out: false,
        repositories: Vec::new(),
      });
    };

    let checked_out = if is_on_head(&newest, &git.tags_at_head()?) {
      self
        .reporter
        .line("Already on the latest tag, still updating sibling repos...");
      false
    } else {
      self
        .reporter
        .line(format!("Newer tag detected: {}, checking out...", newest));
      git.checkout(&newest.name)?;
      true
    };

    self.sync_all(RunMode::AutoDetect, newest, checked_out)
  }

  fn sync_all(&self, mode: RunMode, tag: ReleaseTag, checked_out: bool) -> SyncResult<RunReport> {
    let repositories = SiblingSync::new(self.runner, self.config, self.reporter).sync_all(&self.siblings, Some(&tag))?;

    Ok(RunReport {
      mode,
      tag: Some(tag.name),
      checked_out,
      repositories,
    })
  }
}
