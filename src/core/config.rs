use crate::core::error::{ConfigError, ResultExt, SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder substituted with the release tag in commit messages
pub const TAG_PLACEHOLDER: &str = "{tag}";

/// Configuration for template-sync
/// Searched in order: template-sync.toml, .template-sync.toml, .config/template-sync.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
  /// Submodule directory inside every sibling repository
  #[serde(default = "default_submodule_path")]
  pub submodule_path: String,

  /// Remote the release tag is pushed to
  #[serde(default = "default_remote")]
  pub remote: String,

  /// Directory holding the sibling repositories (default: parent of the current directory)
  #[serde(default)]
  pub parent_dir: Option<PathBuf>,

  /// Sibling repositories used when none are given on the command line
  #[serde(default)]
  pub repos: Vec<String>,

  #[serde(default)]
  pub messages: MessageConfig,
}

/// Commit messages written into sibling repositories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageConfig {
  /// Used when a release tag triggered the run; must contain `{tag}`
  #[serde(default = "default_tagged_message")]
  pub tagged: String,

  /// Used when no tag is known
  #[serde(default = "default_latest_message")]
  pub latest: String,
}

fn default_submodule_path() -> String {
  "src".to_string()
}

fn default_remote() -> String {
  "origin".to_string()
}

fn default_tagged_message() -> String {
  "chore: auto-update to template {tag}".to_string()
}

fn default_latest_message() -> String {
  "chore: auto-update to latest template".to_string()
}

impl Default for MessageConfig {
  fn default() -> Self {
    Self {
      tagged: default_tagged_message(),
      latest: default_latest_message(),
    }
  }
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      submodule_path: default_submodule_path(),
      remote: default_remote(),
      parent_dir: None,
      repos: Vec::new(),
      messages: MessageConfig::default(),
    }
  }
}

impl MessageConfig {
  /// Commit message for a run triggered by `tag` (or by no tag at all)
  pub fn render(&self, tag: Option<&str>) -> String {
    match tag {
      Some(tag) => self.tagged.replace(TAG_PLACEHOLDER, tag),
      None => self.latest.clone(),
    }
  }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub submodule_path: Option<String>,
  pub remote: Option<String>,
  pub parent_dir: Option<PathBuf>,
}

impl SyncConfig {
  /// Find config file in search order: template-sync.toml, .template-sync.toml, .config/template-sync.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("template-sync.toml"),
      path.join(".template-sync.toml"),
      path.join(".config").join("template-sync.toml"),
    ];

    candidates.into_iter().find(|p| p.is_file())
  }

  /// Load the config discovered in `path`, or defaults when there is none
  pub fn discover(path: &Path) -> SyncResult<Self> {
    match Self::find_config_path(path) {
      Some(config_path) => Self::load_file(&config_path),
      None => Ok(Self::default()),
    }
  }

  /// Load and validate one config file
  pub fn load_file(config_path: &Path) -> SyncResult<Self> {
    if !config_path.is_file() {
      return Err(SyncError::Config(ConfigError::NotFound {
        path: config_path.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: SyncConfig = toml_edit::de::from_str(&content).map_err(|e| {
      SyncError::Config(ConfigError::Parse {
        reason: format!("{}: {}", config_path.display(), e),
      })
    })?;

    config.validate()?;
    log::debug!("loaded config from {}", config_path.display());
    Ok(config)
  }

  /// Apply command-line overrides, then re-validate
  pub fn with_overrides(mut self, overrides: ConfigOverrides) -> SyncResult<Self> {
    if let Some(submodule_path) = overrides.submodule_path {
      self.submodule_path = submodule_path;
    }
    if let Some(remote) = overrides.remote {
      self.remote = remote;
    }
    if let Some(parent_dir) = overrides.parent_dir {
      self.parent_dir = Some(parent_dir);
    }
    self.validate()?;
    Ok(self)
  }

  /// Validate field values
  pub fn validate(&self) -> SyncResult<()> {
    if self.submodule_path.trim().is_empty() {
      return Err(invalid("submodule_path", "must not be empty"));
    }
    if self.remote.trim().is_empty() {
      return Err(invalid("remote", "must not be empty"));
    }
    if !self.messages.tagged.contains(TAG_PLACEHOLDER) {
      return Err(invalid("messages.tagged", "missing the {tag} placeholder"));
    }
    if self.messages.latest.trim().is_empty() {
      return Err(invalid("messages.latest", "must not be empty"));
    }
    Ok(())
  }

  /// Directory the sibling repositories live in
  pub fn siblings_dir(&self, cwd: &Path) -> PathBuf {
    match &self.parent_dir {
      Some(dir) if dir.is_absolute() => dir.clone(),
      Some(dir) => cwd.join(dir),
      None => cwd.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf()),
    }
  }
}

fn invalid(field: &str, reason: &str) -> SyncError {
  SyncError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}
