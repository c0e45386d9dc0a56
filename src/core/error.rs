//! Error types for template-sync with contextual messages and exit codes
//!
//! Library code never terminates the process. Every failure travels up as a
//! [`SyncError`] and `main` maps it to an exit status through
//! [`SyncError::exit_code`].

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for template-sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, missing repository list)
  User,
  /// Malformed explicit release tag
  InvalidTag,
  /// A git command failed; carries the command's own status
  Command(i32),
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    match self {
      ExitCode::User => 1,
      ExitCode::InvalidTag => 2,
      ExitCode::Command(code) => code,
    }
  }
}

/// Main error type for template-sync
#[derive(Debug)]
pub enum SyncError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Explicit tag did not match `v<major>.<minor>.<patch>`
  InvalidTag { tag: String },

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl SyncError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    SyncError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Add context to an existing error
  ///
  /// Git failures keep their variant (and therefore their exit code); the
  /// context is appended to the captured error text.
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      SyncError::Message { message, context, help } => SyncError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      SyncError::Git(GitError::CommandFailed {
        command,
        cwd,
        stderr,
        code,
      }) => SyncError::Git(GitError::CommandFailed {
        command,
        cwd,
        stderr: if stderr.is_empty() {
          ctx_str
        } else {
          format!("{}\n{}", stderr, ctx_str)
        },
        code,
      }),
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      SyncError::Config(_) => ExitCode::User,
      SyncError::Git(GitError::CommandFailed { code, .. }) => ExitCode::Command(*code),
      SyncError::Git(_) => ExitCode::Command(1),
      SyncError::InvalidTag { .. } => ExitCode::InvalidTag,
      SyncError::Io(_) => ExitCode::User,
      SyncError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      SyncError::Config(e) => e.help_message(),
      SyncError::Git(e) => e.help_message(),
      SyncError::InvalidTag { .. } => {
        Some("Release tags look like v1.4.0 (no prefix, suffix or pre-release).".to_string())
      }
      SyncError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for SyncError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SyncError::Config(e) => write!(f, "{}", e),
      SyncError::Git(e) => write!(f, "{}", e),
      SyncError::InvalidTag { tag } => {
        write!(f, "Illegal tag: {} (expected v<major>.<minor>.<patch>)", tag)
      }
      SyncError::Io(e) => write!(f, "I/O error: {}", e),
      SyncError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for SyncError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      SyncError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for SyncError {
  fn from(err: io::Error) -> Self {
    SyncError::Io(err)
  }
}

impl From<serde_json::Error> for SyncError {
  fn from(err: serde_json::Error) -> Self {
    SyncError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Explicit --config file does not exist
  NotFound { path: PathBuf },

  /// File exists but is not valid TOML for our schema
  Parse { reason: String },

  /// A field holds a value we cannot work with
  InvalidField { field: String, reason: String },

  /// Neither the command line nor the config file named any repository
  NoRepositories,
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NoRepositories => Some(
        "Pass a comma-separated list, e.g. `template-sync site-a,site-b`, or set `repos` in template-sync.toml."
          .to_string(),
      ),
      ConfigError::InvalidField { field, .. } if field == "messages.tagged" => {
        Some("The tagged commit message must contain the `{tag}` placeholder.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "Config file not found: {}", path.display())
      }
      ConfigError::Parse { reason } => write!(f, "Invalid template-sync config: {}", reason),
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config value for '{}': {}", field, reason)
      }
      ConfigError::NoRepositories => write!(f, "No repositories to update"),
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command exited non-zero
  CommandFailed {
    command: String,
    cwd: PathBuf,
    stderr: String,
    code: i32,
  },

  /// Git could not be started at all
  Spawn { command: String, reason: String },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::CommandFailed { command, cwd, .. } if command.starts_with("git stash pop") => Some(format!(
        "Your local changes are still stashed. Run `git stash list` in {} and re-apply them by hand.",
        cwd.display()
      )),
      GitError::CommandFailed { command, stderr, .. } if command.starts_with("git tag ") => {
        if stderr.contains("already exists") {
          Some("Pick a new version, or omit --version to sync to the newest existing tag.".to_string())
        } else {
          None
        }
      }
      GitError::CommandFailed { command, stderr, .. } if command.starts_with("git push") => {
        if stderr.contains("non-fast-forward") || stderr.contains("rejected") {
          Some("The remote has commits you don't have. Pull first, then re-run.".to_string())
        } else {
          None
        }
      }
      GitError::Spawn { .. } => Some("Make sure `git` is installed and on PATH.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed {
        command, cwd, stderr, ..
      } => {
        write!(f, "[ERROR] ({}) {}", cwd.display(), command)?;
        if !stderr.is_empty() {
          write!(f, "\n{}", stderr)?;
        }
        Ok(())
      }
      GitError::Spawn { command, reason } => {
        write!(f, "Failed to run `{}`: {}", command, reason)
      }
    }
  }
}

/// Result type alias for template-sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> SyncResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<SyncError>,
{
  fn with_context<F>(self, f: F) -> SyncResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Print an error to stderr with its help text
pub fn print_error(error: &SyncError) {
  eprintln!("\n{}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("Help: {}\n", help);
  }
}
