//! Command execution against a working directory
//!
//! Two flavours sit on top of a single [`CommandRunner::execute`]:
//!
//! - [`CommandRunner::run_strict`]: non-zero exit is a [`GitError::CommandFailed`]
//!   carrying the command, working directory, captured stderr and exit code.
//!   Callers propagate it with `?`, which aborts the whole run.
//! - [`CommandRunner::run_probe`]: returns the exit code; non-zero is an
//!   expected answer ("yes, there is a diff"), not a failure.
//!
//! The trait is the seam tests use to script git without touching disk.

use crate::core::error::{GitError, SyncError, SyncResult};
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
  /// Exit status; a process killed by a signal reports 1
  pub code: i32,
  pub stdout: String,
  pub stderr: String,
}

impl CommandOutput {
  pub fn success(&self) -> bool {
    self.code == 0
  }
}

/// Render a command the way it is shown to the operator
pub fn display_command(program: &str, args: &[&str]) -> String {
  if args.is_empty() {
    program.to_string()
  } else {
    format!("{} {}", program, args.join(" "))
  }
}

/// Runs commands in a working directory
pub trait CommandRunner {
  /// Run `program args..` with `cwd` as current directory and capture its output
  ///
  /// Only fails when the process cannot be started; a non-zero exit is
  /// reported through [`CommandOutput::code`].
  fn execute(&self, program: &str, args: &[&str], cwd: &Path) -> SyncResult<CommandOutput>;

  /// Run a command that must succeed; returns trimmed stdout
  fn run_strict(&self, program: &str, args: &[&str], cwd: &Path) -> SyncResult<String> {
    let output = self.execute(program, args, cwd)?;

    if !output.success() {
      return Err(SyncError::Git(GitError::CommandFailed {
        command: display_command(program, args),
        cwd: cwd.to_path_buf(),
        stderr: output.stderr.trim().to_string(),
        code: output.code,
      }));
    }

    Ok(output.stdout.trim().to_string())
  }

  /// Run a presence/absence check; returns the exit code
  fn run_probe(&self, program: &str, args: &[&str], cwd: &Path) -> SyncResult<i32> {
    Ok(self.execute(program, args, cwd)?.code)
  }
}

/// Runs real processes via `std::process::Command`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
  fn build(program: &str, args: &[&str], cwd: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd.current_dir(cwd);

    if program == "git" {
      // Force predictable output (override user config)
      cmd.arg("-c").arg("advice.detachedHead=false");
      cmd.arg("-c").arg("core.quotePath=false");
      // Never block on a credential prompt
      cmd.env("GIT_TERMINAL_PROMPT", "0");
    }

    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd
  }
}

impl CommandRunner for SystemRunner {
  fn execute(&self, program: &str, args: &[&str], cwd: &Path) -> SyncResult<CommandOutput> {
    let command = display_command(program, args);
    log::debug!("running `{}` in {}", command, cwd.display());

    let output = Self::build(program, args, cwd).output().map_err(|e| {
      SyncError::Git(GitError::Spawn {
        command: command.clone(),
        reason: e.to_string(),
      })
    })?;

    let code = output.status.code().unwrap_or(1);
    if code != 0 {
      log::debug!("`{}` exited with {}", command, code);
    }

    Ok(CommandOutput {
      code,
      stdout: String::from_utf8_lossy(&output.stdout).to_string(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
  }
}
