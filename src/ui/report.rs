//! Operator-facing output
//!
//! Every state transition is echoed as one line so a human can audit what
//! happened before the first failure. With `--json`, narration moves to
//! stderr and stdout carries only the final [`RunReport`].

use crate::core::error::SyncResult;
use crate::core::sync::RepoReport;
use serde::Serialize;
#[cfg(test)]
use std::cell::RefCell;
use std::io::{self, Write};

enum Sink {
  Stdout,
  Stderr,
  #[cfg(test)]
  Buffer(RefCell<Vec<String>>),
}

/// Line-oriented console narration
pub struct Reporter {
  sink: Sink,
}

impl Reporter {
  /// Narrate on stdout, or on stderr when stdout is reserved for JSON
  pub fn new(json: bool) -> Self {
    Self {
      sink: if json { Sink::Stderr } else { Sink::Stdout },
    }
  }

  /// Write one line; a closed stream (`| head`) drops narration instead of panicking
  pub fn line(&self, msg: impl AsRef<str>) {
    match &self.sink {
      Sink::Stdout => {
        let _ = writeln!(io::stdout().lock(), "{}", msg.as_ref());
      }
      Sink::Stderr => {
        let _ = writeln!(io::stderr().lock(), "{}", msg.as_ref());
      }
      #[cfg(test)]
      Sink::Buffer(lines) => lines.borrow_mut().push(msg.as_ref().to_string()),
    }
  }

  pub fn warn(&self, msg: impl AsRef<str>) {
    self.line(format!("[WARN] {}", msg.as_ref()));
  }

  /// Indented step inside one repository
  pub fn step(&self, msg: impl AsRef<str>) {
    self.line(format!(" ↳ {}", msg.as_ref()));
  }

  #[cfg(test)]
  pub fn capture() -> Self {
    Self {
      sink: Sink::Buffer(RefCell::new(Vec::new())),
    }
  }

  #[cfg(test)]
  pub fn lines(&self) -> Vec<String> {
    match &self.sink {
      Sink::Buffer(lines) => lines.borrow().clone(),
      _ => Vec::new(),
    }
  }
}

/// Which entry path the orchestrator took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
  ExplicitTag,
  AutoDetect,
}

/// Summary of one orchestrator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
  pub mode: RunMode,
  /// Tag that triggered the sync; `None` when auto-detect found no release tags
  pub tag: Option<String>,
  /// Auto-detect moved the primary repository onto `tag`
  pub checked_out: bool,
  pub repositories: Vec<RepoReport>,
}

impl RunReport {
  pub fn to_json(&self) -> SyncResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}
