//! Sibling repository resolution

use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A sibling working tree, addressed by name under a common parent directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
  pub name: String,
  pub path: PathBuf,
}

impl Repository {
  pub fn new(parent_dir: &Path, name: &str) -> Self {
    Self {
      name: name.to_string(),
      path: parent_dir.join(name),
    }
  }

  pub fn exists(&self) -> bool {
    self.path.is_dir()
  }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn parse_repo_list(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(String::from)
    .collect()
}

/// Resolved repositories in caller order, plus the names dropped as duplicates
#[derive(Debug, Default)]
pub struct Resolved {
  pub repositories: Vec<Repository>,
  pub duplicates: Vec<String>,
}

/// Resolve names against `parent_dir`, keeping the first entry per path
pub fn resolve_siblings<S: AsRef<str>>(names: &[S], parent_dir: &Path) -> Resolved {
  let mut seen = HashSet::new();
  let mut resolved = Resolved::default();

  for name in names {
    let repo = Repository::new(parent_dir, name.as_ref());
    // "a" and "./a" land on the same directory
    let key: PathBuf = repo.path.components().collect();
    if seen.insert(key) {
      resolved.repositories.push(repo);
    } else {
      resolved.duplicates.push(repo.name);
    }
  }

  resolved
}
