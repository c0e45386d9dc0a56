//! Test helpers for integration tests
//!
//! Layout of a [`TestFleet`] inside its temp dir:
//!
//! ```text
//! home/                 HOME for every git and template-sync process
//! remotes/template.git  bare remote of the template
//! remotes/<site>.git    bare remote of each sibling
//! work/template         clone of the template (the tool runs here)
//! work/<site>           clone of each sibling, template mounted at src/
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const GITCONFIG: &str = r#"[user]
	name = Test User
	email = test@example.com
[init]
	defaultBranch = main
[pull]
	rebase = false
[protocol "file"]
	allow = always
[commit]
	gpgsign = false
[tag]
	gpgsign = false
[advice]
	detachedHead = false
"#;

/// A template repository plus sibling repositories that embed it
pub struct TestFleet {
  _root: TempDir,
  pub home: PathBuf,
  pub remotes: PathBuf,
  pub work: PathBuf,
}

impl TestFleet {
  /// Create the template (one pushed commit) with no siblings yet
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let home = root.path().join("home");
    let remotes = root.path().join("remotes");
    let work = root.path().join("work");
    for dir in [&home, &remotes, &work] {
      std::fs::create_dir_all(dir)?;
    }
    std::fs::write(home.join(".gitconfig"), GITCONFIG)?;

    let fleet = Self {
      _root: root,
      home,
      remotes,
      work,
    };

    let bare = fleet.remote("template");
    fleet.git(&fleet.remotes, &["init", "--bare", &bare.display().to_string()])?;
    fleet.git(&fleet.work, &["clone", &bare.display().to_string(), "template"])?;
    let template = fleet.template();
    fleet.commit_file(&template, "README.md", "# template\n", "Initial template")?;
    fleet.git(&template, &["push", "-u", "origin", "main"])?;

    Ok(fleet)
  }

  pub fn template(&self) -> PathBuf {
    self.work.join("template")
  }

  pub fn site(&self, name: &str) -> PathBuf {
    self.work.join(name)
  }

  pub fn remote(&self, name: &str) -> PathBuf {
    self.remotes.join(format!("{}.git", name))
  }

  /// Create a sibling whose `src/` is the template, tracking `main`
  pub fn add_site(&self, name: &str) -> Result<PathBuf> {
    let bare = self.remote(name);
    self.git(&self.remotes, &["init", "--bare", &bare.display().to_string()])?;
    self.git(&self.work, &["clone", &bare.display().to_string(), name])?;

    let site = self.site(name);
    std::fs::write(site.join("README.md"), format!("# {}\n", name))?;
    let template_remote = self.remote("template").display().to_string();
    self.git(&site, &["submodule", "add", "-b", "main", &template_remote, "src"])?;
    self.git(&site, &["add", "."])?;
    self.git(&site, &["commit", "-m", "Add template submodule"])?;
    self.git(&site, &["push", "-u", "origin", "main"])?;

    Ok(site)
  }

  /// Run git with the fleet's HOME; fails on non-zero exit
  pub fn git(&self, cwd: &Path, args: &[&str]) -> Result<String> {
    let output = self
      .command("git", cwd)
      .args(args)
      .output()
      .context("Failed to run git command")?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Write a file, stage everything and commit; returns the new HEAD
  pub fn commit_file(&self, repo: &Path, file: &str, content: &str, message: &str) -> Result<String> {
    std::fs::write(repo.join(file), content)?;
    self.git(repo, &["add", "."])?;
    self.git(repo, &["commit", "-m", message])?;
    self.head(repo)
  }

  pub fn head(&self, repo: &Path) -> Result<String> {
    self.git(repo, &["rev-parse", "HEAD"])
  }

  pub fn commit_count(&self, repo: &Path) -> Result<usize> {
    Ok(self.git(repo, &["rev-list", "--count", "HEAD"])?.parse()?)
  }

  pub fn last_subject(&self, repo: &Path) -> Result<String> {
    self.git(repo, &["log", "-1", "--format=%s"])
  }

  /// Commit recorded for `src` in the sibling's HEAD
  pub fn pinned_template(&self, site: &Path) -> Result<String> {
    let entry = self.git(site, &["ls-tree", "HEAD", "src"])?;
    // "160000 commit <sha>\tsrc"
    entry
      .split_whitespace()
      .nth(2)
      .map(String::from)
      .context("src is not recorded in HEAD")
  }

  /// Run template-sync in `cwd`; never fails on the tool's exit status
  pub fn run_template_sync(&self, cwd: &Path, args: &[&str]) -> Result<Output> {
    let bin = env!("CARGO_BIN_EXE_template-sync");
    self
      .command(bin, cwd)
      .args(args)
      .output()
      .context("Failed to run template-sync")
  }

  /// Like `run_template_sync`, but the reading end of stdout is closed right after spawn
  pub fn run_template_sync_stdout_closed(&self, cwd: &Path, args: &[&str]) -> Result<Output> {
    let bin = env!("CARGO_BIN_EXE_template-sync");
    let mut child = self
      .command(bin, cwd)
      .args(args)
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .context("Failed to spawn template-sync")?;
    drop(child.stdout.take());
    child.wait_with_output().context("Failed to wait for template-sync")
  }

  fn command(&self, program: &str, cwd: &Path) -> Command {
    let mut cmd = Command::new(program);
    cmd
      .current_dir(cwd)
      .env("HOME", &self.home)
      .env("XDG_CONFIG_HOME", self.home.join(".config"))
      .env("GIT_CONFIG_NOSYSTEM", "1")
      .env_remove("GIT_CONFIG_GLOBAL")
      .env_remove("GIT_DIR")
      .env_remove("GIT_WORK_TREE")
      .env_remove("GIT_INDEX_FILE")
      .env_remove("RUST_LOG");
    cmd
  }
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}

/// Fail with both streams when the tool did not exit 0
pub fn assert_success(output: &Output) {
  assert!(
    output.status.success(),
    "template-sync failed ({:?})\nstdout: {}\nstderr: {}",
    output.status.code(),
    stdout(output),
    stderr(output)
  );
}
