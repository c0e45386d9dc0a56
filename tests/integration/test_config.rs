//! Tests for template-sync.toml and command-line overrides

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_repos_and_message_from_config() -> Result<()> {
  let fleet = TestFleet::new()?;
  let site = fleet.add_site("site-a")?;
  let template = fleet.template();
  fleet.commit_file(&template, "x.txt", "x\n", "Template change")?;
  std::fs::write(
    template.join("template-sync.toml"),
    "repos = [\"site-a\"]\n\n[messages]\ntagged = \"deps: template {tag}\"\n",
  )?;

  let output = fleet.run_template_sync(&template, &["--version", "v1.0.0"])?;
  assert_success(&output);

  assert!(stdout(&output).contains("=== Updating site-a ==="));
  assert_eq!(fleet.last_subject(&site)?, "deps: template v1.0.0");

  Ok(())
}

#[test]
fn test_no_repositories_is_user_error() -> Result<()> {
  let fleet = TestFleet::new()?;
  let template = fleet.template();

  let output = fleet.run_template_sync(&template, &["--version", "v1.0.0"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No repositories to update"));
  assert_eq!(fleet.git(&template, &["tag"])?, "");

  Ok(())
}

#[test]
fn test_invalid_config_stops_before_git() -> Result<()> {
  let fleet = TestFleet::new()?;
  fleet.add_site("site-a")?;
  let template = fleet.template();
  std::fs::write(template.join(".template-sync.toml"), "[messages]\ntagged = \"no placeholder\"\n")?;

  let output = fleet.run_template_sync(&template, &["site-a", "--version", "v1.0.0"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("messages.tagged"));
  assert_eq!(fleet.git(&template, &["tag"])?, "");

  Ok(())
}

#[test]
fn test_submodule_path_and_parent_dir_overrides() -> Result<()> {
  let fleet = TestFleet::new()?;
  let template = fleet.template();

  // A sibling that mounts the template somewhere other than src/, outside the default parent
  let sites = fleet.work.join("sites");
  std::fs::create_dir(&sites)?;
  let blog_remote = fleet.remote("blog").display().to_string();
  fleet.git(&fleet.remotes, &["init", "--bare", &blog_remote])?;
  fleet.git(&sites, &["clone", &blog_remote, "blog"])?;
  let blog = sites.join("blog");
  let template_remote = fleet.remote("template").display().to_string();
  fleet.git(&blog, &["submodule", "add", "-b", "main", &template_remote, "theme"])?;
  fleet.git(&blog, &["commit", "-m", "Add theme"])?;
  fleet.git(&blog, &["push", "-u", "origin", "main"])?;

  let released = fleet.commit_file(&template, "x.txt", "x\n", "Template change")?;

  let output = fleet.run_template_sync(
    &template,
    &[
      "blog",
      "--version",
      "v1.1.0",
      "--submodule-path",
      "theme",
      "--parent-dir",
      "../sites",
    ],
  )?;
  assert_success(&output);

  let entry = fleet.git(&blog, &["ls-tree", "HEAD", "theme"])?;
  assert!(entry.contains(&released), "theme entry: {}", entry);
  assert_eq!(fleet.last_subject(&blog)?, "chore: auto-update to template v1.1.0");

  Ok(())
}
