mod commands;
mod core;
mod ui;

use clap::Parser;
use crate::core::error::{SyncError, print_error};
use std::path::PathBuf;

/// Tag the template repository and propagate the release into sibling repositories
#[derive(Parser)]
#[command(name = "template-sync")]
#[command(about, long_about = None)]
#[command(styles = get_styles())]
struct Cli {
  /// Repository names to update (comma-separated); defaults to `repos` from the config file
  repos: Option<String>,

  /// Release tag to create and push (format vX.Y.Z). If omitted, sync to the newest remote v-tag
  #[arg(short = 'v', long = "version", value_name = "TAG")]
  tag: Option<String>,

  /// Config file (default: template-sync.toml in the current directory, if present)
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Submodule directory inside each sibling repository (default: src)
  #[arg(long, value_name = "PATH")]
  submodule_path: Option<String>,

  /// Remote to push the release tag to (default: origin)
  #[arg(long, value_name = "NAME")]
  remote: Option<String>,

  /// Directory containing the sibling repositories (default: parent of the current directory)
  #[arg(long, value_name = "DIR")]
  parent_dir: Option<PathBuf>,

  /// Print a JSON run report on stdout (progress goes to stderr)
  #[arg(long)]
  json: bool,

  /// Log every git command (RUST_LOG overrides)
  #[arg(short = 'V', long)]
  verbose: bool,
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_logging(verbose: bool) {
  let default_filter = if verbose { "debug" } else { "warn" };
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
    .format_timestamp(None)
    .format_target(false)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let result = commands::run_sync(commands::sync::SyncParams {
    repos: cli.repos,
    version: cli.tag,
    config: cli.config,
    submodule_path: cli.submodule_path,
    remote: cli.remote,
    parent_dir: cli.parent_dir,
    json: cli.json,
  });

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: SyncError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
