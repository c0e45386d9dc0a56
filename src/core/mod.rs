//! Core engine for template-sync
//!
//! - **config**: template-sync.toml discovery, parsing and CLI overrides
//! - **error**: Error types with contextual help messages and exit codes
//! - **exec**: Command execution (strict and probing flavours)
//! - **release**: Tag-and-push on the primary repository
//! - **repo**: Sibling repository resolution
//! - **stash**: Scoped stash transaction with guaranteed restore
//! - **sync**: Per-sibling submodule synchronization
//! - **tag**: Release tag validation and ordering
//! - **vcs**: Git operations abstraction (SystemGit)

pub mod config;
pub mod error;
pub mod exec;
pub mod release;
pub mod repo;
pub mod stash;
pub mod sync;
pub mod tag;
pub mod vcs;
