//! CLI commands for template-sync
//!
//! - **sync**: tag-and-push (explicit tag) or follow the newest remote tag
//!   (auto-detect), then update every sibling repository

pub mod sync;

pub use sync::run_sync;
