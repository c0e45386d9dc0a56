//! Integration tests for template-sync
//!
//! Every test builds real git repositories in a temp dir and drives the
//! compiled binary against them.

mod helpers;

mod test_config;
