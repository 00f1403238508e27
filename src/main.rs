//! jira-transit - move Jira issues through their workflow from pull request events
//!
//! Runs as a CI step: reads the GitHub Actions event, finds the referenced
//! issue keys, applies the configured transition rules and keeps release
//! milestones in sync.

// Deny all clippy warnings in this crate
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unused_import_braces,
    unused_qualifications
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cargo_common_metadata
)]

mod cli;

/// Main entry point for the jira-transit CLI
fn main() -> anyhow::Result<()> {
    cli::run()
}
