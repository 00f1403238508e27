//! jira-transit - move Jira issues through their workflow from pull request events
//!
//! This library provides the rule engine that decides which tracker transition a
//! pull request event should trigger, the synchronizer that applies it, and the
//! reconciler that keeps Jira releases and GitHub milestones linked.

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

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent sent with every API request
pub const USER_AGENT: &str = concat!("jira-transit/", env!("CARGO_PKG_VERSION"));

pub mod adapters;
pub mod config;
pub mod core;
pub mod output;
