//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `jira/` - Jira REST v2 issue tracker
//! - `github/` - GitHub REST code host and Actions event payloads

pub mod github;
pub mod jira;

pub use github::{EventError, GitHubClient, read_event_file};
pub use jira::JiraClient;

use std::time::Duration;

use reqwest::blocking::Client;

/// Longest time to wait for a connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Longest time a single request may take
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared HTTP client settings for both services
fn http_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(crate::USER_AGENT)
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Longest response body excerpt carried in an error
const BODY_EXCERPT_LEN: usize = 300;

/// Trim a response body for inclusion in an error message
fn excerpt(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
