//! Issue tracker port
//!
//! Defines the interface for reading and transitioning tracker issues.

use thiserror::Error;

use crate::core::models::{IssueField, TrackerIssue, Transition};

/// Errors reported by an issue tracker
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The request could not be sent or the response not received
    #[error("tracker request failed: {0}")]
    Transport(String),

    /// The tracker answered with a non-success status
    #[error("tracker returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("unexpected tracker response: {0}")]
    Decode(String),
}

/// Issue tracker abstraction
///
/// Every call is a fresh read; implementations must not cache results.
#[cfg_attr(test, mockall::automock)]
pub trait IssueTracker {
    /// Fetch an issue with the requested fields
    fn get_issue(&self, key: &str, fields: &[IssueField]) -> Result<TrackerIssue, TrackerError>;

    /// List the transitions allowed from the issue's current status
    fn list_transitions(&self, key: &str) -> Result<Vec<Transition>, TrackerError>;

    /// Execute a transition by id
    fn transition_issue(&self, key: &str, transition_id: &str) -> Result<(), TrackerError>;
}
