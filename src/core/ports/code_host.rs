//! Code host port
//!
//! Defines the interface for milestone and pull request operations.

use thiserror::Error;

use crate::core::models::{Milestone, MilestoneDraft, PullRequest, PullRequestUpdate, RepoRef};

/// Errors reported by a code host
#[derive(Debug, Error)]
pub enum CodeHostError {
    /// The request could not be sent or the response not received
    #[error("code host request failed: {0}")]
    Transport(String),

    /// A resource with the same unique field already exists
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// The code host answered with a non-success status
    #[error("code host returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body excerpt
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("unexpected code host response: {0}")]
    Decode(String),
}

/// Code host abstraction
#[cfg_attr(test, mockall::automock)]
pub trait CodeHost {
    /// List one page of milestones (all states), 1-based page numbers
    ///
    /// A page shorter than `per_page` is the last one.
    fn list_milestones(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Milestone>, CodeHostError>;

    /// Fetch a single milestone
    fn get_milestone(&self, repo: &RepoRef, number: u64) -> Result<Milestone, CodeHostError>;

    /// Create a milestone
    fn create_milestone(
        &self,
        repo: &RepoRef,
        draft: &MilestoneDraft,
    ) -> Result<Milestone, CodeHostError>;

    /// Update an existing milestone
    fn update_milestone(
        &self,
        repo: &RepoRef,
        number: u64,
        draft: &MilestoneDraft,
    ) -> Result<Milestone, CodeHostError>;

    /// Fetch a pull request
    fn get_pull_request(&self, repo: &RepoRef, number: u64) -> Result<PullRequest, CodeHostError>;

    /// Update a pull request, returning the HTTP status of the write
    fn update_pull_request(
        &self,
        repo: &RepoRef,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<u16, CodeHostError>;
}
