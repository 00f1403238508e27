//! Domain models
//!
//! Core data types for jira-transit.

mod context;
mod issue;
mod milestone;
mod rule;

pub use context::{CiContext, RepoRef};
pub use issue::{FixVersion, IssueField, TrackerIssue, Transition};
pub use milestone::{
    Milestone, MilestoneDraft, PullRequest, PullRequestUpdate, ReleaseLink, canonical_release_url,
    due_date_for,
};
pub use rule::{Criteria, TransitionRule, eq_ignore_case};
