//! Release milestone model
//!
//! A tracker release maps 1:1 to a code-host milestone. The milestone's
//! description embeds a canonical release URL, and that URL is the join key.
//! Titles can be renamed on either side and are never used for lookup.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::FixVersion;

/// A milestone on the code host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone number
    pub number: u64,
    /// Display title
    pub title: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Due date (RFC 3339)
    #[serde(default)]
    pub due_on: Option<String>,
}

impl Milestone {
    /// Check whether this milestone's description embeds the given release URL
    #[must_use]
    pub fn references(&self, release_url: &str) -> bool {
        self.description.as_deref().is_some_and(|d| d.contains(release_url))
    }
}

/// Fields sent when creating or updating a milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MilestoneDraft {
    /// Title
    pub title: String,
    /// Description (left unchanged on update when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Due date (left unchanged on update when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<String>,
}

/// The parts of a pull request the reconciler reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Pull request number
    pub number: u64,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Body
    #[serde(default)]
    pub body: Option<String>,
    /// Attached milestone
    #[serde(default)]
    pub milestone: Option<Milestone>,
}

/// Fields sent when attaching a milestone to a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestUpdate {
    /// Milestone number to attach
    pub milestone: u64,
    /// Title to resend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body to resend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PullRequestUpdate {
    /// Attach a milestone without touching anything else
    #[must_use]
    pub const fn milestone_only(milestone: u64) -> Self {
        Self {
            milestone,
            title: None,
            body: None,
        }
    }
}

/// A tracker release resolved into everything the milestone needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseLink {
    /// Release name, authoritative for the milestone title
    pub name: String,
    /// Canonical release URL, authoritative for identity
    pub url: String,
    /// Milestone due date computed from the release date
    pub due_on: Option<String>,
}

impl ReleaseLink {
    /// Build the link for a fix version of an issue in `project_key`
    #[must_use]
    pub fn new(tracker_host: &str, project_key: &str, release: &FixVersion) -> Self {
        Self {
            name: release.name.clone(),
            url: canonical_release_url(tracker_host, project_key, &release.id),
            due_on: release.release_date.as_deref().and_then(due_date_for),
        }
    }

    /// Description written into a newly created milestone
    #[must_use]
    pub fn description(&self) -> String {
        format!("JIRA Release: {}", self.url)
    }
}

/// Canonical, deterministic URL identifying a tracker release
#[must_use]
pub fn canonical_release_url(tracker_host: &str, project_key: &str, release_id: &str) -> String {
    format!(
        "https://{tracker_host}/projects/{project_key}/versions/{release_id}/tab/release-report-all-issues"
    )
}

/// Milestone due date for a `YYYY-MM-DD` release date
///
/// The release date carries no time of day, so the milestone is due at the
/// start of the following day (UTC).
#[must_use]
pub fn due_date_for(release_date: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(release_date.trim(), "%Y-%m-%d").ok()?;
    let next = date.checked_add_days(Days::new(1))?;
    Some(format!("{}T00:00:00Z", next.format("%Y-%m-%d")))
}
