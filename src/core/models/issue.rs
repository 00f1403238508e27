//! Tracker issue model
//!
//! Point-in-time reads of a tracker issue. Nothing here is cached across calls,
//! since workflow permissions can change between reads.

use serde::{Deserialize, Serialize};

/// A transition the tracker allows from the issue's current status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Tracker-assigned transition identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl Transition {
    /// Create a transition
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A release (fix version) attached to an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixVersion {
    /// Release identifier
    pub id: String,
    /// Release name
    pub name: String,
    /// Release date in `YYYY-MM-DD` form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

/// The fields of an issue this tool reads
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackerIssue {
    /// Issue key, e.g. `PROJ-123`
    pub key: String,
    /// Current status name
    pub status: String,
    /// Fix versions in tracker order
    pub fix_versions: Vec<FixVersion>,
    /// Key of the project the issue belongs to
    pub project_key: Option<String>,
}

/// Issue fields that can be requested from the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueField {
    /// Workflow status
    Status,
    /// Fix versions (releases)
    FixVersions,
    /// Owning project
    Project,
}

impl IssueField {
    /// Field name as understood by the tracker API
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::FixVersions => "fixVersions",
            Self::Project => "project",
        }
    }
}
