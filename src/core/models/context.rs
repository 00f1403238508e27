//! CI context model
//!
//! A `CiContext` is the normalized snapshot of the event that triggered a run.
//! It is built once per run and never mutated afterwards.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// Repository identity on the code host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoRef {
    /// Owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse an `owner/name` string (the `GITHUB_REPOSITORY` format)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (owner, name) = s.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Normalized facts about the triggering event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CiContext {
    /// Event kind, e.g. `pull_request` or `pull_request_review`
    pub event: String,
    /// Event action, e.g. `opened`, `submitted`, `closed`
    pub action: Option<String>,
    /// Head branch of the pull request
    pub source_branch: Option<String>,
    /// Base branch of the pull request
    pub target_branch: Option<String>,
    /// Pull request title
    pub title: String,
    /// Pull request body
    pub body: String,
    /// Whether the pull request is a draft
    pub is_draft: Option<bool>,
    /// Whether the pull request has been merged
    pub is_merged: Option<bool>,
    /// Lower-cased label names
    pub labels: BTreeSet<String>,
    /// Pull request number
    pub pr_number: Option<u64>,
    /// Repository the event belongs to
    pub repo: Option<RepoRef>,
}

impl CiContext {
    /// Create an empty context for an event kind
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Self::default()
        }
    }

    /// Set the event action
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the source (head) branch
    #[must_use]
    pub fn with_source_branch(mut self, branch: impl Into<String>) -> Self {
        self.source_branch = Some(branch.into());
        self
    }

    /// Set the target (base) branch
    #[must_use]
    pub fn with_target_branch(mut self, branch: impl Into<String>) -> Self {
        self.target_branch = Some(branch.into());
        self
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the labels (stored lower-cased)
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.labels = labels.into_iter().map(|l| l.as_ref().to_lowercase()).collect();
        self
    }

    /// Set the draft flag
    #[must_use]
    pub const fn with_draft(mut self, draft: bool) -> Self {
        self.is_draft = Some(draft);
        self
    }

    /// Set the merged flag
    #[must_use]
    pub const fn with_merged(mut self, merged: bool) -> Self {
        self.is_merged = Some(merged);
        self
    }

    /// Set the pull request identity
    #[must_use]
    pub fn with_pull_request(mut self, number: u64, repo: RepoRef) -> Self {
        self.pr_number = Some(number);
        self.repo = Some(repo);
        self
    }

    /// Pull request number and repository, when both are known
    #[must_use]
    pub fn pull_request_identity(&self) -> Option<(u64, &RepoRef)> {
        Some((self.pr_number?, self.repo.as_ref()?))
    }
}
