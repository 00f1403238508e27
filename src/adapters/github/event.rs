//! GitHub Actions event payload reader
//!
//! Turns the JSON payload of a workflow run into a [`CiContext`]. Missing
//! fields are absent in the context, never an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::models::{CiContext, RepoRef};

/// Errors reading an event payload
#[derive(Debug, Error)]
pub enum EventError {
    /// The payload file could not be read
    #[error("failed to read event payload {}: {source}", .path.display())]
    Read {
        /// Payload path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The payload is not valid JSON
    #[error("event payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The repository identity is not `owner/name`
    #[error("invalid repository {0:?} (expected owner/name)")]
    Repository(String),
}

#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    action: Option<String>,
    pull_request: Option<PullRequestPayload>,
    repository: Option<RepositoryPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: Option<u64>,
    title: Option<String>,
    body: Option<String>,
    draft: Option<bool>,
    merged: Option<bool>,
    base: Option<BranchPayload>,
    head: Option<BranchPayload>,
    labels: Option<Vec<LabelPayload>>,
}

#[derive(Debug, Deserialize)]
struct BranchPayload {
    #[serde(rename = "ref")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LabelPayload {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryPayload {
    name: Option<String>,
    owner: Option<OwnerPayload>,
}

#[derive(Debug, Deserialize)]
struct OwnerPayload {
    login: Option<String>,
}

impl RepositoryPayload {
    fn into_repo_ref(self) -> Option<RepoRef> {
        let owner = self.owner?.login?;
        let name = self.name?;
        Some(RepoRef::new(owner, name))
    }
}

/// Read the event payload file written by the runner
pub fn read_event_file(path: &Path) -> Result<String, EventError> {
    fs::read_to_string(path).map_err(|source| EventError::Read {
        path: path.to_path_buf(),
        source,
    })
}

impl CiContext {
    /// Build the context from an event name and its JSON payload
    ///
    /// `repository` is the `owner/name` string the runner exposes; when absent
    /// the payload's `repository` object is used instead.
    pub fn from_github_event(
        event_name: &str,
        payload: &str,
        repository: Option<&str>,
    ) -> Result<Self, EventError> {
        let payload: EventPayload = if payload.trim().is_empty() {
            EventPayload::default()
        } else {
            serde_json::from_str(payload)?
        };

        let repo = match repository.map(str::trim).filter(|r| !r.is_empty()) {
            Some(r) => Some(RepoRef::parse(r).ok_or_else(|| EventError::Repository(r.to_string()))?),
            None => payload.repository.and_then(RepositoryPayload::into_repo_ref),
        };

        let mut ctx = Self::new(event_name);
        ctx.action = payload.action;
        ctx.repo = repo;

        if let Some(pr) = payload.pull_request {
            ctx.pr_number = pr.number;
            ctx.title = pr.title.unwrap_or_default();
            ctx.body = pr.body.unwrap_or_default();
            ctx.is_draft = pr.draft;
            ctx.is_merged = pr.merged;
            ctx.target_branch = pr.base.and_then(|b| b.name);
            ctx.source_branch = pr.head.and_then(|b| b.name);
            let labels = pr.labels.unwrap_or_default();
            ctx = ctx.with_labels(labels.iter().filter_map(|l| l.name.as_deref()));
        }

        Ok(ctx)
    }
}
