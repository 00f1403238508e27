//! GitHub adapter
//!
//! - [`GitHubClient`] - REST client implementing [`CodeHost`]
//! - [`event`] - Actions event payload reader

pub mod event;

use std::fmt;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{excerpt, http_client};
use crate::core::models::{Milestone, MilestoneDraft, PullRequest, PullRequestUpdate, RepoRef};
use crate::core::ports::{CodeHost, CodeHostError};

pub use event::{EventError, read_event_file};

const API_VERSION: &str = "2022-11-28";

impl From<reqwest::Error> for CodeHostError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for CodeHostError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// GitHub REST client
pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: String,
}

impl fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl GitHubClient {
    /// Create a client for an API base URL such as `https://api.github.com`
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Result<Self, CodeHostError> {
        let http = http_client()?;
        Ok(Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn repo_url(&self, repo: &RepoRef, path: &str) -> String {
        format!("{}/repos/{}/{}/{path}", self.api_url, repo.owner, repo.name)
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, CodeHostError> {
        let response = builder
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(classify_error(status, &body))
    }

    fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, CodeHostError> {
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl CodeHost for GitHubClient {
    fn list_milestones(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Milestone>, CodeHostError> {
        let url = self.repo_url(repo, &format!("milestones?state=all&per_page={per_page}&page={page}"));
        debug!("GET {url}");
        Self::read_json(self.send(self.http.get(&url))?)
    }

    fn get_milestone(&self, repo: &RepoRef, number: u64) -> Result<Milestone, CodeHostError> {
        let url = self.repo_url(repo, &format!("milestones/{number}"));
        debug!("GET {url}");
        Self::read_json(self.send(self.http.get(&url))?)
    }

    fn create_milestone(
        &self,
        repo: &RepoRef,
        draft: &MilestoneDraft,
    ) -> Result<Milestone, CodeHostError> {
        let url = self.repo_url(repo, "milestones");
        debug!("POST {url} ({})", draft.title);
        Self::read_json(self.send(self.http.post(&url).json(draft))?)
    }

    fn update_milestone(
        &self,
        repo: &RepoRef,
        number: u64,
        draft: &MilestoneDraft,
    ) -> Result<Milestone, CodeHostError> {
        let url = self.repo_url(repo, &format!("milestones/{number}"));
        debug!("PATCH {url} ({})", draft.title);
        Self::read_json(self.send(self.http.patch(&url).json(draft))?)
    }

    fn get_pull_request(&self, repo: &RepoRef, number: u64) -> Result<PullRequest, CodeHostError> {
        let url = self.repo_url(repo, &format!("pulls/{number}"));
        debug!("GET {url}");
        Self::read_json(self.send(self.http.get(&url))?)
    }

    fn update_pull_request(
        &self,
        repo: &RepoRef,
        number: u64,
        update: &PullRequestUpdate,
    ) -> Result<u16, CodeHostError> {
        // Milestones are set through the issues endpoint
        let url = self.repo_url(repo, &format!("issues/{number}"));
        debug!("PATCH {url} (milestone {})", update.milestone);
        let response = self.send(self.http.patch(&url).json(update))?;
        Ok(response.status().as_u16())
    }
}

/// Validation failure body: `{"message": "...", "errors": [{"code": "already_exists", ...}]}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ValidationError>,
}

#[derive(Debug, Deserialize)]
struct ValidationError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    field: Option<String>,
}

fn classify_error(status: StatusCode, body: &str) -> CodeHostError {
    let parsed = serde_json::from_str::<ErrorBody>(body).ok();

    if status == StatusCode::UNPROCESSABLE_ENTITY {
        let conflict = parsed
            .as_ref()
            .and_then(|b| b.errors.iter().find(|e| e.code == "already_exists"));
        if let Some(conflict) = conflict {
            let field = conflict.field.as_deref().unwrap_or("resource");
            return CodeHostError::AlreadyExists(format!("{field} already exists"));
        }
    }

    let message = parsed
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| excerpt(body));
    CodeHostError::Status {
        status: status.as_u16(),
        message,
    }
}
