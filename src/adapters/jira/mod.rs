//! Jira REST v2 adapter
//!
//! Blocking HTTP client implementing [`IssueTracker`]. Every call goes to the
//! server; nothing is cached.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{excerpt, http_client};
use crate::config::Config;
use crate::core::models::{FixVersion, IssueField, TrackerIssue, Transition};
use crate::core::ports::{IssueTracker, TrackerError};

impl From<reqwest::Error> for TrackerError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Jira issue tracker client
pub struct JiraClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
}

impl fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    /// Create a client for an API base URL such as `https://host/rest/api/2`
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        let http = http_client()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
        })
    }

    /// Create a client from the loaded configuration and resolved password
    pub fn from_config(config: &Config, password: &str) -> Result<Self, TrackerError> {
        Self::new(config.tracker_api_url(), &config.connection.username, password)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
    }

    fn send(&self, builder: RequestBuilder) -> Result<Response, TrackerError> {
        let response = self.request(builder).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(TrackerError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TrackerError> {
        debug!("GET {url}");
        let body = self.send(self.http.get(url))?.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl IssueTracker for JiraClient {
    fn get_issue(&self, key: &str, fields: &[IssueField]) -> Result<TrackerIssue, TrackerError> {
        let fields = fields.iter().copied().map(IssueField::as_str).collect::<Vec<_>>().join(",");
        let url = format!("{}/issue/{key}?fields={fields}", self.base_url);
        let issue: IssueResponse = self.get_json(&url)?;
        issue.into_tracker_issue()
    }

    fn list_transitions(&self, key: &str) -> Result<Vec<Transition>, TrackerError> {
        let url = format!("{}/issue/{key}/transitions", self.base_url);
        let response: TransitionsResponse = self.get_json(&url)?;
        Ok(response.transitions)
    }

    fn transition_issue(&self, key: &str, transition_id: &str) -> Result<(), TrackerError> {
        let url = format!("{}/issue/{key}/transitions", self.base_url);
        debug!("POST {url} (transition {transition_id})");
        self.send(self.http.post(&url).json(&TransitionRequest::new(transition_id)))?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct TransitionRequest<'a> {
    transition: TransitionId<'a>,
}

#[derive(Debug, Serialize)]
struct TransitionId<'a> {
    id: &'a str,
}

impl<'a> TransitionRequest<'a> {
    const fn new(id: &'a str) -> Self {
        Self {
            transition: TransitionId { id },
        }
    }
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    key: String,
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueFields {
    status: Option<Named>,
    #[serde(default)]
    fix_versions: Option<Vec<FixVersion>>,
    project: Option<Project>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Project {
    key: String,
}

#[derive(Debug, Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<Transition>,
}

impl IssueResponse {
    fn into_tracker_issue(self) -> Result<TrackerIssue, TrackerError> {
        let status = self
            .fields
            .status
            .ok_or_else(|| TrackerError::Decode(format!("issue {} has no status", self.key)))?;

        Ok(TrackerIssue {
            key: self.key,
            status: status.name,
            fix_versions: self.fields.fix_versions.unwrap_or_default(),
            project_key: self.fields.project.map(|p| p.key),
        })
    }
}

/// Error body shape: `{"errorMessages": [...], "errors": {"field": "..."}}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

fn error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) else {
        return excerpt(body);
    };

    let messages: Vec<String> = parsed
        .error_messages
        .into_iter()
        .chain(parsed.errors.into_iter().map(|(field, msg)| format!("{field}: {msg}")))
        .collect();

    if messages.is_empty() {
        excerpt(body)
    } else {
        messages.join("; ")
    }
}
