//! Configuration loading and validation
//!
//! The configuration is a static document, YAML or TOML depending on the file
//! extension, read once per run from `.jira/config.yml` by default:
//!
//! ```yaml
//! connection:
//!   host: acme.atlassian.net
//!   username: ci-bot@acme.io
//! syncMilestones: true
//! rules:
//!   - from: [Open]
//!     transition: Start Progress
//!     on:
//!       pull_request:
//!         actions: [opened]
//!         targetBranches: [main, "release/*"]
//! ```
//!
//! Everything a run depends on is checked here, before any network call.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::models::TransitionRule;
use crate::core::services::{DEFAULT_ISSUE_KEY_PATTERN, RegexKeyExtractor};

/// Default configuration path, relative to the repository root
pub const DEFAULT_CONFIG_PATH: &str = ".jira/config.yml";

/// Default code host API base URL
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The extension is neither YAML nor TOML
    #[error("unsupported config format {0:?} (expected .yml, .yaml or .toml)")]
    UnsupportedFormat(String),

    /// YAML parse failure
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parse failure
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// The issue key pattern does not compile
    #[error("invalid issue key pattern {pattern:?}: {source}")]
    KeyPattern {
        /// The configured pattern
        pattern: String,
        /// Underlying error
        #[source]
        source: regex::Error,
    },

    /// A rule has no source states
    #[error("rule #{0}: 'from' must list at least one state")]
    EmptyFrom(usize),

    /// A rule has no transition name
    #[error("rule #{0}: 'transition' must not be empty")]
    EmptyTransition(usize),

    /// The tracker host is empty
    #[error("connection.host must not be empty")]
    MissingHost,

    /// No tracker password or API token was supplied
    #[error(
        "no tracker credential: set connection.password, pass --jira-token or set JIRA_API_TOKEN"
    )]
    MissingCredential,
}

/// Tracker connection settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    /// Tracker host, e.g. `acme.atlassian.net`
    pub host: String,
    /// Account used for basic auth
    pub username: String,
    /// Password or API token; usually supplied out of band
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// URL scheme for API calls
    #[serde(default = "default_protocol")]
    pub protocol: String,
}

fn default_protocol() -> String {
    "https".to_string()
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("protocol", &self.protocol)
            .finish()
    }
}

/// Code host settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubConfig {
    /// API token; usually supplied out of band
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
    /// API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_api_url(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// The full configuration document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Tracker connection
    pub connection: ConnectionConfig,

    /// Transition rules in evaluation order
    #[serde(default)]
    pub rules: Vec<TransitionRule>,

    /// Pattern for issue keys in branch names and titles
    #[serde(
        rename = "issueKeyRegExp",
        alias = "issueKeyRegexp",
        default = "default_key_pattern"
    )]
    pub issue_key_pattern: String,

    /// Sync release milestones onto pull requests
    #[serde(default)]
    pub sync_milestones: bool,

    /// Code host settings
    #[serde(default)]
    pub github: GitHubConfig,
}

fn default_key_pattern() -> String {
    DEFAULT_ISSUE_KEY_PATTERN.to_string()
}

impl Config {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let config = match extension.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Self::from_yaml(&content)?,
            "toml" => Self::from_toml(&content)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        debug!(
            "Loaded {} rule(s) from {} (connection: {:?})",
            config.rules.len(),
            path.display(),
            config.connection
        );
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check everything a run depends on
    ///
    /// The issue key pattern must compile, and every rule needs at least one
    /// source state and a transition name. Branch patterns need no check: any
    /// string is a valid pattern.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.connection.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }

        self.key_extractor()?;

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.from.iter().all(|s| s.trim().is_empty()) {
                return Err(ConfigError::EmptyFrom(index));
            }
            if rule.transition.trim().is_empty() {
                return Err(ConfigError::EmptyTransition(index));
            }
        }

        Ok(())
    }

    /// Build the issue key extractor for the configured pattern
    pub fn key_extractor(&self) -> Result<RegexKeyExtractor, ConfigError> {
        RegexKeyExtractor::new(&self.issue_key_pattern).map_err(|source| {
            ConfigError::KeyPattern {
                pattern: self.issue_key_pattern.clone(),
                source,
            }
        })
    }

    /// Base URL of the tracker REST API
    #[must_use]
    pub fn tracker_api_url(&self) -> String {
        format!("{}://{}/rest/api/2", self.connection.protocol, self.connection.host)
    }
}

/// Secrets resolved for a run
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Tracker password or API token
    pub tracker_password: String,
    /// Code host token; milestone sync is disabled without one
    pub github_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tracker_password", &"<redacted>")
            .field("github_token", &self.github_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resolve credentials from the config first, then from the supplied fallbacks
///
/// The fallbacks are what the CLI received through flags or environment.
/// Blank values count as missing.
pub fn resolve_credentials(
    config: &Config,
    jira_token: Option<&str>,
    github_token: Option<&str>,
) -> Result<Credentials, ConfigError> {
    let tracker_password = first_present(config.connection.password.as_deref(), jira_token)
        .ok_or(ConfigError::MissingCredential)?;
    let github_token = first_present(config.github.token.as_deref(), github_token);

    Ok(Credentials {
        tracker_password,
        github_token,
    })
}

fn first_present(primary: Option<&str>, fallback: Option<&str>) -> Option<String> {
    [primary, fallback]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(String::from)
}
