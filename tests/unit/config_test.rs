//! Configuration file loading tests

use std::fs;
use std::path::PathBuf;

use jira_transit::config::{Config, ConfigError};
use jira_transit::core::models::Criteria;
use tempfile::TempDir;

const YAML: &str = r"
connection:
  host: acme.atlassian.net
  username: ci-bot
issueKeyRegExp: '[A-Z]+-\d+'
syncMilestones: true
rules:
  - from: [Open, Reopened]
    transition: Start Progress
    on:
      pull_request:
        actions: [opened, reopened]
        draft: false
  - from: [In Review]
    transition: Done
    on:
      pull_request:
        actions: [closed]
        merged: true
        targetBranches: [main, 'release/*']
";

const TOML: &str = r#"
syncMilestones = false

[connection]
host = "jira.internal"
username = "ci-bot"
protocol = "http"

[github]
apiUrl = "https://ghe.internal/api/v3"

[[rules]]
from = ["Open"]
transition = "Start Progress"

[rules.on.pull_request]
actions = ["opened"]
withLabel = ["ready"]
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn loads_yaml_rules_in_order() {
    let dir = TempDir::new().unwrap();
    let config = Config::load(&write(&dir, "config.yml", YAML)).unwrap();

    assert_eq!(config.connection.host, "acme.atlassian.net");
    assert_eq!(config.connection.username, "ci-bot");
    assert!(config.sync_milestones);
    assert_eq!(config.rules.len(), 2);
    assert_eq!(config.rules[0].from, vec!["Open", "Reopened"]);
    assert_eq!(config.rules[1].transition, "Done");

    let done = config.rules[1].criteria_for("pull_request").unwrap();
    assert_eq!(done.merged, Some(true));
    assert_eq!(
        done.target_branches.as_deref(),
        Some(&["main".to_string(), "release/*".to_string()][..])
    );
}

#[test]
fn yaml_extension_is_accepted() {
    let dir = TempDir::new().unwrap();
    assert!(Config::load(&write(&dir, "config.YAML", YAML)).is_ok());
}

#[test]
fn loads_toml_with_same_shape() {
    let dir = TempDir::new().unwrap();
    let config = Config::load(&write(&dir, "config.toml", TOML)).unwrap();

    assert_eq!(config.tracker_api_url(), "http://jira.internal/rest/api/2");
    assert_eq!(config.github.api_url, "https://ghe.internal/api/v3");
    assert!(!config.sync_milestones);
    assert_eq!(
        config.rules[0].criteria_for("pull_request"),
        Some(&Criteria::default().actions(["opened"]).with_label(["ready"]))
    );
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&write(&dir, "config.json", "{}")).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "json"));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.yml");
    let err = Config::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.yml"));
}

#[test]
fn unknown_criteria_field_is_rejected() {
    let yaml = "connection:\n  host: h\n  username: u\nrules:\n  - from: [Open]\n    transition: Go\n    on:\n      pull_request:\n        branch: main\n";
    assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::Yaml(_))));
}

#[test]
fn blank_host_is_rejected() {
    let yaml = "connection:\n  host: ' '\n  username: u\n";
    assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::MissingHost)));
}

#[test]
fn blank_transition_is_rejected() {
    let yaml = "connection:\n  host: h\n  username: u\nrules:\n  - from: [Open]\n    transition: ''\n";
    assert!(matches!(Config::from_yaml(yaml), Err(ConfigError::EmptyTransition(0))));
}

#[test]
fn configured_key_pattern_drives_extraction() {
    let dir = TempDir::new().unwrap();
    let config = Config::load(&write(&dir, "config.yml", YAML)).unwrap();
    let keys = config.key_extractor().unwrap().extract_from("ops-12 and OPS-12 and X-3");

    assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["OPS-12", "X-3"]);
}
