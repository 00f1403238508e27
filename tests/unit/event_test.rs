//! Event payload to context mapping tests

use std::fs;

use jira_transit::adapters::read_event_file;
use jira_transit::core::models::{CiContext, RepoRef};
use jira_transit::core::services::{RegexKeyExtractor, DEFAULT_ISSUE_KEY_PATTERN, criteria_satisfied};
use tempfile::TempDir;

use crate::common::fixtures::standard_rules;

const MERGED: &str = r#"{
    "action": "closed",
    "number": 7,
    "pull_request": {
        "number": 7,
        "title": "Finish checkout flow",
        "body": "Closes the loop on checkout",
        "draft": false,
        "merged": true,
        "base": {"ref": "release/3.1"},
        "head": {"ref": "feature/SHOP-88-checkout"},
        "labels": [{"name": "Backend"}, {"name": "ready"}]
    },
    "repository": {"name": "shop", "owner": {"login": "acme"}}
}"#;

const READY: &str = r#"{
    "action": "ready_for_review",
    "pull_request": {
        "number": 9,
        "title": "SHOP-90: tidy up",
        "draft": false,
        "merged": false,
        "base": {"ref": "main"},
        "head": {"ref": "chore/cleanup"}
    }
}"#;

#[test]
fn merged_pull_request_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("event.json");
    fs::write(&path, MERGED).unwrap();

    let payload = read_event_file(&path).unwrap();
    let ctx = CiContext::from_github_event("pull_request", &payload, Some("acme/shop")).unwrap();

    assert_eq!(ctx.action.as_deref(), Some("closed"));
    assert_eq!(ctx.is_merged, Some(true));
    assert_eq!(ctx.target_branch.as_deref(), Some("release/3.1"));
    assert_eq!(ctx.body, "Closes the loop on checkout");
    assert!(ctx.labels.contains("backend"));
    assert!(ctx.labels.contains("ready"));
    assert_eq!(
        ctx.pull_request_identity().map(|(n, r)| (n, r.clone())),
        Some((7, RepoRef::new("acme", "shop")))
    );
}

#[test]
fn merged_event_satisfies_done_rule() {
    let ctx = CiContext::from_github_event("pull_request", MERGED, None).unwrap();
    let rules = standard_rules();

    assert!(!criteria_satisfied(&ctx, &rules[0]));
    assert!(criteria_satisfied(&ctx, &rules[2]));
}

#[test]
fn keys_come_from_branch_and_title() {
    let extractor = RegexKeyExtractor::new(DEFAULT_ISSUE_KEY_PATTERN).unwrap();

    let merged = CiContext::from_github_event("pull_request", MERGED, None).unwrap();
    assert_eq!(extractor.extract(&merged).into_iter().collect::<Vec<_>>(), vec!["SHOP-88"]);

    let ready = CiContext::from_github_event("pull_request", READY, None).unwrap();
    assert_eq!(extractor.extract(&ready).into_iter().collect::<Vec<_>>(), vec!["SHOP-90"]);
}

#[test]
fn payload_without_repository_has_no_pull_request_identity() {
    let ctx = CiContext::from_github_event("pull_request", READY, None).unwrap();

    assert_eq!(ctx.pr_number, Some(9));
    assert!(ctx.repo.is_none());
    assert!(ctx.labels.is_empty());
    assert!(ctx.pull_request_identity().is_none());
}

#[test]
fn empty_payload_yields_bare_context() {
    let ctx = CiContext::from_github_event("workflow_dispatch", "  ", Some("acme/shop")).unwrap();

    assert_eq!(ctx.event, "workflow_dispatch");
    assert!(ctx.action.is_none());
    assert!(ctx.title.is_empty());
    assert_eq!(ctx.repo, Some(RepoRef::new("acme", "shop")));
}
