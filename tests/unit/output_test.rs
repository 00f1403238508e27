//! JSON shape of reports

use jira_transit::core::models::Transition;
use jira_transit::core::services::{
    IssueReport, MilestoneOrigin, MilestoneOutcome, SyncReport, TransitionOutcome,
};
use jira_transit::output::{ExplainResult, RuleSummary};
use serde_json::json;

use crate::common::fixtures::standard_rules;

fn report() -> SyncReport {
    SyncReport {
        event: "pull_request".to_string(),
        dry_run: false,
        issues: vec![
            IssueReport {
                key: "ABC-1".to_string(),
                current_state: Some("Open".to_string()),
                transition: TransitionOutcome::Applied {
                    transition: "Start Progress".to_string(),
                    resulting_status: "In Progress".to_string(),
                },
                milestone: MilestoneOutcome::Attached {
                    number: 3,
                    title: "v1.0".to_string(),
                    origin: MilestoneOrigin::Renamed,
                    via_fallback: false,
                },
            },
            IssueReport {
                key: "ABC-2".to_string(),
                current_state: None,
                transition: TransitionOutcome::Failed {
                    reason: "tracker returned 404".to_string(),
                },
                milestone: MilestoneOutcome::Skipped {
                    reason: "issue could not be read".to_string(),
                },
            },
        ],
    }
}

#[test]
fn sync_report_serializes_tagged_outcomes() {
    let value = serde_json::to_value(report()).unwrap();

    assert_eq!(value["event"], "pull_request");
    assert_eq!(value["dry_run"], false);
    assert_eq!(
        value["issues"][0]["transition"],
        json!({
            "status": "applied",
            "transition": "Start Progress",
            "resulting_status": "In Progress"
        })
    );
    assert_eq!(value["issues"][0]["milestone"]["status"], "attached");
    assert_eq!(value["issues"][0]["milestone"]["origin"], "renamed");
    assert_eq!(value["issues"][1]["current_state"], serde_json::Value::Null);
    assert_eq!(value["issues"][1]["transition"]["status"], "failed");
    assert_eq!(value["issues"][1]["milestone"]["status"], "skipped");
}

#[test]
fn unit_outcome_serializes_with_status_only() {
    let value = serde_json::to_value(TransitionOutcome::NoMatchingRule).unwrap();
    assert_eq!(value, json!({"status": "no_matching_rule"}));

    let value = serde_json::to_value(TransitionOutcome::WouldApply {
        transition: "Done".to_string(),
    })
    .unwrap();
    assert_eq!(value["status"], "would_apply");
}

#[test]
fn report_summaries() {
    let report = report();
    assert!(report.has_failures());
    assert_eq!(report.transitions_applied(), 1);
    assert!(!report.issues[0].has_failures());
    assert!(report.issues[1].has_failures());
}

#[test]
fn rule_summary_lists_events() {
    let rules = standard_rules();
    let summary = RuleSummary::new(2, &rules[2]);

    assert_eq!(summary.index, 2);
    assert_eq!(summary.from, vec!["In Review"]);
    assert_eq!(summary.transition, "Done");
    assert_eq!(summary.events, vec!["pull_request"]);
}

#[test]
fn explain_result_without_selection_serializes_null() {
    let result = ExplainResult {
        event: "pull_request".to_string(),
        issue_keys: vec!["ABC-1".to_string()],
        current_state: "Open".to_string(),
        allowed: vec![Transition::new("1", "Start Progress")],
        rules: Vec::new(),
        selected: None,
    };

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["selected"], serde_json::Value::Null);
    assert_eq!(value["allowed"][0]["name"], "Start Progress");
    assert_eq!(value["issue_keys"], json!(["ABC-1"]));
}
