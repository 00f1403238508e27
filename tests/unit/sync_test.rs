//! End-to-end synchronizer tests against the in-memory fakes

use std::collections::BTreeSet;

use crate::common::fixtures::{
    IssueBuilder, TRACKER_HOST, linked_milestone, pr_event, standard_rules,
};
use crate::common::mocks::{FakeCodeHost, FakeTracker};
use jira_transit::core::services::{
    IssueSynchronizer, MilestoneOrigin, MilestoneOutcome, SyncOptions, TransitionOutcome, run_sync,
};

fn workflow() -> FakeTracker {
    FakeTracker::new()
        .with_edge("Open", "11", "Start Progress", "In Progress")
        .with_edge("In Progress", "21", "Review", "In Review")
        .with_edge("In Review", "31", "Done", "Done")
}

fn keys(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|k| (*k).to_string()).collect()
}

const MILESTONES_ON: SyncOptions = SyncOptions {
    sync_milestones: true,
    dry_run: false,
};

#[test]
fn opened_pull_request_moves_open_issue_forward() {
    let tracker = workflow().with_issue(IssueBuilder::new("ABC-1").build());
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST);

    let report = run_sync(&keys(&["ABC-1"]), &pr_event("opened", 12), &sync);

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].current_state.as_deref(), Some("Open"));
    assert_eq!(
        report.issues[0].transition,
        TransitionOutcome::Applied {
            transition: "Start Progress".to_string(),
            resulting_status: "In Progress".to_string(),
        }
    );
    assert_eq!(tracker.status_of("ABC-1").as_deref(), Some("In Progress"));
    assert_eq!(report.transitions_applied(), 1);
    assert!(tracker.calls().contains(&"transition_issue ABC-1 11".to_string()));
}

#[test]
fn first_read_requests_status_fix_versions_and_project() {
    let tracker = workflow().with_issue(IssueBuilder::new("ABC-1").build());
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST);

    sync.sync_issue("ABC-1", &pr_event("opened", 12));

    let calls = tracker.calls();
    assert_eq!(calls[0], "get_issue ABC-1 status,fixVersions,project");
    assert_eq!(calls.last().map(String::as_str), Some("get_issue ABC-1 status"));
}

#[test]
fn merged_into_release_branch_closes_reviewed_issue() {
    let tracker = workflow().with_issue(IssueBuilder::new("ABC-1").status("In Review").build());
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST);
    let ctx = pr_event("closed", 12)
        .with_merged(true)
        .with_target_branch("release/2.0");

    let report = sync.sync_issue("ABC-1", &ctx);

    assert!(matches!(report.transition, TransitionOutcome::Applied { .. }));
    assert_eq!(tracker.status_of("ABC-1").as_deref(), Some("Done"));
}

#[test]
fn closed_without_merge_changes_nothing() {
    let tracker = workflow().with_issue(IssueBuilder::new("ABC-1").status("In Review").build());
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST);

    let report = sync.sync_issue("ABC-1", &pr_event("closed", 12));

    assert_eq!(report.transition, TransitionOutcome::NoMatchingRule);
    assert_eq!(tracker.status_of("ABC-1").as_deref(), Some("In Review"));
    assert!(!report.has_failures());
}

#[test]
fn missing_issue_does_not_stop_the_others() {
    let tracker = workflow()
        .with_issue(IssueBuilder::new("ABC-2").build())
        .with_missing("ABC-1");
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST);

    let report = run_sync(&keys(&["ABC-2", "ABC-1"]), &pr_event("opened", 12), &sync);

    // Keys are reported in sorted order
    assert_eq!(report.issues[0].key, "ABC-1");
    assert!(report.issues[0].current_state.is_none());
    assert!(report.issues[0].transition.is_failure());
    assert!(matches!(report.issues[1].transition, TransitionOutcome::Applied { .. }));
    assert!(report.has_failures());
}

#[test]
fn rejected_transition_is_reported_as_failure() {
    let tracker = workflow()
        .with_issue(IssueBuilder::new("ABC-1").build())
        .rejecting_transitions();
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST);

    let report = sync.sync_issue("ABC-1", &pr_event("opened", 12));

    let TransitionOutcome::Failed { reason } = &report.transition else {
        panic!("expected failure, got {:?}", report.transition);
    };
    assert!(reason.contains("resolution"));
    assert_eq!(tracker.status_of("ABC-1").as_deref(), Some("Open"));
}

#[test]
fn dry_run_reads_but_never_writes() {
    let tracker = workflow().with_issue(
        IssueBuilder::new("ABC-1").fix_version("100", "v1.0", None).build(),
    );
    let host = FakeCodeHost::new().with_pull_request(12, "ABC-1");
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST)
        .with_code_host(&host)
        .with_options(SyncOptions {
            sync_milestones: true,
            dry_run: true,
        });

    let report = run_sync(&keys(&["ABC-1"]), &pr_event("opened", 12), &sync);

    assert!(report.dry_run);
    assert_eq!(
        report.issues[0].transition,
        TransitionOutcome::WouldApply {
            transition: "Start Progress".to_string()
        }
    );
    assert_eq!(report.transitions_applied(), 1);
    assert_eq!(tracker.status_of("ABC-1").as_deref(), Some("Open"));
    assert!(!tracker.calls().iter().any(|c| c.starts_with("transition_issue")));
    assert!(host.calls().is_empty());
}

#[test]
fn transition_and_milestone_both_run_for_each_issue() {
    let tracker = workflow().with_issue(
        IssueBuilder::new("ABC-1").fix_version("100", "v1.0", Some("2024-06-30")).build(),
    );
    let host = FakeCodeHost::new()
        .with_milestone(linked_milestone(2, "v1.0", "ABC", "100"))
        .with_pull_request(12, "ABC-1 add widgets");
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST)
        .with_code_host(&host)
        .with_options(MILESTONES_ON);

    let report = sync.sync_issue("ABC-1", &pr_event("opened", 12));

    assert!(matches!(report.transition, TransitionOutcome::Applied { .. }));
    assert_eq!(
        report.milestone,
        MilestoneOutcome::Attached {
            number: 2,
            title: "v1.0".to_string(),
            origin: MilestoneOrigin::Reused,
            via_fallback: false,
        }
    );
    assert_eq!(host.pull_request(12).and_then(|pr| pr.milestone).map(|m| m.number), Some(2));
}

#[test]
fn milestone_sync_runs_even_without_a_matching_rule() {
    let tracker = workflow().with_issue(
        IssueBuilder::new("ABC-1").status("Done").fix_version("100", "v1.0", None).build(),
    );
    let host = FakeCodeHost::new().with_pull_request(12, "ABC-1");
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST)
        .with_code_host(&host)
        .with_options(MILESTONES_ON);

    let report = sync.sync_issue("ABC-1", &pr_event("opened", 12));

    assert_eq!(report.transition, TransitionOutcome::NoMatchingRule);
    assert!(matches!(
        report.milestone,
        MilestoneOutcome::Attached {
            origin: MilestoneOrigin::Created,
            ..
        }
    ));
}

#[test]
fn milestone_sync_without_code_host_is_skipped() {
    let tracker = workflow().with_issue(
        IssueBuilder::new("ABC-1").fix_version("100", "v1.0", None).build(),
    );
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST).with_options(MILESTONES_ON);

    let report = sync.sync_issue("ABC-1", &pr_event("opened", 12));

    assert!(matches!(report.milestone, MilestoneOutcome::Skipped { .. }));
    assert!(!report.has_failures());
}

#[test]
fn no_keys_produces_empty_report() {
    let tracker = workflow();
    let rules = standard_rules();
    let sync = IssueSynchronizer::new(&tracker, &rules, TRACKER_HOST);

    let report = run_sync(&BTreeSet::new(), &pr_event("opened", 12), &sync);

    assert!(report.issues.is_empty());
    assert!(!report.has_failures());
    assert!(tracker.calls().is_empty());
}
