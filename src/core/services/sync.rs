//! Issue synchronizer - drives one run across all referenced issues
//!
//! For each issue key: read the issue, pick a transition, apply it, then sync
//! the release milestone. Issues are processed one after another and a
//! failure on one never stops the others.

use std::collections::BTreeSet;
use std::fmt;

use log::{error, info, warn};
use serde::Serialize;

use crate::core::models::{CiContext, IssueField, TrackerIssue, TransitionRule};
use crate::core::ports::{CodeHost, IssueTracker};

use super::milestone::{MilestoneOutcome, MilestoneReconciler};
use super::selector::select_transition;

/// Fields read on the first fetch of every issue
pub const ISSUE_FIELDS: [IssueField; 3] =
    [IssueField::Status, IssueField::FixVersions, IssueField::Project];

/// Result of the transition step for one issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The transition was executed
    Applied {
        /// Transition name
        transition: String,
        /// Status read back after the transition
        resulting_status: String,
    },
    /// Dry run: the transition would have been executed
    WouldApply {
        /// Transition name
        transition: String,
    },
    /// No rule matched the issue's state and the event
    NoMatchingRule,
    /// A tracker call failed
    Failed {
        /// What went wrong
        reason: String,
    },
}

impl TransitionOutcome {
    /// Whether the step failed
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Everything that happened to one issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueReport {
    /// Issue key
    pub key: String,
    /// Status before any transition, if the issue could be read
    pub current_state: Option<String>,
    /// Transition step
    pub transition: TransitionOutcome,
    /// Milestone step
    pub milestone: MilestoneOutcome,
}

impl IssueReport {
    /// Whether either step failed
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        self.transition.is_failure() || self.milestone.is_failure()
    }
}

/// Everything that happened during one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Event kind that triggered the run
    pub event: String,
    /// Whether writes were suppressed
    pub dry_run: bool,
    /// One report per issue key, in key order
    pub issues: Vec<IssueReport>,
}

impl SyncReport {
    /// Whether any issue had a failed step
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.issues.iter().any(IssueReport::has_failures)
    }

    /// Number of transitions applied (or that would be, in a dry run)
    #[must_use]
    pub fn transitions_applied(&self) -> usize {
        self.issues
            .iter()
            .filter(|r| {
                matches!(
                    r.transition,
                    TransitionOutcome::Applied { .. } | TransitionOutcome::WouldApply { .. }
                )
            })
            .count()
    }
}

/// Run switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Sync release milestones onto the pull request
    pub sync_milestones: bool,
    /// Read only: report what would change without writing
    pub dry_run: bool,
}

/// Applies transition rules and milestone sync to issues
pub struct IssueSynchronizer<'a> {
    tracker: &'a dyn IssueTracker,
    code_host: Option<&'a dyn CodeHost>,
    rules: &'a [TransitionRule],
    tracker_host: &'a str,
    options: SyncOptions,
}

impl fmt::Debug for IssueSynchronizer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueSynchronizer")
            .field("rules", &self.rules.len())
            .field("tracker_host", &self.tracker_host)
            .field("code_host", &self.code_host.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a> IssueSynchronizer<'a> {
    /// Create a synchronizer without a code host
    #[must_use]
    pub fn new(
        tracker: &'a dyn IssueTracker,
        rules: &'a [TransitionRule],
        tracker_host: &'a str,
    ) -> Self {
        Self {
            tracker,
            code_host: None,
            rules,
            tracker_host,
            options: SyncOptions::default(),
        }
    }

    /// Use a code host for milestone sync
    #[must_use]
    pub fn with_code_host(mut self, code_host: &'a dyn CodeHost) -> Self {
        self.code_host = Some(code_host);
        self
    }

    /// Set run switches
    #[must_use]
    pub const fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// Sync a single issue
    pub fn sync_issue(&self, key: &str, ctx: &CiContext) -> IssueReport {
        info!("Syncing issue {key}");

        let issue = match self.tracker.get_issue(key, &ISSUE_FIELDS) {
            Ok(issue) => issue,
            Err(e) => {
                error!("Failed to read {key}: {e}");
                return IssueReport {
                    key: key.to_string(),
                    current_state: None,
                    transition: TransitionOutcome::Failed {
                        reason: e.to_string(),
                    },
                    milestone: MilestoneOutcome::Skipped {
                        reason: "issue could not be read".to_string(),
                    },
                };
            },
        };
        info!("Current {key} state [{}]", issue.status);

        let transition = self.sync_transition(&issue, ctx);
        let milestone = self.sync_milestone(&issue, ctx);

        IssueReport {
            key: key.to_string(),
            current_state: Some(issue.status),
            transition,
            milestone,
        }
    }

    fn sync_transition(&self, issue: &TrackerIssue, ctx: &CiContext) -> TransitionOutcome {
        let key = issue.key.as_str();

        let allowed = match self.tracker.list_transitions(key) {
            Ok(allowed) => allowed,
            Err(e) => {
                error!("Failed to list transitions for {key}: {e}");
                return TransitionOutcome::Failed {
                    reason: e.to_string(),
                };
            },
        };

        let Some(selected) = select_transition(&issue.status, &allowed, self.rules, ctx) else {
            info!("No transition rule applies to {key} in state [{}]", issue.status);
            return TransitionOutcome::NoMatchingRule;
        };

        if self.options.dry_run {
            info!("Dry run: would transition {key} with [{}]", selected.name);
            return TransitionOutcome::WouldApply {
                transition: selected.name.clone(),
            };
        }

        info!("Transitioning {key} with [{}]", selected.name);
        if let Err(e) = self.tracker.transition_issue(key, &selected.id) {
            error!("Transition [{}] on {key} failed: {e}", selected.name);
            return TransitionOutcome::Failed {
                reason: e.to_string(),
            };
        }

        match self.tracker.get_issue(key, &[IssueField::Status]) {
            Ok(updated) => {
                info!("Updated {key} state [{}]", updated.status);
                TransitionOutcome::Applied {
                    transition: selected.name.clone(),
                    resulting_status: updated.status,
                }
            },
            Err(e) => {
                warn!("Transition [{}] sent but re-reading {key} failed: {e}", selected.name);
                TransitionOutcome::Failed {
                    reason: format!("transition sent but status could not be read back: {e}"),
                }
            },
        }
    }

    fn sync_milestone(&self, issue: &TrackerIssue, ctx: &CiContext) -> MilestoneOutcome {
        if !self.options.sync_milestones {
            return MilestoneOutcome::Skipped {
                reason: "milestone sync disabled".to_string(),
            };
        }
        if self.options.dry_run {
            return MilestoneOutcome::Skipped {
                reason: "dry run".to_string(),
            };
        }
        let Some(code_host) = self.code_host else {
            warn!("Milestone sync enabled but no code host token is configured");
            return MilestoneOutcome::Skipped {
                reason: "no code host token configured".to_string(),
            };
        };

        MilestoneReconciler::new(code_host, self.tracker_host).reconcile(issue, ctx)
    }
}

/// Sync every key, one after another, collecting a report per issue
///
/// Each key is processed to completion before the next one starts.
pub fn run_sync(
    keys: &BTreeSet<String>,
    ctx: &CiContext,
    synchronizer: &IssueSynchronizer<'_>,
) -> SyncReport {
    if keys.is_empty() {
        info!("No issue keys found for {} event", ctx.event);
    } else {
        info!("Found issue keys: {}", keys.iter().cloned().collect::<Vec<_>>().join(", "));
    }

    SyncReport {
        event: ctx.event.clone(),
        dry_run: synchronizer.options.dry_run,
        issues: keys.iter().map(|key| synchronizer.sync_issue(key, ctx)).collect(),
    }
}
