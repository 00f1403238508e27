//! Business logic services
//!
//! Decision logic and orchestration over domain models. The pure parts
//! (matching, criteria, selection, key extraction) take data in and return
//! results. The orchestration parts talk to the outside world only through
//! the port traits.
//!
//! - [`matcher`] - Match branch names against glob patterns
//! - [`criteria`] - Evaluate a rule's trigger conditions
//! - [`selector`] - Pick the transition for an issue
//! - [`keys`] - Extract issue keys from the event
//! - [`milestone`] - Reconcile release milestones
//! - [`sync`] - Drive a run across all issues

pub mod criteria;
pub mod keys;
pub mod matcher;
pub mod milestone;
pub mod selector;
pub mod sync;

pub use criteria::{CriteriaReport, criteria_satisfied, evaluate, evaluate_rule};
pub use keys::{DEFAULT_ISSUE_KEY_PATTERN, RegexKeyExtractor};
pub use matcher::matches_branch;
pub use milestone::{
    MILESTONE_PAGE_SIZE, MilestoneError, MilestoneOrigin, MilestoneOutcome, MilestoneReconciler,
};
pub use selector::{RuleEvaluation, evaluate_all, evaluate_rule_at, select_transition};
pub use sync::{
    ISSUE_FIELDS, IssueReport, IssueSynchronizer, SyncOptions, SyncReport, TransitionOutcome,
    run_sync,
};
