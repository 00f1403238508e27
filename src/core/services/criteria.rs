//! Criteria evaluator - decides whether a rule's trigger conditions hold
//!
//! Every sub-predicate is computed, even after one fails, so the full picture
//! can be logged and shown by `explain`.

use log::debug;
use serde::Serialize;

use crate::core::models::{CiContext, Criteria, TransitionRule};

use super::matcher::matches_branch;

/// Result of each criteria sub-predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CriteriaReport {
    /// Event action is one of the allowed actions
    pub action: bool,
    /// Draft flag matches exactly
    pub draft: bool,
    /// Merged flag matches exactly
    pub merged: bool,
    /// All required labels are present
    pub with_label: bool,
    /// No forbidden label is present
    pub without_label: bool,
    /// Target branch matches one of the patterns
    pub target_branch: bool,
}

impl CriteriaReport {
    /// Whether every sub-predicate holds
    #[must_use]
    pub const fn satisfied(&self) -> bool {
        self.action
            && self.draft
            && self.merged
            && self.with_label
            && self.without_label
            && self.target_branch
    }
}

/// Evaluate a criteria block against the event context
#[must_use]
pub fn evaluate(ctx: &CiContext, criteria: &Criteria) -> CriteriaReport {
    let action = criteria
        .actions
        .as_ref()
        .is_none_or(|actions| ctx.action.as_ref().is_some_and(|a| actions.contains(a)));

    let draft = criteria.draft.is_none_or(|draft| ctx.is_draft == Some(draft));

    let merged = criteria.merged.is_none_or(|merged| ctx.is_merged == Some(merged));

    let with_label = criteria
        .with_label
        .as_ref()
        .is_none_or(|labels| labels.iter().all(|l| ctx.labels.contains(&l.to_lowercase())));

    let without_label = criteria
        .without_label
        .as_ref()
        .is_none_or(|labels| labels.iter().all(|l| !ctx.labels.contains(&l.to_lowercase())));

    let target_branch = criteria.target_branches.as_ref().is_none_or(|patterns| {
        patterns.iter().any(|pattern| {
            let matched = matches_branch(pattern, ctx.target_branch.as_deref());
            debug!(
                "Checking pattern {pattern:?} against target {:?}: {matched}",
                ctx.target_branch
            );
            matched
        })
    });

    CriteriaReport {
        action,
        draft,
        merged,
        with_label,
        without_label,
        target_branch,
    }
}

/// Evaluate a rule's criteria for the context's event kind
///
/// Returns `None` when the rule has no criteria for this event kind.
#[must_use]
pub fn evaluate_rule(ctx: &CiContext, rule: &TransitionRule) -> Option<CriteriaReport> {
    let Some(criteria) = rule.criteria_for(&ctx.event) else {
        debug!("Rule '{}' has no criteria for event {}", rule.transition, ctx.event);
        return None;
    };

    let report = evaluate(ctx, criteria);
    debug!(
        "Rule '{}' criteria: action={} draft={} merged={} withLabel={} withoutLabel={} targetBranch={}",
        rule.transition,
        report.action,
        report.draft,
        report.merged,
        report.with_label,
        report.without_label,
        report.target_branch
    );
    Some(report)
}

/// Check whether a rule's trigger conditions hold for the context
#[must_use]
pub fn criteria_satisfied(ctx: &CiContext, rule: &TransitionRule) -> bool {
    evaluate_rule(ctx, rule).is_some_and(|report| report.satisfied())
}
