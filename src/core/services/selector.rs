//! Transition selector - picks the transition an event should trigger
//!
//! Rules are walked in configured order and the first rule that fully
//! matches wins. A rule matches when:
//!
//! 1. the issue's current state is one of the rule's `from` states,
//! 2. its criteria hold for the event, and
//! 3. the tracker allows the rule's transition from the current state.
//!
//! A rule whose transition the tracker does not allow is skipped, not an
//! error: workflows differ per project and per status.

use log::{debug, info};
use serde::Serialize;

use crate::core::models::{CiContext, Transition, TransitionRule, eq_ignore_case};

use super::criteria::{CriteriaReport, evaluate_rule};

/// How a single rule fared against the current state and event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleEvaluation {
    /// Position of the rule in the configured list
    pub index: usize,
    /// Transition the rule asks for
    pub transition: String,
    /// Current state is one of the rule's `from` states
    pub state_matches: bool,
    /// Criteria results; `None` if not evaluated or the event kind is not covered
    pub criteria: Option<CriteriaReport>,
    /// The tracker allows the rule's transition from the current state
    pub transition_allowed: bool,
}

impl RuleEvaluation {
    /// Whether the rule fully matched
    #[must_use]
    pub fn selected(&self) -> bool {
        self.state_matches
            && self.criteria.is_some_and(|c| c.satisfied())
            && self.transition_allowed
    }
}

/// Evaluate one rule against the current state, allowed transitions and event
///
/// Criteria are only evaluated when the state matches.
#[must_use]
pub fn evaluate_rule_at(
    index: usize,
    rule: &TransitionRule,
    current_state: &str,
    allowed: &[Transition],
    ctx: &CiContext,
) -> RuleEvaluation {
    let state_matches = rule.applies_from(current_state);
    debug!(
        "Rule #{index} '{}': current state {current_state:?} in {:?}: {state_matches}",
        rule.transition, rule.from
    );

    if !state_matches {
        return RuleEvaluation {
            index,
            transition: rule.transition.clone(),
            state_matches,
            criteria: None,
            transition_allowed: false,
        };
    }

    let criteria = evaluate_rule(ctx, rule);
    let transition_allowed = find_allowed(allowed, &rule.transition).is_some();
    if !transition_allowed {
        info!(
            "Transition '{}' is not allowed from state {current_state:?} (allowed: {})",
            rule.transition,
            allowed_names(allowed)
        );
    }

    RuleEvaluation {
        index,
        transition: rule.transition.clone(),
        state_matches,
        criteria,
        transition_allowed,
    }
}

/// Select the transition to apply, if any
///
/// Returns the tracker's own entry for the transition, so the caller gets the
/// identifier the tracker expects.
#[must_use]
pub fn select_transition<'a>(
    current_state: &str,
    allowed: &'a [Transition],
    rules: &[TransitionRule],
    ctx: &CiContext,
) -> Option<&'a Transition> {
    debug!("Allowed transitions: {}", allowed_names(allowed));

    for (index, rule) in rules.iter().enumerate() {
        let evaluation = evaluate_rule_at(index, rule, current_state, allowed, ctx);
        if evaluation.selected() {
            info!("Rule #{index} selected transition '{}'", rule.transition);
            return find_allowed(allowed, &rule.transition);
        }
    }

    None
}

/// Evaluate every rule without stopping at the first match
#[must_use]
pub fn evaluate_all(
    current_state: &str,
    allowed: &[Transition],
    rules: &[TransitionRule],
    ctx: &CiContext,
) -> Vec<RuleEvaluation> {
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| evaluate_rule_at(index, rule, current_state, allowed, ctx))
        .collect()
}

fn find_allowed<'a>(allowed: &'a [Transition], name: &str) -> Option<&'a Transition> {
    allowed.iter().find(|t| eq_ignore_case(&t.name, name))
}

fn allowed_names(allowed: &[Transition]) -> String {
    allowed.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
}
