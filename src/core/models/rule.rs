//! Transition rule model
//!
//! A rule says: "when an issue is in one of these states and this event happens
//! under these conditions, apply this transition". Rules are evaluated in the
//! order they are configured and the first full match wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A configured transition rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRule {
    /// Source states the rule applies to (case-insensitive)
    pub from: Vec<String>,

    /// Name of the tracker transition to apply
    pub transition: String,

    /// Trigger conditions, keyed by event kind
    #[serde(default)]
    pub on: BTreeMap<String, Criteria>,
}

impl TransitionRule {
    /// Create a rule with no triggers
    pub fn new<I, S>(from: I, transition: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            from: from.into_iter().map(Into::into).collect(),
            transition: transition.into(),
            on: BTreeMap::new(),
        }
    }

    /// Add trigger criteria for an event kind
    #[must_use]
    pub fn on(mut self, event: impl Into<String>, criteria: Criteria) -> Self {
        self.on.insert(event.into(), criteria);
        self
    }

    /// Check whether the issue's current state is one of the rule's source states
    #[must_use]
    pub fn applies_from(&self, state: &str) -> bool {
        self.from.iter().any(|s| eq_ignore_case(s, state))
    }

    /// Criteria configured for an event kind, if any
    #[must_use]
    pub fn criteria_for(&self, event: &str) -> Option<&Criteria> {
        self.on.get(event)
    }
}

/// Trigger conditions for one event kind
///
/// Every field is optional. An absent field never rejects; `Some(false)` is a
/// real condition and is not the same as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Criteria {
    /// Allowed event actions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,

    /// Glob patterns for the target branch; any may match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_branches: Option<Vec<String>>,

    /// Required merged flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged: Option<bool>,

    /// Required draft flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,

    /// Labels that must all be present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_label: Option<Vec<String>>,

    /// Labels that must all be absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub without_label: Option<Vec<String>>,
}

impl Criteria {
    /// Require one of these actions
    #[must_use]
    pub fn actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = Some(actions.into_iter().map(Into::into).collect());
        self
    }

    /// Require the target branch to match one of these patterns
    #[must_use]
    pub fn target_branches<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_branches = Some(patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Require the merged flag
    #[must_use]
    pub const fn merged(mut self, merged: bool) -> Self {
        self.merged = Some(merged);
        self
    }

    /// Require the draft flag
    #[must_use]
    pub const fn draft(mut self, draft: bool) -> Self {
        self.draft = Some(draft);
        self
    }

    /// Require all of these labels
    #[must_use]
    pub fn with_label<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_label = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Require none of these labels
    #[must_use]
    pub fn without_label<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.without_label = Some(labels.into_iter().map(Into::into).collect());
        self
    }
}

/// Unicode-aware case-insensitive comparison used for states and transition names
#[must_use]
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
