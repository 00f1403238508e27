//! Output formatting for human and JSON modes
//!
//! This module provides structured output that can be rendered either as
//! human-readable text or machine-parseable JSON.

use colored::Colorize;
use serde::Serialize;

use crate::core::models::{Transition, TransitionRule};
use crate::core::services::{
    IssueReport, MilestoneOutcome, RuleEvaluation, SyncReport, TransitionOutcome,
};

/// Output mode for the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

impl SyncReport {
    /// Render the report based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        if self.issues.is_empty() {
            println!("No issue keys found for {} event.", self.event);
            return;
        }

        let suffix = if self.dry_run { " (dry run)" } else { "" };
        println!("Synced {} issue(s) for {} event{suffix}:\n", self.issues.len(), self.event);

        for issue in &self.issues {
            render_issue(issue);
        }

        if self.has_failures() {
            let failed = self.issues.iter().filter(|i| i.has_failures()).count();
            println!("{}", format!("{failed} issue(s) had failures").red());
        }
    }
}

fn render_issue(issue: &IssueReport) {
    let state = issue.current_state.as_deref().unwrap_or("unknown");
    println!("  {} [{state}]", issue.key.bold());

    match &issue.transition {
        TransitionOutcome::Applied {
            transition,
            resulting_status,
        } => println!("    transition: {} -> {resulting_status}", transition.green()),
        TransitionOutcome::WouldApply { transition } => {
            println!("    transition: would apply {}", transition.yellow());
        },
        TransitionOutcome::NoMatchingRule => println!("    transition: no matching rule"),
        TransitionOutcome::Failed { reason } => {
            println!("    transition: {}", format!("failed: {reason}").red());
        },
    }

    match &issue.milestone {
        MilestoneOutcome::Attached {
            number,
            title,
            origin,
            via_fallback,
        } => {
            let fallback = if *via_fallback { ", via fallback" } else { "" };
            println!("    milestone: {} (#{number}, {origin}{fallback})", title.green());
        },
        MilestoneOutcome::Skipped { reason } => println!("    milestone: skipped ({reason})"),
        MilestoneOutcome::Failed { reason } => {
            println!("    milestone: {}", format!("failed: {reason}").red());
        },
    }
    println!();
}

/// Summary of one configured rule
#[derive(Debug, Serialize)]
pub struct RuleSummary {
    /// Rule position
    pub index: usize,
    /// Source states
    pub from: Vec<String>,
    /// Transition name
    pub transition: String,
    /// Event kinds with criteria
    pub events: Vec<String>,
}

impl RuleSummary {
    /// Summarize a rule
    #[must_use]
    pub fn new(index: usize, rule: &TransitionRule) -> Self {
        Self {
            index,
            from: rule.from.clone(),
            transition: rule.transition.clone(),
            events: rule.on.keys().cloned().collect(),
        }
    }
}

/// Result of validating a configuration file
#[derive(Debug, Serialize)]
pub struct ValidateResult {
    /// Path that was validated
    pub config_path: String,
    /// Tracker host
    pub host: String,
    /// Issue key pattern
    pub issue_key_pattern: String,
    /// Whether milestone sync is on
    pub sync_milestones: bool,
    /// Configured rules
    pub rules: Vec<RuleSummary>,
}

impl ValidateResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        println!("{} {}", "Configuration OK:".green(), self.config_path);
        println!("  host: {}", self.host);
        println!("  issue keys: {}", self.issue_key_pattern);
        println!("  milestone sync: {}", if self.sync_milestones { "on" } else { "off" });

        if self.rules.is_empty() {
            println!("\nNo rules configured.");
            return;
        }

        println!("\nRules:");
        for rule in &self.rules {
            println!(
                "  #{} [{}] -> {} on {}",
                rule.index,
                rule.from.join(", "),
                rule.transition,
                if rule.events.is_empty() {
                    "(no events)".to_string()
                } else {
                    rule.events.join(", ")
                }
            );
        }
    }
}

/// Result of an offline rule evaluation
#[derive(Debug, Serialize)]
pub struct ExplainResult {
    /// Event kind
    pub event: String,
    /// Issue keys found in the event
    pub issue_keys: Vec<String>,
    /// Issue state that was assumed
    pub current_state: String,
    /// Transitions that were assumed allowed
    pub allowed: Vec<Transition>,
    /// Per-rule diagnostics
    pub rules: Vec<RuleEvaluation>,
    /// Transition that would be applied
    pub selected: Option<Transition>,
}

impl ExplainResult {
    /// Render the result based on output mode
    pub fn render(&self, mode: OutputMode) {
        match mode {
            OutputMode::Human => self.render_human(),
            OutputMode::Json => print_json(self),
        }
    }

    fn render_human(&self) {
        println!("Event {} with issue in [{}]", self.event, self.current_state);
        if self.issue_keys.is_empty() {
            println!("Issue keys: none\n");
        } else {
            println!("Issue keys: {}\n", self.issue_keys.join(", "));
        }

        for rule in &self.rules {
            let marker = if rule.selected() { "*" } else { " " };
            println!("{marker} #{} {}", rule.index, rule.transition.bold());
            println!("    from state: {}", yes_no(rule.state_matches));
            match &rule.criteria {
                Some(c) => {
                    println!(
                        "    criteria: action={} draft={} merged={} withLabel={} withoutLabel={} targetBranch={}",
                        yes_no(c.action),
                        yes_no(c.draft),
                        yes_no(c.merged),
                        yes_no(c.with_label),
                        yes_no(c.without_label),
                        yes_no(c.target_branch)
                    );
                    println!("    allowed: {}", yes_no(rule.transition_allowed));
                },
                None if rule.state_matches => println!("    criteria: none for this event"),
                None => {},
            }
        }

        match &self.selected {
            Some(t) => println!("\nSelected transition: {} (id {})", t.name.green(), t.id),
            None => println!("\nNo transition would be applied."),
        }
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
