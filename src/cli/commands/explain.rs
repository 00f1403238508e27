//! Offline rule evaluation

use jira_transit::adapters::read_event_file;
use jira_transit::config::Config;
use jira_transit::core::models::{CiContext, Transition};
use jira_transit::core::ports::IssueKeySource;
use jira_transit::core::services::{evaluate_all, select_transition};
use jira_transit::output::{ExplainResult, OutputMode};

use crate::cli::app::ExplainArgs;

/// Evaluate every rule against an assumed state and event
pub fn explain(args: &ExplainArgs, mode: OutputMode) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;
    let ctx = context_from_args(args)?;

    // Ids are positional; only names matter for selection
    let allowed: Vec<Transition> = args
        .allowed
        .iter()
        .enumerate()
        .map(|(i, name)| Transition::new((i + 1).to_string(), name))
        .collect();

    let rules = evaluate_all(&args.state, &allowed, &config.rules, &ctx);
    let selected = select_transition(&args.state, &allowed, &config.rules, &ctx).cloned();
    let issue_keys = config.key_extractor()?.keys(&ctx).into_iter().collect();

    let result = ExplainResult {
        event: ctx.event,
        issue_keys,
        current_state: args.state.clone(),
        allowed,
        rules,
        selected,
    };

    result.render(mode);
    Ok(())
}

fn context_from_args(args: &ExplainArgs) -> anyhow::Result<CiContext> {
    if let Some(path) = &args.event_path {
        let payload = read_event_file(path)?;
        return Ok(CiContext::from_github_event(&args.event, &payload, None)?);
    }

    let mut ctx = CiContext::new(&args.event).with_labels(&args.labels);
    ctx.action.clone_from(&args.action);
    ctx.source_branch.clone_from(&args.source_branch);
    ctx.target_branch.clone_from(&args.target_branch);
    ctx.title = args.title.clone().unwrap_or_default();
    ctx.is_merged = args.merged;
    ctx.is_draft = args.draft;
    Ok(ctx)
}
