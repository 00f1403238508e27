//! Sync issues for the current CI event

use anyhow::Context;
use log::{info, warn};

use jira_transit::adapters::{GitHubClient, JiraClient, read_event_file};
use jira_transit::config::{Config, resolve_credentials};
use jira_transit::core::models::CiContext;
use jira_transit::core::ports::IssueKeySource;
use jira_transit::core::services::{IssueSynchronizer, SyncOptions, run_sync};
use jira_transit::output::OutputMode;

use crate::cli::app::SyncArgs;

/// Apply the configured rules to every issue referenced by the event
///
/// Per-issue failures are reported, not fatal, unless `--strict` is given.
pub fn sync(args: &SyncArgs, mode: OutputMode) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;
    let credentials =
        resolve_credentials(&config, args.jira_token.as_deref(), args.github_token.as_deref())?;

    let event_name = args
        .event_name
        .as_deref()
        .context("no event name: pass --event-name or set GITHUB_EVENT_NAME")?;
    let payload = match &args.event_path {
        Some(path) => read_event_file(path)?,
        None => {
            warn!("No event payload given; only the event name is known");
            String::new()
        },
    };
    let ctx = CiContext::from_github_event(event_name, &payload, args.repository.as_deref())?;
    info!(
        "Event {} (action: {}) on {}",
        ctx.event,
        ctx.action.as_deref().unwrap_or("none"),
        ctx.repo.as_ref().map_or_else(|| "unknown repository".to_string(), ToString::to_string)
    );

    let keys = config.key_extractor()?.keys(&ctx);

    let tracker = JiraClient::from_config(&config, &credentials.tracker_password)?;
    let code_host = match (&credentials.github_token, config.sync_milestones) {
        (Some(token), true) => Some(GitHubClient::new(&config.github.api_url, token)?),
        (None, true) => {
            warn!("syncMilestones is on but no GitHub token was supplied; skipping milestones");
            None
        },
        (_, false) => None,
    };

    let options = SyncOptions {
        sync_milestones: config.sync_milestones,
        dry_run: args.dry_run,
    };
    let mut synchronizer =
        IssueSynchronizer::new(&tracker, &config.rules, &config.connection.host).with_options(options);
    if let Some(host) = &code_host {
        synchronizer = synchronizer.with_code_host(host);
    }

    let report = run_sync(&keys, &ctx, &synchronizer);
    report.render(mode);

    if args.strict && report.has_failures() {
        anyhow::bail!("one or more issues failed to sync");
    }

    Ok(())
}
