//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands;
use jira_transit::config::DEFAULT_CONFIG_PATH;
use jira_transit::output::OutputMode;

/// jira-transit - Jira workflow automation from pull request events
#[derive(Parser, Debug)]
#[command(
    name = "jira-transit",
    version,
    about = "Jira workflow automation from pull request events",
    long_about = "Move Jira issues through their workflow when pull requests change.\n\n\
                  Rules map an issue's current status and the triggering event to a\n\
                  transition. Releases can be mirrored as GitHub milestones."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply transition rules for the current CI event
    Sync(SyncArgs),

    /// Load and validate the configuration
    Validate {
        /// Configuration file (.yml, .yaml or .toml)
        #[arg(short, long, env = "JIRA_TRANSIT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Show how the rules evaluate for an event, without network access
    Explain(ExplainArgs),

    /// Show version
    Version,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Configuration file (.yml, .yaml or .toml)
    #[arg(short, long, env = "JIRA_TRANSIT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Event kind, e.g. pull_request
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// Path to the event payload JSON
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Jira password or API token, when not in the config
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    pub jira_token: Option<String>,

    /// GitHub token, when not in the config
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Select transitions but write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with an error if any issue failed
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Configuration file (.yml, .yaml or .toml)
    #[arg(short, long, env = "JIRA_TRANSIT_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Current issue status to assume
    #[arg(long)]
    pub state: String,

    /// Transition the tracker allows from that status (repeatable)
    #[arg(long = "allowed", value_name = "NAME")]
    pub allowed: Vec<String>,

    /// Event payload JSON to evaluate
    #[arg(long)]
    pub event_path: Option<PathBuf>,

    /// Event kind
    #[arg(long = "event", visible_alias = "event-name", default_value = "pull_request")]
    pub event: String,

    /// Event action, e.g. opened
    #[arg(long)]
    pub action: Option<String>,

    /// Source (head) branch
    #[arg(long)]
    pub source_branch: Option<String>,

    /// Target (base) branch
    #[arg(long)]
    pub target_branch: Option<String>,

    /// Pull request title
    #[arg(long)]
    pub title: Option<String>,

    /// Label on the pull request (repeatable)
    #[arg(long = "label", value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Merged flag; bare flag means true
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub merged: Option<bool>,

    /// Draft flag; bare flag means true
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub draft: Option<bool>,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Sync(args)) => commands::sync(&args, output_mode),
        Some(Command::Validate { config }) => commands::validate(&config, output_mode),
        Some(Command::Explain(args)) => commands::explain(&args, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": jira_transit::VERSION
                    })
                );
            } else {
                println!("jira-transit v{}", jira_transit::VERSION);
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": jira_transit::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("jira-transit v{}", jira_transit::VERSION);
                println!("\nRun 'jira-transit --help' for usage");
                println!("Run 'jira-transit validate' to check your configuration");
            }
            Ok(())
        },
    }
}
