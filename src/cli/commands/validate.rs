//! Validate the configuration file

use std::path::Path;

use jira_transit::config::Config;
use jira_transit::output::{OutputMode, RuleSummary, ValidateResult};

/// Load the configuration and print a summary of its rules
pub fn validate(config_path: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;

    let result = ValidateResult {
        config_path: config_path.display().to_string(),
        host: config.connection.host.clone(),
        issue_key_pattern: config.issue_key_pattern.clone(),
        sync_milestones: config.sync_milestones,
        rules: config
            .rules
            .iter()
            .enumerate()
            .map(|(index, rule)| RuleSummary::new(index, rule))
            .collect(),
    };

    result.render(mode);
    Ok(())
}
