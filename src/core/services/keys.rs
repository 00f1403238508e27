//! Issue key extraction from branch names and titles

use std::collections::BTreeSet;

use log::debug;
use regex::{Regex, RegexBuilder};

use crate::core::models::CiContext;
use crate::core::ports::IssueKeySource;

/// Default pattern for `KEY-123` style issue keys
pub const DEFAULT_ISSUE_KEY_PATTERN: &str = r"[A-Z][A-Z0-9]+-\d+";

/// Extracts issue keys with a regular expression
///
/// Matching is case-insensitive and every key is upper-cased, so a branch
/// named `feature/proj-12-login` yields `PROJ-12`.
#[derive(Debug, Clone)]
pub struct RegexKeyExtractor {
    regex: Regex,
}

impl RegexKeyExtractor {
    /// Compile an extractor for a pattern
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    /// Extract keys from arbitrary text
    #[must_use]
    pub fn extract_from(&self, text: &str) -> BTreeSet<String> {
        self.regex.find_iter(text).map(|m| m.as_str().to_uppercase()).collect()
    }

    /// Extract keys from the event's source branch and title
    #[must_use]
    pub fn extract(&self, ctx: &CiContext) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();

        if let Some(branch) = &ctx.source_branch {
            debug!("Scanning branch {branch:?} for issue keys");
            keys.extend(self.extract_from(branch));
        }

        debug!("Scanning title {:?} for issue keys", ctx.title);
        keys.extend(self.extract_from(&ctx.title));

        keys
    }
}

impl IssueKeySource for RegexKeyExtractor {
    fn keys(&self, ctx: &CiContext) -> BTreeSet<String> {
        self.extract(ctx)
    }
}
