//! Branch matcher service - matches branch names against glob patterns
//!
//! This module contains pure matching logic with no I/O dependencies.

use glob::{MatchOptions, Pattern};
use log::warn;

/// Options for branch matching
///
/// `*` may span `/`, so `release/*` matches `release/1.0/hotfix`.
const BRANCH_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Check if a branch pattern matches a candidate branch
///
/// Shell-glob semantics:
/// - `*` - any run of characters (including none)
/// - `?` - exactly one character
/// - anything else is literal, including `[`, `]` and `!`
///
/// An absent candidate never matches.
#[must_use]
pub fn matches_branch(pattern: &str, candidate: Option<&str>) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };

    match Pattern::new(&to_glob(pattern)) {
        Ok(compiled) => compiled.matches_with(candidate, BRANCH_MATCH),
        Err(e) => {
            warn!("Invalid branch pattern {pattern:?}: {e}");
            false
        },
    }
}

/// Translate a branch pattern into `glob` syntax
///
/// Runs of `*` collapse into one, since `*` already spans `/`.
fn to_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut buf = [0u8; 4];

    for c in pattern.chars() {
        match c {
            '*' if out.ends_with('*') => {},
            '*' | '?' => out.push(c),
            _ => out.push_str(&Pattern::escape(c.encode_utf8(&mut buf))),
        }
    }
    out
}
