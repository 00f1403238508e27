//! Issue key source port
//!
//! Anything that can name the tracker issues an event refers to.

use std::collections::BTreeSet;

use crate::core::models::CiContext;

/// Source of issue keys for an event
///
/// Implemented by the regex extractor and by any closure, so callers can
/// inject their own resolution logic.
pub trait IssueKeySource {
    /// Deduplicated, upper-cased issue keys referenced by the event
    fn keys(&self, ctx: &CiContext) -> BTreeSet<String>;
}

impl<F> IssueKeySource for F
where
    F: Fn(&CiContext) -> BTreeSet<String>,
{
    fn keys(&self, ctx: &CiContext) -> BTreeSet<String> {
        self(ctx)
    }
}
