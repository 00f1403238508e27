//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the decision logic and the
//! external systems it drives (issue tracker, code host, key extraction).
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! Services receive explicitly constructed port values. There is no global
//! client, so tests substitute fakes without patching shared state.

mod code_host;
mod key_source;
mod tracker;

pub use code_host::{CodeHost, CodeHostError};
pub use key_source::IssueKeySource;
pub use tracker::{IssueTracker, TrackerError};

#[cfg(test)]
pub use code_host::MockCodeHost;
#[cfg(test)]
pub use tracker::MockIssueTracker;
