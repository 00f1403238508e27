//! Common test utilities shared across test types
//!
//! - `fixtures.rs` - Test data builders
//! - `mocks.rs` - In-memory tracker and code host
