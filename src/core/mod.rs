//! Core domain logic for jira-transit
//!
//! This module contains the decision logic with no I/O dependencies.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (CiContext, TransitionRule, Criteria, Milestone)
//! - `services/` - Rule evaluation, issue synchronization, milestone reconciliation
//! - `ports/` - Trait definitions for the tracker and the code host

pub mod models;
pub mod ports;
pub mod services;
