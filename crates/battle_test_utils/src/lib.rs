//! # Battle Test Utilities
//!
//! Shared testing utilities for the rules engine:
//! - Fixture factions, seats, units and boards
//! - Scripted and approach-the-enemy players
//! - Determinism test harness
//! - Property-based testing strategies
//! - Test logging setup

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod logging;
pub mod players;
pub mod strategies;

pub use logging::init_test_logging;

/// Re-export proptest for convenience.
pub use proptest;
