//! Core content model for Boardroom: stats, setups, choices, and endings.
//!
//! This crate defines the read-only data a session plays through. It holds no
//! randomness and no session state; you can build a [`ContentStore`]
//! programmatically or load one from the game's JSON documents.

/// Scenario and ending document loading.
pub mod content;
/// Ending texts and background keys.
pub mod ending;
/// Error types used throughout the crate.
pub mod error;
/// Setups, choices, and scenario sets.
pub mod setup;
/// Stats, stat deltas, and ending bands.
pub mod stat;

/// Re-export content loading.
pub use content::{ContentStore, parse_endings, parse_scenarios};
/// Re-export ending types.
pub use ending::{EndingText, EndingTextSet};
/// Re-export error types.
pub use error::{ContentError, ContentResult};
/// Re-export setup types.
pub use setup::{Choice, MAX_OPTIONS, ScenarioSet, Setup, SetupId};
/// Re-export stat types.
pub use stat::{Band, STAT_MAX, STAT_MIN, Stat, StatDelta, StatVector};
