//! Journal entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use br_core::{SetupId, StatDelta, StatVector};

use crate::emotion::Emotion;

/// A single entry in the decision journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogEntry {
    /// The session began.
    SessionStart {
        /// Session identifier.
        session_id: Uuid,
        /// Setups in the scenario set.
        setups: usize,
        /// Decisions the session will ask for.
        max_choices: usize,
        /// Stats at the start.
        stats: StatVector,
        /// When the session started.
        timestamp: DateTime<Utc>,
    },
    /// The player picked an option.
    Decision {
        /// The setup answered.
        setup_id: SetupId,
        /// The setup's prompt.
        prompt: String,
        /// Label of the chosen option.
        choice: String,
        /// Crowd counter key of the answer.
        answer_key: String,
        /// Reward multiplier at the moment of answering.
        multiplier: f64,
        /// Change credited to the tracked stats.
        applied: StatDelta,
        /// Stats after the decision.
        stats: StatVector,
        /// The character's reaction.
        emotion: Emotion,
        /// Share of players who chose the same, if known.
        crowd_percent: Option<u32>,
        /// When the answer was given.
        timestamp: DateTime<Utc>,
    },
    /// Time ran out before an answer.
    Timeout {
        /// The setup left unanswered.
        setup_id: SetupId,
        /// The setup's prompt.
        prompt: String,
        /// Stats after the penalty.
        stats: StatVector,
        /// When the timer ran out.
        timestamp: DateTime<Utc>,
    },
    /// One screen of the ending sequence.
    Ending {
        /// Background art key.
        background: String,
        /// Ending text.
        text: String,
        /// When the ending was produced.
        timestamp: DateTime<Utc>,
    },
}
