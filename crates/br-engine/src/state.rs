//! Per-session mutable state.

use serde::{Deserialize, Serialize};

use br_core::{SetupId, StatVector};

/// Stats and progress of one session.
///
/// Only the sequencer (draws, rare flag) and the resolver (stats, decision
/// count) mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub(crate) stats: StatVector,
    pub(crate) remaining: Vec<SetupId>,
    pub(crate) initial_count: usize,
    pub(crate) choices_made: usize,
    pub(crate) max_choices: usize,
    pub(crate) special_flag: bool,
}

impl SessionState {
    /// Fresh state over `ids`, with `max_choices` clamped to the number of ids.
    pub fn new(ids: Vec<SetupId>, max_choices: usize, stats: StatVector) -> Self {
        let max_choices = max_choices.min(ids.len());
        Self {
            stats,
            initial_count: ids.len(),
            remaining: ids,
            choices_made: 0,
            max_choices,
            special_flag: false,
        }
    }

    /// Current stats.
    pub fn stats(&self) -> &StatVector {
        &self.stats
    }

    /// Setups not yet drawn, in draw-candidate order.
    pub fn remaining(&self) -> &[SetupId] {
        &self.remaining
    }

    /// Decisions resolved so far.
    pub fn choices_made(&self) -> usize {
        self.choices_made
    }

    /// Decisions in this session.
    pub fn max_choices(&self) -> usize {
        self.max_choices
    }

    /// Setups drawn so far.
    pub fn drawn(&self) -> usize {
        self.initial_count - self.remaining.len()
    }

    /// Whether the rare-event setup came up.
    pub fn special_flag(&self) -> bool {
        self.special_flag
    }

    /// Whether every decision has been made.
    pub fn is_complete(&self) -> bool {
        self.choices_made == self.max_choices
    }
}
