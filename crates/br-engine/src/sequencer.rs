//! Drawing setups without replacement until the session is complete.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use br_core::{ScenarioSet, SetupId, StatVector};

use crate::error::{EngineError, EngineResult};
use crate::state::SessionState;

/// How the next setup is picked from those remaining.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Always the first remaining setup in authored order.
    #[default]
    FirstRemaining,
    /// Uniformly at random among the remaining setups.
    UniformRandom,
}

/// Sequencer settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Decisions per session before clamping to the pool size.
    pub max_choices: usize,
    /// Draw strategy.
    pub selection: SelectionStrategy,
    /// Drawing this setup arms the rare ending.
    pub rare_setup: Option<SetupId>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            max_choices: 12,
            selection: SelectionStrategy::FirstRemaining,
            rare_setup: Some(SetupId(7)),
        }
    }
}

impl SequencerConfig {
    /// Reject a session with no decisions.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_choices == 0 {
            return Err(EngineError::InvalidConfig(
                "max choices must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Hands out setups and tracks completion.
#[derive(Debug, Clone)]
pub struct ScenarioSequencer {
    config: SequencerConfig,
}

impl ScenarioSequencer {
    /// Create a sequencer.
    pub fn new(config: SequencerConfig) -> Self {
        Self { config }
    }

    /// Session state with every setup of `set` remaining.
    pub fn start(&self, set: &ScenarioSet, stats: StatVector) -> SessionState {
        let state = SessionState::new(set.ids(), self.config.max_choices, stats);
        debug!(
            setups = set.len(),
            max_choices = state.max_choices(),
            "sequencer started"
        );
        state
    }

    /// Draw the next setup and remove it from the pool.
    ///
    /// Fails with [`EngineError::Exhausted`] once `max_choices` setups have
    /// been drawn, so a drawn id is never handed out twice.
    pub fn next(&self, state: &mut SessionState, rng: &mut impl Rng) -> EngineResult<SetupId> {
        if state.remaining.is_empty() || state.drawn() >= state.max_choices {
            return Err(EngineError::Exhausted);
        }
        let index = match self.config.selection {
            SelectionStrategy::FirstRemaining => 0,
            SelectionStrategy::UniformRandom => rng.random_range(0..state.remaining.len()),
        };
        let id = state.remaining.remove(index);
        if self.config.rare_setup == Some(id) {
            state.special_flag = true;
            debug!(%id, "rare event armed");
        }
        debug!(%id, remaining = state.remaining.len(), "setup drawn");
        Ok(id)
    }

    /// Whether every decision of the session has been made.
    pub fn is_complete(&self, state: &SessionState) -> bool {
        state.is_complete()
    }

    /// The active configuration.
    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use br_core::{Choice, Setup};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn set(n: u32) -> ScenarioSet {
        ScenarioSet::new(
            (1..=n)
                .map(|id| Setup::new(id, format!("Q{id}")).with_choice(Choice::new("ok", "")))
                .collect(),
        )
        .unwrap()
    }

    fn sequencer(max: usize, selection: SelectionStrategy) -> ScenarioSequencer {
        ScenarioSequencer::new(SequencerConfig {
            max_choices: max,
            selection,
            rare_setup: Some(SetupId(7)),
        })
    }

    #[test]
    fn first_remaining_is_in_order() {
        let seq = sequencer(3, SelectionStrategy::FirstRemaining);
        let mut state = seq.start(&set(5), StatVector::default());
        let mut rng = StdRng::seed_from_u64(1);
        let drawn: Vec<_> = (0..3).map(|_| seq.next(&mut state, &mut rng).unwrap()).collect();
        assert_eq!(drawn, vec![SetupId(1), SetupId(2), SetupId(3)]);
        assert_eq!(state.remaining(), &[SetupId(4), SetupId(5)]);
    }

    #[test]
    fn random_draws_without_replacement() {
        let seq = sequencer(10, SelectionStrategy::UniformRandom);
        let mut state = seq.start(&set(10), StatVector::default());
        let mut rng = StdRng::seed_from_u64(99);
        let drawn: HashSet<_> = (0..10)
            .map(|_| seq.next(&mut state, &mut rng).unwrap())
            .collect();
        assert_eq!(drawn.len(), 10);
        assert!(state.remaining().is_empty());
    }

    #[test]
    fn random_draw_is_seeded() {
        let seq = sequencer(4, SelectionStrategy::UniformRandom);
        let draw = |seed| {
            let mut state = seq.start(&set(8), StatVector::default());
            let mut rng = StdRng::seed_from_u64(seed);
            (0..4)
                .map(|_| seq.next(&mut state, &mut rng).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(5), draw(5));
    }

    #[test]
    fn exhaustion_after_max_choices() {
        let seq = sequencer(2, SelectionStrategy::FirstRemaining);
        let mut state = seq.start(&set(4), StatVector::default());
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..2 {
            seq.next(&mut state, &mut rng).unwrap();
            state.choices_made += 1;
        }
        assert!(seq.is_complete(&state));
        assert_eq!(state.remaining().len(), 2);
        assert!(matches!(
            seq.next(&mut state, &mut rng),
            Err(EngineError::Exhausted)
        ));
    }

    #[test]
    fn max_clamped_to_pool_size() {
        let seq = sequencer(12, SelectionStrategy::FirstRemaining);
        let state = seq.start(&set(3), StatVector::default());
        assert_eq!(state.max_choices(), 3);
    }

    #[test]
    fn rare_setup_sets_flag() {
        let seq = sequencer(8, SelectionStrategy::FirstRemaining);
        let mut state = seq.start(&set(8), StatVector::default());
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..6 {
            seq.next(&mut state, &mut rng).unwrap();
        }
        assert!(!state.special_flag());
        assert_eq!(seq.next(&mut state, &mut rng).unwrap(), SetupId(7));
        assert!(state.special_flag());
    }

    #[test]
    fn zero_max_choices_rejected() {
        let cfg = SequencerConfig {
            max_choices: 0,
            ..SequencerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
