//! Turning a choice (or no choice) and a reward multiplier into new stats.

use serde::{Deserialize, Serialize};
use tracing::debug;

use br_core::{Choice, STAT_MAX, STAT_MIN, Setup, Stat, StatDelta, StatVector};

use crate::error::{EngineError, EngineResult};
use crate::state::SessionState;

/// How the aggregate stat follows the tracked stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMode {
    /// Recomputed as the mean of the tracked stats after clamping.
    #[default]
    MeanOfTracked,
    /// Tracked on its own, moved only by a choice's direct aggregate delta
    /// (the authored `Approval` column when `Environment` is also present).
    Independent,
}

/// Resolver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Subtracted from every tracked stat when nothing was chosen.
    pub no_selection_penalty: f64,
    /// Aggregate stat rule.
    pub aggregate: AggregateMode,
    /// Stats at session start.
    pub starting_stats: StatVector,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            no_selection_penalty: 5.0,
            aggregate: AggregateMode::MeanOfTracked,
            starting_stats: StatVector::default(),
        }
    }
}

impl ResolverConfig {
    /// Check the penalty and the starting stats.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.no_selection_penalty.is_finite() && self.no_selection_penalty >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "no-selection penalty must be non-negative, got {}",
                self.no_selection_penalty
            )));
        }
        if !self.starting_stats.in_bounds() {
            return Err(EngineError::InvalidConfig(format!(
                "starting stats out of range: {}",
                self.starting_stats
            )));
        }
        Ok(())
    }
}

/// What the player did at a decision point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionOutcome {
    /// The option at this index was chosen.
    Chosen(usize),
    /// Nothing was chosen before the deadline.
    NoSelection,
}

/// Result of resolving one decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// What was chosen.
    pub outcome: ResolutionOutcome,
    /// Stats before the decision.
    pub previous: StatVector,
    /// Stats after the decision.
    pub stats: StatVector,
    /// Change actually credited to each tracked stat, after clamping.
    /// Zero for [`ResolutionOutcome::NoSelection`].
    pub applied: StatDelta,
    /// Reward multiplier the choice was scaled by.
    pub multiplier: f64,
}

fn clamp_stat(value: f64) -> f64 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Applies choices to session stats.
#[derive(Debug, Clone)]
pub struct ChoiceResolver {
    config: ResolverConfig,
}

impl ChoiceResolver {
    /// Create a resolver.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve `choice` against `stats` without touching any session.
    ///
    /// Pure: identical inputs always give identical output. A NaN multiplier
    /// counts as zero.
    pub fn compute(
        &self,
        stats: &StatVector,
        choice: Option<(usize, &Choice)>,
        multiplier: f64,
    ) -> Resolution {
        let (outcome, raw, multiplier) = match choice {
            Some((index, choice)) => {
                let multiplier = if multiplier.is_nan() {
                    0.0
                } else {
                    multiplier.clamp(0.0, 1.0)
                };
                (
                    ResolutionOutcome::Chosen(index),
                    choice.delta.scaled(multiplier),
                    multiplier,
                )
            }
            None => (
                ResolutionOutcome::NoSelection,
                StatDelta::uniform(-self.config.no_selection_penalty),
                0.0,
            ),
        };

        let mut next = *stats;
        for stat in Stat::TRACKED {
            next.set(stat, clamp_stat(stats.get(stat) + raw.get(stat)));
        }
        next.aggregate = match self.config.aggregate {
            AggregateMode::MeanOfTracked => next.tracked_mean(),
            AggregateMode::Independent => clamp_stat(stats.aggregate + raw.aggregate),
        };

        let applied = match outcome {
            ResolutionOutcome::Chosen(_) => StatDelta::new(
                next.efficiency - stats.efficiency,
                next.approval - stats.approval,
                next.finance - stats.finance,
            ),
            ResolutionOutcome::NoSelection => StatDelta::default(),
        };

        Resolution {
            outcome,
            previous: *stats,
            stats: next,
            applied,
            multiplier,
        }
    }

    /// Resolve a decision on `setup` and commit it to `state`.
    ///
    /// `selection` is an option index, or `None` for a timeout. A non-finite
    /// multiplier is rejected. On error the state is left exactly as it was.
    pub fn resolve(
        &self,
        state: &mut SessionState,
        setup: &Setup,
        selection: Option<usize>,
        multiplier: f64,
    ) -> EngineResult<Resolution> {
        if state.is_complete() {
            return Err(EngineError::Exhausted);
        }
        if !multiplier.is_finite() {
            return Err(EngineError::InvalidConfig(format!(
                "reward multiplier must be finite, got {multiplier}"
            )));
        }
        let choice = match selection {
            Some(index) => {
                let choice = setup.option(index).ok_or(EngineError::InvalidChoice {
                    index,
                    available: setup.options.len(),
                })?;
                Some((index, choice))
            }
            None => None,
        };

        let resolution = self.compute(&state.stats, choice, multiplier);
        state.stats = resolution.stats;
        state.choices_made += 1;
        debug!(
            setup = %setup.id,
            outcome = ?resolution.outcome,
            multiplier = resolution.multiplier,
            made = state.choices_made,
            "decision resolved"
        );
        Ok(resolution)
    }
}
