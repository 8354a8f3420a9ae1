//! Final ending sequence once every decision is made.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use br_core::ending::{background_key, verdict_background_key};
use br_core::{Band, EndingTextSet, STAT_MAX, STAT_MIN, Stat, StatVector};

use crate::error::{EngineError, EngineResult};
use crate::state::SessionState;

/// Ending settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndingConfig {
    /// Values below this are in the bad band.
    pub low: f64,
    /// Values at or above this are in the good band.
    pub high: f64,
    /// The rare ending replaces the first ending with probability `1 / rarity`.
    pub rarity: u32,
    /// Stats whose endings are shown, in order.
    pub order: Vec<Stat>,
    /// Tracked mean needed for a good verdict. `None` disables the verdict.
    pub verdict_threshold: Option<f64>,
}

impl Default for EndingConfig {
    fn default() -> Self {
        Self {
            low: 25.0,
            high: 75.0,
            rarity: 10,
            order: Stat::TRACKED.to_vec(),
            verdict_threshold: Some(50.0),
        }
    }
}

impl EndingConfig {
    /// Check thresholds, rarity and order.
    pub fn validate(&self) -> EngineResult<()> {
        let in_range = |v: f64| (STAT_MIN..=STAT_MAX).contains(&v);
        if !(in_range(self.low) && in_range(self.high) && self.low <= self.high) {
            return Err(EngineError::InvalidConfig(format!(
                "ending thresholds must satisfy 0 <= low <= high <= 100, got {} / {}",
                self.low, self.high
            )));
        }
        if self.rarity == 0 {
            return Err(EngineError::InvalidConfig(
                "rarity must be at least 1".to_string(),
            ));
        }
        if self.order.is_empty() {
            return Err(EngineError::InvalidConfig(
                "ending order is empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.order.iter().find(|s| !seen.insert(**s)) {
            return Err(EngineError::InvalidConfig(format!(
                "{dup} appears twice in the ending order"
            )));
        }
        if let Some(t) = self.verdict_threshold.filter(|t| !in_range(*t)) {
            return Err(EngineError::InvalidConfig(format!(
                "verdict threshold {t} outside stat range"
            )));
        }
        Ok(())
    }

    /// Band of a stat value under these thresholds.
    pub fn band(&self, value: f64) -> Band {
        Band::of(value, self.low, self.high)
    }
}

/// Which ending was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndingKind {
    /// A stat's banded ending.
    Stat {
        /// The stat.
        stat: Stat,
        /// Its final band.
        band: Band,
    },
    /// The rare alternate ending.
    Rare,
    /// The overall verdict.
    Verdict {
        /// Whether the verdict is favourable.
        good: bool,
    },
}

/// One screen of the ending sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    /// What this ending reflects.
    pub kind: EndingKind,
    /// Text shown.
    pub text: String,
    /// Background art key.
    pub background: String,
}

/// Produces the ending sequence.
#[derive(Debug, Clone)]
pub struct EndingResolver {
    config: EndingConfig,
}

impl EndingResolver {
    /// Create a resolver.
    pub fn new(config: EndingConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EndingConfig {
        &self.config
    }

    /// Check that `endings` can serve every stat in the configured order.
    pub fn check_content(&self, endings: &EndingTextSet) -> EngineResult<()> {
        endings.require(&self.config.order)?;
        Ok(())
    }

    /// Banded endings for `stats`, without rare substitution or verdict.
    pub fn stat_endings(
        &self,
        stats: &StatVector,
        endings: &EndingTextSet,
    ) -> EngineResult<Vec<Ending>> {
        self.config
            .order
            .iter()
            .map(|&stat| -> EngineResult<Ending> {
                let band = self.config.band(stats.get(stat));
                Ok(Ending {
                    kind: EndingKind::Stat { stat, band },
                    text: endings.band_text(stat, band)?.to_string(),
                    background: background_key(stat, band),
                })
            })
            .collect()
    }

    /// The full ending sequence for a complete session.
    ///
    /// If the rare flag is set, the first ending is replaced by the rare
    /// one with probability `1 / rarity`, which clears the flag.
    pub fn resolve(
        &self,
        state: &mut SessionState,
        endings: &EndingTextSet,
        rng: &mut impl Rng,
    ) -> EngineResult<Vec<Ending>> {
        if !state.is_complete() {
            return Err(EngineError::NotComplete {
                made: state.choices_made,
                max: state.max_choices,
            });
        }

        let mut sequence = self.stat_endings(&state.stats, endings)?;

        if state.special_flag && rng.random_ratio(1, self.config.rarity) {
            let rare = endings.rare();
            if let Some(first) = sequence.first_mut() {
                *first = Ending {
                    kind: EndingKind::Rare,
                    text: rare.text.clone(),
                    background: rare.background.clone(),
                };
            }
            state.special_flag = false;
            debug!("rare ending substituted");
        }

        if let Some(threshold) = self.config.verdict_threshold.filter(|_| endings.has_verdict()) {
            let good = state.stats.tracked_mean() >= threshold;
            sequence.push(Ending {
                kind: EndingKind::Verdict { good },
                text: endings.verdict(good)?.to_string(),
                background: verdict_background_key(good),
            });
        }

        info!(endings = sequence.len(), "endings resolved");
        Ok(sequence)
    }
}
