//! All-stats consensus classification.
//!
//! Every tracked stat is scanned in declaration order. The first delta whose
//! magnitude reaches `major_threshold` decides on its own (shocked if
//! negative, happy if positive). Otherwise the number of falling stats
//! decides: none is happy, at least `decrease_threshold` is concerned, and
//! anything in between is thinking.

use serde::{Deserialize, Serialize};

use br_core::{Stat, StatDelta};

use crate::emotion::Emotion;
use crate::error::{EngineError, EngineResult};

/// Configuration for all-stats consensus classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Consensus {
    /// Magnitude at which a single stat decides the reaction (default: 6).
    pub major_threshold: f64,
    /// Falling stats needed for a concerned reaction (default: 2).
    pub decrease_threshold: usize,
}

impl Default for Consensus {
    fn default() -> Self {
        Self {
            major_threshold: 6.0,
            decrease_threshold: 2,
        }
    }
}

impl Consensus {
    /// Classify a full delta.
    pub fn classify(&self, delta: &StatDelta) -> Emotion {
        let mut decreased = 0;
        for stat in Stat::TRACKED {
            let d = delta.get(stat);
            if d.abs() >= self.major_threshold {
                return if d < 0.0 {
                    Emotion::Shocked
                } else {
                    Emotion::Happy
                };
            }
            if d < 0.0 {
                decreased += 1;
            }
        }

        if decreased == 0 {
            Emotion::Happy
        } else if decreased >= self.decrease_threshold {
            Emotion::Concerned
        } else {
            Emotion::Thinking
        }
    }

    /// Check that both thresholds are positive.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.major_threshold.is_finite() && self.major_threshold > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "consensus major threshold must be positive, got {}",
                self.major_threshold
            )));
        }
        if self.decrease_threshold == 0 {
            return Err(EngineError::InvalidConfig(
                "consensus decrease threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
