//! Single-stat bias classification.
//!
//! One designated tracked stat decides the reaction:
//! - at or below `shocked_threshold`: shocked
//! - below `-thinking_threshold`: concerned
//! - below zero: thinking
//! - at or above `happy_threshold`: happy
//! - above `thinking_threshold`: concerned
//! - otherwise: thinking

use serde::{Deserialize, Serialize};

use br_core::{Stat, StatDelta};

use crate::emotion::Emotion;
use crate::error::{EngineError, EngineResult};

/// Configuration for single-stat bias classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBias {
    /// The stat whose delta is examined (default: efficiency).
    pub stat: Stat,
    /// Signed cutoff for a shocked reaction (default: -8).
    pub shocked_threshold: f64,
    /// Cutoff for a happy reaction (default: 8).
    pub happy_threshold: f64,
    /// Magnitude below which a change only makes the character think (default: 4).
    pub thinking_threshold: f64,
}

impl Default for StatBias {
    fn default() -> Self {
        Self {
            stat: Stat::Efficiency,
            shocked_threshold: -8.0,
            happy_threshold: 8.0,
            thinking_threshold: 4.0,
        }
    }
}

impl StatBias {
    /// The same thresholds applied to a different stat.
    pub fn on(mut self, stat: Stat) -> Self {
        self.stat = stat;
        self
    }

    /// Classify the designated stat's delta.
    pub fn classify(&self, delta: &StatDelta) -> Emotion {
        let d = delta.get(self.stat);
        if d <= self.shocked_threshold {
            Emotion::Shocked
        } else if d < -self.thinking_threshold {
            Emotion::Concerned
        } else if d < 0.0 {
            Emotion::Thinking
        } else if d >= self.happy_threshold {
            Emotion::Happy
        } else if d > self.thinking_threshold {
            Emotion::Concerned
        } else {
            Emotion::Thinking
        }
    }

    /// Check threshold signs and ordering.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.stat.is_tracked() {
            return Err(EngineError::InvalidConfig(
                "bias stat must be a tracked stat".to_string(),
            ));
        }
        if !(self.thinking_threshold >= 0.0
            && self.happy_threshold >= self.thinking_threshold
            && self.shocked_threshold <= -self.thinking_threshold)
        {
            return Err(EngineError::InvalidConfig(format!(
                "bias thresholds need shocked <= -thinking <= 0 <= thinking <= happy, got {} / {} / {}",
                self.shocked_threshold, self.thinking_threshold, self.happy_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_efficiency(d: f64) -> Emotion {
        StatBias::default().classify(&StatDelta::new(d, 0.0, 0.0))
    }

    #[test]
    fn scenario_thresholds() {
        assert_eq!(on_efficiency(-10.0), Emotion::Shocked);
        assert_eq!(on_efficiency(-6.0), Emotion::Concerned);
        assert_eq!(on_efficiency(2.0), Emotion::Thinking);
    }

    #[test]
    fn band_edges() {
        assert_eq!(on_efficiency(-8.0), Emotion::Shocked);
        assert_eq!(on_efficiency(-4.0), Emotion::Thinking);
        assert_eq!(on_efficiency(-0.5), Emotion::Thinking);
        assert_eq!(on_efficiency(0.0), Emotion::Thinking);
        assert_eq!(on_efficiency(4.0), Emotion::Thinking);
        assert_eq!(on_efficiency(5.0), Emotion::Concerned);
        assert_eq!(on_efficiency(8.0), Emotion::Happy);
    }

    #[test]
    fn only_designated_stat_counts() {
        let bias = StatBias::default().on(Stat::Finance);
        let delta = StatDelta::new(-20.0, -20.0, 9.0);
        assert_eq!(bias.classify(&delta), Emotion::Happy);
    }

    #[test]
    fn validation() {
        assert!(StatBias::default().validate().is_ok());
        assert!(StatBias::default().on(Stat::Aggregate).validate().is_err());
        let flipped = StatBias {
            shocked_threshold: 8.0,
            ..StatBias::default()
        };
        assert!(flipped.validate().is_err());
    }
}
