//! Configuration for a Boardroom session.

use std::path::Path;

use serde::{Deserialize, Serialize};

use br_core::{SetupId, Stat};

use crate::emotion::{EmotionConfig, EmotionPolicy};
use crate::ending::EndingConfig;
use crate::error::{EngineError, EngineResult};
use crate::resolver::{AggregateMode, ResolverConfig};
use crate::sequencer::{SelectionStrategy, SequencerConfig};
use crate::timer::TimerConfig;

/// Configuration for a session.
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// RNG seed for setup draws, mixed reactions and the rare ending.
    pub seed: u64,
    /// Seconds between a resolved decision and readiness for the next setup.
    pub transition_secs: f64,
    /// Response timer.
    pub timer: TimerConfig,
    /// Setup drawing.
    pub sequencer: SequencerConfig,
    /// Stat resolution.
    pub resolver: ResolverConfig,
    /// Character reactions.
    pub emotion: EmotionConfig,
    /// Ending sequence.
    pub endings: EndingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            transition_secs: 0.0,
            timer: TimerConfig::default(),
            sequencer: SequencerConfig::default(),
            resolver: ResolverConfig::default(),
            emotion: EmotionConfig::default(),
            endings: EndingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Read and parse a JSON config file.
    pub fn load(path: &Path) -> EngineResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&json)
    }

    /// Check every section.
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.transition_secs.is_finite() && self.transition_secs >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "transition must be non-negative, got {}",
                self.transition_secs
            )));
        }
        self.timer.validate()?;
        self.sequencer.validate()?;
        self.resolver.validate()?;
        self.emotion.validate()?;
        self.endings.validate()
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the transition delay.
    pub fn with_transition(mut self, secs: f64) -> Self {
        self.transition_secs = secs;
        self
    }

    /// Set the response timer.
    pub fn with_timer(mut self, timer: TimerConfig) -> Self {
        self.timer = timer;
        self
    }

    /// Set the decisions per session.
    pub fn with_max_choices(mut self, max_choices: usize) -> Self {
        self.sequencer.max_choices = max_choices;
        self
    }

    /// Set how setups are drawn.
    pub fn with_selection(mut self, selection: SelectionStrategy) -> Self {
        self.sequencer.selection = selection;
        self
    }

    /// Set the setup that arms the rare ending.
    pub fn with_rare_setup(mut self, setup: Option<SetupId>) -> Self {
        self.sequencer.rare_setup = setup;
        self
    }

    /// Set how the aggregate stat follows the tracked stats.
    pub fn with_aggregate(mut self, aggregate: AggregateMode) -> Self {
        self.resolver.aggregate = aggregate;
        self
    }

    /// Set the reaction policy.
    pub fn with_emotion_policy(mut self, policy: EmotionPolicy) -> Self {
        self.emotion.policy = policy;
        self
    }

    /// Make the bias policy watch `stat` for one character.
    pub fn with_character_bias(mut self, character_id: impl Into<String>, stat: Stat) -> Self {
        self.emotion.character_bias.insert(character_id.into(), stat);
        self
    }

    /// Set the ending rules.
    pub fn with_endings(mut self, endings: EndingConfig) -> Self {
        self.endings = endings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::Consensus;

    #[test]
    fn default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.timer.total_secs, 60.0);
        assert_eq!(cfg.timer.grace_secs, 25.0);
        assert_eq!(cfg.sequencer.max_choices, 12);
        assert_eq!(cfg.sequencer.selection, SelectionStrategy::FirstRemaining);
        assert_eq!(cfg.sequencer.rare_setup, Some(SetupId(7)));
        assert_eq!(cfg.resolver.no_selection_penalty, 5.0);
        assert_eq!(cfg.resolver.aggregate, AggregateMode::MeanOfTracked);
        assert_eq!(cfg.endings.low, 25.0);
        assert_eq!(cfg.endings.high, 75.0);
        assert_eq!(cfg.endings.rarity, 10);
        assert_eq!(cfg.endings.order, Stat::TRACKED.to_vec());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_methods() {
        let cfg = EngineConfig::default()
            .with_seed(7)
            .with_max_choices(3)
            .with_selection(SelectionStrategy::UniformRandom)
            .with_emotion_policy(EmotionPolicy::Consensus(Consensus::default()))
            .with_character_bias("CFO", Stat::Finance)
            .with_transition(1.5)
            .with_rare_setup(None)
            .with_aggregate(AggregateMode::Independent);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.sequencer.rare_setup, None);
        assert_eq!(cfg.resolver.aggregate, AggregateMode::Independent);
        assert_eq!(cfg.sequencer.max_choices, 3);
        assert_eq!(cfg.sequencer.selection, SelectionStrategy::UniformRandom);
        assert_eq!(cfg.emotion.character_bias["CFO"], Stat::Finance);
        assert_eq!(cfg.transition_secs, 1.5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "seed": 9,
            "timer": {"total_secs": 20.0, "grace_secs": 5.0, "decay_secs": 5.0},
            "sequencer": {"selection": "uniform_random"},
            "endings": {"order": ["aggregate", "finance"], "verdict_threshold": null}
        }"#;
        let cfg = EngineConfig::from_json_str(json).unwrap();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.timer.total_secs, 20.0);
        assert_eq!(cfg.timer.min_multiplier, 0.5);
        assert_eq!(cfg.sequencer.selection, SelectionStrategy::UniformRandom);
        assert_eq!(cfg.sequencer.max_choices, 12);
        assert_eq!(cfg.endings.order, vec![Stat::Aggregate, Stat::Finance]);
        assert_eq!(cfg.endings.verdict_threshold, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn bad_json_is_invalid_config() {
        assert!(matches!(
            EngineConfig::from_json_str("{\"seed\": \"x\"}"),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"seed": 1234}"#).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap().seed, 1234);
        assert!(EngineConfig::load(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn validation_catches_each_section() {
        assert!(EngineConfig::default().with_transition(-1.0).validate().is_err());
        assert!(EngineConfig::default().with_max_choices(0).validate().is_err());
        assert!(
            EngineConfig::default()
                .with_timer(TimerConfig::new(10.0, 2.0, 2.0, 2.0))
                .validate()
                .is_err()
        );
        assert!(
            EngineConfig::default()
                .with_character_bias("Ghost", Stat::Aggregate)
                .validate()
                .is_err()
        );
        let endings = EndingConfig {
            rarity: 0,
            ..EndingConfig::default()
        };
        assert!(EngineConfig::default().with_endings(endings).validate().is_err());
    }
}
