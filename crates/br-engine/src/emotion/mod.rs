//! Character reactions to a decision.
//!
//! Three policies are available:
//! - **Stat bias**: one designated stat's delta decides
//! - **Consensus**: every tracked stat's delta is considered
//! - **Mixed**: one of the two is picked at random per decision

pub mod bias;
pub mod consensus;

pub use bias::StatBias;
pub use consensus::Consensus;

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use br_core::{Stat, StatDelta};

use crate::error::EngineResult;
use crate::resolver::{Resolution, ResolutionOutcome};

/// A character's reaction, as shown by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    /// Neutral resting pose.
    Default,
    /// Pleased.
    Happy,
    /// Worried.
    Concerned,
    /// Alarmed.
    Shocked,
    /// Pondering.
    Thinking,
    /// Presentation wildcard. Never produced by classification.
    Any,
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "Default"),
            Self::Happy => write!(f, "Happy"),
            Self::Concerned => write!(f, "Concerned"),
            Self::Shocked => write!(f, "Shocked"),
            Self::Thinking => write!(f, "Thinking"),
            Self::Any => write!(f, "Any"),
        }
    }
}

/// How a delta is mapped to an [`Emotion`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionPolicy {
    /// One designated stat decides.
    StatBias(StatBias),
    /// All tracked stats are considered.
    Consensus(Consensus),
    /// Each decision picks one of the two policies uniformly at random.
    Mixed {
        /// Settings used when the bias policy is picked.
        bias: StatBias,
        /// Settings used when the consensus policy is picked.
        consensus: Consensus,
    },
}

impl Default for EmotionPolicy {
    fn default() -> Self {
        Self::StatBias(StatBias::default())
    }
}

impl EmotionPolicy {
    /// Check the settings of every policy in use.
    pub fn validate(&self) -> EngineResult<()> {
        match self {
            Self::StatBias(b) => b.validate(),
            Self::Consensus(c) => c.validate(),
            Self::Mixed { bias, consensus } => {
                bias.validate()?;
                consensus.validate()
            }
        }
    }
}

/// Classify a delta under `policy`.
///
/// `rng` is only consulted by [`EmotionPolicy::Mixed`].
pub fn classify(policy: &EmotionPolicy, delta: &StatDelta, rng: &mut impl Rng) -> Emotion {
    match policy {
        EmotionPolicy::StatBias(b) => b.classify(delta),
        EmotionPolicy::Consensus(c) => c.classify(delta),
        EmotionPolicy::Mixed { bias, consensus } => {
            if rng.random_bool(0.5) {
                bias.classify(delta)
            } else {
                consensus.classify(delta)
            }
        }
    }
}

/// Classifier settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Policy used for every character.
    pub policy: EmotionPolicy,
    /// Per-character override of the stat the bias policy examines.
    pub character_bias: BTreeMap<String, Stat>,
}

impl EmotionConfig {
    /// Check the policy and the overrides.
    pub fn validate(&self) -> EngineResult<()> {
        self.policy.validate()?;
        for stat in self.character_bias.values() {
            StatBias::default().on(*stat).validate()?;
        }
        Ok(())
    }
}

/// Maps resolutions to character reactions.
#[derive(Debug, Clone)]
pub struct EmotionClassifier {
    config: EmotionConfig,
}

impl EmotionClassifier {
    /// Create a classifier.
    pub fn new(config: EmotionConfig) -> Self {
        Self { config }
    }

    /// The policy for `character_id`, with its bias stat override applied.
    pub fn policy_for(&self, character_id: &str) -> EmotionPolicy {
        let Some(stat) = self.config.character_bias.get(character_id).copied() else {
            return self.config.policy;
        };
        match self.config.policy {
            EmotionPolicy::StatBias(b) => EmotionPolicy::StatBias(b.on(stat)),
            EmotionPolicy::Mixed { bias, consensus } => EmotionPolicy::Mixed {
                bias: bias.on(stat),
                consensus,
            },
            consensus => consensus,
        }
    }

    /// Classify a raw delta for `character_id`.
    pub fn classify(&self, character_id: &str, delta: &StatDelta, rng: &mut impl Rng) -> Emotion {
        classify(&self.policy_for(character_id), delta, rng)
    }

    /// Classify a resolved decision. Timeouts are always shocking.
    pub fn react(&self, character_id: &str, resolution: &Resolution, rng: &mut impl Rng) -> Emotion {
        match resolution.outcome {
            ResolutionOutcome::NoSelection => Emotion::Shocked,
            ResolutionOutcome::Chosen(_) => self.classify(character_id, &resolution.applied, rng),
        }
    }
}
