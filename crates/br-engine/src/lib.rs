//! Scenario and stat resolution engine for Boardroom.
//!
//! Provides the response timer with its decaying reward multiplier, setup
//! sequencing, choice resolution with stat clamping, character reactions,
//! banded endings with a rare alternate, crowd statistics shared across
//! sessions, and a decision journal. [`Session`] ties them together.

pub mod config;
pub mod delay;
pub mod emotion;
pub mod ending;
pub mod error;
pub mod journal;
pub mod leaderboard;
pub mod resolver;
pub mod sequencer;
pub mod session;
pub mod state;
pub mod timer;

pub use config::EngineConfig;
pub use delay::{Delay, DelayState};
pub use emotion::{Consensus, Emotion, EmotionClassifier, EmotionConfig, EmotionPolicy, StatBias};
pub use ending::{Ending, EndingConfig, EndingKind, EndingResolver};
pub use error::{EngineError, EngineResult, LeaderboardError, LeaderboardResult};
pub use journal::{DecisionLog, LogEntry};
pub use leaderboard::{
    AnswerKey, CounterStore, JsonFileStore, Leaderboard, MemoryStore, crowd_message,
};
pub use resolver::{AggregateMode, ChoiceResolver, Resolution, ResolutionOutcome, ResolverConfig};
pub use sequencer::{ScenarioSequencer, SelectionStrategy, SequencerConfig};
pub use session::{Decision, Session, SessionEvent, SessionPhase};
pub use state::SessionState;
pub use timer::{ResponseTimer, TimerConfig, TimerEvent, TimerPhase, TimerState};
