//! Error types for the resolution engine.

use thiserror::Error;

use br_core::ContentError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running a session.
///
/// Content and configuration errors are fatal to session start. Everything
/// else is recoverable and leaves session state untouched.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Scenario or ending content is unusable.
    #[error("{0}")]
    Content(#[from] ContentError),

    /// The engine configuration is inconsistent.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The selected option does not exist on the current setup.
    #[error("invalid choice: option {index} (setup has {available})")]
    InvalidChoice {
        /// Requested option index.
        index: usize,
        /// Number of options on the setup.
        available: usize,
    },

    /// Nothing was selected while time remains.
    #[error("no option selected")]
    NothingSelected,

    /// A timer operation was called in the wrong state.
    #[error("timer misuse: {operation} while {state}")]
    TimerMisuse {
        /// The attempted operation.
        operation: &'static str,
        /// The timer state at the time.
        state: String,
    },

    /// Every available setup has been used.
    #[error("no setups remaining")]
    Exhausted,

    /// There is no setup awaiting an answer.
    #[error("no active setup")]
    NoActiveSetup,

    /// The session still has decisions to make.
    #[error("session is not complete ({made} of {max} decisions made)")]
    NotComplete {
        /// Decisions made so far.
        made: usize,
        /// Decisions required.
        max: usize,
    },

    /// The endings were already produced.
    #[error("session already finished")]
    SessionFinished,
}

/// Failures of the crowd-statistics backing store.
///
/// These are cosmetic. The leaderboard absorbs them and carries on with
/// whatever counts it already knows.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// The backing store could not be reached.
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),

    /// The backing store could not be read or written.
    #[error("leaderboard io: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store returned unreadable data.
    #[error("malformed leaderboard data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The answer key is not of the form `Answer<id><letter>`.
    #[error("invalid answer key: {0}")]
    InvalidKey(String),
}

/// Result type for leaderboard store operations.
pub type LeaderboardResult<T> = Result<T, LeaderboardError>;
