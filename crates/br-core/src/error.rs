use crate::setup::SetupId;
use crate::stat::Stat;

/// Alias for `Result<T, ContentError>`.
pub type ContentResult<T> = Result<T, ContentError>;

/// Errors raised while loading or reading scenario and ending content.
///
/// All of these are fatal to session start: a session never runs on
/// partial content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The scenario set has no setups.
    #[error("scenario set is empty")]
    Empty,

    /// The document could not be parsed (bad JSON, missing `Setups` or `Decisions`).
    #[error("malformed content: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The content file could not be read.
    #[error("cannot read content: {0}")]
    Io(#[from] std::io::Error),

    /// A setup offers no choices.
    #[error("setup {setup} has no choices")]
    NoOptions {
        /// The offending setup.
        setup: SetupId,
    },

    /// A setup offers more choices than the game can display.
    #[error("setup {setup} has {count} choices (at most {max} allowed)")]
    TooManyOptions {
        /// The offending setup.
        setup: SetupId,
        /// Number of choices found.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },

    /// Two setups share an id.
    #[error("duplicate setup id: {0}")]
    DuplicateSetup(SetupId),

    /// An ending array does not hold exactly bad/neutral/good texts.
    #[error("{stat} endings must have exactly 3 entries, found {found}")]
    EndingBand {
        /// Stat whose endings are malformed.
        stat: Stat,
        /// Number of entries found.
        found: usize,
    },

    /// A band index past the end of an ending array was requested.
    #[error("ending index {index} out of range for {stat}")]
    BandOutOfRange {
        /// Stat whose endings were read.
        stat: Stat,
        /// Requested index.
        index: usize,
    },

    /// No endings were authored for a stat that the session needs.
    #[error("no endings authored for {0}")]
    MissingEnding(Stat),

    /// The overall verdict pair is required but absent.
    #[error("no verdict endings authored")]
    MissingVerdict,

    /// The requested setup does not exist.
    #[error("setup not found: {0}")]
    SetupNotFound(SetupId),
}
