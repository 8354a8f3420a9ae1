//! Answer keys of the form `Answer{setup}{letter}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use br_core::SetupId;
use br_core::setup::{option_index, option_letter};

use crate::error::LeaderboardError;

const PREFIX: &str = "Answer";

/// Identifies one option of one setup in the crowd counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnswerKey {
    /// The setup answered.
    pub setup: SetupId,
    /// Index of the chosen option.
    pub option: usize,
}

impl AnswerKey {
    /// Key for `option` of `setup`.
    pub fn new(setup: SetupId, option: usize) -> Self {
        Self { setup, option }
    }

    /// Letter of the chosen option (`'?'` past the last letter).
    pub fn letter(&self) -> char {
        option_letter(self.option).unwrap_or('?')
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}{}", self.setup, self.letter())
    }
}

impl FromStr for AnswerKey {
    type Err = LeaderboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LeaderboardError::InvalidKey(s.to_string());
        let body = s.strip_prefix(PREFIX).ok_or_else(invalid)?;
        let letter = body.chars().last().ok_or_else(invalid)?;
        let digits = &body[..body.len() - letter.len_utf8()];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let setup = digits.parse::<u32>().map_err(|_| invalid())?;
        let option = option_index(letter).ok_or_else(invalid)?;
        Ok(Self::new(SetupId(setup), option))
    }
}
