//! Setups (decision points) and their choices.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};
use crate::stat::StatDelta;

/// Most choices a single setup may offer.
pub const MAX_OPTIONS: usize = 6;

/// Identifier of a setup, stable across sessions and used in answer keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SetupId(pub u32);

impl fmt::Display for SetupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Letter shown for the option at `index` (`0 -> 'A'`).
pub fn option_letter(index: usize) -> Option<char> {
    if index < MAX_OPTIONS {
        char::from_u32('A' as u32 + index as u32)
    } else {
        None
    }
}

/// Option index for a letter (`'b' -> 1`).
pub fn option_index(letter: char) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        let index = (upper as u8 - b'A') as usize;
        (index < MAX_OPTIONS).then_some(index)
    } else {
        None
    }
}

/// One option offered by a setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Text on the option button.
    pub label: String,
    /// How picking this option moves the tracked stats.
    pub delta: StatDelta,
    /// Text shown after the option is picked.
    pub result_text: String,
}

impl Choice {
    /// Create a choice with no stat effect.
    pub fn new(label: impl Into<String>, result_text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            delta: StatDelta::default(),
            result_text: result_text.into(),
        }
    }

    /// Set the stat delta.
    pub fn with_delta(mut self, delta: StatDelta) -> Self {
        self.delta = delta;
        self
    }
}

/// A single decision point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    /// Unique id within the scenario set.
    pub id: SetupId,
    /// Short display title.
    pub name: String,
    /// The question put to the player.
    pub prompt: String,
    /// Icon / background art reference.
    pub icon: String,
    /// Music track reference.
    pub music: String,
    /// Character presenting the setup.
    pub character_id: String,
    /// Presentation hint: use the large option buttons.
    pub large_buttons: bool,
    /// Available choices, in display order.
    pub options: Vec<Choice>,
}

impl Setup {
    /// Create a setup with the given id and prompt and no choices.
    pub fn new(id: u32, prompt: impl Into<String>) -> Self {
        Self {
            id: SetupId(id),
            name: String::new(),
            prompt: prompt.into(),
            icon: String::new(),
            music: String::new(),
            character_id: String::new(),
            large_buttons: false,
            options: Vec::new(),
        }
    }

    /// Set the display title.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the presenting character.
    pub fn with_character(mut self, character_id: impl Into<String>) -> Self {
        self.character_id = character_id.into();
        self
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: Choice) -> Self {
        self.options.push(choice);
        self
    }

    /// The choice at `index`, if any.
    pub fn option(&self, index: usize) -> Option<&Choice> {
        self.options.get(index)
    }

    fn validate(&self) -> ContentResult<()> {
        if self.options.is_empty() {
            return Err(ContentError::NoOptions { setup: self.id });
        }
        if self.options.len() > MAX_OPTIONS {
            return Err(ContentError::TooManyOptions {
                setup: self.id,
                count: self.options.len(),
                max: MAX_OPTIONS,
            });
        }
        Ok(())
    }
}

/// An ordered, non-empty, immutable collection of setups.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSet {
    setups: Vec<Setup>,
}

impl ScenarioSet {
    /// Build a scenario set, checking that it is non-empty, that every setup
    /// offers 1 to [`MAX_OPTIONS`] choices, and that ids are unique.
    pub fn new(setups: Vec<Setup>) -> ContentResult<Self> {
        if setups.is_empty() {
            return Err(ContentError::Empty);
        }
        let mut seen = HashSet::new();
        for setup in &setups {
            setup.validate()?;
            if !seen.insert(setup.id) {
                return Err(ContentError::DuplicateSetup(setup.id));
            }
        }
        Ok(Self { setups })
    }

    /// Look up a setup by id.
    pub fn get(&self, id: SetupId) -> Option<&Setup> {
        self.setups.iter().find(|s| s.id == id)
    }

    /// All setup ids in authored order.
    pub fn ids(&self) -> Vec<SetupId> {
        self.setups.iter().map(|s| s.id).collect()
    }

    /// Iterate setups in authored order.
    pub fn iter(&self) -> impl Iterator<Item = &Setup> {
        self.setups.iter()
    }

    /// Number of setups.
    pub fn len(&self) -> usize {
        self.setups.len()
    }

    /// Always false for a constructed set; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.setups.is_empty()
    }
}
