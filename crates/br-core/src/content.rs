//! Loading scenario and ending documents into an immutable [`ContentStore`].
//!
//! The JSON field names follow the game's authoring format exactly
//! (`Setups`, `Decisions`, `ID`, ...). A missing `Setups` or `Decisions`
//! array is a [`ContentError`], never an empty fallback.

use std::path::Path;

use serde::Deserialize;

use crate::ending::{EndingText, EndingTextSet};
use crate::error::{ContentError, ContentResult};
use crate::setup::{Choice, ScenarioSet, Setup, SetupId};
use crate::stat::{Stat, StatDelta};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawScenarios {
    setups: Vec<RawSetup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawSetup {
    #[serde(rename = "ID")]
    id: u32,
    #[serde(default)]
    name: String,
    setup: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    music: String,
    #[serde(default)]
    character_name: String,
    #[serde(default)]
    large_buttons: bool,
    decisions: Vec<RawChoice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawChoice {
    choice: String,
    #[serde(default)]
    efficiency: f64,
    approval: Option<f64>,
    environment: Option<f64>,
    #[serde(default)]
    finance: f64,
    #[serde(default)]
    result: String,
}

impl From<RawChoice> for Choice {
    fn from(raw: RawChoice) -> Self {
        // The game feeds the "Environment" column into the approval stat.
        // When both columns are authored, "Approval" moves the aggregate.
        let delta = match (raw.environment, raw.approval) {
            (Some(environment), approval) => {
                StatDelta::new(raw.efficiency, environment, raw.finance)
                    .with_aggregate(approval.unwrap_or(0.0))
            }
            (None, approval) => {
                StatDelta::new(raw.efficiency, approval.unwrap_or(0.0), raw.finance)
            }
        };
        Choice {
            label: raw.choice,
            delta,
            result_text: raw.result,
        }
    }
}

impl From<RawSetup> for Setup {
    fn from(raw: RawSetup) -> Self {
        Setup {
            id: SetupId(raw.id),
            name: raw.name,
            prompt: raw.setup,
            icon: raw.icon,
            music: raw.music,
            character_id: raw.character_name,
            large_buttons: raw.large_buttons,
            options: raw.decisions.into_iter().map(Choice::from).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawEndings {
    efficiency: Option<Vec<String>>,
    approval: Option<Vec<String>>,
    finance: Option<Vec<String>>,
    #[serde(alias = "Envrionment")]
    environment: Option<Vec<String>>,
    aggregate: Option<Vec<String>>,
    rare: (String, String),
    verdict: Option<(String, String)>,
}

/// Parse a scenario document.
pub fn parse_scenarios(json: &str) -> ContentResult<ScenarioSet> {
    let raw: RawScenarios = serde_json::from_str(json)?;
    ScenarioSet::new(raw.setups.into_iter().map(Setup::from).collect())
}

/// Parse an ending document.
pub fn parse_endings(json: &str) -> ContentResult<EndingTextSet> {
    let raw: RawEndings = serde_json::from_str(json)?;
    let per_stat = [
        (Stat::Efficiency, raw.efficiency),
        (Stat::Approval, raw.approval),
        // Older documents name the third column "Environment"; "Finance" wins
        // when both are present.
        (Stat::Finance, raw.finance.or(raw.environment)),
        (Stat::Aggregate, raw.aggregate),
    ]
    .into_iter()
    .filter_map(|(stat, texts)| texts.map(|t| (stat, t)));

    let (rare_text, rare_background) = raw.rare;
    let set = EndingTextSet::new(per_stat, EndingText::new(rare_text, rare_background))?;
    Ok(match raw.verdict {
        Some((bad, good)) => set.with_verdict(bad, good),
        None => set,
    })
}

/// Scenario and ending content, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ContentStore {
    scenarios: ScenarioSet,
    endings: EndingTextSet,
}

impl ContentStore {
    /// Combine already-built content.
    pub fn new(scenarios: ScenarioSet, endings: EndingTextSet) -> Self {
        Self { scenarios, endings }
    }

    /// Parse both documents from JSON strings.
    pub fn from_json(scenarios: &str, endings: &str) -> ContentResult<Self> {
        Ok(Self::new(parse_scenarios(scenarios)?, parse_endings(endings)?))
    }

    /// Read and parse both documents from disk.
    pub fn load(scenarios: &Path, endings: &Path) -> ContentResult<Self> {
        let scenarios = std::fs::read_to_string(scenarios)?;
        let endings = std::fs::read_to_string(endings)?;
        Self::from_json(&scenarios, &endings)
    }

    /// The scenario set.
    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    /// The ending texts.
    pub fn endings(&self) -> &EndingTextSet {
        &self.endings
    }

    /// Look up a setup by id.
    pub fn setup(&self, id: SetupId) -> ContentResult<&Setup> {
        self.scenarios.get(id).ok_or(ContentError::SetupNotFound(id))
    }
}
