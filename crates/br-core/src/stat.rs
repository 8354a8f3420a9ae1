//! Player stats, stat deltas, and ending bands.
//!
//! A session tracks four stats. Three of them ([`Stat::TRACKED`]) are moved
//! directly by choices; the fourth, [`Stat::Aggregate`], is normally derived from the
//! other three. Every stat lives in `[STAT_MIN, STAT_MAX]`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest value any stat can hold.
pub const STAT_MIN: f64 = 0.0;

/// Highest value any stat can hold.
pub const STAT_MAX: f64 = 100.0;

/// One of the four player stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    /// Summary stat derived from the tracked stats.
    Aggregate,
    /// How smoothly the operation runs.
    Efficiency,
    /// Public opinion.
    Approval,
    /// Budget (or environment, depending on the scenario set).
    Finance,
}

impl Stat {
    /// All stats in declaration order.
    pub const ALL: [Stat; 4] = [Stat::Aggregate, Stat::Efficiency, Stat::Approval, Stat::Finance];

    /// The stats moved directly by choices, in declaration order.
    pub const TRACKED: [Stat; 3] = [Stat::Efficiency, Stat::Approval, Stat::Finance];

    /// Whether choices move this stat directly.
    pub fn is_tracked(self) -> bool {
        !matches!(self, Stat::Aggregate)
    }

    /// Lowercase key used in background names and config files.
    pub fn key(self) -> &'static str {
        match self {
            Stat::Aggregate => "aggregate",
            Stat::Efficiency => "efficiency",
            Stat::Approval => "approval",
            Stat::Finance => "finance",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Aggregate => write!(f, "Aggregate"),
            Stat::Efficiency => write!(f, "Efficiency"),
            Stat::Approval => write!(f, "Approval"),
            Stat::Finance => write!(f, "Finance"),
        }
    }
}

/// A value for each of the four stats.
///
/// Used both for absolute stat values and for per-stat differences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatVector {
    /// Derived summary stat.
    pub aggregate: f64,
    /// Efficiency stat.
    pub efficiency: f64,
    /// Approval stat.
    pub approval: f64,
    /// Finance stat.
    pub finance: f64,
}

impl StatVector {
    /// Build a vector from its four components.
    pub fn new(aggregate: f64, efficiency: f64, approval: f64, finance: f64) -> Self {
        Self {
            aggregate,
            efficiency,
            approval,
            finance,
        }
    }

    /// A vector with every component set to `value`.
    pub fn splat(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Read one component.
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Aggregate => self.aggregate,
            Stat::Efficiency => self.efficiency,
            Stat::Approval => self.approval,
            Stat::Finance => self.finance,
        }
    }

    /// Overwrite one component.
    pub fn set(&mut self, stat: Stat, value: f64) {
        match stat {
            Stat::Aggregate => self.aggregate = value,
            Stat::Efficiency => self.efficiency = value,
            Stat::Approval => self.approval = value,
            Stat::Finance => self.finance = value,
        }
    }

    /// Mean of the three tracked components.
    pub fn tracked_mean(&self) -> f64 {
        (self.efficiency + self.approval + self.finance) / 3.0
    }

    /// Component-wise `self - earlier`.
    pub fn since(&self, earlier: &StatVector) -> StatVector {
        StatVector::new(
            self.aggregate - earlier.aggregate,
            self.efficiency - earlier.efficiency,
            self.approval - earlier.approval,
            self.finance - earlier.finance,
        )
    }

    /// Whether every component lies in `[STAT_MIN, STAT_MAX]`.
    pub fn in_bounds(&self) -> bool {
        Stat::ALL
            .iter()
            .all(|&s| (STAT_MIN..=STAT_MAX).contains(&self.get(s)))
    }
}

impl Default for StatVector {
    fn default() -> Self {
        Self::splat(50.0)
    }
}

impl fmt::Display for StatVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Efficiency {:.0} | Approval {:.0} | Finance {:.0} | Overall {:.1}",
            self.efficiency, self.approval, self.finance, self.aggregate
        )
    }
}

/// Authored stat change carried by a choice. Unclamped.
///
/// `aggregate` is only read when the aggregate is tracked on its own rather
/// than derived from the other three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatDelta {
    /// Change to efficiency.
    pub efficiency: f64,
    /// Change to approval.
    pub approval: f64,
    /// Change to finance.
    pub finance: f64,
    /// Direct change to the aggregate stat.
    #[serde(default)]
    pub aggregate: f64,
}

impl StatDelta {
    /// Build a delta from its three tracked components.
    pub fn new(efficiency: f64, approval: f64, finance: f64) -> Self {
        Self {
            efficiency,
            approval,
            finance,
            aggregate: 0.0,
        }
    }

    /// Set the direct aggregate change.
    pub fn with_aggregate(mut self, aggregate: f64) -> Self {
        self.aggregate = aggregate;
        self
    }

    /// The same delta applied to every tracked stat.
    pub fn uniform(amount: f64) -> Self {
        Self::new(amount, amount, amount)
    }

    /// Component for a stat.
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Aggregate => self.aggregate,
            Stat::Efficiency => self.efficiency,
            Stat::Approval => self.approval,
            Stat::Finance => self.finance,
        }
    }

    /// Multiply every component by `factor`.
    pub fn scaled(&self, factor: f64) -> StatDelta {
        StatDelta {
            efficiency: self.efficiency * factor,
            approval: self.approval * factor,
            finance: self.finance * factor,
            aggregate: self.aggregate * factor,
        }
    }
}

/// Ending band for a final stat value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Below the low threshold.
    Bad,
    /// Between the thresholds.
    Neutral,
    /// At or above the high threshold.
    Good,
}

impl Band {
    /// Classify `value` against the `low`/`high` cut points.
    ///
    /// `v < low` is bad, `low <= v < high` is neutral, `v >= high` is good.
    pub fn of(value: f64, low: f64, high: f64) -> Band {
        if value < low {
            Band::Bad
        } else if value < high {
            Band::Neutral
        } else {
            Band::Good
        }
    }

    /// Position of this band in a `[bad, neutral, good]` array.
    pub fn index(self) -> usize {
        match self {
            Band::Bad => 0,
            Band::Neutral => 1,
            Band::Good => 2,
        }
    }

    /// Band at a `[bad, neutral, good]` position.
    pub fn from_index(index: usize) -> Option<Band> {
        match index {
            0 => Some(Band::Bad),
            1 => Some(Band::Neutral),
            2 => Some(Band::Good),
            _ => None,
        }
    }

    /// Lowercase key used in background names.
    pub fn key(self) -> &'static str {
        match self {
            Band::Bad => "bad",
            Band::Neutral => "neutral",
            Band::Good => "good",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::Bad => write!(f, "Bad"),
            Band::Neutral => write!(f, "Neutral"),
            Band::Good => write!(f, "Good"),
        }
    }
}
