//! Ending texts: one `[bad, neutral, good]` triple per stat, the rare
//! alternate ending, and the optional overall verdict pair.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};
use crate::stat::{Band, Stat};

/// A piece of ending text together with its background art key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingText {
    /// Text shown on the ending screen.
    pub text: String,
    /// Background art key.
    pub background: String,
}

impl EndingText {
    /// Create an ending text.
    pub fn new(text: impl Into<String>, background: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            background: background.into(),
        }
    }
}

/// Background key for a stat's ending in a band, e.g. `efficiency_good`.
pub fn background_key(stat: Stat, band: Band) -> String {
    format!("{}_{}", stat.key(), band.key())
}

/// Background key for the overall verdict, e.g. `verdict_bad`.
pub fn verdict_background_key(good: bool) -> String {
    format!("verdict_{}", if good { "good" } else { "bad" })
}

/// All ending texts of a scenario set.
#[derive(Debug, Clone, PartialEq)]
pub struct EndingTextSet {
    per_stat: BTreeMap<Stat, Vec<String>>,
    rare: EndingText,
    verdict: Option<[String; 2]>,
}

impl EndingTextSet {
    /// Build an ending set. Each stat's texts must be exactly
    /// `[bad, neutral, good]`.
    pub fn new(
        per_stat: impl IntoIterator<Item = (Stat, Vec<String>)>,
        rare: EndingText,
    ) -> ContentResult<Self> {
        let mut map = BTreeMap::new();
        for (stat, texts) in per_stat {
            if texts.len() != 3 {
                return Err(ContentError::EndingBand {
                    stat,
                    found: texts.len(),
                });
            }
            map.insert(stat, texts);
        }
        Ok(Self {
            per_stat: map,
            rare,
            verdict: None,
        })
    }

    /// Attach the overall verdict pair.
    pub fn with_verdict(mut self, bad: impl Into<String>, good: impl Into<String>) -> Self {
        self.verdict = Some([bad.into(), good.into()]);
        self
    }

    /// Whether endings exist for `stat`.
    pub fn has(&self, stat: Stat) -> bool {
        self.per_stat.contains_key(&stat)
    }

    /// Check that endings exist for every stat in `stats`.
    pub fn require(&self, stats: &[Stat]) -> ContentResult<()> {
        match stats.iter().find(|s| !self.has(**s)) {
            Some(missing) => Err(ContentError::MissingEnding(*missing)),
            None => Ok(()),
        }
    }

    /// Text at a raw `[bad, neutral, good]` index.
    ///
    /// Out-of-range indices are an error rather than a default.
    pub fn text(&self, stat: Stat, index: usize) -> ContentResult<&str> {
        let texts = self
            .per_stat
            .get(&stat)
            .ok_or(ContentError::MissingEnding(stat))?;
        texts
            .get(index)
            .map(String::as_str)
            .ok_or(ContentError::BandOutOfRange { stat, index })
    }

    /// Text for a stat in a band.
    pub fn band_text(&self, stat: Stat, band: Band) -> ContentResult<&str> {
        self.text(stat, band.index())
    }

    /// The rare alternate ending.
    pub fn rare(&self) -> &EndingText {
        &self.rare
    }

    /// Whether the overall verdict pair was authored.
    pub fn has_verdict(&self) -> bool {
        self.verdict.is_some()
    }

    /// The overall verdict text.
    pub fn verdict(&self, good: bool) -> ContentResult<&str> {
        let pair = self.verdict.as_ref().ok_or(ContentError::MissingVerdict)?;
        Ok(if good { &pair[1] } else { &pair[0] })
    }

    /// Stats that have authored endings.
    pub fn stats(&self) -> impl Iterator<Item = Stat> + '_ {
        self.per_stat.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(prefix: &str) -> Vec<String> {
        ["bad", "neutral", "good"]
            .iter()
            .map(|b| format!("{prefix} {b}"))
            .collect()
    }

    fn endings() -> EndingTextSet {
        EndingTextSet::new(
            [
                (Stat::Efficiency, triple("eff")),
                (Stat::Approval, triple("app")),
            ],
            EndingText::new("A giant lizard ate the office.", "rare"),
        )
        .unwrap()
    }

    #[test]
    fn band_lookup() {
        let e = endings();
        assert_eq!(e.band_text(Stat::Efficiency, Band::Good).unwrap(), "eff good");
        assert_eq!(e.band_text(Stat::Approval, Band::Bad).unwrap(), "app bad");
    }

    #[test]
    fn wrong_band_count_rejected() {
        let result = EndingTextSet::new(
            [(Stat::Finance, vec!["only".to_string(), "two".to_string()])],
            EndingText::new("r", "r"),
        );
        assert!(matches!(
            result,
            Err(ContentError::EndingBand {
                stat: Stat::Finance,
                found: 2
            })
        ));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let e = endings();
        assert!(matches!(
            e.text(Stat::Efficiency, 3),
            Err(ContentError::BandOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn missing_stat_is_an_error() {
        let e = endings();
        assert!(matches!(
            e.text(Stat::Finance, 0),
            Err(ContentError::MissingEnding(Stat::Finance))
        ));
        assert!(e.require(&[Stat::Efficiency, Stat::Approval]).is_ok());
        assert!(e.require(&Stat::TRACKED).is_err());
    }

    #[test]
    fn verdict_pair() {
        let e = endings();
        assert!(!e.has_verdict());
        assert!(matches!(e.verdict(true), Err(ContentError::MissingVerdict)));

        let e = e.with_verdict("fired", "promoted");
        assert_eq!(e.verdict(false).unwrap(), "fired");
        assert_eq!(e.verdict(true).unwrap(), "promoted");
    }

    #[test]
    fn background_keys() {
        assert_eq!(background_key(Stat::Finance, Band::Neutral), "finance_neutral");
        assert_eq!(verdict_background_key(true), "verdict_good");
    }
}
