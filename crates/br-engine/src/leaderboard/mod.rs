//! Crowd statistics: how many players chose each answer.
//!
//! Counters live in a [`DashMap`] so sessions on different threads can
//! record answers and read percentages at the same time. Reads are
//! eventually consistent with concurrent increments. Failures of the
//! backing store never reach gameplay; they are logged and the leaderboard
//! carries on with the counts it already has.

pub mod key;
pub mod store;

pub use key::AnswerKey;
pub use store::{CounterMap, CounterStore, JsonFileStore, MemoryStore};

use dashmap::DashMap;
use tracing::{debug, warn};

use br_core::SetupId;

use crate::error::LeaderboardResult;

/// Shared per-answer counters.
#[derive(Debug, Default)]
pub struct Leaderboard {
    counters: DashMap<AnswerKey, u64>,
    store: Option<Box<dyn CounterStore>>,
}

impl Leaderboard {
    /// A leaderboard that only counts in memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// A leaderboard mirrored to `store`.
    pub fn with_store(store: impl CounterStore + 'static) -> Self {
        Self {
            counters: DashMap::new(),
            store: Some(Box::new(store)),
        }
    }

    /// Replace local counts with the store's.
    ///
    /// Returns how many counters were loaded. On failure the local counts are
    /// kept as they are and zero is returned. Keys that are not answer keys
    /// are skipped.
    pub fn refresh(&self) -> usize {
        self.try_refresh().unwrap_or_else(|e| {
            warn!(error = %e, "leaderboard fetch failed");
            0
        })
    }

    /// Like [`refresh`](Self::refresh), but reports store failures.
    pub fn try_refresh(&self) -> LeaderboardResult<usize> {
        let Some(store) = &self.store else {
            return Ok(0);
        };
        let fetched = store.fetch_all()?;
        self.counters.clear();
        for (raw, count) in fetched {
            match raw.parse::<AnswerKey>() {
                Ok(key) => {
                    self.counters.insert(key, count);
                }
                Err(e) => debug!(error = %e, "skipping counter"),
            }
        }
        debug!(counters = self.counters.len(), "leaderboard refreshed");
        Ok(self.counters.len())
    }

    /// Record one more player choosing `key`. Returns the new local count.
    pub fn increment(&self, key: &AnswerKey) -> u64 {
        let count = {
            let mut entry = self.counters.entry(*key).or_insert(0);
            *entry += 1;
            *entry
        };
        if let Some(Err(e)) = self.store.as_ref().map(|store| store.push(key)) {
            warn!(%key, error = %e, "leaderboard push failed");
        }
        count
    }

    /// Players known to have chosen `key`.
    pub fn count(&self, key: &AnswerKey) -> u64 {
        self.counters.get(key).map(|c| *c).unwrap_or(0)
    }

    /// Players known to have answered `setup` at all.
    pub fn participants(&self, setup: SetupId) -> u64 {
        self.counters
            .iter()
            .filter(|entry| entry.key().setup == setup)
            .map(|entry| *entry.value())
            .sum()
    }

    /// Rounded percentage of `setup`'s players who chose `key`.
    ///
    /// Zero when nobody is known to have answered `setup`, or when `key`
    /// answers a different setup.
    pub fn percent_chosen(&self, setup: SetupId, key: &AnswerKey) -> u32 {
        if key.setup != setup {
            return 0;
        }
        let participants = self.participants(setup);
        if participants == 0 {
            return 0;
        }
        let chosen = self.count(key) as f64;
        (100.0 * chosen / participants as f64).round() as u32
    }

    /// Every known counter, sorted by key.
    pub fn snapshot(&self) -> Vec<(AnswerKey, u64)> {
        let mut all: Vec<_> = self
            .counters
            .iter()
            .map(|entry| (*entry.key(), *entry.value()))
            .collect();
        all.sort();
        all
    }

    /// Delete a counter from the store and locally.
    ///
    /// Unlike gameplay operations this surfaces store failures, since it is
    /// only used for maintenance.
    pub fn reset(&self, key: &AnswerKey) -> LeaderboardResult<()> {
        if let Some(store) = &self.store {
            store.delete(key)?;
        }
        self.counters.remove(key);
        debug!(%key, "counter reset");
        Ok(())
    }
}

/// The stamp shown after an answer.
pub fn crowd_message(percent: u32) -> String {
    if percent >= 100 {
        "You're the first to choose this answer!".to_string()
    } else {
        format!("{percent}% of people chose this answer!")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LeaderboardError, LeaderboardResult};
    use std::thread;

    fn key(setup: u32, option: usize) -> AnswerKey {
        AnswerKey::new(SetupId(setup), option)
    }

    #[derive(Debug)]
    struct DownStore;

    impl CounterStore for DownStore {
        fn fetch_all(&self) -> LeaderboardResult<CounterMap> {
            Err(LeaderboardError::Unavailable("offline".to_string()))
        }

        fn push(&self, _key: &AnswerKey) -> LeaderboardResult<()> {
            Err(LeaderboardError::Unavailable("offline".to_string()))
        }

        fn delete(&self, _key: &AnswerKey) -> LeaderboardResult<()> {
            Err(LeaderboardError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn zero_participants_is_zero_percent() {
        let board = Leaderboard::new();
        assert_eq!(board.percent_chosen(SetupId(3), &key(3, 0)), 0);
    }

    #[test]
    fn percent_rounds() {
        let board = Leaderboard::new();
        board.increment(&key(1, 0));
        board.increment(&key(1, 1));
        board.increment(&key(1, 1));
        assert_eq!(board.percent_chosen(SetupId(1), &key(1, 0)), 33);
        assert_eq!(board.percent_chosen(SetupId(1), &key(1, 1)), 67);
        assert_eq!(board.percent_chosen(SetupId(1), &key(1, 2)), 0);
    }

    #[test]
    fn setup_ids_match_exactly() {
        let board = Leaderboard::new();
        board.increment(&key(1, 0));
        board.increment(&key(10, 0));
        board.increment(&key(11, 0));
        assert_eq!(board.participants(SetupId(1)), 1);
        assert_eq!(board.percent_chosen(SetupId(1), &key(1, 0)), 100);
    }

    #[test]
    fn foreign_key_is_zero_percent() {
        let board = Leaderboard::new();
        for _ in 0..5 {
            board.increment(&key(2, 0));
        }
        board.increment(&key(1, 0));
        assert_eq!(board.percent_chosen(SetupId(1), &key(2, 0)), 0);
        assert_eq!(board.percent_chosen(SetupId(2), &key(2, 0)), 100);
    }

    #[test]
    fn refresh_loads_store() {
        let mut counts = CounterMap::new();
        counts.insert("Answer2A".to_string(), 3);
        counts.insert("Answer2B".to_string(), 1);
        counts.insert("HighScore".to_string(), 9000);
        let board = Leaderboard::with_store(MemoryStore::with_counts(counts));

        assert_eq!(board.refresh(), 2);
        assert_eq!(board.count(&key(2, 0)), 3);
        assert_eq!(board.percent_chosen(SetupId(2), &key(2, 0)), 75);
    }

    #[test]
    fn increments_reach_store() {
        let board = Leaderboard::with_store(MemoryStore::new());
        board.increment(&key(4, 2));
        board.increment(&key(4, 2));
        board.counters.clear();
        board.refresh();
        assert_eq!(board.count(&key(4, 2)), 2);
    }

    #[test]
    fn failing_store_degrades() {
        let board = Leaderboard::with_store(DownStore);
        assert_eq!(board.refresh(), 0);
        assert!(board.try_refresh().is_err());
        assert_eq!(board.percent_chosen(SetupId(1), &key(1, 0)), 0);
        assert_eq!(board.increment(&key(1, 0)), 1);
        assert_eq!(board.percent_chosen(SetupId(1), &key(1, 0)), 100);
    }

    #[test]
    fn reset_removes_counter() {
        let board = Leaderboard::with_store(MemoryStore::new());
        board.increment(&key(5, 0));
        board.increment(&key(5, 1));
        board.reset(&key(5, 0)).unwrap();
        assert_eq!(board.count(&key(5, 0)), 0);
        board.refresh();
        assert_eq!(board.snapshot(), vec![(key(5, 1), 1)]);
    }

    #[test]
    fn reset_surfaces_store_failure() {
        let board = Leaderboard::with_store(DownStore);
        board.increment(&key(5, 0));
        assert!(board.reset(&key(5, 0)).is_err());
        assert_eq!(board.count(&key(5, 0)), 1);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let board = Leaderboard::new();
        thread::scope(|s| {
            for t in 0..8 {
                let board = &board;
                s.spawn(move || {
                    for i in 0..1000 {
                        board.increment(&key(1, (t + i) % 2));
                        let _ = board.percent_chosen(SetupId(1), &key(1, 0));
                    }
                });
            }
        });
        assert_eq!(board.participants(SetupId(1)), 8000);
        assert_eq!(board.count(&key(1, 0)), 4000);
    }

    #[test]
    fn crowd_messages() {
        assert_eq!(crowd_message(100), "You're the first to choose this answer!");
        assert_eq!(crowd_message(42), "42% of people chose this answer!");
        assert_eq!(crowd_message(0), "0% of people chose this answer!");
    }
}
