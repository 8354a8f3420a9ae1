//! Backing stores for crowd counters.
//!
//! A store mirrors the three remote endpoints: fetch every counter, push a
//! single increment, and delete one counter for maintenance.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{LeaderboardError, LeaderboardResult};
use crate::leaderboard::AnswerKey;

/// Raw counters as the store holds them, keyed by answer key text.
pub type CounterMap = BTreeMap<String, u64>;

/// A place where crowd counters persist between sessions.
pub trait CounterStore: Send + Sync + fmt::Debug {
    /// Every counter the store knows.
    fn fetch_all(&self) -> LeaderboardResult<CounterMap>;

    /// Add one to a counter.
    fn push(&self, key: &AnswerKey) -> LeaderboardResult<()>;

    /// Remove a counter entirely.
    fn delete(&self, key: &AnswerKey) -> LeaderboardResult<()>;
}

fn lock<T>(mutex: &Mutex<T>) -> LeaderboardResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| LeaderboardError::Unavailable("store lock poisoned".to_string()))
}

/// Counters held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counts: Mutex<CounterMap>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded with existing counters.
    pub fn with_counts(counts: CounterMap) -> Self {
        Self {
            counts: Mutex::new(counts),
        }
    }
}

impl CounterStore for MemoryStore {
    fn fetch_all(&self) -> LeaderboardResult<CounterMap> {
        Ok(lock(&self.counts)?.clone())
    }

    fn push(&self, key: &AnswerKey) -> LeaderboardResult<()> {
        *lock(&self.counts)?.entry(key.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn delete(&self, key: &AnswerKey) -> LeaderboardResult<()> {
        lock(&self.counts)?.remove(&key.to_string());
        Ok(())
    }
}

/// Counters kept in a JSON file of `{"Answer7B": 3, ...}`.
///
/// A missing file reads as no counters. Writes rewrite the whole file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileStore {
    /// A store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> LeaderboardResult<CounterMap> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(CounterMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CounterMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, counts: &CounterMap) -> LeaderboardResult<()> {
        let json = serde_json::to_string_pretty(counts)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl CounterStore for JsonFileStore {
    fn fetch_all(&self) -> LeaderboardResult<CounterMap> {
        let _held = lock(&self.guard)?;
        self.read()
    }

    fn push(&self, key: &AnswerKey) -> LeaderboardResult<()> {
        let _held = lock(&self.guard)?;
        let mut counts = self.read()?;
        *counts.entry(key.to_string()).or_insert(0) += 1;
        self.write(&counts)
    }

    fn delete(&self, key: &AnswerKey) -> LeaderboardResult<()> {
        let _held = lock(&self.guard)?;
        let mut counts = self.read()?;
        if counts.remove(&key.to_string()).is_some() {
            self.write(&counts)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use br_core::SetupId;
    use tempfile::TempDir;

    fn key(setup: u32, option: usize) -> AnswerKey {
        AnswerKey::new(SetupId(setup), option)
    }

    #[test]
    fn memory_store_counts() {
        let store = MemoryStore::new();
        store.push(&key(1, 0)).unwrap();
        store.push(&key(1, 0)).unwrap();
        store.push(&key(1, 1)).unwrap();
        let all = store.fetch_all().unwrap();
        assert_eq!(all["Answer1A"], 2);
        assert_eq!(all["Answer1B"], 1);

        store.delete(&key(1, 0)).unwrap();
        assert!(!store.fetch_all().unwrap().contains_key("Answer1A"));
    }

    #[test]
    fn file_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counts.json");

        let store = JsonFileStore::new(&path);
        assert!(store.fetch_all().unwrap().is_empty());
        store.push(&key(7, 1)).unwrap();
        store.push(&key(7, 1)).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.fetch_all().unwrap()["Answer7B"], 2);

        reopened.delete(&key(7, 1)).unwrap();
        assert!(store.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("counts.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.fetch_all(),
            Err(LeaderboardError::Malformed(_))
        ));
    }
}
