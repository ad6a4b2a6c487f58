//! Leaderboard persistence seams
//!
//! The leaderboard never touches a global. It reads and writes the whole
//! collection through a [`ScoreStore`]; the browser backs that with
//! `localStorage` via [`KeyValueStore`], tests use the in-memory fakes here.

use proto::ScoreEntry;
use std::cell::Cell;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("corrupt leaderboard data: {0}")]
    Corrupt(serde_json::Error),
    #[error("could not encode leaderboard: {0}")]
    Encode(serde_json::Error),
}

/// String key-value primitive (e.g. `localStorage`)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Whole-collection load/save of leaderboard entries (all difficulties)
pub trait ScoreStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError>;
    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), StoreError>;
}

/// Millisecond wall clock for entry timestamps
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Leaderboard stored as one JSON array under a single key
#[derive(Debug, Clone)]
pub struct KvScoreStore<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> KvScoreStore<K> {
    pub fn new(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn kv_mut(&mut self) -> &mut K {
        &mut self.kv
    }
}

impl<K: KeyValueStore> ScoreStore for KvScoreStore<K> {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        match self.kv.get(&self.key)? {
            None => Ok(Vec::new()),
            Some(json) => ScoreEntry::list_from_json(&json).map_err(StoreError::Corrupt),
        }
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        let json = ScoreEntry::list_to_json(entries).map_err(StoreError::Encode)?;
        self.kv.set(&self.key, &json)
    }
}

/// In-memory key-value map
#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    map: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// In-memory score store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub entries: Vec<ScoreEntry>,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        self.entries = entries.to_vec();
        self.saves += 1;
        Ok(())
    }
}

/// Score store that fails on demand
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    pub entries: Vec<ScoreEntry>,
    pub fail_load: bool,
    pub fail_save: bool,
}

impl FailingStore {
    /// Every operation fails
    pub fn unreadable() -> Self {
        Self {
            entries: Vec::new(),
            fail_load: true,
            fail_save: true,
        }
    }

    /// Reads succeed, writes are refused
    pub fn read_only(entries: Vec<ScoreEntry>) -> Self {
        Self {
            entries,
            fail_load: false,
            fail_save: true,
        }
    }
}

impl ScoreStore for FailingStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        if self.fail_load {
            return Err(StoreError::Read("store offline".to_string()));
        }
        Ok(self.entries.clone())
    }

    fn save(&mut self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(StoreError::Write("quota exceeded".to_string()));
        }
        self.entries = entries.to_vec();
        Ok(())
    }
}

/// Clock that reads a settable value, advancing by `step_ms` on each read
#[derive(Debug, Default)]
pub struct FixedClock {
    now: Cell<u64>,
    step_ms: u64,
}

impl FixedClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now: Cell::new(now_ms),
            step_ms: 0,
        }
    }

    pub fn ticking(now_ms: u64, step_ms: u64) -> Self {
        Self {
            now: Cell::new(now_ms),
            step_ms,
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + self.step_ms);
        now
    }
}
