//! Save/load of cross-session progress
//!
//! Only two values survive a restart: the high score and the set of
//! unlocked levels. Both are stored as strings in a key/value backend
//! (`localStorage` in the browser, a map in tests and on native):
//! - high score as a decimal integer
//! - unlocked levels as a sorted JSON array

pub mod memory;

pub use memory::MemoryStore;

use std::collections::BTreeSet;

use crate::error::{GameError, GameResult};

pub const HIGH_SCORE_KEY: &str = "stellarEscapeHighScore";
pub const UNLOCKED_LEVELS_KEY: &str = "stellarEscapeUnlockedLevels";

/// String key/value backend
pub trait KeyValueStore {
    fn get(&self, key: &str) -> GameResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> GameResult<()>;
}

pub fn encode_high_score(score: u64) -> String {
    score.to_string()
}

pub fn decode_high_score(raw: &str) -> GameResult<u64> {
    raw.trim()
        .parse()
        .map_err(|e| GameError::persistence(HIGH_SCORE_KEY, e))
}

pub fn encode_unlocked_levels(levels: &BTreeSet<u32>) -> GameResult<String> {
    serde_json::to_string(levels).map_err(|e| GameError::persistence(UNLOCKED_LEVELS_KEY, e))
}

pub fn decode_unlocked_levels(raw: &str) -> GameResult<BTreeSet<u32>> {
    serde_json::from_str(raw).map_err(|e| GameError::persistence(UNLOCKED_LEVELS_KEY, e))
}

/// The four persistence operations the session needs, over any backend
#[derive(Debug, Clone, Default)]
pub struct ProgressStore<K> {
    backend: K,
}

impl<K: KeyValueStore> ProgressStore<K> {
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut K {
        &mut self.backend
    }

    /// Stored high score, 0 if never saved
    pub fn load_high_score(&self) -> GameResult<u64> {
        match self.backend.get(HIGH_SCORE_KEY)? {
            Some(raw) => decode_high_score(&raw),
            None => Ok(0),
        }
    }

    pub fn save_high_score(&mut self, score: u64) -> GameResult<()> {
        self.backend.set(HIGH_SCORE_KEY, &encode_high_score(score))
    }

    /// Stored unlocked levels, `{1}` if never saved
    pub fn load_unlocked_levels(&self) -> GameResult<BTreeSet<u32>> {
        match self.backend.get(UNLOCKED_LEVELS_KEY)? {
            Some(raw) => decode_unlocked_levels(&raw),
            None => Ok(BTreeSet::from([1])),
        }
    }

    pub fn save_unlocked_levels(&mut self, levels: &BTreeSet<u32>) -> GameResult<()> {
        let json = encode_unlocked_levels(levels)?;
        self.backend.set(UNLOCKED_LEVELS_KEY, &json)
    }
}
