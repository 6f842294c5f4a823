//! Cross-session progress: high score and unlocked levels
//!
//! Read once at startup, written only when a level ends. Storage failures
//! are logged and otherwise ignored; the in-memory copy stays authoritative
//! for the rest of the session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;
use crate::persistence::{KeyValueStore, ProgressStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Always contains level 1
    pub unlocked_levels: BTreeSet<u32>,
    pub high_score: u64,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            unlocked_levels: BTreeSet::from([1]),
            high_score: 0,
        }
    }
}

impl Progress {
    /// Load from storage, falling back to defaults on any failure
    pub fn load<K: KeyValueStore>(store: &ProgressStore<K>) -> Self {
        let high_score = store.load_high_score().unwrap_or_else(|e| {
            log::warn!("Using default high score: {}", e);
            0
        });

        let mut unlocked_levels = store.load_unlocked_levels().unwrap_or_else(|e| {
            log::warn!("Using default unlocked levels: {}", e);
            BTreeSet::new()
        });
        unlocked_levels.retain(|level| (1..=LEVEL_COUNT).contains(level));
        unlocked_levels.insert(1);

        log::info!(
            "Loaded progress: high score {}, {} levels unlocked",
            high_score,
            unlocked_levels.len()
        );
        Self {
            unlocked_levels,
            high_score,
        }
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        self.unlocked_levels.contains(&level)
    }

    /// Highest unlocked level
    pub fn furthest_level(&self) -> u32 {
        self.unlocked_levels.last().copied().unwrap_or(1)
    }

    /// Keep `score` if it beats the high score; returns true on a new best
    pub fn record_score<K: KeyValueStore>(
        &mut self,
        score: u64,
        store: &mut ProgressStore<K>,
    ) -> bool {
        if score <= self.high_score {
            return false;
        }
        self.high_score = score;
        log::info!("New high score: {}", score);
        if let Err(e) = store.save_high_score(score) {
            log::warn!("High score not saved: {}", e);
        }
        true
    }

    /// Unlock a level; returns true if it was newly unlocked
    pub fn unlock<K: KeyValueStore>(&mut self, level: u32, store: &mut ProgressStore<K>) -> bool {
        if !(1..=LEVEL_COUNT).contains(&level) || !self.unlocked_levels.insert(level) {
            return false;
        }
        log::info!("Unlocked level {}", level);
        if let Err(e) = store.save_unlocked_levels(&self.unlocked_levels) {
            log::warn!("Unlocked levels not saved: {}", e);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, UNLOCKED_LEVELS_KEY};

    #[test]
    fn test_load_defaults_on_failure() {
        let store = ProgressStore::new(MemoryStore::failing());
        assert_eq!(Progress::load(&store), Progress::default());
    }

    #[test]
    fn test_load_repairs_missing_first_level() {
        let mut backend = MemoryStore::default();
        backend.set(UNLOCKED_LEVELS_KEY, "[4, 5, 250]").unwrap();
        let progress = Progress::load(&ProgressStore::new(backend));
        assert_eq!(progress.unlocked_levels, BTreeSet::from([1, 4, 5]));
        assert_eq!(progress.furthest_level(), 5);
    }

    #[test]
    fn test_record_score_only_when_beaten() {
        let mut store = ProgressStore::new(MemoryStore::default());
        let mut progress = Progress {
            high_score: 20,
            ..Default::default()
        };
        assert!(!progress.record_score(20, &mut store));
        assert_eq!(store.load_high_score().unwrap(), 0);
        assert!(progress.record_score(30, &mut store));
        assert_eq!(progress.high_score, 30);
        assert_eq!(store.load_high_score().unwrap(), 30);
    }

    #[test]
    fn test_unlock_is_idempotent_and_bounded() {
        let mut store = ProgressStore::new(MemoryStore::default());
        let mut progress = Progress::default();
        assert!(progress.unlock(2, &mut store));
        assert!(!progress.unlock(2, &mut store));
        assert!(!progress.unlock(100, &mut store));
        assert_eq!(
            store.load_unlocked_levels().unwrap(),
            BTreeSet::from([1, 2])
        );
    }

    #[test]
    fn test_save_failure_keeps_memory_copy() {
        let mut store = ProgressStore::new(MemoryStore::failing());
        let mut progress = Progress::default();
        assert!(progress.record_score(10, &mut store));
        assert!(progress.unlock(2, &mut store));
        assert_eq!(progress.high_score, 10);
        assert!(progress.is_unlocked(2));
    }
}
