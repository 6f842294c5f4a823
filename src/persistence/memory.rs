//! In-memory key/value backend (native builds and tests)

use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    /// Simulate an unavailable backend
    failing: bool,
}

impl MemoryStore {
    /// A backend whose every read and write fails
    pub fn failing() -> Self {
        Self {
            values: HashMap::new(),
            failing: true,
        }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        if self.failing {
            return Err(GameError::persistence(key, "storage unavailable"));
        }
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        if self.failing {
            return Err(GameError::persistence(key, "storage unavailable"));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
