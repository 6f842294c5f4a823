//! Browser `localStorage` backend

use crate::error::{GameError, GameResult};
use crate::persistence::KeyValueStore;

pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    /// Open `window.localStorage`; a missing store fails every call
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not be saved");
        }
        Self { storage }
    }

    fn storage(&self, key: &str) -> GameResult<&web_sys::Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| GameError::persistence(key, "localStorage unavailable"))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> GameResult<Option<String>> {
        self.storage(key)?
            .get_item(key)
            .map_err(|e| GameError::persistence(key, format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> GameResult<()> {
        self.storage(key)?
            .set_item(key, value)
            .map_err(|e| GameError::persistence(key, format!("{:?}", e)))
    }
}
