//! Player preferences
//!
//! Persisted separately from progress, as one JSON blob.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::persistence::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
    /// Pause when the page is hidden or the window loses focus
    pub auto_pause_on_blur: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.3,
            muted: false,
            auto_pause_on_blur: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "stellarEscapeSettings";

    /// Volume actually applied to the audio output
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// Load settings, falling back to defaults when missing or unreadable
    pub fn load<K: KeyValueStore>(store: &K) -> Self {
        match Self::try_load(store) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    fn try_load<K: KeyValueStore>(store: &K) -> GameResult<Option<Self>> {
        let Some(json) = store.get(Self::STORAGE_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|e| GameError::persistence(Self::STORAGE_KEY, e))
    }

    pub fn save<K: KeyValueStore>(&self, store: &mut K) -> GameResult<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| GameError::persistence(Self::STORAGE_KEY, e))?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
