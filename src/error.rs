//! Error types shared by the simulation and its collaborators.
//!
//! None of these ever abort a tick. Persistence and audio failures are
//! caught where the core meets the platform, logged, and replaced with
//! defaults; an invalid level index makes the tick a no-op.

use thiserror::Error;

/// Top-level error enum for the game core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// A level number outside `1..=LEVEL_COUNT` was requested.
    #[error("level {level} is out of range (1..={max})")]
    OutOfRange { level: u32, max: u32 },

    /// Loading or saving a persisted value failed.
    #[error("persistence failure for '{key}': {reason}")]
    PersistenceFailure { key: String, reason: String },

    /// The audio backend could not be initialized.
    #[error("audio unavailable: {0}")]
    AudioUnavailable(String),

    /// A tuning value is outside its playable range.
    #[error("tuning '{name}' = {value} is outside {expected}")]
    InvalidTuning {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}

impl GameError {
    pub fn persistence(key: &str, reason: impl ToString) -> Self {
        GameError::PersistenceFailure {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;
