//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time/ticks
//! - Input events
//! - Storage (LocalStorage on web)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod storage;
pub mod time;

pub use input::{InputState, KeyAction};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use time::FixedStep;
