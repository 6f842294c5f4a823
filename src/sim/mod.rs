//! Fixed-timestep simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Fixed timestep only (one call to `tick` = one 16 ms step)
//! - Seeded RNG only
//! - Stable iteration order (creation order)
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod levels;
pub mod physics;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::circles_overlap;
pub use levels::{Difficulty, LEVELS_PER_PAGE, LevelConfig, level_config, levels_on_page};
pub use state::{
    Asteroid, Crystal, EntityStore, Mode, Particle, ParticleColor, SessionState, Ship,
    SimulationState,
};
pub use tick::{KeyState, Notification, TickResult, Transition, tick};
