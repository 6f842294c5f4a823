//! Stellar Escape - steer a ship through an asteroid field collecting crystals
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (physics, spawning, collisions, scoring)
//! - `game`: Session state machine and progress bookkeeping
//! - `persistence`: Key/value storage of high score and unlocked levels
//! - `platform`: Browser/native platform abstraction (time, input, storage)
//! - `tuning`: Data-driven game balance
//! - `audio`: Notification to sound cue mapping and Web Audio playback
//! - `renderer`: Shape geometry and the 2D canvas backend (wasm only)

pub mod audio;
pub mod error;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod progress;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use game::{Command, Game};
pub use progress::Progress;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (16 ms nominal)
    pub const TICK_SECS: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 1200.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Ship collision diameter
    pub const SHIP_SIZE: f32 = 40.0;
    /// Crystal collision diameter
    pub const CRYSTAL_SIZE: f32 = 20.0;
    pub const ASTEROID_MIN_SIZE: f32 = 25.0;
    pub const ASTEROID_MAX_SIZE: f32 = 60.0;

    /// Energy needed to raise the shield
    pub const MAX_ENERGY: u32 = 100;
    /// Shield lifetime in ticks (~5 seconds)
    pub const SHIELD_DURATION: u32 = 300;
    /// Particle backpressure cap
    pub const MAX_PARTICLES: usize = 500;

    /// Number of playable levels
    pub const LEVEL_COUNT: u32 = 99;
}

/// Unit vector for a heading in degrees (0° points along +x, angles grow clockwise on screen)
#[inline]
pub fn heading_vector(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Teleport a coordinate that left `[0, bound]` to the opposite edge
#[inline]
pub fn wrap_coordinate(value: f32, bound: f32) -> f32 {
    if value < 0.0 {
        bound
    } else if value > bound {
        0.0
    } else {
        value
    }
}

/// Heading normalized to [0, 360) for display
#[inline]
pub fn normalize_degrees(angle_deg: f32) -> f32 {
    angle_deg.rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_vector_axes() {
        let right = heading_vector(0.0);
        assert!((right.x - 1.0).abs() < 1e-6 && right.y.abs() < 1e-6);

        let down = heading_vector(90.0);
        assert!(down.x.abs() < 1e-6 && (down.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_coordinate_teleports() {
        assert_eq!(wrap_coordinate(-0.5, 100.0), 100.0);
        assert_eq!(wrap_coordinate(100.5, 100.0), 0.0);
        assert_eq!(wrap_coordinate(42.0, 100.0), 42.0);
        assert_eq!(wrap_coordinate(100.0, 100.0), 100.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(-5.0), 355.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
    }
}
