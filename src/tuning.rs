//! Data-driven game balance
//!
//! `Tuning::default()` is the authoritative balance. A JSON document can
//! override any subset of fields; missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_ENERGY, MAX_PARTICLES, SHIELD_DURATION};
use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Velocity added per tick of forward thrust
    pub thrust_power: f32,
    /// Reverse thrust as a fraction of forward thrust
    pub reverse_thrust_factor: f32,
    /// Velocity multiplier applied every tick
    pub friction: f32,
    /// Degrees turned per tick while a rotate key is held
    pub rotation_speed_deg: f32,
    /// Per-tick probability that a crystal appears
    pub crystal_spawn_chance: f64,
    pub points_per_crystal: u64,
    pub energy_per_crystal: u32,
    pub shield_duration_ticks: u32,
    pub max_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            thrust_power: 0.3,
            reverse_thrust_factor: 0.7,
            friction: 0.98,
            rotation_speed_deg: 5.0,
            crystal_spawn_chance: 0.04,
            points_per_crystal: 5,
            energy_per_crystal: 15,
            shield_duration_ticks: SHIELD_DURATION,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON and validate the result
    pub fn from_json(json: &str) -> GameResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)
            .map_err(|e| GameError::persistence("tuning", e))?;
        tuning.validate()?;
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> GameResult<()> {
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(GameError::InvalidTuning {
                name: "friction",
                value: self.friction,
                expected: "[0.0, 1.0]",
            });
        }
        if !(0.0..=1.0).contains(&self.crystal_spawn_chance) {
            return Err(GameError::InvalidTuning {
                name: "crystal_spawn_chance",
                value: self.crystal_spawn_chance as f32,
                expected: "[0.0, 1.0]",
            });
        }
        if self.thrust_power < 0.0 {
            return Err(GameError::InvalidTuning {
                name: "thrust_power",
                value: self.thrust_power,
                expected: "[0.0, inf)",
            });
        }
        if self.energy_per_crystal > MAX_ENERGY {
            return Err(GameError::InvalidTuning {
                name: "energy_per_crystal",
                value: self.energy_per_crystal as f32,
                expected: "[0, 100]",
            });
        }
        if self.shield_duration_ticks == 0 {
            return Err(GameError::InvalidTuning {
                name: "shield_duration_ticks",
                value: 0.0,
                expected: "[1, inf)",
            });
        }
        Ok(())
    }
}
