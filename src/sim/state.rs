//! Game state and core simulation types
//!
//! `SimulationState` is the single authoritative copy of everything a tick
//! reads or writes. Renderers and the HUD only ever read it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::Tuning;

/// Coarse game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Title / level select
    #[default]
    Start,
    /// Active gameplay
    Playing,
    /// Ticks suspended
    Paused,
    /// Target score reached
    LevelComplete,
    /// Ship destroyed
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in degrees, unbounded
    pub angle_deg: f32,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            angle_deg: 0.0,
        }
    }
}

/// An asteroid drifting across the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Diameter
    pub size: f32,
    pub rotation_deg: f32,
    /// Degrees per tick
    pub rotation_speed: f32,
}

impl Asteroid {
    /// True once the asteroid has fully left the playfield plus a margin
    pub fn is_out_of_bounds(&self) -> bool {
        let margin = ASTEROID_MAX_SIZE;
        self.pos.x <= -margin
            || self.pos.x >= PLAYFIELD_WIDTH + margin
            || self.pos.y <= -margin
            || self.pos.y >= PLAYFIELD_HEIGHT + margin
    }
}

/// A collectible crystal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    pub id: u32,
    pub pos: Vec2,
    pub rotation_deg: f32,
    /// Accumulator for the pulsing animation
    pub pulse_phase: f32,
}

impl Crystal {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            rotation_deg: 0.0,
            pulse_phase: 0.0,
        }
    }

    /// Render scale derived from the pulse accumulator
    pub fn pulse_scale(&self) -> f32 {
        1.0 + 0.2 * self.pulse_phase.sin()
    }
}

/// Particle tint (renderer picks the actual colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Cyan,
}

impl ParticleColor {
    pub fn css(&self) -> &'static str {
        match self {
            ParticleColor::Cyan => "#00FFFF",
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left before removal
    pub life: u32,
    pub size: f32,
    pub color: Option<ParticleColor>,
}

/// All live entities (each collection in creation order)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub asteroids: Vec<Asteroid>,
    pub crystals: Vec<Crystal>,
    pub particles: Vec<Particle>,
}

impl EntityStore {
    pub fn clear(&mut self) {
        self.asteroids.clear();
        self.crystals.clear();
        self.particles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.asteroids.is_empty() && self.crystals.is_empty() && self.particles.is_empty()
    }
}

/// Per-session score, energy and shield bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    /// Accumulated energy, 0 while the shield is up
    pub energy: u32,
    pub shield_active: bool,
    pub shield_timer: u32,
    pub current_level: u32,
    pub mode: Mode,
    /// Set once the target score has fired for this level
    pub level_complete: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            score: 0,
            energy: 0,
            shield_active: false,
            shield_timer: 0,
            current_level: 1,
            mode: Mode::Start,
            level_complete: false,
        }
    }
}

impl SessionState {
    /// Energy bar value shown to the player (full while shielded)
    pub fn energy_gauge(&self) -> u32 {
        if self.shield_active {
            MAX_ENERGY
        } else {
            self.energy
        }
    }

    /// Raise the shield, draining the accumulator
    pub fn activate_shield(&mut self) {
        self.shield_active = true;
        self.shield_timer = 0;
        self.energy = 0;
    }

    /// Drop the shield (expired or consumed by a hit)
    pub fn drop_shield(&mut self) {
        self.shield_active = false;
        self.shield_timer = 0;
        self.energy = 0;
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub ship: Ship,
    pub entities: EntityStore,
    pub session: SessionState,
    /// Ticks since the last asteroid spawn
    pub spawn_timer: u32,
    /// Counts thrust ticks to throttle the thrust cue
    pub thrust_counter: u32,
    pub tuning: Tuning,
    pub rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl SimulationState {
    /// Create a fresh state on the start screen
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            ship: Ship::default(),
            entities: EntityStore::default(),
            session: SessionState::default(),
            spawn_timer: 0,
            thrust_counter: 0,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Re-zero everything a level (re)start resets, keeping RNG and tuning
    pub fn reset_session(&mut self, level: u32, mode: Mode) {
        self.ship = Ship::default();
        self.entities.clear();
        self.session = SessionState {
            current_level: level,
            mode,
            ..SessionState::default()
        };
        self.spawn_timer = 0;
        self.thrust_counter = 0;
        self.next_id = 0;
    }

    /// Append particles, dropping the oldest beyond the cap
    pub fn push_particles(&mut self, particles: impl IntoIterator<Item = Particle>) {
        self.entities.particles.extend(particles);
        self.enforce_particle_cap();
    }

    pub fn enforce_particle_cap(&mut self) {
        let cap = self.tuning.max_particles;
        let len = self.entities.particles.len();
        if len > cap {
            self.entities.particles.drain(..len - cap);
        }
    }
}
