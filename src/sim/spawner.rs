//! Asteroid and crystal spawning
//!
//! Asteroids come on a level-dependent timer from a random edge, aimed
//! roughly at the ship. Crystals appear independently with a fixed chance
//! per tick.

use glam::Vec2;
use rand::Rng;

use super::levels::LevelConfig;
use super::state::{Asteroid, Crystal, SimulationState};
use crate::consts::*;

/// Maximum angular error added to an asteroid's aim (radians)
const AIM_JITTER: f32 = 0.25;
/// Maximum spin either way (degrees per tick)
const MAX_SPIN: f32 = 1.5;

/// Playfield edge an asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    fn from_index(index: u32) -> Self {
        match index {
            0 => Edge::Top,
            1 => Edge::Right,
            2 => Edge::Bottom,
            _ => Edge::Left,
        }
    }

    /// Point just outside this edge, `t` in [0, 1) along it
    pub fn entry_point(&self, t: f32) -> Vec2 {
        match self {
            Edge::Top => Vec2::new(t * PLAYFIELD_WIDTH, -ASTEROID_MAX_SIZE),
            Edge::Right => Vec2::new(PLAYFIELD_WIDTH + ASTEROID_MAX_SIZE, t * PLAYFIELD_HEIGHT),
            Edge::Bottom => Vec2::new(t * PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT + ASTEROID_MAX_SIZE),
            Edge::Left => Vec2::new(-ASTEROID_MAX_SIZE, t * PLAYFIELD_HEIGHT),
        }
    }
}

/// Advance the spawn timer; spawn one asteroid when it passes the interval
///
/// Returns true if an asteroid was spawned.
pub fn update_asteroid_spawns(state: &mut SimulationState, level: &LevelConfig) -> bool {
    state.spawn_timer += 1;
    if state.spawn_timer <= level.spawn_interval {
        return false;
    }
    state.spawn_timer = 0;
    spawn_asteroid(state, level.asteroid_speed);
    true
}

/// Spawn one asteroid at a random edge heading for the ship
pub fn spawn_asteroid(state: &mut SimulationState, base_speed: f32) {
    let edge = Edge::from_index(state.rng.random_range(0..4));
    let pos = edge.entry_point(state.rng.random::<f32>());

    let to_ship = state.ship.pos - pos;
    let aim = to_ship.y.atan2(to_ship.x) + state.rng.random_range(-AIM_JITTER..AIM_JITTER);
    let speed = base_speed + state.rng.random_range(0.0..=base_speed * 0.5);
    let size = state.rng.random_range(ASTEROID_MIN_SIZE..ASTEROID_MAX_SIZE);
    let rotation_deg = state.rng.random_range(0.0..360.0);
    let rotation_speed = state.rng.random_range(-MAX_SPIN..MAX_SPIN);

    let asteroid = Asteroid {
        id: state.next_entity_id(),
        pos,
        vel: Vec2::new(aim.cos(), aim.sin()) * speed,
        size,
        rotation_deg,
        rotation_speed,
    };
    log::debug!("Asteroid {} from {:?} (size {:.1})", asteroid.id, edge, size);
    state.entities.asteroids.push(asteroid);
}

/// Roll for a crystal this tick; returns true if one appeared
pub fn update_crystal_spawns(state: &mut SimulationState) -> bool {
    let chance = state.tuning.crystal_spawn_chance;
    if !state.rng.random_bool(chance) {
        return false;
    }
    let pos = Vec2::new(
        state.rng.random_range(0.0..PLAYFIELD_WIDTH),
        state.rng.random_range(0.0..PLAYFIELD_HEIGHT),
    );
    let id = state.next_entity_id();
    state.entities.crystals.push(Crystal::new(id, pos));
    true
}
