//! Ship kinematics and entity motion
//!
//! Each function advances its part of the state by exactly one tick. The
//! order they are called in by `tick` is part of the game's behaviour.

use glam::Vec2;
use rand::Rng;

use super::state::{Particle, SimulationState};
use super::tick::{KeyState, Notification};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::{heading_vector, wrap_coordinate};

/// The thrust cue fires on every Nth thrusting tick
const THRUST_CUE_EVERY: u32 = 3;
/// Degrees a crystal spins per tick
const CRYSTAL_SPIN_DEG: f32 = 2.0;
/// Pulse accumulator step per tick
const CRYSTAL_PULSE_STEP: f32 = 0.1;

/// Exhaust plume parameters
struct Exhaust {
    count: u32,
    life: u32,
    size: (f32, f32),
    speed: (f32, f32),
}

const FORWARD_EXHAUST: Exhaust = Exhaust {
    count: 3,
    life: 20,
    size: (3.0, 6.0),
    speed: (2.0, 4.0),
};

const REVERSE_EXHAUST: Exhaust = Exhaust {
    count: 2,
    life: 15,
    size: (2.0, 4.0),
    speed: (1.5, 3.0),
};

/// Rotation, thrust, friction, integration and wrap-around for the ship
pub fn step_ship(state: &mut SimulationState, keys: &KeyState, events: &mut Vec<Notification>) {
    let rotation = state.tuning.rotation_speed_deg;
    let thrust = state.tuning.thrust_power;

    if keys.rotate_left {
        state.ship.angle_deg -= rotation;
    }
    if keys.rotate_right {
        state.ship.angle_deg += rotation;
    }

    let heading = heading_vector(state.ship.angle_deg);

    if keys.forward {
        state.ship.vel += heading * thrust;
        count_thrust(state, events);
        emit_exhaust(state, -heading, &FORWARD_EXHAUST);
    }
    if keys.backward {
        state.ship.vel -= heading * thrust * state.tuning.reverse_thrust_factor;
        count_thrust(state, events);
        emit_exhaust(state, heading, &REVERSE_EXHAUST);
    }

    state.ship.vel *= state.tuning.friction;
    state.ship.pos += state.ship.vel;

    state.ship.pos.x = wrap_coordinate(state.ship.pos.x, PLAYFIELD_WIDTH);
    state.ship.pos.y = wrap_coordinate(state.ship.pos.y, PLAYFIELD_HEIGHT);
}

fn count_thrust(state: &mut SimulationState, events: &mut Vec<Notification>) {
    state.thrust_counter = state.thrust_counter.wrapping_add(1);
    if state.thrust_counter % THRUST_CUE_EVERY == 0 {
        events.push(Notification::Thrust);
    }
}

fn emit_exhaust(state: &mut SimulationState, direction: Vec2, exhaust: &Exhaust) {
    let origin = state.ship.pos;
    let mut plume = Vec::with_capacity(exhaust.count as usize);
    for _ in 0..exhaust.count {
        let speed = state.rng.random_range(exhaust.speed.0..exhaust.speed.1);
        let size = state.rng.random_range(exhaust.size.0..exhaust.size.1);
        plume.push(Particle {
            id: state.next_entity_id(),
            pos: origin,
            vel: direction * speed,
            life: exhaust.life,
            size,
            color: None,
        });
    }
    state.push_particles(plume);
}

/// Integrate particles and drop the expired ones
pub fn age_particles(state: &mut SimulationState) {
    for particle in &mut state.entities.particles {
        particle.pos += particle.vel;
        particle.life = particle.life.saturating_sub(1);
    }
    state.entities.particles.retain(|p| p.life > 0);
    state.enforce_particle_cap();
}

/// Integrate asteroids and evict those that left the expanded bounds
pub fn move_asteroids(state: &mut SimulationState) {
    for asteroid in &mut state.entities.asteroids {
        asteroid.pos += asteroid.vel;
        asteroid.rotation_deg += asteroid.rotation_speed;
    }
    state.entities.asteroids.retain(|a| !a.is_out_of_bounds());
}

/// Spin and pulse crystals
pub fn animate_crystals(state: &mut SimulationState) {
    for crystal in &mut state.entities.crystals {
        crystal.rotation_deg += CRYSTAL_SPIN_DEG;
        crystal.pulse_phase += CRYSTAL_PULSE_STEP;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Asteroid, Crystal};
    use proptest::prelude::*;

    fn forward() -> KeyState {
        KeyState {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_rotation_keys_cancel() {
        let mut state = SimulationState::new(1);
        let keys = KeyState {
            rotate_left: true,
            rotate_right: true,
            ..Default::default()
        };
        step_ship(&mut state, &keys, &mut Vec::new());
        assert_eq!(state.ship.angle_deg, 0.0);

        let keys = KeyState {
            rotate_left: true,
            ..Default::default()
        };
        step_ship(&mut state, &keys, &mut Vec::new());
        assert_eq!(state.ship.angle_deg, -5.0);
    }

    #[test]
    fn test_forward_thrust_then_friction() {
        let mut state = SimulationState::new(1);
        let start = state.ship.pos;
        step_ship(&mut state, &forward(), &mut Vec::new());

        let expected_vx = 0.3 * 0.98;
        assert!((state.ship.vel.x - expected_vx).abs() < 1e-6);
        assert!(state.ship.vel.y.abs() < 1e-6);
        assert!((state.ship.pos.x - (start.x + expected_vx)).abs() < 1e-4);
        // Exhaust trails behind the ship
        assert_eq!(state.entities.particles.len(), 3);
        assert!(state.entities.particles.iter().all(|p| p.vel.x < 0.0 && p.life == 20));
    }

    #[test]
    fn test_reverse_thrust_is_weaker() {
        let mut state = SimulationState::new(1);
        let keys = KeyState {
            backward: true,
            ..Default::default()
        };
        step_ship(&mut state, &keys, &mut Vec::new());
        let expected_vx = -0.3 * 0.7 * 0.98;
        assert!((state.ship.vel.x - expected_vx).abs() < 1e-6);
        assert_eq!(state.entities.particles.len(), 2);
        assert!(state.entities.particles.iter().all(|p| p.vel.x > 0.0 && p.life == 15));
    }

    #[test]
    fn test_friction_applies_without_thrust() {
        let mut state = SimulationState::new(1);
        state.ship.vel = Vec2::new(1.0, -2.0);
        step_ship(&mut state, &KeyState::default(), &mut Vec::new());
        assert!((state.ship.vel.x - 0.98).abs() < 1e-6);
        assert!((state.ship.vel.y + 1.96).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_teleports_to_opposite_edge() {
        let mut state = SimulationState::new(1);
        state.ship.pos = Vec2::new(0.5, 799.5);
        state.ship.vel = Vec2::new(-2.0, 2.0);
        step_ship(&mut state, &KeyState::default(), &mut Vec::new());
        assert_eq!(state.ship.pos.x, PLAYFIELD_WIDTH);
        assert_eq!(state.ship.pos.y, 0.0);
    }

    #[test]
    fn test_thrust_cue_throttled() {
        let mut state = SimulationState::new(1);
        let mut events = Vec::new();
        for _ in 0..6 {
            step_ship(&mut state, &forward(), &mut events);
        }
        let cues = events.iter().filter(|e| **e == Notification::Thrust).count();
        assert_eq!(cues, 2);
    }

    #[test]
    fn test_particles_age_and_expire() {
        let mut state = SimulationState::new(1);
        state.entities.particles.push(Particle {
            id: 0,
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 1.0),
            life: 2,
            size: 2.0,
            color: None,
        });
        age_particles(&mut state);
        assert_eq!(state.entities.particles[0].life, 1);
        assert_eq!(state.entities.particles[0].pos, Vec2::new(1.0, 1.0));
        age_particles(&mut state);
        assert!(state.entities.particles.is_empty());
    }

    #[test]
    fn test_asteroids_move_spin_and_leave() {
        let mut state = SimulationState::new(1);
        state.entities.asteroids.push(Asteroid {
            id: 0,
            pos: Vec2::new(100.0, 100.0),
            vel: Vec2::new(2.0, 0.0),
            size: 30.0,
            rotation_deg: 10.0,
            rotation_speed: 1.5,
        });
        state.entities.asteroids.push(Asteroid {
            id: 1,
            pos: Vec2::new(PLAYFIELD_WIDTH + 59.0, 100.0),
            vel: Vec2::new(2.0, 0.0),
            size: 30.0,
            rotation_deg: 0.0,
            rotation_speed: 0.0,
        });
        move_asteroids(&mut state);
        assert_eq!(state.entities.asteroids.len(), 1);
        let a = &state.entities.asteroids[0];
        assert_eq!(a.pos, Vec2::new(102.0, 100.0));
        assert_eq!(a.rotation_deg, 11.5);
    }

    #[test]
    fn test_crystal_animation() {
        let mut state = SimulationState::new(1);
        state.entities.crystals.push(Crystal::new(0, Vec2::new(5.0, 5.0)));
        animate_crystals(&mut state);
        let c = &state.entities.crystals[0];
        assert_eq!(c.rotation_deg, 2.0);
        assert!((c.pulse_phase - 0.1).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_ship_stays_in_playfield(
            x in 0.0f32..=PLAYFIELD_WIDTH,
            y in 0.0f32..=PLAYFIELD_HEIGHT,
            vx in -20.0f32..20.0,
            vy in -20.0f32..20.0,
            steps in proptest::collection::vec(any::<(bool, bool, bool, bool)>(), 1..60),
        ) {
            let mut state = SimulationState::new(7);
            state.ship.pos = Vec2::new(x, y);
            state.ship.vel = Vec2::new(vx, vy);
            for (l, r, f, b) in steps {
                let keys = KeyState { rotate_left: l, rotate_right: r, forward: f, backward: b };
                step_ship(&mut state, &keys, &mut Vec::new());
                prop_assert!((0.0..=PLAYFIELD_WIDTH).contains(&state.ship.pos.x));
                prop_assert!((0.0..=PLAYFIELD_HEIGHT).contains(&state.ship.pos.y));
            }
        }
    }
}
