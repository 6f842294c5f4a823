//! Collision detection and scoring
//!
//! Ship, asteroids and crystals are all treated as circles. Everything that
//! turns an overlap into score, energy, shield or mode changes lives here.

use glam::Vec2;
use rand::Rng;

use super::state::{Mode, Particle, ParticleColor, SimulationState};
use super::tick::{Notification, Transition};
use crate::consts::*;

/// Sparks thrown out when a crystal is picked up
const COLLECT_PARTICLES: u32 = 10;
const COLLECT_PARTICLE_LIFE: u32 = 30;

/// True if two circles with the given diameters overlap
#[inline]
pub fn circles_overlap(a: Vec2, a_size: f32, b: Vec2, b_size: f32) -> bool {
    a.distance(b) < a_size / 2.0 + b_size / 2.0
}

/// Count down an active shield; returns true on the tick it expires
pub fn update_shield_timer(state: &mut SimulationState) -> bool {
    let session = &mut state.session;
    if !session.shield_active {
        return false;
    }
    session.shield_timer += 1;
    if session.shield_timer >= state.tuning.shield_duration_ticks {
        session.drop_shield();
        return true;
    }
    false
}

/// Raise the shield if the energy bar is full
pub fn check_shield_charge(state: &mut SimulationState, events: &mut Vec<Notification>) {
    let session = &mut state.session;
    if !session.shield_active && session.energy >= MAX_ENERGY {
        session.activate_shield();
        events.push(Notification::ShieldActivate);
    }
}

/// Finish the level once the target score is reached
pub fn check_level_complete(
    state: &mut SimulationState,
    target_score: u64,
    events: &mut Vec<Notification>,
) -> Option<Transition> {
    let session = &mut state.session;
    if session.level_complete || session.score < target_score {
        return None;
    }
    session.level_complete = true;
    session.mode = Mode::LevelComplete;
    events.push(Notification::LevelComplete);
    log::info!(
        "Level {} complete with score {}",
        session.current_level,
        session.score
    );
    Some(Transition::LevelComplete {
        level: session.current_level,
        score: session.score,
    })
}

/// Pick up every crystal touching the ship; returns how many were collected
pub fn collect_crystals(state: &mut SimulationState, events: &mut Vec<Notification>) -> usize {
    let ship_pos = state.ship.pos;
    let (collected, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut state.entities.crystals)
        .into_iter()
        .partition(|c| circles_overlap(ship_pos, SHIP_SIZE, c.pos, CRYSTAL_SIZE));
    state.entities.crystals = remaining;

    for crystal in &collected {
        state.session.score += state.tuning.points_per_crystal;

        if !state.session.shield_active {
            let energy = state.session.energy.saturating_add(state.tuning.energy_per_crystal);
            state.session.energy = energy.min(MAX_ENERGY);
            check_shield_charge(state, events);
        }

        events.push(Notification::Collect);
        emit_sparkle(state, crystal.pos);
    }
    collected.len()
}

fn emit_sparkle(state: &mut SimulationState, origin: Vec2) {
    let mut sparks = Vec::with_capacity(COLLECT_PARTICLES as usize);
    for _ in 0..COLLECT_PARTICLES {
        let vel = Vec2::new(
            state.rng.random_range(-2.0..2.0),
            state.rng.random_range(-2.0..2.0),
        );
        let size = state.rng.random_range(2.0..4.0);
        sparks.push(Particle {
            id: state.next_entity_id(),
            pos: origin,
            vel,
            life: COLLECT_PARTICLE_LIFE,
            size,
            color: Some(ParticleColor::Cyan),
        });
    }
    state.push_particles(sparks);
}

/// Resolve the first asteroid touching the ship, in spawn order
///
/// A shield absorbs the hit and removes that asteroid; at most one absorb
/// happens per tick. Without a shield the run ends.
pub fn resolve_asteroid_hits(
    state: &mut SimulationState,
    events: &mut Vec<Notification>,
) -> Option<Transition> {
    let ship_pos = state.ship.pos;
    let hit = state
        .entities
        .asteroids
        .iter()
        .position(|a| circles_overlap(ship_pos, SHIP_SIZE, a.pos, a.size))?;

    if state.session.shield_active {
        let asteroid = state.entities.asteroids.remove(hit);
        state.session.drop_shield();
        events.push(Notification::ShieldHit);
        log::debug!("Shield absorbed asteroid {}", asteroid.id);
        return None;
    }

    state.session.mode = Mode::GameOver;
    events.push(Notification::Crash);
    log::info!(
        "Ship destroyed on level {} with score {}",
        state.session.current_level,
        state.session.score
    );
    Some(Transition::GameOver {
        level: state.session.current_level,
        score: state.session.score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Asteroid, Crystal};

    fn asteroid_at(id: u32, pos: Vec2) -> Asteroid {
        Asteroid {
            id,
            pos,
            vel: Vec2::ZERO,
            size: 40.0,
            rotation_deg: 0.0,
            rotation_speed: 0.0,
        }
    }

    fn playing() -> SimulationState {
        let mut state = SimulationState::new(3);
        state.reset_session(1, Mode::Playing);
        state
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        let a = Vec2::ZERO;
        assert!(circles_overlap(a, 40.0, Vec2::new(29.9, 0.0), 20.0));
        assert!(!circles_overlap(a, 40.0, Vec2::new(30.0, 0.0), 20.0));
    }

    #[test]
    fn test_collect_credits_score_energy_and_sparks() {
        let mut state = playing();
        let ship = state.ship.pos;
        state.entities.crystals.push(Crystal::new(0, ship));
        state.entities.crystals.push(Crystal::new(1, ship + Vec2::new(200.0, 0.0)));

        let mut events = Vec::new();
        assert_eq!(collect_crystals(&mut state, &mut events), 1);
        assert_eq!(state.session.score, 5);
        assert_eq!(state.session.energy, 15);
        assert_eq!(state.entities.crystals.len(), 1);
        assert_eq!(state.entities.crystals[0].id, 1);
        assert_eq!(events, vec![Notification::Collect]);
        assert_eq!(state.entities.particles.len(), 10);
        assert!(
            state
                .entities
                .particles
                .iter()
                .all(|p| p.color == Some(ParticleColor::Cyan) && p.life == 30)
        );
    }

    #[test]
    fn test_simultaneous_collections_all_credited() {
        let mut state = playing();
        let ship = state.ship.pos;
        for id in 0..3 {
            state
                .entities
                .crystals
                .push(Crystal::new(id, ship + Vec2::new(id as f32, 0.0)));
        }
        let mut events = Vec::new();
        assert_eq!(collect_crystals(&mut state, &mut events), 3);
        assert_eq!(state.session.score, 15);
        assert_eq!(state.session.energy, 45);
    }

    #[test]
    fn test_energy_clamps_and_raises_shield() {
        let mut state = playing();
        state.session.energy = 95;
        state.entities.crystals.push(Crystal::new(0, state.ship.pos));
        let mut events = Vec::new();
        collect_crystals(&mut state, &mut events);

        assert!(state.session.shield_active);
        assert_eq!(state.session.shield_timer, 0);
        assert_eq!(state.session.energy, 0);
        assert_eq!(state.session.energy_gauge(), MAX_ENERGY);
        assert!(events.contains(&Notification::ShieldActivate));
    }

    #[test]
    fn test_no_energy_while_shielded() {
        let mut state = playing();
        state.session.activate_shield();
        state.entities.crystals.push(Crystal::new(0, state.ship.pos));
        collect_crystals(&mut state, &mut Vec::new());
        assert_eq!(state.session.energy, 0);
        assert_eq!(state.session.score, 5);
    }

    #[test]
    fn test_shield_absorbs_only_one_asteroid() {
        let mut state = playing();
        state.session.activate_shield();
        let ship = state.ship.pos;
        state.entities.asteroids.push(asteroid_at(0, ship));
        state.entities.asteroids.push(asteroid_at(1, ship));

        let mut events = Vec::new();
        assert!(resolve_asteroid_hits(&mut state, &mut events).is_none());
        assert_eq!(events, vec![Notification::ShieldHit]);
        assert!(!state.session.shield_active);
        assert_eq!(state.session.mode, Mode::Playing);
        assert_eq!(state.entities.asteroids.len(), 1);
        assert_eq!(state.entities.asteroids[0].id, 1);
    }

    #[test]
    fn test_unshielded_hit_ends_run() {
        let mut state = playing();
        state.session.score = 30;
        state.entities.asteroids.push(asteroid_at(0, state.ship.pos));

        let mut events = Vec::new();
        let transition = resolve_asteroid_hits(&mut state, &mut events);
        assert_eq!(
            transition,
            Some(Transition::GameOver {
                level: 1,
                score: 30
            })
        );
        assert_eq!(state.session.mode, Mode::GameOver);
        assert_eq!(events, vec![Notification::Crash]);
    }

    #[test]
    fn test_shield_expires_on_duration() {
        let mut state = playing();
        state.session.activate_shield();
        for _ in 0..SHIELD_DURATION - 1 {
            assert!(!update_shield_timer(&mut state));
        }
        assert!(state.session.shield_active);
        assert_eq!(state.session.shield_timer, SHIELD_DURATION - 1);
        assert!(update_shield_timer(&mut state));
        assert!(!state.session.shield_active);
        assert_eq!(state.session.shield_timer, 0);
        assert_eq!(state.session.energy, 0);
    }

    #[test]
    fn test_level_complete_fires_once() {
        let mut state = playing();
        state.session.score = 50;
        let mut events = Vec::new();
        assert!(check_level_complete(&mut state, 50, &mut events).is_some());
        assert_eq!(state.session.mode, Mode::LevelComplete);
        assert!(check_level_complete(&mut state, 50, &mut events).is_none());
        assert_eq!(events, vec![Notification::LevelComplete]);
    }
}
