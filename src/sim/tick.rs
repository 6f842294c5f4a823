//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation by one 16 ms step.

use serde::{Deserialize, Serialize};

use super::levels::level_config;
use super::state::{Mode, SimulationState};
use super::{collision, physics, spawner};
use crate::error::GameResult;

/// Held-key snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub forward: bool,
    pub backward: bool,
}

/// Fire-and-forget events for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    Thrust,
    Collect,
    ShieldActivate,
    ShieldHit,
    Crash,
    Start,
    Click,
    LevelComplete,
}

impl Notification {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::Thrust => "thrust",
            Notification::Collect => "collect",
            Notification::ShieldActivate => "shield-activate",
            Notification::ShieldHit => "shield-hit",
            Notification::Crash => "crash",
            Notification::Start => "start",
            Notification::Click => "click",
            Notification::LevelComplete => "level-complete",
        }
    }
}

/// Mode change a tick asks the session to finish (persisting progress)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    LevelComplete { level: u32, score: u64 },
    GameOver { level: u32, score: u64 },
}

/// Everything a tick produced besides state mutation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickResult {
    pub notifications: Vec<Notification>,
    pub transition: Option<Transition>,
    /// The tick was abandoned because the level index was invalid
    pub skipped: bool,
}

/// Advance the game state by one fixed timestep
///
/// Does nothing unless the session is playing. Level completion is checked
/// before asteroid collisions, so a crystal that finishes the level wins
/// over a crash on the same tick.
pub fn tick(state: &mut SimulationState, keys: &KeyState) -> TickResult {
    if state.session.mode != Mode::Playing {
        return TickResult::default();
    }

    let mut notifications = Vec::new();
    match advance(state, keys, &mut notifications) {
        Ok(transition) => TickResult {
            notifications,
            transition,
            skipped: false,
        },
        Err(e) => {
            log::error!("Skipping tick: {}", e);
            TickResult {
                notifications,
                transition: None,
                skipped: true,
            }
        }
    }
}

fn advance(
    state: &mut SimulationState,
    keys: &KeyState,
    events: &mut Vec<Notification>,
) -> GameResult<Option<Transition>> {
    let level = level_config(state.session.current_level)?;

    physics::step_ship(state, keys, events);
    collision::update_shield_timer(state);
    physics::age_particles(state);
    collision::check_shield_charge(state, events);

    if let Some(transition) = collision::check_level_complete(state, level.target_score, events) {
        return Ok(Some(transition));
    }

    spawner::update_asteroid_spawns(state, &level);
    physics::move_asteroids(state);
    spawner::update_crystal_spawns(state);
    physics::animate_crystals(state);

    if collision::collect_crystals(state, events) > 0 {
        if let Some(transition) =
            collision::check_level_complete(state, level.target_score, events)
        {
            return Ok(Some(transition));
        }
    }

    Ok(collision::resolve_asteroid_hits(state, events))
}
