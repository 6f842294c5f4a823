//! Session state machine
//!
//! `Game` owns the simulation state, the player's progress and the storage
//! it is persisted to. Every mode change goes through here:
//!
//! ```text
//! Start -> Playing <-> Paused
//! Playing -> LevelComplete -> Playing (next level) | Start (after the last level)
//! Playing -> GameOver -> Playing (same level) | Start
//! ```
//!
//! Resets replace the whole session before the next tick can observe it.

use crate::consts::LEVEL_COUNT;
use crate::error::GameResult;
use crate::persistence::{KeyValueStore, ProgressStore};
use crate::progress::Progress;
use crate::sim::{self, KeyState, Mode, Notification, SimulationState, TickResult, Transition};
use crate::tuning::Tuning;

/// Discrete player requests, gated by the current mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Context action (space): start, restart or advance depending on mode
    Confirm,
    /// Start a level from the level select
    SelectLevel(u32),
    TogglePause,
    Restart,
    NextLevel,
    Home,
}

pub struct Game<K: KeyValueStore> {
    state: SimulationState,
    progress: Progress,
    store: ProgressStore<K>,
    /// Notifications not yet handed to the audio collaborator
    outbox: Vec<Notification>,
}

impl<K: KeyValueStore> Game<K> {
    pub fn new(seed: u64, backend: K) -> Self {
        Self::with_tuning(seed, Tuning::default(), backend)
    }

    pub fn with_tuning(seed: u64, tuning: Tuning, backend: K) -> Self {
        let store = ProgressStore::new(backend);
        let progress = Progress::load(&store);
        Self {
            state: SimulationState::with_tuning(seed, tuning),
            progress,
            store,
            outbox: Vec::new(),
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Direct access for drivers and tests that stage entities
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn store(&self) -> &ProgressStore<K> {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.state.session.mode
    }

    /// Take the notifications queued since the last call
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    /// Advance one tick and settle any resulting transition
    pub fn tick(&mut self, keys: &KeyState) -> TickResult {
        let result = sim::tick(&mut self.state, keys);
        self.outbox.extend_from_slice(&result.notifications);
        if let Some(transition) = result.transition {
            self.apply_transition(transition);
        }
        result
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::GameOver { score, .. } => {
                self.progress.record_score(score, &mut self.store);
            }
            Transition::LevelComplete { level, score } => {
                self.progress.record_score(score, &mut self.store);
                if level < LEVEL_COUNT {
                    self.progress.unlock(level + 1, &mut self.store);
                }
            }
        }
    }

    /// Reset the session and begin playing `level`
    pub fn start_level(&mut self, level: u32) -> GameResult<()> {
        let config = sim::level_config(level)?;
        self.state.reset_session(level, Mode::Playing);
        self.outbox.push(Notification::Start);
        log::info!(
            "Starting level {} ({}, target {})",
            level,
            config.difficulty.as_str(),
            config.target_score
        );
        Ok(())
    }

    /// Start a level from the level select if it has been unlocked
    pub fn select_level(&mut self, level: u32) -> GameResult<bool> {
        if self.mode() != Mode::Start {
            return Ok(false);
        }
        if !self.progress.is_unlocked(level) {
            log::warn!("Level {} is locked", level);
            return Ok(false);
        }
        self.start_level(level)?;
        Ok(true)
    }

    /// Toggle between playing and paused; returns true if the mode changed
    pub fn toggle_pause(&mut self) -> bool {
        let session = &mut self.state.session;
        session.mode = match session.mode {
            Mode::Playing => Mode::Paused,
            Mode::Paused => Mode::Playing,
            _ => return false,
        };
        log::info!("Mode: {:?}", session.mode);
        true
    }

    /// Advance past a completed level, or return home after the last one
    pub fn next_level(&mut self) -> GameResult<()> {
        if self.mode() != Mode::LevelComplete {
            return Ok(());
        }
        let current = self.state.session.current_level;
        if current < LEVEL_COUNT {
            self.start_level(current + 1)
        } else {
            log::info!("All {} levels complete", LEVEL_COUNT);
            self.go_to_home();
            Ok(())
        }
    }

    /// Replay the current level from scratch
    pub fn restart_current_level(&mut self) {
        let level = self.state.session.current_level;
        self.state.reset_session(level, Mode::Playing);
        self.outbox.push(Notification::Start);
        log::info!("Restarting level {}", level);
    }

    /// Back to the start screen with a fresh session on level 1
    pub fn go_to_home(&mut self) {
        self.state.reset_session(1, Mode::Start);
    }

    /// Apply a one-shot command if the current mode allows it
    pub fn handle(&mut self, command: Command) -> GameResult<()> {
        match (command, self.mode()) {
            (Command::Confirm, Mode::Start) => {
                self.select_level(1)?;
            }
            (Command::Confirm, Mode::GameOver)
            | (
                Command::Restart,
                Mode::Playing | Mode::Paused | Mode::GameOver | Mode::LevelComplete,
            ) => self.restart_current_level(),
            (Command::Confirm | Command::NextLevel, Mode::LevelComplete) => self.next_level()?,
            (Command::SelectLevel(level), Mode::Start) => {
                self.select_level(level)?;
            }
            (Command::TogglePause, _) => {
                self.toggle_pause();
            }
            (Command::Home, _) => self.go_to_home(),
            (command, mode) => log::debug!("Ignoring {:?} in {:?}", command, mode),
        }
        Ok(())
    }

    /// Menu button press: click cue, then the command
    pub fn press_button(&mut self, command: Command) -> GameResult<()> {
        self.outbox.push(Notification::Click);
        self.handle(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{HIGH_SCORE_KEY, MemoryStore};
    use crate::sim::{Asteroid, Crystal};
    use glam::Vec2;
    use std::collections::BTreeSet;

    fn quiet_game(backend: MemoryStore) -> Game<MemoryStore> {
        let tuning = Tuning {
            crystal_spawn_chance: 0.0,
            ..Default::default()
        };
        Game::with_tuning(7, tuning, backend)
    }

    fn park_asteroid_on_ship(game: &mut Game<MemoryStore>) {
        let state = game.state_mut();
        let id = state.next_entity_id();
        let pos = state.ship.pos;
        state.entities.asteroids.push(Asteroid {
            id,
            pos,
            vel: Vec2::ZERO,
            size: 50.0,
            rotation_deg: 0.0,
            rotation_speed: 0.0,
        });
    }

    #[test]
    fn test_start_level_resets_session() {
        let mut game = quiet_game(MemoryStore::default());
        game.start_level(1).unwrap();
        game.state_mut().session.score = 25;
        game.state_mut().ship.pos = Vec2::new(3.0, 4.0);
        park_asteroid_on_ship(&mut game);

        game.start_level(1).unwrap();
        let state = game.state();
        assert_eq!(state.session.mode, Mode::Playing);
        assert_eq!(state.session.score, 0);
        assert_eq!(state.ship.pos, Vec2::new(600.0, 400.0));
        assert!(state.entities.is_empty());
        assert_eq!(
            game.drain_notifications(),
            vec![Notification::Start, Notification::Start]
        );
    }

    #[test]
    fn test_start_level_out_of_range() {
        let mut game = quiet_game(MemoryStore::default());
        assert!(game.start_level(100).is_err());
        assert_eq!(game.mode(), Mode::Start);
    }

    #[test]
    fn test_crash_persists_beaten_high_score() {
        let mut backend = MemoryStore::default();
        backend.set(HIGH_SCORE_KEY, "20").unwrap();
        let mut game = quiet_game(backend);
        assert_eq!(game.progress().high_score, 20);

        game.start_level(1).unwrap();
        game.state_mut().session.score = 30;
        park_asteroid_on_ship(&mut game);
        game.tick(&KeyState::default());

        assert_eq!(game.mode(), Mode::GameOver);
        assert_eq!(game.progress().high_score, 30);
        assert_eq!(game.store().load_high_score().unwrap(), 30);
    }

    #[test]
    fn test_completion_unlocks_next_level() {
        let mut game = quiet_game(MemoryStore::default());
        game.start_level(1).unwrap();
        game.state_mut().session.score = 45;
        let pos = game.state().ship.pos;
        game.state_mut().entities.crystals.push(Crystal::new(99, pos));
        game.tick(&KeyState::default());

        assert_eq!(game.mode(), Mode::LevelComplete);
        assert!(game.progress().is_unlocked(2));
        assert_eq!(
            game.store().load_unlocked_levels().unwrap(),
            BTreeSet::from([1, 2])
        );
        assert_eq!(game.progress().high_score, 50);

        game.handle(Command::Confirm).unwrap();
        assert_eq!(game.mode(), Mode::Playing);
        assert_eq!(game.state().session.current_level, 2);
    }

    #[test]
    fn test_next_level_after_last_returns_home() {
        let mut game = quiet_game(MemoryStore::default());
        game.start_level(99).unwrap();
        game.state_mut().session.mode = Mode::LevelComplete;
        game.next_level().unwrap();
        assert_eq!(game.mode(), Mode::Start);
        assert_eq!(game.state().session.current_level, 1);
    }

    #[test]
    fn test_restart_keeps_level() {
        let mut game = quiet_game(MemoryStore::default());
        game.start_level(4).unwrap();
        game.state_mut().session.score = 15;
        game.state_mut().session.mode = Mode::GameOver;

        game.handle(Command::Confirm).unwrap();
        let session = &game.state().session;
        assert_eq!(session.mode, Mode::Playing);
        assert_eq!(session.current_level, 4);
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_restart_and_home_mid_run() {
        for paused in [false, true] {
            let mut game = quiet_game(MemoryStore::default());
            game.start_level(3).unwrap();
            game.state_mut().session.score = 25;
            game.state_mut().ship.pos = Vec2::new(10.0, 10.0);
            if paused {
                game.handle(Command::TogglePause).unwrap();
            }

            game.press_button(Command::Restart).unwrap();
            let session = &game.state().session;
            assert_eq!(session.mode, Mode::Playing);
            assert_eq!(session.current_level, 3);
            assert_eq!(session.score, 0);
            assert_eq!(game.state().ship.pos, Vec2::new(600.0, 400.0));

            game.state_mut().session.score = 15;
            if paused {
                game.handle(Command::TogglePause).unwrap();
            }
            game.press_button(Command::Home).unwrap();
            let session = &game.state().session;
            assert_eq!(session.mode, Mode::Start);
            assert_eq!(session.current_level, 1);
            assert_eq!(session.score, 0);
        }
    }

    #[test]
    fn test_go_to_home_is_idempotent() {
        let mut game = quiet_game(MemoryStore::default());
        game.start_level(3).unwrap();
        game.tick(&KeyState {
            forward: true,
            ..Default::default()
        });

        game.go_to_home();
        let once = (
            game.state().ship.clone(),
            game.state().entities.clone(),
            game.state().session.clone(),
        );
        game.go_to_home();
        let twice = (
            game.state().ship.clone(),
            game.state().entities.clone(),
            game.state().session.clone(),
        );
        assert_eq!(once, twice);
        assert_eq!(once.2.mode, Mode::Start);
        assert_eq!(once.2.current_level, 1);
    }

    #[test]
    fn test_pause_only_while_playing() {
        let mut game = quiet_game(MemoryStore::default());
        assert!(!game.toggle_pause());
        assert_eq!(game.mode(), Mode::Start);

        game.start_level(1).unwrap();
        assert!(game.toggle_pause());
        assert_eq!(game.mode(), Mode::Paused);

        let before = game.state().spawn_timer;
        for _ in 0..10 {
            game.tick(&KeyState::default());
        }
        assert_eq!(game.state().spawn_timer, before);

        game.handle(Command::TogglePause).unwrap();
        assert_eq!(game.mode(), Mode::Playing);
        game.tick(&KeyState::default());
        assert_eq!(game.state().spawn_timer, before + 1);
    }

    #[test]
    fn test_locked_level_cannot_be_selected() {
        let mut game = quiet_game(MemoryStore::default());
        assert!(!game.select_level(5).unwrap());
        assert_eq!(game.mode(), Mode::Start);
        assert!(game.select_level(1).unwrap());
        assert_eq!(game.mode(), Mode::Playing);
    }

    #[test]
    fn test_button_press_queues_click_first() {
        let mut game = quiet_game(MemoryStore::default());
        game.press_button(Command::SelectLevel(1)).unwrap();
        assert_eq!(
            game.drain_notifications(),
            vec![Notification::Click, Notification::Start]
        );
        assert!(game.drain_notifications().is_empty());
    }

    #[test]
    fn test_storage_failure_is_not_fatal() {
        let mut game = quiet_game(MemoryStore::failing());
        assert_eq!(*game.progress(), Progress::default());
        game.start_level(1).unwrap();
        game.state_mut().session.score = 10;
        park_asteroid_on_ship(&mut game);
        game.tick(&KeyState::default());
        assert_eq!(game.mode(), Mode::GameOver);
        assert_eq!(game.progress().high_score, 10);
    }
}
