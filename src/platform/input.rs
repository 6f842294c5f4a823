//! Keyboard to logical input mapping
//!
//! Held keys become a `KeyState` snapshot read once per tick; one-shot keys
//! become session commands.

use crate::game::Command;
use crate::sim::KeyState;

/// What a physical key does in game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    RotateLeft,
    RotateRight,
    Forward,
    Backward,
    Confirm,
    Pause,
}

impl KeyAction {
    /// Map a `KeyboardEvent.code` value
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowLeft" | "KeyA" => Some(KeyAction::RotateLeft),
            "ArrowRight" | "KeyD" => Some(KeyAction::RotateRight),
            "ArrowUp" | "KeyW" => Some(KeyAction::Forward),
            "ArrowDown" | "KeyS" => Some(KeyAction::Backward),
            "Space" => Some(KeyAction::Confirm),
            "KeyP" => Some(KeyAction::Pause),
            _ => None,
        }
    }

    /// Command for one-shot actions
    pub fn command(&self) -> Option<Command> {
        match self {
            KeyAction::Confirm => Some(Command::Confirm),
            KeyAction::Pause => Some(Command::TogglePause),
            _ => None,
        }
    }
}

/// Currently held movement keys
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: KeyState,
}

impl InputState {
    /// Record a key press; returns the command it triggers, if any
    ///
    /// Auto-repeat presses of a one-shot key should be filtered by the caller.
    pub fn key_down(&mut self, code: &str) -> Option<Command> {
        let action = KeyAction::from_code(code)?;
        self.set_held(action, true);
        action.command()
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(action) = KeyAction::from_code(code) {
            self.set_held(action, false);
        }
    }

    fn set_held(&mut self, action: KeyAction, held: bool) {
        match action {
            KeyAction::RotateLeft => self.keys.rotate_left = held,
            KeyAction::RotateRight => self.keys.rotate_right = held,
            KeyAction::Forward => self.keys.forward = held,
            KeyAction::Backward => self.keys.backward = held,
            KeyAction::Confirm | KeyAction::Pause => {}
        }
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        self.keys = KeyState::default();
    }

    pub fn snapshot(&self) -> KeyState {
        self.keys
    }
}
