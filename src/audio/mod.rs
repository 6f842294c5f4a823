//! Sound cues for simulation notifications
//!
//! Every cue is a short sequence of synthesized tones, no sample files.
//! The table here is platform independent; `web` plays it through the
//! Web Audio API.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

use crate::sim::Notification;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

/// One oscillator note within a cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Hz
    pub freq: f32,
    /// Seconds
    pub duration: f64,
    pub waveform: Waveform,
    /// Peak gain before the master volume is applied
    pub volume: f32,
    /// Offset from the cue start, seconds
    pub delay: f64,
}

impl Tone {
    const fn new(freq: f32, duration: f64, waveform: Waveform, volume: f32, delay: f64) -> Self {
        Self {
            freq,
            duration,
            waveform,
            volume,
            delay,
        }
    }
}

use Waveform::{Sawtooth, Sine, Square};

// C5 E5 G5 arpeggios
const COLLECT: [Tone; 3] = [
    Tone::new(523.25, 0.1, Sine, 0.4, 0.0),
    Tone::new(659.25, 0.1, Sine, 0.4, 0.05),
    Tone::new(783.99, 0.15, Sine, 0.4, 0.1),
];

const START: [Tone; 3] = [
    Tone::new(523.25, 0.1, Sine, 0.5, 0.0),
    Tone::new(659.25, 0.1, Sine, 0.5, 0.1),
    Tone::new(783.99, 0.2, Sine, 0.5, 0.2),
];

// A major: A4 C#5 E5 A5
const SHIELD_ACTIVATE: [Tone; 4] = [
    Tone::new(440.0, 0.1, Sine, 0.5, 0.0),
    Tone::new(554.37, 0.1, Sine, 0.5, 0.05),
    Tone::new(659.25, 0.2, Sine, 0.5, 0.1),
    Tone::new(880.0, 0.3, Sine, 0.4, 0.2),
];

const SHIELD_HIT: [Tone; 2] = [
    Tone::new(200.0, 0.15, Square, 0.3, 0.0),
    Tone::new(150.0, 0.15, Square, 0.3, 0.05),
];

const CLICK: [Tone; 2] = [
    Tone::new(800.0, 0.05, Sine, 0.3, 0.0),
    Tone::new(1000.0, 0.05, Sine, 0.2, 0.02),
];

/// Tones for a notification
///
/// `jitter` in `[0, 1)` varies the thrust rumble pitch between 100 and 150 Hz.
pub fn tones(notification: Notification, jitter: f32) -> Vec<Tone> {
    match notification {
        Notification::Thrust => {
            let freq = 100.0 + jitter.clamp(0.0, 1.0) * 50.0;
            vec![Tone::new(freq, 0.1, Sawtooth, 0.2, 0.0)]
        }
        Notification::Collect => COLLECT.to_vec(),
        Notification::ShieldActivate | Notification::LevelComplete => SHIELD_ACTIVATE.to_vec(),
        Notification::ShieldHit => SHIELD_HIT.to_vec(),
        // Five falling saws, 30 ms apart
        Notification::Crash => (0..5)
            .map(|i| Tone::new(100.0 - i as f32 * 10.0, 0.2, Sawtooth, 0.4, i as f64 * 0.03))
            .collect(),
        Notification::Start => START.to_vec(),
        Notification::Click => CLICK.to_vec(),
    }
}

/// Seconds until the last tone of a cue has finished
pub fn cue_length(tones: &[Tone]) -> f64 {
    tones
        .iter()
        .map(|t| t.delay + t.duration)
        .fold(0.0, f64::max)
}
