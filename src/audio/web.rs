//! Web Audio playback of the cue table

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::{Tone, Waveform, tones};
use crate::error::GameError;
use crate::settings::Settings;
use crate::sim::Notification;

impl From<Waveform> for OscillatorType {
    fn from(waveform: Waveform) -> Self {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        }
    }
}

/// Audio manager for the game
///
/// Without an `AudioContext` every call is a no-op and the game runs silent.
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        let ctx = match AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                let err = GameError::AudioUnavailable(format!("{:?}", e));
                log::warn!("{} - audio disabled", err);
                None
            }
        };
        Self {
            ctx,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.muted = settings.muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play the cue for a notification
    pub fn play(&self, notification: Notification) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers start contexts suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let jitter = js_sys::Math::random() as f32;
        for tone in tones(notification, jitter) {
            self.play_tone(ctx, &tone, vol);
        }
    }

    /// Create an oscillator routed through a gain node
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// 10 ms attack, exponential decay to silence over the tone duration
    fn play_tone(&self, ctx: &AudioContext, tone: &Tone, master: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.waveform.into()) else {
            return;
        };
        let t = ctx.current_time() + tone.delay;

        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(tone.volume * master, t + 0.01)
            .ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + tone.duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + tone.duration).ok();
    }
}
