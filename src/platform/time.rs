//! Frame time to fixed simulation steps

use crate::consts::{MAX_SUBSTEPS, TICK_SECS};

/// Largest frame delta accepted, in seconds
const MAX_FRAME_SECS: f32 = 0.1;

/// Accumulates variable frame time and hands out whole ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
    last_time_ms: Option<f64>,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an animation-frame timestamp (milliseconds); returns ticks to run
    pub fn advance_to(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time_ms {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => TICK_SECS,
        };
        self.last_time_ms = Some(time_ms);
        self.advance(dt)
    }

    /// Add `dt` seconds and return how many ticks are due
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_SECS);

        let mut steps = 0;
        while self.accumulator >= TICK_SECS && steps < MAX_SUBSTEPS {
            self.accumulator -= TICK_SECS;
            steps += 1;
        }
        // Drop the backlog rather than carry it into later frames
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(TICK_SECS);
        }
        steps
    }

    /// Forget accumulated time (after a pause or tab switch)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time_ms = None;
    }

    /// Fraction of the next tick already elapsed
    pub fn alpha(&self) -> f32 {
        self.accumulator / TICK_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_ticks_only() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(0.010), 0);
        assert_eq!(step.advance(0.010), 1);
        assert!(step.alpha() > 0.0 && step.alpha() < 1.0);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(5.0), 6);
        assert!(step.advance(5.0) <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance(-1.0), 0);
        assert_eq!(step.alpha(), 0.0);
    }

    #[test]
    fn test_first_timestamp_runs_one_tick() {
        let mut step = FixedStep::new();
        assert_eq!(step.advance_to(1000.0), 1);
        assert_eq!(step.advance_to(1032.5), 2);
        step.reset();
        assert_eq!(step.advance_to(90_000.0), 1);
    }
}
