//! Fade curves and fade scheduling
//!
//! A fade is `FADE_STEPS` equal gain increments spread over the fade
//! duration. Gain is a pure function of elapsed time; whatever drives the
//! fade only decides when to sample it.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Number of equal increments in every fade
pub const FADE_STEPS: u32 = 20;

/// Fade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeDirection {
    In,
    Out,
}

/// Stepped linear gain ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FadeCurve {
    pub direction: FadeDirection,
    pub from: f32,
    pub to: f32,
    pub duration_ms: u64,
}

impl FadeCurve {
    /// Ramp from silence up to `volume`
    pub fn fade_in(volume: f32, duration_ms: u64) -> Self {
        Self {
            direction: FadeDirection::In,
            from: 0.0,
            to: volume,
            duration_ms,
        }
    }

    /// Ramp from `volume` down to silence
    pub fn fade_out(volume: f32, duration_ms: u64) -> Self {
        Self {
            direction: FadeDirection::Out,
            from: volume,
            to: 0.0,
            duration_ms,
        }
    }

    /// Time between two steps
    pub fn step_duration(&self) -> Duration {
        Duration::from_micros(self.duration_ms * 1000 / u64::from(FADE_STEPS))
    }

    /// Completed steps after `elapsed`, capped at [`FADE_STEPS`]
    pub fn steps_elapsed(&self, elapsed: Duration) -> u32 {
        if self.duration_ms == 0 {
            return FADE_STEPS;
        }
        let total = u128::from(self.duration_ms) * 1000;
        let steps = elapsed.as_micros() * u128::from(FADE_STEPS) / total;
        steps.min(u128::from(FADE_STEPS)) as u32
    }

    /// Gain after `step` increments
    pub fn gain_at_step(&self, step: u32) -> f32 {
        let progress = step.min(FADE_STEPS) as f32 / FADE_STEPS as f32;
        (self.from + (self.to - self.from) * progress).max(0.0)
    }

    /// Gain after `elapsed`
    pub fn gain_at(&self, elapsed: Duration) -> f32 {
        self.gain_at_step(self.steps_elapsed(elapsed))
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        self.steps_elapsed(elapsed) >= FADE_STEPS
    }
}

/// Suspension point between two fade-out steps
pub trait FadeScheduler: Send {
    /// Block until `step` has passed
    fn wait(&mut self, step: Duration);
}

/// Scheduler that only accounts for time, never sleeping
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    waited: Arc<Mutex<Duration>>,
    waits: Arc<Mutex<u32>>,
}

impl VirtualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time waited across all clones
    pub fn total_waited(&self) -> Duration {
        *self.waited.lock()
    }

    /// Number of suspension points hit across all clones
    pub fn wait_count(&self) -> u32 {
        *self.waits.lock()
    }
}

impl FadeScheduler for VirtualScheduler {
    fn wait(&mut self, step: Duration) {
        *self.waited.lock() += step;
        *self.waits.lock() += 1;
    }
}

/// Scheduler that sleeps the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct RealtimeScheduler;

impl FadeScheduler for RealtimeScheduler {
    fn wait(&mut self, step: Duration) {
        std::thread::sleep(step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_steps() {
        let curve = FadeCurve::fade_in(0.8, 2000);
        assert_eq!(curve.step_duration(), Duration::from_millis(100));
        assert_eq!(curve.gain_at(Duration::ZERO), 0.0);
        assert_eq!(curve.gain_at(Duration::from_millis(99)), 0.0);
        assert!((curve.gain_at(Duration::from_millis(1000)) - 0.4).abs() < 1e-6);
        assert_eq!(curve.gain_at(Duration::from_millis(2000)), 0.8);
        assert_eq!(curve.gain_at(Duration::from_secs(60)), 0.8);
        assert!(curve.is_complete(Duration::from_millis(2000)));
        assert!(!curve.is_complete(Duration::from_millis(1999)));
    }

    #[test]
    fn test_fade_out_reaches_zero() {
        let curve = FadeCurve::fade_out(0.7, 1500);
        assert_eq!(curve.gain_at_step(0), 0.7);
        assert_eq!(curve.gain_at_step(FADE_STEPS), 0.0);
        let mut previous = f32::MAX;
        for step in 0..=FADE_STEPS {
            let gain = curve.gain_at_step(step);
            assert!(gain <= previous);
            previous = gain;
        }
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let curve = FadeCurve::fade_in(0.5, 0);
        assert!(curve.is_complete(Duration::ZERO));
        assert_eq!(curve.gain_at(Duration::ZERO), 0.5);
    }

    #[test]
    fn test_virtual_scheduler_shares_totals() {
        let scheduler = VirtualScheduler::new();
        let mut boxed: Box<dyn FadeScheduler> = Box::new(scheduler.clone());
        for _ in 0..FADE_STEPS {
            boxed.wait(Duration::from_millis(75));
        }
        assert_eq!(scheduler.total_waited(), Duration::from_millis(1500));
        assert_eq!(scheduler.wait_count(), 20);
    }
}
