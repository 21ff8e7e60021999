//! Frame scheduler.
//!
//! Converts real elapsed time between display refreshes into a normalized
//! `delta_time` (1.0 == one 60 Hz frame). While the consumer is inactive no
//! callback runs and elapsed time is dropped, so resuming never replays a
//! backlog.

use std::time::Instant;

use crate::types::{ms_to_frames, DEFAULT_MAX_DELTA};

#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    max_delta: f32,
    ticks: u64,
}

impl FrameClock {
    /// `max_delta` caps a single tick; values `<= 0` or non-finite disable the cap.
    pub fn new(max_delta: f32) -> Self {
        Self {
            last: None,
            max_delta,
            ticks: 0,
        }
    }

    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    /// Number of ticks delivered since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Forget the previous timestamp; the next active frame starts a new baseline.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Advance to `now`.
    ///
    /// Returns the tick's `delta_time` when `active` and a baseline exists.
    /// The first active frame after inactivity only records the baseline.
    pub fn advance(&mut self, now: Instant, active: bool) -> Option<f32> {
        if !active {
            self.last = None;
            return None;
        }

        let last = self.last.replace(now)?;

        let elapsed_ms = now.saturating_duration_since(last).as_secs_f32() * 1000.0;
        let mut dt = ms_to_frames(elapsed_ms);
        if self.max_delta.is_finite() && self.max_delta > 0.0 {
            dt = dt.min(self.max_delta);
        }
        self.ticks = self.ticks.wrapping_add(1);
        Some(dt)
    }

    /// Invoke `callback(delta_time)` for this refresh if the consumer is active.
    ///
    /// Returns whether the callback ran.
    pub fn run_loop(&mut self, now: Instant, active: bool, callback: impl FnOnce(f32)) -> bool {
        match self.advance(now, active) {
            Some(dt) => {
                callback(dt);
                true
            }
            None => false,
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DELTA)
    }
}
