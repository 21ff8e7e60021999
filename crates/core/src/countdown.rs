//! Real-time countdown used between "start" and the first playing tick.
//!
//! Runs on wall-clock seconds, independent of the frame clock. Completion is
//! reported exactly once; cancelling or restarting discards a pending one.

use std::time::{Duration, Instant};

const STEP: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownState {
    #[default]
    Idle,
    Counting(u32),
    Fired,
}

#[derive(Debug, Clone, Default)]
pub struct Countdown {
    state: CountdownState,
    next_at: Option<Instant>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    /// Seconds left while counting.
    pub fn remaining(&self) -> Option<u32> {
        match self.state {
            CountdownState::Counting(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_counting(&self) -> bool {
        matches!(self.state, CountdownState::Counting(_))
    }

    /// Begin counting down from `from`; replaces any countdown in progress.
    ///
    /// `from == 0` completes on the next poll.
    pub fn start(&mut self, from: u32, now: Instant) {
        self.state = CountdownState::Counting(from);
        self.next_at = Some(if from == 0 { now } else { now + STEP });
    }

    /// Return to idle without completing.
    pub fn cancel(&mut self) {
        self.state = CountdownState::Idle;
        self.next_at = None;
    }

    /// Advance to `now`. Returns `true` on the single poll that completes the countdown.
    pub fn poll(&mut self, now: Instant) -> bool {
        loop {
            match (self.state, self.next_at) {
                (CountdownState::Counting(0), _) => {
                    self.state = CountdownState::Fired;
                    self.next_at = None;
                    return true;
                }
                (CountdownState::Counting(n), Some(at)) if now >= at => {
                    self.state = CountdownState::Counting(n - 1);
                    self.next_at = if n - 1 == 0 { Some(at) } else { Some(at + STEP) };
                }
                _ => return false,
            }
        }
    }
}
