//! Held-key tracking for continuous input.
//!
//! Each logical action has a "currently held" flag that the active game samples
//! inside its tick. Key handlers write, the tick reads; last write wins.
//!
//! Supports terminals that do not emit key release events by using a timeout:
//! a flag that is not refreshed (press or auto-repeat) within the window is
//! released on the next [`HeldKeys::expire`].

use std::time::{Duration, Instant};

use crate::types::{Action, DEFAULT_KEY_RELEASE_TIMEOUT_MS};

#[derive(Debug, Clone)]
pub struct HeldKeys {
    tracked: [bool; Action::COUNT],
    held: [bool; Action::COUNT],
    last_seen: [Option<Instant>; Action::COUNT],
    release_timeout: Option<Duration>,
}

impl HeldKeys {
    /// Track the given actions as held flags.
    pub fn track(actions: &[Action]) -> Self {
        let mut tracked = [false; Action::COUNT];
        for a in actions {
            tracked[a.index()] = true;
        }
        Self {
            tracked,
            held: [false; Action::COUNT],
            last_seen: [None; Action::COUNT],
            release_timeout: Some(Duration::from_millis(
                DEFAULT_KEY_RELEASE_TIMEOUT_MS as u64,
            )),
        }
    }

    /// Auto-release window in milliseconds; `0` disables auto-release.
    pub fn with_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.release_timeout = if timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(timeout_ms as u64))
        };
        self
    }

    pub fn is_tracked(&self, action: Action) -> bool {
        self.tracked[action.index()]
    }

    /// Physical press. Returns `true` on the press edge (the key was not held).
    ///
    /// Edges are reported for every action, tracked or not, so one-shot
    /// handlers fire once per press regardless of held duration.
    pub fn press(&mut self, action: Action, now: Instant) -> bool {
        let i = action.index();
        let edge = !self.held[i];
        self.held[i] = true;
        self.last_seen[i] = Some(now);
        edge
    }

    /// Auto-repeat: keep the flag alive without producing an edge.
    pub fn refresh(&mut self, action: Action, now: Instant) {
        let i = action.index();
        self.held[i] = true;
        self.last_seen[i] = Some(now);
    }

    pub fn release(&mut self, action: Action) {
        let i = action.index();
        self.held[i] = false;
        self.last_seen[i] = None;
    }

    /// Release flags not refreshed within the timeout.
    pub fn expire(&mut self, now: Instant) {
        let Some(timeout) = self.release_timeout else {
            return;
        };
        for i in 0..Action::COUNT {
            if !self.held[i] {
                continue;
            }
            let stale = self.last_seen[i]
                .map(|t| now.saturating_duration_since(t) > timeout)
                .unwrap_or(true);
            if stale {
                self.held[i] = false;
                self.last_seen[i] = None;
            }
        }
    }

    /// Drop every flag (round reset).
    pub fn clear(&mut self) {
        self.held = [false; Action::COUNT];
        self.last_seen = [None; Action::COUNT];
    }

    /// Whether a tracked action is currently held.
    pub fn is_held(&self, action: Action) -> bool {
        let i = action.index();
        self.tracked[i] && self.held[i]
    }

    /// Horizontal axis from `Left`/`Right`: -1, 0 or 1.
    ///
    /// With both held, the most recently pressed one wins.
    pub fn axis_x(&self) -> i8 {
        let left = self.is_held(Action::Left);
        let right = self.is_held(Action::Right);
        match (left, right) {
            (true, false) => -1,
            (false, true) => 1,
            (true, true) => {
                let l = self.last_seen[Action::Left.index()];
                let r = self.last_seen[Action::Right.index()];
                if r >= l {
                    1
                } else {
                    -1
                }
            }
            (false, false) => 0,
        }
    }
}

impl Default for HeldKeys {
    fn default() -> Self {
        Self::track(&Action::ALL)
    }
}
