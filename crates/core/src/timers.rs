//! Real-time timers owned by a game instance.
//!
//! Spawners and expiry timers run on wall-clock time, decoupled from the frame
//! clock. A game keeps one `Timers<K>` keyed by its own small enum, polls it once
//! per refresh while playing, and clears it on reset. Dropping the owner drops
//! every pending timer with it, so nothing outlives the game instance.

use std::time::{Duration, Instant};

use arrayvec::ArrayVec;

/// Maximum live timers per game.
pub const MAX_TIMERS: usize = 8;

#[derive(Debug, Clone, Copy)]
struct TimerEntry<K> {
    key: K,
    due: Instant,
    period: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct Timers<K: Copy + Eq> {
    entries: ArrayVec<TimerEntry<K>, MAX_TIMERS>,
}

impl<K: Copy + Eq> Timers<K> {
    pub fn new() -> Self {
        Self {
            entries: ArrayVec::new(),
        }
    }

    fn insert(&mut self, entry: TimerEntry<K>) -> bool {
        self.cancel(entry.key);
        self.entries.try_push(entry).is_ok()
    }

    /// Fire `key` once after `delay`. Replaces an existing timer with the same key.
    ///
    /// Returns `false` if the timer table is full.
    pub fn schedule_once(&mut self, key: K, delay: Duration, now: Instant) -> bool {
        self.insert(TimerEntry {
            key,
            due: now + delay,
            period: None,
        })
    }

    /// Fire `key` every `period`. Replaces an existing timer with the same key.
    pub fn schedule_every(&mut self, key: K, period: Duration, now: Instant) -> bool {
        self.insert(TimerEntry {
            key,
            due: now + period,
            period: Some(period),
        })
    }

    pub fn cancel(&mut self, key: K) {
        self.entries.retain(|e| e.key != key);
    }

    /// Cancel every timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, key: K) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect the keys due at `now`.
    ///
    /// One-shot timers are removed; interval timers fire at most once per poll
    /// and re-arm one period after `now` when they fell behind.
    pub fn poll(&mut self, now: Instant) -> ArrayVec<K, MAX_TIMERS> {
        let mut fired = ArrayVec::new();
        self.entries.retain(|e| {
            if now < e.due {
                return true;
            }
            fired.push(e.key);
            match e.period {
                Some(p) if !p.is_zero() => {
                    let next = e.due + p;
                    e.due = if next <= now { now + p } else { next };
                    true
                }
                _ => false,
            }
        });
        fired
    }
}

impl<K: Copy + Eq> Default for Timers<K> {
    fn default() -> Self {
        Self::new()
    }
}
