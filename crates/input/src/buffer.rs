//! Buffered input - discrete actions delivered exactly once.
//!
//! Every qualifying press is appended to a FIFO; the game drains it with
//! [`ActionBuffer::consume_one`] at its own pace. Nothing is dropped when the
//! consumer lags several ticks behind the keyboard.

use std::collections::VecDeque;

use crate::types::Action;

#[derive(Debug, Clone)]
pub struct ActionBuffer {
    queue: VecDeque<Action>,
    accepts: [bool; Action::COUNT],
    enabled: bool,
}

impl ActionBuffer {
    /// Buffer presses of the given actions.
    pub fn new(accepts: &[Action]) -> Self {
        let mut table = [false; Action::COUNT];
        for a in accepts {
            table[a.index()] = true;
        }
        Self {
            queue: VecDeque::with_capacity(16),
            accepts: table,
            enabled: true,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn accepts(&self, action: Action) -> bool {
        self.accepts[action.index()]
    }

    /// Key handler entry point: enqueue if enabled and the action is buffered.
    pub fn push_key(&mut self, action: Action) -> bool {
        if !self.enabled || !self.accepts(action) {
            return false;
        }
        self.queue.push_back(action);
        true
    }

    /// Enqueue unconditionally (touch buttons, scripted input).
    pub fn add_action(&mut self, action: Action) {
        self.queue.push_back(action);
    }

    /// Pop the oldest pending action.
    pub fn consume_one(&mut self) -> Option<Action> {
        self.queue.pop_front()
    }

    /// Discard pending actions (round reset).
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for ActionBuffer {
    fn default() -> Self {
        Self::new(&[])
    }
}
