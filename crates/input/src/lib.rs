//! Input manager (engine-facing).
//!
//! Two complementary models for the same key stream:
//!
//! - [`HeldKeys`]: continuous "is it down right now" flags sampled each tick
//! - [`ActionBuffer`]: a FIFO of discrete presses consumed exactly once
//!
//! [`KeyMap`] turns `crossterm` key codes into [`crate::types::Action`]s.

pub mod buffer;
pub mod held;
pub mod map;

pub use tui_arcade_types as types;

pub use buffer::ActionBuffer;
pub use held::HeldKeys;
pub use map::{is_back, should_quit, KeyMap};
