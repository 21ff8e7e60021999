//! Engine primitives - pure, deterministic, and testable
//!
//! This crate contains the building blocks every arcade game shares.
//! It has no terminal or I/O dependencies:
//!
//! - **Deterministic**: time is always passed in (`Instant`), randomness is seeded
//! - **Testable**: every primitive can be driven from a unit test
//! - **Allocation-aware**: buffers are created once and reused every frame
//!
//! # Module Structure
//!
//! - [`grid`]: glyph cell buffer and sprite stencils (text adapter)
//! - [`canvas`]: persistent pixel buffer and 0/1 patterns (pixel adapter)
//! - [`collision`]: integer-cell AABB overlap test
//! - [`clock`]: frame scheduler producing normalized `delta_time`
//! - [`countdown`]: 1 Hz real-time countdown
//! - [`timers`]: real-time one-shot and interval timers
//! - [`rng`]: small seeded LCG
//!
//! # Example
//!
//! ```
//! use tui_arcade_core::{overlaps, CharGrid, Rect, SpritePattern};
//!
//! const SHIP: SpritePattern = SpritePattern::new(&["/^\\"]);
//!
//! let mut grid = CharGrid::new(5, 2);
//! grid.draw_sprite(&SHIP, 1.7, 0.2);
//! assert_eq!(grid.render(), " /^\\ \n     ");
//!
//! let a = Rect::new(0.0, 0.0, 2.0, 2.0);
//! let b = Rect::new(1.9, 1.9, 2.0, 2.0);
//! assert!(overlaps(&a, &b));
//! ```

pub mod canvas;
pub mod clock;
pub mod collision;
pub mod countdown;
pub mod grid;
pub mod rng;
pub mod timers;

pub use tui_arcade_types as types;

pub use canvas::{PixelCanvas, PixelPattern};
pub use clock::FrameClock;
pub use collision::{overlaps, Rect};
pub use countdown::{Countdown, CountdownState};
pub use grid::{CharGrid, SpritePattern, BLANK};
pub use rng::SimpleRng;
pub use timers::Timers;

/// Replace NaN and infinities with zero before they reach physics or rendering.
#[inline]
pub fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
