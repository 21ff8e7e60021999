//! Terminal presentation layer for the arcade.
//!
//! A small, game-oriented rendering layer: game surfaces and the layout shell
//! render into a plain framebuffer of styled cells, which the renderer diffs
//! and flushes to the terminal. No widget toolkit is involved.
//!
//! - [`fb`]: framebuffer and cell styles
//! - [`present`]: glyph and half-block pixel presenters for game surfaces
//! - [`shell`]: [`ArcadeView`], the frame, side panel, overlays and touch strip
//! - [`picker`]: game selection state
//! - [`renderer`]: terminal session and diff flushing
//! - [`render_throttle`]: redraw pacing for static screens

pub mod fb;
pub mod picker;
pub mod present;
pub mod render_throttle;
pub mod renderer;
pub mod shell;

pub use tui_arcade_core as core;
pub use tui_arcade_engine as engine;
pub use tui_arcade_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer};
pub use picker::Picker;
pub use render_throttle::RenderThrottle;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use shell::{ArcadeView, ControlHit, Viewport};
