//! Core types module - shared data structures and constants
//!
//! This crate defines the fundamental types used throughout the arcade.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine primitives, game modules, terminal rendering).
//!
//! # Reference frame
//!
//! Every per-tick speed in the engine is expressed relative to one frame at 60 Hz.
//! A tick carries a `delta_time` multiplier where `1.0` means exactly one
//! reference frame elapsed (`delta_time = elapsed_ms / REFERENCE_FRAME_MS`).
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `REFERENCE_FRAME_MS` | 16.667 | One frame at 60 Hz |
//! | `DEFAULT_MAX_DELTA` | 3.0 | Per-tick clamp for `delta_time` |
//! | `DEFAULT_COUNTDOWN_SECS` | 3 | Countdown before a round starts |
//! | `DEFAULT_KEY_RELEASE_TIMEOUT_MS` | 150 | Auto-release for terminals without release events |
//!
//! # Examples
//!
//! ```
//! use tui_arcade_types::{Action, GameKind, GamePhase};
//!
//! assert_eq!(Action::from_str("left"), Some(Action::Left));
//! assert_eq!(GameKind::from_str("SNAKE"), Some(GameKind::Snake));
//! assert_eq!(GamePhase::Ready.as_str(), "ready");
//! ```

/// Duration of one 60 Hz reference frame in milliseconds.
pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;

/// Largest `delta_time` delivered in a single tick (three reference frames).
pub const DEFAULT_MAX_DELTA: f32 = 3.0;

/// Countdown length before a round enters the playing phase.
pub const DEFAULT_COUNTDOWN_SECS: u32 = 3;

/// Held keys without a refresh inside this window are released.
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Convert real elapsed milliseconds into reference frames.
#[inline]
pub fn ms_to_frames(ms: f32) -> f32 {
    ms / REFERENCE_FRAME_MS
}

/// Convert reference frames back into milliseconds.
#[inline]
pub fn frames_to_ms(frames: f32) -> f32 {
    frames * REFERENCE_FRAME_MS
}

/// Logical input actions.
///
/// Physical keys and touch buttons are mapped onto these; games never see
/// raw key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    /// The game's main button (fire, jump, hard drop).
    Primary,
    /// Start a round from the ready/lost screens.
    Start,
}

impl Action {
    /// Number of distinct actions (size of per-action tables).
    pub const COUNT: usize = 6;

    /// All actions in table order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::Left,
        Action::Right,
        Action::Up,
        Action::Down,
        Action::Primary,
        Action::Start,
    ];

    /// Dense index for per-action tables.
    #[inline(always)]
    pub fn index(self) -> usize {
        match self {
            Action::Left => 0,
            Action::Right => 1,
            Action::Up => 2,
            Action::Down => 3,
            Action::Primary => 4,
            Action::Start => 5,
        }
    }

    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_arcade_types::Action;
    ///
    /// assert_eq!(Action::from_str("Action"), Some(Action::Primary));
    /// assert_eq!(Action::from_str("up"), Some(Action::Up));
    /// assert_eq!(Action::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(Action::Left),
            "right" => Some(Action::Right),
            "up" => Some(Action::Up),
            "down" => Some(Action::Down),
            "action" | "primary" => Some(Action::Primary),
            "start" => Some(Action::Start),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::Primary => "action",
            Action::Start => "start",
        }
    }

    /// The action pointing the opposite way, for directional actions.
    pub fn opposite(self) -> Option<Action> {
        match self {
            Action::Left => Some(Action::Right),
            Action::Right => Some(Action::Left),
            Action::Up => Some(Action::Down),
            Action::Down => Some(Action::Up),
            Action::Primary | Action::Start => None,
        }
    }
}

/// Phase of a game's state machine.
///
/// `Ready -> Countdown -> Playing -> Lost -> Countdown -> ...`
///
/// Only `Playing` receives scheduler ticks; the rest are presentational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Ready,
    Countdown,
    Playing,
    Lost,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Countdown => "countdown",
            GamePhase::Playing => "playing",
            GamePhase::Lost => "lost",
        }
    }

    /// Whether a start request is accepted in this phase.
    pub fn can_start(&self) -> bool {
        matches!(self, GamePhase::Ready | GamePhase::Lost)
    }
}

/// The family a game module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Shooter,
    Runner,
    Snake,
    Tetris,
}

impl GameKind {
    /// Parse game kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shooter" | "invaders" => Some(GameKind::Shooter),
            "runner" => Some(GameKind::Runner),
            "snake" => Some(GameKind::Snake),
            "tetris" => Some(GameKind::Tetris),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Shooter => "shooter",
            GameKind::Runner => "runner",
            GameKind::Snake => "snake",
            GameKind::Tetris => "tetris",
        }
    }
}

/// Render variant for the two tetris games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TetrisVariant {
    /// Monospace glyph board.
    #[default]
    Glyph,
    /// Pixel canvas board.
    Pixel,
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// How a touch button writes into the input manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonMode {
    /// Held while pressed (writes the held-key map).
    Hold,
    /// One-shot press (runs the key-down path once).
    Tap,
}

/// A labelled touch button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionButton {
    pub label: &'static str,
    pub action: Action,
    pub mode: ButtonMode,
}

/// Which d-pad arrows a game shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dpad {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Dpad {
    pub const NONE: Dpad = Dpad {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub const ALL: Dpad = Dpad {
        up: true,
        down: true,
        left: true,
        right: true,
    };

    pub const HORIZONTAL: Dpad = Dpad {
        up: false,
        down: false,
        left: true,
        right: true,
    };
}

/// Touch controls a game asks the layout shell to surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MobileControls {
    pub dpad: Dpad,
    /// How the d-pad writes input (held for movement, tap for discrete turns).
    pub dpad_mode: ButtonMode,
    pub buttons: &'static [ActionButton],
}

/// Text the layout shell shows for the non-playing phases.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayDescriptor {
    pub title: &'static str,
    pub instructions: &'static [&'static str],
    pub subtitle: Option<&'static str>,
    pub lost_title: Option<&'static str>,
    pub lost_message: Option<String>,
    pub lost_stats: Vec<String>,
}
