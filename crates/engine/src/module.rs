//! Game module capability set.
//!
//! Every game implements [`GameModule`]. The [`crate::GameSession`] owns the
//! phase machine, input state and clocks; a module only owns its entities,
//! scoring and difficulty ramp and is driven once per tick while playing.

use std::fmt;
use std::time::Instant;

use arrayvec::ArrayVec;

use crate::core::{CharGrid, PixelCanvas};
use crate::input::{ActionBuffer, HeldKeys, KeyMap};
use crate::types::{Action, GameKind, MobileControls, OverlayDescriptor};

/// Render target a module draws into.
///
/// Created once per session by [`GameModule::create_surface`]; its dimensions
/// never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Surface {
    Glyph(CharGrid),
    Pixel(PixelCanvas),
}

impl Surface {
    pub fn clear(&mut self) {
        match self {
            Surface::Glyph(grid) => grid.clear(),
            Surface::Pixel(canvas) => canvas.clear(),
        }
    }

    pub fn as_glyph(&self) -> Option<&CharGrid> {
        match self {
            Surface::Glyph(grid) => Some(grid),
            Surface::Pixel(_) => None,
        }
    }

    pub fn as_pixel(&self) -> Option<&PixelCanvas> {
        match self {
            Surface::Pixel(canvas) => Some(canvas),
            Surface::Glyph(_) => None,
        }
    }

    /// Size in terminal cells once presented (pixels pack two rows per cell).
    pub fn terminal_size(&self) -> (u16, u16) {
        match self {
            Surface::Glyph(grid) => (grid.width() as u16, grid.height() as u16),
            Surface::Pixel(canvas) => (
                canvas.width_px() as u16,
                canvas.height_px().div_ceil(2) as u16,
            ),
        }
    }
}

/// Which actions a module listens for and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputBinding {
    /// Sampled every tick from the held-key map.
    pub held: &'static [Action],
    /// Delivered exactly once through the action queue.
    pub buffered: &'static [Action],
    pub key_map: KeyMap,
}

/// Input view handed to a tick.
pub struct TickInput<'a> {
    pub held: &'a HeldKeys,
    pub queue: &'a mut ActionBuffer,
}

/// What a tick or one-shot handler reports back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Lost,
}

impl TickOutcome {
    pub fn is_lost(self) -> bool {
        self == TickOutcome::Lost
    }
}

/// Maximum number of stat lines a game reports.
pub const MAX_STATS: usize = 6;

/// Score plus labelled counters shown in the side panel and the result log.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameStats {
    pub score: u32,
    pub entries: ArrayVec<(&'static str, u32), MAX_STATS>,
}

impl GameStats {
    pub fn new(score: u32) -> Self {
        Self {
            score,
            entries: ArrayVec::new(),
        }
    }

    /// Append a stat line; extra lines beyond capacity are dropped.
    pub fn with(mut self, label: &'static str, value: u32) -> Self {
        let _ = self.entries.try_push((label, value));
        self
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(l, _)| *l == label)
            .map(|&(_, v)| v)
    }

    /// `label value` lines for the overlay.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.entries.len() + 1);
        out.push(format!("score {}", self.score));
        for (label, value) in &self.entries {
            out.push(format!("{label} {value}"));
        }
        out
    }
}

/// Payload passed to the completion callback when a round ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub kind: GameKind,
    pub name: &'static str,
    pub score: u32,
    pub stats: GameStats,
    pub duration_ms: u64,
}

/// Shared capability set of the five games.
pub trait GameModule {
    fn kind(&self) -> GameKind;

    /// Stable short name (`tetris-pixel`, `snake`, ...).
    fn name(&self) -> &'static str;

    fn binding(&self) -> InputBinding;

    fn mobile_controls(&self) -> MobileControls;

    /// Allocate the render surface; called once per session.
    fn create_surface(&self) -> Surface;

    /// Rebuild entities for a fresh round and cancel every timer.
    fn reset_game(&mut self);

    /// Countdown finished; arm real-time timers relative to `now`.
    fn start_game(&mut self, now: Instant);

    /// One-shot handler, called once per physical press while playing.
    fn on_key_down(&mut self, _action: Action, _now: Instant) -> TickOutcome {
        TickOutcome::Continue
    }

    /// Fire due real-time timers (spawners, expiry).
    fn poll_timers(&mut self, _now: Instant) {}

    fn on_tick(&mut self, delta_time: f32, input: TickInput<'_>) -> TickOutcome;

    /// Draw the current state; must not mutate simulation state.
    fn render(&self, surface: &mut Surface);

    fn overlay(&self) -> OverlayDescriptor;

    fn stats(&self) -> GameStats;
}

impl fmt::Debug for dyn GameModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameModule")
            .field("name", &self.name())
            .finish()
    }
}
