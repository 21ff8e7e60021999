//! Tetris - shared rules for the glyph and pixel variants.
//!
//! Horizontal shifts come from the action queue (one per tick) so fast taps are
//! never lost or doubled; rotation and hard drop run on the press edge; soft
//! drop is the held `Down` flag. Gravity uses a fractional row accumulator.

pub mod bag;
pub mod board;
pub mod pieces;
pub mod scoring;

use std::time::Instant;

use tracing::{debug, info};

use crate::config::TetrisConfig;
use crate::core::{CharGrid, PixelCanvas};
use crate::input::KeyMap;
use crate::module::{GameModule, GameStats, InputBinding, Surface, TickInput, TickOutcome};
use crate::types::{
    Action, ActionButton, ButtonMode, Dpad, GameKind, MobileControls, OverlayDescriptor,
    TetrisVariant,
};

use bag::PieceQueue;
use board::{Board, BOARD_HEIGHT, BOARD_WIDTH};
use pieces::{shape, try_rotate, PieceKind, Rotation, SPAWN_POSITION};
use scoring::{hard_drop_score, line_score};

/// Glyph surface: 10 cells at 2 columns, a gap, then the preview column.
const GLYPH_WIDTH: usize = BOARD_WIDTH as usize * 2 + 12;
const PREVIEW_X: f32 = BOARD_WIDTH as f32 * 2.0 + 2.0;

const FILLED: &str = "[]";
const EMPTY: &str = " .";

const BUTTONS: &[ActionButton] = &[
    ActionButton {
        label: "ROT",
        action: Action::Up,
        mode: ButtonMode::Tap,
    },
    ActionButton {
        label: "SOFT",
        action: Action::Down,
        mode: ButtonMode::Hold,
    },
    ActionButton {
        label: "DROP",
        action: Action::Primary,
        mode: ButtonMode::Tap,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActivePiece {
    fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    fn minos(&self) -> [(i8, i8); 4] {
        shape(self.kind, self.rotation).map(|(dx, dy)| (self.x + dx, self.y + dy))
    }
}

#[derive(Debug, Clone)]
pub struct TetrisGame {
    config: TetrisConfig,
    board: Board,
    queue: PieceQueue,
    active: Option<ActivePiece>,
    next: PieceKind,
    score: u32,
    lines: u32,
    level: u32,
    pieces: u32,
    fall_acc: f32,
}

impl TetrisGame {
    pub fn new(config: TetrisConfig, seed: u32) -> Self {
        let mut queue = PieceQueue::new(seed);
        let next = queue.draw();
        Self {
            config,
            board: Board::new(),
            queue,
            active: None,
            next,
            score: 0,
            lines: 0,
            level: 0,
            pieces: 0,
            fall_acc: 0.0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Take the preview piece as the active one. `false` when it cannot spawn.
    fn spawn(&mut self) -> bool {
        let kind = self.next;
        self.next = self.queue.draw();
        let piece = ActivePiece::spawn(kind);
        if !self.board.fits(&shape(kind, piece.rotation), piece.x, piece.y) {
            self.active = None;
            return false;
        }
        self.active = Some(piece);
        true
    }

    fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        let moved = ActivePiece {
            x: piece.x + dx,
            y: piece.y + dy,
            ..piece
        };
        if self
            .board
            .fits(&shape(moved.kind, moved.rotation), moved.x, moved.y)
        {
            self.active = Some(moved);
            true
        } else {
            false
        }
    }

    fn rotate(&mut self) {
        let Some(piece) = self.active else {
            return;
        };
        let board = &self.board;
        if let Some((rotation, (kx, ky))) =
            try_rotate(piece.kind, piece.rotation, piece.x, piece.y, |x, y| {
                board.is_valid(x, y)
            })
        {
            self.active = Some(ActivePiece {
                rotation,
                x: piece.x + kx,
                y: piece.y + ky,
                ..piece
            });
        }
    }

    /// Rows the active piece can still fall.
    fn drop_distance(&self) -> u32 {
        let Some(piece) = self.active else {
            return 0;
        };
        let s = shape(piece.kind, piece.rotation);
        let mut rows = 0u32;
        while self.board.fits(&s, piece.x, piece.y + rows as i8 + 1) {
            rows += 1;
        }
        rows
    }

    fn hard_drop(&mut self) -> TickOutcome {
        let rows = self.drop_distance();
        if let Some(piece) = self.active.as_mut() {
            piece.y += rows as i8;
        }
        self.score = self.score.saturating_add(hard_drop_score(
            rows,
            self.config.hard_drop_points_per_row,
        ));
        self.lock_and_spawn()
    }

    /// Lock the active piece, clear rows, score, level up, spawn the next piece.
    fn lock_and_spawn(&mut self) -> TickOutcome {
        let Some(piece) = self.active.take() else {
            return TickOutcome::Continue;
        };
        self.board
            .lock_piece(&shape(piece.kind, piece.rotation), piece.x, piece.y, piece.kind);
        self.pieces += 1;
        self.fall_acc = 0.0;

        let cleared = self.board.clear_full_rows();
        if !cleared.is_empty() {
            let n = cleared.len();
            self.score = self.score.saturating_add(line_score(n, self.level));
            self.lines += n as u32;
            let level = self.config.level_for_lines(self.lines);
            debug!(lines = n, total = self.lines, "tetris rows cleared");
            if level != self.level {
                info!(level, "tetris level up");
                self.level = level;
            }
        }

        if self.spawn() {
            TickOutcome::Continue
        } else {
            TickOutcome::Lost
        }
    }

    fn render_glyph(&self, grid: &mut CharGrid) {
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                let glyph = match self.board.get(x, y) {
                    Some(Some(_)) => FILLED,
                    _ => EMPTY,
                };
                grid.draw_text(glyph, x as f32 * 2.0, y as f32);
            }
        }
        if let Some(piece) = self.active {
            for (x, y) in piece.minos() {
                grid.draw_text(FILLED, x as f32 * 2.0, y as f32);
            }
        }

        grid.draw_text("NEXT", PREVIEW_X, 0.0);
        for (dx, dy) in shape(self.next, Rotation::North) {
            // I sits on row 1 of its box; lift it so every preview starts at row 2.
            let lift = if self.next == PieceKind::I { 1 } else { 0 };
            grid.draw_text(
                FILLED,
                PREVIEW_X + dx as f32 * 2.0,
                2.0 + (dy - lift) as f32,
            );
        }
    }

    fn render_pixel(&self, canvas: &mut PixelCanvas) {
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if let Some(Some(kind)) = self.board.get(x, y) {
                    canvas.fill_cell(x as f32, y as f32, kind.color());
                }
            }
        }
        if let Some(piece) = self.active {
            let color = piece.kind.color();
            for (x, y) in piece.minos() {
                canvas.fill_cell(x as f32, y as f32, color);
            }
        }
    }
}

impl GameModule for TetrisGame {
    fn kind(&self) -> GameKind {
        GameKind::Tetris
    }

    fn name(&self) -> &'static str {
        match self.config.variant {
            TetrisVariant::Glyph => "tetris",
            TetrisVariant::Pixel => "tetris-pixel",
        }
    }

    fn binding(&self) -> InputBinding {
        InputBinding {
            held: &[Action::Down],
            buffered: &[Action::Left, Action::Right],
            key_map: KeyMap::for_game(GameKind::Tetris),
        }
    }

    fn mobile_controls(&self) -> MobileControls {
        MobileControls {
            dpad: Dpad::HORIZONTAL,
            dpad_mode: ButtonMode::Tap,
            buttons: BUTTONS,
        }
    }

    fn create_surface(&self) -> Surface {
        match self.config.variant {
            TetrisVariant::Glyph => {
                Surface::Glyph(CharGrid::new(GLYPH_WIDTH, BOARD_HEIGHT as usize))
            }
            TetrisVariant::Pixel => Surface::Pixel(PixelCanvas::new(
                BOARD_WIDTH as usize,
                BOARD_HEIGHT as usize,
                self.config.cell_size,
            )),
        }
    }

    fn reset_game(&mut self) {
        self.board.clear();
        self.active = None;
        self.next = self.queue.draw();
        self.score = 0;
        self.lines = 0;
        self.level = 0;
        self.pieces = 0;
        self.fall_acc = 0.0;
    }

    fn start_game(&mut self, _now: Instant) {
        if self.active.is_none() {
            self.spawn();
        }
    }

    fn on_key_down(&mut self, action: Action, _now: Instant) -> TickOutcome {
        match action {
            Action::Up => {
                self.rotate();
                TickOutcome::Continue
            }
            Action::Primary => self.hard_drop(),
            _ => TickOutcome::Continue,
        }
    }

    fn on_tick(&mut self, delta_time: f32, input: TickInput<'_>) -> TickOutcome {
        if self.active.is_none() && !self.spawn() {
            return TickOutcome::Lost;
        }

        match input.queue.consume_one() {
            Some(Action::Left) => {
                self.try_move(-1, 0);
            }
            Some(Action::Right) => {
                self.try_move(1, 0);
            }
            _ => {}
        }

        let mut rows_per_sec = self.config.fall_speed(self.level);
        if input.held.is_held(Action::Down) {
            rows_per_sec *= self.config.soft_drop_factor;
        }
        self.fall_acc += delta_time * rows_per_sec / 60.0;

        while self.fall_acc >= 1.0 {
            self.fall_acc -= 1.0;
            if !self.try_move(0, 1) {
                return self.lock_and_spawn();
            }
        }
        TickOutcome::Continue
    }

    fn render(&self, surface: &mut Surface) {
        match surface {
            Surface::Glyph(grid) => self.render_glyph(grid),
            Surface::Pixel(canvas) => self.render_pixel(canvas),
        }
    }

    fn overlay(&self) -> OverlayDescriptor {
        OverlayDescriptor {
            title: match self.config.variant {
                TetrisVariant::Glyph => "TETRIS",
                TetrisVariant::Pixel => "PIXEL TETRIS",
            },
            instructions: &[
                "Left/Right: move",
                "Up/X: rotate",
                "Down: soft drop",
                "Space: hard drop",
            ],
            subtitle: Some("Clear lines to level up"),
            lost_title: Some("TOPPED OUT"),
            lost_message: Some(format!("{} lines, level {}", self.lines, self.level)),
            lost_stats: self.stats().lines(),
        }
    }

    fn stats(&self) -> GameStats {
        GameStats::new(self.score)
            .with("lines", self.lines)
            .with("level", self.level)
            .with("pieces", self.pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ActionBuffer, HeldKeys};
    use proptest::prelude::*;

    fn game() -> TetrisGame {
        let mut g = TetrisGame::new(TetrisConfig::default(), 7);
        g.reset_game();
        g.start_game(Instant::now());
        g
    }

    fn fill_row(board: &mut Board, y: i8, except: Option<i8>) {
        for x in 0..BOARD_WIDTH as i8 {
            if Some(x) != except {
                board.set(x, y, Some(PieceKind::O));
            }
        }
    }

    fn tick(
        g: &mut TetrisGame,
        dt: f32,
        held: &HeldKeys,
        queue: &mut ActionBuffer,
    ) -> TickOutcome {
        g.on_tick(dt, TickInput { held, queue })
    }

    #[test]
    fn test_start_spawns_at_top() {
        let g = game();
        let piece = g.active().expect("piece spawned");
        assert_eq!((piece.x, piece.y), SPAWN_POSITION);
        assert_eq!(piece.rotation, Rotation::North);
    }

    #[test]
    fn test_one_buffered_shift_per_tick() {
        let mut g = game();
        let held = HeldKeys::default();
        let mut queue = ActionBuffer::new(&[Action::Left, Action::Right]);
        queue.push_key(Action::Left);
        queue.push_key(Action::Left);

        let x0 = g.active().map(|p| p.x).unwrap_or_default();
        tick(&mut g, 0.0, &held, &mut queue);
        assert_eq!(g.active().map(|p| p.x), Some(x0 - 1));
        assert_eq!(queue.len(), 1);
        tick(&mut g, 0.0, &held, &mut queue);
        assert_eq!(g.active().map(|p| p.x), Some(x0 - 2));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_gravity_accumulates_fractional_rows() {
        let mut g = game();
        let held = HeldKeys::default();
        let mut queue = ActionBuffer::default();
        // Level 0 falls one row per second.
        for _ in 0..59 {
            tick(&mut g, 1.0, &held, &mut queue);
        }
        assert_eq!(g.active().map(|p| p.y), Some(0));
        tick(&mut g, 1.0, &held, &mut queue);
        tick(&mut g, 1.0, &held, &mut queue);
        assert_eq!(g.active().map(|p| p.y), Some(1));
    }

    #[test]
    fn test_soft_drop_multiplies_fall_speed() {
        let mut g = game();
        let mut held = HeldKeys::track(&[Action::Down]).with_release_timeout_ms(0);
        held.press(Action::Down, Instant::now());
        let mut queue = ActionBuffer::default();
        for _ in 0..7 {
            tick(&mut g, 1.0, &held, &mut queue);
        }
        assert_eq!(g.active().map(|p| p.y), Some(1));
    }

    #[test]
    fn test_hard_drop_locks_and_scores_per_row() {
        let mut g = game();
        let rows = g.drop_distance();
        assert!(rows > 0);
        let outcome = g.on_key_down(Action::Primary, Instant::now());
        assert_eq!(outcome, TickOutcome::Continue);
        assert_eq!(g.score(), rows * 2);
        assert_eq!(g.board().filled(), 4);
        assert!(g.active().is_some());
    }

    #[test]
    fn test_rotation_on_key_down() {
        let mut g = game();
        g.on_key_down(Action::Up, Instant::now());
        assert_eq!(g.active().map(|p| p.rotation), Some(Rotation::East));
    }

    #[test]
    fn test_blocked_spawn_loses() {
        let mut g = game();
        for y in 0..BOARD_HEIGHT as i8 {
            fill_row(&mut g.board, y, Some((y % 2) * 9));
        }
        g.active = None;
        let held = HeldKeys::default();
        let mut queue = ActionBuffer::default();
        assert_eq!(tick(&mut g, 1.0, &held, &mut queue), TickOutcome::Lost);
    }

    #[test]
    fn test_level_up_after_ten_lines() {
        let mut g = game();
        g.lines = 9;
        fill_row(&mut g.board, 19, None);
        g.active = Some(ActivePiece {
            kind: PieceKind::O,
            rotation: Rotation::North,
            x: 0,
            y: 0,
        });
        g.lock_and_spawn();
        assert_eq!(g.lines(), 10);
        assert_eq!(g.level(), 1);
        assert_eq!(g.score(), 40);
    }

    #[test]
    fn test_renders_board_and_preview() {
        let g = game();
        let mut surface = g.create_surface();
        g.render(&mut surface);
        let grid = surface.as_glyph().expect("glyph surface");
        assert_eq!(grid.width(), GLYPH_WIDTH);
        let frame = grid.render();
        assert!(frame.contains("NEXT"));
        assert!(frame.contains("[]"));
        assert!(frame.contains(" ."));
    }

    #[test]
    fn test_pixel_variant_draws_colors() {
        let mut g = TetrisGame::new(TetrisConfig::pixel(), 3);
        g.reset_game();
        g.start_game(Instant::now());
        let mut surface = g.create_surface();
        g.render(&mut surface);
        let canvas = surface.as_pixel().expect("pixel surface");
        assert_eq!((canvas.width_px(), canvas.height_px()), (20, 40));
        let piece = g.active().expect("piece");
        let (x, y) = piece.minos()[0];
        assert_eq!(
            canvas.pixel(x as usize * 2, y as usize * 2),
            Some(piece.kind.color())
        );
    }

    fn any_kind() -> impl Strategy<Value = PieceKind> {
        (0usize..7).prop_map(|i| PieceKind::ALL[i])
    }

    proptest! {
        #[test]
        fn placing_a_piece_over_one_full_row_clears_exactly_it(
            kind in any_kind(),
            turns in 0usize..4,
            x in -1i8..9,
        ) {
            let mut g = game();
            fill_row(&mut g.board, 19, None);

            let mut rotation = Rotation::North;
            for _ in 0..turns {
                rotation = rotation.rotate_cw();
            }
            let s = shape(kind, rotation);
            prop_assume!(g.board.fits(&s, x, 0));

            let mut y = 0;
            while g.board.fits(&s, x, y + 1) {
                y += 1;
            }
            g.active = Some(ActivePiece { kind, rotation, x, y });
            let before = g.score();

            g.lock_and_spawn();

            prop_assert_eq!(g.lines(), 1);
            prop_assert_eq!(g.score() - before, line_score(1, 0));
            prop_assert_eq!(g.board().height(), BOARD_HEIGHT);
            prop_assert_eq!(g.board().filled(), 4);
            prop_assert!((0..BOARD_WIDTH as i8).all(|cx| g.board().get(cx, 0) == Some(None)));
        }
    }
}
