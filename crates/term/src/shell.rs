//! ArcadeView: the layout shell around a mounted game.
//!
//! Pure (no I/O). Draws the bordered play surface, a side panel with stats,
//! the per-phase overlay and the touch control strip into a framebuffer, and
//! remembers where the clickable parts landed for mouse hit testing.

use arrayvec::ArrayVec;

use crate::engine::{GameSession, GameStats};
use crate::fb::{text_width, CellStyle, FrameBuffer, INK, PAPER, PLAYFIELD};
use crate::picker::Picker;
use crate::present::present_surface;
use crate::types::{Action, ButtonMode, GamePhase, OverlayDescriptor, Rgb};

const PANEL_W: u16 = 22;
const PANEL_GAP: u16 = 2;
pub const MAX_CONTROLS: usize = 12;

const BORDER: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), PAPER);
const LABEL: CellStyle = CellStyle::new(INK, PAPER).bold();
const VALUE: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), PAPER);
const HINT: CellStyle = CellStyle::new(Rgb::new(140, 140, 150), PAPER);
const ACCENT: CellStyle = CellStyle::new(Rgb::new(250, 210, 90), PAPER).bold();
const BUTTON: CellStyle = CellStyle::new(INK, Rgb::new(45, 45, 60));
const BUTTON_DOWN: CellStyle = CellStyle::new(PAPER, Rgb::new(250, 210, 90)).bold();

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// A clickable touch button as laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlHit {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub action: Action,
    pub mode: ButtonMode,
}

impl ControlHit {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        row == self.y && col >= self.x && col < self.x.saturating_add(self.w)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PickerRows {
    x: u16,
    y: u16,
    w: u16,
    count: u16,
}

#[derive(Debug, Default)]
pub struct ArcadeView {
    controls: ArrayVec<ControlHit, MAX_CONTROLS>,
    picker_rows: PickerRows,
}

impl ArcadeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Touch button under the pointer from the last session frame.
    pub fn hit_control(&self, col: u16, row: u16) -> Option<ControlHit> {
        self.controls.iter().copied().find(|c| c.contains(col, row))
    }

    pub fn controls(&self) -> &[ControlHit] {
        &self.controls
    }

    /// Picker entry under the pointer from the last picker frame.
    pub fn hit_picker(&self, col: u16, row: u16) -> Option<usize> {
        let r = self.picker_rows;
        if col < r.x || col >= r.x.saturating_add(r.w) || row < r.y {
            return None;
        }
        let i = row - r.y;
        (i < r.count).then_some(i as usize)
    }

    pub fn render_picker(&mut self, picker: &Picker, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));
        self.controls.clear();

        let games = picker.games();
        let w: u16 = 34;
        let h = games.len() as u16 + 8;
        let x = viewport.width.saturating_sub(w) / 2;
        let y = viewport.height.saturating_sub(h) / 2;

        fb.draw_box(x, y, w, h, BORDER);
        fb.put_str_centered(x, y, w, " ARCADE ", ACCENT);
        fb.put_str_centered(x, y + 2, w, "Pick a game", LABEL);

        let list_y = y + 4;
        for (i, game) in games.iter().enumerate() {
            let row = list_y + i as u16;
            let style = if i == picker.selected() {
                BUTTON_DOWN
            } else {
                VALUE
            };
            fb.fill_rect(x + 2, row, w - 4, 1, ' ', style);
            let after = fb.put_u32(x + 3, row, i as u32 + 1, style);
            fb.put_str(after + 2, row, game.title(), style);
        }
        self.picker_rows = PickerRows {
            x: x + 2,
            y: list_y,
            w: w.saturating_sub(4),
            count: games.len() as u16,
        };

        fb.put_str_centered(x, y + h - 3, w, "1-5 / arrows + enter", HINT);
        fb.put_str_centered(x, y + h - 2, w, "q quits", HINT);
    }

    pub fn render_session(
        &mut self,
        session: &GameSession,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));
        self.picker_rows = PickerRows::default();

        let (sw, sh) = session.surface().terminal_size();
        let frame_w = sw.saturating_add(2);
        let frame_h = sh.saturating_add(2);
        let with_panel = frame_w + PANEL_GAP + PANEL_W <= viewport.width;
        let total_w = if with_panel {
            frame_w + PANEL_GAP + PANEL_W
        } else {
            frame_w
        };
        let start_x = viewport.width.saturating_sub(total_w) / 2;
        // One spare row under the frame for the control strip.
        let start_y = viewport.height.saturating_sub(frame_h + 1) / 2;

        let overlay = session.overlay();
        let field = CellStyle::new(INK, PLAYFIELD);
        fb.fill_rect(start_x + 1, start_y + 1, sw, sh, ' ', field);
        present_surface(fb, session.surface(), start_x + 1, start_y + 1, field);
        fb.draw_box(start_x, start_y, frame_w, frame_h, BORDER);
        let title = format!(" {} ", overlay.title);
        fb.put_str(start_x + 2, start_y, &title, ACCENT);

        if with_panel {
            let panel_x = start_x + frame_w + PANEL_GAP;
            draw_side_panel(fb, session, panel_x, start_y);
        }

        match session.phase() {
            GamePhase::Playing => {}
            phase => {
                let lines = overlay_lines(
                    phase,
                    &overlay,
                    session.countdown_remaining(),
                    &session.stats(),
                );
                draw_overlay(fb, &lines, start_x, start_y, frame_w, frame_h);
            }
        }

        self.draw_controls(fb, session, start_x, start_y + frame_h, total_w);
    }

    fn draw_controls(
        &mut self,
        fb: &mut FrameBuffer,
        session: &GameSession,
        x: u16,
        y: u16,
        w: u16,
    ) {
        self.controls.clear();
        let controls = session.mobile_controls();
        let pad = controls.dpad;
        let arrows = [
            (pad.left, "◀", Action::Left),
            (pad.up, "▲", Action::Up),
            (pad.down, "▼", Action::Down),
            (pad.right, "▶", Action::Right),
        ];

        let mut buttons: ArrayVec<(String, Action, ButtonMode), MAX_CONTROLS> = ArrayVec::new();
        for (shown, glyph, action) in arrows {
            if shown {
                let _ = buttons.try_push((format!(" {glyph} "), action, controls.dpad_mode));
            }
        }
        for b in controls.buttons {
            let _ = buttons.try_push((format!(" {} ", b.label), b.action, b.mode));
        }
        if buttons.is_empty() {
            return;
        }

        let strip_w: u16 = buttons
            .iter()
            .map(|(label, _, _)| text_width(label) + 1)
            .sum::<u16>()
            .saturating_sub(1);
        let mut cx = x.saturating_add(w.saturating_sub(strip_w) / 2);
        for (label, action, mode) in buttons {
            let bw = text_width(&label);
            let style = if session.held().is_held(action) {
                BUTTON_DOWN
            } else {
                BUTTON
            };
            fb.put_str(cx, y, &label, style);
            let _ = self.controls.try_push(ControlHit {
                x: cx,
                y,
                w: bw,
                action,
                mode,
            });
            cx = cx.saturating_add(bw + 1);
        }
    }
}

fn draw_side_panel(fb: &mut FrameBuffer, session: &GameSession, x: u16, y: u16) {
    let stats = session.stats();
    let mut row = y;

    fb.put_str(x, row, "SCORE", LABEL);
    row += 1;
    fb.put_u32(x, row, stats.score, ACCENT);
    row += 2;

    for &(label, value) in &stats.entries {
        fb.put_str(x, row, &label.to_uppercase(), LABEL);
        row += 1;
        fb.put_u32(x, row, value, VALUE);
        row += 2;
    }

    fb.put_str(x, row, session.phase().as_str(), HINT);
    row += 2;
    for hint in ["arrows/wasd move", "space action", "esc menu", "q quit"] {
        fb.put_str(x, row, hint, HINT);
        row += 1;
    }
}

/// Text shown over the frame for the non-playing phases.
pub fn overlay_lines(
    phase: GamePhase,
    overlay: &OverlayDescriptor,
    countdown: Option<u32>,
    stats: &GameStats,
) -> Vec<String> {
    let mut lines = Vec::new();
    match phase {
        GamePhase::Ready => {
            lines.push(overlay.title.to_string());
            lines.push(String::new());
            lines.extend(overlay.instructions.iter().map(|s| s.to_string()));
            if let Some(sub) = overlay.subtitle {
                lines.push(String::new());
                lines.push(sub.to_string());
            }
            lines.push(String::new());
            lines.push("ENTER or SPACE to start".to_string());
        }
        GamePhase::Countdown => {
            lines.push("GET READY".to_string());
            lines.push(countdown.unwrap_or(0).to_string());
        }
        GamePhase::Lost => {
            lines.push(overlay.lost_title.unwrap_or("GAME OVER").to_string());
            if let Some(msg) = &overlay.lost_message {
                lines.push(msg.clone());
            }
            lines.push(String::new());
            if overlay.lost_stats.is_empty() {
                lines.extend(stats.lines());
            } else {
                lines.extend(overlay.lost_stats.iter().cloned());
            }
            lines.push(String::new());
            lines.push("ENTER again, ESC menu".to_string());
        }
        GamePhase::Playing => {}
    }
    lines
}

fn draw_overlay(fb: &mut FrameBuffer, lines: &[String], x: u16, y: u16, w: u16, h: u16) {
    if lines.is_empty() {
        return;
    }
    let widest = lines.iter().map(|l| text_width(l)).max().unwrap_or(0);
    let box_w = (widest + 4).min(w);
    let box_h = (lines.len() as u16 + 2).min(h);
    let bx = x + (w - box_w) / 2;
    let by = y + (h - box_h) / 2;

    fb.fill_rect(bx, by, box_w, box_h, ' ', CellStyle::default());
    fb.draw_box(bx, by, box_w, box_h, BORDER);
    for (i, line) in lines.iter().take(box_h.saturating_sub(2) as usize).enumerate() {
        let style = if i == 0 { ACCENT } else { VALUE };
        let row = by + 1 + i as u16;
        fb.put_str_centered(bx + 1, row, box_w.saturating_sub(2), line, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{GameConfig, SessionConfig};
    use std::time::{Duration, Instant};

    fn screen(fb: &FrameBuffer) -> String {
        (0..fb.height())
            .map(|y| fb.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn session(name: &str) -> GameSession {
        let game = GameConfig::from_name(name).unwrap();
        GameSession::from_config(&game, 3, SessionConfig::default())
    }

    #[test]
    fn test_ready_screen_shows_title_and_prompt() {
        let s = session("snake");
        let mut view = ArcadeView::new();
        let mut fb = FrameBuffer::new(100, 30);
        view.render_session(&s, Viewport::new(100, 30), &mut fb);
        let text = screen(&fb);
        assert!(text.contains("SNAKE"));
        assert!(text.contains("ENTER or SPACE to start"));
        assert!(text.contains("SCORE"));
    }

    #[test]
    fn test_countdown_overlay_shows_seconds() {
        let mut s = session("tetris");
        let t0 = Instant::now();
        s.start(t0);
        s.frame(t0 + Duration::from_millis(1200));
        let mut view = ArcadeView::new();
        let mut fb = FrameBuffer::new(80, 26);
        view.render_session(&s, Viewport::new(80, 26), &mut fb);
        let text = screen(&fb);
        assert!(text.contains("GET READY"));
        assert!(text.contains(" 2 "));
    }

    #[test]
    fn test_playing_hides_overlay() {
        let mut s = session("runner");
        let t0 = Instant::now();
        s.start(t0);
        s.frame(t0 + Duration::from_secs(3));
        let mut view = ArcadeView::new();
        let mut fb = FrameBuffer::new(140, 30);
        view.render_session(&s, Viewport::new(140, 30), &mut fb);
        let text = screen(&fb);
        assert!(!text.contains("GET READY"));
        assert!(!text.contains("ENTER or SPACE"));
    }

    #[test]
    fn test_control_strip_is_hit_testable() {
        let s = session("tetris");
        let mut view = ArcadeView::new();
        let mut fb = FrameBuffer::new(80, 26);
        view.render_session(&s, Viewport::new(80, 26), &mut fb);

        let controls = view.controls().to_vec();
        assert!(!controls.is_empty());
        for c in &controls {
            assert_eq!(view.hit_control(c.x, c.y), Some(*c));
            let last = view.hit_control(c.x + c.w - 1, c.y);
            assert_eq!(last.map(|h| h.action), Some(c.action));
        }
        let first = controls[0];
        assert_eq!(view.hit_control(first.x, first.y + 1), None);
        assert!(controls.iter().any(|c| c.action == Action::Primary));
    }

    #[test]
    fn test_picker_lists_every_game_and_hit_tests_rows() {
        let picker = Picker::new();
        let mut view = ArcadeView::new();
        let mut fb = FrameBuffer::new(80, 24);
        view.render_picker(&picker, Viewport::new(80, 24), &mut fb);
        let text = screen(&fb);
        for game in picker.games() {
            assert!(text.contains(game.title()));
        }

        let row = (0..fb.height())
            .find(|&y| fb.row_text(y).contains("Snake"))
            .unwrap();
        let text = fb.row_text(row);
        let byte = text.find("Snake").unwrap();
        let col = text[..byte].chars().count() as u16;
        assert_eq!(view.hit_picker(col, row), Some(2));
        assert_eq!(view.hit_picker(0, 0), None);
    }

    #[test]
    fn test_lost_overlay_falls_back_to_stats() {
        let overlay = OverlayDescriptor {
            title: "X",
            ..OverlayDescriptor::default()
        };
        let stats = GameStats::new(42).with("waves", 2);
        let lines = overlay_lines(GamePhase::Lost, &overlay, None, &stats);
        assert_eq!(lines[0], "GAME OVER");
        assert!(lines.contains(&"score 42".to_string()));
        assert!(lines.contains(&"waves 2".to_string()));
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let s = session("shooter");
        let mut view = ArcadeView::new();
        let mut fb = FrameBuffer::new(10, 5);
        view.render_session(&s, Viewport::new(10, 5), &mut fb);
        view.render_picker(&Picker::new(), Viewport::new(10, 5), &mut fb);
    }
}
