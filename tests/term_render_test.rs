use std::time::{Duration, Instant};

use tui_arcade::engine::{GameConfig, GameSession, SessionConfig};
use tui_arcade::term::{encode_diff_into, ArcadeView, FrameBuffer, Picker, Viewport};
use tui_arcade::types::Action;

fn screen(fb: &FrameBuffer) -> String {
    (0..fb.height())
        .map(|y| fb.row_text(y))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn pixel_tetris_renders_with_half_blocks_once_playing() {
    let game = GameConfig::from_name("tetris-pixel").unwrap();
    let mut session = GameSession::from_config(&game, 2, SessionConfig::default());
    let t0 = Instant::now();
    session.key_down(Action::Start, t0);
    session.frame(t0 + Duration::from_secs(3));
    session.frame(t0 + Duration::from_millis(3016));

    let mut view = ArcadeView::new();
    let mut fb = FrameBuffer::new(0, 0);
    view.render_session(&session, Viewport::new(80, 30), &mut fb);
    let text = screen(&fb);
    assert!(text.contains('▀'));
    assert!(!text.contains("GET READY"));
}

#[test]
fn unchanged_frames_flush_nothing() {
    let picker = Picker::new();
    let mut view = ArcadeView::new();
    let mut a = FrameBuffer::new(0, 0);
    let mut b = FrameBuffer::new(0, 0);
    view.render_picker(&picker, Viewport::new(60, 20), &mut a);
    view.render_picker(&picker, Viewport::new(60, 20), &mut b);

    let mut out = Vec::new();
    encode_diff_into(&a, &b, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn moving_the_picker_cursor_only_touches_two_rows() {
    let mut picker = Picker::new();
    let mut view = ArcadeView::new();
    let mut before = FrameBuffer::new(0, 0);
    view.render_picker(&picker, Viewport::new(60, 20), &mut before);
    picker.move_by(1);
    let mut after = FrameBuffer::new(0, 0);
    view.render_picker(&picker, Viewport::new(60, 20), &mut after);

    let changed: Vec<u16> = (0..after.height())
        .filter(|&y| (0..after.width()).any(|x| before.get(x, y) != after.get(x, y)))
        .collect();
    assert_eq!(changed.len(), 2);
    assert!(screen(&after).contains("Runner"));
}
