//! Interactive host: picker, mounted session, key and mouse routing.
//!
//! [`App`] is terminal-agnostic apart from the event types; [`run`] owns the
//! loop that polls crossterm, refreshes once per frame interval and draws.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal;
use tracing::info;

use crate::config::ArcadeConfig;
use crate::engine::{GameConfig, GameSession};
use crate::input::{is_back, should_quit};
use crate::results::{ResultLog, ResultRecord};
use crate::term::{ArcadeView, FrameBuffer, Picker, RenderThrottle, TerminalRenderer, Viewport};
use crate::types::{Action, ButtonMode};

const STATIC_REDRAW_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Quit,
}

pub struct App {
    config: ArcadeConfig,
    picker: Picker,
    session: Option<GameSession>,
    view: ArcadeView,
    fb: FrameBuffer,
    throttle: RenderThrottle,
    results: Option<ResultLog>,
    /// Terminal reports key releases; otherwise every press is treated as release + press.
    key_release_events: bool,
    pointer_hold: Option<Action>,
    input_epoch: u64,
    started: Instant,
}

impl App {
    pub fn new(config: ArcadeConfig, key_release_events: bool) -> Self {
        let results = config.results_path.as_deref().map(ResultLog::new);
        Self {
            config,
            picker: Picker::new(),
            session: None,
            view: ArcadeView::new(),
            fb: FrameBuffer::new(0, 0),
            throttle: RenderThrottle::new(STATIC_REDRAW_MS),
            results,
            key_release_events,
            pointer_hold: None,
            input_epoch: 0,
            started: Instant::now(),
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    pub fn view(&self) -> &ArcadeView {
        &self.view
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    /// Replace whatever is mounted with a fresh session of `game`.
    pub fn mount(&mut self, game: GameConfig) {
        self.unmount();

        let seed = self.config.seed_or_clock();
        let mut session_config = self.config.session_config();
        if self.key_release_events {
            session_config.key_release_timeout_ms = 0;
        }
        let mut session = GameSession::from_config(&game, seed, session_config);
        if let Some(log) = self.results.clone() {
            session.set_on_complete(Some(Box::new(move |result| {
                log.record(&ResultRecord::from_result(result, seed));
            })));
        }

        info!(game = game.name(), seed, "game mounted");
        self.picker.focus(game.name());
        self.session = Some(session);
        self.throttle.invalidate();
    }

    /// Drop the mounted session with its timers and input state.
    pub fn unmount(&mut self) {
        self.pointer_hold = None;
        if let Some(session) = self.session.take() {
            info!(game = session.module().name(), "game unmounted");
            self.throttle.invalidate();
        }
    }

    pub fn handle_event(&mut self, event: Event, now: Instant) -> AppFlow {
        self.input_epoch = self.input_epoch.wrapping_add(1);
        match event {
            Event::Key(key) => self.on_key(key, now),
            Event::Mouse(mouse) => {
                self.on_mouse(mouse, now);
                AppFlow::Continue
            }
            Event::Resize(..) => {
                self.throttle.invalidate();
                AppFlow::Continue
            }
            _ => AppFlow::Continue,
        }
    }

    fn on_key(&mut self, key: KeyEvent, now: Instant) -> AppFlow {
        let press = key.kind == KeyEventKind::Press;
        if press && should_quit(key) {
            return AppFlow::Quit;
        }
        if self.session.is_some() && is_back(key) {
            if press {
                self.unmount();
            }
            return AppFlow::Continue;
        }

        let Some(session) = self.session.as_mut() else {
            if press {
                self.on_picker_key(key.code);
            }
            return AppFlow::Continue;
        };
        let Some(action) = session.binding().key_map.map_event(key) else {
            return AppFlow::Continue;
        };
        match key.kind {
            KeyEventKind::Press => {
                if !self.key_release_events {
                    session.key_up(action);
                }
                session.key_down(action, now);
            }
            KeyEventKind::Repeat => session.key_repeat(action, now),
            KeyEventKind::Release => session.key_up(action),
        }
        AppFlow::Continue
    }

    fn on_picker_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') => self.picker.move_by(-1),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => self.picker.move_by(1),
            KeyCode::Enter | KeyCode::Char(' ') => self.mount(self.picker.current()),
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as u8 - b'1') as usize;
                if let Some(game) = self.picker.choose(index) {
                    self.mount(game);
                }
            }
            _ => {}
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(session) = self.session.as_mut() else {
                    let hit = self.view.hit_picker(mouse.column, mouse.row);
                    if let Some(game) = hit.and_then(|i| self.picker.choose(i)) {
                        self.mount(game);
                    }
                    return;
                };
                let Some(hit) = self.view.hit_control(mouse.column, mouse.row) else {
                    return;
                };
                match hit.mode {
                    ButtonMode::Tap => session.tap(hit.action, now),
                    ButtonMode::Hold => {
                        session.key_down(hit.action, now);
                        self.pointer_hold = Some(hit.action);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let held = self.pointer_hold.take();
                if let (Some(action), Some(session)) = (held, self.session.as_mut()) {
                    session.key_up(action);
                }
            }
            _ => {}
        }
    }

    /// One display refresh.
    pub fn frame(&mut self, now: Instant) {
        if let Some(session) = self.session.as_mut() {
            if let Some(action) = self.pointer_hold {
                session.hold(action, now);
            }
            session.frame(now);
        }
    }

    /// Lay out the current screen into the framebuffer.
    pub fn render(&mut self, viewport: Viewport) {
        match &self.session {
            Some(session) => self.view.render_session(session, viewport, &mut self.fb),
            None => self.view.render_picker(&self.picker, viewport, &mut self.fb),
        }
    }

    /// Render and flush if the throttle allows it.
    pub fn draw(
        &mut self,
        term: &mut TerminalRenderer,
        viewport: Viewport,
        now: Instant,
    ) -> Result<()> {
        let now_ms = now.saturating_duration_since(self.started).as_millis() as u64;
        let (seq, is_static) = match &self.session {
            Some(s) => (s.frame_seq(), !s.is_active_tick()),
            None => (self.picker.selected() as u64, true),
        };
        let fingerprint = seq.wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ self.input_epoch
            ^ ((viewport.width as u64) << 48 | (viewport.height as u64) << 32);
        if !self.throttle.should_render(now_ms, fingerprint, is_static) {
            return Ok(());
        }
        self.render(viewport);
        term.draw_swap(&mut self.fb)
    }
}

/// Poll input until the next frame is due, then refresh and draw.
pub fn run(term: &mut TerminalRenderer, app: &mut App, frame: Duration) -> Result<()> {
    let mut next_frame = Instant::now();
    loop {
        let timeout = next_frame.saturating_duration_since(Instant::now());
        if event::poll(timeout)? {
            loop {
                let ev = event::read()?;
                if matches!(ev, Event::Resize(..)) {
                    term.invalidate();
                }
                if app.handle_event(ev, Instant::now()) == AppFlow::Quit {
                    return Ok(());
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        if now >= next_frame {
            next_frame = now + frame;
            app.frame(now);
            let (w, h) = terminal::size().unwrap_or((80, 24));
            app.draw(term, Viewport::new(w, h), now)?;
        }
    }
}
