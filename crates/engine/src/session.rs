//! Game session - the phase machine around one mounted game module.
//!
//! `Ready -> Countdown -> Playing -> Lost -> Countdown -> ...`
//!
//! The session owns everything scoped to a mounted game: the module, its render
//! surface, held-key map, action queue, countdown and frame clock. Dropping the
//! session drops all of it, timers included. Only `Playing` is ticked.
//!
//! After each refresh that changed what is on screen, `frame_seq` is bumped
//! once; the host redraws when it sees a new value.

use std::fmt;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{GameConfig, SessionConfig};
use crate::core::{Countdown, FrameClock};
use crate::input::{ActionBuffer, HeldKeys};
use crate::module::{
    GameModule, GameResult, GameStats, InputBinding, Surface, TickInput, TickOutcome,
};
use crate::types::{Action, GamePhase, MobileControls, OverlayDescriptor};

/// Invoked once per finished round.
pub type CompletionCallback = Box<dyn FnMut(&GameResult)>;

pub struct GameSession {
    module: Box<dyn GameModule>,
    surface: Surface,
    binding: InputBinding,
    held: HeldKeys,
    queue: ActionBuffer,
    countdown: Countdown,
    clock: FrameClock,
    phase: GamePhase,
    config: SessionConfig,
    frame_seq: u64,
    round_started: Option<Instant>,
    last_result: Option<GameResult>,
    on_complete: Option<CompletionCallback>,
}

impl GameSession {
    pub fn new(module: Box<dyn GameModule>, config: SessionConfig) -> Self {
        let binding = module.binding();
        let surface = module.create_surface();
        let held = HeldKeys::track(binding.held)
            .with_release_timeout_ms(config.key_release_timeout_ms);
        let mut queue = ActionBuffer::new(binding.buffered);
        queue.set_enabled(false);

        let mut session = Self {
            module,
            surface,
            binding,
            held,
            queue,
            countdown: Countdown::new(),
            clock: FrameClock::new(config.max_delta),
            phase: GamePhase::Ready,
            config,
            frame_seq: 0,
            round_started: None,
            last_result: None,
            on_complete: None,
        };
        session.redraw();
        session
    }

    /// Build the module described by `game` and mount it.
    pub fn from_config(game: &GameConfig, seed: u32, config: SessionConfig) -> Self {
        debug!(game = game.name(), seed, "mounting game");
        Self::new(game.build(seed), config)
    }

    pub fn with_on_complete(mut self, callback: impl FnMut(&GameResult) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn set_on_complete(&mut self, callback: Option<CompletionCallback>) {
        self.on_complete = callback;
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether the scheduler is currently delivering ticks.
    pub fn is_active_tick(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Incremented once per presented frame.
    pub fn frame_seq(&self) -> u64 {
        self.frame_seq
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn module(&self) -> &dyn GameModule {
        self.module.as_ref()
    }

    pub fn binding(&self) -> InputBinding {
        self.binding
    }

    pub fn mobile_controls(&self) -> MobileControls {
        self.module.mobile_controls()
    }

    pub fn overlay(&self) -> OverlayDescriptor {
        self.module.overlay()
    }

    pub fn stats(&self) -> GameStats {
        self.module.stats()
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Seconds left while counting down.
    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    pub fn held(&self) -> &HeldKeys {
        &self.held
    }

    /// Result of the most recent finished round, until the next start.
    pub fn last_result(&self) -> Option<&GameResult> {
        self.last_result.as_ref()
    }

    /// Begin a round from `Ready` or `Lost`. No-op in other phases.
    pub fn start(&mut self, now: Instant) -> bool {
        if !self.phase.can_start() {
            return false;
        }
        self.module.reset_game();
        self.clear_input();
        self.clock.reset();
        self.countdown.start(self.config.countdown_secs, now);
        self.last_result = None;
        self.round_started = None;
        self.phase = GamePhase::Countdown;
        info!(game = self.module.name(), "countdown started");
        self.redraw();
        true
    }

    /// Stop everything and return to `Ready`.
    pub fn reset(&mut self) {
        self.countdown.cancel();
        self.module.reset_game();
        self.clear_input();
        self.clock.reset();
        self.round_started = None;
        self.phase = GamePhase::Ready;
        debug!(game = self.module.name(), "session reset");
        self.redraw();
    }

    /// Physical press.
    ///
    /// Outside `Playing`, `Start` or `Primary` starts a round. While playing the
    /// held flag is set, buffered actions are queued, and on the press edge the
    /// module's one-shot handler runs.
    pub fn key_down(&mut self, action: Action, now: Instant) {
        if self.phase != GamePhase::Playing {
            if matches!(action, Action::Start | Action::Primary) {
                self.start(now);
            }
            return;
        }

        let edge = self.held.press(action, now);
        self.queue.push_key(action);
        if edge && self.module.on_key_down(action, now).is_lost() {
            self.finish(now);
        }
    }

    /// Auto-repeat of a key already down: keeps it held and queues it again.
    pub fn key_repeat(&mut self, action: Action, now: Instant) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.held.refresh(action, now);
        self.queue.push_key(action);
    }

    /// Pointer still down on a hold button: refresh the flag, queue nothing.
    pub fn hold(&mut self, action: Action, now: Instant) {
        if self.phase == GamePhase::Playing {
            self.held.refresh(action, now);
        }
    }

    pub fn key_up(&mut self, action: Action) {
        self.held.release(action);
    }

    /// One-shot touch button: a full press and release.
    pub fn tap(&mut self, action: Action, now: Instant) {
        self.key_down(action, now);
        self.key_up(action);
    }

    /// One display refresh. Returns whether the module was ticked.
    pub fn frame(&mut self, now: Instant) -> bool {
        match self.phase {
            GamePhase::Countdown => {
                let before = self.countdown.remaining();
                if self.countdown.poll(now) {
                    self.begin_playing(now);
                } else if self.countdown.remaining() != before {
                    self.redraw();
                }
                false
            }
            GamePhase::Playing => self.tick(now),
            GamePhase::Ready | GamePhase::Lost => {
                self.clock.advance(now, false);
                false
            }
        }
    }

    fn begin_playing(&mut self, now: Instant) {
        self.phase = GamePhase::Playing;
        self.queue.set_enabled(true);
        self.clock.reset();
        self.round_started = Some(now);
        self.module.start_game(now);
        info!(game = self.module.name(), "round started");
        self.redraw();
    }

    fn tick(&mut self, now: Instant) -> bool {
        self.held.expire(now);
        self.module.poll_timers(now);

        let module = &mut self.module;
        let held = &self.held;
        let queue = &mut self.queue;
        let mut outcome = TickOutcome::Continue;
        let ticked = self.clock.run_loop(now, true, |dt| {
            outcome = module.on_tick(dt, TickInput { held, queue });
        });

        if outcome.is_lost() {
            self.finish(now);
        } else {
            self.redraw();
        }
        ticked
    }

    fn finish(&mut self, now: Instant) {
        self.phase = GamePhase::Lost;
        self.clear_input();
        self.clock.reset();

        let stats = self.module.stats();
        let duration_ms = self
            .round_started
            .take()
            .map(|t| now.saturating_duration_since(t).as_millis() as u64)
            .unwrap_or(0);
        let result = GameResult {
            kind: self.module.kind(),
            name: self.module.name(),
            score: stats.score,
            stats,
            duration_ms,
        };
        info!(
            game = result.name,
            score = result.score,
            duration_ms,
            "round finished"
        );
        if let Some(callback) = self.on_complete.as_mut() {
            callback(&result);
        }
        self.last_result = Some(result);
        self.redraw();
    }

    /// Drop held flags and queued actions so nothing bleeds into the next round.
    fn clear_input(&mut self) {
        self.held.clear();
        self.queue.clear();
        self.queue.set_enabled(false);
    }

    fn redraw(&mut self) {
        self.surface.clear();
        self.module.render(&mut self.surface);
        self.frame_seq = self.frame_seq.wrapping_add(1);
    }
}

impl fmt::Debug for GameSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("game", &self.module.name())
            .field("phase", &self.phase)
            .field("frame_seq", &self.frame_seq)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CharGrid;
    use crate::input::KeyMap;
    use crate::types::{ButtonMode, Dpad, GameKind};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Counts what the session asks of it; loses when told to.
    #[derive(Default)]
    struct Probe {
        ticks: Rc<RefCell<Vec<f32>>>,
        key_downs: Rc<RefCell<Vec<Action>>>,
        consumed: Rc<RefCell<Vec<Action>>>,
        resets: Rc<RefCell<u32>>,
        lose_next_tick: Rc<RefCell<bool>>,
    }

    impl GameModule for Probe {
        fn kind(&self) -> GameKind {
            GameKind::Snake
        }

        fn name(&self) -> &'static str {
            "probe"
        }

        fn binding(&self) -> InputBinding {
            InputBinding {
                held: &[Action::Left, Action::Right],
                buffered: &[Action::Up, Action::Down],
                key_map: KeyMap::STANDARD,
            }
        }

        fn mobile_controls(&self) -> MobileControls {
            MobileControls {
                dpad: Dpad::NONE,
                dpad_mode: ButtonMode::Hold,
                buttons: &[],
            }
        }

        fn create_surface(&self) -> Surface {
            Surface::Glyph(CharGrid::new(4, 2))
        }

        fn reset_game(&mut self) {
            *self.resets.borrow_mut() += 1;
        }

        fn start_game(&mut self, _now: Instant) {}

        fn on_key_down(&mut self, action: Action, _now: Instant) -> TickOutcome {
            self.key_downs.borrow_mut().push(action);
            TickOutcome::Continue
        }

        fn on_tick(&mut self, delta_time: f32, input: TickInput<'_>) -> TickOutcome {
            self.ticks.borrow_mut().push(delta_time);
            if let Some(a) = input.queue.consume_one() {
                self.consumed.borrow_mut().push(a);
            }
            if *self.lose_next_tick.borrow() {
                TickOutcome::Lost
            } else {
                TickOutcome::Continue
            }
        }

        fn render(&self, surface: &mut Surface) {
            if let Surface::Glyph(grid) = surface {
                grid.draw_text("ok", 0.0, 0.0);
            }
        }

        fn overlay(&self) -> OverlayDescriptor {
            OverlayDescriptor {
                title: "PROBE",
                ..OverlayDescriptor::default()
            }
        }

        fn stats(&self) -> GameStats {
            GameStats::new(self.ticks.borrow().len() as u32)
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session(probe: &Probe) -> GameSession {
        let module = Probe {
            ticks: probe.ticks.clone(),
            key_downs: probe.key_downs.clone(),
            consumed: probe.consumed.clone(),
            resets: probe.resets.clone(),
            lose_next_tick: probe.lose_next_tick.clone(),
        };
        GameSession::new(Box::new(module), SessionConfig::default())
    }

    /// Start and run the countdown to completion; returns the first playing instant.
    fn play(s: &mut GameSession, t0: Instant) -> Instant {
        assert!(s.start(t0));
        let go = t0 + ms(3000);
        s.frame(go);
        assert_eq!(s.phase(), GamePhase::Playing);
        go
    }

    #[test]
    fn starts_ready_and_renders_once() {
        let probe = Probe::default();
        let s = session(&probe);
        assert_eq!(s.phase(), GamePhase::Ready);
        assert!(!s.is_active_tick());
        assert_eq!(s.frame_seq(), 1);
        assert_eq!(
            s.surface().as_glyph().map(|g| g.render()),
            Some("ok  \n    ".to_string())
        );
    }

    #[test]
    fn no_ticks_until_countdown_fires() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let t0 = Instant::now();
        s.start(t0);
        assert_eq!(s.phase(), GamePhase::Countdown);
        assert_eq!(s.countdown_remaining(), Some(3));

        for i in 1..=29 {
            s.frame(t0 + ms(i * 100));
        }
        assert!(probe.ticks.borrow().is_empty());
        assert_eq!(s.countdown_remaining(), Some(1));

        let go = t0 + ms(3000);
        s.frame(go);
        assert!(s.is_active_tick());
        // First playing frame only sets the clock baseline.
        assert!(!s.frame(go));
        assert!(s.frame(go + ms(50)));
        let ticks = probe.ticks.borrow();
        assert_eq!(ticks.len(), 1);
        assert!((ticks[0] - 3.0).abs() < 1e-3);
    }

    #[test]
    fn large_gaps_are_clamped() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let go = play(&mut s, Instant::now());
        s.frame(go);
        s.frame(go + ms(10_000));
        assert_eq!(probe.ticks.borrow().as_slice(), &[3.0]);
    }

    #[test]
    fn start_is_ignored_mid_round() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let t0 = Instant::now();
        s.start(t0);
        assert!(!s.start(t0 + ms(500)));
        assert_eq!(*probe.resets.borrow(), 1);
        let go = t0 + ms(3000);
        s.frame(go);
        s.key_down(Action::Start, go);
        assert_eq!(s.phase(), GamePhase::Playing);
    }

    #[test]
    fn primary_starts_from_ready() {
        let probe = Probe::default();
        let mut s = session(&probe);
        s.key_down(Action::Primary, Instant::now());
        assert_eq!(s.phase(), GamePhase::Countdown);
        assert!(probe.key_downs.borrow().is_empty());
    }

    #[test]
    fn one_shot_fires_on_press_edge_only() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let go = play(&mut s, Instant::now());
        s.key_down(Action::Left, go);
        s.key_repeat(Action::Left, go + ms(30));
        s.key_down(Action::Left, go + ms(60));
        assert_eq!(probe.key_downs.borrow().as_slice(), &[Action::Left]);
        assert!(s.held().is_held(Action::Left));
        s.key_up(Action::Left);
        s.key_down(Action::Left, go + ms(90));
        assert_eq!(probe.key_downs.borrow().len(), 2);
    }

    #[test]
    fn buffered_presses_survive_slow_consumption() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let go = play(&mut s, Instant::now());
        s.tap(Action::Up, go);
        s.tap(Action::Down, go);
        s.tap(Action::Up, go);
        s.frame(go);
        for i in 1..=4 {
            s.frame(go + ms(i * 16));
        }
        assert_eq!(
            probe.consumed.borrow().as_slice(),
            &[Action::Up, Action::Down, Action::Up]
        );
    }

    #[test]
    fn stale_input_is_cleared_on_restart() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let t0 = Instant::now();
        let go = play(&mut s, t0);
        s.key_down(Action::Right, go);
        s.key_down(Action::Up, go);
        s.reset();
        assert!(!s.held().is_held(Action::Right));

        let go = play(&mut s, go + ms(10));
        s.frame(go);
        s.frame(go + ms(16));
        assert!(probe.consumed.borrow().is_empty());
    }

    #[test]
    fn held_keys_auto_release_without_release_events() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let go = play(&mut s, Instant::now());
        s.key_down(Action::Right, go);
        s.frame(go + ms(100));
        assert!(s.held().is_held(Action::Right));
        s.frame(go + ms(200));
        assert!(!s.held().is_held(Action::Right));
    }

    #[test]
    fn loss_reports_result_exactly_once() {
        let probe = Probe::default();
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = results.clone();
        let mut s =
            session(&probe).with_on_complete(move |r| sink.borrow_mut().push(r.clone()));

        let go = play(&mut s, Instant::now());
        s.frame(go);
        s.frame(go + ms(16));
        *probe.lose_next_tick.borrow_mut() = true;
        s.frame(go + ms(32));
        assert_eq!(s.phase(), GamePhase::Lost);
        s.frame(go + ms(48));
        s.frame(go + ms(64));

        let results = results.borrow();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "probe");
        assert_eq!(results[0].score, 2);
        assert_eq!(results[0].duration_ms, 32);
        assert_eq!(s.last_result().map(|r| r.score), Some(2));
    }

    #[test]
    fn lost_round_restarts_with_start() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let go = play(&mut s, Instant::now());
        *probe.lose_next_tick.borrow_mut() = true;
        s.frame(go);
        s.frame(go + ms(16));
        assert_eq!(s.phase(), GamePhase::Lost);

        *probe.lose_next_tick.borrow_mut() = false;
        s.key_down(Action::Start, go + ms(100));
        assert_eq!(s.phase(), GamePhase::Countdown);
        assert!(s.last_result().is_none());
    }

    #[test]
    fn frame_seq_bumps_per_presented_frame() {
        let probe = Probe::default();
        let mut s = session(&probe);
        let before = s.frame_seq();
        s.frame(Instant::now());
        assert_eq!(s.frame_seq(), before);
        let go = play(&mut s, Instant::now());
        let seq = s.frame_seq();
        s.frame(go + ms(16));
        assert_eq!(s.frame_seq(), seq + 1);
    }
}
