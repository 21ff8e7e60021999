//! Endless runner - one jumper, scrolling obstacles and coins.
//!
//! Obstacles and coins are spawned by independent real-time timers, each
//! re-armed with a fresh random delay when it fires. Everything that moves is
//! integrated by `speed * delta_time`.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::RunnerConfig;
use crate::core::{finite_or_zero, overlaps, PixelCanvas, PixelPattern, Rect, SimpleRng, Timers};
use crate::input::KeyMap;
use crate::module::{GameModule, GameStats, InputBinding, Surface, TickInput, TickOutcome};
use crate::types::{
    Action, ActionButton, ButtonMode, Dpad, GameKind, MobileControls, OverlayDescriptor, Rgb,
};

const JUMPER: PixelPattern = PixelPattern::new(&[
    &[0, 0, 1, 1, 0, 0],
    &[0, 0, 1, 1, 0, 0],
    &[0, 1, 1, 1, 1, 0],
    &[1, 0, 1, 1, 0, 1],
    &[0, 0, 1, 1, 0, 0],
    &[0, 1, 0, 0, 1, 0],
    &[0, 1, 0, 0, 1, 0],
    &[1, 1, 0, 0, 1, 1],
]);

const COIN: PixelPattern = PixelPattern::new(&[
    &[0, 1, 1, 0],
    &[1, 1, 1, 1],
    &[1, 1, 1, 1],
    &[0, 1, 1, 0],
]);

const JUMPER_COLOR: Rgb = Rgb::new(90, 200, 255);
const OBSTACLE_COLOR: Rgb = Rgb::new(230, 80, 60);
const COIN_COLOR: Rgb = Rgb::new(250, 210, 40);
const GROUND_COLOR: Rgb = Rgb::new(110, 90, 60);
const GRASS_COLOR: Rgb = Rgb::new(70, 160, 70);

const MAX_OBSTACLES: usize = 16;
const MAX_COINS: usize = 16;

const BUTTONS: &[ActionButton] = &[ActionButton {
    label: "JUMP",
    action: Action::Primary,
    mode: ButtonMode::Tap,
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunnerTimer {
    Obstacle,
    Coin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jumper {
    pub y: f32,
    pub vy: f32,
    pub jumps: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coin {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct RunnerGame {
    config: RunnerConfig,
    rng: SimpleRng,
    timers: Timers<RunnerTimer>,
    jumper: Jumper,
    obstacles: Vec<Obstacle>,
    coins: Vec<Coin>,
    speed: f32,
    distance: f32,
    coins_collected: u32,
    jumps_made: u32,
}

impl RunnerGame {
    pub fn new(config: RunnerConfig, seed: u32) -> Self {
        let mut game = Self {
            config,
            rng: SimpleRng::new(seed),
            timers: Timers::new(),
            jumper: Jumper {
                y: 0.0,
                vy: 0.0,
                jumps: 0,
            },
            obstacles: Vec::with_capacity(MAX_OBSTACLES),
            coins: Vec::with_capacity(MAX_COINS),
            speed: config.start_speed,
            distance: 0.0,
            coins_collected: 0,
            jumps_made: 0,
        };
        game.reset_game();
        game
    }

    pub fn jumper(&self) -> Jumper {
        self.jumper
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn score(&self) -> u32 {
        let per_point = self.config.distance_per_point.max(1.0);
        let distance_points = (self.distance / per_point) as u32;
        distance_points.saturating_add(self.coins_collected * self.config.coin_value)
    }

    fn standing_y(&self) -> f32 {
        self.config.ground_y - JUMPER.height() as f32
    }

    fn jumper_rect(&self) -> Rect {
        Rect::new(
            self.config.jumper_x,
            self.jumper.y,
            JUMPER.width() as f32,
            JUMPER.height() as f32,
        )
    }

    fn jump(&mut self) {
        if self.jumper.jumps < self.config.max_jumps {
            self.jumper.vy = self.config.jump_velocity;
            self.jumper.jumps += 1;
            self.jumps_made += 1;
        }
    }

    fn random_delay(&mut self, (lo, hi): (u32, u32)) -> Duration {
        let ms = self.rng.range_f32(lo as f32, hi.max(lo) as f32);
        Duration::from_millis(ms as u64)
    }

    fn spawn_obstacle(&mut self) {
        if self.obstacles.len() >= MAX_OBSTACLES {
            return;
        }
        let width = 3.0 + self.rng.next_range(5) as f32;
        let height = 6.0 + self.rng.next_range(7) as f32;
        self.obstacles.push(Obstacle {
            x: self.config.width as f32,
            width,
            height,
        });
    }

    fn spawn_coin(&mut self) {
        if self.coins.len() >= MAX_COINS {
            return;
        }
        let top = self.config.ground_y - 22.0;
        let y = top + self.rng.next_range(12) as f32;
        self.coins.push(Coin {
            x: self.config.width as f32,
            y,
        });
    }

    fn arm(&mut self, timer: RunnerTimer, now: Instant) {
        let range = match timer {
            RunnerTimer::Obstacle => self.config.obstacle_delay_ms,
            RunnerTimer::Coin => self.config.coin_delay_ms,
        };
        let delay = self.random_delay(range);
        self.timers.schedule_once(timer, delay, now);
    }
}

impl GameModule for RunnerGame {
    fn kind(&self) -> GameKind {
        GameKind::Runner
    }

    fn name(&self) -> &'static str {
        "runner"
    }

    fn binding(&self) -> InputBinding {
        InputBinding {
            held: &[],
            buffered: &[],
            key_map: KeyMap::for_game(GameKind::Runner),
        }
    }

    fn mobile_controls(&self) -> MobileControls {
        MobileControls {
            dpad: Dpad::NONE,
            dpad_mode: ButtonMode::Tap,
            buttons: BUTTONS,
        }
    }

    fn create_surface(&self) -> Surface {
        Surface::Pixel(PixelCanvas::new(
            self.config.width,
            self.config.height,
            self.config.cell_size,
        ))
    }

    fn reset_game(&mut self) {
        self.timers.clear();
        self.jumper = Jumper {
            y: self.standing_y(),
            vy: 0.0,
            jumps: 0,
        };
        self.obstacles.clear();
        self.coins.clear();
        self.speed = self.config.start_speed;
        self.distance = 0.0;
        self.coins_collected = 0;
        self.jumps_made = 0;
    }

    fn start_game(&mut self, now: Instant) {
        self.arm(RunnerTimer::Obstacle, now);
        self.arm(RunnerTimer::Coin, now);
    }

    fn on_key_down(&mut self, action: Action, _now: Instant) -> TickOutcome {
        if matches!(action, Action::Up | Action::Primary) {
            self.jump();
        }
        TickOutcome::Continue
    }

    fn poll_timers(&mut self, now: Instant) {
        for fired in self.timers.poll(now) {
            match fired {
                RunnerTimer::Obstacle => self.spawn_obstacle(),
                RunnerTimer::Coin => self.spawn_coin(),
            }
            self.arm(fired, now);
        }
    }

    fn on_tick(&mut self, delta_time: f32, _input: TickInput<'_>) -> TickOutcome {
        let dt = finite_or_zero(delta_time);

        self.speed = (self.speed + self.config.acceleration * dt).min(self.config.max_speed);
        let dx = self.speed * dt;
        self.distance += dx;

        // Semi-implicit Euler: velocity first, then position.
        self.jumper.vy += self.config.gravity * dt;
        self.jumper.y += self.jumper.vy * dt;
        let standing = self.standing_y();
        if self.jumper.y >= standing {
            self.jumper.y = standing;
            self.jumper.vy = 0.0;
            self.jumper.jumps = 0;
        }

        for obstacle in &mut self.obstacles {
            obstacle.x -= dx;
        }
        for coin in &mut self.coins {
            coin.x -= dx;
        }
        self.obstacles.retain(|o| o.x + o.width > 0.0);
        self.coins.retain(|c| c.x + COIN.width() as f32 > 0.0);

        let body = self.jumper_rect();
        let before = self.coins.len();
        self.coins.retain(|c| {
            let rect = Rect::new(c.x, c.y, COIN.width() as f32, COIN.height() as f32);
            !overlaps(&body, &rect)
        });
        let picked = (before - self.coins.len()) as u32;
        if picked > 0 {
            self.coins_collected += picked;
            debug!(coins = self.coins_collected, "runner coin collected");
        }

        let ground = self.config.ground_y;
        let hit = self.obstacles.iter().any(|o| {
            let rect = Rect::new(o.x, ground - o.height, o.width, o.height);
            overlaps(&body, &rect)
        });
        if hit {
            TickOutcome::Lost
        } else {
            TickOutcome::Continue
        }
    }

    fn render(&self, surface: &mut Surface) {
        let Surface::Pixel(canvas) = surface else {
            return;
        };
        let ground = self.config.ground_y;
        let below = self.config.height.saturating_sub(ground.max(0.0) as usize);
        canvas.fill_rect(0.0, ground, self.config.width, 1, GRASS_COLOR);
        canvas.fill_rect(
            0.0,
            ground + 1.0,
            self.config.width,
            below.saturating_sub(1),
            GROUND_COLOR,
        );

        for o in &self.obstacles {
            canvas.fill_rect(
                o.x,
                ground - o.height,
                o.width as usize,
                o.height as usize,
                OBSTACLE_COLOR,
            );
        }
        for c in &self.coins {
            canvas.draw_pattern(&COIN, c.x, c.y, COIN_COLOR);
        }
        canvas.draw_pattern(&JUMPER, self.config.jumper_x, self.jumper.y, JUMPER_COLOR);
    }

    fn overlay(&self) -> OverlayDescriptor {
        OverlayDescriptor {
            title: "RUNNER",
            instructions: &["Space/Up: jump", "Jump again in the air", "Grab coins for +25"],
            subtitle: Some("How far can you go?"),
            lost_title: Some("CRASHED"),
            lost_message: Some(format!("Ran {} m", (self.distance / 10.0) as u32)),
            lost_stats: self.stats().lines(),
        }
    }

    fn stats(&self) -> GameStats {
        GameStats::new(self.score())
            .with("distance", self.distance as u32)
            .with("coins", self.coins_collected)
            .with("jumps", self.jumps_made)
    }
}
