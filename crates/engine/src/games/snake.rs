//! Snake - discrete grid stepping gated by a speed accumulator.
//!
//! Direction changes come from the action queue and are validated against the
//! direction the snake last *moved* in, so two quick presses can never fold it
//! back onto itself. A wall-walk power-up replaces wall death with wrapping.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use arrayvec::ArrayVec;
use tracing::debug;

use crate::config::SnakeConfig;
use crate::core::{CharGrid, SimpleRng, Timers};
use crate::input::KeyMap;
use crate::module::{GameModule, GameStats, InputBinding, Surface, TickInput, TickOutcome};
use crate::types::{
    frames_to_ms, Action, ButtonMode, Dpad, GameKind, MobileControls, OverlayDescriptor,
};

const MAX_FOOD: usize = 2;

const HEAD: &str = "@@";
const HEAD_WALL_WALK: &str = "##";
const BODY: &str = "()";
const FOOD: &str = "<>";
const POWER_UP: &str = "**";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn from_action(action: Action) -> Option<Self> {
        match action {
            Action::Up => Some(Direction::Up),
            Action::Down => Some(Direction::Down),
            Action::Left => Some(Direction::Left),
            Action::Right => Some(Direction::Right),
            Action::Primary | Action::Start => None,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Normal,
    WallWalk,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Food {
    pub x: i32,
    pub y: i32,
    pub kind: FoodKind,
    /// Unique per spawn; keys the expiry timer of power-ups.
    pub id: u32,
    /// Time on the board, in tick milliseconds.
    pub age_ms: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SnakeTimer {
    PowerUpExpiry(u32),
}

#[derive(Debug, Clone)]
pub struct SnakeGame {
    config: SnakeConfig,
    rng: SimpleRng,
    timers: Timers<SnakeTimer>,
    /// Head first.
    body: VecDeque<(i32, i32)>,
    direction: Direction,
    grow: usize,
    food: ArrayVec<Food, MAX_FOOD>,
    next_food_id: u32,
    speed: f32,
    move_acc: f32,
    wall_walk_ms: f32,
    score: u32,
    eaten: u32,
    power_ups: u32,
    spawn_pending: bool,
}

impl SnakeGame {
    pub fn new(config: SnakeConfig, seed: u32) -> Self {
        let mut game = Self {
            config,
            rng: SimpleRng::new(seed),
            timers: Timers::new(),
            body: VecDeque::with_capacity((config.cols * config.rows).max(0) as usize),
            direction: Direction::Right,
            grow: 0,
            food: ArrayVec::new(),
            next_food_id: 0,
            speed: config.start_speed,
            move_acc: 0.0,
            wall_walk_ms: 0.0,
            score: 0,
            eaten: 0,
            power_ups: 0,
            spawn_pending: false,
        };
        game.reset_game();
        game
    }

    pub fn body(&self) -> impl Iterator<Item = &(i32, i32)> {
        self.body.iter()
    }

    pub fn head(&self) -> (i32, i32) {
        self.body.front().copied().unwrap_or((0, 0))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn wall_walk_ms(&self) -> f32 {
        self.wall_walk_ms
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.config.cols && y < self.config.rows
    }

    fn occupied(&self, x: i32, y: i32) -> bool {
        self.body.contains(&(x, y)) || self.food.iter().any(|f| f.x == x && f.y == y)
    }

    fn random_free_cell(&mut self) -> Option<(i32, i32)> {
        let cols = self.config.cols.max(1) as u32;
        let rows = self.config.rows.max(1) as u32;
        for _ in 0..32 {
            let x = self.rng.next_range(cols) as i32;
            let y = self.rng.next_range(rows) as i32;
            if !self.occupied(x, y) {
                return Some((x, y));
            }
        }
        // Crowded board: fall back to a scan from a random start.
        let total = (cols * rows) as i32;
        let start = self.rng.next_range(cols * rows) as i32;
        (0..total)
            .map(|i| (start + i) % total)
            .map(|i| (i % cols as i32, i / cols as i32))
            .find(|&(x, y)| !self.occupied(x, y))
    }

    /// Drop one or two items; each has a chance of being a wall-walk power-up.
    fn spawn_food(&mut self, now: Instant) {
        let count = if self.rng.chance(self.config.double_food_chance) {
            2
        } else {
            1
        };
        for _ in 0..count {
            let Some((x, y)) = self.random_free_cell() else {
                break;
            };
            let kind = if self.rng.chance(self.config.power_up_chance) {
                FoodKind::WallWalk
            } else {
                FoodKind::Normal
            };
            let id = self.next_food_id;
            self.next_food_id = self.next_food_id.wrapping_add(1);
            if kind == FoodKind::WallWalk {
                self.timers.schedule_once(
                    SnakeTimer::PowerUpExpiry(id),
                    Duration::from_millis(self.config.power_up_lifetime_ms),
                    now,
                );
            }
            let _ = self.food.try_push(Food {
                x,
                y,
                kind,
                id,
                age_ms: 0.0,
            });
        }
        debug!(items = self.food.len(), "snake food spawned");
    }

    /// Pop queued turns until one is legal against the applied direction.
    fn apply_turn(&mut self, input: &mut TickInput<'_>) {
        while let Some(action) = input.queue.consume_one() {
            let Some(dir) = Direction::from_action(action) else {
                continue;
            };
            if dir != self.direction && dir != self.direction.opposite() {
                self.direction = dir;
                return;
            }
        }
    }

    fn step(&mut self, wall_walk: bool) -> TickOutcome {
        let (hx, hy) = self.head();
        let (dx, dy) = self.direction.delta();
        let (mut nx, mut ny) = (hx + dx, hy + dy);

        if !self.in_bounds(nx, ny) {
            if wall_walk {
                nx = nx.rem_euclid(self.config.cols);
                ny = ny.rem_euclid(self.config.rows);
            } else {
                return TickOutcome::Lost;
            }
        }

        // The tail cell frees up this step unless the snake is growing.
        let tail_moves = self.grow == 0;
        let body_len = self.body.len();
        let hits_body = self
            .body
            .iter()
            .take(if tail_moves { body_len.saturating_sub(1) } else { body_len })
            .any(|&c| c == (nx, ny));
        if hits_body {
            return TickOutcome::Lost;
        }

        self.body.push_front((nx, ny));
        if self.grow > 0 {
            self.grow -= 1;
        } else {
            self.body.pop_back();
        }

        if let Some(i) = self.food.iter().position(|f| f.x == nx && f.y == ny) {
            let food = self.food.remove(i);
            self.eat(food);
        }
        TickOutcome::Continue
    }

    fn eat(&mut self, food: Food) {
        match food.kind {
            FoodKind::Normal => {
                let mut points = self.config.food_points;
                if food.age_ms <= self.config.quick_window_ms {
                    points += self.config.quick_bonus;
                }
                self.score = self.score.saturating_add(points);
                self.grow += 1;
                self.eaten += 1;
                self.speed = (self.speed + self.config.speed_step).min(self.config.max_speed);
            }
            FoodKind::WallWalk => {
                self.timers.cancel(SnakeTimer::PowerUpExpiry(food.id));
                self.score = self.score.saturating_add(self.config.power_up_points);
                self.wall_walk_ms = self.config.wall_walk_ms;
                self.power_ups += 1;
                debug!("snake wall-walk active");
            }
        }
        if self.food.is_empty() {
            self.spawn_pending = true;
        }
    }
}

impl GameModule for SnakeGame {
    fn kind(&self) -> GameKind {
        GameKind::Snake
    }

    fn name(&self) -> &'static str {
        "snake"
    }

    fn binding(&self) -> InputBinding {
        InputBinding {
            held: &[],
            buffered: &[Action::Up, Action::Down, Action::Left, Action::Right],
            key_map: KeyMap::for_game(GameKind::Snake),
        }
    }

    fn mobile_controls(&self) -> MobileControls {
        MobileControls {
            dpad: Dpad::ALL,
            dpad_mode: ButtonMode::Tap,
            buttons: &[],
        }
    }

    fn create_surface(&self) -> Surface {
        Surface::Glyph(CharGrid::new(
            self.config.cols.max(0) as usize * self.config.cell_width,
            self.config.rows.max(0) as usize,
        ))
    }

    fn reset_game(&mut self) {
        self.timers.clear();
        self.body.clear();
        let y = self.config.rows / 2;
        let head_x = (self.config.cols / 4).max(self.config.initial_length as i32 - 1);
        for i in 0..self.config.initial_length as i32 {
            self.body.push_back((head_x - i, y));
        }
        self.direction = Direction::Right;
        self.grow = 0;
        self.food.clear();
        self.speed = self.config.start_speed;
        self.move_acc = 0.0;
        self.wall_walk_ms = 0.0;
        self.score = 0;
        self.eaten = 0;
        self.power_ups = 0;
        self.spawn_pending = false;
    }

    fn start_game(&mut self, now: Instant) {
        if self.food.is_empty() {
            self.spawn_food(now);
        }
    }

    fn poll_timers(&mut self, now: Instant) {
        for fired in self.timers.poll(now) {
            match fired {
                SnakeTimer::PowerUpExpiry(id) => {
                    self.food.retain(|f| f.id != id);
                    if self.food.is_empty() {
                        self.spawn_pending = true;
                    }
                }
            }
        }
        if self.spawn_pending {
            self.spawn_pending = false;
            self.spawn_food(now);
        }
    }

    fn on_tick(&mut self, delta_time: f32, mut input: TickInput<'_>) -> TickOutcome {
        let elapsed_ms = frames_to_ms(delta_time);
        for food in &mut self.food {
            food.age_ms += elapsed_ms;
        }
        // A move made on the tick the power-up runs out is still covered.
        let wall_walk = self.wall_walk_ms > 0.0;
        self.wall_walk_ms = (self.wall_walk_ms - elapsed_ms).max(0.0);

        self.move_acc += delta_time * self.speed / 60.0;
        if self.move_acc < 1.0 {
            return TickOutcome::Continue;
        }
        self.move_acc = 0.0;

        self.apply_turn(&mut input);
        self.step(wall_walk)
    }

    fn render(&self, surface: &mut Surface) {
        let Surface::Glyph(grid) = surface else {
            return;
        };
        let cw = self.config.cell_width as f32;
        for food in &self.food {
            let glyph = match food.kind {
                FoodKind::Normal => FOOD,
                FoodKind::WallWalk => POWER_UP,
            };
            grid.draw_text(glyph, food.x as f32 * cw, food.y as f32);
        }
        for (i, &(x, y)) in self.body.iter().enumerate() {
            let glyph = match (i, self.wall_walk_ms > 0.0) {
                (0, true) => HEAD_WALL_WALK,
                (0, false) => HEAD,
                _ => BODY,
            };
            grid.draw_text(glyph, x as f32 * cw, y as f32);
        }
    }

    fn overlay(&self) -> OverlayDescriptor {
        OverlayDescriptor {
            title: "SNAKE",
            instructions: &[
                "Arrows/WASD: turn",
                "<> food +10, eat fast for +5",
                "** lets you walk through walls",
            ],
            subtitle: Some("Do not bite yourself"),
            lost_title: Some("GAME OVER"),
            lost_message: Some(format!("Length {}", self.body.len())),
            lost_stats: self.stats().lines(),
        }
    }

    fn stats(&self) -> GameStats {
        GameStats::new(self.score)
            .with("length", self.body.len() as u32)
            .with("food", self.eaten)
            .with("power-ups", self.power_ups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ActionBuffer, HeldKeys};
    use proptest::prelude::*;

    fn game() -> SnakeGame {
        let mut g = SnakeGame::new(SnakeConfig::default(), 11);
        g.reset_game();
        g
    }

    /// One tick long enough to force exactly one move.
    fn step(g: &mut SnakeGame, queue: &mut ActionBuffer) -> TickOutcome {
        let held = HeldKeys::default();
        let dt = 60.0 / g.speed() + 0.01;
        g.on_tick(dt, TickInput { held: &held, queue })
    }

    /// One 60 Hz frame.
    fn frame(g: &mut SnakeGame, queue: &mut ActionBuffer) -> TickOutcome {
        let held = HeldKeys::default();
        g.on_tick(1.0, TickInput { held: &held, queue })
    }

    fn place_head(g: &mut SnakeGame, x: i32, y: i32, dir: Direction) {
        let (dx, dy) = dir.delta();
        g.body.clear();
        for i in 0..3 {
            g.body.push_back((x - dx * i, y - dy * i));
        }
        g.direction = dir;
    }

    #[test]
    fn starts_with_three_segments_moving_right() {
        let g = game();
        assert_eq!(g.len(), 3);
        assert_eq!(g.direction(), Direction::Right);
        assert_eq!(g.speed(), 8.0);
    }

    #[test]
    fn accumulator_gates_moves() {
        let mut g = game();
        let held = HeldKeys::default();
        let mut queue = ActionBuffer::default();
        let head = g.head();
        // 8 moves per second: 7 frames are not enough for one move.
        for _ in 0..7 {
            g.on_tick(
                1.0,
                TickInput {
                    held: &held,
                    queue: &mut queue,
                },
            );
        }
        assert_eq!(g.head(), head);
        g.on_tick(
            1.0,
            TickInput {
                held: &held,
                queue: &mut queue,
            },
        );
        assert_eq!(g.head(), (head.0 + 1, head.1));
    }

    #[test]
    fn reversal_is_checked_against_applied_direction() {
        let mut g = game();
        g.food.clear();
        let mut queue = ActionBuffer::new(&Action::ALL);
        // Moving right: Up then Left in the same step window.
        queue.push_key(Action::Up);
        queue.push_key(Action::Left);
        step(&mut g, &mut queue);
        assert_eq!(g.direction(), Direction::Up);
        // Left is now legal relative to the applied Up.
        step(&mut g, &mut queue);
        assert_eq!(g.direction(), Direction::Left);
    }

    #[test]
    fn reverse_press_is_discarded() {
        let mut g = game();
        g.food.clear();
        let mut queue = ActionBuffer::new(&Action::ALL);
        queue.push_key(Action::Left);
        assert_eq!(step(&mut g, &mut queue), TickOutcome::Continue);
        assert_eq!(g.direction(), Direction::Right);
        assert!(queue.is_empty());
    }

    #[test]
    fn eating_scores_grows_and_speeds_up() {
        let mut g = game();
        let (hx, hy) = g.head();
        g.food.clear();
        g.food.push(Food {
            x: hx + 1,
            y: hy,
            kind: FoodKind::Normal,
            id: 99,
            age_ms: 0.0,
        });
        let mut queue = ActionBuffer::default();
        step(&mut g, &mut queue);
        assert_eq!(g.score(), 15);
        assert!((g.speed() - 8.3).abs() < 1e-4);
        step(&mut g, &mut queue);
        assert_eq!(g.len(), 4);
        assert!(g.spawn_pending);
    }

    #[test]
    fn slow_eating_gets_no_bonus() {
        let mut g = game();
        let (hx, hy) = g.head();
        g.food.clear();
        g.food.push(Food {
            x: hx + 1,
            y: hy,
            kind: FoodKind::Normal,
            id: 1,
            age_ms: 5000.0,
        });
        let mut queue = ActionBuffer::default();
        step(&mut g, &mut queue);
        assert_eq!(g.score(), 10);
    }

    #[test]
    fn power_up_grants_wall_walk() {
        let mut g = game();
        let (hx, hy) = g.head();
        g.food.clear();
        g.food.push(Food {
            x: hx + 1,
            y: hy,
            kind: FoodKind::WallWalk,
            id: 5,
            age_ms: 0.0,
        });
        let mut queue = ActionBuffer::default();
        step(&mut g, &mut queue);
        assert_eq!(g.score(), 15);
        assert!(g.wall_walk_ms() > 7000.0);
        assert_eq!(g.len(), 3);
    }

    #[test]
    fn wall_walk_wears_off_in_real_time() {
        let mut g = game();
        let mut queue = ActionBuffer::default();
        g.wall_walk_ms = 8000.0;
        // 60 Hz frames: 5 s, then another 5 s.
        for _ in 0..300 {
            g.food.clear();
            frame(&mut g, &mut queue);
        }
        assert!((g.wall_walk_ms() - 3000.0).abs() < 1.0, "{}", g.wall_walk_ms());
        for _ in 0..300 {
            g.food.clear();
            frame(&mut g, &mut queue);
        }
        assert_eq!(g.wall_walk_ms(), 0.0);
    }

    #[test]
    fn first_move_after_wall_walk_ends_hits_the_wall() {
        let mut g = game();
        g.food.clear();
        let mut queue = ActionBuffer::default();
        let (cols, rows) = (g.config.cols, g.config.rows);
        place_head(&mut g, cols - 1, rows / 2, Direction::Right);
        g.wall_walk_ms = 100.0;
        // Seven frames run the power-up out without reaching a move.
        for _ in 0..7 {
            assert_eq!(frame(&mut g, &mut queue), TickOutcome::Continue);
        }
        assert_eq!(g.head(), (cols - 1, rows / 2));
        assert_eq!(g.wall_walk_ms(), 0.0);
        assert_eq!(frame(&mut g, &mut queue), TickOutcome::Lost);
    }

    #[test]
    fn biting_itself_loses() {
        let mut g = game();
        g.food.clear();
        g.body.clear();
        // A hook: head at (5,5) moving down into its own body at (5,6).
        for c in [(5, 5), (4, 5), (4, 6), (5, 6), (6, 6)] {
            g.body.push_back(c);
        }
        g.direction = Direction::Down;
        let mut queue = ActionBuffer::default();
        assert_eq!(step(&mut g, &mut queue), TickOutcome::Lost);
    }

    #[test]
    fn following_the_tail_is_legal() {
        let mut g = game();
        g.food.clear();
        g.body.clear();
        for c in [(5, 5), (5, 6), (4, 6), (4, 5)] {
            g.body.push_back(c);
        }
        g.direction = Direction::Left;
        let mut queue = ActionBuffer::default();
        assert_eq!(step(&mut g, &mut queue), TickOutcome::Continue);
        assert_eq!(g.head(), (4, 5));
    }

    #[test]
    fn power_up_expires_on_real_time_timer() {
        let mut g = game();
        let t0 = Instant::now();
        g.food.clear();
        g.timers.clear();
        g.food.push(Food {
            x: 0,
            y: 0,
            kind: FoodKind::WallWalk,
            id: 42,
            age_ms: 0.0,
        });
        g.timers
            .schedule_once(SnakeTimer::PowerUpExpiry(42), Duration::from_millis(6000), t0);
        g.poll_timers(t0 + Duration::from_millis(5999));
        assert!(g.food().iter().any(|f| f.id == 42));
        g.poll_timers(t0 + Duration::from_millis(6000));
        assert!(g.food().iter().all(|f| f.id != 42));
        // The board never stays empty.
        assert!(!g.food().is_empty());
    }

    #[test]
    fn reset_clears_timers_and_food() {
        let mut g = game();
        g.start_game(Instant::now());
        assert!(!g.food().is_empty());
        g.reset_game();
        assert!(g.food().is_empty());
        assert!(g.timers.is_empty());
    }

    #[test]
    fn renders_head_and_body_at_double_width() {
        let g = game();
        let mut surface = g.create_surface();
        g.render(&mut surface);
        let grid = surface.as_glyph().expect("glyph surface");
        assert_eq!((grid.width(), grid.height()), (48, 16));
        let (hx, hy) = g.head();
        assert_eq!(grid.get(hx as usize * 2, hy as usize), Some('@'));
        assert_eq!(grid.get(hx as usize * 2 - 2, hy as usize), Some('('));
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn leaving_the_board_wraps_only_with_wall_walk(
            dir in any_direction(),
            along in 0i32..16,
            wall_walk in prop::bool::ANY,
        ) {
            let mut g = game();
            g.food.clear();
            let cols = g.config.cols;
            let rows = g.config.rows;
            let (x, y) = match dir {
                Direction::Right => (cols - 1, along % rows),
                Direction::Left => (0, along % rows),
                Direction::Down => (along % cols, rows - 1),
                Direction::Up => (along % cols, 0),
            };
            place_head(&mut g, x, y, dir);
            g.wall_walk_ms = if wall_walk { 8000.0 } else { 0.0 };

            let mut queue = ActionBuffer::default();
            let outcome = step(&mut g, &mut queue);

            if wall_walk {
                prop_assert_eq!(outcome, TickOutcome::Continue);
                let (dx, dy) = dir.delta();
                let expected = ((x + dx).rem_euclid(cols), (y + dy).rem_euclid(rows));
                prop_assert_eq!(g.head(), expected);
            } else {
                prop_assert_eq!(outcome, TickOutcome::Lost);
            }
        }
    }
}
