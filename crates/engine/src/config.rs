//! Per-game configuration records.
//!
//! A game is selected once, at construction, from a tagged [`GameConfig`];
//! each variant carries its own strongly-typed constants. All speeds are per
//! 60 Hz reference frame unless the field name says otherwise.

use crate::games::{RunnerGame, ShooterGame, SnakeGame, TetrisGame};
use crate::module::GameModule;
use crate::types::{
    GameKind, TetrisVariant, DEFAULT_COUNTDOWN_SECS, DEFAULT_KEY_RELEASE_TIMEOUT_MS,
    DEFAULT_MAX_DELTA,
};

/// Session-level knobs shared by every game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub countdown_secs: u32,
    pub max_delta: f32,
    pub key_release_timeout_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            max_delta: DEFAULT_MAX_DELTA,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShooterConfig {
    pub width: usize,
    pub height: usize,
    pub player_speed: f32,
    /// Frames between shots while fire is held.
    pub fire_cooldown: f32,
    pub max_player_bullets: usize,
    pub player_bullet_speed: f32,
    pub enemy_bullet_speed: f32,
    pub lives: u32,
    pub enemy_pitch_x: f32,
    pub enemy_pitch_y: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_step: f32,
    pub fire_rate_base: f32,
    pub fire_rate_step: f32,
    pub wave_bonus: u32,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            width: 60,
            height: 24,
            player_speed: 0.9,
            fire_cooldown: 12.0,
            max_player_bullets: 3,
            player_bullet_speed: 0.7,
            enemy_bullet_speed: 0.35,
            lives: 3,
            enemy_pitch_x: 5.0,
            enemy_pitch_y: 3.0,
            enemy_base_speed: 0.12,
            enemy_speed_step: 0.04,
            fire_rate_base: 0.02,
            fire_rate_step: 0.004,
            wave_bonus: 100,
        }
    }
}

impl ShooterConfig {
    /// `(rows, cols)` of wave `n` (1-based).
    pub fn wave_shape(&self, wave: u32) -> (usize, usize) {
        let rows = (2 + wave as usize).min(5);
        let cols = (5 + wave as usize).min(9);
        (rows, cols)
    }

    pub fn enemy_speed(&self, wave: u32) -> f32 {
        self.enemy_base_speed + self.enemy_speed_step * wave.saturating_sub(1) as f32
    }

    pub fn fire_rate(&self, wave: u32) -> f32 {
        self.fire_rate_base + self.fire_rate_step * wave.saturating_sub(1) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerConfig {
    pub width: usize,
    pub height: usize,
    pub cell_size: usize,
    pub ground_y: f32,
    pub jumper_x: f32,
    pub gravity: f32,
    pub jump_velocity: f32,
    pub max_jumps: u32,
    pub start_speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub obstacle_delay_ms: (u32, u32),
    pub coin_delay_ms: (u32, u32),
    pub coin_value: u32,
    /// Distance units per score point.
    pub distance_per_point: f32,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 40,
            cell_size: 1,
            ground_y: 34.0,
            jumper_x: 12.0,
            gravity: 0.32,
            jump_velocity: -4.0,
            max_jumps: 2,
            start_speed: 1.2,
            max_speed: 3.6,
            acceleration: 0.0015,
            obstacle_delay_ms: (900, 1700),
            coin_delay_ms: (1100, 2000),
            coin_value: 25,
            distance_per_point: 8.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakeConfig {
    pub cols: i32,
    pub rows: i32,
    /// Terminal columns per board cell.
    pub cell_width: usize,
    pub initial_length: usize,
    /// Moves per second.
    pub start_speed: f32,
    pub speed_step: f32,
    pub max_speed: f32,
    pub double_food_chance: f32,
    pub power_up_chance: f32,
    pub power_up_lifetime_ms: u64,
    pub wall_walk_ms: f32,
    pub food_points: u32,
    pub quick_bonus: u32,
    pub quick_window_ms: f32,
    pub power_up_points: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            cols: 24,
            rows: 16,
            cell_width: 2,
            initial_length: 3,
            start_speed: 8.0,
            speed_step: 0.3,
            max_speed: 18.0,
            double_food_chance: 0.35,
            power_up_chance: 0.15,
            power_up_lifetime_ms: 6000,
            wall_walk_ms: 8000.0,
            food_points: 10,
            quick_bonus: 5,
            quick_window_ms: 3000.0,
            power_up_points: 15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TetrisConfig {
    pub variant: TetrisVariant,
    /// Rows per second at level 0.
    pub base_fall_speed: f32,
    pub fall_speed_step: f32,
    pub soft_drop_factor: f32,
    pub hard_drop_points_per_row: u32,
    pub lines_per_level: u32,
    pub max_level: u32,
    /// Pixel variant cell size.
    pub cell_size: usize,
}

impl Default for TetrisConfig {
    fn default() -> Self {
        Self {
            variant: TetrisVariant::Glyph,
            base_fall_speed: 1.0,
            fall_speed_step: 0.75,
            soft_drop_factor: 10.0,
            hard_drop_points_per_row: 2,
            lines_per_level: 10,
            max_level: 15,
            cell_size: 2,
        }
    }
}

impl TetrisConfig {
    pub fn pixel() -> Self {
        Self {
            variant: TetrisVariant::Pixel,
            ..Self::default()
        }
    }

    /// Rows per second at `level`.
    pub fn fall_speed(&self, level: u32) -> f32 {
        self.base_fall_speed + self.fall_speed_step * level as f32
    }

    pub fn level_for_lines(&self, lines: u32) -> u32 {
        if self.lines_per_level == 0 {
            return 0;
        }
        (lines / self.lines_per_level).min(self.max_level)
    }
}

/// A game selection: which family, with which constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameConfig {
    Shooter(ShooterConfig),
    Runner(RunnerConfig),
    Snake(SnakeConfig),
    Tetris(TetrisConfig),
}

impl GameConfig {
    /// Every playable game, in picker order.
    pub fn catalog() -> [GameConfig; 5] {
        [
            GameConfig::Shooter(ShooterConfig::default()),
            GameConfig::Runner(RunnerConfig::default()),
            GameConfig::Snake(SnakeConfig::default()),
            GameConfig::Tetris(TetrisConfig::default()),
            GameConfig::Tetris(TetrisConfig::pixel()),
        ]
    }

    pub fn kind(&self) -> GameKind {
        match self {
            GameConfig::Shooter(_) => GameKind::Shooter,
            GameConfig::Runner(_) => GameKind::Runner,
            GameConfig::Snake(_) => GameKind::Snake,
            GameConfig::Tetris(_) => GameKind::Tetris,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameConfig::Shooter(_) => "shooter",
            GameConfig::Runner(_) => "runner",
            GameConfig::Snake(_) => "snake",
            GameConfig::Tetris(c) => match c.variant {
                TetrisVariant::Glyph => "tetris",
                TetrisVariant::Pixel => "tetris-pixel",
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameConfig::Shooter(_) => "Invaders",
            GameConfig::Runner(_) => "Runner",
            GameConfig::Snake(_) => "Snake",
            GameConfig::Tetris(c) => match c.variant {
                TetrisVariant::Glyph => "Tetris",
                TetrisVariant::Pixel => "Tetris (pixel)",
            },
        }
    }

    /// Look up a game by name; unknown names yield `None`.
    ///
    /// Accepts the short names plus the [`GameKind`] aliases.
    pub fn from_name(name: &str) -> Option<GameConfig> {
        let lower = name.trim().to_lowercase();
        if let Some(found) = Self::catalog().into_iter().find(|c| c.name() == lower) {
            return Some(found);
        }
        match lower.as_str() {
            "pixel-tetris" | "tetris_pixel" => Some(GameConfig::Tetris(TetrisConfig::pixel())),
            other => GameKind::from_str(other)
                .and_then(|kind| Self::catalog().into_iter().find(|c| c.kind() == kind)),
        }
    }

    /// Construct the module for this configuration.
    pub fn build(&self, seed: u32) -> Box<dyn GameModule> {
        match *self {
            GameConfig::Shooter(c) => Box::new(ShooterGame::new(c, seed)),
            GameConfig::Runner(c) => Box::new(RunnerGame::new(c, seed)),
            GameConfig::Snake(c) => Box::new(SnakeGame::new(c, seed)),
            GameConfig::Tetris(c) => Box::new(TetrisGame::new(c, seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_are_unique() {
        let names: Vec<_> = GameConfig::catalog().iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["shooter", "runner", "snake", "tetris", "tetris-pixel"]
        );
    }

    #[test]
    fn from_name_accepts_aliases_and_rejects_unknown() {
        assert_eq!(GameConfig::from_name("SNAKE").map(|c| c.name()), Some("snake"));
        assert_eq!(
            GameConfig::from_name("invaders").map(|c| c.name()),
            Some("shooter")
        );
        assert_eq!(
            GameConfig::from_name("tetris-pixel").map(|c| c.name()),
            Some("tetris-pixel")
        );
        assert!(GameConfig::from_name("pong").is_none());
        assert!(GameConfig::from_name("").is_none());
    }

    #[test]
    fn shooter_waves_grow_to_a_cap() {
        let c = ShooterConfig::default();
        assert_eq!(c.wave_shape(1), (3, 6));
        assert_eq!(c.wave_shape(3), (5, 8));
        assert_eq!(c.wave_shape(10), (5, 9));
        assert!((c.enemy_speed(1) - 0.12).abs() < 1e-6);
        assert!((c.enemy_speed(3) - 0.20).abs() < 1e-6);
        assert!((c.fire_rate(2) - 0.024).abs() < 1e-6);
    }

    #[test]
    fn tetris_level_is_capped() {
        let c = TetrisConfig::default();
        assert_eq!(c.level_for_lines(9), 0);
        assert_eq!(c.level_for_lines(10), 1);
        assert_eq!(c.level_for_lines(1000), 15);
        assert!((c.fall_speed(2) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn build_reports_matching_names() {
        for config in GameConfig::catalog() {
            let module = config.build(7);
            assert_eq!(module.name(), config.name());
            assert_eq!(module.kind(), config.kind());
        }
    }
}
