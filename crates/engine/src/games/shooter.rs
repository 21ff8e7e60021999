//! Invaders-style shooter.
//!
//! The formation marches sideways and drops one row whenever a live enemy
//! touches a side wall. Enemy fire is probabilistic per tick
//! (`rand < fire_rate * delta_time`). Clearing a wave builds a denser, faster
//! one; the ramp never ends.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::ShooterConfig;
use crate::core::{finite_or_zero, overlaps, CharGrid, Rect, SimpleRng, SpritePattern};
use crate::input::KeyMap;
use crate::module::{GameModule, GameStats, InputBinding, Surface, TickInput, TickOutcome};
use crate::types::{
    Action, ActionButton, ButtonMode, Dpad, GameKind, MobileControls, OverlayDescriptor,
};

const PLAYER: SpritePattern = SpritePattern::new(&[" _^_ ", "/___\\"]);
const ENEMY_TOP: SpritePattern = SpritePattern::new(&["/O\\", "< >"]);
const ENEMY_MID: SpritePattern = SpritePattern::new(&["[#]", "/ \\"]);
const ENEMY_LOW: SpritePattern = SpritePattern::new(&["(o)", "\\ /"]);

const PLAYER_BULLET: char = '|';
const ENEMY_BULLET: char = '!';

/// First formation row.
const FORMATION_TOP: f32 = 2.0;
/// Leave the status row free.
const HUD_ROWS: f32 = 1.0;

const BUTTONS: &[ActionButton] = &[ActionButton {
    label: "FIRE",
    action: Action::Primary,
    mode: ButtonMode::Hold,
}];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

impl Bullet {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, 1.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    /// Formation row, 0 at the top; picks sprite and points.
    pub row: usize,
    pub alive: bool,
}

impl Enemy {
    fn rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            ENEMY_TOP.width() as f32,
            ENEMY_TOP.height() as f32,
        )
    }

    fn points(&self) -> u32 {
        match self.row {
            0 => 30,
            1 | 2 => 20,
            _ => 10,
        }
    }

    fn sprite(&self) -> &'static SpritePattern {
        match self.row {
            0 => &ENEMY_TOP,
            1 | 2 => &ENEMY_MID,
            _ => &ENEMY_LOW,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShooterGame {
    config: ShooterConfig,
    rng: SimpleRng,
    player_x: f32,
    player_bullets: Vec<Bullet>,
    enemy_bullets: Vec<Bullet>,
    enemies: Vec<Enemy>,
    /// +1 marching right, -1 marching left.
    march_dir: f32,
    cooldown: f32,
    lives: u32,
    wave: u32,
    score: u32,
    kills: u32,
}

impl ShooterGame {
    pub fn new(config: ShooterConfig, seed: u32) -> Self {
        let mut game = Self {
            config,
            rng: SimpleRng::new(seed),
            player_x: 0.0,
            player_bullets: Vec::with_capacity(config.max_player_bullets),
            enemy_bullets: Vec::with_capacity(16),
            enemies: Vec::with_capacity(45),
            march_dir: 1.0,
            cooldown: 0.0,
            lives: config.lives,
            wave: 1,
            score: 0,
            kills: 0,
        };
        game.reset_game();
        game
    }

    pub fn player_x(&self) -> f32 {
        self.player_x
    }

    pub fn player_y(&self) -> f32 {
        (self.config.height - PLAYER.height()) as f32
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn alive_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn player_bullets(&self) -> &[Bullet] {
        &self.player_bullets
    }

    pub fn enemy_bullets(&self) -> &[Bullet] {
        &self.enemy_bullets
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn player_rect(&self) -> Rect {
        Rect::new(
            self.player_x,
            self.player_y(),
            PLAYER.width() as f32,
            PLAYER.height() as f32,
        )
    }

    /// Lay out wave `self.wave`, centred horizontally.
    fn build_wave(&mut self) {
        let (rows, cols) = self.config.wave_shape(self.wave);
        let span = (cols.saturating_sub(1)) as f32 * self.config.enemy_pitch_x
            + ENEMY_TOP.width() as f32;
        let left = ((self.config.width as f32 - span) / 2.0).max(0.0).floor();

        self.enemies.clear();
        for row in 0..rows {
            for col in 0..cols {
                self.enemies.push(Enemy {
                    x: left + col as f32 * self.config.enemy_pitch_x,
                    y: FORMATION_TOP + row as f32 * self.config.enemy_pitch_y,
                    row,
                    alive: true,
                });
            }
        }
        self.march_dir = 1.0;
        self.enemy_bullets.clear();
        debug!(wave = self.wave, rows, cols, "shooter wave built");
    }

    fn move_player(&mut self, axis: i8, dt: f32) {
        let max_x = (self.config.width - PLAYER.width()) as f32;
        self.player_x =
            (self.player_x + axis as f32 * self.config.player_speed * dt).clamp(0.0, max_x);
    }

    fn try_fire(&mut self) {
        if self.cooldown > 0.0 || self.player_bullets.len() >= self.config.max_player_bullets {
            return;
        }
        self.player_bullets.push(Bullet {
            x: self.player_x + (PLAYER.width() / 2) as f32,
            y: self.player_y() - 1.0,
        });
        self.cooldown = self.config.fire_cooldown;
    }

    fn march(&mut self, dt: f32) {
        let dx = self.config.enemy_speed(self.wave) * self.march_dir * dt;
        for e in &mut self.enemies {
            e.x += dx;
        }

        let right_wall = (self.config.width - ENEMY_TOP.width()) as f32;
        let (min_x, max_x) = self
            .enemies
            .iter()
            .filter(|e| e.alive)
            .fold((f32::MAX, f32::MIN), |(lo, hi), e| (lo.min(e.x), hi.max(e.x)));

        let overshoot = if self.march_dir > 0.0 && max_x >= right_wall {
            max_x - right_wall
        } else if self.march_dir < 0.0 && min_x <= 0.0 {
            min_x
        } else {
            return;
        };

        self.march_dir = -self.march_dir;
        for e in &mut self.enemies {
            e.x -= overshoot;
            e.y += 1.0;
        }
    }

    fn enemy_fire(&mut self, dt: f32) {
        if !self.rng.chance(self.config.fire_rate(self.wave) * dt) {
            return;
        }
        let alive = self.alive_enemies();
        if alive == 0 {
            return;
        }
        let pick = self.rng.next_range(alive as u32) as usize;
        if let Some(shooter) = self.enemies.iter().filter(|e| e.alive).nth(pick) {
            let r = shooter.rect();
            self.enemy_bullets.push(Bullet {
                x: r.x + (ENEMY_TOP.width() / 2) as f32,
                y: r.y + r.height,
            });
        }
    }

    fn resolve_player_hits(&mut self) {
        let enemies = &mut self.enemies;
        let mut gained = 0;
        let mut kills = 0;
        self.player_bullets.retain(|b| {
            let hit = enemies
                .iter_mut()
                .find(|e| e.alive && overlaps(&b.rect(), &e.rect()));
            match hit {
                Some(e) => {
                    e.alive = false;
                    gained += e.points();
                    kills += 1;
                    false
                }
                None => true,
            }
        });
        self.score = self.score.saturating_add(gained);
        self.kills += kills;
    }

    fn resolve_enemy_hits(&mut self) -> bool {
        let player = self.player_rect();
        let before = self.enemy_bullets.len();
        self.enemy_bullets.retain(|b| !overlaps(&b.rect(), &player));
        let hits = (before - self.enemy_bullets.len()) as u32;
        if hits > 0 {
            self.lives = self.lives.saturating_sub(hits);
            debug!(lives = self.lives, "shooter player hit");
        }
        hits > 0
    }

    fn formation_landed(&self) -> bool {
        let player_row = self.player_y();
        self.enemies
            .iter()
            .filter(|e| e.alive)
            .any(|e| e.y + ENEMY_TOP.height() as f32 > player_row)
    }
}

impl GameModule for ShooterGame {
    fn kind(&self) -> GameKind {
        GameKind::Shooter
    }

    fn name(&self) -> &'static str {
        "shooter"
    }

    fn binding(&self) -> InputBinding {
        InputBinding {
            held: &[Action::Left, Action::Right, Action::Primary],
            buffered: &[],
            key_map: KeyMap::for_game(GameKind::Shooter),
        }
    }

    fn mobile_controls(&self) -> MobileControls {
        MobileControls {
            dpad: Dpad::HORIZONTAL,
            dpad_mode: ButtonMode::Hold,
            buttons: BUTTONS,
        }
    }

    fn create_surface(&self) -> Surface {
        Surface::Glyph(CharGrid::new(self.config.width, self.config.height))
    }

    fn reset_game(&mut self) {
        self.player_x = ((self.config.width - PLAYER.width()) / 2) as f32;
        self.player_bullets.clear();
        self.cooldown = 0.0;
        self.lives = self.config.lives;
        self.wave = 1;
        self.score = 0;
        self.kills = 0;
        self.build_wave();
    }

    fn start_game(&mut self, _now: Instant) {}

    fn on_tick(&mut self, delta_time: f32, input: TickInput<'_>) -> TickOutcome {
        let dt = finite_or_zero(delta_time);

        self.move_player(input.held.axis_x(), dt);
        self.cooldown = (self.cooldown - dt).max(0.0);
        if input.held.is_held(Action::Primary) {
            self.try_fire();
        }

        for b in &mut self.player_bullets {
            b.y -= self.config.player_bullet_speed * dt;
        }
        for b in &mut self.enemy_bullets {
            b.y += self.config.enemy_bullet_speed * dt;
        }
        let floor = self.config.height as f32;
        self.player_bullets.retain(|b| b.y + 1.0 > HUD_ROWS);
        self.enemy_bullets.retain(|b| b.y < floor);

        self.march(dt);
        self.enemy_fire(dt);
        self.resolve_player_hits();

        if self.resolve_enemy_hits() && self.lives == 0 {
            return TickOutcome::Lost;
        }
        if self.formation_landed() {
            return TickOutcome::Lost;
        }

        if self.alive_enemies() == 0 {
            self.score = self.score.saturating_add(self.config.wave_bonus);
            self.wave += 1;
            info!(wave = self.wave, "shooter wave cleared");
            self.player_bullets.clear();
            self.build_wave();
        }
        TickOutcome::Continue
    }

    fn render(&self, surface: &mut Surface) {
        let Surface::Glyph(grid) = surface else {
            return;
        };
        grid.draw_text(&format!("WAVE {}", self.wave), 0.0, 0.0);
        let lives = "A ".repeat(self.lives as usize);
        let lives_x = self.config.width.saturating_sub(lives.len()) as f32;
        grid.draw_text(&lives, lives_x, 0.0);

        for e in self.enemies.iter().filter(|e| e.alive) {
            grid.draw_sprite(e.sprite(), e.x, e.y);
        }
        for b in &self.player_bullets {
            grid.draw_char(PLAYER_BULLET, b.x, b.y);
        }
        for b in &self.enemy_bullets {
            grid.draw_char(ENEMY_BULLET, b.x, b.y);
        }
        grid.draw_sprite(&PLAYER, self.player_x, self.player_y());
    }

    fn overlay(&self) -> OverlayDescriptor {
        OverlayDescriptor {
            title: "INVADERS",
            instructions: &["Left/Right: move", "Space: fire (hold)", "Clear waves for +100"],
            subtitle: Some("Defend the bottom row"),
            lost_title: Some("OVERRUN"),
            lost_message: Some(format!("Reached wave {}", self.wave)),
            lost_stats: self.stats().lines(),
        }
    }

    fn stats(&self) -> GameStats {
        GameStats::new(self.score)
            .with("wave", self.wave)
            .with("kills", self.kills)
            .with("lives", self.lives)
    }
}
