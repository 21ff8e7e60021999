//! Game picker state shown when no game is mounted.

use crate::engine::GameConfig;

#[derive(Debug, Clone)]
pub struct Picker {
    games: [GameConfig; 5],
    selected: usize,
}

impl Default for Picker {
    fn default() -> Self {
        Self::new()
    }
}

impl Picker {
    pub fn new() -> Self {
        Self {
            games: GameConfig::catalog(),
            selected: 0,
        }
    }

    pub fn games(&self) -> &[GameConfig] {
        &self.games
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn current(&self) -> GameConfig {
        self.games[self.selected]
    }

    /// Move the cursor, wrapping at both ends.
    pub fn move_by(&mut self, delta: i32) {
        let len = self.games.len() as i32;
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
    }

    /// Select by zero-based index; out of range is ignored.
    pub fn choose(&mut self, index: usize) -> Option<GameConfig> {
        let game = *self.games.get(index)?;
        self.selected = index;
        Some(game)
    }

    /// Highlight the entry with this name, if any.
    pub fn focus(&mut self, name: &str) {
        if let Some(i) = self.games.iter().position(|g| g.name() == name) {
            self.selected = i;
        }
    }
}
