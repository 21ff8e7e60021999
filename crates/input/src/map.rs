//! Key mapping from terminal events to logical actions.
//!
//! Maps are plain data tables and can be swapped per game.

use crate::types::{Action, GameKind};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A swappable physical-key to action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    entries: &'static [(KeyCode, Action)],
}

/// Arrows, WASD, vi keys, space and enter.
const STANDARD: &[(KeyCode, Action)] = &[
    (KeyCode::Left, Action::Left),
    (KeyCode::Char('a'), Action::Left),
    (KeyCode::Char('h'), Action::Left),
    (KeyCode::Right, Action::Right),
    (KeyCode::Char('d'), Action::Right),
    (KeyCode::Char('l'), Action::Right),
    (KeyCode::Up, Action::Up),
    (KeyCode::Char('w'), Action::Up),
    (KeyCode::Char('k'), Action::Up),
    (KeyCode::Down, Action::Down),
    (KeyCode::Char('s'), Action::Down),
    (KeyCode::Char('j'), Action::Down),
    (KeyCode::Char(' '), Action::Primary),
    (KeyCode::Enter, Action::Start),
];

/// Standard keys plus `x`/`z` for rotation.
const TETRIS: &[(KeyCode, Action)] = &[
    (KeyCode::Left, Action::Left),
    (KeyCode::Char('a'), Action::Left),
    (KeyCode::Char('h'), Action::Left),
    (KeyCode::Right, Action::Right),
    (KeyCode::Char('d'), Action::Right),
    (KeyCode::Char('l'), Action::Right),
    (KeyCode::Up, Action::Up),
    (KeyCode::Char('w'), Action::Up),
    (KeyCode::Char('k'), Action::Up),
    (KeyCode::Char('x'), Action::Up),
    (KeyCode::Char('z'), Action::Up),
    (KeyCode::Down, Action::Down),
    (KeyCode::Char('s'), Action::Down),
    (KeyCode::Char('j'), Action::Down),
    (KeyCode::Char(' '), Action::Primary),
    (KeyCode::Enter, Action::Start),
];

/// Standard keys plus `f` as an extra fire button.
const SHOOTER: &[(KeyCode, Action)] = &[
    (KeyCode::Left, Action::Left),
    (KeyCode::Char('a'), Action::Left),
    (KeyCode::Char('h'), Action::Left),
    (KeyCode::Right, Action::Right),
    (KeyCode::Char('d'), Action::Right),
    (KeyCode::Char('l'), Action::Right),
    (KeyCode::Char(' '), Action::Primary),
    (KeyCode::Char('f'), Action::Primary),
    (KeyCode::Up, Action::Primary),
    (KeyCode::Enter, Action::Start),
];

impl KeyMap {
    pub const STANDARD: KeyMap = KeyMap { entries: STANDARD };

    pub const fn new(entries: &'static [(KeyCode, Action)]) -> Self {
        Self { entries }
    }

    /// The default map for a game family.
    pub fn for_game(kind: GameKind) -> Self {
        match kind {
            GameKind::Tetris => KeyMap { entries: TETRIS },
            GameKind::Shooter => KeyMap { entries: SHOOTER },
            GameKind::Runner | GameKind::Snake => KeyMap::STANDARD,
        }
    }

    /// Look up a key code; letters match case-insensitively. Unmapped keys yield `None`.
    pub fn lookup(&self, code: KeyCode) -> Option<Action> {
        let code = match code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        self.entries
            .iter()
            .find(|(k, _)| *k == code)
            .map(|&(_, action)| action)
    }

    /// Map a full key event (modified chords other than shift are ignored).
    pub fn map_event(&self, key: KeyEvent) -> Option<Action> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        self.lookup(key.code)
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        KeyMap::STANDARD
    }
}

/// Check if key should quit the program.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key should leave the current game for the picker.
pub fn is_back(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
}
