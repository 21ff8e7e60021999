//! Game engine - game modules and the session that drives them
//!
//! Everything here is terminal-agnostic. A host feeds key events and display
//! refresh instants into a [`GameSession`] and presents its [`Surface`].
//!
//! # Module Structure
//!
//! - [`module`]: the [`GameModule`] capability set, surfaces, stats and results
//! - [`session`]: phase machine (`Ready`, `Countdown`, `Playing`, `Lost`)
//! - [`config`]: per-game tuning and the game catalog
//! - [`games`]: shooter, runner, snake and tetris
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use tui_arcade_engine::{GameConfig, GameSession, SessionConfig};
//! use tui_arcade_engine::types::{Action, GamePhase};
//!
//! let game = GameConfig::from_name("snake").unwrap();
//! let mut session = GameSession::from_config(&game, 7, SessionConfig::default());
//!
//! let t0 = Instant::now();
//! session.key_down(Action::Start, t0);
//! assert_eq!(session.phase(), GamePhase::Countdown);
//!
//! session.frame(t0 + Duration::from_secs(3));
//! assert_eq!(session.phase(), GamePhase::Playing);
//! ```

pub mod config;
pub mod games;
pub mod module;
pub mod session;

pub use tui_arcade_core as core;
pub use tui_arcade_input as input;
pub use tui_arcade_types as types;

pub use config::{
    GameConfig, RunnerConfig, SessionConfig, ShooterConfig, SnakeConfig, TetrisConfig,
};
pub use module::{
    GameModule, GameResult, GameStats, InputBinding, Surface, TickInput, TickOutcome,
};
pub use session::{CompletionCallback, GameSession};
