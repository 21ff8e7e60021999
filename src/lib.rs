//! Terminal arcade (workspace facade crate).
//!
//! Re-exports the workspace crates under short names and hosts the pieces only
//! the binary needs: environment configuration, the round results log and the
//! interactive host loop.

pub mod app;
pub mod config;
pub mod results;

pub use tui_arcade_core as core;
pub use tui_arcade_engine as engine;
pub use tui_arcade_input as input;
pub use tui_arcade_term as term;
pub use tui_arcade_types as types;

pub use app::{App, AppFlow};
pub use config::ArcadeConfig;
pub use results::{ResultLog, ResultRecord};
