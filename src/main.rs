//! Terminal arcade (default binary).
//!
//! Shows the game picker, or mounts a game directly with `--game`. Rendering
//! uses crossterm and the workspace framebuffer renderer (no widget toolkit).

use std::fs::File;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tui_arcade::app::{self, App};
use tui_arcade::engine::GameConfig;
use tui_arcade::term::TerminalRenderer;
use tui_arcade::ArcadeConfig;

#[derive(Parser, Debug)]
#[command(name = "tui-arcade", about = "Invaders, runner, snake and tetris in the terminal.")]
struct Args {
    /// Mount this game directly (shooter, runner, snake, tetris, tetris-pixel).
    #[arg(long, value_name = "NAME")]
    game: Option<String>,

    /// RNG seed; overrides ARCADE_SEED.
    #[arg(long)]
    seed: Option<u32>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = ArcadeConfig::from_env();
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    init_logging(&config)?;

    let game = args.game.as_deref().and_then(|name| {
        let found = GameConfig::from_name(name);
        if found.is_none() {
            warn!(name, "unknown game, showing the picker");
        }
        found
    });

    let mut term = TerminalRenderer::new();
    term.enter()?;
    info!(
        frame_ms = config.frame_ms,
        key_release_events = term.key_release_events(),
        "arcade started"
    );

    let frame = Duration::from_millis(config.frame_ms);
    let mut app = App::new(config, term.key_release_events());
    if let Some(game) = game {
        app.mount(game);
    }
    let result = app::run(&mut term, &mut app, frame);

    // Always try to restore terminal state.
    if let Err(e) = term.exit() {
        warn!(error = %e, "failed to restore terminal");
    }
    info!("arcade stopped");
    result
}

/// File logging when `ARCADE_LOG_PATH` is set; stdout belongs to the UI.
fn init_logging(config: &ArcadeConfig) -> Result<()> {
    let Some(path) = config.log_path.as_deref() else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("create log file {path}"))?;
    let filter = EnvFilter::try_from_env("ARCADE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
