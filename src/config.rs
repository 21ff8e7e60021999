//! Host configuration from environment variables.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::SessionConfig;
use crate::types::{DEFAULT_COUNTDOWN_SECS, DEFAULT_KEY_RELEASE_TIMEOUT_MS, DEFAULT_MAX_DELTA};

pub const DEFAULT_FRAME_MS: u64 = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct ArcadeConfig {
    /// Host loop interval (one display refresh).
    pub frame_ms: u64,
    pub max_delta: f32,
    pub countdown_secs: u32,
    pub key_release_timeout_ms: u32,
    /// Fixed RNG seed; derived from the clock when absent.
    pub seed: Option<u32>,
    pub log_path: Option<String>,
    pub results_path: Option<String>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            frame_ms: DEFAULT_FRAME_MS,
            max_delta: DEFAULT_MAX_DELTA,
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            seed: None,
            log_path: None,
            results_path: None,
        }
    }
}

impl ArcadeConfig {
    /// Read `ARCADE_*` variables; unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ArcadeConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();

        let frame_ms = parse(&var, "ARCADE_FRAME_MS")
            .filter(|&ms: &u64| ms > 0)
            .unwrap_or(d.frame_ms);
        let max_delta = parse(&var, "ARCADE_MAX_DELTA")
            .filter(|v: &f32| v.is_finite())
            .unwrap_or(d.max_delta);
        let countdown_secs = parse(&var, "ARCADE_COUNTDOWN").unwrap_or(d.countdown_secs);
        let key_release_timeout_ms =
            parse(&var, "ARCADE_KEY_RELEASE_MS").unwrap_or(d.key_release_timeout_ms);
        let seed = parse(&var, "ARCADE_SEED");

        Self {
            frame_ms,
            max_delta,
            countdown_secs,
            key_release_timeout_ms,
            seed,
            log_path: non_empty(var("ARCADE_LOG_PATH")),
            results_path: non_empty(var("ARCADE_RESULTS_PATH")),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            countdown_secs: self.countdown_secs,
            max_delta: self.max_delta,
            key_release_timeout_ms: self.key_release_timeout_ms,
        }
    }

    /// The configured seed, or one derived from the wall clock.
    pub fn seed_or_clock(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }
}

fn parse<T: std::str::FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    var(key).and_then(|s| s.trim().parse().ok())
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
