//! Round results log: one JSON object per finished round, one per line.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::GameResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub game: String,
    pub score: u32,
    pub stats: BTreeMap<String, u32>,
    pub duration_ms: u64,
    pub seed: u32,
}

impl ResultRecord {
    pub fn from_result(result: &GameResult, seed: u32) -> Self {
        Self {
            game: result.name.to_string(),
            score: result.score,
            stats: result
                .stats
                .entries
                .iter()
                .map(|&(label, value)| (label.to_string(), value))
                .collect(),
            duration_ms: result.duration_ms,
            seed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultLog {
    path: PathBuf,
}

impl ResultLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, creating the file (not its directory) if needed.
    pub fn append(&self, record: &ResultRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open results log {}", self.path.display()))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Append, logging failures instead of returning them.
    pub fn record(&self, record: &ResultRecord) {
        if let Err(e) = self.append(record) {
            warn!(error = %e, path = %self.path.display(), "failed to write round result");
        }
    }

    /// Read every record back; malformed lines are skipped.
    pub fn read_all(&self) -> Result<Vec<ResultRecord>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("read results log {}", self.path.display()))?;
        Ok(text
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameStats;
    use crate::types::GameKind;

    fn result() -> GameResult {
        GameResult {
            kind: GameKind::Snake,
            name: "snake",
            score: 55,
            stats: GameStats::new(55).with("length", 8).with("food", 5),
            duration_ms: 31_250,
        }
    }

    #[test]
    fn test_record_carries_stats_and_seed() {
        let r = ResultRecord::from_result(&result(), 9);
        assert_eq!(r.game, "snake");
        assert_eq!(r.stats.get("length"), Some(&8));
        assert_eq!(r.seed, 9);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"duration_ms\":31250"));
    }

    #[test]
    fn test_append_writes_one_line_per_round() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("results.jsonl"));
        let r = ResultRecord::from_result(&result(), 1);
        log.append(&r).unwrap();
        log.append(&r).unwrap();

        let text = fs::read_to_string(log.path()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(log.read_all().unwrap(), vec![r.clone(), r]);
    }

    #[test]
    fn test_record_swallows_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let log = ResultLog::new(dir.path().join("missing").join("results.jsonl"));
        log.record(&ResultRecord::from_result(&result(), 1));
        assert!(log.append(&ResultRecord::from_result(&result(), 1)).is_err());
    }
}
