//! High score persistence
//!
//! The simulation only ever sees the `HighScoreStore` trait; where the number
//! actually lives (memory, a JSON file, browser storage) is the driver's call.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Key the session reads and writes its best score under
pub const HIGH_SCORE_KEY: &str = "hs";

/// Named integer scores
pub trait HighScoreStore {
    /// Stored score for `key`, if any
    fn read(&self, key: &str) -> Option<u64>;
    /// Replace the stored score for `key`
    fn write(&mut self, key: &str, score: u64);
}

/// Write `score` under `key` only when it beats the stored one.
/// Returns true if the store was updated.
pub fn record_if_higher<S: HighScoreStore + ?Sized>(store: &mut S, key: &str, score: u64) -> bool {
    let previous = store.read(key).unwrap_or(0);
    if score > previous {
        store.write(key, score);
        log::info!("New high score {} (was {})", score, previous);
        true
    } else {
        false
    }
}

/// In-process store, the default for new sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HashMap<String, u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryStore {
    fn read(&self, key: &str) -> Option<u64> {
        self.scores.get(key).copied()
    }

    fn write(&mut self, key: &str, score: u64) {
        self.scores.insert(key.to_string(), score);
    }
}

/// Scores kept as a JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    scores: HashMap<String, u64>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = match Self::read_file(&path) {
            Ok(scores) => {
                log::info!("Loaded {} high scores from {}", scores.len(), path.display());
                scores
            }
            Err(e) => {
                log::warn!("No high scores loaded, starting fresh: {:#}", e);
                HashMap::new()
            }
        };
        Self { path, scores }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> anyhow::Result<HashMap<String, u64>> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
    }

    fn flush(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.scores)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("writing {}", self.path.display()))
    }
}

impl HighScoreStore for JsonFileStore {
    fn read(&self, key: &str) -> Option<u64> {
        self.scores.get(key).copied()
    }

    fn write(&mut self, key: &str, score: u64) {
        self.scores.insert(key.to_string(), score);
        if let Err(e) = self.flush() {
            log::warn!("High score not persisted: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_only_when_strictly_higher() {
        let mut store = MemoryStore::new();
        assert!(record_if_higher(&mut store, HIGH_SCORE_KEY, 300));
        assert!(!record_if_higher(&mut store, HIGH_SCORE_KEY, 300));
        assert!(!record_if_higher(&mut store, HIGH_SCORE_KEY, 200));
        assert_eq!(store.read(HIGH_SCORE_KEY), Some(300));
        assert!(record_if_higher(&mut store, HIGH_SCORE_KEY, 400));
        assert_eq!(store.read(HIGH_SCORE_KEY), Some(400));
    }

    #[test]
    fn test_zero_score_never_recorded() {
        let mut store = MemoryStore::new();
        assert!(!record_if_higher(&mut store, HIGH_SCORE_KEY, 0));
        assert_eq!(store.read(HIGH_SCORE_KEY), None);
    }

    #[test]
    fn test_file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut store = JsonFileStore::open(path.clone());
        assert_eq!(store.read(HIGH_SCORE_KEY), None);
        store.write(HIGH_SCORE_KEY, 1200);

        let reopened = JsonFileStore::open(path.clone());
        assert_eq!(reopened.read(HIGH_SCORE_KEY), Some(1200));
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "garbage").unwrap();

        let store = JsonFileStore::open(path.clone());
        assert_eq!(store.read(HIGH_SCORE_KEY), None);
    }
}
