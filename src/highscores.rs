//! High score record store
//!
//! The simulation only ever sees the `RecordStore` trait. Loading never fails
//! outward: a missing, unreadable or corrupt record reads as zero.

use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while persisting the high score
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high score I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("high score encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistent home of the best score ever reached
pub trait RecordStore {
    /// Stored high score, 0 if absent or unreadable
    fn load_high_score(&mut self) -> u64;

    /// Overwrite the stored high score
    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// On-disk layout of the record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Default file name, used relative to the working directory
    pub const DEFAULT_FILE: &'static str = "arc_defense_highscore.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&self) -> Result<HighScoreRecord, StoreError> {
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FILE)
    }
}

impl RecordStore for JsonFileStore {
    fn load_high_score(&mut self) -> u64 {
        match self.read_record() {
            Ok(record) => {
                log::info!("Loaded high score {} from {:?}", record.high_score, self.path);
                record.high_score
            }
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No high score found, starting fresh");
                0
            }
            Err(e) => {
                log::warn!("Ignoring unreadable high score at {:?}: {}", self.path, e);
                0
            }
        }
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        // Write then rename so a crash never leaves a half-written record
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::debug!("High score {} saved to {:?}", score, self.path);
        Ok(())
    }
}

/// In-process store. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Rc<Cell<Option<u64>>>,
    saves: Rc<Cell<u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record
    pub fn with_score(score: u64) -> Self {
        let store = Self::default();
        store.record.set(Some(score));
        store
    }

    /// Raw stored value, without the zero default
    pub fn stored(&self) -> Option<u64> {
        self.record.get()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> u32 {
        self.saves.get()
    }
}

impl RecordStore for MemoryStore {
    fn load_high_score(&mut self) -> u64 {
        self.record.get().unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.record.set(Some(score));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (JsonFileStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("score.json"));
        (store, dir)
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let (mut store, _dir) = temp_store();
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn test_round_trip_across_instances() {
        let (mut store, _dir) = temp_store();
        for score in [0, 1, 42, u64::MAX] {
            store.save_high_score(score).unwrap();
            let mut fresh = JsonFileStore::new(store.path());
            assert_eq!(fresh.load_high_score(), score);
        }
    }

    #[test]
    fn test_corrupt_file_loads_zero() {
        let (mut store, _dir) = temp_store();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load_high_score(), 0);

        std::fs::write(store.path(), r#"{ "high_score": -5 }"#).unwrap();
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn test_save_into_missing_directory_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("nope").join("score.json"));
        assert!(matches!(store.save_high_score(7), Err(StoreError::Io(_))));
    }

    #[test]
    fn test_memory_store_clones_share_record() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        assert_eq!(store.stored(), None);
        writer.save_high_score(120).unwrap();
        assert_eq!(store.stored(), Some(120));
        assert_eq!(store.save_count(), 1);
        assert_eq!(MemoryStore::with_score(9).load_high_score(), 9);
    }
}
