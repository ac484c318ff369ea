//! Best score persistence
//!
//! The only thing that outlives a run is one non-negative integer stored
//! under [`BEST_SCORE_KEY`](crate::consts::BEST_SCORE_KEY). Backends:
//! - [`MemoryStore`]: tests and headless runs
//! - [`FileStore`]: native JSON file (tmp → rename on save)
//! - [`LocalStorageStore`]: browser LocalStorage (wasm32)

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from a best-score backend
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt best score record: {0}")]
    Corrupt(String),
}

/// Where the best score lives between runs
pub trait ScoreStore {
    /// Stored best score; 0 when nothing has been saved yet
    fn load(&self) -> Result<u32, PersistenceError>;
    fn save(&mut self, best: u32) -> Result<(), PersistenceError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn load(&self) -> Result<u32, PersistenceError> {
        (**self).load()
    }

    fn save(&mut self, best: u32) -> Result<(), PersistenceError> {
        (**self).save(best)
    }
}

/// JSON document shape shared by the file backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScoreRecord {
    #[serde(rename = "fillTheAirBest")]
    pub best: u32,
}

/// Parse a stored best score; accepts the bare-number form browsers keep
pub fn parse_best(raw: &str) -> Result<u32, PersistenceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(best) = raw.parse::<u32>() {
        return Ok(best);
    }
    serde_json::from_str::<BestScoreRecord>(raw)
        .map(|record| record.best)
        .map_err(|e| PersistenceError::Corrupt(format!("{raw:?}: {e}")))
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    best: u32,
    /// Number of successful saves
    pub saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_best(best: u32) -> Self {
        Self { best, saves: 0 }
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        Ok(self.best)
    }

    fn save(&mut self, best: u32) -> Result<(), PersistenceError> {
        self.best = best;
        self.saves += 1;
        Ok(())
    }
}
