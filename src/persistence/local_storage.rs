//! Browser LocalStorage backend (wasm32 only)

use web_sys::Storage;

use super::{PersistenceError, ScoreStore, parse_best};
use crate::consts::BEST_SCORE_KEY;

/// Best score kept as a bare number under `fillTheAirBest`
#[derive(Debug, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable)
    }
}

impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        let storage = Self::storage()?;
        match storage.get_item(BEST_SCORE_KEY) {
            Ok(Some(raw)) => parse_best(&raw),
            Ok(None) => Ok(0),
            Err(_) => Err(PersistenceError::Unavailable),
        }
    }

    fn save(&mut self, best: u32) -> Result<(), PersistenceError> {
        let storage = Self::storage()?;
        storage
            .set_item(BEST_SCORE_KEY, &best.to_string())
            .map_err(|_| PersistenceError::Unavailable)?;
        log::info!("Best score {} saved", best);
        Ok(())
    }
}
