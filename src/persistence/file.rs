//! Native best-score file

use std::fs;
use std::path::{Path, PathBuf};

use super::{BestScoreRecord, PersistenceError, ScoreStore, parse_best};
use crate::consts::BEST_SCORE_KEY;

/// JSON file holding `{"fillTheAirBest": N}`
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/fillTheAirBest.json`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(format!("{BEST_SCORE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ScoreStore for FileStore {
    fn load(&self) -> Result<u32, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => parse_best(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&mut self, best: u32) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&BestScoreRecord { best })
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        // Write-then-rename so a crash never leaves a half-written file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        log::info!("Best score {} saved to {}", best, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "fill-the-air-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_is_zero() {
        let store = FileStore::in_dir(scratch_dir("missing"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::in_dir(&dir);
        store.save(140).unwrap();

        assert!(store.path().ends_with("fillTheAirBest.json"));
        assert_eq!(FileStore::in_dir(&dir).load().unwrap(), 140);
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"{"fillTheAirBest":140}"#);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let store = FileStore::in_dir(&dir);
        fs::write(store.path(), "{{{{").unwrap();

        assert!(matches!(store.load(), Err(PersistenceError::Corrupt(_))));
        let _ = fs::remove_dir_all(&dir);
    }
}
