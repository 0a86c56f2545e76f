//! Local persisted substitute: a single JSON blob at a well-known path.
//!
//! Used when no database URL is configured. The blob holds the complete
//! record set; a missing or corrupt blob is reseeded from the bundled
//! defaults rather than treated as fatal.

use std::fs;
use std::path::{Path, PathBuf};

use atelier_core::defaults::default_projects;
use atelier_core::project::Project;

use crate::backend::BackendError;

/// Reads and writes the serialized catalog blob.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record set. A missing blob is seeded with the defaults; a
    /// corrupt blob is logged and reseeded so startup never fails on bad
    /// local state.
    pub fn load(&self) -> Result<Vec<Project>, BackendError> {
        if !self.path.exists() {
            let seeded = default_projects();
            self.save(&seeded)?;
            return Ok(seeded);
        }
        let raw = fs::read_to_string(&self.path)?;
        match serde_json::from_str::<Vec<Project>>(&raw) {
            Ok(records) => Ok(records),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "catalog blob is corrupt, reseeding defaults"
                );
                let seeded = default_projects();
                self.save(&seeded)?;
                Ok(seeded)
            }
        }
    }

    /// Serialize and write the full record set.
    pub fn save(&self, records: &[Project]) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_blob_seeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("catalog.json"));
        let records = store.load().unwrap();
        assert_eq!(records.len(), 9);
        assert!(store.path().exists(), "seed is written back");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("catalog.json"));
        let mut records = store.load().unwrap();
        records[0].title = "EDITED".into();
        store.save(&records).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded[0].title, "EDITED");
    }

    #[test]
    fn corrupt_blob_reseeds_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{not json").unwrap();

        let store = LocalStore::new(&path);
        let records = store.load().unwrap();
        assert_eq!(records.len(), 9);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<Vec<Project>>(&raw).is_ok());
    }
}
