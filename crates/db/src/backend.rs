//! The persistence seam between the catalog service and its storage.
//!
//! [`CatalogBackend`] abstracts over the remote document collection and the
//! local persisted substitute. Both expose the same surface: full snapshot
//! loads, partial-field merge writes, and the soft-delete lifecycle.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use atelier_core::catalog::compare_projects;
use atelier_core::project::{ProjectDoc, ProjectPatch};

use crate::local::LocalStore;
use crate::repositories::CatalogRepo;
use crate::DbPool;

/// Failures from the persistence layer.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("local store lock poisoned")]
    Poisoned,
}

/// Which storage the service resolved at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Remote,
    Local,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Remote => "remote",
            BackendMode::Local => "local",
        }
    }
}

/// Storage surface shared by both backends.
///
/// `archive` and `restore` return whether a stored document actually
/// changed state, so bulk restore can report per-id outcomes.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    fn mode(&self) -> BackendMode;

    /// Load the complete document set.
    async fn load_snapshot(&self) -> Result<Vec<ProjectDoc>, BackendError>;

    /// Apply a partial-field merge write for `id`, creating the document
    /// when it does not exist.
    async fn write(&self, id: &str, patch: &ProjectPatch) -> Result<(), BackendError>;

    /// Soft-delete the document. `false` when no active document matched.
    async fn archive(&self, id: &str) -> Result<bool, BackendError>;

    /// Clear the soft-delete flag. `false` when no archived document
    /// matched.
    async fn restore(&self, id: &str) -> Result<bool, BackendError>;
}

// ---------------------------------------------------------------------------
// Remote backend
// ---------------------------------------------------------------------------

/// Backend over the PostgreSQL document collection.
pub struct PgCatalogBackend {
    pool: DbPool,
}

impl PgCatalogBackend {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogBackend for PgCatalogBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Remote
    }

    async fn load_snapshot(&self) -> Result<Vec<ProjectDoc>, BackendError> {
        let rows = CatalogRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(ProjectDoc::from).collect())
    }

    async fn write(&self, id: &str, patch: &ProjectPatch) -> Result<(), BackendError> {
        CatalogRepo::merge_write(&self.pool, id, patch).await?;
        Ok(())
    }

    async fn archive(&self, id: &str) -> Result<bool, BackendError> {
        Ok(CatalogRepo::soft_delete(&self.pool, id).await?)
    }

    async fn restore(&self, id: &str) -> Result<bool, BackendError> {
        Ok(CatalogRepo::restore(&self.pool, id).await?)
    }
}

// ---------------------------------------------------------------------------
// Local backend
// ---------------------------------------------------------------------------

/// Backend over the local JSON blob. Write cycles are serialized with a
/// mutex; snapshots from this backend are always complete documents.
pub struct LocalCatalogBackend {
    store: Mutex<LocalStore>,
}

impl LocalCatalogBackend {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    fn with_store<T>(
        &self,
        f: impl FnOnce(&LocalStore) -> Result<T, BackendError>,
    ) -> Result<T, BackendError> {
        let store = self.store.lock().map_err(|_| BackendError::Poisoned)?;
        f(&store)
    }
}

#[async_trait]
impl CatalogBackend for LocalCatalogBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Local
    }

    async fn load_snapshot(&self) -> Result<Vec<ProjectDoc>, BackendError> {
        self.with_store(|store| {
            let records = store.load()?;
            Ok(records.iter().map(ProjectDoc::from_project).collect())
        })
    }

    async fn write(&self, id: &str, patch: &ProjectPatch) -> Result<(), BackendError> {
        self.with_store(|store| {
            let mut records = store.load()?;
            let now = Utc::now();
            match records.iter_mut().find(|p| p.id == id) {
                Some(record) => {
                    patch.apply_to(record);
                    record.updated_at = Some(now);
                }
                None => {
                    let seed = ProjectDoc {
                        id: id.to_string(),
                        ..Default::default()
                    };
                    let mut record = seed.merge_over(None);
                    patch.apply_to(&mut record);
                    record.created_at = Some(now);
                    record.updated_at = Some(now);
                    records.push(record);
                }
            }
            records.sort_by(compare_projects);
            store.save(&records)
        })
    }

    async fn archive(&self, id: &str) -> Result<bool, BackendError> {
        self.with_store(|store| {
            let mut records = store.load()?;
            let Some(record) = records.iter_mut().find(|p| p.id == id && !p.archived) else {
                return Ok(false);
            };
            record.archived = true;
            record.published = false;
            record.updated_at = Some(Utc::now());
            records.sort_by(compare_projects);
            store.save(&records)?;
            Ok(true)
        })
    }

    async fn restore(&self, id: &str) -> Result<bool, BackendError> {
        self.with_store(|store| {
            let mut records = store.load()?;
            let Some(record) = records.iter_mut().find(|p| p.id == id && p.archived) else {
                return Ok(false);
            };
            record.archived = false;
            record.updated_at = Some(Utc::now());
            records.sort_by(compare_projects);
            store.save(&records)?;
            Ok(true)
        })
    }
}
