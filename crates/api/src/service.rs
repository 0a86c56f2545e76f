//! The catalog service: every operation the HTTP surface exposes.
//!
//! Holds the merged catalog and the draft overlay behind async locks and
//! funnels all mutations through a persist-and-commit discipline: the
//! in-memory state only keeps a change once the backend accepted it, and a
//! failed backend write rolls the record back before the error surfaces.
//!
//! Lock order is always catalog, then drafts, then sync state.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use atelier_core::catalog::{Catalog, GalleryUpdate};
use atelier_core::defaults::suggest_covers;
use atelier_core::draft::{DraftOverlay, DraftPatch};
use atelier_core::error::CoreError;
use atelier_core::project::{
    Galleries, GalleryKey, Project, ProjectDoc, ProjectKind, ProjectPatch, SubCategory,
    DEFAULT_CATEGORY,
};
use atelier_core::types::{ProjectId, Timestamp};
use atelier_core::visibility::{is_public, matches_filter, ProjectStatus};
use atelier_db::backend::{BackendError, CatalogBackend};
use atelier_events::{
    CatalogEvent, EventBus, COVER_UPDATED, GALLERY_UPDATED, PROJECT_ARCHIVED, PROJECT_CREATED,
    PROJECT_RESTORED, PROJECT_SAVED,
};

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A catalog record as shown in the admin list, annotated with its
/// lifecycle state and draft situation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub status: &'static str,
    pub has_draft: bool,
    pub dirty: bool,
}

/// Detail view for a single project: the committed record plus the draft
/// copy when one exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProjectDetail {
    pub project: Project,
    pub status: &'static str,
    pub draft: Option<Project>,
    pub dirty: bool,
}

/// Service health and synchronization diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStatus {
    pub backend: &'static str,
    pub record_count: usize,
    pub archived_count: usize,
    pub draft_count: usize,
    pub sync_error: Option<String>,
    pub last_synced: Option<Timestamp>,
}

/// Outcome of a bulk restore: each id is attempted independently.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreAllReport {
    pub restored: Vec<ProjectId>,
    pub failed: Vec<ProjectId>,
}

/// Fields accepted when creating a new project.
#[derive(Debug, Clone, Default, serde::Deserialize, validator::Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ProjectKind>,
    #[serde(default)]
    pub sub_category: Option<SubCategory>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default)]
struct SyncState {
    sync_error: Option<String>,
    last_synced: Option<Timestamp>,
}

/// Resolve the cover before a record leaves the service: the explicit
/// cover when set, else the first gallery image, else the placeholder.
/// In-memory records keep the empty string, meaning "derive".
fn present(mut project: Project) -> Project {
    let cover = project.display_cover().to_string();
    project.cover_image = cover;
    project
}

// ---------------------------------------------------------------------------
// CatalogService
// ---------------------------------------------------------------------------

pub struct CatalogService {
    backend: Arc<dyn CatalogBackend>,
    bus: Arc<EventBus>,
    catalog: RwLock<Catalog>,
    drafts: Mutex<DraftOverlay>,
    sync: Mutex<SyncState>,
}

impl CatalogService {
    /// A service seeded with the bundled defaults. Call [`resync`] to pull
    /// the first snapshot from the backend.
    ///
    /// [`resync`]: CatalogService::resync
    pub fn new(backend: Arc<dyn CatalogBackend>, bus: Arc<EventBus>) -> Self {
        Self {
            backend,
            bus,
            catalog: RwLock::new(Catalog::new()),
            drafts: Mutex::new(DraftOverlay::new()),
            sync: Mutex::new(SyncState::default()),
        }
    }

    // -- Synchronization ---------------------------------------------------

    /// Load a full snapshot from the backend and reconcile it into the
    /// catalog. On failure the catalog falls back to the bundled defaults
    /// and the error is recorded for the status endpoint.
    pub async fn resync(&self) -> Result<(), BackendError> {
        match self.backend.load_snapshot().await {
            Ok(docs) => {
                self.apply_snapshot(&docs).await;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "snapshot load failed, falling back to defaults");
                let mut catalog = self.catalog.write().await;
                *catalog = Catalog::new();
                let live: HashSet<String> = catalog.ids().into_iter().collect();
                drop(catalog);
                self.drafts.lock().await.retain_existing(&live);
                self.sync.lock().await.sync_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Reconcile a snapshot into the catalog and drop drafts for records
    /// that no longer exist.
    pub async fn apply_snapshot(&self, docs: &[ProjectDoc]) {
        let mut catalog = self.catalog.write().await;
        catalog.apply_remote_snapshot(docs);
        let live: HashSet<String> = catalog.ids().into_iter().collect();
        drop(catalog);

        self.drafts.lock().await.retain_existing(&live);

        let mut sync = self.sync.lock().await;
        sync.sync_error = None;
        sync.last_synced = Some(Utc::now());
    }

    // -- Reads -------------------------------------------------------------

    /// Published, non-archived records matching the public two-tier filter.
    pub async fn list_public(
        &self,
        kind: Option<ProjectKind>,
        sub_category: Option<SubCategory>,
    ) -> Vec<Project> {
        let catalog = self.catalog.read().await;
        catalog
            .list_published()
            .filter(|p| matches_filter(p, kind, sub_category))
            .map(|p| present(p.clone()))
            .collect()
    }

    /// A single publicly visible record.
    pub async fn get_public(&self, id: &str) -> Result<Project, CoreError> {
        let catalog = self.catalog.read().await;
        catalog
            .get(id)
            .filter(|p| is_public(p))
            .cloned()
            .map(present)
            .ok_or_else(|| CoreError::NotFound {
                entity: "Project",
                id: id.to_string(),
            })
    }

    /// Admin list for either the active or the archived view.
    pub async fn admin_list(&self, show_archived: bool) -> Vec<AdminProjectView> {
        let catalog = self.catalog.read().await;
        let drafts = self.drafts.lock().await;
        catalog
            .list_admin(show_archived)
            .map(|p| AdminProjectView {
                status: ProjectStatus::of(p).label(),
                has_draft: drafts.contains(&p.id),
                dirty: drafts.has_changes(&catalog, &p.id),
                project: present(p.clone()),
            })
            .collect()
    }

    /// Admin detail: committed record plus draft state.
    pub async fn admin_get(&self, id: &str) -> Result<AdminProjectDetail, CoreError> {
        let catalog = self.catalog.read().await;
        let drafts = self.drafts.lock().await;
        let project = catalog.get(id).cloned().ok_or_else(|| CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;
        Ok(AdminProjectDetail {
            status: ProjectStatus::of(&project).label(),
            draft: drafts.get(id).cloned().map(present),
            dirty: drafts.has_changes(&catalog, id),
            project: present(project),
        })
    }

    pub async fn status(&self) -> ServiceStatus {
        let catalog = self.catalog.read().await;
        let drafts = self.drafts.lock().await;
        let sync = self.sync.lock().await;
        ServiceStatus {
            backend: self.backend.mode().as_str(),
            record_count: catalog.len(),
            archived_count: catalog.archived_ids().len(),
            draft_count: drafts.ids().len(),
            sync_error: sync.sync_error.clone(),
            last_synced: sync.last_synced,
        }
    }

    /// Stable stock-cover suggestions for an existing project.
    pub async fn suggest_covers(&self, id: &str) -> Result<Vec<&'static str>, CoreError> {
        let catalog = self.catalog.read().await;
        if catalog.get(id).is_none() {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: id.to_string(),
            });
        }
        Ok(suggest_covers(id))
    }

    // -- Creation ----------------------------------------------------------

    /// Create a new, unpublished project at the end of the display order.
    pub async fn create_project(&self, req: CreateProjectRequest) -> AppResult<Project> {
        let title = req.title.trim();
        let location = req.location.trim();
        if title.is_empty() || location.is_empty() {
            return Err(CoreError::Validation("Title and location are required".into()).into());
        }

        let mut catalog = self.catalog.write().await;
        let now = Utc::now();
        let category = req
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);
        let project = Project {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            location: location.to_string(),
            category: category.to_string(),
            kind: req.kind.unwrap_or(ProjectKind::Architecture),
            sub_category: req.sub_category.unwrap_or(SubCategory::Residential),
            cover_image: String::new(),
            galleries: Galleries::default(),
            published: false,
            description: req
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            display_order: Some(catalog.next_display_order()),
            created_at: Some(now),
            updated_at: Some(now),
            archived: false,
        };

        let mut patch = ProjectPatch::from_project(&project);
        patch.mark_created = true;
        self.backend.write(&project.id, &patch).await?;

        catalog.upsert_local(project.clone());
        self.bus
            .publish(CatalogEvent::new(PROJECT_CREATED).with_project(project.id.clone()));
        Ok(present(project))
    }

    // -- Drafts ------------------------------------------------------------

    /// Apply a metadata patch to the draft for `id`, creating the draft
    /// copy lazily. Nothing is persisted until save.
    pub async fn update_draft(&self, id: &str, patch: &DraftPatch) -> AppResult<AdminProjectDetail> {
        {
            let catalog = self.catalog.read().await;
            let mut drafts = self.drafts.lock().await;
            drafts.apply(&catalog, id, patch)?;
        }
        Ok(self.admin_get(id).await?)
    }

    /// Throw the draft for `id` away. Idempotent.
    pub async fn discard_draft(&self, id: &str) -> bool {
        self.drafts.lock().await.clear(id)
    }

    /// Validate and persist the draft for `id`. The draft is only cleared
    /// after the backend accepted the write, so a failed save loses
    /// nothing.
    pub async fn save_project(&self, id: &str) -> AppResult<Project> {
        let mut catalog = self.catalog.write().await;
        let mut drafts = self.drafts.lock().await;

        let prepared = drafts.prepare_commit(id, Utc::now())?;
        let patch = ProjectPatch::from_project(&prepared);
        self.backend.write(id, &patch).await?;

        catalog.upsert_local(prepared.clone());
        drafts.clear(id);
        self.bus
            .publish(CatalogEvent::new(PROJECT_SAVED).with_project(id.to_string()));
        Ok(present(prepared))
    }

    // -- Lifecycle ---------------------------------------------------------

    /// Archive a project: hidden from the public site, its draft dropped.
    pub async fn archive(&self, id: &str) -> AppResult<Project> {
        let mut catalog = self.catalog.write().await;
        let record = catalog.get(id).cloned().ok_or_else(|| CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;
        if record.archived {
            return Err(CoreError::Conflict("Project is already archived".into()).into());
        }

        if !self.backend.archive(id).await? {
            // A bundled default lives only in memory until first written, so
            // the backend has no row to flag. Create the row already
            // archived, or the next snapshot re-merge resurrects the project.
            let patch = ProjectPatch {
                is_deleted: Some(true),
                published: Some(false),
                ..ProjectPatch::from_project(&record)
            };
            self.backend.write(id, &patch).await?;
        }
        let archived = catalog.archive(id, Utc::now())?;
        self.drafts.lock().await.clear(id);
        self.bus
            .publish(CatalogEvent::new(PROJECT_ARCHIVED).with_project(id.to_string()));
        Ok(present(archived))
    }

    /// Restore an archived project to the hidden state. Republishing is a
    /// separate, explicit edit.
    pub async fn restore(&self, id: &str) -> AppResult<Project> {
        let mut catalog = self.catalog.write().await;
        let record = catalog.get(id).ok_or_else(|| CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;
        if !record.archived {
            return Err(CoreError::Conflict("Project is not archived".into()).into());
        }

        self.backend.restore(id).await?;
        let restored = catalog.restore(id, Utc::now())?;
        // A draft staged while the project was archived is stale.
        self.drafts.lock().await.clear(id);
        self.bus
            .publish(CatalogEvent::new(PROJECT_RESTORED).with_project(id.to_string()));
        Ok(present(restored))
    }

    /// Restore every archived project, attempting each id independently so
    /// one failing write does not block the rest.
    pub async fn restore_all(&self) -> RestoreAllReport {
        let mut catalog = self.catalog.write().await;
        let mut drafts = self.drafts.lock().await;
        let ids = catalog.archived_ids();
        let mut report = RestoreAllReport {
            restored: Vec::new(),
            failed: Vec::new(),
        };

        for id in ids {
            match self.backend.restore(&id).await {
                Ok(_) => match catalog.restore(&id, Utc::now()) {
                    Ok(_) => {
                        drafts.clear(&id);
                        self.bus
                            .publish(CatalogEvent::new(PROJECT_RESTORED).with_project(id.clone()));
                        report.restored.push(id);
                    }
                    Err(err) => {
                        tracing::error!(project_id = %id, error = %err, "restore failed in memory");
                        report.failed.push(id);
                    }
                },
                Err(err) => {
                    tracing::error!(project_id = %id, error = %err, "restore write failed");
                    report.failed.push(id);
                }
            }
        }
        report
    }

    // -- Gallery partition logic -------------------------------------------

    /// Append an image reference to one of the two buckets. Gallery edits
    /// commit immediately; on a failed write the record is rolled back to
    /// its pre-edit state.
    pub async fn add_image(
        &self,
        id: &str,
        gallery: GalleryKey,
        url: &str,
    ) -> AppResult<GalleryUpdate> {
        let mut catalog = self.catalog.write().await;
        let drafts = self.drafts.lock().await;

        // Same-bucket duplicates are reported as such before the global
        // uniqueness check, which also covers unsaved draft copies.
        let record = catalog.get(id).ok_or_else(|| CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;
        if record.galleries.bucket(gallery).iter().any(|u| u == url) {
            return Err(CoreError::ImageAlreadyInGallery {
                gallery,
                url: url.to_string(),
            }
            .into());
        }
        let rollback = record.clone();
        if drafts.image_refs().contains(url) {
            return Err(CoreError::ImageInUse {
                url: url.to_string(),
            }
            .into());
        }
        drop(drafts);

        let update = catalog.add_image(id, gallery, url, Utc::now())?;
        self.persist_gallery(&mut catalog, id, rollback, &update)
            .await?;
        self.bus.publish(
            CatalogEvent::new(GALLERY_UPDATED)
                .with_project(id.to_string())
                .with_payload(serde_json::json!({ "gallery": gallery, "added": url })),
        );
        Ok(update)
    }

    /// Remove an image reference from whichever bucket holds it. Removing
    /// an absent reference is a no-op and reports `None`.
    pub async fn remove_image(&self, id: &str, url: &str) -> AppResult<Option<GalleryUpdate>> {
        let mut catalog = self.catalog.write().await;
        let rollback = catalog.get(id).cloned().ok_or_else(|| CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;

        let Some(update) = catalog.remove_image(id, url, Utc::now())? else {
            return Ok(None);
        };
        self.persist_gallery(&mut catalog, id, rollback, &update)
            .await?;
        self.bus.publish(
            CatalogEvent::new(GALLERY_UPDATED)
                .with_project(id.to_string())
                .with_payload(serde_json::json!({ "removed": url })),
        );
        Ok(Some(update))
    }

    /// Set a manual cover override.
    pub async fn set_cover(&self, id: &str, url: &str) -> AppResult<GalleryUpdate> {
        if url.trim().is_empty() {
            return Err(CoreError::Validation("Cover reference is empty".into()).into());
        }
        let mut catalog = self.catalog.write().await;
        let rollback = catalog.get(id).cloned().ok_or_else(|| CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;

        let update = catalog.set_cover(id, url, Utc::now())?;
        self.persist_cover(&mut catalog, id, rollback, &update)
            .await?;
        self.bus
            .publish(CatalogEvent::new(COVER_UPDATED).with_project(id.to_string()));
        Ok(update)
    }

    /// Drop any manual cover override and re-derive from the galleries.
    pub async fn reset_cover(&self, id: &str) -> AppResult<GalleryUpdate> {
        let mut catalog = self.catalog.write().await;
        let rollback = catalog.get(id).cloned().ok_or_else(|| CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })?;

        let update = catalog.reset_cover(id, Utc::now())?;
        self.persist_cover(&mut catalog, id, rollback, &update)
            .await?;
        self.bus
            .publish(CatalogEvent::new(COVER_UPDATED).with_project(id.to_string()));
        Ok(update)
    }

    // -- Persistence helpers -----------------------------------------------

    async fn persist_gallery(
        &self,
        catalog: &mut Catalog,
        id: &str,
        rollback: Project,
        update: &GalleryUpdate,
    ) -> Result<(), AppError> {
        let patch = ProjectPatch::galleries(update.galleries.clone(), update.cover_image.clone());
        if let Err(err) = self.backend.write(id, &patch).await {
            catalog.upsert_local(rollback);
            return Err(err.into());
        }
        Ok(())
    }

    async fn persist_cover(
        &self,
        catalog: &mut Catalog,
        id: &str,
        rollback: Project,
        update: &GalleryUpdate,
    ) -> Result<(), AppError> {
        let patch = ProjectPatch::cover(update.cover_image.clone());
        if let Err(err) = self.backend.write(id, &patch).await {
            catalog.upsert_local(rollback);
            return Err(err.into());
        }
        Ok(())
    }
}
