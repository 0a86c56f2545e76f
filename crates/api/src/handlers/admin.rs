//! Handlers for the authenticated `/admin` surface: project lifecycle,
//! drafts, gallery partition edits, and service diagnostics.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use atelier_core::draft::DraftPatch;
use atelier_core::project::{GalleryKey, Project};

use crate::error::{AppError, AppResult};
use crate::middleware::AuthAdmin;
use crate::service::{
    AdminProjectDetail, AdminProjectView, CreateProjectRequest, RestoreAllReport, ServiceStatus,
};
use crate::state::AppState;

/// Query parameters for the admin project listing.
#[derive(Debug, Deserialize)]
pub struct AdminListQuery {
    /// `true` switches to the archived view. Defaults to the active view.
    #[serde(default)]
    pub archived: bool,
}

/// Body carrying a single image reference.
#[derive(Debug, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

/// GET /api/v1/admin/projects
///
/// Active or archived records, annotated with draft state.
pub async fn list(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Query(params): Query<AdminListQuery>,
) -> AppResult<Json<Vec<AdminProjectView>>> {
    Ok(Json(state.service.admin_list(params.archived).await))
}

/// POST /api/v1/admin/projects
///
/// Create a new, unpublished project at the end of the display order.
pub async fn create(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> AppResult<Json<Project>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(Json(state.service.create_project(req).await?))
}

/// GET /api/v1/admin/projects/{id}
///
/// The committed record plus the draft copy when one exists.
pub async fn get(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AdminProjectDetail>> {
    Ok(Json(state.service.admin_get(&id).await?))
}

/// PUT /api/v1/admin/projects/{id}/draft
///
/// Apply metadata edits to the draft. Nothing is persisted until save.
pub async fn update_draft(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<DraftPatch>,
) -> AppResult<Json<AdminProjectDetail>> {
    Ok(Json(state.service.update_draft(&id, &patch).await?))
}

/// DELETE /api/v1/admin/projects/{id}/draft
///
/// Throw the draft away. Idempotent.
pub async fn discard_draft(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let discarded = state.service.discard_draft(&id).await;
    Ok(Json(json!({ "discarded": discarded })))
}

/// POST /api/v1/admin/projects/{id}/save
///
/// Validate and persist the draft. On failure the draft stays in place.
pub async fn save(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    Ok(Json(state.service.save_project(&id).await?))
}

/// POST /api/v1/admin/projects/{id}/archive
pub async fn archive(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    Ok(Json(state.service.archive(&id).await?))
}

/// POST /api/v1/admin/projects/{id}/restore
pub async fn restore(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    Ok(Json(state.service.restore(&id).await?))
}

/// POST /api/v1/admin/projects/restore-all
///
/// Restore every archived project; failed ids are reported, not fatal.
pub async fn restore_all(
    _admin: AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<RestoreAllReport>> {
    Ok(Json(state.service.restore_all().await))
}

/// POST /api/v1/admin/projects/{id}/gallery/{gallery}
///
/// Append an image reference to the `finished` or `development` bucket.
pub async fn add_image(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path((id, gallery)): Path<(String, GalleryKey)>,
    Json(body): Json<ImageRef>,
) -> AppResult<Json<Value>> {
    let update = state.service.add_image(&id, gallery, &body.url).await?;
    Ok(Json(json!({
        "galleries": update.galleries,
        "coverImage": update.cover_image,
    })))
}

/// DELETE /api/v1/admin/projects/{id}/gallery
///
/// Remove an image reference from whichever bucket holds it. Removing an
/// absent reference reports `removed: false` instead of failing.
pub async fn remove_image(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ImageRef>,
) -> AppResult<Json<Value>> {
    match state.service.remove_image(&id, &body.url).await? {
        Some(update) => Ok(Json(json!({
            "removed": true,
            "galleries": update.galleries,
            "coverImage": update.cover_image,
        }))),
        None => Ok(Json(json!({ "removed": false }))),
    }
}

/// PUT /api/v1/admin/projects/{id}/cover
///
/// Set a manual cover override.
pub async fn set_cover(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ImageRef>,
) -> AppResult<Json<Value>> {
    let update = state.service.set_cover(&id, &body.url).await?;
    Ok(Json(json!({ "coverImage": update.cover_image })))
}

/// DELETE /api/v1/admin/projects/{id}/cover
///
/// Drop the manual override and re-derive the cover from the galleries.
pub async fn reset_cover(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let update = state.service.reset_cover(&id).await?;
    Ok(Json(json!({ "coverImage": update.cover_image })))
}

/// GET /api/v1/admin/projects/{id}/cover/suggestions
///
/// Three stable stock-cover suggestions for the project.
pub async fn suggest_covers(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<&'static str>>> {
    Ok(Json(state.service.suggest_covers(&id).await?))
}

/// GET /api/v1/admin/status
///
/// Backend mode, record counts, and the last synchronization outcome.
pub async fn status(
    _admin: AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ServiceStatus>> {
    Ok(Json(state.service.status().await))
}
