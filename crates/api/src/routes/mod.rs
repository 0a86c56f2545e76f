pub mod admin;
pub mod auth;
pub mod health;
pub mod public;
pub mod uploads;

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// The full application router without the outer middleware stack, shared
/// by the binary entrypoint and the integration tests.
pub fn app(state: AppState, upload_dir: &Path) -> Router {
    Router::new()
        // Health check at root level (not under /api/v1).
        .merge(health::router())
        // API v1 routes.
        .nest("/api/v1", api_routes())
        // Stored uploads, served under the same references the gallery
        // entries carry.
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .with_state(state)
}

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
///
/// /projects                                    published projects (GET)
/// /projects/{id}                               published project (GET)
///
/// /admin/projects                              list, create (admin only)
/// /admin/projects/restore-all                  restore all archived (POST)
/// /admin/projects/{id}                         record + draft detail (GET)
/// /admin/projects/{id}/draft                   edit draft (PUT), discard (DELETE)
/// /admin/projects/{id}/save                    commit draft (POST)
/// /admin/projects/{id}/archive                 archive (POST)
/// /admin/projects/{id}/restore                 restore (POST)
/// /admin/projects/{id}/gallery                 remove image (DELETE)
/// /admin/projects/{id}/gallery/{gallery}       add image (POST)
/// /admin/projects/{id}/cover                   set cover (PUT), reset (DELETE)
/// /admin/projects/{id}/cover/suggestions       stock suggestions (GET)
/// /admin/status                                sync diagnostics (GET)
/// /admin/uploads                               image upload (POST, multipart)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (login only; tokens are stateless).
        .nest("/auth", auth::router())
        // Public catalog surface.
        .merge(public::router())
        // Admin console: lifecycle, drafts, galleries, diagnostics.
        .nest("/admin", admin::router())
        // Image uploads.
        .nest("/admin/uploads", uploads::router())
}
