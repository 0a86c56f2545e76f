use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin console routes. Every handler requires a valid admin token via
/// the `AuthAdmin` extractor.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(admin::list).post(admin::create))
        .route("/projects/restore-all", post(admin::restore_all))
        .route("/projects/{id}", get(admin::get))
        .route(
            "/projects/{id}/draft",
            put(admin::update_draft).delete(admin::discard_draft),
        )
        .route("/projects/{id}/save", post(admin::save))
        .route("/projects/{id}/archive", post(admin::archive))
        .route("/projects/{id}/restore", post(admin::restore))
        .route("/projects/{id}/gallery", delete(admin::remove_image))
        .route("/projects/{id}/gallery/{gallery}", post(admin::add_image))
        .route(
            "/projects/{id}/cover",
            put(admin::set_cover).delete(admin::reset_cover),
        )
        .route(
            "/projects/{id}/cover/suggestions",
            get(admin::suggest_covers),
        )
        .route("/status", get(admin::status))
}
