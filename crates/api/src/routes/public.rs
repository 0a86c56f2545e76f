use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Public catalog routes (no authentication).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(public::list_projects))
        .route("/projects/{id}", get(public::get_project))
}
