use axum::routing::post;
use axum::Router;

use crate::handlers::uploads;
use crate::state::AppState;

/// Image upload routes (admin only).
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(uploads::upload))
}
