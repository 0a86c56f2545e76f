//! Liveness probe.

use axum::Json;
use serde_json::{json, Value};

/// GET /healthz
///
/// Always returns 200 while the process is serving requests. Backend
/// reachability is reported separately by the admin status endpoint.
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
