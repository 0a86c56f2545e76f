use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use atelier_core::error::CoreError;
use atelier_db::backend::BackendError;

use crate::upload::UploadError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `atelier_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from the catalog backend.
    #[error("Persistence error: {0}")]
    Backend(#[from] BackendError),

    /// An image upload failure.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::ImageInUse { url } => (
                    StatusCode::CONFLICT,
                    "IMAGE_IN_USE",
                    format!("Image is already used elsewhere: {url}"),
                ),
                CoreError::ImageAlreadyInGallery { gallery, url } => (
                    StatusCode::CONFLICT,
                    "IMAGE_IN_GALLERY",
                    format!("Image is already in the {gallery} gallery: {url}"),
                ),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Backend errors ---
            AppError::Backend(err) => classify_backend_error(err),

            // --- Upload errors ---
            AppError::Upload(err) => match err {
                UploadError::TooLarge { limit } => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "UPLOAD_TOO_LARGE",
                    format!("Upload exceeds the {limit}-byte limit"),
                ),
                UploadError::UnsupportedType(name) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UPLOAD_UNSUPPORTED_TYPE",
                    format!("Unsupported image type: {name}"),
                ),
                UploadError::Io(io) => {
                    tracing::error!(error = %io, "Upload IO error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "UPLOAD_FAILED",
                        "Failed to store the uploaded image".to_string(),
                    )
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a backend error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_backend_error(err: &BackendError) -> (StatusCode, &'static str, String) {
    match err {
        BackendError::Database(sqlx::Error::RowNotFound) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        BackendError::Database(sqlx::Error::Database(db_err)) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Failed to persist the change".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Backend error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PERSISTENCE_ERROR",
                "Failed to persist the change".to_string(),
            )
        }
    }
}
