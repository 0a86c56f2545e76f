//! Handlers for image uploads.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthAdmin;
use crate::state::AppState;
use crate::upload::UploadError;

/// Per-file outcome of a batch upload.
#[derive(Debug, Serialize)]
pub struct UploadOutcome {
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub files: Vec<UploadOutcome>,
}

/// POST /api/v1/admin/uploads
///
/// Accept one or more multipart `file` fields and store each in the image
/// store. Outcomes are reported per file: a rejected file (too large,
/// unsupported type) never aborts the rest of the batch. Only an I/O
/// failure of the store itself fails the request.
pub async fn upload(
    _admin: AuthAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Missing filename".into()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;

        match state.images.store(&filename, &bytes).await {
            Ok(url) => {
                tracing::info!(filename = %filename, url = %url, size = bytes.len(), "image uploaded");
                files.push(UploadOutcome {
                    filename,
                    url: Some(url),
                    error: None,
                });
            }
            // The store itself is broken; no point continuing the batch.
            Err(UploadError::Io(err)) => return Err(UploadError::Io(err).into()),
            Err(err) => {
                tracing::warn!(filename = %filename, error = %err, "upload rejected");
                files.push(UploadOutcome {
                    filename,
                    url: None,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("Missing `file` field".into()));
    }
    Ok(Json(UploadResponse { files }))
}
