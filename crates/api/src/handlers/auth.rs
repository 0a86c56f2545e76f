//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use atelier_core::error::CoreError;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /api/v1/auth/login
///
/// Exchange the admin credentials for a JWT access token. Both an unknown
/// email and a wrong password produce the same 401 so the response does
/// not leak which one was wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let email_matches = req
        .email
        .trim()
        .eq_ignore_ascii_case(state.config.admin_email.trim());
    let password_matches = verify_password(&req.password, &state.config.admin_password_hash);
    if !email_matches || !password_matches {
        return Err(CoreError::Unauthorized("Invalid credentials".into()).into());
    }

    let access_token = generate_access_token(&state.config.admin_email, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to issue token: {e}")))?;

    tracing::info!("admin logged in");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
    }))
}
