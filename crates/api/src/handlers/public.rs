//! Handlers for the public, unauthenticated catalog surface.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use atelier_core::project::{Project, ProjectKind, SubCategory};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the public project listing.
///
/// Both filters are optional; `ALL` (any case) is equivalent to absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub sub_category: Option<String>,
}

/// GET /api/v1/projects
///
/// Published, non-archived projects in display order, optionally filtered
/// by discipline and subcategory.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<PublicQuery>,
) -> AppResult<Json<Vec<Project>>> {
    let kind = parse_filter(params.kind.as_deref(), ProjectKind::parse, "type")?;
    let sub_category = parse_filter(
        params.sub_category.as_deref(),
        SubCategory::parse,
        "subCategory",
    )?;
    Ok(Json(state.service.list_public(kind, sub_category).await))
}

/// GET /api/v1/projects/{id}
///
/// A single published project. Hidden and archived projects answer 404, so
/// the public surface does not reveal their existence.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Project>> {
    Ok(Json(state.service.get_public(&id).await?))
}

fn parse_filter<T>(
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
    name: &str,
) -> Result<Option<T>, AppError> {
    match raw {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => parse(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown {name} filter: {value}"))),
    }
}
