//! Project row model and its conversion into a remote document.

use atelier_core::project::{ProjectDoc, ProjectKind, SubCategory};
use atelier_core::types::Timestamp;
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// `kind` and `sub_category` are stored as their wire spellings; unknown
/// values decode to `None` in the document so the merge falls back instead
/// of rejecting the whole snapshot.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub title: String,
    pub location: String,
    pub category: String,
    pub kind: String,
    pub sub_category: String,
    pub cover_image: String,
    pub finished_gallery: Vec<String>,
    pub development_gallery: Vec<String>,
    pub published: bool,
    pub description: Option<String>,
    pub display_order: Option<i64>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ProjectRow> for ProjectDoc {
    fn from(row: ProjectRow) -> Self {
        ProjectDoc {
            kind: ProjectKind::parse(&row.kind),
            sub_category: SubCategory::parse(&row.sub_category),
            title: Some(row.title),
            location: Some(row.location),
            category: Some(row.category),
            cover_image: Some(row.cover_image),
            finished: Some(row.finished_gallery),
            development: Some(row.development_gallery),
            published: Some(row.published),
            description: row.description,
            display_order: row.display_order,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
            is_deleted: row.is_deleted,
            id: row.id,
        }
    }
}
