//! Repository for the `projects` collection table.

use atelier_core::project::ProjectPatch;
use sqlx::PgPool;

use crate::models::ProjectRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, location, category, kind, sub_category, cover_image, \
     finished_gallery, development_gallery, published, description, display_order, \
     is_deleted, created_at, updated_at";

/// Provides snapshot reads and merge writes for project documents.
pub struct CatalogRepo;

impl CatalogRepo {
    /// Load the full document set, ordered by `display_order` (missing
    /// last), title as tie-breaker. Soft-deleted rows are included: they
    /// surface as archived records.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             ORDER BY display_order ASC NULLS LAST, title ASC"
        );
        sqlx::query_as::<_, ProjectRow>(&query).fetch_all(pool).await
    }

    /// Partial-field merge write: upsert the row, keeping the stored value
    /// for every field the patch leaves as `None`.
    ///
    /// `display_order` and `description` carry explicit set flags because
    /// a patch may clear them, which `COALESCE` cannot express.
    pub async fn merge_write(
        pool: &PgPool,
        id: &str,
        patch: &ProjectPatch,
    ) -> Result<(), sqlx::Error> {
        let (finished, development) = match &patch.galleries {
            Some(galleries) => (
                Some(galleries.finished.clone()),
                Some(galleries.development.clone()),
            ),
            None => (None, None),
        };
        let kind = patch.kind.map(|k| k.as_str());
        let sub_category = patch.sub_category.map(|s| s.as_str());
        let order_set = patch.display_order.is_some();
        let order_value = patch.display_order.flatten();
        // An empty description clears the column.
        let description_set = patch.description.is_some();
        let description = patch.description.as_deref().filter(|d| !d.is_empty());

        sqlx::query(
            "INSERT INTO projects (
                 id, title, location, category, kind, sub_category, cover_image,
                 finished_gallery, development_gallery, published, description,
                 display_order, is_deleted
             )
             VALUES (
                 $1,
                 COALESCE($2, 'Untitled Project'),
                 COALESCE($3, 'Location coming soon'),
                 COALESCE($4, 'Projects'),
                 COALESCE($5, 'ARCHITECTURE'),
                 COALESCE($6, 'RESIDENTIAL'),
                 COALESCE($7, ''),
                 COALESCE($8, '{}'::TEXT[]),
                 COALESCE($9, '{}'::TEXT[]),
                 COALESCE($10, FALSE),
                 $11,
                 $13,
                 COALESCE($14, FALSE)
             )
             ON CONFLICT (id) DO UPDATE SET
                 title = COALESCE($2, projects.title),
                 location = COALESCE($3, projects.location),
                 category = COALESCE($4, projects.category),
                 kind = COALESCE($5, projects.kind),
                 sub_category = COALESCE($6, projects.sub_category),
                 cover_image = COALESCE($7, projects.cover_image),
                 finished_gallery = COALESCE($8, projects.finished_gallery),
                 development_gallery = COALESCE($9, projects.development_gallery),
                 published = COALESCE($10, projects.published),
                 description = CASE WHEN $12 THEN $11 ELSE projects.description END,
                 display_order = CASE WHEN $15 THEN $13 ELSE projects.display_order END,
                 is_deleted = COALESCE($14, projects.is_deleted),
                 updated_at = NOW()",
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.location)
        .bind(&patch.category)
        .bind(kind)
        .bind(sub_category)
        .bind(&patch.cover_image)
        .bind(finished)
        .bind(development)
        .bind(patch.published)
        .bind(description)
        .bind(description_set)
        .bind(order_value)
        .bind(patch.is_deleted)
        .bind(order_set)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Soft-delete: mark the document deleted and unpublished. Returns
    /// `true` if a row was updated.
    pub async fn soft_delete(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects
             SET is_deleted = TRUE, published = FALSE, updated_at = NOW()
             WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted document. Returns `true` if a row was
    /// restored. `published` is left false; republishing is explicit.
    pub async fn restore(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects
             SET is_deleted = FALSE, updated_at = NOW()
             WHERE id = $1 AND is_deleted = TRUE",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
