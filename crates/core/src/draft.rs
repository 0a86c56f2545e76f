//! The draft overlay: per-project, uncommitted edit buffers.
//!
//! A draft is a full copy of the catalog record, created lazily on the
//! first edit and mutated in place afterwards. Drafts never write through
//! to the catalog; they are merged back atomically by a save, or thrown
//! away by a discard. Gallery contents ride along in the draft copy but are
//! excluded from the dirty check -- gallery mutations commit immediately
//! through the catalog, not through save/discard.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::error::CoreError;
use crate::project::{Project, ProjectKind, SubCategory, DEFAULT_CATEGORY};
use crate::types::{ProjectId, Timestamp};

/// A set of metadata edits applied to a draft. Absent fields leave the
/// draft untouched; `display_order` distinguishes "unchanged" (`None`) from
/// an explicit clear (`Some(None)`).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ProjectKind>,
    #[serde(default)]
    pub sub_category: Option<SubCategory>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub display_order: Option<Option<i64>>,
}

/// In-memory edit buffers keyed by project id.
#[derive(Debug, Default)]
pub struct DraftOverlay {
    drafts: HashMap<ProjectId, Project>,
}

impl DraftOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.drafts.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.drafts.contains_key(id)
    }

    /// Lazily create the draft copy for `id` from the current catalog
    /// record, then return it for mutation.
    pub fn begin_edit<'a>(
        &'a mut self,
        catalog: &Catalog,
        id: &str,
    ) -> Result<&'a mut Project, CoreError> {
        if !self.drafts.contains_key(id) {
            let source = catalog.get(id).ok_or_else(|| CoreError::NotFound {
                entity: "Project",
                id: id.to_string(),
            })?;
            self.drafts.insert(id.to_string(), source.clone());
        }
        Ok(self.drafts.get_mut(id).unwrap())
    }

    /// Apply a metadata patch to the draft for `id`, creating it if needed.
    pub fn apply(
        &mut self,
        catalog: &Catalog,
        id: &str,
        patch: &DraftPatch,
    ) -> Result<(), CoreError> {
        let draft = self.begin_edit(catalog, id)?;
        if let Some(title) = &patch.title {
            draft.title = title.clone();
        }
        if let Some(location) = &patch.location {
            draft.location = location.clone();
        }
        if let Some(category) = &patch.category {
            draft.category = category.clone();
        }
        if let Some(kind) = patch.kind {
            draft.kind = kind;
        }
        if let Some(sub) = patch.sub_category {
            draft.sub_category = sub;
        }
        if let Some(description) = &patch.description {
            draft.description = if description.is_empty() {
                None
            } else {
                Some(description.clone())
            };
        }
        if let Some(published) = patch.published {
            draft.published = published;
        }
        if let Some(order) = patch.display_order {
            draft.display_order = order;
        }
        Ok(())
    }

    /// Structural comparison of the draft against the catalog record over
    /// the metadata fields only. Gallery contents are intentionally ignored.
    pub fn has_changes(&self, catalog: &Catalog, id: &str) -> bool {
        let Some(draft) = self.drafts.get(id) else {
            return false;
        };
        let Some(base) = catalog.get(id) else {
            return true;
        };
        draft.title != base.title
            || draft.location != base.location
            || draft.category != base.category
            || draft.kind != base.kind
            || draft.sub_category != base.sub_category
            || draft.description.as_deref().unwrap_or("")
                != base.description.as_deref().unwrap_or("")
            || draft.display_order != base.display_order
            || draft.published != base.published
    }

    /// Validate the draft for `id` and return the record a save should
    /// persist. The draft itself is left in place; callers clear it only
    /// after persistence succeeds, so a failed save loses nothing.
    ///
    /// Validation: `title` and `location` must be non-empty after trimming.
    /// An empty category falls back to the default label, the description
    /// is trimmed, and the cover is re-derived when empty.
    pub fn prepare_commit(&self, id: &str, now: Timestamp) -> Result<Project, CoreError> {
        let draft = self.drafts.get(id).ok_or_else(|| CoreError::NotFound {
            entity: "Draft",
            id: id.to_string(),
        })?;

        let title = draft.title.trim();
        let location = draft.location.trim();
        if title.is_empty() || location.is_empty() {
            return Err(CoreError::Validation(
                "Title and location are required".into(),
            ));
        }

        let mut prepared = draft.clone();
        prepared.title = title.to_string();
        prepared.location = location.to_string();
        let category = draft.category.trim();
        prepared.category = if category.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category.to_string()
        };
        prepared.description = draft
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        if prepared.cover_image.is_empty() {
            prepared.cover_image = prepared.galleries.derived_cover().to_string();
        }
        prepared.archived = false;
        prepared.updated_at = Some(now);
        Ok(prepared)
    }

    /// Drop the draft for `id`, if any. Used both by discard and by the
    /// post-save cleanup.
    pub fn clear(&mut self, id: &str) -> bool {
        self.drafts.remove(id).is_some()
    }

    /// Drop every draft whose id is not in `live_ids`. Called after each
    /// snapshot merge so drafts for vanished records do not linger.
    pub fn retain_existing(&mut self, live_ids: &HashSet<String>) {
        self.drafts.retain(|id, _| live_ids.contains(id));
    }

    pub fn ids(&self) -> Vec<ProjectId> {
        self.drafts.keys().cloned().collect()
    }

    /// Image references held only by drafts; counted by the global
    /// uniqueness check so an unsaved draft cannot lose an image to another
    /// project.
    pub fn image_refs(&self) -> HashSet<&str> {
        let mut refs = HashSet::new();
        for draft in self.drafts.values() {
            if !draft.cover_image.is_empty() {
                refs.insert(draft.cover_image.as_str());
            }
            refs.extend(draft.galleries.iter());
        }
        refs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn draft_is_created_lazily_and_reused() {
        let catalog = Catalog::new();
        let mut overlay = DraftOverlay::new();
        assert!(!overlay.contains("1"));

        overlay
            .apply(
                &catalog,
                "1",
                &DraftPatch {
                    title: Some("EDITED".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        overlay
            .apply(
                &catalog,
                "1",
                &DraftPatch {
                    location: Some("Goa".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let draft = overlay.get("1").unwrap();
        assert_eq!(draft.title, "EDITED");
        assert_eq!(draft.location, "Goa");
    }

    #[test]
    fn has_changes_ignores_gallery_mutations() {
        let catalog = Catalog::new();
        let mut overlay = DraftOverlay::new();
        overlay.begin_edit(&catalog, "1").unwrap();
        assert!(!overlay.has_changes(&catalog, "1"));

        overlay
            .begin_edit(&catalog, "1")
            .unwrap()
            .galleries
            .development
            .push("/scratch/wip.jpg".into());
        assert!(
            !overlay.has_changes(&catalog, "1"),
            "gallery edits are not metadata changes"
        );

        overlay
            .apply(
                &catalog,
                "1",
                &DraftPatch {
                    published: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(overlay.has_changes(&catalog, "1"));
    }

    #[test]
    fn commit_with_empty_title_fails_and_leaves_catalog_unchanged() {
        let catalog = Catalog::new();
        let mut overlay = DraftOverlay::new();
        overlay
            .apply(
                &catalog,
                "1",
                &DraftPatch {
                    title: Some("   ".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let err = overlay.prepare_commit("1", Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        // Nothing was written through; the stored title is untouched and the
        // draft is still there for the operator to fix.
        assert_eq!(catalog.get("1").unwrap().title, "JUHU VILLA");
        assert!(overlay.contains("1"));
    }

    #[test]
    fn commit_trims_and_defaults_category() {
        let catalog = Catalog::new();
        let mut overlay = DraftOverlay::new();
        overlay
            .apply(
                &catalog,
                "1",
                &DraftPatch {
                    title: Some("  SEA FACE HOUSE  ".into()),
                    category: Some("  ".into()),
                    description: Some("  coastal retrofit  ".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        let prepared = overlay.prepare_commit("1", Utc::now()).unwrap();
        assert_eq!(prepared.title, "SEA FACE HOUSE");
        assert_eq!(prepared.category, DEFAULT_CATEGORY);
        assert_eq!(prepared.description.as_deref(), Some("coastal retrofit"));
        assert!(prepared.updated_at.is_some());
    }

    #[test]
    fn drafts_for_vanished_records_are_dropped() {
        let catalog = Catalog::new();
        let mut overlay = DraftOverlay::new();
        overlay.begin_edit(&catalog, "1").unwrap();
        overlay.begin_edit(&catalog, "2").unwrap();

        let live: HashSet<String> = ["1".to_string()].into_iter().collect();
        overlay.retain_existing(&live);
        assert!(overlay.contains("1"));
        assert!(!overlay.contains("2"));
    }

    #[test]
    fn discard_clears_without_touching_catalog() {
        let catalog = Catalog::new();
        let mut overlay = DraftOverlay::new();
        overlay
            .apply(
                &catalog,
                "4",
                &DraftPatch {
                    title: Some("SOMETHING ELSE".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(overlay.clear("4"));
        assert!(!overlay.clear("4"));
        assert_eq!(catalog.get("4").unwrap().title, "MATUNGA RESIDENCE");
    }
}
