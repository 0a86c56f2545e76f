//! The catalog store: the authoritative, merged view of all project records.
//!
//! The store is seeded from the bundled defaults and reconciled against
//! remote snapshots. Defaults are never removed -- a remote soft-delete
//! archives the record, it does not drop it. All mutations funnel through
//! the methods here so the sort order and the global image-uniqueness
//! invariant hold at every observable point.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::defaults::default_projects;
use crate::error::CoreError;
use crate::project::{Galleries, GalleryKey, Project, ProjectDoc};
use crate::types::Timestamp;

/// Result of an immediate gallery/cover mutation: the state a backend write
/// must persist.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryUpdate {
    pub galleries: Galleries,
    pub cover_image: String,
}

/// Total order over project records: archived entries always sort after
/// active ones, then ascending `display_order` (missing sorts last), then
/// case-sensitive title comparison. Deterministic and idempotent.
pub fn compare_projects(a: &Project, b: &Project) -> Ordering {
    (a.archived)
        .cmp(&b.archived)
        .then_with(|| {
            a.display_order
                .unwrap_or(i64::MAX)
                .cmp(&b.display_order.unwrap_or(i64::MAX))
        })
        .then_with(|| a.title.cmp(&b.title))
}

/// In-memory mapping from project id to project record, kept in sort order.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<Project>,
}

impl Catalog {
    /// A catalog populated with the bundled default dataset.
    pub fn new() -> Self {
        let mut catalog = Self {
            records: default_projects(),
        };
        catalog.sort();
        catalog
    }

    fn sort(&mut self) {
        self.records.sort_by(compare_projects);
    }

    pub fn records(&self) -> &[Project] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.records.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Project> {
        self.records.iter_mut().find(|p| p.id == id)
    }

    fn require_mut(&mut self, id: &str) -> Result<&mut Project, CoreError> {
        // Borrow-checker friendly double lookup.
        if self.get(id).is_none() {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: id.to_string(),
            });
        }
        Ok(self.get_mut(id).unwrap())
    }

    /// Ids of every record currently held, in sort order.
    pub fn ids(&self) -> Vec<String> {
        self.records.iter().map(|p| p.id.clone()).collect()
    }

    /// Ids of archived records, in sort order.
    pub fn archived_ids(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|p| p.archived)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Records shown on the public site: published and not archived.
    pub fn list_published(&self) -> impl Iterator<Item = &Project> {
        self.records.iter().filter(|p| p.published && !p.archived)
    }

    /// Records shown in the admin console for the given view.
    pub fn list_admin(&self, show_archived: bool) -> impl Iterator<Item = &Project> {
        self.records
            .iter()
            .filter(move |p| p.archived == show_archived)
    }

    /// Highest `display_order` among active records; used to place new
    /// projects at the end of the list.
    pub fn next_display_order(&self) -> i64 {
        self.records
            .iter()
            .filter(|p| !p.archived)
            .filter_map(|p| p.display_order)
            .max()
            .unwrap_or(0)
            + 1
    }

    // -- Synchronization ---------------------------------------------------

    /// Reconcile a full remote snapshot into the store.
    ///
    /// Each document merges over the current in-memory record for its id
    /// when one exists, else over the bundled default, else stands alone
    /// with fallback fields. Documents flagged deleted become archived
    /// records. The result always contains every default id. An empty
    /// snapshot resets the store to the normalized defaults.
    pub fn apply_remote_snapshot(&mut self, docs: &[ProjectDoc]) {
        let mut merged: HashMap<String, Project> = default_projects()
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        for doc in docs {
            // Prefer the current in-memory record as the merge base; fall
            // back to the bundled default for ids we have never seen.
            let base = self
                .get(&doc.id)
                .cloned()
                .or_else(|| merged.get(&doc.id).cloned());
            merged.insert(doc.id.clone(), doc.merge_over(base.as_ref()));
        }

        self.records = merged.into_values().collect();
        self.sort();
    }

    /// Write a record directly, used by the local-fallback path. Replaces
    /// any record with the same id and re-sorts.
    pub fn upsert_local(&mut self, record: Project) {
        self.records.retain(|p| p.id != record.id);
        self.records.push(record);
        self.sort();
    }

    // -- Lifecycle ---------------------------------------------------------

    /// Active-* -> Archived. Forces `published = false`.
    pub fn archive(&mut self, id: &str, now: Timestamp) -> Result<Project, CoreError> {
        let record = self.require_mut(id)?;
        record.archived = true;
        record.published = false;
        record.updated_at = Some(now);
        let snapshot = record.clone();
        self.sort();
        Ok(snapshot)
    }

    /// Archived -> Active-Hidden. `published` stays false; republishing is
    /// an explicit separate act.
    pub fn restore(&mut self, id: &str, now: Timestamp) -> Result<Project, CoreError> {
        let record = self.require_mut(id)?;
        record.archived = false;
        record.updated_at = Some(now);
        let snapshot = record.clone();
        self.sort();
        Ok(snapshot)
    }

    // -- Gallery partition logic -------------------------------------------

    /// Every image reference currently in use: covers plus both buckets of
    /// every project.
    pub fn all_image_refs(&self) -> HashSet<&str> {
        let mut refs = HashSet::new();
        for project in &self.records {
            if !project.cover_image.is_empty() {
                refs.insert(project.cover_image.as_str());
            }
            refs.extend(project.galleries.iter());
        }
        refs
    }

    /// Append `url` to the given bucket. Rejects a reference already in the
    /// target bucket, and separately rejects a reference used anywhere else
    /// (any gallery or cover of any project). When the project has no cover
    /// yet, the new image becomes the cover.
    pub fn add_image(
        &mut self,
        id: &str,
        gallery: GalleryKey,
        url: &str,
        now: Timestamp,
    ) -> Result<GalleryUpdate, CoreError> {
        if url.trim().is_empty() {
            return Err(CoreError::Validation("Image reference is empty".into()));
        }
        {
            let record = self.get(id).ok_or_else(|| CoreError::NotFound {
                entity: "Project",
                id: id.to_string(),
            })?;
            if record.galleries.bucket(gallery).iter().any(|u| u == url) {
                return Err(CoreError::ImageAlreadyInGallery {
                    gallery,
                    url: url.to_string(),
                });
            }
        }
        if self.all_image_refs().contains(url) {
            return Err(CoreError::ImageInUse {
                url: url.to_string(),
            });
        }

        let record = self.get_mut(id).unwrap();
        record.galleries.bucket_mut(gallery).push(url.to_string());
        if record.cover_image.is_empty() {
            record.cover_image = record.galleries.derived_cover().to_string();
        }
        record.updated_at = Some(now);
        Ok(GalleryUpdate {
            galleries: record.galleries.clone(),
            cover_image: record.cover_image.clone(),
        })
    }

    /// Remove `url` from whichever bucket contains it. Returns `Ok(None)`
    /// when the reference is in neither bucket. If the removed reference was
    /// the cover, the cover is recomputed from the remaining images.
    pub fn remove_image(
        &mut self,
        id: &str,
        url: &str,
        now: Timestamp,
    ) -> Result<Option<GalleryUpdate>, CoreError> {
        let record = self.require_mut(id)?;
        if !record.galleries.contains(url) {
            return Ok(None);
        }
        record.galleries.finished.retain(|u| u != url);
        record.galleries.development.retain(|u| u != url);
        if record.cover_image == url {
            record.cover_image = record.galleries.derived_cover().to_string();
        }
        record.updated_at = Some(now);
        Ok(Some(GalleryUpdate {
            galleries: record.galleries.clone(),
            cover_image: record.cover_image.clone(),
        }))
    }

    /// Manual cover override, independent of bucket membership. Survives
    /// gallery edits until explicitly reset.
    pub fn set_cover(
        &mut self,
        id: &str,
        url: &str,
        now: Timestamp,
    ) -> Result<GalleryUpdate, CoreError> {
        let record = self.require_mut(id)?;
        record.cover_image = url.to_string();
        record.updated_at = Some(now);
        Ok(GalleryUpdate {
            galleries: record.galleries.clone(),
            cover_image: record.cover_image.clone(),
        })
    }

    /// Discard any manual override and recompute the cover from the
    /// galleries (first finished, else first development, else empty).
    pub fn reset_cover(&mut self, id: &str, now: Timestamp) -> Result<GalleryUpdate, CoreError> {
        let record = self.require_mut(id)?;
        record.cover_image = record.galleries.derived_cover().to_string();
        record.updated_at = Some(now);
        Ok(GalleryUpdate {
            galleries: record.galleries.clone(),
            cover_image: record.cover_image.clone(),
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectKind;
    use chrono::Utc;

    fn doc(id: &str) -> ProjectDoc {
        ProjectDoc {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn new_catalog_contains_all_defaults() {
        let catalog = Catalog::new();
        assert_eq!(catalog.len(), 9);
        assert!(catalog.get("1").is_some());
        assert!(catalog.records().iter().all(|p| !p.archived));
    }

    #[test]
    fn sort_is_deterministic_and_idempotent() {
        let mut catalog = Catalog::new();
        catalog.archive("2", Utc::now()).unwrap();
        let first: Vec<_> = catalog.ids();
        catalog.sort();
        catalog.sort();
        assert_eq!(catalog.ids(), first);
        // Archived records sort after every active record.
        assert_eq!(catalog.ids().last().map(String::as_str), Some("2"));
    }

    #[test]
    fn display_order_sorts_ascending_with_missing_last() {
        let mut catalog = Catalog::new();
        let mut a = catalog.get("1").unwrap().clone();
        a.display_order = Some(5);
        let mut b = catalog.get("2").unwrap().clone();
        b.display_order = Some(2);
        catalog.upsert_local(a);
        catalog.upsert_local(b);

        let ids = catalog.ids();
        let pos_b = ids.iter().position(|i| i == "2").unwrap();
        let pos_a = ids.iter().position(|i| i == "1").unwrap();
        let pos_unordered = ids.iter().position(|i| i == "3").unwrap();
        assert!(pos_b < pos_a, "lower order sorts first");
        assert!(pos_a < pos_unordered, "missing order sorts last");
    }

    #[test]
    fn empty_snapshot_resets_to_defaults() {
        let mut catalog = Catalog::new();
        catalog.archive("1", Utc::now()).unwrap();
        catalog.apply_remote_snapshot(&[]);
        assert_eq!(catalog.len(), 9);
        assert!(!catalog.get("1").unwrap().archived);
    }

    #[test]
    fn snapshot_merges_over_defaults_and_adds_new_ids() {
        let mut catalog = Catalog::new();
        let mut update = doc("1");
        update.title = Some("JUHU VILLA RENOVATION".into());
        let mut addition = doc("custom-1");
        addition.title = Some("NEW COMMISSION".into());
        addition.kind = Some(ProjectKind::Landscape);

        catalog.apply_remote_snapshot(&[update, addition]);

        assert_eq!(catalog.len(), 10);
        let merged = catalog.get("1").unwrap();
        assert_eq!(merged.title, "JUHU VILLA RENOVATION");
        // Fields absent from the document fall back to the default record.
        assert_eq!(merged.location, "Mumbai");
        assert_eq!(catalog.get("custom-1").unwrap().kind, ProjectKind::Landscape);
    }

    #[test]
    fn deleted_doc_archives_but_never_removes_a_default() {
        let mut catalog = Catalog::new();
        let mut deleted = doc("2");
        deleted.is_deleted = true;
        deleted.published = Some(true);

        catalog.apply_remote_snapshot(&[deleted]);

        let record = catalog.get("2").expect("default id 2 must survive");
        assert!(record.archived);
        assert!(
            !catalog.list_published().any(|p| p.id == "2"),
            "archived record must not be publicly listed regardless of published flag"
        );
        assert_eq!(catalog.len(), 9);
    }

    #[test]
    fn snapshot_falls_back_to_in_memory_value_before_default() {
        let mut catalog = Catalog::new();
        let mut rename = doc("1");
        rename.title = Some("RENAMED".into());
        catalog.apply_remote_snapshot(&[rename]);

        // Second snapshot says nothing about the title; the in-memory value
        // (not the bundled default) must win.
        let mut silent = doc("1");
        silent.published = Some(false);
        catalog.apply_remote_snapshot(&[silent]);

        assert_eq!(catalog.get("1").unwrap().title, "RENAMED");
        assert!(!catalog.get("1").unwrap().published);
    }

    #[test]
    fn archive_then_restore_preserves_display_order() {
        let mut catalog = Catalog::new();
        let mut record = catalog.get("3").unwrap().clone();
        record.display_order = Some(7);
        catalog.upsert_local(record);

        catalog.archive("3", Utc::now()).unwrap();
        assert!(catalog.get("3").unwrap().archived);
        assert!(!catalog.get("3").unwrap().published);

        catalog.restore("3", Utc::now()).unwrap();
        let restored = catalog.get("3").unwrap();
        assert!(!restored.archived);
        assert_eq!(restored.display_order, Some(7));
        assert!(!restored.published, "restore does not republish");
    }

    #[test]
    fn add_image_rejects_global_duplicates_without_mutation() {
        let mut catalog = Catalog::new();
        // "/juhu/IMG_6998.JPG" lives in project 1's finished gallery.
        let before = catalog.get("4").unwrap().galleries.clone();
        let err = catalog
            .add_image("4", GalleryKey::Development, "/juhu/IMG_6998.JPG", Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::ImageInUse { .. }));
        assert_eq!(catalog.get("4").unwrap().galleries, before);
    }

    #[test]
    fn add_image_distinguishes_same_gallery_duplicates() {
        let mut catalog = Catalog::new();
        let err = catalog
            .add_image("1", GalleryKey::Finished, "/juhu/IMG_6998.JPG", Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::ImageAlreadyInGallery { .. }));
    }

    #[test]
    fn first_image_becomes_cover_when_cover_is_empty() {
        let mut catalog = Catalog::new();
        let mut blank = catalog.get("1").unwrap().clone();
        blank.cover_image = String::new();
        blank.galleries = Galleries::default();
        catalog.upsert_local(blank);

        let update = catalog
            .add_image("1", GalleryKey::Development, "/new/shot.jpg", Utc::now())
            .unwrap();
        assert_eq!(update.cover_image, "/new/shot.jpg");
    }

    #[test]
    fn removing_the_cover_recomputes_from_finished_then_development() {
        let mut catalog = Catalog::new();
        let mut record = catalog.get("1").unwrap().clone();
        record.cover_image = "/juhu/IMG_6998.JPG".into();
        catalog.upsert_local(record);

        let update = catalog
            .remove_image("1", "/juhu/IMG_6998.JPG", Utc::now())
            .unwrap()
            .expect("image existed");
        assert_eq!(update.cover_image, "/juhu/IMG_6999.JPG");
        assert!(!update.galleries.contains("/juhu/IMG_6998.JPG"));
    }

    #[test]
    fn removing_an_unknown_image_is_a_noop() {
        let mut catalog = Catalog::new();
        let result = catalog
            .remove_image("1", "/nowhere/else.jpg", Utc::now())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn manual_cover_survives_gallery_edits_until_reset() {
        let mut catalog = Catalog::new();
        catalog
            .set_cover("1", "https://example.com/manual.jpg", Utc::now())
            .unwrap();
        catalog
            .add_image("1", GalleryKey::Development, "/new/a.jpg", Utc::now())
            .unwrap();
        assert_eq!(
            catalog.get("1").unwrap().cover_image,
            "https://example.com/manual.jpg"
        );

        let update = catalog.reset_cover("1", Utc::now()).unwrap();
        assert_eq!(update.cover_image, "/juhu/IMG_6998.JPG");
    }

    #[test]
    fn upsert_local_replaces_and_keeps_order() {
        let mut catalog = Catalog::new();
        let mut record = catalog.get("5").unwrap().clone();
        record.title = "BANDRA DUPLEX".into();
        catalog.upsert_local(record);
        assert_eq!(catalog.len(), 9);
        assert_eq!(catalog.get("5").unwrap().title, "BANDRA DUPLEX");
    }
}
