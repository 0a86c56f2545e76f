//! The project record, its wire representations, and the typed merge rules.
//!
//! Three shapes of a project exist:
//!
//! - [`Project`] -- the complete in-memory record held by the catalog.
//! - [`ProjectDoc`] -- a remote document of uncertain completeness. Every
//!   field is optional; absent fields fall back to the in-memory record,
//!   which itself falls back to the bundled default for the same id.
//! - [`ProjectPatch`] -- a partial-field merge write sent to a backend.
//!   `None` fields are left untouched by the write.

use serde::{Deserialize, Serialize};

use crate::types::{ProjectId, Timestamp};

/// Placeholder cover shown when a project has no explicit cover and both
/// galleries are empty.
pub const FALLBACK_IMAGE: &str =
    "https://images.unsplash.com/photo-1600585154340-be6161a56a0c?q=80&w=2000";

/// Title used when a remote document has no title and no default record.
pub const FALLBACK_TITLE: &str = "Untitled Project";
/// Location used when a remote document has no location and no default record.
pub const FALLBACK_LOCATION: &str = "Location coming soon";
/// Category label applied when none is provided.
pub const DEFAULT_CATEGORY: &str = "Projects";

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Top-level discipline of a project. Serialized with the public site's
/// display spellings (including the space in `INTERIOR DESIGN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectKind {
    #[serde(rename = "ARCHITECTURE")]
    Architecture,
    #[serde(rename = "INTERIOR DESIGN")]
    InteriorDesign,
    #[serde(rename = "LANDSCAPE")]
    Landscape,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 3] = [
        ProjectKind::Architecture,
        ProjectKind::InteriorDesign,
        ProjectKind::Landscape,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Architecture => "ARCHITECTURE",
            ProjectKind::InteriorDesign => "INTERIOR DESIGN",
            ProjectKind::Landscape => "LANDSCAPE",
        }
    }

    /// Parse the wire spelling. Returns `None` for unknown values so merge
    /// callers can fall back instead of failing the whole snapshot.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ARCHITECTURE" => Some(ProjectKind::Architecture),
            "INTERIOR DESIGN" => Some(ProjectKind::InteriorDesign),
            "LANDSCAPE" => Some(ProjectKind::Landscape),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Second-tier classification used by the public gallery filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubCategory {
    Residential,
    Commercial,
    Hospitality,
}

impl SubCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubCategory::Residential => "RESIDENTIAL",
            SubCategory::Commercial => "COMMERCIAL",
            SubCategory::Hospitality => "HOSPITALITY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "RESIDENTIAL" => Some(SubCategory::Residential),
            "COMMERCIAL" => Some(SubCategory::Commercial),
            "HOSPITALITY" => Some(SubCategory::Hospitality),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the two named image buckets per project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryKey {
    Finished,
    Development,
}

impl std::fmt::Display for GalleryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GalleryKey::Finished => f.write_str("finished"),
            GalleryKey::Development => f.write_str("development"),
        }
    }
}

// ---------------------------------------------------------------------------
// Galleries
// ---------------------------------------------------------------------------

/// The two ordered image buckets of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Galleries {
    #[serde(default)]
    pub finished: Vec<String>,
    #[serde(default)]
    pub development: Vec<String>,
}

impl Galleries {
    pub fn bucket(&self, key: GalleryKey) -> &[String] {
        match key {
            GalleryKey::Finished => &self.finished,
            GalleryKey::Development => &self.development,
        }
    }

    pub fn bucket_mut(&mut self, key: GalleryKey) -> &mut Vec<String> {
        match key {
            GalleryKey::Finished => &mut self.finished,
            GalleryKey::Development => &mut self.development,
        }
    }

    /// All image references across both buckets, finished first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.finished
            .iter()
            .chain(self.development.iter())
            .map(String::as_str)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.finished.iter().any(|u| u == url) || self.development.iter().any(|u| u == url)
    }

    /// Cover fallback order: first finished image, else first development
    /// image, else empty.
    pub fn derived_cover(&self) -> &str {
        self.finished
            .first()
            .or_else(|| self.development.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.finished.is_empty() && self.development.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A complete project record as held by the catalog store and serialized to
/// the local persisted blob / HTTP responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub location: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: ProjectKind,
    pub sub_category: SubCategory,
    /// Representative thumbnail. Empty string means "derive from galleries".
    pub cover_image: String,
    pub galleries: Galleries,
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub archived: bool,
}

impl Project {
    /// The cover to actually display: the explicit cover when set, else the
    /// gallery-derived fallback, else the hardcoded placeholder.
    pub fn display_cover(&self) -> &str {
        if !self.cover_image.trim().is_empty() {
            return &self.cover_image;
        }
        let derived = self.galleries.derived_cover();
        if derived.is_empty() {
            FALLBACK_IMAGE
        } else {
            derived
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectDoc -- remote document
// ---------------------------------------------------------------------------

/// A remote document as delivered by the synchronization channel. Fields
/// absent from the document are `None` and fall back during the merge.
///
/// The two gallery buckets are independently optional: a document may carry
/// an updated `finished` list while staying silent about `development`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDoc {
    pub id: ProjectId,
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
    pub cover_image: Option<String>,
    #[serde(default)]
    pub finished: Option<Vec<String>>,
    #[serde(default)]
    pub development: Option<Vec<String>>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: Option<i64>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    /// The soft-delete flag of the remote collection. A deleted document
    /// archives the corresponding record; it never removes it.
    #[serde(default)]
    pub is_deleted: bool,
}

impl ProjectDoc {
    /// A document carrying every field of `project`, used by the local
    /// backend where snapshots are always complete.
    pub fn from_project(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            title: Some(project.title.clone()),
            location: Some(project.location.clone()),
            category: Some(project.category.clone()),
            kind: Some(project.kind),
            sub_category: Some(project.sub_category),
            cover_image: Some(project.cover_image.clone()),
            finished: Some(project.galleries.finished.clone()),
            development: Some(project.galleries.development.clone()),
            published: Some(project.published),
            description: project.description.clone(),
            display_order: project.display_order,
            created_at: project.created_at,
            updated_at: project.updated_at,
            is_deleted: project.archived,
        }
    }

    /// Merge this document over an optional base record, field by field.
    ///
    /// A deleted document produces an archived record with `published`
    /// forced to `false` for display purposes.
    pub fn merge_over(&self, base: Option<&Project>) -> Project {
        let archived = self.is_deleted;

        let finished = self
            .finished
            .clone()
            .or_else(|| base.map(|b| b.galleries.finished.clone()))
            .unwrap_or_default();
        let development = self
            .development
            .clone()
            .or_else(|| base.map(|b| b.galleries.development.clone()))
            .unwrap_or_default();

        let cover_image = match &self.cover_image {
            Some(url) if !url.trim().is_empty() => url.clone(),
            _ => base
                .map(|b| b.cover_image.clone())
                .filter(|c| !c.trim().is_empty())
                .or_else(|| finished.first().cloned())
                .or_else(|| development.first().cloned())
                .unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
        };

        Project {
            id: self.id.clone(),
            title: self
                .title
                .clone()
                .or_else(|| base.map(|b| b.title.clone()))
                .unwrap_or_else(|| FALLBACK_TITLE.to_string()),
            location: self
                .location
                .clone()
                .or_else(|| base.map(|b| b.location.clone()))
                .unwrap_or_else(|| FALLBACK_LOCATION.to_string()),
            category: self
                .category
                .clone()
                .or_else(|| base.map(|b| b.category.clone()))
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            kind: self
                .kind
                .or(base.map(|b| b.kind))
                .unwrap_or(ProjectKind::Architecture),
            sub_category: self
                .sub_category
                .or(base.map(|b| b.sub_category))
                .unwrap_or(SubCategory::Residential),
            cover_image,
            galleries: Galleries {
                finished,
                development,
            },
            published: if archived {
                false
            } else {
                self.published
                    .or(base.map(|b| b.published))
                    .unwrap_or(false)
            },
            description: self
                .description
                .clone()
                .or_else(|| base.and_then(|b| b.description.clone())),
            display_order: self.display_order.or(base.and_then(|b| b.display_order)),
            created_at: self.created_at.or(base.and_then(|b| b.created_at)),
            updated_at: self.updated_at.or(base.and_then(|b| b.updated_at)),
            archived,
        }
    }
}

// ---------------------------------------------------------------------------
// ProjectPatch -- partial-field merge write
// ---------------------------------------------------------------------------

/// A partial-field write against a backend. `None` fields keep their stored
/// value. `display_order` uses a double option so a patch can distinguish
/// "leave unchanged" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
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
    pub cover_image: Option<String>,
    #[serde(default)]
    pub galleries: Option<Galleries>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: Option<Option<i64>>,
    #[serde(default)]
    pub is_deleted: Option<bool>,
    /// Set by project creation so backends record a creation time.
    #[serde(default)]
    pub mark_created: bool,
}

impl ProjectPatch {
    /// The full write emitted by a draft save or project creation.
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: Some(project.title.clone()),
            location: Some(project.location.clone()),
            category: Some(project.category.clone()),
            kind: Some(project.kind),
            sub_category: Some(project.sub_category),
            cover_image: Some(project.cover_image.clone()),
            galleries: Some(project.galleries.clone()),
            published: Some(project.published),
            description: Some(project.description.clone().unwrap_or_default()),
            display_order: Some(project.display_order),
            is_deleted: Some(false),
            mark_created: false,
        }
    }

    /// The immediate write emitted by gallery add/remove operations.
    pub fn galleries(galleries: Galleries, cover_image: String) -> Self {
        Self {
            galleries: Some(galleries),
            cover_image: Some(cover_image),
            is_deleted: Some(false),
            ..Self::default()
        }
    }

    /// The immediate write emitted by cover set/reset operations.
    pub fn cover(url: String) -> Self {
        Self {
            cover_image: Some(url),
            ..Self::default()
        }
    }

    /// Apply this patch to an in-memory record. Used by the local backend,
    /// which has no merge-capable storage engine underneath.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(location) = &self.location {
            project.location = location.clone();
        }
        if let Some(category) = &self.category {
            project.category = category.clone();
        }
        if let Some(kind) = self.kind {
            project.kind = kind;
        }
        if let Some(sub) = self.sub_category {
            project.sub_category = sub;
        }
        if let Some(cover) = &self.cover_image {
            project.cover_image = cover.clone();
        }
        if let Some(galleries) = &self.galleries {
            project.galleries = galleries.clone();
        }
        if let Some(published) = self.published {
            project.published = published;
        }
        if let Some(description) = &self.description {
            project.description = if description.is_empty() {
                None
            } else {
                Some(description.clone())
            };
        }
        if let Some(order) = self.display_order {
            project.display_order = order;
        }
        if let Some(deleted) = self.is_deleted {
            project.archived = deleted;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
