//! Visibility & lifecycle policy.
//!
//! Each project is in exactly one of three states. Archived wins over
//! `published` for display purposes: an archived record is never publicly
//! visible regardless of its stored flag.

use serde::Serialize;

use crate::project::{Project, ProjectKind, SubCategory};

/// Lifecycle state of a project record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Not archived, not published: editable, hidden from the public site.
    ActiveHidden,
    /// Not archived and published: shown on the public site.
    ActivePublished,
    /// Soft-deleted: hidden from the public site, restorable.
    Archived,
}

impl ProjectStatus {
    pub fn of(project: &Project) -> Self {
        if project.archived {
            ProjectStatus::Archived
        } else if project.published {
            ProjectStatus::ActivePublished
        } else {
            ProjectStatus::ActiveHidden
        }
    }

    /// Label shown in the admin list.
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::ActiveHidden => "Hidden",
            ProjectStatus::ActivePublished => "Published",
            ProjectStatus::Archived => "Archived",
        }
    }
}

/// True when the record is shown on the public site.
pub fn is_public(project: &Project) -> bool {
    ProjectStatus::of(project) == ProjectStatus::ActivePublished
}

/// The public gallery's two-tier filter: by discipline, then optionally by
/// subcategory. `None` means "ALL" at that tier.
pub fn matches_filter(
    project: &Project,
    kind: Option<ProjectKind>,
    sub_category: Option<SubCategory>,
) -> bool {
    kind.map(|k| project.kind == k).unwrap_or(true)
        && sub_category
            .map(|s| project.sub_category == s)
            .unwrap_or(true)
}
