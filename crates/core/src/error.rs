use crate::project::GalleryKey;
use crate::types::ProjectId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound {
        entity: &'static str,
        id: ProjectId,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// The image reference is already used by some gallery or cover,
    /// possibly on a different project. Distinct from
    /// [`CoreError::ImageAlreadyInGallery`] so callers can tell the two
    /// rejection reasons apart.
    #[error("Image already in use elsewhere: {url}")]
    ImageInUse { url: String },

    /// The image reference is already present in the target bucket of the
    /// target project.
    #[error("Image already in the {gallery} gallery: {url}")]
    ImageAlreadyInGallery { gallery: GalleryKey, url: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
