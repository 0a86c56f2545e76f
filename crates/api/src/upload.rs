//! Image upload storage.
//!
//! [`ImageStore`] is the seam between the upload handler and wherever the
//! bytes actually land. [`DiskImageStore`] writes them under the configured
//! upload directory, which the router also serves statically, so the
//! returned reference is immediately usable as a gallery entry.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Failures while storing an uploaded image.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload exceeds the {limit}-byte limit")]
    TooLarge { limit: usize },

    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extensions accepted as image uploads.
const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Destination for uploaded image bytes. Returns the public reference under
/// which the stored image is reachable.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, UploadError>;
}

/// Stores uploads on the local filesystem under a single directory.
pub struct DiskImageStore {
    root: PathBuf,
    max_bytes: usize,
}

impl DiskImageStore {
    pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, UploadError> {
        if bytes.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }
        let sanitized = sanitize_filename(filename);
        let extension = sanitized
            .rsplit('.')
            .next()
            .map(str::to_ascii_lowercase)
            .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| UploadError::UnsupportedType(filename.to_string()))?;

        // A random prefix keeps repeated uploads of the same file distinct.
        let stem = sanitized
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or("image");
        let stored_name = format!("{}-{stem}.{extension}", Uuid::new_v4());

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&stored_name), bytes).await?;

        Ok(format!("/uploads/{stored_name}"))
    }
}

/// Strip path separators and anything outside a conservative character set
/// so a crafted filename cannot escape the upload directory.
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "image".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_returns_public_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(dir.path(), 1024);

        let reference = store.store("site photo.JPG", b"fakebytes").await.unwrap();
        assert!(reference.starts_with("/uploads/"));
        assert!(reference.ends_with(".jpg"));

        let stored_name = reference.strip_prefix("/uploads/").unwrap();
        assert!(dir.path().join(stored_name).exists());
    }

    #[tokio::test]
    async fn rejects_oversized_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(dir.path(), 4);
        let err = store.store("a.png", b"12345").await.unwrap_err();
        assert!(matches!(err, UploadError::TooLarge { limit: 4 }));
    }

    #[tokio::test]
    async fn rejects_unknown_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskImageStore::new(dir.path(), 1024);
        let err = store.store("notes.txt", b"hello").await.unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType(_)));
    }

    #[test]
    fn sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename(""), "image");
    }
}
