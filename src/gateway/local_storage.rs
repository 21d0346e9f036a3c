//! Filesystem-backed object storage.
//!
//! Objects are written under a root directory and served back by the
//! HTTP layer at the public base URL.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::{ObjectStorage, join_url};
use crate::error::ManagerError;

/// Stores uploaded objects as plain files.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStorage {
    /// Creates the storage, making sure the root directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::StorageError`] if the directory cannot be
    /// created.
    pub async fn new(root: PathBuf, base_url: impl Into<String>) -> Result<Self, ManagerError> {
        fs::create_dir_all(&root)
            .await
            .map_err(|e| ManagerError::StorageError(e.to_string()))?;
        tracing::info!(root = %root.display(), "object storage directory");
        Ok(Self {
            root,
            base_url: base_url.into(),
        })
    }

    /// Root directory on disk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, ManagerError> {
        let relative = Path::new(path);
        let clean = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !clean || path.is_empty() {
            return Err(ManagerError::StorageError(format!(
                "invalid object path `{path}`"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<String, ManagerError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ManagerError::StorageError(e.to_string()))?;
        }
        let size = bytes.len();
        fs::write(&target, bytes)
            .await
            .map_err(|e| ManagerError::StorageError(e.to_string()))?;
        tracing::debug!(path, size, "object stored");
        Ok(join_url(&self.base_url, path))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("site-manager-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn upload_writes_file_and_returns_url() {
        let root = scratch_dir();
        let Ok(storage) = LocalObjectStorage::new(root.clone(), "http://localhost:3000/files").await
        else {
            panic!("storage init failed");
        };

        let Ok(url) = storage.upload("book_images/cover.jpg", b"jpeg".to_vec()).await else {
            panic!("upload failed");
        };
        assert_eq!(url, "http://localhost:3000/files/book_images/cover.jpg");

        let written = fs::read(root.join("book_images/cover.jpg")).await.ok();
        assert_eq!(written.as_deref(), Some(b"jpeg".as_slice()));

        let _ = fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn rejects_escaping_paths() {
        let root = scratch_dir();
        let Ok(storage) = LocalObjectStorage::new(root.clone(), "http://h").await else {
            panic!("storage init failed");
        };
        assert!(storage.upload("../etc/passwd", vec![]).await.is_err());
        assert!(storage.upload("/abs.jpg", vec![]).await.is_err());
        assert!(storage.upload("", vec![]).await.is_err());

        let _ = fs::remove_dir_all(&root).await;
    }
}
