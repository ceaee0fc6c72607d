//! Local filesystem media store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use readygo_core::error::{AppError, ErrorKind};
use readygo_core::result::AppResult;
use readygo_core::traits::media::{MediaStore, StoredMedia};

use crate::public_url;

/// Media store writing objects below a root directory.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// Create the store, creating `root_path` if needed.
    pub async fn new(root_path: &str, base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create media root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            base_url: base_url.to_string(),
        })
    }

    /// Map a key to a path inside the root, refusing keys that escape it.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::validation(format!("Invalid media key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }

    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> AppResult<StoredMedia> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create media folder: {}", parent.display()),
                    e,
                )
            })?;
        }

        fs::write(&path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write media object: {key}"),
                e,
            )
        })?;

        debug!(key, content_type, bytes = data.len(), "Stored media object");
        Ok(StoredMedia {
            key: key.to_string(),
            url: public_url(&self.base_url, key),
            size_bytes: data.len() as u64,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Deleted media object");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete media object: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> (tempfile::TempDir, LocalMediaStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_str().unwrap(), "http://media.test")
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_upload_then_delete() {
        let (dir, store) = store().await;
        let key = "readygo-videos/pre.mp4";

        let stored = store
            .upload(key, "video/mp4", Bytes::from_static(b"frames"))
            .await
            .unwrap();
        assert_eq!(stored.url, "http://media.test/readygo-videos/pre.mp4");
        assert_eq!(stored.size_bytes, 6);
        assert!(dir.path().join(key).is_file());
        assert!(store.exists(key).await.unwrap());

        store.delete(key).await.unwrap();
        assert!(!store.exists(key).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let (_dir, store) = store().await;
        store.delete("readygo-videos/never.mp4").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_parent_traversal() {
        let (_dir, store) = store().await;
        let err = store
            .upload("../escape.mp4", "video/mp4", Bytes::new())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }
}
