//! Media store trait for the external host that keeps evidence videos.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// A reference to an object accepted by a [`MediaStore`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredMedia {
    /// Stable identifier inside the store; used for deletion.
    pub key: String,
    /// Public URL under which the object can be fetched.
    pub url: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

/// Trait for the media host that evidence uploads go through.
///
/// The caller chooses the key before uploading so that a compensating
/// [`MediaStore::delete`] can always be issued, even when the upload
/// itself timed out with an unknown outcome. Implementations live in
/// `readygo-storage`.
#[async_trait]
pub trait MediaStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store `data` under `key` and return its reference.
    async fn upload(&self, key: &str, content_type: &str, data: Bytes) -> AppResult<StoredMedia>;

    /// Delete the object stored under `key`. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether an object exists under `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
