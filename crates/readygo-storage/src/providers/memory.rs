//! In-memory media store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use readygo_core::result::AppResult;
use readygo_core::traits::media::{MediaStore, StoredMedia};

use crate::public_url;

/// Media store keeping objects in a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryMediaStore {
    objects: DashMap<String, Bytes>,
    base_url: String,
}

impl MemoryMediaStore {
    /// Create an empty store serving URLs under `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            objects: DashMap::new(),
            base_url: base_url.to_string(),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Keys of all stored objects.
    pub fn keys(&self) -> Vec<String> {
        self.objects.iter().map(|e| e.key().clone()).collect()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn upload(&self, key: &str, _content_type: &str, data: Bytes) -> AppResult<StoredMedia> {
        let size_bytes = data.len() as u64;
        self.objects.insert(key.to_string(), data);
        Ok(StoredMedia {
            key: key.to_string(),
            url: public_url(&self.base_url, key),
            size_bytes,
        })
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.objects.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.objects.contains_key(key))
    }
}
