//! Evidence video validation, bounded upload, and compensating delete.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

use readygo_core::config::MediaConfig;
use readygo_core::error::{AppError, ErrorKind};
use readygo_core::result::AppResult;
use readygo_core::traits::media::{MediaStore, StoredMedia};

/// A video payload received from a client.
#[derive(Debug, Clone)]
pub struct EvidenceUpload {
    /// Client-side file name; only its extension is used.
    pub file_name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Raw bytes.
    pub data: Bytes,
}

impl EvidenceUpload {
    /// Lower-cased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Uploads evidence videos to the media store.
///
/// Every payload is checked before any bytes leave the process. Uploads are
/// stored under a key chosen here, so the key is known even when the store
/// times out and a compensating delete can always be attempted.
#[derive(Debug, Clone)]
pub struct EvidenceUploader {
    store: Arc<dyn MediaStore>,
    config: MediaConfig,
}

impl EvidenceUploader {
    /// Creates an uploader over `store`.
    pub fn new(store: Arc<dyn MediaStore>, config: MediaConfig) -> Self {
        Self { store, config }
    }

    /// Checks presence, type, extension and size of a video payload.
    pub fn validate(&self, upload: Option<EvidenceUpload>, label: &str) -> AppResult<EvidenceUpload> {
        let upload = upload.ok_or_else(|| AppError::validation(format!("{label} is required")))?;

        if upload.data.is_empty() {
            return Err(AppError::validation(format!("{label} is empty")));
        }
        if !upload.content_type.to_ascii_lowercase().starts_with("video/") {
            return Err(AppError::validation(format!(
                "{label} must be a video, got {}",
                upload.content_type
            )));
        }
        let allowed = upload.extension().is_some_and(|ext| {
            self.config
                .allowed_video_formats
                .iter()
                .any(|f| f.eq_ignore_ascii_case(&ext))
        });
        if !allowed {
            return Err(AppError::validation(format!(
                "{label} must be one of: {}",
                self.config.allowed_video_formats.join(", ")
            )));
        }
        if upload.data.len() as u64 > self.config.max_video_bytes {
            return Err(AppError::validation(format!(
                "{label} exceeds the maximum size of {} bytes",
                self.config.max_video_bytes
            )));
        }
        Ok(upload)
    }

    /// Uploads a validated payload within the configured timeout.
    ///
    /// On failure or timeout the chosen key is deleted before the error is
    /// returned.
    pub async fn upload(&self, upload: EvidenceUpload) -> AppResult<StoredMedia> {
        let ext = upload.extension().unwrap_or_else(|| "mp4".to_string());
        let key = format!("{}/{}.{}", self.config.video_folder, Uuid::new_v4(), ext);
        let limit = Duration::from_secs(self.config.upload_timeout_seconds);

        let attempt = tokio::time::timeout(
            limit,
            self.store.upload(&key, &upload.content_type, upload.data),
        )
        .await;

        match attempt {
            Ok(Ok(stored)) => {
                debug!(key = %stored.key, bytes = stored.size_bytes, "Evidence uploaded");
                Ok(stored)
            }
            Ok(Err(e)) => {
                self.discard(&key).await;
                Err(AppError::with_source(
                    ErrorKind::ExternalService,
                    "Video upload failed",
                    e,
                ))
            }
            Err(_) => {
                self.discard(&key).await;
                Err(AppError::external_service(format!(
                    "Video upload timed out after {}s",
                    limit.as_secs()
                )))
            }
        }
    }

    /// Best-effort delete of an uploaded object.
    pub async fn discard(&self, key: &str) {
        match self.store.delete(key).await {
            Ok(()) => debug!(key, "Compensating delete issued"),
            Err(e) => warn!(key, error = %e, "Compensating delete failed; object orphaned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use readygo_storage::MemoryMediaStore;

    fn uploader() -> (Arc<MemoryMediaStore>, EvidenceUploader) {
        let store = Arc::new(MemoryMediaStore::new("http://media.test"));
        let uploader = EvidenceUploader::new(store.clone(), MediaConfig::default());
        (store, uploader)
    }

    fn video(name: &str, content_type: &str, len: usize) -> EvidenceUpload {
        EvidenceUpload {
            file_name: name.into(),
            content_type: content_type.into(),
            data: Bytes::from(vec![7u8; len]),
        }
    }

    #[test]
    fn test_validate_rejects_bad_payloads() {
        let (_, uploader) = uploader();
        let cases = [
            None,
            Some(video("pre.mp4", "video/mp4", 0)),
            Some(video("pre.mp4", "image/png", 4)),
            Some(video("pre.webm", "video/webm", 4)),
            Some(video("pre", "video/mp4", 4)),
        ];
        for case in cases {
            let err = uploader.validate(case, "Pre-ride video").unwrap_err();
            assert!(err.is(ErrorKind::Validation), "{err}");
        }
    }

    #[test]
    fn test_validate_enforces_size_limit() {
        let store = Arc::new(MemoryMediaStore::new("http://media.test"));
        let config = MediaConfig {
            max_video_bytes: 8,
            ..MediaConfig::default()
        };
        let uploader = EvidenceUploader::new(store, config);
        assert!(uploader.validate(Some(video("a.MOV", "video/quicktime", 8)), "Video").is_ok());
        assert!(uploader.validate(Some(video("a.mov", "video/quicktime", 9)), "Video").is_err());
    }

    #[tokio::test]
    async fn test_upload_uses_configured_folder() {
        let (store, uploader) = uploader();
        let stored = uploader
            .upload(video("Damage.MKV", "video/x-matroska", 16))
            .await
            .unwrap();
        assert!(stored.key.starts_with("readygo-videos/"));
        assert!(stored.key.ends_with(".mkv"));
        assert_eq!(stored.url, format!("http://media.test/{}", stored.key));
        assert!(store.exists(&stored.key).await.unwrap());
    }
}
