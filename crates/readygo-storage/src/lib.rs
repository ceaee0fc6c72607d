//! # readygo-storage
//!
//! [`MediaStore`](readygo_core::traits::media::MediaStore) providers for
//! evidence videos and the factory that picks one from configuration.

pub mod providers;

use std::sync::Arc;

use tracing::info;

use readygo_core::config::MediaConfig;
use readygo_core::error::AppError;
use readygo_core::result::AppResult;
use readygo_core::traits::media::MediaStore;

pub use providers::local::LocalMediaStore;
pub use providers::memory::MemoryMediaStore;

/// Build the media store named by `config.provider`.
pub async fn build_media_store(config: &MediaConfig) -> AppResult<Arc<dyn MediaStore>> {
    let store: Arc<dyn MediaStore> = match config.provider.as_str() {
        "local" => Arc::new(
            LocalMediaStore::new(&config.root_path, &config.public_base_url).await?,
        ),
        "memory" => Arc::new(MemoryMediaStore::new(&config.public_base_url)),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown media provider: {other}"
            )));
        }
    };
    info!(provider = store.provider_type(), "Media store initialized");
    Ok(store)
}

/// Join a base URL and an object key with exactly one slash.
pub(crate) fn public_url(base: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        key.trim_start_matches('/')
    )
}
