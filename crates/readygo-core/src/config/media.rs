//! Evidence media configuration.

use serde::{Deserialize, Serialize};

/// Settings for the media host that stores pre-ride and damage videos.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Provider to use: `"local"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Root directory for the local provider.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Base URL prepended to object keys when building public URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Folder (key prefix) for booking videos.
    #[serde(default = "default_video_folder")]
    pub video_folder: String,
    /// Maximum accepted video size in bytes (default 100 MiB).
    #[serde(default = "default_max_video_bytes")]
    pub max_video_bytes: u64,
    /// Accepted video file extensions.
    #[serde(default = "default_video_formats")]
    pub allowed_video_formats: Vec<String>,
    /// Upper bound on a single upload, in seconds.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_seconds: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            root_path: default_root_path(),
            public_base_url: default_public_base_url(),
            video_folder: default_video_folder(),
            max_video_bytes: default_max_video_bytes(),
            allowed_video_formats: default_video_formats(),
            upload_timeout_seconds: default_upload_timeout(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_root_path() -> String {
    "./data/media".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/media".to_string()
}

fn default_video_folder() -> String {
    "readygo-videos".to_string()
}

fn default_max_video_bytes() -> u64 {
    104_857_600 // 100 MiB
}

fn default_video_formats() -> Vec<String> {
    ["mp4", "mov", "avi", "mkv"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_upload_timeout() -> u64 {
    60
}
