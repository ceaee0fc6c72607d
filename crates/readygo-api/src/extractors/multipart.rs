//! Multipart evidence forms.

use axum::extract::Multipart;

use readygo_core::error::AppError;
use readygo_core::result::AppResult;
use readygo_service::EvidenceUpload;

/// Fields of an evidence upload form.
#[derive(Debug, Default)]
pub struct EvidenceForm {
    /// The video file, if one was attached.
    pub video: Option<EvidenceUpload>,
    /// The `description` text field.
    pub description: Option<String>,
}

impl EvidenceForm {
    /// Reads the form, taking the file from the field named `video_field`.
    ///
    /// A file field with no name and no bytes counts as absent. Unknown
    /// fields are skipped.
    pub async fn read(mut multipart: Multipart, video_field: &str) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
        {
            let name = field.name().unwrap_or("").to_string();
            if name == video_field {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                if !(file_name.is_empty() && data.is_empty()) {
                    form.video = Some(EvidenceUpload {
                        file_name,
                        content_type,
                        data,
                    });
                }
            } else if name == "description" {
                form.description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
        }

        Ok(form)
    }
}
