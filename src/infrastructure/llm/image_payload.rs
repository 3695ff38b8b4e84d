use std::path::Path;

use base64::{Engine as _, engine::general_purpose};
use reqwest::StatusCode;

use crate::application::ports::DiagnosisError;
use crate::infrastructure::image::mime_for;
use crate::infrastructure::observability::sanitize_prompt;

pub(super) struct ImagePayload {
    pub mime_type: &'static str,
    pub base64: String,
}

impl ImagePayload {
    pub async fn load(path: &Path) -> Result<Self, DiagnosisError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DiagnosisError::ImageUnreadable(format!("{}: {}", path.display(), e)))?;
        Ok(Self {
            mime_type: mime_for(&bytes),
            base64: general_purpose::STANDARD.encode(&bytes),
        })
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Maps a non-success HTTP status onto the diagnosis error taxonomy.
pub(super) fn classify_status(status: StatusCode, body: String) -> DiagnosisError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            DiagnosisError::Unauthorized(format!("status {}", status))
        }
        StatusCode::TOO_MANY_REQUESTS => DiagnosisError::RateLimited,
        _ => {
            tracing::warn!(
                %status,
                body = %sanitize_prompt(&body),
                "Diagnosis provider returned an error"
            );
            DiagnosisError::ApiRequestFailed(format!("status {}", status))
        }
    }
}
