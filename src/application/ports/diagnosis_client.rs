use std::path::Path;

use async_trait::async_trait;

use crate::domain::{DiagnosisResult, QueryText};

/// Multimodal reasoning collaborator.
#[async_trait]
pub trait DiagnosisClient: Send + Sync {
    async fn diagnose(
        &self,
        query: &QueryText,
        image: Option<&Path>,
    ) -> Result<DiagnosisResult, DiagnosisError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    #[error("reasoning service rejected credentials: {0}")]
    Unauthorized(String),
    #[error("rate limited")]
    RateLimited,
    #[error("content blocked: {0}")]
    ContentBlocked(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("image unreadable: {0}")]
    ImageUnreadable(String),
}
