use async_trait::async_trait;

/// Speech-to-text collaborator. Implementations return the trimmed transcript,
/// which may be empty when no speech was recognised.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription service rejected credentials: {0}")]
    Unauthorized(String),
    #[error("transcription service rate limited")]
    RateLimited,
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
