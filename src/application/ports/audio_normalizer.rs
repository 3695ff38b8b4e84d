use std::path::Path;

use async_trait::async_trait;

use crate::domain::InputMedia;

/// Converts arbitrary audio containers into 16 kHz mono PCM WAV.
#[async_trait]
pub trait AudioNormalizer: Send + Sync {
    async fn normalize(
        &self,
        input: &InputMedia,
        destination: &Path,
    ) -> Result<(), AudioNormalizeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioNormalizeError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("audio decoding failed: {0}")]
    DecodeFailure(String),
    #[error("no audio supplied")]
    MissingInput,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
