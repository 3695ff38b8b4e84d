use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::InputMedia;

#[async_trait]
pub trait ImageStager: Send + Sync {
    /// Writes `input` to `destination` in the canonical format.
    /// Returns `Ok(None)` without touching the filesystem when no image was supplied.
    async fn stage(
        &self,
        input: &InputMedia,
        destination: &Path,
    ) -> Result<Option<PathBuf>, ImageStagingError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageStagingError {
    #[error("image decoding failed: {0}")]
    ImageDecodeFailure(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
