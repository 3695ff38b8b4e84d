use std::path::Path;

use async_trait::async_trait;

use super::voice_error::VoiceError;

/// Local playback sink.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, path: &Path) -> Result<(), VoiceError>;
}
