use async_trait::async_trait;
use bytes::Bytes;

use super::voice_error::VoiceError;

#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    pub data: Bytes,
    /// File extension matching the encoded format, e.g. `mp3`.
    pub extension: &'static str,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, VoiceError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
