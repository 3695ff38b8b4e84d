use std::path::Path;

use async_trait::async_trait;

use crate::application::ports::{AudioNormalizeError, AudioNormalizer};
use crate::domain::InputMedia;

use super::audio_decoder::{TARGET_SAMPLE_RATE, decode_audio_to_pcm, encode_wav};

pub struct SymphoniaAudioNormalizer;

#[async_trait]
impl AudioNormalizer for SymphoniaAudioNormalizer {
    #[tracing::instrument(skip(self, input), fields(destination = %destination.display()))]
    async fn normalize(
        &self,
        input: &InputMedia,
        destination: &Path,
    ) -> Result<(), AudioNormalizeError> {
        if !input.is_present() {
            return Err(AudioNormalizeError::MissingInput);
        }

        let data = input.read().await?;
        let extension = input.extension();

        let wav = tokio::task::spawn_blocking(move || {
            let samples = decode_audio_to_pcm(&data, extension.as_deref())?;
            encode_wav(&samples, TARGET_SAMPLE_RATE)
        })
        .await
        .map_err(|e| AudioNormalizeError::DecodeFailure(format!("task join error: {e}")))??;

        tokio::fs::write(destination, &wav).await?;

        tracing::debug!(bytes = wav.len(), "Normalized audio written");
        Ok(())
    }
}
