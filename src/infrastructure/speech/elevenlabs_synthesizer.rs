use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::application::ports::{SpeechSynthesizer, SynthesizedAudio, VoiceError};

/// ElevenLabs text-to-speech: text + voice id + model id, MP3 out.
pub struct ElevenLabsSynthesizer {
    client: Client,
    api_key: String,
    base_url: String,
    voice_id: String,
    model_id: String,
}

impl ElevenLabsSynthesizer {
    pub fn new(api_key: &str, base_url: &str, voice_id: &str, model_id: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            voice_id: voice_id.to_string(),
            model_id: model_id.to_string(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, VoiceError> {
        let url = format!("{}/text-to-speech/{}", self.base_url, self.voice_id);

        let body = json!({
            "text": text,
            "model_id": self.model_id,
        });

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::SynthesisFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VoiceError::SynthesisFailed(format!(
                "ElevenLabs returned {}: {}",
                status, body
            )));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| VoiceError::SynthesisFailed(format!("read body: {}", e)))?;

        if data.is_empty() {
            return Err(VoiceError::SynthesisFailed(
                "ElevenLabs returned no audio".to_string(),
            ));
        }

        tracing::debug!(bytes = data.len(), voice = %self.voice_id, "ElevenLabs synthesis completed");
        Ok(SynthesizedAudio {
            data,
            extension: "mp3",
        })
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }
}
