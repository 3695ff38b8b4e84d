use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

pub const DEFAULT_TRANSCRIPTION_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3";

/// Any OpenAI-compatible `/audio/transcriptions` endpoint (Groq, OpenAI, LM Studio).
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_TRANSCRIPTION_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| DEFAULT_TRANSCRIPTION_MODEL.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        if self.api_key.is_empty() {
            return Err(TranscriptionError::Unauthorized(
                "no transcription API key configured".to_string(),
            ));
        }

        let url = format!("{}/audio/transcriptions", self.base_url);

        let file_part = multipart::Part::bytes(audio_data.to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", file_part);

        tracing::debug!(model = %self.model, bytes = audio_data.len(), "Sending audio to Whisper API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    TranscriptionError::Unauthorized(format!("status {}", status))
                }
                StatusCode::TOO_MANY_REQUESTS => TranscriptionError::RateLimited,
                _ => TranscriptionError::ApiRequestFailed(format!("status {}: {}", status, body)),
            });
        }

        let result: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::InvalidResponse(format!("parse response: {}", e)))?;

        tracing::info!(
            chars = result.text.len(),
            "Whisper transcription completed"
        );

        Ok(result.text.trim().to_string())
    }
}
