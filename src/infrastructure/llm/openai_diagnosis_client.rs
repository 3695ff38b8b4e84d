use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::application::ports::{DiagnosisClient, DiagnosisError};
use crate::domain::{DiagnosisPrompt, DiagnosisResult, QueryText};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::config::DiagnosisSettings;

use super::image_payload::{ImagePayload, classify_status};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// OpenAI-compatible chat completions (Groq, OpenAI, LM Studio).
pub struct OpenAiDiagnosisClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

impl OpenAiDiagnosisClient {
    pub fn new(api_key: &str, settings: &DiagnosisSettings) -> Self {
        Self {
            client: Client::new(),
            base_url: settings
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key: api_key.to_string(),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_output_tokens,
        }
    }

    fn user_content(prompt: &DiagnosisPrompt, image: Option<&ImagePayload>) -> Value {
        match image {
            Some(image) => json!([
                { "type": "text", "text": prompt.as_str() },
                { "type": "image_url", "image_url": { "url": image.data_uri() } }
            ]),
            None => Value::String(prompt.as_str().to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl DiagnosisClient for OpenAiDiagnosisClient {
    #[tracing::instrument(skip(self, query), fields(model = %self.model, with_image = image.is_some()))]
    async fn diagnose(
        &self,
        query: &QueryText,
        image: Option<&Path>,
    ) -> Result<DiagnosisResult, DiagnosisError> {
        let payload = match image {
            Some(path) => Some(ImagePayload::load(path).await?),
            None => None,
        };
        let prompt = DiagnosisPrompt::new(query, payload.is_some());

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": Self::user_content(&prompt, payload.as_ref())
                }
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "top_p": self.top_p,
            "stream": false
        });

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DiagnosisError::ApiRequestFailed(format!("request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, text));
        }

        let raw_bytes = response
            .bytes()
            .await
            .map_err(|e| DiagnosisError::ApiRequestFailed(format!("read body: {e}")))?;

        let completion: ChatCompletion = serde_json::from_slice(&raw_bytes).map_err(|e| {
            tracing::error!(
                raw_response = %sanitize_prompt(&String::from_utf8_lossy(&raw_bytes)),
                "Failed to parse chat completion JSON"
            );
            DiagnosisError::InvalidResponse(format!("json: {e}"))
        })?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| DiagnosisError::InvalidResponse("no choices returned".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err(match choice.finish_reason.as_deref() {
                Some("content_filter") => {
                    DiagnosisError::ContentBlocked("content_filter".to_string())
                }
                _ => DiagnosisError::InvalidResponse("empty completion".to_string()),
            });
        }

        tracing::info!(chars = content.len(), "Diagnosis completed");
        Ok(DiagnosisResult::new(content.trim()))
    }
}
