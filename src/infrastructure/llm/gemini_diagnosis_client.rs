use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::application::ports::{DiagnosisClient, DiagnosisError};
use crate::domain::{DiagnosisPrompt, DiagnosisResult, QueryText};
use crate::presentation::config::{BlockThreshold, DiagnosisSettings, SafetySettings};

use super::image_payload::{ImagePayload, classify_status};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Google Gemini `generateContent` with explicit generation and safety settings.
pub struct GeminiDiagnosisClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

impl GeminiDiagnosisClient {
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
            generation_config: GenerationConfig {
                temperature: settings.temperature,
                top_p: settings.top_p,
                top_k: settings.top_k,
                max_output_tokens: settings.max_output_tokens,
            },
            safety_settings: safety_settings(&settings.safety),
        }
    }
}

fn safety_settings(safety: &SafetySettings) -> Vec<SafetySetting> {
    [
        ("HARM_CATEGORY_HARASSMENT", safety.harassment),
        ("HARM_CATEGORY_HATE_SPEECH", safety.hate_speech),
        ("HARM_CATEGORY_SEXUALLY_EXPLICIT", safety.sexually_explicit),
        ("HARM_CATEGORY_DANGEROUS_CONTENT", safety.dangerous_content),
    ]
    .into_iter()
    .map(|(category, threshold)| SafetySetting {
        category,
        threshold: threshold_name(threshold),
    })
    .collect()
}

fn threshold_name(threshold: BlockThreshold) -> &'static str {
    match threshold {
        BlockThreshold::BlockNone => "BLOCK_NONE",
        BlockThreshold::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
        BlockThreshold::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
        BlockThreshold::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    generation_config: &'a GenerationConfig,
    safety_settings: &'a [SafetySetting],
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[async_trait]
impl DiagnosisClient for GeminiDiagnosisClient {
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

        let mut parts = vec![Part::Text {
            text: prompt.as_str().to_string(),
        }];
        if let Some(payload) = payload {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: payload.mime_type,
                    data: payload.base64,
                },
            });
        }

        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts,
            }],
            generation_config: &self.generation_config,
            safety_settings: &self.safety_settings,
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DiagnosisError::ApiRequestFailed(format!("request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| DiagnosisError::InvalidResponse(format!("json: {e}")))?;

        if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(DiagnosisError::ContentBlocked(reason));
        }

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| DiagnosisError::InvalidResponse("no candidates returned".to_string()))?;

        let text = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(match candidate.finish_reason.as_deref() {
                Some(reason @ ("SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT")) => {
                    DiagnosisError::ContentBlocked(reason.to_string())
                }
                _ => DiagnosisError::InvalidResponse("empty candidate".to_string()),
            });
        }

        tracing::info!(chars = text.len(), "Diagnosis completed");
        Ok(DiagnosisResult::new(text.trim()))
    }
}
