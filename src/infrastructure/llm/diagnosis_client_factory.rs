use std::sync::Arc;

use crate::application::ports::{DiagnosisClient, DiagnosisError};
use crate::presentation::config::{DiagnosisProvider, DiagnosisSettings};

use super::gemini_diagnosis_client::GeminiDiagnosisClient;
use super::openai_diagnosis_client::OpenAiDiagnosisClient;

pub struct DiagnosisClientFactory;

impl DiagnosisClientFactory {
    pub fn create(settings: &DiagnosisSettings) -> Result<Arc<dyn DiagnosisClient>, DiagnosisError> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                DiagnosisError::Unauthorized(format!(
                    "API key required for {:?} diagnosis provider",
                    settings.provider
                ))
            })?;

        let client: Arc<dyn DiagnosisClient> = match settings.provider {
            DiagnosisProvider::OpenAi => Arc::new(OpenAiDiagnosisClient::new(api_key, settings)),
            DiagnosisProvider::Gemini => Arc::new(GeminiDiagnosisClient::new(api_key, settings)),
        };

        tracing::info!(provider = ?settings.provider, "Diagnosis client created");
        Ok(client)
    }
}
