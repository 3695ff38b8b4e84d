use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub diagnosis_provider: &'static str,
    pub voice_output: bool,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        diagnosis_provider: state.settings.diagnosis.provider.as_str(),
        voice_output: state.settings.speech.enabled,
    })
}
