use axum::Json;
use axum::extract::{Extension, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::application::services::ConsultationOutcome;
use crate::domain::{ConsultationRequest, InputMedia};
use crate::infrastructure::observability::RequestId;
use crate::presentation::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConsultationResponse {
    pub status: &'static str,
    pub stage: &'static str,
    pub result: String,
    pub image_degraded: bool,
}

impl From<&ConsultationOutcome> for ConsultationResponse {
    fn from(outcome: &ConsultationOutcome) -> Self {
        let image_degraded = matches!(
            outcome,
            ConsultationOutcome::Diagnosed(diagnosis) if diagnosis.image_issue.is_some()
        );
        Self {
            status: if outcome.is_diagnosed() {
                "diagnosed"
            } else {
                "failed"
            },
            stage: outcome.stage().as_str(),
            result: outcome.message(),
            image_degraded,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Accepts `multipart/form-data` with optional `audio`, `image` and `text` fields.
/// Once the form is read the answer is always `200 OK` carrying either a
/// diagnosis or a readable failure.
#[tracing::instrument(skip_all, fields(request_id = %request_id.as_str()))]
pub async fn consultation_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    multipart: Multipart,
) -> impl IntoResponse {
    let request = match read_consultation_form(multipart).await {
        Ok(request) => request,
        Err((status, message)) => {
            tracing::warn!(status = %status, error = %message, "Rejected consultation form");
            return (status, Json(ErrorResponse { error: message })).into_response();
        }
    };

    let outcome = state
        .consultation_service
        .consult_with_cancellation(request, state.shutdown.child_token())
        .await;

    let response = ConsultationResponse::from(&outcome);
    tracing::info!(status = response.status, stage = response.stage, "Consultation answered");
    (StatusCode::OK, Json(response)).into_response()
}

async fn read_consultation_form(
    mut multipart: Multipart,
) -> Result<ConsultationRequest, (StatusCode, String)> {
    let mut request = ConsultationRequest::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err((e.status(), format!("Failed to read multipart: {}", e))),
        };

        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);

        match name.as_str() {
            "audio" | "image" => {
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| (e.status(), format!("Failed to read {}: {}", name, e)))?;
                tracing::debug!(field = %name, bytes = data.len(), filename = ?filename, "Media received");
                let media = InputMedia::from_bytes(data, filename);
                if name == "audio" {
                    request.audio = media;
                } else {
                    request.image = media;
                }
            }
            "text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| (e.status(), format!("Failed to read text: {}", e)))?;
                request.typed_text = Some(text);
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    Ok(request)
}
