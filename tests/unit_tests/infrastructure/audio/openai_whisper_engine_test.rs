use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use medivox::application::ports::{TranscriptionEngine, TranscriptionError};
use medivox::infrastructure::audio::OpenAiWhisperEngine;

#[derive(Default, Clone)]
struct Captured {
    authorization: Option<String>,
    body: Vec<u8>,
}

async fn start_mock_whisper_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, Arc<Mutex<Captured>>, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let captured = Arc::new(Mutex::new(Captured::default()));
    let sink = captured.clone();

    let app = Router::new().route(
        "/v1/audio/transcriptions",
        post(move |headers: HeaderMap, body: Bytes| {
            let sink = sink.clone();
            async move {
                {
                    let mut captured = sink.lock().unwrap();
                    captured.authorization = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    captured.body = body.to_vec();
                }
                let status = axum::http::StatusCode::from_u16(response_status).unwrap();
                (status, response_body).into_response()
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}/v1", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, captured, shutdown_tx)
}

#[tokio::test]
async fn given_valid_audio_when_transcribing_then_returns_trimmed_text() {
    let (base_url, captured, shutdown_tx) =
        start_mock_whisper_server(200, r#"{"text": "  I have a headache  "}"#).await;
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);

    let result = engine.transcribe(b"RIFF fake wav").await;

    assert_eq!(result.unwrap(), "I have a headache");
    let captured = captured.lock().unwrap().clone();
    assert_eq!(captured.authorization.as_deref(), Some("Bearer test-key"));
    let body = String::from_utf8_lossy(&captured.body);
    assert!(body.contains("whisper-large-v3"));
    assert!(body.contains("audio.wav"));
    assert!(body.contains("RIFF fake wav"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_custom_model_when_transcribing_then_sends_model_name() {
    let (base_url, captured, shutdown_tx) =
        start_mock_whisper_server(200, r#"{"text": "ok"}"#).await;
    let engine = OpenAiWhisperEngine::new(
        "test-key".to_string(),
        Some(format!("{}/", base_url)),
        Some("whisper-large-v3-turbo".to_string()),
    );

    engine.transcribe(b"audio").await.unwrap();

    let body = String::from_utf8_lossy(&captured.lock().unwrap().body).to_string();
    assert!(body.contains("whisper-large-v3-turbo"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_silence_when_transcribing_then_returns_empty_string() {
    let (base_url, _captured, shutdown_tx) =
        start_mock_whisper_server(200, r#"{"text": " "}"#).await;
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);

    let result = engine.transcribe(b"silent audio").await;

    assert_eq!(result.unwrap(), "");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unauthorized_status_when_transcribing_then_unauthorized() {
    let (base_url, _captured, shutdown_tx) =
        start_mock_whisper_server(401, r#"{"error": "invalid key"}"#).await;
    let engine = OpenAiWhisperEngine::new("bad-key".to_string(), Some(base_url), None);

    let result = engine.transcribe(b"audio").await;

    assert!(matches!(result, Err(TranscriptionError::Unauthorized(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_rate_limit_when_transcribing_then_rate_limited() {
    let (base_url, _captured, shutdown_tx) =
        start_mock_whisper_server(429, r#"{"error": "slow down"}"#).await;
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);

    let result = engine.transcribe(b"audio").await;

    assert!(matches!(result, Err(TranscriptionError::RateLimited)));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_transcribing_then_api_request_failed_with_body() {
    let (base_url, _captured, shutdown_tx) =
        start_mock_whisper_server(500, "upstream exploded").await;
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);

    let result = engine.transcribe(b"audio").await;

    match result {
        Err(TranscriptionError::ApiRequestFailed(message)) => {
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected ApiRequestFailed, got {:?}", other),
    }
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_malformed_json_when_transcribing_then_invalid_response() {
    let (base_url, _captured, shutdown_tx) = start_mock_whisper_server(200, "not json").await;
    let engine = OpenAiWhisperEngine::new("test-key".to_string(), Some(base_url), None);

    let result = engine.transcribe(b"audio").await;

    assert!(matches!(result, Err(TranscriptionError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_empty_api_key_when_transcribing_then_unauthorized_without_request() {
    let engine = OpenAiWhisperEngine::new(
        String::new(),
        Some("http://127.0.0.1:9".to_string()),
        None,
    );

    let result = engine.transcribe(b"audio").await;

    assert!(matches!(result, Err(TranscriptionError::Unauthorized(_))));
}

#[tokio::test]
async fn given_unreachable_server_when_transcribing_then_api_request_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let engine = OpenAiWhisperEngine::new(
        "test-key".to_string(),
        Some(format!("http://{}", addr)),
        None,
    );

    let result = engine.transcribe(b"audio").await;

    assert!(matches!(result, Err(TranscriptionError::ApiRequestFailed(_))));
}
