use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{consultation_handler, health_handler, index_handler};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let upload_limit = state.settings.server.max_upload_bytes();

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", consultation_routes(upload_limit))
        // Applied innermost-first: request id, then tracing, then CORS outermost.
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Audio and image uploads, capped at `server.max_upload_mb`.
fn consultation_routes(upload_limit: usize) -> Router<AppState> {
    Router::new().route(
        "/consultations",
        post(consultation_handler).layer(DefaultBodyLimit::max(upload_limit)),
    )
}
