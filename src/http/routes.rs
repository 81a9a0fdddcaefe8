use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Transcription
        .route("/api/scribe-token", get(handlers::scribe_token))
        // AI tools
        .route("/api/ai/summarize", post(handlers::summarize))
        .route("/api/ai/format", post(handlers::format))
        .route("/api/ai/flowchart", post(handlers::flowchart))
        .route("/api/ai/extract-actions", post(handlers::extract_actions))
        .route("/api/gumloop", post(handlers::gumloop))
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
