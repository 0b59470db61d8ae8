use super::{AppState, handlers, pages};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::path::Path;
use tower_http::{
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

pub fn create_app(state: AppState, static_dir: &Path) -> Router {
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        // Upload page
        .route("/", get(pages::index))
        // Background removal
        .route("/remove-background", post(handlers::remove_background))
        // Page assets
        .nest_service("/static", ServeDir::new(static_dir))
        // Streaming reads fail once the body passes this size
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
        .with_state(state)
}
