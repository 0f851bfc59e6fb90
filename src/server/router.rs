use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::handlers::{chat, health, upload};
use crate::state::AppState;

/// Application router: health probe, the two chat modes, file upload.
/// CORS is permissive; the service fronts a browser client on another
/// origin.
pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/chat", post(chat::chat))
        .route("/chat/stream", post(chat::chat_stream))
        .route("/upload", post(upload::upload))
        .with_state(state)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
}
