//! Route Configuration
//!
//! Configures the WebSocket endpoint, the health check, and the static asset
//! fallback. Static files carry no domain logic; serving is delegated
//! entirely to `ServeDir`.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::startup::AppState;
use crate::ws::ws_handler;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.settings.static_files.dir);

    Router::new()
        // WebSocket relay endpoint
        .route("/ws", get(ws_handler))
        // Health check endpoint
        .route("/health", get(health_check))
        // Everything else resolves against the static asset directory
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Number of currently logged-in connections
    pub connections: usize,
}

/// Basic health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        connections: state.dispatcher.connected(),
    })
}
