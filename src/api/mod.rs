//! Operator console - HTTP endpoints for inspecting and starting matches

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::arena::Arena;

/// Build the operator router
pub fn router(arena: Arc<Arena>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/session", get(session_status))
        .route("/session/start", post(start_match))
        .layer(TraceLayer::new_for_http())
        .with_state(arena)
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "arenad",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse { status: "healthy" })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn session_status(State(arena): State<Arc<Arena>>) -> impl IntoResponse {
    Json(arena.status())
}

async fn start_match(State(arena): State<Arc<Arena>>) -> Response {
    match arena.start() {
        Ok(_) => {
            info!("Match started by operator");
            (StatusCode::OK, Json(arena.status())).into_response()
        }
        Err(err) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}
