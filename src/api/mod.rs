//! HTTP API module - REST endpoints

mod cors;
mod generate;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::hf::HfClient;

pub use generate::{ApiError, ErrorBody, GenerateRequest};

/// Request body size cap
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub hf: Arc<HfClient>,
}

/// Build the API router
pub fn router(hf: Arc<HfClient>) -> Router {
    let state = AppState { hf };

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .route(
            "/generate",
            post(generate::generate).fallback(generate::method_not_allowed),
        )
        .layer(middleware::from_fn(cors::allow_cors))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "linebookd",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let inference = if state.hf.is_configured() {
        "configured"
    } else {
        "unconfigured"
    };

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            inference,
        }),
    )
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    inference: &'static str,
}
