//! Image generation endpoint
//!
//! POST /generate - proxy a prompt to the inference API and return the
//! line-art PNG

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::AppState;
use crate::hf::{HfError, DEFAULT_DIMENSION};
use crate::lineart::{self, LineArtError};

/// Generation request body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Structured error payload returned on every failure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Endpoint errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Prompt is required")]
    MissingPrompt,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Hugging Face token not configured")]
    TokenMissing,

    #[error("Failed to generate image")]
    Generation(#[source] HfError),

    #[error("Failed to generate image")]
    Processing(#[from] LineArtError),
}

impl From<HfError> for ApiError {
    fn from(err: HfError) -> Self {
        match err {
            HfError::TokenMissing => ApiError::TokenMissing,
            other => ApiError::Generation(other),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingPrompt => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::TokenMissing | ApiError::Generation(_) | ApiError::Processing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Local error detail surfaced to the client; upstream bodies stay in
    /// the logs.
    fn details(&self) -> Option<String> {
        match self {
            ApiError::Generation(source) => Some(source.to_string()),
            ApiError::Processing(source) => Some(source.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Handle a generation request
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::MissingPrompt)?;

    let prompt = request
        .prompt
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or(ApiError::MissingPrompt)?;

    let width = request.width.unwrap_or(DEFAULT_DIMENSION);
    let height = request.height.unwrap_or(DEFAULT_DIMENSION);

    debug!("Generating {}x{} page for prompt: {}", width, height, prompt);

    let raster = state.hf.generate(prompt, width, height).await?;
    let png = lineart::to_line_art(&raster)?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// Reject non-POST methods on /generate
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
