//! Hugging Face inference API integration
//!
//! Provides:
//! - Text-to-image generation via the hosted inference API
//! - Prompt enhancement with the coloring-book style suffix

use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Default text-to-image model endpoint
const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/models/stabilityai/stable-diffusion-xl-base-1.0";

/// Style directives appended to every user prompt before it is sent
/// downstream. Kept verbatim; the widget carries its own, differently
/// worded suffix.
pub const STYLE_SUFFIX: &str = ", simple line drawing, black and white, coloring book style, \
     clean lines, minimalistic design, bold outlines, no shading, no gradients, no texture, \
     no colors, flat style, no background shading, crisp and clear contours, blank white background";

/// Negative prompt sent with every generation request
pub const NEGATIVE_PROMPT: &str =
    "color, shading, realistic, detailed, complexity, texture, gradients";

/// Fixed generation parameters
const NUM_INFERENCE_STEPS: u32 = 30;
const GUIDANCE_SCALE: f32 = 7.5;

/// Default square dimension when the request leaves width/height unset
pub const DEFAULT_DIMENSION: u32 = 512;

/// Upper bound on the downstream image size
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Append the style suffix to a user prompt
pub fn enhance_prompt(prompt: &str) -> String {
    format!("{prompt}{STYLE_SUFFIX}")
}

/// Image generation request
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    negative_prompt: &'static str,
    num_inference_steps: u32,
    guidance_scale: f32,
    height: u32,
    width: u32,
}

/// Inference errors
#[derive(Debug, Error)]
pub enum HfError {
    #[error("Hugging Face token not configured")]
    TokenMissing,

    #[error("inference request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inference API returned {0}")]
    Status(reqwest::StatusCode),

    #[error("inference API returned more than {MAX_IMAGE_BYTES} bytes")]
    TooLarge,
}

/// Hugging Face inference client
#[derive(Debug)]
pub struct HfClient {
    /// HTTP client
    client: Client,
    /// API token
    token: Option<String>,
    /// Model endpoint URL
    api_url: String,
}

impl HfClient {
    /// Create a new client from the process environment
    pub fn new() -> Self {
        let token = std::env::var("HUGGING_FACE_TOKEN").ok();
        let api_url =
            std::env::var("HF_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Self {
            client: Client::new(),
            token,
            api_url,
        }
    }

    /// Create a shared instance
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Check if the API token is configured
    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Generate an image, returning the raw raster bytes
    pub async fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, HfError> {
        let token = self.token.as_ref().ok_or(HfError::TokenMissing)?;

        let enhanced = enhance_prompt(prompt);
        let request = GenerationRequest {
            inputs: &enhanced,
            parameters: GenerationParameters {
                negative_prompt: NEGATIVE_PROMPT,
                num_inference_steps: NUM_INFERENCE_STEPS,
                guidance_scale: GUIDANCE_SCALE,
                height,
                width,
            },
        };

        debug!("Sending generation request to {} ({}x{})", self.api_url, width, height);

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", token))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Hugging Face API error: {} - {}", status, body);
            return Err(HfError::Status(status));
        }

        let bytes = response.bytes().await?;
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(HfError::TooLarge);
        }

        Ok(bytes.to_vec())
    }
}

impl Default for HfClient {
    fn default() -> Self {
        Self::new()
    }
}
