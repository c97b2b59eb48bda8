//! MockProvider - in-process inference API stand-in
//!
//! Accepts POSTs on any path, records the JSON bodies, and replies with
//! either a small raster image or a canned failure.

use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::Value;
use tokio::net::TcpListener;

/// Side of the provider the test wants to exercise
#[derive(Debug, Clone, Copy)]
pub enum MockBehavior {
    /// Respond with a colored 64x64 PNG
    Image,
    /// Respond with a 503 and a provider-style error body
    Failure,
}

/// Recording mock of the inference provider
pub struct MockProvider {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Value>>>,
    behavior: MockBehavior,
}

impl MockProvider {
    /// Start a provider that returns images
    pub async fn start() -> Result<Self> {
        Self::start_with(MockBehavior::Image).await
    }

    /// Start a provider with the given behavior
    pub async fn start_with(behavior: MockBehavior) -> Result<Self> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            requests: requests.clone(),
            behavior,
        };

        let app = Router::new().route("/", post(handle)).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock provider crashed");
        });

        Ok(Self { addr, requests })
    }

    /// URL the server under test should be pointed at
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Body of the most recent request
    pub fn last_request(&self) -> Option<Value> {
        self.requests.lock().unwrap().last().cloned()
    }
}

async fn handle(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.requests.lock().unwrap().push(body);

    match state.behavior {
        MockBehavior::Image => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/png")],
            sample_image(),
        )
            .into_response(),
        MockBehavior::Failure => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "Model is currently loading" })),
        )
            .into_response(),
    }
}

/// A small colored PNG, so grayscale conversion has something to strip
fn sample_image() -> Vec<u8> {
    let mut img = RgbImage::new(64, 64);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgb([(x * 4) as u8, (y * 4) as u8, 200]);
    }
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("encode sample image");
    buf.into_inner()
}
