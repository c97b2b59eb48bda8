//! Prompt widget - client-side generation state
//!
//! The Rust rendition of the frontend component: holds the prompt text, a
//! bounded list of generated pages, a loading flag, and the last error.
//! Talks to the linebookd `/generate` endpoint.

use std::path::Path;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

/// Maximum number of pages a book holds
pub const MAX_PAGES: usize = 3;

/// Viewports narrower than this request the smaller page size
pub const NARROW_VIEWPORT_PX: u32 = 600;

/// Style directives the widget appends before calling the backend. Worded
/// differently from the server-side suffix; both are preserved verbatim.
pub const STYLE_SUFFIX: &str = ", simple line drawing, black and white, coloring book style, \
     clean lines, minimal details, white background, ensure no background shading";

/// Pick the square page dimension for a viewport width
pub fn image_size_for_viewport(viewport_width: u32) -> u32 {
    if viewport_width < NARROW_VIEWPORT_PX {
        256
    } else {
        512
    }
}

/// A generated page: PNG bytes ready to display or save
#[derive(Debug, Clone)]
pub struct Page {
    pub data: Vec<u8>,
}

impl Page {
    /// Write the page to disk
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.data)
    }
}

/// Error returned when appending to a full page list
#[derive(Debug, Error, PartialEq, Eq)]
#[error("page list is full ({MAX_PAGES} pages)")]
pub struct PageListFull;

/// Append-only page list capped at [`MAX_PAGES`]
#[derive(Debug, Default)]
pub struct PageList {
    pages: Vec<Page>,
}

impl PageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.pages.len() >= MAX_PAGES
    }

    /// Append a page; refused once the cap is reached
    pub fn push(&mut self, page: Page) -> Result<(), PageListFull> {
        if self.is_full() {
            return Err(PageListFull);
        }
        self.pages.push(page);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

/// Outcome of a [`PromptWidget::generate`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// A page was generated and appended
    Generated,
    /// No prompt entered; nothing was sent
    EmptyPrompt,
    /// The book already holds the maximum number of pages
    AtCapacity,
    /// The backend call failed; the error is recorded on the widget
    Failed,
}

/// Error payload shape returned by the backend
#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}

/// Prompt widget state
#[derive(Debug)]
pub struct PromptWidget {
    backend_url: String,
    client: Client,
    viewport_width: u32,
    pub prompt: String,
    pages: PageList,
    loading: bool,
    last_error: Option<String>,
}

impl PromptWidget {
    /// Create a widget pointed at a backend `/generate` URL
    pub fn new(backend_url: impl Into<String>, viewport_width: u32) -> Self {
        Self {
            backend_url: backend_url.into(),
            client: Client::new(),
            viewport_width,
            prompt: String::new(),
            pages: PageList::new(),
            loading: false,
            last_error: None,
        }
    }

    pub fn pages(&self) -> &PageList {
        &self.pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether the generate control is enabled
    pub fn can_generate(&self) -> bool {
        !self.loading && !self.pages.is_full()
    }

    /// Whether the book is complete and ready for the review prompt
    pub fn review_ready(&self) -> bool {
        self.pages.is_full()
    }

    /// Generate one page from the current prompt
    pub async fn generate(&mut self) -> GenerateOutcome {
        if self.prompt.is_empty() {
            return GenerateOutcome::EmptyPrompt;
        }
        if self.pages.is_full() {
            return GenerateOutcome::AtCapacity;
        }

        self.loading = true;
        self.last_error = None;

        let size = image_size_for_viewport(self.viewport_width);
        let enhanced = format!("{}{}", self.prompt, STYLE_SUFFIX);

        debug!("Requesting {}x{} page from {}", size, size, self.backend_url);
        let result = self.request_page(&enhanced, size).await;
        self.loading = false;

        match result {
            Ok(data) => {
                // Guarded above; the list cannot be full here.
                match self.pages.push(Page { data }) {
                    Ok(()) => GenerateOutcome::Generated,
                    Err(_) => GenerateOutcome::AtCapacity,
                }
            }
            Err(message) => {
                self.last_error = Some(message);
                GenerateOutcome::Failed
            }
        }
    }

    async fn request_page(&self, prompt: &str, size: u32) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .post(&self.backend_url)
            .json(&json!({
                "prompt": prompt,
                "width": size,
                "height": size,
            }))
            .send()
            .await
            .map_err(|e| format!("Failed to generate image: {}", e))?;

        if !response.status().is_success() {
            // Prefer the server-supplied error message
            let message = response
                .json::<BackendError>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| "Failed to generate image".to_string());
            return Err(message);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to generate image: {}", e))?;
        Ok(bytes.to_vec())
    }
}
