//! TestServer - true end-to-end test harness
//!
//! Spawns the actual linebookd binary on a random port, with the inference
//! endpoint redirected at a mock provider via the `HF_API_URL` override.
//! Each instance gets its own process so token configuration is isolated.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

/// Test harness that spawns the actual linebookd binary on a random port
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    child: Child,
}

impl TestServer {
    /// Start a server with a test token, pointed at the given provider URL
    pub async fn start(provider_url: &str) -> Result<Self> {
        Self::start_with_token(provider_url, Some("test-token")).await
    }

    /// Start a server, optionally without a provider token configured
    pub async fn start_with_token(provider_url: &str, token: Option<&str>) -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        drop(listener);

        let binary_path = find_binary_path()?;

        let mut command = Command::new(&binary_path);
        command
            .arg("--bind")
            .arg(addr.to_string())
            .env_remove("HUGGING_FACE_TOKEN")
            .env("HF_API_URL", provider_url)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(token) = token {
            command.env("HUGGING_FACE_TOKEN", token);
        }

        let child = command.spawn().map_err(|e| {
            anyhow::anyhow!("Failed to spawn linebookd binary at {:?}: {}", binary_path, e)
        })?;

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        // Poll until server is ready (max 5 seconds to handle resource contention)
        let mut ready = false;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client
                .get(format!("http://{}/health", addr))
                .send()
                .await
                .is_ok()
            {
                ready = true;
                break;
            }
        }

        if !ready {
            panic!("Server failed to start within 5 seconds");
        }

        Ok(Self {
            addr,
            client,
            child,
        })
    }

    /// Get the base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the full URL of the generate endpoint
    pub fn generate_url(&self) -> String {
        format!("{}/generate", self.base_url())
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .json(body)
            .send()
            .await?)
    }

    /// Make an OPTIONS request (browser preflight)
    pub async fn options(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .request(
                reqwest::Method::OPTIONS,
                format!("{}{}", self.base_url(), path),
            )
            .send()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
    }
}

/// Find the linebookd binary path
fn find_binary_path() -> Result<PathBuf> {
    // Check common locations
    let candidates = [
        // Debug build (most common for tests)
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/debug/linebookd"),
        // Release build
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("target/release/linebookd"),
    ];

    for path in &candidates {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    anyhow::bail!(
        "Could not find linebookd binary. Run 'cargo build' first. Searched: {:?}",
        candidates
    )
}
