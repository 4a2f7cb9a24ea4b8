//! HTTP client helpers for tests.

use guessr::GUESSR_STATUS_HEADER;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

/// Raw outcome of one `POST /api/getSim`.
#[derive(Debug)]
pub struct SimResponse {
    pub status: u16,
    pub status_header: String,
    pub body: serde_json::Value,
}

impl SimResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    pub fn similarity(&self) -> f64 {
        self.body["similarity"]
            .as_f64()
            .expect("response has no similarity")
    }
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Posts a guess. `None` for `pid` omits the query parameter; `None` for
    /// `guess` sends an empty JSON object.
    pub async fn get_sim(
        &self,
        pid: Option<&str>,
        guess: Option<&str>,
    ) -> Result<SimResponse, TestClientError> {
        let body = match guess {
            Some(guess) => serde_json::json!({ "guess": guess }),
            None => serde_json::json!({}),
        };
        self.get_sim_raw(pid, body.to_string()).await
    }

    pub async fn get_sim_raw(
        &self,
        pid: Option<&str>,
        body: impl Into<reqwest::Body>,
    ) -> Result<SimResponse, TestClientError> {
        let mut builder = self
            .client
            .post(self.url("/api/getSim"))
            .header("Content-Type", "application/json");
        if let Some(pid) = pid {
            builder = builder.query(&[("pid", pid)]);
        }

        let resp = builder.body(body).send().await?;

        let status = resp.status().as_u16();
        let status_header = resp
            .headers()
            .get(GUESSR_STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let body = resp.json().await?;

        Ok(SimResponse {
            status,
            status_header,
            body,
        })
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

#[derive(Debug, Deserialize)]
pub struct ComponentStatus {
    pub http: String,
    pub store: String,
    pub embedder: String,
    pub store_backend: String,
    pub embedder_mode: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}
