//! OpenAI embeddings API client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::config::EmbedderConfig;
use super::error::EmbeddingError;
use super::{Embedding, EmbeddingProvider};

#[derive(Serialize)]
struct EmbeddingRequestBody<'a> {
    model: &'a str,
    input: &'a str,
    encoding_format: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingResponseBody {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Calls `POST {base_url}/embeddings` for one input per request.
///
/// The `reqwest::Client` is shared with the rest of the process; construct it once.
#[derive(Clone)]
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    embedding_dim: usize,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("embedding_dim", &self.embedding_dim)
            .finish()
    }
}

impl OpenAiEmbedder {
    pub fn new(client: Client, config: &EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let api_key = config
            .api_key
            .as_ref()
            .map(|k| k.trim().to_string())
            .ok_or_else(|| EmbeddingError::InvalidConfig {
                reason: "OpenAI embedder requires an api_key".to_string(),
            })?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embedding_dim: config.embedding_dim,
            timeout: config.timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> EmbeddingError {
        if err.is_timeout() {
            EmbeddingError::Timeout {
                after: self.timeout,
            }
        } else {
            EmbeddingError::RequestFailed {
                reason: err.to_string(),
            }
        }
    }
}

impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let body = EmbeddingRequestBody {
            model: &self.model,
            input: text,
            encoding_format: "float",
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| {
                    let trimmed = raw.trim();
                    if trimmed.is_empty() {
                        status.canonical_reason().unwrap_or("unknown error").to_string()
                    } else {
                        trimmed.to_string()
                    }
                });

            error!(status = status.as_u16(), %message, "Embedding provider error");

            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                EmbeddingError::RateLimited { message }
            } else {
                EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let parsed: EmbeddingResponseBody =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InvalidResponse {
                    reason: e.to_string(),
                })?;

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InvalidResponse {
                reason: "response contained no embeddings".to_string(),
            })?;

        if embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse {
                reason: "response embedding is empty".to_string(),
            });
        }

        debug!(
            model = %self.model,
            text_len = text.len(),
            dim = embedding.len(),
            "Received embedding"
        );

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.embedding_dim
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
