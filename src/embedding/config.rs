use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_MS,
};
use crate::embedding::error::EmbeddingError;

#[derive(Clone)]
/// Configuration for [`EmbedderBackend`](super::EmbedderBackend).
pub struct EmbedderConfig {
    /// OpenAI API key. `None` selects the deterministic stub embedder.
    pub api_key: Option<String>,
    /// Embedding model name.
    pub model: String,
    /// Base URL of the OpenAI-compatible API (without `/embeddings`).
    pub base_url: String,
    /// Output dimension (stub output size; reported for the remote model).
    pub embedding_dim: usize,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for EmbedderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbedderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("embedding_dim", &self.embedding_dim)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }
}

impl EmbedderConfig {
    /// Config for the OpenAI embeddings API.
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Config for the deterministic stub embedder.
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns `true` if no API key is configured.
    pub fn is_stub(&self) -> bool {
        self.api_key.is_none()
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than zero".to_string(),
            });
        }

        if let Some(key) = &self.api_key
            && key.trim().is_empty()
        {
            return Err(EmbeddingError::InvalidConfig {
                reason: "api_key cannot be empty when provided".to_string(),
            });
        }

        if !self.is_stub() {
            if self.model.trim().is_empty() {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "model cannot be empty".to_string(),
                });
            }
            if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
                return Err(EmbeddingError::InvalidConfig {
                    reason: format!("base_url must be an http(s) URL, got '{}'", self.base_url),
                });
            }
        }

        if self.timeout.is_zero() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
