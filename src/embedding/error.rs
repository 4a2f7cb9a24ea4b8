use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("embedding request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("embedding provider rate limited the request: {message}")]
    RateLimited { message: String },

    #[error("embedding provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid embedding response: {reason}")]
    InvalidResponse { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl EmbeddingError {
    /// Returns `true` when retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            EmbeddingError::RequestFailed { .. }
            | EmbeddingError::Timeout { .. }
            | EmbeddingError::RateLimited { .. } => true,
            EmbeddingError::Api { status, .. } => *status >= 500,
            EmbeddingError::InvalidResponse { .. } | EmbeddingError::InvalidConfig { .. } => false,
        }
    }
}
