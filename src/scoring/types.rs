use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_PROVIDER_RETRIES, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_RETRY_BACKOFF_MS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Result of scoring one guess against one prompt.
pub struct ScoreOutcome {
    /// Prompt id as requested.
    pub id: String,
    /// The stored prompt text.
    pub reference_text: String,
    /// Cosine similarity in `[-1, 1]`.
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Timeout and retry policy for [`SimilarityScorer`](super::SimilarityScorer).
pub struct ScorerConfig {
    /// Upper bound for each store lookup and each embedding attempt.
    pub request_timeout: Duration,
    /// Extra attempts for transient embedding failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubles per attempt.
    pub retry_backoff: Duration,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            max_retries: DEFAULT_PROVIDER_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }
}

impl ScorerConfig {
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Closed classification of scoring failures.
pub enum ErrorKind {
    /// Missing or malformed request input.
    Validation,
    /// Unknown prompt id.
    NotFound,
    /// Store or embedding provider failure.
    Provider,
    /// An external call exceeded its time budget.
    Timeout,
    /// An embedding had zero magnitude.
    DegenerateVector,
    /// Embeddings could not be compared (length mismatch, non-finite values).
    InvalidInput,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "invalid_request",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Provider => "provider_error",
            ErrorKind::Timeout => "timeout",
            ErrorKind::DegenerateVector => "degenerate_vector",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
