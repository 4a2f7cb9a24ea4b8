//! Guess scoring pipeline.
//!
//! [`SimilarityScorer`] resolves the prompt from a [`PromptStore`](crate::store::PromptStore),
//! embeds guess and prompt concurrently with an
//! [`EmbeddingProvider`](crate::embedding::EmbeddingProvider), and compares the two
//! vectors with [`cosine_similarity`](crate::similarity::cosine_similarity).
//!
//! Every external call is bounded by [`ScorerConfig::request_timeout`]. Transient
//! embedding failures (network errors, timeouts, 429, 5xx) are retried up to
//! [`ScorerConfig::max_retries`] times with doubling backoff; store lookups are not
//! retried.

pub mod error;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ScoringError;
pub use scorer::SimilarityScorer;
pub use types::{ErrorKind, ScoreOutcome, ScorerConfig};
