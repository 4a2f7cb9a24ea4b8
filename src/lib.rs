//! Guessr library crate (used by the server and integration tests).
//!
//! Scores how close a player's guess is to a stored reference prompt: the prompt is
//! looked up by id, both texts are embedded, and the answer is the cosine similarity
//! of the two vectors.
//!
//! # Public API Surface
//!
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`cosine_similarity`], [`SimilarityError`] - Vector comparison
//! - [`EmbeddingProvider`], [`EmbedderBackend`] - Text embedding (OpenAI or offline stub)
//! - [`PromptStore`], [`PromptBackend`] - Prompt lookup (Firestore or in-memory)
//! - [`SimilarityScorer`], [`ScoringError`] - The scoring pipeline
//! - [`gateway`] - Axum router and handlers
//!
//! ## Test/Mock Support
//! [`MockEmbedder`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod scoring;
pub mod similarity;
pub mod store;

pub use config::{Config, ConfigError, StoreSelection};
pub use constants::GUESSR_STATUS_HEADER;
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{
    EmbedderBackend, EmbedderConfig, Embedding, EmbeddingError, EmbeddingProvider,
    OpenAiEmbedder, StubEmbedder,
};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use scoring::{ErrorKind, ScoreOutcome, ScorerConfig, ScoringError, SimilarityScorer};
pub use similarity::{SimilarityError, VectorSide, cosine_similarity};
pub use store::{
    FirestoreConfig, FirestoreStore, InMemoryStore, PromptBackend, PromptRecord, PromptStore,
    StoreError,
};
