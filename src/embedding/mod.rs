//! Embedding providers.
//!
//! - [`OpenAiEmbedder`] calls the OpenAI embeddings API.
//! - [`StubEmbedder`] produces deterministic vectors offline.
//! - [`EmbedderBackend`] picks one of the two at startup.

mod backend;
/// Embedder configuration.
pub mod config;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
/// OpenAI embeddings client.
pub mod openai;
/// Offline embedder.
pub mod stub;


pub use backend::EmbedderBackend;
pub use config::EmbedderConfig;
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use openai::OpenAiEmbedder;
pub use stub::StubEmbedder;

/// A dense embedding vector.
pub type Embedding = Vec<f64>;

/// Turns text into an [`Embedding`].
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Embedding, EmbeddingError>> + Send;

    /// Output dimension of this provider.
    fn dimensions(&self) -> usize;

    /// Short provider name for logs and readiness reports.
    fn provider_name(&self) -> &'static str;
}
