use reqwest::Client;
use tracing::{info, warn};

use super::config::EmbedderConfig;
use super::error::EmbeddingError;
use super::openai::OpenAiEmbedder;
use super::stub::StubEmbedder;
use super::{Embedding, EmbeddingProvider};

#[derive(Debug, Clone)]
/// Embedder selected at startup (remote API or offline stub).
pub enum EmbedderBackend {
    /// OpenAI embeddings API.
    OpenAi(OpenAiEmbedder),
    /// Deterministic offline embedder.
    Stub(StubEmbedder),
}

impl EmbedderBackend {
    /// Builds the OpenAI backend when an API key is configured, the stub otherwise.
    pub fn from_config(client: Client, config: &EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.is_stub() {
            warn!(
                embedding_dim = config.embedding_dim,
                "No OPENAI_API_KEY configured, running embedder in stub mode"
            );
            return Ok(Self::Stub(StubEmbedder::new(config.embedding_dim)?));
        }

        let embedder = OpenAiEmbedder::new(client, config)?;
        info!(model = %embedder.model(), endpoint = %embedder.endpoint(), "Using OpenAI embedder");
        Ok(Self::OpenAi(embedder))
    }

    /// Returns `true` if running the offline stub.
    pub fn is_stub(&self) -> bool {
        matches!(self, EmbedderBackend::Stub(_))
    }
}

impl EmbeddingProvider for EmbedderBackend {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        match self {
            EmbedderBackend::OpenAi(e) => e.embed(text).await,
            EmbedderBackend::Stub(e) => e.embed(text).await,
        }
    }

    fn dimensions(&self) -> usize {
        match self {
            EmbedderBackend::OpenAi(e) => e.dimensions(),
            EmbedderBackend::Stub(e) => e.dimensions(),
        }
    }

    fn provider_name(&self) -> &'static str {
        match self {
            EmbedderBackend::OpenAi(e) => e.provider_name(),
            EmbedderBackend::Stub(e) => e.provider_name(),
        }
    }
}
