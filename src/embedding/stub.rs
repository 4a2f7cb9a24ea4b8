//! Deterministic offline embedder.
//!
//! Every lowercase word is mapped to a pseudo-random vector seeded from its blake3
//! hash; a text embeds as the normalized sum of its word vectors. Texts that share
//! words therefore land closer together, which keeps scores meaningful without a
//! model. Empty text embeds as the zero vector.

use tracing::debug;

use super::error::EmbeddingError;
use super::{Embedding, EmbeddingProvider};

#[derive(Debug, Clone)]
pub struct StubEmbedder {
    embedding_dim: usize,
}

impl StubEmbedder {
    pub fn new(embedding_dim: usize) -> Result<Self, EmbeddingError> {
        if embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be greater than zero".to_string(),
            });
        }
        Ok(Self { embedding_dim })
    }

    /// Embeds synchronously; the async trait method delegates here.
    pub fn embed_sync(&self, text: &str) -> Embedding {
        let mut embedding = vec![0.0f64; self.embedding_dim];

        let mut tokens = 0usize;
        for token in tokenize(text) {
            self.accumulate(&mut embedding, &token);
            tokens += 1;
        }

        if tokens == 0 && !text.trim().is_empty() {
            self.accumulate(&mut embedding, text.trim());
        }

        normalize(&mut embedding);
        debug!(text_len = text.len(), tokens, "Generated stub embedding");
        embedding
    }

    fn accumulate(&self, embedding: &mut [f64], token: &str) {
        let hash = blake3::hash(token.as_bytes());
        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&hash.as_bytes()[..8]);
        let mut state = u64::from_le_bytes(seed_bytes);

        for value in embedding.iter_mut() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            *value += ((state >> 32) as f64 / u32::MAX as f64) * 2.0 - 1.0;
        }
    }
}

impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.embedding_dim
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

fn normalize(embedding: &mut [f64]) {
    let norm = embedding.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in embedding.iter_mut() {
            *x /= norm;
        }
    }
}
