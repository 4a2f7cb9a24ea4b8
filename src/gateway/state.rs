use std::sync::Arc;

use crate::embedding::EmbeddingProvider;
use crate::scoring::SimilarityScorer;
use crate::store::PromptStore;

/// Shared request state. Cloned per request; the scorer is behind an `Arc`.
pub struct HandlerState<E, S> {
    pub scorer: Arc<SimilarityScorer<E, S>>,
}

impl<E, S> Clone for HandlerState<E, S> {
    fn clone(&self) -> Self {
        Self {
            scorer: Arc::clone(&self.scorer),
        }
    }
}

impl<E, S> HandlerState<E, S>
where
    E: EmbeddingProvider + 'static,
    S: PromptStore + 'static,
{
    pub fn new(scorer: SimilarityScorer<E, S>) -> Self {
        Self {
            scorer: Arc::new(scorer),
        }
    }
}
