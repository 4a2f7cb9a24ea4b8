use tokio::time::{sleep, timeout};
use tracing::{debug, info, instrument, warn};

use crate::embedding::{Embedding, EmbeddingError, EmbeddingProvider};
use crate::similarity::cosine_similarity;
use crate::store::{PromptRecord, PromptStore};

use super::error::ScoringError;
use super::types::{ScoreOutcome, ScorerConfig};

/// Scores a guess against a stored prompt.
///
/// Built once at startup and shared across requests; it holds no per-request state.
pub struct SimilarityScorer<E, S> {
    embedder: E,
    store: S,
    config: ScorerConfig,
}

impl<E, S> std::fmt::Debug for SimilarityScorer<E, S>
where
    E: EmbeddingProvider,
    S: PromptStore,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityScorer")
            .field("embedder", &self.embedder.provider_name())
            .field("store", &self.store.backend_name())
            .field("config", &self.config)
            .finish()
    }
}

impl<E, S> SimilarityScorer<E, S>
where
    E: EmbeddingProvider,
    S: PromptStore,
{
    pub fn new(embedder: E, store: S, config: ScorerConfig) -> Self {
        Self {
            embedder,
            store,
            config,
        }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Looks up prompt `id`, embeds it alongside `guess`, and returns their cosine similarity.
    ///
    /// Empty strings count as missing. The id is validated before the guess.
    #[instrument(skip(self, guess), fields(guess_len = guess.map(str::len)))]
    pub async fn score(
        &self,
        id: Option<&str>,
        guess: Option<&str>,
    ) -> Result<ScoreOutcome, ScoringError> {
        let id = id
            .filter(|v| !v.is_empty())
            .ok_or(ScoringError::MissingPromptId)?;
        let guess = guess
            .filter(|v| !v.is_empty())
            .ok_or(ScoringError::MissingGuess)?;

        let record = self
            .fetch_prompt(id)
            .await?
            .ok_or_else(|| ScoringError::PromptNotFound { id: id.to_string() })?;

        let (guess_vector, prompt_vector) = tokio::try_join!(
            self.embed_with_retry(guess, "guess"),
            self.embed_with_retry(&record.prompt, "prompt"),
        )?;

        let similarity = cosine_similarity(&guess_vector, &prompt_vector)?;

        info!(id, similarity, "Scored guess");

        Ok(ScoreOutcome {
            id: id.to_string(),
            reference_text: record.prompt,
            similarity,
        })
    }

    async fn fetch_prompt(&self, id: &str) -> Result<Option<PromptRecord>, ScoringError> {
        let after = self.config.request_timeout;
        match timeout(after, self.store.get(id)).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(id, ?after, "Prompt lookup timed out");
                Err(ScoringError::Timeout {
                    operation: "prompt lookup",
                    after,
                })
            }
        }
    }

    async fn embed_with_retry(
        &self,
        text: &str,
        label: &'static str,
    ) -> Result<Embedding, ScoringError> {
        let mut attempt = 0u32;
        let mut backoff = self.config.retry_backoff;

        loop {
            attempt += 1;

            let result = match timeout(self.config.request_timeout, self.embedder.embed(text)).await
            {
                Ok(result) => result,
                Err(_) => Err(EmbeddingError::Timeout {
                    after: self.config.request_timeout,
                }),
            };

            match result {
                Ok(vector) => {
                    debug!(label, attempt, dim = vector.len(), "Embedded text");
                    return Ok(vector);
                }
                Err(e) if e.is_transient() && attempt <= self.config.max_retries => {
                    warn!(
                        label,
                        attempt,
                        error = %e,
                        ?backoff,
                        "Transient embedding failure, retrying"
                    );
                    sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
                Err(e) => return Err(ScoringError::Embedding(e)),
            }
        }
    }
}
