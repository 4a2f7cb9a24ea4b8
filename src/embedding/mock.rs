use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use super::error::EmbeddingError;
use super::stub::StubEmbedder;
use super::{Embedding, EmbeddingProvider};

#[derive(Default)]
struct MockState {
    vectors: RwLock<HashMap<String, Embedding>>,
    failure: RwLock<Option<EmbeddingError>>,
    /// Calls left to fail when `fail_forever` is unset.
    remaining_failures: AtomicUsize,
    fail_forever: AtomicBool,
    delay: RwLock<Option<Duration>>,
    calls: AtomicUsize,
}

/// Scriptable in-memory embedder.
///
/// Texts registered with [`with_vector`](Self::with_vector) return that vector;
/// everything else falls back to a [`StubEmbedder`]. Clones share state.
#[derive(Clone)]
pub struct MockEmbedder {
    fallback: StubEmbedder,
    state: Arc<MockState>,
}

impl std::fmt::Debug for MockEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockEmbedder")
            .field("embedding_dim", &self.fallback.dimensions())
            .field("calls", &self.call_count())
            .finish()
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(16)
    }
}

impl MockEmbedder {
    /// Creates a mock whose fallback vectors have `embedding_dim` components.
    ///
    /// # Panics
    ///
    /// Panics if `embedding_dim` is zero.
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            fallback: StubEmbedder::new(embedding_dim).expect("embedding_dim must be non-zero"),
            state: Arc::new(MockState::default()),
        }
    }

    pub fn with_vector(self, text: impl Into<String>, vector: Embedding) -> Self {
        self.state.vectors.write().insert(text.into(), vector);
        self
    }

    /// Every call fails with `err`.
    pub fn failing_with(self, err: EmbeddingError) -> Self {
        *self.state.failure.write() = Some(err);
        self.state.fail_forever.store(true, Ordering::SeqCst);
        self
    }

    /// The next `times` calls fail with `err`, later calls succeed.
    pub fn failing_times(self, times: usize, err: EmbeddingError) -> Self {
        *self.state.failure.write() = Some(err);
        self.state.fail_forever.store(false, Ordering::SeqCst);
        self.state.remaining_failures.store(times, Ordering::SeqCst);
        self
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.state.delay.write() = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    fn next_failure(&self) -> Option<EmbeddingError> {
        let failure = self.state.failure.read().clone()?;
        if self.state.fail_forever.load(Ordering::SeqCst) {
            return Some(failure);
        }

        let claimed = self
            .state
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        claimed.then_some(failure)
    }
}

impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.state.delay.read();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_failure() {
            return Err(err);
        }

        let registered = self.state.vectors.read().get(text).cloned();
        Ok(registered.unwrap_or_else(|| self.fallback.embed_sync(text)))
    }

    fn dimensions(&self) -> usize {
        self.fallback.dimensions()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
