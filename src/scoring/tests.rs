use std::time::Duration;

use tokio::time::Instant;

use super::*;
use crate::embedding::{EmbeddingError, MockEmbedder, StubEmbedder};
use crate::store::{InMemoryStore, PromptRecord, PromptStore, StoreError};

const REFERENCE: &str = "a cat on a mat";
const GUESS: &str = "a dog on a rug";

fn test_store() -> InMemoryStore {
    InMemoryStore::with_prompts([("p1", REFERENCE), ("blank", "")])
}

fn fast_config() -> ScorerConfig {
    ScorerConfig::default()
        .with_request_timeout(Duration::from_millis(500))
        .with_retry_backoff(Duration::from_millis(10))
}

fn scorer_with(mock: MockEmbedder) -> SimilarityScorer<MockEmbedder, InMemoryStore> {
    SimilarityScorer::new(mock, test_store(), fast_config())
}

/// Store that never answers.
struct HangingStore;

impl PromptStore for HangingStore {
    async fn get(&self, _id: &str) -> Result<Option<PromptRecord>, StoreError> {
        std::future::pending().await
    }

    async fn is_ready(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "hanging"
    }
}

/// Store that always errors.
struct BrokenStore;

impl PromptStore for BrokenStore {
    async fn get(&self, _id: &str) -> Result<Option<PromptRecord>, StoreError> {
        Err(StoreError::RequestFailed {
            reason: "connection refused".to_string(),
        })
    }

    async fn is_ready(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "broken"
    }
}

#[tokio::test]
async fn test_scores_related_texts_between_zero_and_one() {
    let scorer = SimilarityScorer::new(
        StubEmbedder::new(1536).unwrap(),
        test_store(),
        ScorerConfig::default(),
    );

    let outcome = scorer.score(Some("p1"), Some(GUESS)).await.unwrap();

    assert_eq!(outcome.id, "p1");
    assert_eq!(outcome.reference_text, REFERENCE);
    assert!(
        outcome.similarity > 0.0 && outcome.similarity < 1.0,
        "similarity was {}",
        outcome.similarity
    );
}

#[tokio::test]
async fn test_exact_guess_scores_one() {
    let scorer = scorer_with(MockEmbedder::new(32));
    let outcome = scorer.score(Some("p1"), Some(REFERENCE)).await.unwrap();
    assert!((outcome.similarity - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_uses_provider_vectors() {
    let mock = MockEmbedder::new(2)
        .with_vector(GUESS, vec![1.0, 0.0])
        .with_vector(REFERENCE, vec![0.0, 1.0]);
    let outcome = scorer_with(mock).score(Some("p1"), Some(GUESS)).await.unwrap();
    assert!(outcome.similarity.abs() < 1e-12);
}

#[tokio::test]
async fn test_missing_id() {
    let mock = MockEmbedder::new(4);
    let scorer = scorer_with(mock.clone());

    for id in [None, Some("")] {
        let err = scorer.score(id, Some(GUESS)).await.unwrap_err();
        assert!(matches!(err, ScoringError::MissingPromptId));
        assert_eq!(err.to_string(), "No prompt id provided");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_missing_id_reported_before_missing_guess() {
    let err = scorer_with(MockEmbedder::new(4))
        .score(None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScoringError::MissingPromptId));
}

#[tokio::test]
async fn test_missing_guess() {
    let scorer = scorer_with(MockEmbedder::new(4));
    for guess in [None, Some("")] {
        let err = scorer.score(Some("p1"), guess).await.unwrap_err();
        assert!(matches!(err, ScoringError::MissingGuess));
        assert_eq!(err.to_string(), "No guess provided");
    }
}

#[tokio::test]
async fn test_unknown_prompt() {
    let mock = MockEmbedder::new(4);
    let err = scorer_with(mock.clone())
        .score(Some("p404"), Some(GUESS))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Prompt p404 not found");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(mock.call_count(), 0, "no embeddings for unknown prompts");
}

#[tokio::test]
async fn test_store_failure_is_provider_error() {
    let scorer = SimilarityScorer::new(MockEmbedder::new(4), BrokenStore, fast_config());
    let err = scorer.score(Some("p1"), Some(GUESS)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test(start_paused = true)]
async fn test_store_lookup_times_out() {
    let scorer = SimilarityScorer::new(MockEmbedder::new(4), HangingStore, fast_config());
    let err = scorer.score(Some("p1"), Some(GUESS)).await.unwrap_err();

    assert!(matches!(
        err,
        ScoringError::Timeout {
            operation: "prompt lookup",
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn test_permanent_provider_error_not_retried() {
    let mock = MockEmbedder::new(4).failing_with(EmbeddingError::Api {
        status: 400,
        message: "invalid input".to_string(),
    });
    let err = scorer_with(mock.clone())
        .score(Some("p1"), Some(GUESS))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(
        err.to_string(),
        "embedding provider error: embedding provider returned 400: invalid input"
    );
    // One attempt each for guess and prompt, at most.
    assert!(mock.call_count() <= 2);
}

#[tokio::test(start_paused = true)]
async fn test_transient_error_retried_then_succeeds() {
    let mock = MockEmbedder::new(8).failing_times(
        1,
        EmbeddingError::RateLimited {
            message: "slow down".to_string(),
        },
    );
    let outcome = scorer_with(mock.clone())
        .score(Some("p1"), Some(GUESS))
        .await
        .unwrap();

    assert!(outcome.similarity.is_finite());
    assert_eq!(mock.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_transient_error_gives_up_after_max_retries() {
    let mock = MockEmbedder::new(8).failing_with(EmbeddingError::Api {
        status: 503,
        message: "overloaded".to_string(),
    });
    let config = fast_config().with_max_retries(2);
    let scorer = SimilarityScorer::new(mock.clone(), test_store(), config);

    let err = scorer.score(Some("p1"), Some(GUESS)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Provider);
    assert!(err.to_string().contains("overloaded"));
    // Both texts fail on every attempt; the first to exhaust its retries cancels the other.
    assert!(mock.call_count() >= 3 && mock.call_count() <= 6);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out() {
    let mock = MockEmbedder::new(8).with_delay(Duration::from_secs(5));
    let config = fast_config().with_max_retries(0);
    let scorer = SimilarityScorer::new(mock, test_store(), config);

    let err = scorer.score(Some("p1"), Some(GUESS)).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(
        err.to_string(),
        "embedding provider error: embedding request timed out after 500ms"
    );
}

#[tokio::test(start_paused = true)]
async fn test_embeddings_requested_concurrently() {
    let mock = MockEmbedder::new(8).with_delay(Duration::from_millis(100));
    let scorer = scorer_with(mock.clone());

    let start = Instant::now();
    scorer.score(Some("p1"), Some(GUESS)).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(mock.call_count(), 2);
    assert!(
        elapsed < Duration::from_millis(200),
        "embeddings ran sequentially: {elapsed:?}"
    );
}

#[tokio::test]
async fn test_zero_vector_is_degenerate() {
    let mock = MockEmbedder::new(2).with_vector(GUESS, vec![0.0, 0.0]);
    let err = scorer_with(mock)
        .score(Some("p1"), Some(GUESS))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DegenerateVector);
    assert!(err.to_string().contains("zero magnitude"));
}

#[tokio::test]
async fn test_empty_reference_text_is_degenerate() {
    let scorer = SimilarityScorer::new(
        StubEmbedder::new(16).unwrap(),
        test_store(),
        ScorerConfig::default(),
    );
    let err = scorer.score(Some("blank"), Some(GUESS)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DegenerateVector);
}

#[tokio::test]
async fn test_dimension_mismatch_is_invalid_input() {
    let mock = MockEmbedder::new(3).with_vector(GUESS, vec![1.0, 2.0]);
    let err = scorer_with(mock)
        .score(Some("p1"), Some(GUESS))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_outcome_serializes_camel_case() {
    let outcome = ScoreOutcome {
        id: "p1".to_string(),
        reference_text: REFERENCE.to_string(),
        similarity: 0.5,
    };
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({"id": "p1", "referenceText": REFERENCE, "similarity": 0.5})
    );
}

#[test]
fn test_error_kind_strings_are_distinct() {
    let kinds = [
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::Provider,
        ErrorKind::Timeout,
        ErrorKind::DegenerateVector,
        ErrorKind::InvalidInput,
    ];
    let mut names: Vec<&str> = kinds.iter().map(ErrorKind::as_str).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), kinds.len());
}

#[test]
fn test_default_config() {
    let config = ScorerConfig::default();
    assert_eq!(config.request_timeout, Duration::from_secs(10));
    assert_eq!(config.max_retries, 2);
    assert_eq!(config.retry_backoff, Duration::from_millis(250));
}
