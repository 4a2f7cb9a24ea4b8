use std::time::Duration;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::similarity::SimilarityError;
use crate::store::StoreError;

use super::types::ErrorKind;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("No prompt id provided")]
    MissingPromptId,

    #[error("No guess provided")]
    MissingGuess,

    #[error("Prompt {id} not found")]
    PromptNotFound { id: String },

    #[error("document store error: {0}")]
    Store(#[from] StoreError),

    #[error("embedding provider error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("similarity failed: {0}")]
    Similarity(#[from] SimilarityError),
}

impl ScoringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::MissingPromptId | ScoringError::MissingGuess => ErrorKind::Validation,
            ScoringError::PromptNotFound { .. } => ErrorKind::NotFound,
            ScoringError::Store(_) => ErrorKind::Provider,
            ScoringError::Embedding(EmbeddingError::Timeout { .. })
            | ScoringError::Timeout { .. } => ErrorKind::Timeout,
            ScoringError::Embedding(_) => ErrorKind::Provider,
            ScoringError::Similarity(SimilarityError::DegenerateVector { .. }) => {
                ErrorKind::DegenerateVector
            }
            ScoringError::Similarity(SimilarityError::InvalidInput { .. }) => {
                ErrorKind::InvalidInput
            }
        }
    }
}
