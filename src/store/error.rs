use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by prompt store lookups and seeding.
pub enum StoreError {
    /// Transport-level failure talking to the store.
    #[error("prompt store request failed: {reason}")]
    RequestFailed { reason: String },

    /// The store answered with a status other than success or not-found.
    #[error("prompt store returned {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// The document exists but has no usable `prompt` field.
    #[error("prompt document '{id}' is invalid: {reason}")]
    InvalidDocument { id: String, reason: String },

    /// Store settings cannot be used.
    #[error("invalid prompt store configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Seed file could not be read.
    #[error("failed to read prompt file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not valid JSON of the expected shape.
    #[error("failed to parse prompt file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
