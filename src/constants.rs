//! Cross-cutting, shared constants.

/// Output dimension of `text-embedding-ada-002`.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";

/// Firestore collection holding the reference prompts.
pub const DEFAULT_PROMPTS_COLLECTION: &str = "prompts";

/// Upper bound for each external call (store lookup, one embedding request).
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Extra attempts for transient embedding failures.
pub const DEFAULT_PROVIDER_RETRIES: u32 = 2;

/// First retry delay; doubles per attempt.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 250;

/// Response header naming the outcome of a request.
pub const GUESSR_STATUS_HEADER: &str = "x-guessr-status";

pub const GUESSR_STATUS_SCORED: &str = "scored";
pub const GUESSR_STATUS_HEALTHY: &str = "healthy";
pub const GUESSR_STATUS_READY: &str = "ready";
pub const GUESSR_STATUS_UNAVAILABLE: &str = "unavailable";
