//! Read-only prompt lookup.
//!
//! The scorer only needs `get(id) -> Option<PromptRecord>`; where the records live
//! is up to the backend.

mod backend;
pub mod error;
pub mod firestore;
pub mod memory;
pub mod model;


pub use backend::PromptBackend;
pub use error::StoreError;
pub use firestore::{FirestoreConfig, FirestoreStore};
pub use memory::InMemoryStore;
pub use model::PromptRecord;

/// Read-only access to reference prompts keyed by an opaque id.
pub trait PromptStore: Send + Sync {
    /// Looks up a prompt. `Ok(None)` means the id does not exist.
    fn get(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<PromptRecord>, StoreError>> + Send;

    /// Returns `true` if the backend can currently serve lookups.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Short backend name for logs and readiness reports.
    fn backend_name(&self) -> &'static str;
}
