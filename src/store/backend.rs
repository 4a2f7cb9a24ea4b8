use super::PromptStore;
use super::error::StoreError;
use super::firestore::FirestoreStore;
use super::memory::InMemoryStore;
use super::model::PromptRecord;

#[derive(Debug, Clone)]
/// Prompt store selected at startup (Firestore or in-memory).
pub enum PromptBackend {
    /// Firestore REST backend.
    Firestore(FirestoreStore),
    /// Process-local map.
    Memory(InMemoryStore),
}

impl PromptStore for PromptBackend {
    async fn get(&self, id: &str) -> Result<Option<PromptRecord>, StoreError> {
        match self {
            PromptBackend::Firestore(s) => s.get(id).await,
            PromptBackend::Memory(s) => s.get(id).await,
        }
    }

    async fn is_ready(&self) -> bool {
        match self {
            PromptBackend::Firestore(s) => s.is_ready().await,
            PromptBackend::Memory(s) => s.is_ready().await,
        }
    }

    fn backend_name(&self) -> &'static str {
        match self {
            PromptBackend::Firestore(s) => s.backend_name(),
            PromptBackend::Memory(s) => s.backend_name(),
        }
    }
}
