use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::info;

use super::error::StoreError;
use super::model::PromptRecord;
use super::PromptStore;

/// Seed entries may be a bare string or a `{ "prompt": ... }` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedEntry {
    Text(String),
    Record(PromptRecord),
}

impl From<SeedEntry> for PromptRecord {
    fn from(entry: SeedEntry) -> Self {
        match entry {
            SeedEntry::Text(prompt) => PromptRecord::new(prompt),
            SeedEntry::Record(record) => record,
        }
    }
}

/// Process-local prompt store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<HashMap<String, PromptRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompts<I, K, V>(prompts: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let records = prompts
            .into_iter()
            .map(|(id, prompt)| (id.into(), PromptRecord::new(prompt)))
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Loads `{ "<id>": "<prompt>" | { "prompt": "<prompt>" } }` from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: HashMap<String, SeedEntry> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let records: HashMap<String, PromptRecord> = entries
            .into_iter()
            .map(|(id, entry)| (id, entry.into()))
            .collect();

        info!(path = %path.display(), prompts = records.len(), "Loaded prompt file");

        Ok(Self {
            records: Arc::new(RwLock::new(records)),
        })
    }

    /// Inserts or replaces a prompt.
    pub fn insert(&self, id: impl Into<String>, prompt: impl Into<String>) {
        self.records
            .write()
            .insert(id.into(), PromptRecord::new(prompt));
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl PromptStore for InMemoryStore {
    async fn get(&self, id: &str) -> Result<Option<PromptRecord>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn is_ready(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
