//! Firestore REST document lookup.
//!
//! Documents live at
//! `{base_url}/v1/projects/{project}/databases/(default)/documents/{collection}/{id}`
//! and are expected to carry a string field named `prompt`.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, error};

use crate::constants::{
    DEFAULT_FIRESTORE_BASE_URL, DEFAULT_PROMPTS_COLLECTION, DEFAULT_REQUEST_TIMEOUT_MS,
};

use super::PromptStore;
use super::error::StoreError;
use super::model::PromptRecord;

const PROMPT_FIELD: &str = "prompt";

#[derive(Clone)]
pub struct FirestoreConfig {
    pub base_url: String,
    pub project_id: String,
    /// Web API key, sent as the `key` query parameter.
    pub api_key: Option<String>,
    pub collection: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for FirestoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreConfig")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("collection", &self.collection)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
            project_id: project_id.into(),
            api_key: None,
            collection: DEFAULT_PROMPTS_COLLECTION.to_string(),
            timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct FirestoreDocument {
    #[serde(default)]
    fields: HashMap<String, FirestoreValue>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirestoreValue {
    string_value: Option<String>,
}

#[derive(Deserialize)]
struct FirestoreErrorBody {
    error: FirestoreErrorDetail,
}

#[derive(Deserialize)]
struct FirestoreErrorDetail {
    message: String,
}

#[derive(Clone)]
pub struct FirestoreStore {
    client: Client,
    config: FirestoreConfig,
    documents_url: Url,
}

impl std::fmt::Debug for FirestoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirestoreStore")
            .field("config", &self.config)
            .finish()
    }
}

impl FirestoreStore {
    pub fn new(client: Client, config: FirestoreConfig) -> Result<Self, StoreError> {
        if config.project_id.trim().is_empty() {
            return Err(StoreError::InvalidConfig {
                reason: "project_id cannot be empty".to_string(),
            });
        }
        if config.collection.trim().is_empty() {
            return Err(StoreError::InvalidConfig {
                reason: "collection cannot be empty".to_string(),
            });
        }

        let mut documents_url =
            Url::parse(&config.base_url).map_err(|e| StoreError::InvalidConfig {
                reason: format!("invalid base_url '{}': {}", config.base_url, e),
            })?;
        documents_url
            .path_segments_mut()
            .map_err(|_| StoreError::InvalidConfig {
                reason: format!("base_url '{}' cannot carry a path", config.base_url),
            })?
            .pop_if_empty()
            .extend([
                "v1",
                "projects",
                config.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                config.collection.as_str(),
            ]);

        Ok(Self {
            client,
            config,
            documents_url,
        })
    }

    pub fn config(&self) -> &FirestoreConfig {
        &self.config
    }

    /// URL of the collection; `id` (if any) is escaped as a single path segment.
    pub fn document_url(&self, id: Option<&str>) -> Url {
        let mut url = self.documents_url.clone();
        if let Some(id) = id
            && let Ok(mut segments) = url.path_segments_mut()
        {
            segments.push(id);
        }
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        let raw = response.text().await.unwrap_or_default();
        serde_json::from_str::<FirestoreErrorBody>(&raw)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    trimmed.to_string()
                }
            })
    }
}

impl PromptStore for FirestoreStore {
    async fn get(&self, id: &str) -> Result<Option<PromptRecord>, StoreError> {
        // URL path building drops dot segments, which would address the collection.
        if matches!(id, "." | "..") {
            debug!(id, "Dot-segment prompt id cannot name a document");
            return Ok(None);
        }

        let response = self
            .client
            .get(self.document_url(Some(id)))
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(id, "Prompt document not found");
            return Ok(None);
        }
        if !status.is_success() {
            let message = Self::error_message(response).await;
            error!(id, status = status.as_u16(), %message, "Firestore lookup failed");
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        let mut document: FirestoreDocument =
            response
                .json()
                .await
                .map_err(|e| StoreError::InvalidDocument {
                    id: id.to_string(),
                    reason: e.to_string(),
                })?;

        let prompt = document
            .fields
            .remove(PROMPT_FIELD)
            .ok_or_else(|| StoreError::InvalidDocument {
                id: id.to_string(),
                reason: format!("missing `{PROMPT_FIELD}` field"),
            })?
            .string_value
            .ok_or_else(|| StoreError::InvalidDocument {
                id: id.to_string(),
                reason: format!("`{PROMPT_FIELD}` is not a string"),
            })?;

        Ok(Some(PromptRecord { prompt }))
    }

    async fn is_ready(&self) -> bool {
        let mut url = self.document_url(None);
        url.query_pairs_mut().append_pair("pageSize", "1");

        match self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Firestore readiness probe failed");
                false
            }
        }
    }

    fn backend_name(&self) -> &'static str {
        "firestore"
    }
}
