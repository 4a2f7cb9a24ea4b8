//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `GUESSR_*` environment variables;
//! the two credentials use their conventional names (`OPENAI_API_KEY`,
//! `FIREBASE_API_KEY`).

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_EMBEDDING_DIM, DEFAULT_EMBEDDING_MODEL, DEFAULT_FIRESTORE_BASE_URL,
    DEFAULT_OPENAI_BASE_URL, DEFAULT_PROMPTS_COLLECTION, DEFAULT_PROVIDER_RETRIES,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_RETRY_BACKOFF_MS,
};
use crate::embedding::EmbedderConfig;
use crate::scoring::ScorerConfig;
use crate::store::FirestoreConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// OpenAI API key. Unset runs the offline stub embedder.
    pub openai_api_key: Option<String>,

    /// Default: `text-embedding-ada-002`.
    pub embedding_model: String,

    pub openai_base_url: String,

    /// Stub output size. Default: `1536`.
    pub embedding_dim: usize,

    /// Google Cloud project. Setting it selects the Firestore prompt store.
    pub firestore_project: Option<String>,

    pub firebase_api_key: Option<String>,

    pub firestore_base_url: String,

    /// Firestore collection holding prompts. Default: `prompts`.
    pub prompts_collection: String,

    /// JSON seed file for the in-memory prompt store.
    pub prompts_path: Option<PathBuf>,

    /// Bound on every external call. Default: `10_000`.
    pub request_timeout_ms: u64,

    /// Retries for transient embedding failures. Default: `2`.
    pub provider_retries: u32,

    /// First retry delay. Default: `250`.
    pub retry_backoff_ms: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |key: &Option<String>| key.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("embedding_model", &self.embedding_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("embedding_dim", &self.embedding_dim)
            .field("firestore_project", &self.firestore_project)
            .field("firebase_api_key", &redact(&self.firebase_api_key))
            .field("firestore_base_url", &self.firestore_base_url)
            .field("prompts_collection", &self.prompts_collection)
            .field("prompts_path", &self.prompts_path)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("provider_retries", &self.provider_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            openai_api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            firestore_project: None,
            firebase_api_key: None,
            firestore_base_url: DEFAULT_FIRESTORE_BASE_URL.to_string(),
            prompts_collection: DEFAULT_PROMPTS_COLLECTION.to_string(),
            prompts_path: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            provider_retries: DEFAULT_PROVIDER_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

/// Where prompts are read from, derived from [`Config`].
#[derive(Debug, Clone)]
pub enum StoreSelection {
    Firestore(FirestoreConfig),
    SeedFile(PathBuf),
    /// Nothing configured; every lookup is a 404.
    Empty,
}

impl Config {
    pub const ENV_PORT: &'static str = "GUESSR_PORT";
    pub const ENV_BIND_ADDR: &'static str = "GUESSR_BIND_ADDR";
    pub const ENV_OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const ENV_EMBEDDING_MODEL: &'static str = "GUESSR_EMBEDDING_MODEL";
    pub const ENV_OPENAI_BASE_URL: &'static str = "GUESSR_OPENAI_BASE_URL";
    pub const ENV_EMBEDDING_DIM: &'static str = "GUESSR_EMBEDDING_DIM";
    pub const ENV_FIRESTORE_PROJECT: &'static str = "GUESSR_FIRESTORE_PROJECT";
    pub const ENV_FIREBASE_API_KEY: &'static str = "FIREBASE_API_KEY";
    pub const ENV_FIRESTORE_BASE_URL: &'static str = "GUESSR_FIRESTORE_BASE_URL";
    pub const ENV_PROMPTS_COLLECTION: &'static str = "GUESSR_PROMPTS_COLLECTION";
    pub const ENV_PROMPTS_PATH: &'static str = "GUESSR_PROMPTS_PATH";
    pub const ENV_REQUEST_TIMEOUT_MS: &'static str = "GUESSR_REQUEST_TIMEOUT_MS";
    pub const ENV_PROVIDER_RETRIES: &'static str = "GUESSR_PROVIDER_RETRIES";
    pub const ENV_RETRY_BACKOFF_MS: &'static str = "GUESSR_RETRY_BACKOFF_MS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
            openai_api_key: Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY),
            embedding_model: Self::parse_string_from_env(
                Self::ENV_EMBEDDING_MODEL,
                defaults.embedding_model,
            ),
            openai_base_url: Self::parse_string_from_env(
                Self::ENV_OPENAI_BASE_URL,
                defaults.openai_base_url,
            ),
            embedding_dim: Self::parse_number_from_env(
                Self::ENV_EMBEDDING_DIM,
                defaults.embedding_dim,
            )?,
            firestore_project: Self::parse_optional_string_from_env(Self::ENV_FIRESTORE_PROJECT),
            firebase_api_key: Self::parse_optional_string_from_env(Self::ENV_FIREBASE_API_KEY),
            firestore_base_url: Self::parse_string_from_env(
                Self::ENV_FIRESTORE_BASE_URL,
                defaults.firestore_base_url,
            ),
            prompts_collection: Self::parse_string_from_env(
                Self::ENV_PROMPTS_COLLECTION,
                defaults.prompts_collection,
            ),
            prompts_path: Self::parse_optional_string_from_env(Self::ENV_PROMPTS_PATH)
                .map(PathBuf::from),
            request_timeout_ms: Self::parse_number_from_env(
                Self::ENV_REQUEST_TIMEOUT_MS,
                defaults.request_timeout_ms,
            )?,
            provider_retries: Self::parse_number_from_env(
                Self::ENV_PROVIDER_RETRIES,
                defaults.provider_retries,
            )?,
            retry_backoff_ms: Self::parse_number_from_env(
                Self::ENV_RETRY_BACKOFF_MS,
                defaults.retry_backoff_ms,
            )?,
        })
    }

    /// Validates ranges, the seed path, and the store selection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding_dim == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_EMBEDDING_DIM,
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_REQUEST_TIMEOUT_MS,
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.prompts_collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_PROMPTS_COLLECTION,
                reason: "must not be empty".to_string(),
            });
        }

        if self.firestore_project.is_some() && self.prompts_path.is_some() {
            return Err(ConfigError::ConflictingStoreSelection {
                firestore_var: Self::ENV_FIRESTORE_PROJECT,
                path_var: Self::ENV_PROMPTS_PATH,
            });
        }

        if let Some(ref path) = self.prompts_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn embedder_config(&self) -> EmbedderConfig {
        EmbedderConfig {
            api_key: self.openai_api_key.clone(),
            model: self.embedding_model.clone(),
            base_url: self.openai_base_url.clone(),
            embedding_dim: self.embedding_dim,
            timeout: self.request_timeout(),
        }
    }

    pub fn scorer_config(&self) -> ScorerConfig {
        ScorerConfig::default()
            .with_request_timeout(self.request_timeout())
            .with_max_retries(self.provider_retries)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms))
    }

    pub fn store_selection(&self) -> StoreSelection {
        if let Some(ref project) = self.firestore_project {
            let config = FirestoreConfig::new(project.clone())
                .with_base_url(self.firestore_base_url.clone())
                .with_api_key(self.firebase_api_key.clone())
                .with_collection(self.prompts_collection.clone())
                .with_timeout(self.request_timeout());
            return StoreSelection::Firestore(config);
        }

        match self.prompts_path {
            Some(ref path) => StoreSelection::SeedFile(path.clone()),
            None => StoreSelection::Empty,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_number_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr<Err = std::num::ParseIntError>,
    {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value.parse().map_err(|source| ConfigError::InvalidNumber {
                name: var_name,
                value,
                source,
            }),
            None => Ok(default),
        }
    }
}
