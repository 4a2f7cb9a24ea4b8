//! Test server harness.

use guessr::embedding::{EmbeddingProvider, StubEmbedder};
use guessr::gateway::{HandlerState, create_router_with_state};
use guessr::scoring::{ScorerConfig, SimilarityScorer};
use guessr::store::{InMemoryStore, PromptStore};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
const STUB_EMBEDDING_DIM: usize = 1536;

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    /// Seeded into an in-memory store when no store is supplied.
    pub prompts: Vec<(String, String)>,
    pub scorer: ScorerConfig,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            prompts: vec![("p1".to_string(), "a cat on a mat".to_string())],
            scorer: ScorerConfig::default().with_retry_backoff(Duration::from_millis(10)),
        }
    }
}

impl TestServerConfig {
    pub fn with_scorer(mut self, scorer: ScorerConfig) -> Self {
        self.scorer = scorer;
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns a server with the offline stub embedder and an in-memory store
/// seeded from `config.prompts`.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let embedder = StubEmbedder::new(STUB_EMBEDDING_DIM)
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    spawn_server_with_embedder(config, embedder).await
}

/// Same as [`spawn_test_server`] with a caller-supplied embedder.
pub async fn spawn_server_with_embedder<E>(
    config: TestServerConfig,
    embedder: E,
) -> Result<TestServer, ServerStartupError>
where
    E: EmbeddingProvider + 'static,
{
    let store = InMemoryStore::with_prompts(config.prompts.clone());
    spawn_server(config, embedder, store).await
}

/// Spawns a server on an ephemeral port around any embedder/store pair.
pub async fn spawn_server<E, S>(
    config: TestServerConfig,
    embedder: E,
    store: S,
) -> Result<TestServer, ServerStartupError>
where
    E: EmbeddingProvider + 'static,
    S: PromptStore + 'static,
{
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let scorer = SimilarityScorer::new(embedder, store, config.scorer);
    let app = create_router_with_state(HandlerState::new(scorer));

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
