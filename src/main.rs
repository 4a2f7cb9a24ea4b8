//! Guessr similarity server entrypoint.

use std::net::SocketAddr;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use guessr::config::{Config, StoreSelection};
use guessr::embedding::{EmbedderBackend, EmbeddingProvider};
use guessr::gateway::{HandlerState, check_health, create_router_with_state};
use guessr::scoring::SimilarityScorer;
use guessr::store::{FirestoreStore, InMemoryStore, PromptBackend, PromptStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(check_health(health_check_port()).await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "Guessr starting"
    );

    let http_client = reqwest::Client::builder()
        .timeout(config.request_timeout())
        .build()?;

    let embedder = EmbedderBackend::from_config(http_client.clone(), &config.embedder_config())?;
    let store = build_store(http_client, &config)?;

    tracing::info!(
        embedder = embedder.provider_name(),
        dimensions = embedder.dimensions(),
        store = store.backend_name(),
        "Backends ready"
    );

    let scorer = SimilarityScorer::new(embedder, store, config.scorer_config());
    let app = create_router_with_state(HandlerState::new(scorer));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Guessr shutdown complete");
    Ok(())
}

fn build_store(client: reqwest::Client, config: &Config) -> anyhow::Result<PromptBackend> {
    let store = match config.store_selection() {
        StoreSelection::Firestore(fs_config) => {
            tracing::info!(
                project = %fs_config.project_id,
                collection = %fs_config.collection,
                "Using Firestore prompt store"
            );
            PromptBackend::Firestore(FirestoreStore::new(client, fs_config)?)
        }
        StoreSelection::SeedFile(path) => {
            PromptBackend::Memory(InMemoryStore::from_json_file(&path)?)
        }
        StoreSelection::Empty => {
            tracing::warn!("No prompt store configured, starting with an empty in-memory store");
            PromptBackend::Memory(InMemoryStore::new())
        }
    };
    Ok(store)
}

fn health_check_port() -> u16 {
    std::env::var(Config::ENV_PORT)
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
