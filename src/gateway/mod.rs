//! HTTP gateway (Axum) for guess scoring.
//!
//! This module is primarily used by the `guessr` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::time::Duration;
use tokio::time::timeout;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use error::GatewayError;
pub use handler::similarity_handler;
pub use state::HandlerState;

use crate::constants::{
    GUESSR_STATUS_HEADER, GUESSR_STATUS_HEALTHY, GUESSR_STATUS_READY, GUESSR_STATUS_UNAVAILABLE,
};
use crate::embedding::EmbeddingProvider;
use crate::store::PromptStore;

pub fn create_router_with_state<E, S>(state: HandlerState<E, S>) -> Router
where
    E: EmbeddingProvider + 'static,
    S: PromptStore + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/getSim", post(similarity_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// Queries `/healthz` on a local server and returns a process exit code:
/// `0` when it answers with a success status, `1` otherwise.
pub async fn check_health(port: u16) -> i32 {
    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(client) = reqwest::Client::builder()
        .timeout(HEALTH_CHECK_TIMEOUT)
        .build()
    else {
        return 1;
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub store: &'static str,
    pub embedder: &'static str,
    pub store_backend: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        GUESSR_STATUS_HEADER,
        HeaderValue::from_static(GUESSR_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<E, S>(State(state): State<HandlerState<E, S>>) -> Response
where
    E: EmbeddingProvider + 'static,
    S: PromptStore + 'static,
{
    let store = state.scorer.store();
    let embedder = state.scorer.embedder();
    let probe_timeout = state.scorer.config().request_timeout;

    let store_ready = match timeout(probe_timeout, store.is_ready()).await {
        Ok(ready) => ready,
        Err(_) => {
            warn!(backend = store.backend_name(), "Store readiness probe timed out");
            false
        }
    };

    let components = ComponentStatus {
        http: GUESSR_STATUS_READY,
        store: if store_ready {
            GUESSR_STATUS_READY
        } else {
            GUESSR_STATUS_UNAVAILABLE
        },
        embedder: GUESSR_STATUS_READY,
        store_backend: store.backend_name(),
        embedder_mode: embedder.provider_name(),
    };

    let (status_code, status_msg, header) = if store_ready {
        (StatusCode::OK, "ok", GUESSR_STATUS_READY)
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            GUESSR_STATUS_UNAVAILABLE,
            GUESSR_STATUS_UNAVAILABLE,
        )
    };

    let mut headers = HeaderMap::new();
    headers.insert(GUESSR_STATUS_HEADER, HeaderValue::from_static(header));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
