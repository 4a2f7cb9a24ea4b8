use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument};

use crate::constants::{GUESSR_STATUS_HEADER, GUESSR_STATUS_SCORED};
use crate::embedding::EmbeddingProvider;
use crate::store::PromptStore;

use super::error::GatewayError;
use super::payload::{SimQuery, parse_guess};
use super::state::HandlerState;

/// `POST /api/getSim?pid=<id>` with `{ "guess": "<text>" }`.
///
/// A missing id is reported before anything about the body, so the body is
/// only parsed once an id is present.
#[instrument(skip(state, query, body), fields(pid = tracing::field::Empty))]
pub async fn similarity_handler<E, S>(
    State(state): State<HandlerState<E, S>>,
    query: Result<Query<SimQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Response, GatewayError>
where
    E: EmbeddingProvider + 'static,
    S: PromptStore + 'static,
{
    let Query(query) = query
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid query string: {e}")))?;
    let pid = query.pid.filter(|p| !p.is_empty());

    let guess = match pid.as_deref() {
        Some(pid) => {
            tracing::Span::current().record("pid", pid);
            parse_guess(&body)?
        }
        None => None,
    };

    debug!(body_len = body.len(), "Scoring guess");

    let outcome = state
        .scorer
        .score(pid.as_deref(), guess.as_deref())
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        GUESSR_STATUS_HEADER,
        HeaderValue::from_static(GUESSR_STATUS_SCORED),
    );

    Ok((StatusCode::OK, headers, Json(outcome)).into_response())
}
