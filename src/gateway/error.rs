use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error};

use crate::constants::GUESSR_STATUS_HEADER;
use crate::scoring::{ErrorKind, ScoringError};

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed query string or body. The message is returned verbatim.
    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::InvalidRequest(_) => ErrorKind::Validation,
            GatewayError::Scoring(e) => e.kind(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Provider
            | ErrorKind::Timeout
            | ErrorKind::DegenerateVector
            | ErrorKind::InvalidInput => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();

        if status.is_server_error() {
            error!(kind = %kind, error = %self, "Request failed");
        } else {
            debug!(kind = %kind, error = %self, "Request rejected");
        }

        let mut headers = HeaderMap::new();
        headers.insert(GUESSR_STATUS_HEADER, HeaderValue::from_static(kind.as_str()));

        let body = Json(ErrorResponse {
            message: self.to_string(),
        });

        (status, headers, body).into_response()
    }
}
