use serde::Deserialize;

use super::error::GatewayError;

/// Query string of `POST /api/getSim`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimQuery {
    pub pid: Option<String>,
}

/// JSON body of `POST /api/getSim`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuessPayload {
    #[serde(default)]
    pub guess: Option<String>,
}

/// Extracts the guess from a raw request body.
///
/// A blank body carries no guess. Anything else must be a JSON object whose
/// `guess` field, when present, is a string or `null`.
pub(crate) fn parse_guess(body: &[u8]) -> Result<Option<String>, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    let payload: GuessPayload = serde_json::from_slice(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request body: {e}")))?;
    Ok(payload.guess)
}
