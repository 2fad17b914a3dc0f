//! Response envelope validation.
//!
//! Every `/api` response is `{success, message, timestamp, data?}`. Bodies are
//! checked here once so the rest of the client only sees typed payloads or a
//! `ClientError`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

fn parse(endpoint: &str, status: u16, body: &[u8]) -> Result<Envelope, ClientError> {
    serde_json::from_slice(body).map_err(|e| {
        ClientError::malformed(endpoint, format!("invalid envelope (HTTP {status}): {e}"))
    })
}

fn fallback_message(status: u16, message: String) -> String {
    if message.trim().is_empty() {
        format!("Request failed with status {status}")
    } else {
        message
    }
}

fn into_success(endpoint: &str, status: u16, envelope: Envelope) -> Result<Envelope, ClientError> {
    if envelope.success {
        return Ok(envelope);
    }
    let message = fallback_message(status, envelope.message);
    tracing::debug!(endpoint, status, %message, "Backend rejected request");
    if status == 404 {
        Err(ClientError::not_found(message))
    } else {
        Err(ClientError::rejected(status, message))
    }
}

/// Decode an envelope whose `data` must match `T`.
pub(crate) fn decode_data<T: DeserializeOwned>(
    endpoint: &str,
    status: u16,
    body: &[u8],
) -> Result<T, ClientError> {
    let envelope = into_success(endpoint, status, parse(endpoint, status, body)?)?;
    let data = envelope
        .data
        .ok_or_else(|| ClientError::malformed(endpoint, "missing `data`"))?;
    serde_json::from_value(data).map_err(|e| ClientError::malformed(endpoint, e.to_string()))
}

/// Decode an envelope that carries only a message.
pub(crate) fn decode_message(endpoint: &str, status: u16, body: &[u8]) -> Result<String, ClientError> {
    let envelope = into_success(endpoint, status, parse(endpoint, status, body)?)?;
    Ok(envelope.message)
}

/// FastAPI auth errors use `{detail}`; Flask-style ones use `{message}`.
#[derive(Debug, Deserialize)]
struct AuthFailure {
    message: Option<String>,
    detail: Option<serde_json::Value>,
}

/// Decode an `/auth/*` response, which is not enveloped.
pub(crate) fn decode_auth<T: DeserializeOwned>(
    endpoint: &str,
    status: u16,
    body: &[u8],
) -> Result<T, ClientError> {
    if (200..300).contains(&status) {
        return serde_json::from_slice(body)
            .map_err(|e| ClientError::malformed(endpoint, e.to_string()));
    }

    let failure: AuthFailure = serde_json::from_slice(body).map_err(|e| {
        ClientError::malformed(endpoint, format!("invalid error body (HTTP {status}): {e}"))
    })?;
    let message = failure
        .message
        .or_else(|| failure.detail.map(|detail| detail_text(&detail)))
        .unwrap_or_default();
    Err(ClientError::rejected(status, fallback_message(status, message)))
}

/// `detail` is a string, or a list of `{msg}` validation errors.
fn detail_text(detail: &serde_json::Value) -> String {
    match detail {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}
