//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Read a JSON request body of at most `limit` bytes.
///
/// An empty body is a validation failure; a body that does not parse is a
/// bad request.
pub async fn read_json<T: DeserializeOwned>(req: Request, limit: usize) -> ApiResult<T> {
    let bytes = read_body(req, limit).await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

/// Read a JSON request body, keeping its original text next to the parsed
/// value.
pub async fn read_json_document(req: Request, limit: usize) -> ApiResult<(String, Value)> {
    let bytes = read_body(req, limit).await?;
    let text = String::from_utf8(bytes.to_vec())
        .map_err(|_| ApiError::BadRequest("request body is not valid UTF-8".to_string()))?;
    let value =
        serde_json::from_str(&text).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))?;

    Ok((text, value))
}

/// Respond with an already-encoded JSON document.
pub fn raw_json(status: StatusCode, body: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

async fn read_body(req: Request, limit: usize) -> ApiResult<Bytes> {
    let bytes = axum::body::to_bytes(req.into_body(), limit)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::Unprocessable("request body is required".to_string()));
    }

    Ok(bytes)
}
