// src/logging_middleware.rs
//! Debug-level logging of JSON request and response bodies.
//!
//! Only `application/json` bodies are buffered, and only when DEBUG is
//! enabled. Uploads stream through untouched. `password` and `token` fields
//! are redacted before anything is logged.

use axum::body::{to_bytes, Body};
use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::Value;
use tracing::{debug, Level};

/// Largest body this middleware is willing to buffer
const MAX_LOGGED_BODY: usize = 1024 * 1024;

const REDACTED_FIELDS: [&str; 3] = ["password", "token", "password_hash"];

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

fn redact(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                if REDACTED_FIELDS.contains(&key.as_str()) {
                    *v = Value::String("[REDACTED]".to_string());
                } else {
                    redact(v);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact),
        _ => {}
    }
}

fn render(bytes: &[u8]) -> Option<String> {
    let mut json: Value = serde_json::from_slice(bytes).ok()?;
    redact(&mut json);
    serde_json::to_string(&json).ok()
}

pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !tracing::enabled!(Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let request = if is_json(request.headers()) {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, MAX_LOGGED_BODY)
            .await
            .map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;
        if let Some(body) = render(&bytes) {
            debug!(method = %parts.method, uri = %parts.uri, request_body = %body, "📥 Request");
        }
        Request::from_parts(parts, Body::from(bytes))
    } else {
        request
    };

    let response = next.run(request).await;
    if !is_json(response.headers()) {
        return Ok(response);
    }

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    if let Some(body) = render(&bytes) {
        debug!(status = %parts.status, response_body = %body, "📤 Response");
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}
