//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{StatusCode, request, response},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error_response;

/// Bodies longer than this many characters are truncated in `info` logs.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body, in bytes, the middleware will buffer.
///
/// Matches axum's default body limit for extractors.
pub const REQUEST_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level along with
/// their headers. If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters,
/// it is truncated and the full body is logged at the `debug` level.
///
/// Bodies are passed on byte for byte; only the logged copy is decoded.
/// Requests with a body over [REQUEST_BODY_LIMIT] bytes are rejected with 413.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, REQUEST_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "the request body is too large or could not be read",
            );
        }
    };
    log_request(&parts, &body_bytes);

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &body_bytes);

    Response::from_parts(parts, Body::from(body_bytes))
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if it is
/// short enough to log in full.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn describe_request(parts: &request::Parts) -> String {
    format!("{} {}\nheaders: {:?}", parts.method, parts.uri, parts.headers)
}

fn describe_response(parts: &response::Parts) -> String {
    format!("{}\nheaders: {:?}", parts.status, parts.headers)
}

fn log_request(parts: &request::Parts, body: &Bytes) {
    let description = describe_request(parts);
    let body = String::from_utf8_lossy(body);

    match truncate(&body) {
        Some(truncated) => {
            tracing::info!("Received request: {description}\nbody: {truncated}...");
            tracing::debug!("Full request body: {body:?}");
        }
        None => tracing::info!("Received request: {description}\nbody: {body:?}"),
    }
}

fn log_response(parts: &response::Parts, body: &Bytes) {
    let description = describe_response(parts);
    let body = String::from_utf8_lossy(body);

    match truncate(&body) {
        Some(truncated) => {
            tracing::info!("Sending response: {description}\nbody: {truncated}...");
            tracing::debug!("Full response body: {body:?}");
        }
        None => tracing::info!("Sending response: {description}\nbody: {body:?}"),
    }
}
