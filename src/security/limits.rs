//! Request limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size (413 Payload Too Large)
//! - Bound total request time (408 Request Timeout)
//! - Give both rejections the same JSON body as every other error
//!
//! # Design Decisions
//! - tower-http answers an over-long `Content-Length` and a timeout itself,
//!   before any extractor runs, so those responses are rewritten on the way out

use std::time::Duration;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

use crate::config::{SecurityConfig, TimeoutConfig};
use crate::http::response::ApiError;

/// Wrap `router` with body size and timeout limits.
///
/// A timed-out request drops its handler future; a store call already handed to
/// the blocking pool still finishes.
pub fn with_limits<S>(router: Router<S>, security: &SecurityConfig, timeouts: &TimeoutConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(RequestBodyLimitLayer::new(security.max_body_size))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(timeouts.request_secs),
        ))
        .layer(middleware::from_fn(json_limit_errors))
}

/// Replace the plain-text 413 and empty 408 produced by the limit layers.
async fn json_limit_errors(request: Request<Body>, next: Next) -> Response {
    let response = next.run(request).await;

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }

    match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge.into_response(),
        StatusCode::REQUEST_TIMEOUT => ApiError::Timeout.into_response(),
        _ => response,
    }
}
