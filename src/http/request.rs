//! Request identification and body extraction.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID, propagate it to the response and log span
//! - Extract the update-profile body from JSON or form-encoded requests
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Client-supplied `x-request-id` headers are kept
//! - The body extractor never interprets field contents; that is the sanitizer's job

use axum::{
    body::Body,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue},
    Form, Json, Router,
};
use serde_json::{Map, Value};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::http::response::ApiError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates request IDs as random UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Wrap `router` with request ID generation, propagation and a request span.
pub fn with_request_tracing<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let header = HeaderName::from_static(X_REQUEST_ID);
    router
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::new(header.clone()))
        .layer(SetRequestIdLayer::new(header, MakeRequestUuidV4))
}

/// Untrusted update-profile body, as a JSON value.
///
/// Accepts `application/json` and `application/x-www-form-urlencoded`.
/// Form bodies become an object of string values.
#[derive(Debug)]
pub struct ProfileInput(pub Value);

impl<S> FromRequest<S> for ProfileInput
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let essence = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .unwrap_or_default();

        if essence == "application/json" || essence.ends_with("+json") {
            let Json(value) = Json::<Value>::from_request(req, state).await?;
            Ok(Self(value))
        } else if essence == "application/x-www-form-urlencoded" {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            let map: Map<String, Value> = pairs
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            Ok(Self(Value::Object(map)))
        } else {
            Err(ApiError::UnsupportedMediaType)
        }
    }
}
