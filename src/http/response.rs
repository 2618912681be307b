//! Error responses.
//!
//! # Design Decisions
//! - Every error body is JSON: `{"success": false, "message": "..."}`
//! - Messages are fixed strings; request data and internal causes are never
//!   reflected to the client, only logged

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::profile::StoreError;

/// Errors a handler can return.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Unsupported content type")]
    UnsupportedMediaType,

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Request timed out")]
    Timeout,

    #[error("Not found")]
    NotFound,

    #[error("Asset read failed: {0}")]
    Asset(#[source] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Asset(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::Store(_) | Self::Asset(_) => "Internal server error",
            Self::MalformedBody(_) => "Malformed request body",
            Self::UnsupportedMediaType => {
                "Expected application/json or application/x-www-form-urlencoded"
            }
            Self::PayloadTooLarge => "Request body too large",
            Self::Timeout => "Request timed out",
            Self::NotFound => "Not found",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge,
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::UnsupportedMediaType,
            _ => Self::MalformedBody(rejection.body_text()),
        }
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge,
            StatusCode::UNSUPPORTED_MEDIA_TYPE => Self::UnsupportedMediaType,
            _ => Self::MalformedBody(rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (
            status,
            Json(json!({
                "success": false,
                "message": self.public_message(),
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_errors_hide_their_cause() {
        let err = ApiError::Store(StoreError::InvalidUrl("secret://host".into()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"success": false, "message": "Internal server error"}));
    }

    #[test]
    fn statuses_match_error_kinds() {
        assert_eq!(ApiError::MalformedBody(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UnsupportedMediaType.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(ApiError::PayloadTooLarge.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
    }
}
