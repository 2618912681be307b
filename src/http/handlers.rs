//! Profile request handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::http::request::ProfileInput;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::profile::{sanitize, UpdateAck};

/// `POST /update-profile`: sanitize the body and upsert it.
///
/// The response is the fixed acknowledgement, never the request data.
pub async fn update_profile(
    State(state): State<AppState>,
    ProfileInput(body): ProfileInput,
) -> Result<Json<UpdateAck>, ApiError> {
    let fields = sanitize(&body);
    tracing::debug!(
        name = fields.name.is_some(),
        email = fields.email.is_some(),
        interests = fields.interests.is_some(),
        "Updating profile"
    );

    state.store.upsert_profile(fields).await?;
    Ok(Json(UpdateAck::updated()))
}

/// `GET /get-profile`: the stored profile, or `{}` when none exists.
pub async fn get_profile(State(state): State<AppState>) -> Result<Response, ApiError> {
    let response = match state.store.get_profile().await? {
        Some(profile) => Json(profile).into_response(),
        None => Json(json!({})).into_response(),
    };
    Ok(response)
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
