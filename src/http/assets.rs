//! Static asset handlers.
//!
//! Files are read from disk on every request, so edits show up without a
//! restart.

use std::path::Path;

use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::IntoResponse,
};

use crate::http::response::ApiError;
use crate::http::server::AppState;

/// `GET /`: the landing page.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = read_asset(Path::new(&state.assets.index_path)).await?;
    Ok(([(CONTENT_TYPE, "text/html; charset=utf-8")], body))
}

/// `GET /profile-picture`: the profile image.
pub async fn profile_picture(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = read_asset(Path::new(&state.assets.picture_path)).await?;
    Ok(([(CONTENT_TYPE, "image/jpg")], body))
}

async fn read_asset(path: &Path) -> Result<Vec<u8>, ApiError> {
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), "Asset missing");
            ApiError::NotFound
        } else {
            ApiError::Asset(e)
        }
    })
}
