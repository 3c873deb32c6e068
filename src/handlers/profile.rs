// src/handlers/profile.rs

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
};

#[derive(Debug, Serialize, ToSchema)]
pub struct PhotoResponse {
    /// Public URL, or null when no photo is stored.
    pub url: Option<String>,
}

// GET /api/profile/photo
#[utoipa::path(
    get,
    path = "/api/profile/photo",
    tag = "Profile",
    responses((status = 200, description = "URL foto profil", body = PhotoResponse)),
    security(("api_jwt" = []))
)]
pub async fn get_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let url = app_state
        .photo_storage
        .current_url(user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(PhotoResponse { url })))
}

// PUT /api/profile/photo
// Raw image body; type and size are checked before anything is written.
#[utoipa::path(
    put,
    path = "/api/profile/photo",
    tag = "Profile",
    request_body(content = Vec<u8>, content_type = "image/jpeg"),
    responses(
        (status = 200, description = "Foto tersimpan", body = PhotoResponse),
        (status = 413, description = "File melebihi 2 MB"),
        (status = 415, description = "Tipe file tidak didukung")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let url = app_state
        .photo_storage
        .save(user.0.id, content_type, &body)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(PhotoResponse { url: Some(url) })))
}

// DELETE /api/profile/photo
#[utoipa::path(
    delete,
    path = "/api/profile/photo",
    tag = "Profile",
    responses(
        (status = 204, description = "Foto dihapus"),
        (status = 404, description = "Belum ada foto")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let removed = app_state
        .photo_storage
        .remove(user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    if !removed {
        return Err(AppError::NotFound("Foto profil").to_api_error(&locale));
    }
    Ok(StatusCode::NO_CONTENT)
}

// GET /storage/{user_id}/{file}
// Public: the URLs handed out above must load in an <img> tag.
pub async fn serve_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((user_id, file)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let (bytes, content_type) = app_state
        .photo_storage
        .read(&user_id, &file)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound("File")))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        bytes,
    ))
}
