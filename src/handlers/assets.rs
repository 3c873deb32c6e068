// src/handlers/assets.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        db_utils::get_rls_connection,
        error::{ApiError, AppError},
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        assets::{Asset, AssetInput, AssetOverview},
        dashboard::BalanceSheet,
    },
};

const NOT_FOUND: &str = "Aset";

// GET /api/assets
#[utoipa::path(
    get,
    path = "/api/assets",
    tag = "Assets",
    responses((status = 200, description = "Semua aset dan kewajiban beserta totalnya", body = AssetOverview)),
    security(("api_jwt" = []))
)]
pub async fn list_assets(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let items = app_state
        .asset_repo
        .list_all(&mut *rls_conn, user.0.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let balance = BalanceSheet::from_assets(&items);
    Ok((StatusCode::OK, Json(AssetOverview { items, balance })))
}

// GET /api/assets/{id}
#[utoipa::path(
    get,
    path = "/api/assets/{id}",
    tag = "Assets",
    params(("id" = Uuid, Path, description = "ID aset")),
    responses(
        (status = 200, description = "Data aset", body = Asset),
        (status = 404, description = "Aset tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_asset(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let asset = app_state
        .asset_repo
        .find_by_id(&mut *rls_conn, user.0.id, id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound(NOT_FOUND)))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(asset)))
}

// POST /api/assets
#[utoipa::path(
    post,
    path = "/api/assets",
    tag = "Assets",
    request_body = AssetInput,
    responses(
        (status = 201, description = "Aset tersimpan", body = Asset),
        (status = 400, description = "Data tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_asset(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<AssetInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let asset = app_state
        .asset_repo
        .create(&mut *rls_conn, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(asset)))
}

// PUT /api/assets/{id}
#[utoipa::path(
    put,
    path = "/api/assets/{id}",
    tag = "Assets",
    params(("id" = Uuid, Path, description = "ID aset")),
    request_body = AssetInput,
    responses(
        (status = 200, description = "Data aset", body = Asset),
        (status = 400, description = "Data tidak valid"),
        (status = 404, description = "Aset tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_asset(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssetInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let asset = app_state
        .asset_repo
        .update(&mut *rls_conn, user.0.id, id, &payload)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound(NOT_FOUND)))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(asset)))
}

// DELETE /api/assets/{id}
#[utoipa::path(
    delete,
    path = "/api/assets/{id}",
    tag = "Assets",
    params(("id" = Uuid, Path, description = "ID aset")),
    responses(
        (status = 204, description = "Aset dihapus"),
        (status = 404, description = "Aset tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_asset(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let deleted = app_state
        .asset_repo
        .delete(&mut *rls_conn, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    if !deleted {
        return Err(AppError::NotFound(NOT_FOUND).to_api_error(&locale));
    }
    Ok(StatusCode::NO_CONTENT)
}
