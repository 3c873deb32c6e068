// src/handlers/losses.rs

use axum::{
    extract::{Path, Query, State},
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
        period::MonthQuery,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::losses::{Loss, LossInput},
};

const NOT_FOUND: &str = "Kerugian";

// GET /api/losses?month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/losses",
    tag = "Losses",
    params(MonthQuery),
    responses(
        (status = 200, description = "Kerugian pada bulan terpilih", body = Vec<Loss>),
        (status = 400, description = "Format bulan tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_losses(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let losses = app_state
        .loss_repo
        .list_by_range(&mut *rls_conn, user.0.id, period.start, period.end)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(losses)))
}

// GET /api/losses/{id}
#[utoipa::path(
    get,
    path = "/api/losses/{id}",
    tag = "Losses",
    params(("id" = Uuid, Path, description = "ID kerugian")),
    responses((status = 200, description = "Data kerugian", body = Loss), (status = 404, description = "Tidak ditemukan")),
    security(("api_jwt" = []))
)]
pub async fn get_loss(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let loss = app_state
        .loss_repo
        .find_by_id(&mut *rls_conn, user.0.id, id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound(NOT_FOUND)))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(loss)))
}

// POST /api/losses
#[utoipa::path(
    post,
    path = "/api/losses",
    tag = "Losses",
    request_body = LossInput,
    responses((status = 201, description = "Kerugian tersimpan", body = Loss), (status = 400, description = "Data tidak valid")),
    security(("api_jwt" = []))
)]
pub async fn create_loss(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<LossInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let loss = app_state
        .loss_repo
        .create(&mut *rls_conn, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(loss)))
}

// PUT /api/losses/{id}
#[utoipa::path(
    put,
    path = "/api/losses/{id}",
    tag = "Losses",
    params(("id" = Uuid, Path, description = "ID kerugian")),
    request_body = LossInput,
    responses((status = 200, description = "Data kerugian", body = Loss), (status = 400, description = "Data tidak valid"), (status = 404, description = "Tidak ditemukan")),
    security(("api_jwt" = []))
)]
pub async fn update_loss(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<LossInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let loss = app_state
        .loss_repo
        .update(&mut *rls_conn, user.0.id, id, &payload)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound(NOT_FOUND)))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(loss)))
}

// DELETE /api/losses/{id}
#[utoipa::path(
    delete,
    path = "/api/losses/{id}",
    tag = "Losses",
    params(("id" = Uuid, Path, description = "ID kerugian")),
    responses((status = 204, description = "Dihapus"), (status = 404, description = "Tidak ditemukan")),
    security(("api_jwt" = []))
)]
pub async fn delete_loss(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let deleted = app_state
        .loss_repo
        .delete(&mut *rls_conn, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    if !deleted {
        return Err(AppError::NotFound(NOT_FOUND).to_api_error(&locale));
    }
    Ok(StatusCode::NO_CONTENT)
}
