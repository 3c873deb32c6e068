// src/handlers/attendance.rs

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
    models::attendance::{AttendanceInput, AttendanceRecord, AttendanceSummary},
};

// GET /api/attendance?month=YYYY-MM
// Records of the month with per-status counts and total overtime.
#[utoipa::path(
    get,
    path = "/api/attendance",
    tag = "Attendance",
    params(MonthQuery),
    responses(
        (status = 200, description = "Rekap absensi bulanan", body = AttendanceSummary),
        (status = 400, description = "Format bulan tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let summary = app_state
        .attendance_service
        .monthly(&mut *rls_conn, user.0.id, period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    tag = "Attendance",
    request_body = AttendanceInput,
    responses(
        (status = 201, description = "Absensi tercatat", body = AttendanceRecord),
        (status = 400, description = "Data tidak valid atau jam pulang sebelum jam masuk"),
        (status = 409, description = "Tanggal sudah tercatat")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<AttendanceInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .attendance_service
        .record(&mut *rls_conn, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(record)))
}

// PUT /api/attendance/{id}
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    tag = "Attendance",
    params(("id" = Uuid, Path, description = "ID absensi")),
    request_body = AttendanceInput,
    responses(
        (status = 200, description = "Absensi diperbarui", body = AttendanceRecord),
        (status = 404, description = "Absensi tidak ditemukan"),
        (status = 409, description = "Tanggal sudah tercatat")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let record = app_state
        .attendance_service
        .update(&mut *rls_conn, user.0.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(record)))
}

// DELETE /api/attendance/{id}
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    tag = "Attendance",
    params(("id" = Uuid, Path, description = "ID absensi")),
    responses(
        (status = 204, description = "Absensi dihapus"),
        (status = 404, description = "Absensi tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_attendance(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    app_state
        .attendance_service
        .delete(&mut *rls_conn, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}
