// src/handlers/dashboard.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{db_utils::get_rls_connection, error::ApiError, period::MonthQuery},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::dashboard::{DailySummaryEntry, DashboardMetrics},
};

// GET /api/dashboard/summary?month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    params(MonthQuery),
    responses(
        (status = 200, description = "Ringkasan keuangan bulan terpilih dibanding bulan sebelumnya", body = DashboardMetrics),
        (status = 400, description = "Format bulan tidak valid"),
        (status = 401, description = "Tidak terautentikasi")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let metrics = app_state
        .dashboard_service
        .metrics(&mut *rls_conn, user.0.id, period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(metrics)))
}

// GET /api/dashboard/daily?month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/dashboard/daily",
    tag = "Dashboard",
    params(MonthQuery),
    responses(
        (status = 200, description = "Data grafik harian, satu baris per tanggal", body = Vec<DailySummaryEntry>)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_daily(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let rows = app_state
        .dashboard_service
        .daily(&mut *rls_conn, user.0.id, &period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(rows)))
}
