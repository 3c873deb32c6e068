// src/handlers/insights.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::{
        db_utils::get_rls_connection,
        error::{ApiError, AppError},
        period::MonthQuery,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    services::insight_service::{generate_commentary, CommentaryResponse},
};

// POST /api/insights?month=YYYY-MM
#[utoipa::path(
    post,
    path = "/api/insights",
    tag = "Insights",
    params(MonthQuery),
    responses(
        (status = 200, description = "Komentar AI atas ringkasan bulan terpilih", body = CommentaryResponse),
        (status = 502, description = "Layanan AI gagal merespons"),
        (status = 503, description = "Layanan AI belum dikonfigurasi")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_insight(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    // Checked before the database is touched.
    let provider = app_state
        .commentary
        .as_deref()
        .ok_or(AppError::AiNotConfigured)
        .map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let metrics = app_state
        .dashboard_service
        .metrics(&mut *rls_conn, user.0.id, period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    // Back to the pool before the slow AI call.
    drop(rls_conn);

    let commentary = generate_commentary(Some(provider), &metrics)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(CommentaryResponse { commentary })))
}
