// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{
        db_utils::get_rls_connection,
        error::ApiError,
        period::MonthQuery,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    services::{
        insight_service::generate_commentary,
        report_service::{monthly_report_filename, ReportContent},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// `YYYY-MM`; the current month when omitted.
    pub month: Option<String>,
    /// Adds the AI commentary section when the function is configured.
    #[serde(default)]
    pub with_commentary: bool,
}

// GET /api/reports/monthly?month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/reports/monthly",
    tag = "Reports",
    params(ReportQuery),
    responses(
        (status = 200, description = "Laporan keuangan bulanan (PDF)", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Format bulan tidak valid"),
        (status = 500, description = "Font tidak ditemukan atau PDF gagal dibuat")
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = MonthQuery { month: query.month }
        .resolve()
        .map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let metrics = app_state
        .dashboard_service
        .metrics(&mut *rls_conn, user.0.id, period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    drop(rls_conn);

    // The report never fails because of the AI section; it is just left out.
    let commentary = if query.with_commentary {
        match generate_commentary(app_state.commentary.as_deref(), &metrics).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(user_id = %user.0.id, "report commentary skipped: {}", e);
                None
            }
        }
    } else {
        None
    };

    let content = ReportContent::monthly(&metrics, commentary, Utc::now());
    let pdf = app_state
        .report_service
        .render_pdf(content)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let disposition = format!("attachment; filename=\"{}\"", monthly_report_filename(&metrics.period));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    ))
}
