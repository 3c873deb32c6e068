// src/handlers/sales.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
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
    models::{
        import::{ImportOutcome, ImportPreview},
        sales::{Sale, SaleInput},
    },
    services::csv_export,
};

// GET /api/sales?month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    params(MonthQuery),
    responses(
        (status = 200, description = "Penjualan pada bulan terpilih", body = Vec<Sale>),
        (status = 400, description = "Format bulan tidak valid"),
        (status = 401, description = "Tidak terautentikasi")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let sales = app_state
        .sales_service
        .list(&mut *rls_conn, user.0.id, &period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(sales)))
}

// GET /api/sales/{id}
#[utoipa::path(
    get,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID penjualan")),
    responses(
        (status = 200, description = "Data penjualan", body = Sale),
        (status = 404, description = "Penjualan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let sale = app_state
        .sales_service
        .get(&mut *rls_conn, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(sale)))
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = SaleInput,
    responses(
        (status = 201, description = "Penjualan tersimpan", body = Sale),
        (status = 400, description = "Data tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<SaleInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let sale = app_state
        .sales_service
        .create(&mut *rls_conn, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(sale)))
}

// PUT /api/sales/{id}
#[utoipa::path(
    put,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID penjualan")),
    request_body = SaleInput,
    responses(
        (status = 200, description = "Data penjualan", body = Sale),
        (status = 400, description = "Data tidak valid"),
        (status = 404, description = "Penjualan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaleInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let sale = app_state
        .sales_service
        .update(&mut *rls_conn, user.0.id, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(sale)))
}

// DELETE /api/sales/{id}
#[utoipa::path(
    delete,
    path = "/api/sales/{id}",
    tag = "Sales",
    params(("id" = Uuid, Path, description = "ID penjualan")),
    responses(
        (status = 204, description = "Penjualan dihapus"),
        (status = 404, description = "Penjualan tidak ditemukan")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    app_state
        .sales_service
        .delete(&mut *rls_conn, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---
// CSV import / export
// ---

// POST /api/sales/import/preview
// Validation only; nothing is written.
#[utoipa::path(
    post,
    path = "/api/sales/import/preview",
    tag = "Sales",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Hasil validasi per baris", body = ImportPreview),
        (status = 400, description = "File CSV kosong, rusak, atau kolom wajib hilang")
    ),
    security(("api_jwt" = []))
)]
pub async fn preview_import(
    State(app_state): State<AppState>,
    locale: Locale,
    _user: AuthenticatedUser,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let preview = app_state
        .sales_service
        .preview_csv(&body)
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(preview)))
}

// POST /api/sales/import
#[utoipa::path(
    post,
    path = "/api/sales/import",
    tag = "Sales",
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Baris valid tersimpan, baris invalid dilewati", body = ImportOutcome),
        (status = 400, description = "File CSV kosong, rusak, atau kolom wajib hilang")
    ),
    security(("api_jwt" = []))
)]
pub async fn import_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let outcome = app_state
        .sales_service
        .import_csv(&mut *rls_conn, user.0.id, &body)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(outcome)))
}

// GET /api/sales/export?month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/sales/export",
    tag = "Sales",
    params(MonthQuery),
    responses(
        (status = 200, description = "File CSV penjualan", content_type = "text/csv", body = String)
    ),
    security(("api_jwt" = []))
)]
pub async fn export_sales(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let sales = app_state
        .sales_service
        .list(&mut *rls_conn, user.0.id, &period)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let bytes = csv_export::write_sales_csv(&sales).map_err(|e| e.to_api_error(&locale))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        csv_export::sales_export_filename(&period)
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}
