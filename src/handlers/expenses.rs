// src/handlers/expenses.rs

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
    models::expenses::{Expense, ExpenseInput},
};

const NOT_FOUND: &str = "Pengeluaran";

// GET /api/expenses?month=YYYY-MM
#[utoipa::path(
    get,
    path = "/api/expenses",
    tag = "Expenses",
    params(MonthQuery),
    responses(
        (status = 200, description = "Pengeluaran pada bulan terpilih", body = Vec<Expense>),
        (status = 400, description = "Format bulan tidak valid")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve().map_err(|e| e.to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let expenses = app_state
        .expense_repo
        .list_by_range(&mut *rls_conn, user.0.id, period.start, period.end)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(expenses)))
}

// GET /api/expenses/{id}
#[utoipa::path(
    get,
    path = "/api/expenses/{id}",
    tag = "Expenses",
    params(("id" = Uuid, Path, description = "ID pengeluaran")),
    responses((status = 200, description = "Data pengeluaran", body = Expense), (status = 404, description = "Tidak ditemukan")),
    security(("api_jwt" = []))
)]
pub async fn get_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let expense = app_state
        .expense_repo
        .find_by_id(&mut *rls_conn, user.0.id, id)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound(NOT_FOUND)))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(expense)))
}

// POST /api/expenses
#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Expenses",
    request_body = ExpenseInput,
    responses((status = 201, description = "Pengeluaran tersimpan", body = Expense), (status = 400, description = "Data tidak valid")),
    security(("api_jwt" = []))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Json(payload): Json<ExpenseInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let expense = app_state
        .expense_repo
        .create(&mut *rls_conn, user.0.id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(expense)))
}

// PUT /api/expenses/{id}
#[utoipa::path(
    put,
    path = "/api/expenses/{id}",
    tag = "Expenses",
    params(("id" = Uuid, Path, description = "ID pengeluaran")),
    request_body = ExpenseInput,
    responses((status = 200, description = "Data pengeluaran", body = Expense), (status = 400, description = "Data tidak valid"), (status = 404, description = "Tidak ditemukan")),
    security(("api_jwt" = []))
)]
pub async fn update_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseInput>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let expense = app_state
        .expense_repo
        .update(&mut *rls_conn, user.0.id, id, &payload)
        .await
        .and_then(|found| found.ok_or(AppError::NotFound(NOT_FOUND)))
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(expense)))
}

// DELETE /api/expenses/{id}
#[utoipa::path(
    delete,
    path = "/api/expenses/{id}",
    tag = "Expenses",
    params(("id" = Uuid, Path, description = "ID pengeluaran")),
    responses((status = 204, description = "Dihapus"), (status = 404, description = "Tidak ditemukan")),
    security(("api_jwt" = []))
)]
pub async fn delete_expense(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let deleted = app_state
        .expense_repo
        .delete(&mut *rls_conn, user.0.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    if !deleted {
        return Err(AppError::NotFound(NOT_FOUND).to_api_error(&locale));
    }
    Ok(StatusCode::NO_CONTENT)
}
