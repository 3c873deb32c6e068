// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Internal error taxonomy. Handlers convert it into an `ApiError` in the
// caller's language before it leaves the service.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Attendance already recorded for {0}")]
    AttendanceAlreadyRecorded(NaiveDate),

    #[error("Clock-out is earlier than clock-in")]
    InvalidClockRange,

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("CSV is missing columns: {0:?}")]
    MissingCsvColumns(Vec<String>),

    #[error("Unsupported file type: {0}")]
    UnsupportedMediaType(String),

    #[error("File larger than {limit} bytes")]
    FileTooLarge { limit: usize },

    #[error("AI commentary function is not configured")]
    AiNotConfigured,

    #[error("AI commentary function failed: {0}")]
    AiUpstream(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("PDF rendering failed: {0}")]
    PdfRender(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),
}

// What actually goes over the wire.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

fn pick(locale: &Locale, id: &str, en: &str) -> String {
    if locale.is_english() { en.to_string() } else { id.to_string() }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidMonth(_)
            | AppError::InvalidClockRange
            | AppError::CsvParse(_)
            | AppError::MissingCsvColumns(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AttendanceAlreadyRecorded(_) => StatusCode::CONFLICT,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::AiNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            AppError::AiUpstream(_) => StatusCode::BAD_GATEWAY,
            AppError::FontNotFound(_)
            | AppError::PdfRender(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Translates the error into the caller's language.
    pub fn to_api_error(self, locale: &Locale) -> ApiError {
        let status = self.status();

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (
                    pick(locale, "Satu atau lebih isian tidak valid.", "One or more fields are invalid."),
                    Some(json!(details)),
                )
            }
            AppError::InvalidMonth(raw) => (
                pick(
                    locale,
                    &format!("Bulan '{}' tidak valid, gunakan format YYYY-MM.", raw),
                    &format!("Month '{}' is invalid, use the YYYY-MM format.", raw),
                ),
                None,
            ),
            AppError::InvalidToken => (
                pick(
                    locale,
                    "Token autentikasi tidak valid atau tidak ada.",
                    "Authentication token is invalid or missing.",
                ),
                None,
            ),
            AppError::NotFound(entity) => (
                pick(
                    locale,
                    &format!("Data {} tidak ditemukan.", entity),
                    &format!("{} not found.", entity),
                ),
                None,
            ),
            AppError::AttendanceAlreadyRecorded(date) => (
                pick(
                    locale,
                    &format!("Absensi untuk tanggal {} sudah tercatat.", date),
                    &format!("Attendance for {} is already recorded.", date),
                ),
                None,
            ),
            AppError::InvalidClockRange => (
                pick(
                    locale,
                    "Jam pulang tidak boleh lebih awal dari jam masuk.",
                    "Clock-out cannot be earlier than clock-in.",
                ),
                None,
            ),
            AppError::CsvParse(reason) => (
                pick(
                    locale,
                    "Gagal membaca file CSV.",
                    "Failed to read the CSV file.",
                ),
                Some(json!({ "reason": reason })),
            ),
            AppError::MissingCsvColumns(columns) => (
                pick(
                    locale,
                    "Kolom wajib tidak ditemukan pada header CSV.",
                    "Required columns are missing from the CSV header.",
                ),
                Some(json!({ "missingColumns": columns })),
            ),
            AppError::UnsupportedMediaType(content_type) => (
                pick(
                    locale,
                    &format!("Tipe file '{}' tidak didukung. Gunakan JPG, PNG, atau WEBP.", content_type),
                    &format!("File type '{}' is not supported. Use JPG, PNG or WEBP.", content_type),
                ),
                None,
            ),
            AppError::FileTooLarge { limit } => (
                pick(
                    locale,
                    &format!("Ukuran file melebihi batas {} KB.", limit / 1024),
                    &format!("File exceeds the {} KB limit.", limit / 1024),
                ),
                None,
            ),
            AppError::AiNotConfigured => (
                pick(
                    locale,
                    "Layanan analisis AI belum dikonfigurasi.",
                    "The AI analysis service is not configured.",
                ),
                None,
            ),
            AppError::AiUpstream(ref reason) => {
                tracing::warn!("AI commentary function failed: {}", reason);
                (
                    pick(
                        locale,
                        "Layanan analisis AI sedang tidak tersedia.",
                        "The AI analysis service is unavailable.",
                    ),
                    None,
                )
            }
            ref e => {
                tracing::error!("Internal server error: {:?}", e);
                (
                    pick(locale, "Terjadi kesalahan tak terduga.", "An unexpected error occurred."),
                    None,
                )
            }
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}
