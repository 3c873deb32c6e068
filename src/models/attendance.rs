// src/models/attendance.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::period::MonthRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "attendance_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Hadir,
    Ijin,
    Sakit,
    TanpaKeterangan,
}

value_set!(AttendanceStatus {
    Hadir => "hadir",
    Ijin => "ijin",
    Sakit => "sakit",
    TanpaKeterangan => "tanpa_keterangan",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2024-05-02")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub clock_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:30:00")]
    pub clock_out: Option<NaiveTime>,
    // Hours worked beyond 8
    #[schema(example = 2.5)]
    pub overtime_hours: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    #[schema(value_type = String, format = Date, example = "2024-05-02")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(value_type = Option<String>, example = "08:00")]
    pub clock_in: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "18:30")]
    pub clock_out: Option<NaiveTime>,
    #[validate(length(max = 500, message = "Catatan terlalu panjang."))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub period: MonthRange,
    pub hadir: u32,
    pub ijin: u32,
    pub sakit: u32,
    pub tanpa_keterangan: u32,
    pub total_overtime_hours: Decimal,
    pub records: Vec<AttendanceRecord>,
}
