// src/db/attendance_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::attendance::{AttendanceInput, AttendanceRecord},
};

const ATTENDANCE_COLUMNS: &str = r#"
    id, user_id, date, status, clock_in, clock_out, overtime_hours,
    notes, created_at, updated_at
"#;

// One row per user per day (unique index on user_id, date).
fn map_duplicate_day(e: sqlx::Error, date: NaiveDate) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::AttendanceAlreadyRecorded(date);
        }
    }
    e.into()
}

#[derive(Clone, Default)]
pub struct AttendanceRepository;

impl AttendanceRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_by_range<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            SELECT {ATTENDANCE_COLUMNS}
            FROM attendance_records
            WHERE user_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        input: &AttendanceInput,
        overtime_hours: Decimal,
    ) -> Result<AttendanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            INSERT INTO attendance_records (user_id, date, status, clock_in, clock_out, overtime_hours, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.date)
        .bind(input.status)
        .bind(input.clock_in)
        .bind(input.clock_out)
        .bind(overtime_hours)
        .bind(input.notes.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| map_duplicate_day(e, input.date))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        input: &AttendanceInput,
        overtime_hours: Decimal,
    ) -> Result<Option<AttendanceRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AttendanceRecord>(&format!(
            r#"
            UPDATE attendance_records SET
                date = $3,
                status = $4,
                clock_in = $5,
                clock_out = $6,
                overtime_hours = $7,
                notes = $8,
                updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING {ATTENDANCE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(id)
        .bind(input.date)
        .bind(input.status)
        .bind(input.clock_in)
        .bind(input.clock_out)
        .bind(overtime_hours)
        .bind(input.notes.as_deref())
        .fetch_optional(executor)
        .await
        .map_err(|e| map_duplicate_day(e, input.date))
    }

    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM attendance_records WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
