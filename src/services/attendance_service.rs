// src/services/attendance_service.rs

use chrono::NaiveTime;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::MonthRange},
    db::AttendanceRepository,
    models::attendance::{AttendanceInput, AttendanceRecord, AttendanceStatus, AttendanceSummary},
};

pub const REGULAR_HOURS: i64 = 8;

/// Hours worked beyond the regular eight, in hours with two decimals.
/// Zero when either clock time is missing.
pub fn overtime_hours(
    clock_in: Option<NaiveTime>,
    clock_out: Option<NaiveTime>,
) -> Result<Decimal, AppError> {
    let (Some(clock_in), Some(clock_out)) = (clock_in, clock_out) else {
        return Ok(Decimal::ZERO);
    };
    if clock_out < clock_in {
        return Err(AppError::InvalidClockRange);
    }

    let worked_minutes = (clock_out - clock_in).num_minutes();
    let overtime_minutes = (worked_minutes - REGULAR_HOURS * 60).max(0);

    Ok((Decimal::from(overtime_minutes) / Decimal::from(60)).round_dp(2))
}

pub fn summarize(period: MonthRange, records: Vec<AttendanceRecord>) -> AttendanceSummary {
    let count = |status: AttendanceStatus| records.iter().filter(|r| r.status == status).count() as u32;

    AttendanceSummary {
        period,
        hadir: count(AttendanceStatus::Hadir),
        ijin: count(AttendanceStatus::Ijin),
        sakit: count(AttendanceStatus::Sakit),
        tanpa_keterangan: count(AttendanceStatus::TanpaKeterangan),
        total_overtime_hours: records.iter().map(|r| r.overtime_hours).sum(),
        records,
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    repo: AttendanceRepository,
}

impl AttendanceService {
    pub fn new(repo: AttendanceRepository) -> Self {
        Self { repo }
    }

    pub async fn monthly<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        period: MonthRange,
    ) -> Result<AttendanceSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = self.repo.list_by_range(executor, user_id, period.start, period.end).await?;
        Ok(summarize(period, records))
    }

    pub async fn record<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        input: &AttendanceInput,
    ) -> Result<AttendanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let overtime = overtime_hours(input.clock_in, input.clock_out)?;
        self.repo.create(executor, user_id, input, overtime).await
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        input: &AttendanceInput,
    ) -> Result<AttendanceRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let overtime = overtime_hours(input.clock_in, input.clock_out)?;
        self.repo
            .update(executor, user_id, id, input, overtime)
            .await?
            .ok_or(AppError::NotFound("Absensi"))
    }

    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.delete(executor, user_id, id).await? {
            return Err(AppError::NotFound("Absensi"));
        }
        Ok(())
    }
}
