// src/db/dashboard_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::MonthRange},
    models::dashboard::DailySummaryEntry,
};

// Thin wrappers over the aggregation procedures defined in the migrations.
#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    // Chart rows, one per day of the month (days without activity are zero).
    pub async fn daily_summary<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        period: &MonthRange,
    ) -> Result<Vec<DailySummaryEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, DailySummaryEntry>(
            r#"
            SELECT day, revenue, gross_margin, expenses, losses
            FROM daily_financial_summary($1, $2, $3)
            ORDER BY day ASC
            "#,
        )
        .bind(user_id)
        .bind(period.start)
        .bind(period.end)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
