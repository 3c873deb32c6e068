// src/services/dashboard_service.rs

use sqlx::{Connection, PgConnection};
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::MonthRange},
    db::{AssetRepository, DashboardRepository, ExpenseRepository, LossRepository, SalesRepository},
    models::dashboard::{DailySummaryEntry, DashboardMetrics},
    services::metrics::PeriodRows,
};

// Fetch, then recompute: every call re-reads both months from the store.
#[derive(Clone)]
pub struct DashboardService {
    sales_repo: SalesRepository,
    expense_repo: ExpenseRepository,
    loss_repo: LossRepository,
    asset_repo: AssetRepository,
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(
        sales_repo: SalesRepository,
        expense_repo: ExpenseRepository,
        loss_repo: LossRepository,
        asset_repo: AssetRepository,
        repo: DashboardRepository,
    ) -> Self {
        Self { sales_repo, expense_repo, loss_repo, asset_repo, repo }
    }

    pub async fn period_rows(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        period: &MonthRange,
    ) -> Result<PeriodRows, AppError> {
        Ok(PeriodRows {
            sales: self.sales_repo.list_by_range(&mut *conn, user_id, period.start, period.end).await?,
            expenses: self.expense_repo.list_by_range(&mut *conn, user_id, period.start, period.end).await?,
            losses: self.loss_repo.list_by_range(&mut *conn, user_id, period.start, period.end).await?,
        })
    }

    pub async fn metrics(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        period: MonthRange,
    ) -> Result<DashboardMetrics, AppError> {
        // Both months and the balance sheet are read from one snapshot.
        let mut tx = conn.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ")
            .execute(&mut *tx)
            .await?;

        let current = self.period_rows(&mut *tx, user_id, &period).await?;
        let previous = self.period_rows(&mut *tx, user_id, &period.previous()).await?;
        let assets = self.asset_repo.list_all(&mut *tx, user_id).await?;

        tx.commit().await?;

        Ok(DashboardMetrics::compute(period, &current, &previous, &assets))
    }

    pub async fn daily(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        period: &MonthRange,
    ) -> Result<Vec<DailySummaryEntry>, AppError> {
        self.repo.daily_summary(conn, user_id, period).await
    }
}
