// src/services/sales_service.rs

use sqlx::{Connection, Executor, PgConnection, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, period::MonthRange},
    db::SalesRepository,
    models::{
        import::{ImportOutcome, ImportPreview},
        sales::{Sale, SaleInput},
    },
    services::csv_import,
};

#[derive(Clone)]
pub struct SalesService {
    repo: SalesRepository,
}

impl SalesService {
    pub fn new(repo: SalesRepository) -> Self {
        Self { repo }
    }

    pub async fn list<'e, E>(&self, executor: E, user_id: Uuid, period: &MonthRange) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_by_range(executor, user_id, period.start, period.end).await
    }

    pub async fn get<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .find_by_id(executor, user_id, id)
            .await?
            .ok_or(AppError::NotFound("Penjualan"))
    }

    pub async fn create<'e, E>(&self, executor: E, user_id: Uuid, input: &SaleInput) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = self.repo.create(executor, user_id, input).await?;
        tracing::debug!(sale_id = %sale.id, margin = %sale.gross_margin, "sale recorded");
        Ok(sale)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        input: &SaleInput,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo
            .update(executor, user_id, id, input)
            .await?
            .ok_or(AppError::NotFound("Penjualan"))
    }

    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if !self.repo.delete(executor, user_id, id).await? {
            return Err(AppError::NotFound("Penjualan"));
        }
        tracing::info!(sale_id = %id, "sale deleted");
        Ok(())
    }

    pub fn preview_csv(&self, text: &str) -> Result<ImportPreview, AppError> {
        csv_import::preview(text)
    }

    /// Inserts the valid rows of an upload, in file order, in one
    /// transaction. Invalid rows are returned untouched; a parse failure
    /// inserts nothing.
    pub async fn import_csv(
        &self,
        conn: &mut PgConnection,
        user_id: Uuid,
        text: &str,
    ) -> Result<ImportOutcome, AppError> {
        let preview = csv_import::preview(text)?;

        let mut tx = conn.begin().await?;
        let mut sales = Vec::with_capacity(preview.valid_count);
        for input in preview.valid_sales() {
            sales.push(self.repo.create(&mut *tx, user_id, input).await?);
        }
        tx.commit().await?;

        let rejected: Vec<_> = preview.rows.into_iter().filter(|r| !r.is_valid).collect();

        tracing::info!(
            user_id = %user_id,
            inserted = sales.len(),
            skipped = rejected.len(),
            "sales CSV imported"
        );

        Ok(ImportOutcome {
            inserted: sales.len(),
            skipped: rejected.len(),
            sales,
            rejected,
        })
    }
}
