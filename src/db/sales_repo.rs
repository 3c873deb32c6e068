// src/db/sales_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sales::{Sale, SaleInput},
};

const SALE_COLUMNS: &str = r#"
    id, user_id, transaction_date, customer_name, product_type,
    purchase_price, selling_price, marketplace_fee, gross_margin,
    payment_method, description, created_at, updated_at
"#;

// Every query filters on user_id on top of the RLS policy.
#[derive(Clone, Default)]
pub struct SalesRepository;

impl SalesRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_by_range<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE user_id = $1 AND transaction_date BETWEEN $2 AND $3
            ORDER BY transaction_date DESC, created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;

        Ok(sales)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(sale)
    }

    // gross_margin is a generated column and is never written.
    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        input: &SaleInput,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO sales (
                user_id, transaction_date, customer_name, product_type,
                purchase_price, selling_price, marketplace_fee,
                payment_method, description
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.transaction_date)
        .bind(&input.customer_name)
        .bind(input.product_type)
        .bind(input.purchase_price)
        .bind(input.selling_price)
        .bind(input.marketplace_fee)
        .bind(input.payment_method)
        .bind(input.description.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(sale)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        input: &SaleInput,
    ) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            UPDATE sales SET
                transaction_date = $3,
                customer_name = $4,
                product_type = $5,
                purchase_price = $6,
                selling_price = $7,
                marketplace_fee = $8,
                payment_method = $9,
                description = $10,
                updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(id)
        .bind(input.transaction_date)
        .bind(&input.customer_name)
        .bind(input.product_type)
        .bind(input.purchase_price)
        .bind(input.selling_price)
        .bind(input.marketplace_fee)
        .bind(input.payment_method)
        .bind(input.description.as_deref())
        .fetch_optional(executor)
        .await?;

        Ok(sale)
    }

    /// Returns whether a row was deleted.
    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM sales WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
