// src/db/loss_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::losses::{Loss, LossInput},
};

const LOSS_COLUMNS: &str =
    "id, user_id, transaction_date, loss_type, amount, description, created_at, updated_at";

#[derive(Clone, Default)]
pub struct LossRepository;

impl LossRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_by_range<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Loss>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let losses = sqlx::query_as::<_, Loss>(&format!(
            r#"
            SELECT {LOSS_COLUMNS}
            FROM losses
            WHERE user_id = $1 AND transaction_date BETWEEN $2 AND $3
            ORDER BY transaction_date DESC, created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;

        Ok(losses)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Loss>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loss = sqlx::query_as::<_, Loss>(&format!(
            "SELECT {LOSS_COLUMNS} FROM losses WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(loss)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        input: &LossInput,
    ) -> Result<Loss, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loss = sqlx::query_as::<_, Loss>(&format!(
            r#"
            INSERT INTO losses (user_id, transaction_date, loss_type, amount, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LOSS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.transaction_date)
        .bind(input.loss_type)
        .bind(input.amount)
        .bind(input.description.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(loss)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        input: &LossInput,
    ) -> Result<Option<Loss>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let loss = sqlx::query_as::<_, Loss>(&format!(
            r#"
            UPDATE losses SET
                transaction_date = $3,
                loss_type = $4,
                amount = $5,
                description = $6,
                updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING {LOSS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(id)
        .bind(input.transaction_date)
        .bind(input.loss_type)
        .bind(input.amount)
        .bind(input.description.as_deref())
        .fetch_optional(executor)
        .await?;

        Ok(loss)
    }

    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM losses WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
