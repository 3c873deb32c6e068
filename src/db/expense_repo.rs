// src/db/expense_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::expenses::{Expense, ExpenseInput},
};

const EXPENSE_COLUMNS: &str =
    "id, user_id, transaction_date, category, amount, description, created_at, updated_at";

#[derive(Clone, Default)]
pub struct ExpenseRepository;

impl ExpenseRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_by_range<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Expense>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let expenses = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE user_id = $1 AND transaction_date BETWEEN $2 AND $3
            ORDER BY transaction_date DESC, created_at DESC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;

        Ok(expenses)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Expense>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(expense)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        input: &ExpenseInput,
    ) -> Result<Expense, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (user_id, transaction_date, category, amount, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.transaction_date)
        .bind(input.category)
        .bind(input.amount)
        .bind(input.description.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(expense)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        input: &ExpenseInput,
    ) -> Result<Option<Expense>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses SET
                transaction_date = $3,
                category = $4,
                amount = $5,
                description = $6,
                updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(id)
        .bind(input.transaction_date)
        .bind(input.category)
        .bind(input.amount)
        .bind(input.description.as_deref())
        .fetch_optional(executor)
        .await?;

        Ok(expense)
    }

    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM expenses WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
