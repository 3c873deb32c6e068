// src/db/asset_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::assets::{Asset, AssetInput},
};

const ASSET_COLUMNS: &str = r#"
    id, user_id, kind, category, name, current_value, initial_price,
    acquired_at, created_at, updated_at
"#;

#[derive(Clone, Default)]
pub struct AssetRepository;

impl AssetRepository {
    pub fn new() -> Self {
        Self
    }

    // Balance items are not dated; the whole list is always returned.
    pub async fn list_all<'e, E>(&self, executor: E, user_id: Uuid) -> Result<Vec<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assets = sqlx::query_as::<_, Asset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE user_id = $1 ORDER BY kind ASC, name ASC"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(assets)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let asset = sqlx::query_as::<_, Asset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM assets WHERE user_id = $1 AND id = $2"
        ))
        .bind(user_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(asset)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        input: &AssetInput,
    ) -> Result<Asset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let asset = sqlx::query_as::<_, Asset>(&format!(
            r#"
            INSERT INTO assets (user_id, kind, category, name, current_value, initial_price, acquired_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(input.kind)
        .bind(input.category.trim())
        .bind(input.name.trim())
        .bind(input.current_value)
        .bind(input.initial_price)
        .bind(input.acquired_at)
        .fetch_one(executor)
        .await?;

        Ok(asset)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        id: Uuid,
        input: &AssetInput,
    ) -> Result<Option<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let asset = sqlx::query_as::<_, Asset>(&format!(
            r#"
            UPDATE assets SET
                kind = $3,
                category = $4,
                name = $5,
                current_value = $6,
                initial_price = $7,
                acquired_at = $8,
                updated_at = NOW()
            WHERE user_id = $1 AND id = $2
            RETURNING {ASSET_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(id)
        .bind(input.kind)
        .bind(input.category.trim())
        .bind(input.name.trim())
        .bind(input.current_value)
        .bind(input.initial_price)
        .bind(input.acquired_at)
        .fetch_optional(executor)
        .await?;

        Ok(asset)
    }

    pub async fn delete<'e, E>(&self, executor: E, user_id: Uuid, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM assets WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
