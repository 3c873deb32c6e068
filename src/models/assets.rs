// src/models/assets.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{dashboard::BalanceSheet, validate_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "asset_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Asset,
    Liability,
}

value_set!(AssetKind {
    Asset => "asset",
    Liability => "liability",
});

// Assets and liabilities share one table, told apart by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    pub kind: AssetKind,
    #[schema(example = "Peralatan")]
    pub category: String,
    #[schema(example = "Etalase kaca")]
    pub name: String,
    #[schema(example = 2000000)]
    pub current_value: Decimal,
    #[schema(example = 3000000)]
    pub initial_price: Decimal,
    #[schema(value_type = Option<String>, format = Date, example = "2023-01-10")]
    pub acquired_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetInput {
    pub kind: AssetKind,
    #[validate(length(min = 1, max = 100, message = "Kategori wajib diisi."))]
    pub category: String,
    #[validate(length(min = 1, max = 200, message = "Nama wajib diisi."))]
    pub name: String,
    #[validate(custom(function = "validate_amount"))]
    pub current_value: Decimal,
    #[validate(custom(function = "validate_amount"))]
    #[serde(default)]
    pub initial_price: Decimal,
    #[schema(value_type = Option<String>, format = Date)]
    pub acquired_at: Option<NaiveDate>,
}

// Asset page payload: every item plus the totals shown above the list.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetOverview {
    pub items: Vec<Asset>,
    pub balance: BalanceSheet,
}
