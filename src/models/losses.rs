// src/models/losses.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_amount;

// A recorded detriment that is not a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "loss_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    Kerusakan,  // damage
    Pencurian,  // theft
    Kadaluarsa, // spoilage
    Retur,      // return
    Lainnya,    // other
}

value_set!(LossType {
    Kerusakan => "kerusakan",
    Pencurian => "pencurian",
    Kadaluarsa => "kadaluarsa",
    Retur => "retur",
    Lainnya => "lainnya",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loss {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2024-05-20")]
    pub transaction_date: NaiveDate,
    pub loss_type: LossType,
    #[schema(example = 450000)]
    pub amount: Decimal,
    #[schema(example = "Layar retak saat pengiriman")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LossInput {
    #[schema(value_type = String, format = Date, example = "2024-05-20")]
    pub transaction_date: NaiveDate,
    pub loss_type: LossType,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    pub description: Option<String>,
}
