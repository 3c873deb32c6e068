// src/models/expenses.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validate_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "expense_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Operasional,
    Gaji,
    Sewa,
    Utilitas,
    Transportasi,
    Pemasaran,
    PembelianStok,
    Lainnya,
}

value_set!(ExpenseCategory {
    Operasional => "operasional",
    Gaji => "gaji",
    Sewa => "sewa",
    Utilitas => "utilitas",
    Transportasi => "transportasi",
    Pemasaran => "pemasaran",
    PembelianStok => "pembelian_stok",
    Lainnya => "lainnya",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2024-05-03")]
    pub transaction_date: NaiveDate,
    pub category: ExpenseCategory,
    #[schema(example = 3500000)]
    pub amount: Decimal,
    #[schema(example = "Sewa ruko bulan Mei")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseInput {
    #[schema(value_type = String, format = Date, example = "2024-05-03")]
    pub transaction_date: NaiveDate,
    pub category: ExpenseCategory,
    #[validate(custom(function = "validate_amount"))]
    pub amount: Decimal,
    pub description: Option<String>,
}
