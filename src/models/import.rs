// src/models/import.rs

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::sales::{Sale, SaleInput};

// One data line of an uploaded CSV, keyed by canonical column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    /// 1-based line number in the file (the header is line 1).
    pub line: usize,
    pub fields: HashMap<&'static str, String>,
}

impl CsvRow {
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(|v| v.trim()).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    #[schema(example = "transaction_date")]
    pub field: String,
    #[schema(example = "Tanggal tidak valid.")]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowValidation {
    pub line: usize,
    pub is_valid: bool,
    pub errors: Vec<FieldError>,
    /// The parsed sale, present only when the row is valid.
    pub sale: Option<SaleInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub rows: Vec<RowValidation>,
    pub valid_count: usize,
    pub invalid_count: usize,
}

impl ImportPreview {
    pub fn valid_sales(&self) -> impl Iterator<Item = &SaleInput> {
        self.rows.iter().filter_map(|r| r.sale.as_ref())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub inserted: usize,
    pub skipped: usize,
    pub sales: Vec<Sale>,
    pub rejected: Vec<RowValidation>,
}
