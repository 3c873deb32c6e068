// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    common::period::MonthRange,
    models::{expenses::ExpenseCategory, sales::ProductType},
};

// 1. Simple sums over one period
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub revenue: Decimal,         // Σ selling_price
    pub capital: Decimal,         // Σ purchase_price
    pub marketplace_fees: Decimal,
    pub gross_margin: Decimal,    // Σ gross_margin
    pub expenses: Decimal,
    pub losses: Decimal,
    pub net_profit: Decimal,      // gross_margin - expenses - losses
    pub transaction_count: u32,
}

// 2. Current vs previous period, in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrowthRates {
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub losses: Decimal,
    pub gross_margin: Decimal,
    pub net_profit: Decimal,
    pub transaction_count: Decimal,
}

// 3. Top products by revenue
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub product_type: ProductType,
    pub count: u32,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseBreakdownEntry {
    pub category: ExpenseCategory,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
}

// Everything the dashboard cards show for one month.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub period: MonthRange,
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub growth: GrowthRates,
    pub margin_percentage: Decimal,
    pub top_products: Vec<TopProductEntry>,
    pub expense_breakdown: Vec<ExpenseBreakdownEntry>,
    pub balance: BalanceSheet,
}

// 4. Daily chart rows, aggregated by the `daily_financial_summary` procedure
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailySummaryEntry {
    #[schema(value_type = String, format = Date)]
    pub day: NaiveDate,
    pub revenue: Decimal,
    pub gross_margin: Decimal,
    pub expenses: Decimal,
    pub losses: Decimal,
}
