// src/services/metrics.rs
//
// Pure reductions over rows that were already fetched for a period. Every
// total is order-insensitive; callers simply re-run these after each fetch.

use rust_decimal::Decimal;

use crate::{
    common::period::MonthRange,
    models::{
        assets::{Asset, AssetKind},
        dashboard::{
            BalanceSheet, DashboardMetrics, ExpenseBreakdownEntry, GrowthRates, PeriodTotals,
            TopProductEntry,
        },
        expenses::Expense,
        losses::Loss,
        sales::Sale,
    },
};

pub const TOP_PRODUCTS_LIMIT: usize = 5;

/// Percentage change from `previous` to `current`, rounded to 2 decimals.
///
/// A zero previous value yields 100 when `current` is positive and 0
/// otherwise. A negative previous value divides by its absolute value, so a
/// loss shrinking from -200 to -100 reads as +50%.
pub fn growth_percentage(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO { Decimal::ONE_HUNDRED } else { Decimal::ZERO };
    }
    ((current - previous) / previous.abs() * Decimal::ONE_HUNDRED).round_dp(2)
}

pub fn margin_percentage(margin: Decimal, revenue: Decimal) -> Decimal {
    if revenue.is_zero() {
        return Decimal::ZERO;
    }
    (margin / revenue * Decimal::ONE_HUNDRED).round_dp(2)
}

impl PeriodTotals {
    pub fn from_rows(sales: &[Sale], expenses: &[Expense], losses: &[Loss]) -> Self {
        let mut totals = PeriodTotals::default();

        for sale in sales {
            totals.revenue += sale.selling_price;
            totals.capital += sale.purchase_price;
            totals.marketplace_fees += sale.marketplace_fee;
            totals.gross_margin += sale.gross_margin;
        }
        totals.transaction_count = sales.len() as u32;
        totals.expenses = expenses.iter().map(|e| e.amount).sum();
        totals.losses = losses.iter().map(|l| l.amount).sum();
        totals.net_profit = totals.gross_margin - totals.expenses - totals.losses;

        totals
    }
}

impl GrowthRates {
    pub fn between(current: &PeriodTotals, previous: &PeriodTotals) -> Self {
        Self {
            revenue: growth_percentage(current.revenue, previous.revenue),
            expenses: growth_percentage(current.expenses, previous.expenses),
            losses: growth_percentage(current.losses, previous.losses),
            gross_margin: growth_percentage(current.gross_margin, previous.gross_margin),
            net_profit: growth_percentage(current.net_profit, previous.net_profit),
            transaction_count: growth_percentage(
                Decimal::from(current.transaction_count),
                Decimal::from(previous.transaction_count),
            ),
        }
    }
}

/// Groups sales by product type and ranks by summed revenue, highest first.
/// Equal revenues keep the order in which the product type first appeared.
pub fn top_products(sales: &[Sale], limit: usize) -> Vec<TopProductEntry> {
    let mut ranking: Vec<TopProductEntry> = Vec::new();

    for sale in sales {
        match ranking.iter_mut().find(|e| e.product_type == sale.product_type) {
            Some(entry) => {
                entry.count += 1;
                entry.revenue += sale.selling_price;
            }
            None => ranking.push(TopProductEntry {
                product_type: sale.product_type,
                count: 1,
                revenue: sale.selling_price,
            }),
        }
    }

    // Stable sort keeps first-appearance order among ties.
    ranking.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    ranking.truncate(limit);
    ranking
}

pub fn expense_breakdown(expenses: &[Expense]) -> Vec<ExpenseBreakdownEntry> {
    let mut breakdown: Vec<ExpenseBreakdownEntry> = Vec::new();

    for expense in expenses {
        match breakdown.iter_mut().find(|e| e.category == expense.category) {
            Some(entry) => entry.amount += expense.amount,
            None => breakdown.push(ExpenseBreakdownEntry {
                category: expense.category,
                amount: expense.amount,
            }),
        }
    }

    breakdown.sort_by(|a, b| b.amount.cmp(&a.amount));
    breakdown
}

impl BalanceSheet {
    pub fn from_assets(assets: &[Asset]) -> Self {
        let mut sheet = BalanceSheet::default();
        for asset in assets {
            match asset.kind {
                AssetKind::Asset => sheet.total_assets += asset.current_value,
                AssetKind::Liability => sheet.total_liabilities += asset.current_value,
            }
        }
        sheet.net_worth = sheet.total_assets - sheet.total_liabilities;
        sheet
    }
}

// Rows of the selected month and the month before it.
pub struct PeriodRows {
    pub sales: Vec<Sale>,
    pub expenses: Vec<Expense>,
    pub losses: Vec<Loss>,
}

impl DashboardMetrics {
    pub fn compute(
        period: MonthRange,
        current: &PeriodRows,
        previous: &PeriodRows,
        assets: &[Asset],
    ) -> Self {
        let current_totals = PeriodTotals::from_rows(&current.sales, &current.expenses, &current.losses);
        let previous_totals = PeriodTotals::from_rows(&previous.sales, &previous.expenses, &previous.losses);

        Self {
            period,
            growth: GrowthRates::between(&current_totals, &previous_totals),
            margin_percentage: margin_percentage(current_totals.gross_margin, current_totals.revenue),
            top_products: top_products(&current.sales, TOP_PRODUCTS_LIMIT),
            expense_breakdown: expense_breakdown(&current.expenses),
            balance: BalanceSheet::from_assets(assets),
            current: current_totals,
            previous: previous_totals,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{expense, loss, sale};
    use super::*;
    use crate::models::{expenses::ExpenseCategory, sales::ProductType};

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn growth_handles_zero_previous_values() {
        assert_eq!(growth_percentage(dec(0), dec(0)), dec(0));
        assert_eq!(growth_percentage(dec(100), dec(0)), dec(100));
        assert_eq!(growth_percentage(dec(-100), dec(0)), dec(0));
    }

    #[test]
    fn growth_is_relative_to_previous() {
        assert_eq!(growth_percentage(dec(100), dec(200)), dec(-50));
        assert_eq!(growth_percentage(dec(300), dec(200)), dec(50));
        assert_eq!(growth_percentage(dec(100), dec(300)), Decimal::new(-6667, 2));
    }

    #[test]
    fn growth_from_negative_previous_uses_its_magnitude() {
        assert_eq!(growth_percentage(dec(-100), dec(-200)), dec(50));
        assert_eq!(growth_percentage(dec(100), dec(-100)), dec(200));
    }

    #[test]
    fn margin_percentage_guards_empty_revenue() {
        assert_eq!(margin_percentage(dec(50), dec(0)), dec(0));
        assert_eq!(margin_percentage(dec(25), dec(100)), dec(25));
    }

    #[test]
    fn totals_are_simple_sums() {
        let sales = vec![
            sale(ProductType::Handphone, 1_000, 1_500, 50),
            sale(ProductType::Aksesoris, 100, 200, 0),
        ];
        let expenses = vec![expense(ExpenseCategory::Sewa, 300)];
        let losses = vec![loss(100)];

        let totals = PeriodTotals::from_rows(&sales, &expenses, &losses);
        assert_eq!(totals.revenue, dec(1_700));
        assert_eq!(totals.capital, dec(1_100));
        assert_eq!(totals.marketplace_fees, dec(50));
        assert_eq!(totals.gross_margin, dec(550));
        assert_eq!(totals.expenses, dec(300));
        assert_eq!(totals.losses, dec(100));
        assert_eq!(totals.net_profit, dec(150));
        assert_eq!(totals.transaction_count, 2);
    }

    #[test]
    fn totals_do_not_depend_on_row_order() {
        let mut sales = vec![
            sale(ProductType::Laptop, 5_000, 6_000, 100),
            sale(ProductType::Jasa, 0, 250, 0),
            sale(ProductType::Tablet, 2_000, 2_100, 30),
        ];
        let forward = PeriodTotals::from_rows(&sales, &[], &[]);
        sales.reverse();
        assert_eq!(PeriodTotals::from_rows(&sales, &[], &[]), forward);
    }

    #[test]
    fn top_products_rank_by_revenue_and_truncate() {
        let sales = vec![
            sale(ProductType::Aksesoris, 10, 50, 0),
            sale(ProductType::Handphone, 100, 300, 0),
            sale(ProductType::Aksesoris, 10, 60, 0),
            sale(ProductType::Laptop, 100, 200, 0),
            sale(ProductType::Jasa, 0, 20, 0),
        ];

        let top = top_products(&sales, 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].product_type, ProductType::Handphone);
        assert_eq!(top[1].product_type, ProductType::Laptop);
        assert_eq!(top[2].product_type, ProductType::Aksesoris);
        assert_eq!(top[2].count, 2);
        assert_eq!(top[2].revenue, dec(110));
    }

    #[test]
    fn top_products_ties_keep_first_appearance() {
        let sales = vec![
            sale(ProductType::Tablet, 0, 100, 0),
            sale(ProductType::Sparepart, 0, 100, 0),
        ];
        let top = top_products(&sales, 5);
        assert_eq!(top[0].product_type, ProductType::Tablet);
        assert_eq!(top[1].product_type, ProductType::Sparepart);
    }

    #[test]
    fn expense_breakdown_sums_per_category() {
        let expenses = vec![
            expense(ExpenseCategory::Gaji, 100),
            expense(ExpenseCategory::Sewa, 500),
            expense(ExpenseCategory::Gaji, 450),
        ];
        let breakdown = expense_breakdown(&expenses);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, ExpenseCategory::Gaji);
        assert_eq!(breakdown[0].amount, dec(550));
    }

    #[test]
    fn dashboard_compares_against_the_previous_month() {
        let period = MonthRange::new(2024, 5).unwrap();
        let current = PeriodRows {
            sales: vec![sale(ProductType::Handphone, 1_000, 1_100, 0)],
            expenses: vec![],
            losses: vec![],
        };
        let previous = PeriodRows {
            sales: vec![
                sale(ProductType::Handphone, 1_000, 1_100, 0),
                sale(ProductType::Handphone, 1_000, 1_100, 0),
            ],
            expenses: vec![],
            losses: vec![],
        };

        let metrics = DashboardMetrics::compute(period, &current, &previous, &[]);
        assert_eq!(metrics.growth.revenue, dec(-50));
        assert_eq!(metrics.growth.transaction_count, dec(-50));
        assert_eq!(metrics.margin_percentage, Decimal::new(909, 2));
        assert_eq!(metrics.top_products.len(), 1);
    }
}
