// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::get_sale,
        handlers::sales::create_sale,
        handlers::sales::update_sale,
        handlers::sales::delete_sale,
        handlers::sales::preview_import,
        handlers::sales::import_sales,
        handlers::sales::export_sales,

        // --- Expenses ---
        handlers::expenses::list_expenses,
        handlers::expenses::get_expense,
        handlers::expenses::create_expense,
        handlers::expenses::update_expense,
        handlers::expenses::delete_expense,

        // --- Losses ---
        handlers::losses::list_losses,
        handlers::losses::get_loss,
        handlers::losses::create_loss,
        handlers::losses::update_loss,
        handlers::losses::delete_loss,

        // --- Assets ---
        handlers::assets::list_assets,
        handlers::assets::get_asset,
        handlers::assets::create_asset,
        handlers::assets::update_asset,
        handlers::assets::delete_asset,

        // --- Attendance ---
        handlers::attendance::monthly_attendance,
        handlers::attendance::record_attendance,
        handlers::attendance::update_attendance,
        handlers::attendance::delete_attendance,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
        handlers::dashboard::get_daily,

        // --- Reports / AI ---
        handlers::reports::monthly_report,
        handlers::insights::create_insight,

        // --- Profile ---
        handlers::profile::get_photo,
        handlers::profile::upload_photo,
        handlers::profile::delete_photo,
    ),
    components(
        schemas(
            // --- Sales ---
            models::sales::ProductType,
            models::sales::PaymentMethod,
            models::sales::Sale,
            models::sales::SaleInput,

            // --- CSV import ---
            models::import::FieldError,
            models::import::RowValidation,
            models::import::ImportPreview,
            models::import::ImportOutcome,

            // --- Expenses / Losses ---
            models::expenses::ExpenseCategory,
            models::expenses::Expense,
            models::expenses::ExpenseInput,
            models::losses::LossType,
            models::losses::Loss,
            models::losses::LossInput,

            // --- Assets ---
            models::assets::AssetKind,
            models::assets::Asset,
            models::assets::AssetInput,
            models::assets::AssetOverview,

            // --- Attendance ---
            models::attendance::AttendanceStatus,
            models::attendance::AttendanceRecord,
            models::attendance::AttendanceInput,
            models::attendance::AttendanceSummary,

            // --- Dashboard ---
            crate::common::period::MonthRange,
            models::dashboard::PeriodTotals,
            models::dashboard::GrowthRates,
            models::dashboard::TopProductEntry,
            models::dashboard::ExpenseBreakdownEntry,
            models::dashboard::BalanceSheet,
            models::dashboard::DashboardMetrics,
            models::dashboard::DailySummaryEntry,

            // --- AI / Profile ---
            services::insight_service::CommentaryResponse,
            handlers::profile::PhotoResponse,
        )
    ),
    tags(
        (name = "Sales", description = "Transaksi penjualan, impor dan ekspor CSV"),
        (name = "Expenses", description = "Pengeluaran operasional"),
        (name = "Losses", description = "Kerugian (rusak, hilang, kadaluarsa, retur)"),
        (name = "Assets", description = "Aset dan kewajiban"),
        (name = "Attendance", description = "Absensi dan lembur"),
        (name = "Dashboard", description = "Indikator dan grafik keuangan"),
        (name = "Reports", description = "Laporan keuangan PDF"),
        (name = "Insights", description = "Komentar AI"),
        (name = "Profile", description = "Foto profil")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
