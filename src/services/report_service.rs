// src/services/report_service.rs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use genpdf::{elements, style, Alignment, Element};
use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        format::{format_date_id, format_percent, format_rupiah},
        period::MonthRange,
    },
    models::dashboard::DashboardMetrics,
};

const FONT_FAMILY: &str = "Roboto";

pub fn monthly_report_filename(period: &MonthRange) -> String {
    format!("Laporan_Keuangan_{}.pdf", period.file_label())
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryLine {
    pub label: &'static str,
    pub amount: String,
    pub growth: Option<String>,
}

// Everything the PDF prints, already formatted. Kept apart from rendering so
// the text can be checked without fonts.
#[derive(Debug, Clone)]
pub struct ReportContent {
    pub title: String,
    pub period_label: String,
    pub summary: Vec<SummaryLine>,
    pub analysis: Vec<String>,
    pub commentary: Option<String>,
    pub footer: String,
}

impl ReportContent {
    pub fn monthly(metrics: &DashboardMetrics, commentary: Option<String>, generated_at: DateTime<Utc>) -> Self {
        let current = &metrics.current;
        let growth = &metrics.growth;

        let line = |label, amount: Decimal, growth: Option<Decimal>| SummaryLine {
            label,
            amount: format_rupiah(amount),
            growth: growth.map(format_percent),
        };

        let summary = vec![
            line("Pendapatan", current.revenue, Some(growth.revenue)),
            line("Modal", current.capital, None),
            line("Biaya Marketplace", current.marketplace_fees, None),
            line("Margin Kotor", current.gross_margin, Some(growth.gross_margin)),
            line("Pengeluaran", current.expenses, Some(growth.expenses)),
            line("Kerugian", current.losses, Some(growth.losses)),
            line("Laba Bersih", current.net_profit, Some(growth.net_profit)),
        ];

        let mut analysis = vec![
            format!("Jumlah transaksi: {}", current.transaction_count),
            format!("Persentase margin: {}", format_percent(metrics.margin_percentage).trim_start_matches('+')),
        ];

        if metrics.top_products.is_empty() {
            analysis.push("Belum ada penjualan pada periode ini.".to_string());
        } else {
            analysis.push("Produk terlaris:".to_string());
            for (rank, product) in metrics.top_products.iter().enumerate() {
                analysis.push(format!(
                    "{}. {} - {} transaksi, {}",
                    rank + 1,
                    product.product_type,
                    product.count,
                    format_rupiah(product.revenue)
                ));
            }
        }

        if !metrics.expense_breakdown.is_empty() {
            analysis.push("Pengeluaran per kategori:".to_string());
            for entry in &metrics.expense_breakdown {
                analysis.push(format!("- {}: {}", entry.category, format_rupiah(entry.amount)));
            }
        }

        analysis.push(format!(
            "Nilai bersih aset: {}",
            format_rupiah(metrics.balance.net_worth)
        ));

        Self {
            title: "LAPORAN KEUANGAN".to_string(),
            period_label: metrics.period.label_id(),
            summary,
            analysis,
            commentary: commentary.filter(|c| !c.trim().is_empty()),
            footer: format!(
                "Dicetak pada {} {} UTC",
                format_date_id(generated_at.date_naive()),
                generated_at.format("%H:%M")
            ),
        }
    }
}

#[derive(Clone)]
pub struct ReportService {
    font_dir: PathBuf,
}

impl ReportService {
    pub fn new(font_dir: PathBuf) -> Self {
        Self { font_dir }
    }

    /// Renders off the async runtime; PDF layout is CPU bound.
    pub async fn render_pdf(&self, content: ReportContent) -> Result<Vec<u8>, AppError> {
        let font_dir = self.font_dir.clone();
        tokio::task::spawn_blocking(move || render(&font_dir, &content))
            .await
            .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("PDF task failed: {}", e)))?
    }
}

fn render(font_dir: &Path, content: &ReportContent) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(font_dir, FONT_FAMILY, None)
        .map_err(|_| AppError::FontNotFound(format!("{} in {}", FONT_FAMILY, font_dir.display())))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(format!("{} {}", content.title, content.period_label));
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    let pdf_err = |e: genpdf::error::Error| AppError::PdfRender(e.to_string());

    // --- HEADER ---
    doc.push(elements::Paragraph::new(content.title.clone()).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(
        elements::Paragraph::new(format!("Periode: {}", content.period_label))
            .styled(style::Style::new().with_font_size(11)),
    );
    doc.push(elements::Break::new(1.5));

    // --- SUMMARY TABLE ---
    let mut table = elements::TableLayout::new(vec![3, 3, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    let bold = style::Style::new().bold();
    table
        .row()
        .element(elements::Paragraph::new("Keterangan").styled(bold))
        .element(elements::Paragraph::new("Jumlah").styled(bold))
        .element(elements::Paragraph::new("vs Bulan Lalu").styled(bold))
        .push()
        .map_err(pdf_err)?;

    for line in &content.summary {
        let mut amount = elements::Paragraph::new(line.amount.clone());
        amount.set_alignment(Alignment::Right);
        table
            .row()
            .element(elements::Paragraph::new(line.label))
            .element(amount)
            .element(elements::Paragraph::new(line.growth.clone().unwrap_or_else(|| "-".to_string())))
            .push()
            .map_err(pdf_err)?;
    }

    doc.push(table);
    doc.push(elements::Break::new(2));

    // --- ANALYSIS ---
    doc.push(elements::Paragraph::new("ANALISIS").styled(style::Style::new().bold().with_font_size(14)));
    for text in &content.analysis {
        doc.push(elements::Paragraph::new(text.clone()));
    }

    if let Some(commentary) = &content.commentary {
        doc.push(elements::Break::new(1));
        doc.push(elements::Paragraph::new("Catatan AI").styled(style::Style::new().bold().with_font_size(12)));
        for paragraph in commentary.lines().filter(|l| !l.trim().is_empty()) {
            doc.push(elements::Paragraph::new(paragraph.trim().to_string()));
        }
    }

    // --- FOOTER ---
    doc.push(elements::Break::new(2));
    doc.push(elements::Paragraph::new(content.footer.clone()).styled(style::Style::new().italic().with_font_size(8)));

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(pdf_err)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::sales::ProductType,
        services::metrics::{
            fixtures::{expense, sale},
            PeriodRows,
        },
    };
    use crate::models::expenses::ExpenseCategory;
    use chrono::TimeZone;

    fn metrics() -> DashboardMetrics {
        let current = PeriodRows {
            sales: vec![
                sale(ProductType::Handphone, 1_200_000, 1_500_000, 0),
                sale(ProductType::Aksesoris, 20_000, 50_000, 0),
            ],
            expenses: vec![expense(ExpenseCategory::Sewa, 100_000)],
            losses: vec![],
        };
        let previous = PeriodRows { sales: vec![], expenses: vec![], losses: vec![] };
        DashboardMetrics::compute(MonthRange::new(2024, 5).unwrap(), &current, &previous, &[])
    }

    #[test]
    fn summary_lines_are_formatted_in_rupiah() {
        let generated_at = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let content = ReportContent::monthly(&metrics(), None, generated_at);

        assert_eq!(content.period_label, "Mei 2024");
        assert_eq!(
            content.summary[0],
            SummaryLine { label: "Pendapatan", amount: "Rp 1.550.000".into(), growth: Some("+100,0%".into()) }
        );
        assert_eq!(content.summary[6].amount, "Rp 230.000");
        assert_eq!(content.footer, "Dicetak pada 1 Juni 2024 09:30 UTC");
    }

    #[test]
    fn analysis_lists_top_products_and_expenses() {
        let content = ReportContent::monthly(&metrics(), Some("  ".into()), Utc::now());

        assert!(content.analysis.contains(&"1. handphone - 1 transaksi, Rp 1.500.000".to_string()));
        assert!(content.analysis.contains(&"- sewa: Rp 100.000".to_string()));
        // Blank commentary is dropped.
        assert!(content.commentary.is_none());
    }

    #[test]
    fn filename_follows_report_and_period() {
        let period = MonthRange::new(2024, 5).unwrap();
        assert_eq!(monthly_report_filename(&period), "Laporan_Keuangan_Mei_2024.pdf");
    }
}
