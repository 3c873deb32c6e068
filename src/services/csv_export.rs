// src/services/csv_export.rs

use csv::WriterBuilder;

use crate::{
    common::{error::AppError, period::MonthRange},
    models::sales::Sale,
    services::csv_import::SALES_COLUMNS,
};

pub fn sales_export_filename(period: &MonthRange) -> String {
    format!("Penjualan_{}.csv", period.file_label())
}

/// Writes sales in the same layout the importer reads, so an export can be
/// edited and uploaded again.
pub fn write_sales_csv(sales: &[Sale]) -> Result<Vec<u8>, AppError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    let to_anyhow = |e: csv::Error| AppError::InternalServerError(anyhow::anyhow!("CSV export failed: {}", e));

    writer.write_record(SALES_COLUMNS).map_err(to_anyhow)?;

    for sale in sales {
        writer
            .write_record([
                sale.transaction_date.format("%Y-%m-%d").to_string(),
                sale.customer_name.clone(),
                sale.product_type.as_str().to_string(),
                sale.purchase_price.normalize().to_string(),
                sale.selling_price.normalize().to_string(),
                sale.marketplace_fee.normalize().to_string(),
                sale.payment_method.as_str().to_string(),
                sale.description.clone().unwrap_or_default(),
            ])
            .map_err(to_anyhow)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("CSV export failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::sales::ProductType,
        services::{csv_import, metrics::fixtures::sale},
    };

    #[test]
    fn header_row_matches_the_import_format() {
        let bytes = write_sales_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "transaction_date,customer_name,product_type,purchase_price,selling_price,marketplace_fee,payment_method,description\n"
        );
    }

    #[test]
    fn embedded_commas_are_quoted() {
        let mut row = sale(ProductType::Laptop, 5_000_000, 5_600_000, 0);
        row.customer_name = "Toko Maju, Tbk".into();

        let text = String::from_utf8(write_sales_csv(&[row]).unwrap()).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, "2024-05-10,\"Toko Maju, Tbk\",laptop,5000000,5600000,0,tunai,");
    }

    #[test]
    fn exports_import_back_as_valid_rows() {
        let mut first = sale(ProductType::Handphone, 1_200_000, 1_500_000, 25_000);
        first.description = Some("Garansi \"resmi\", 1 tahun".into());
        let second = sale(ProductType::Jasa, 0, 150_000, 0);

        let bytes = write_sales_csv(&[first.clone(), second]).unwrap();
        let preview = csv_import::preview(std::str::from_utf8(&bytes).unwrap()).unwrap();

        assert_eq!(preview.valid_count, 2);
        assert_eq!(preview.invalid_count, 0);
        let imported = preview.rows[0].sale.as_ref().unwrap();
        assert_eq!(imported.description, first.description);
        assert_eq!(imported.gross_margin(), first.gross_margin);
    }

    #[test]
    fn filename_carries_the_period() {
        let period = MonthRange::new(2024, 8).unwrap();
        assert_eq!(sales_export_filename(&period), "Penjualan_Agustus_2024.csv");
    }
}
