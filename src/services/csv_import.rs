// src/services/csv_import.rs
//
// Sales CSV import: parse -> validate -> preview. The insert step lives in
// `SalesService::import_csv` so it can run inside one transaction.

use std::{collections::HashMap, str::FromStr};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    models::{
        amount_problem,
        import::{CsvRow, FieldError, ImportPreview, RowValidation},
        sales::{PaymentMethod, ProductType, SaleInput},
    },
};

pub const COL_DATE: &str = "transaction_date";
pub const COL_CUSTOMER: &str = "customer_name";
pub const COL_PRODUCT: &str = "product_type";
pub const COL_PURCHASE: &str = "purchase_price";
pub const COL_SELLING: &str = "selling_price";
pub const COL_FEE: &str = "marketplace_fee";
pub const COL_PAYMENT: &str = "payment_method";
pub const COL_DESCRIPTION: &str = "description";

/// Column order used by the export and the downloadable template.
pub const SALES_COLUMNS: [&str; 8] = [
    COL_DATE,
    COL_CUSTOMER,
    COL_PRODUCT,
    COL_PURCHASE,
    COL_SELLING,
    COL_FEE,
    COL_PAYMENT,
    COL_DESCRIPTION,
];

const REQUIRED_COLUMNS: [&str; 6] = [COL_DATE, COL_CUSTOMER, COL_PRODUCT, COL_PURCHASE, COL_SELLING, COL_PAYMENT];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Splits the upload into rows keyed by column name. Header names are
/// matched case-insensitively and may come in any order; unknown columns are
/// ignored. Blank lines are skipped.
pub fn parse_sales_csv(text: &str) -> Result<Vec<CsvRow>, AppError> {
    // Spreadsheet exports sometimes start with a byte order mark.
    let text = text.trim_start_matches('\u{feff}');
    if text.trim().is_empty() {
        return Err(AppError::CsvParse("file is empty".to_string()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();

    let header = records
        .next()
        .ok_or_else(|| AppError::CsvParse("file has no header row".to_string()))?
        .map_err(|e| AppError::CsvParse(format!("header: {}", e)))?;

    let mut column_index: HashMap<&'static str, usize> = HashMap::new();
    for (idx, name) in header.iter().enumerate() {
        let normalized = name.trim().to_ascii_lowercase();
        if let Some(column) = SALES_COLUMNS.iter().find(|c| **c == normalized) {
            column_index.entry(*column).or_insert(idx);
        }
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !column_index.contains_key(*c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AppError::MissingCsvColumns(missing));
    }

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| AppError::CsvParse(e.to_string()))?;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }

        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);

        let fields = column_index
            .iter()
            .map(|(column, idx)| (*column, record.get(*idx).unwrap_or_default().to_string()))
            .collect();

        rows.push(CsvRow { line, fields });
    }

    Ok(rows)
}

fn non_empty<'a>(row: &'a CsvRow, column: &str) -> Option<&'a str> {
    let value = row.get(column);
    if value.is_empty() { None } else { Some(value) }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

fn parse_amount(raw: &str) -> Result<Decimal, &'static str> {
    let amount = Decimal::from_str(raw).map_err(|_| "Harus berupa angka.")?;
    match amount_problem(&amount) {
        Some((_, message)) => Err(message),
        None => Ok(amount),
    }
}

/// Checks one row. Every failing field is reported; a valid row also
/// carries the parsed sale.
pub fn validate_row(row: &CsvRow) -> RowValidation {
    let mut errors = Vec::new();
    let mut fail = |field: &str, message: String| {
        errors.push(FieldError { field: field.to_string(), message });
    };

    let required = |column: &str| non_empty(row, column);

    let transaction_date = match required(COL_DATE) {
        None => {
            fail(COL_DATE, "Wajib diisi.".to_string());
            None
        }
        Some(raw) => {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                fail(COL_DATE, format!("Tanggal '{}' tidak valid, gunakan YYYY-MM-DD.", raw));
            }
            parsed
        }
    };

    let customer_name = match required(COL_CUSTOMER) {
        None => {
            fail(COL_CUSTOMER, "Wajib diisi.".to_string());
            None
        }
        Some(name) => Some(name.to_string()),
    };

    let product_type = match required(COL_PRODUCT) {
        None => {
            fail(COL_PRODUCT, "Wajib diisi.".to_string());
            None
        }
        Some(raw) => match raw.parse::<ProductType>() {
            Ok(value) => Some(value),
            Err(_) => {
                fail(
                    COL_PRODUCT,
                    format!("'{}' tidak dikenal. Pilihan: {}.", raw, ProductType::allowed_values()),
                );
                None
            }
        },
    };

    let payment_method = match required(COL_PAYMENT) {
        None => {
            fail(COL_PAYMENT, "Wajib diisi.".to_string());
            None
        }
        Some(raw) => match raw.parse::<PaymentMethod>() {
            Ok(value) => Some(value),
            Err(_) => {
                fail(
                    COL_PAYMENT,
                    format!("'{}' tidak dikenal. Pilihan: {}.", raw, PaymentMethod::allowed_values()),
                );
                None
            }
        },
    };

    let mut amount = |column: &'static str, is_required: bool| -> Option<Decimal> {
        match required(column) {
            None if is_required => {
                fail(column, "Wajib diisi.".to_string());
                None
            }
            None => Some(Decimal::ZERO),
            Some(raw) => match parse_amount(raw) {
                Ok(value) => Some(value),
                Err(message) => {
                    fail(column, message.to_string());
                    None
                }
            },
        }
    };

    let purchase_price = amount(COL_PURCHASE, true);
    let selling_price = amount(COL_SELLING, true);
    let marketplace_fee = amount(COL_FEE, false);

    let description = required(COL_DESCRIPTION).map(str::to_string);

    let sale = match (
        transaction_date,
        customer_name,
        product_type,
        purchase_price,
        selling_price,
        marketplace_fee,
        payment_method,
    ) {
        (
            Some(transaction_date),
            Some(customer_name),
            Some(product_type),
            Some(purchase_price),
            Some(selling_price),
            Some(marketplace_fee),
            Some(payment_method),
        ) => Some(SaleInput {
            transaction_date,
            customer_name,
            product_type,
            purchase_price,
            selling_price,
            marketplace_fee,
            payment_method,
            description,
        }),
        _ => None,
    };

    RowValidation {
        line: row.line,
        is_valid: sale.is_some(),
        errors,
        sale,
    }
}

/// Parses and validates the whole file. A parse failure aborts; invalid rows
/// are only flagged. Input order is preserved and nothing is de-duplicated.
pub fn preview(text: &str) -> Result<ImportPreview, AppError> {
    let rows: Vec<RowValidation> = parse_sales_csv(text)?.iter().map(validate_row).collect();
    let valid_count = rows.iter().filter(|r| r.is_valid).count();

    Ok(ImportPreview {
        invalid_count: rows.len() - valid_count,
        valid_count,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "transaction_date,customer_name,product_type,purchase_price,selling_price,marketplace_fee,payment_method,description";

    fn row(pairs: &[(&'static str, &str)]) -> CsvRow {
        CsvRow {
            line: 2,
            fields: pairs.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        }
    }

    fn complete_row() -> CsvRow {
        row(&[
            (COL_DATE, "2024-05-15"),
            (COL_CUSTOMER, "Budi"),
            (COL_PRODUCT, "handphone"),
            (COL_PURCHASE, "1200000"),
            (COL_SELLING, "1500000"),
            (COL_FEE, "25000"),
            (COL_PAYMENT, "qris"),
            (COL_DESCRIPTION, "Samsung A15"),
        ])
    }

    fn error_fields(result: &RowValidation) -> Vec<&str> {
        result.errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn complete_rows_are_valid() {
        let result = validate_row(&complete_row());
        assert!(result.is_valid, "{:?}", result.errors);
        let sale = result.sale.expect("parsed sale");
        assert_eq!(sale.product_type, ProductType::Handphone);
        assert_eq!(sale.gross_margin(), Decimal::from(275_000));
        assert_eq!(sale.description.as_deref(), Some("Samsung A15"));
    }

    #[test]
    fn unknown_enum_values_are_reported_per_field() {
        let mut bad = complete_row();
        bad.fields.insert(COL_PRODUCT, "kulkas".into());
        bad.fields.insert(COL_PAYMENT, "bitcoin".into());

        let result = validate_row(&bad);
        assert!(!result.is_valid);
        assert!(result.sale.is_none());
        assert_eq!(error_fields(&result), vec![COL_PRODUCT, COL_PAYMENT]);
    }

    #[test]
    fn impossible_dates_and_negative_numbers_are_rejected() {
        let mut bad = complete_row();
        bad.fields.insert(COL_DATE, "2024-02-30".into());
        bad.fields.insert(COL_SELLING, "-10".into());
        bad.fields.insert(COL_FEE, "abc".into());

        let result = validate_row(&bad);
        assert_eq!(error_fields(&result), vec![COL_DATE, COL_SELLING, COL_FEE]);
    }

    #[test]
    fn amounts_that_do_not_fit_the_columns_are_row_errors() {
        let mut bad = complete_row();
        bad.fields.insert(COL_SELLING, "99999999999999999".into());
        bad.fields.insert(COL_FEE, "0.001".into());

        let result = validate_row(&bad);
        assert!(!result.is_valid);
        assert!(result.sale.is_none());
        assert_eq!(error_fields(&result), vec![COL_SELLING, COL_FEE]);

        let mut ok = complete_row();
        ok.fields.insert(COL_SELLING, "9999999999999.99".into());
        ok.fields.insert(COL_FEE, "2500.50".into());
        assert!(validate_row(&ok).is_valid);
    }

    #[test]
    fn missing_required_fields_are_all_listed() {
        let result = validate_row(&row(&[]));
        assert_eq!(
            error_fields(&result),
            vec![COL_DATE, COL_CUSTOMER, COL_PRODUCT, COL_PAYMENT, COL_PURCHASE, COL_SELLING]
        );
    }

    #[test]
    fn optional_fields_may_be_blank() {
        let mut ok = complete_row();
        ok.fields.insert(COL_FEE, "".into());
        ok.fields.remove(COL_DESCRIPTION);
        ok.fields.insert(COL_DATE, "15/05/2024".into());

        let result = validate_row(&ok);
        assert!(result.is_valid, "{:?}", result.errors);
        let sale = result.sale.unwrap();
        assert_eq!(sale.marketplace_fee, Decimal::ZERO);
        assert_eq!(sale.description, None);
        assert_eq!(sale.transaction_date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    }

    #[test]
    fn headers_are_case_insensitive_and_reorderable() {
        let text = "\
Payment_Method, SELLING_PRICE ,Customer_Name,product_type,Purchase_Price,Transaction_Date,extra
tunai,200000,Ani,Aksesoris,150000,2024-05-01,ignored
";
        let rows = parse_sales_csv(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(COL_CUSTOMER), "Ani");
        assert_eq!(rows[0].get(COL_SELLING), "200000");
        assert_eq!(rows[0].get(COL_FEE), "");
        assert!(validate_row(&rows[0]).is_valid);
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let text = format!(
            "{}\n2024-05-02,\"Toko Maju, Tbk\",laptop,5000000,5600000,0,transfer,\"Asus, 14\"\" layar\"\n",
            HEADER
        );
        let rows = parse_sales_csv(&text).unwrap();
        assert_eq!(rows[0].get(COL_CUSTOMER), "Toko Maju, Tbk");
        assert_eq!(rows[0].get(COL_DESCRIPTION), "Asus, 14\" layar");
    }

    #[test]
    fn missing_header_columns_abort_the_import() {
        let err = parse_sales_csv("transaction_date,customer_name\n2024-05-01,Ani\n").unwrap_err();
        match err {
            AppError::MissingCsvColumns(cols) => {
                assert_eq!(cols, vec![COL_PRODUCT, COL_PURCHASE, COL_SELLING, COL_PAYMENT]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(parse_sales_csv("  \n"), Err(AppError::CsvParse(_))));
    }

    #[test]
    fn preview_keeps_order_and_counts_invalid_rows() {
        let text = format!(
            "{}\n\
2024-05-01,Ani,aksesoris,10000,25000,0,tunai,\n\
2024-13-45,Budi,handphone,1000000,1200000,0,qris,\n\
\n\
2024-05-03,Citra,tablet,2000000,2300000,15000,debit,Promo\n",
            HEADER
        );

        let preview = preview(&text).unwrap();
        assert_eq!(preview.valid_count, 2);
        assert_eq!(preview.invalid_count, 1);
        assert_eq!(preview.rows.len(), 3);
        assert!(preview.rows[0].is_valid);
        assert!(!preview.rows[1].is_valid);
        assert_eq!(error_fields(&preview.rows[1]), vec![COL_DATE]);
        assert_eq!(preview.rows[1].line, 3);

        let names: Vec<_> = preview.valid_sales().map(|s| s.customer_name.as_str()).collect();
        assert_eq!(names, vec!["Ani", "Citra"]);
    }

    #[test]
    fn duplicate_rows_are_not_collapsed() {
        let line = "2024-05-01,Ani,aksesoris,10000,25000,0,tunai,";
        let text = format!("{}\n{}\n{}\n", HEADER, line, line);
        let preview = preview(&text).unwrap();
        assert_eq!(preview.valid_count, 2);
    }
}
