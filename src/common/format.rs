// src/common/format.rs
//
// Indonesian presentation helpers shared by the PDF report, the CSV export
// and the AI summary payload.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

const MONTHS_ID: [&str; 12] = [
    "Januari", "Februari", "Maret", "April", "Mei", "Juni",
    "Juli", "Agustus", "September", "Oktober", "November", "Desember",
];

pub fn month_name_id(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS_ID.get(i as usize))
        .copied()
        .unwrap_or("")
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// `1500000` -> `Rp 1.500.000`. Whole rupiah, no decimals.
pub fn format_rupiah(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}Rp {}", sign, group_thousands(&digits))
}

/// `12.5` -> `+12,5%`
pub fn format_percent(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded = Decimal::ZERO;
    }
    let sign = if rounded > Decimal::ZERO { "+" } else { "" };
    let text = format!("{:.1}", rounded).replace('.', ",");
    format!("{}{}%", sign, text)
}

/// `2024-05-15` -> `15 Mei 2024`
pub fn format_date_id(date: NaiveDate) -> String {
    format!("{} {} {}", date.day(), month_name_id(date.month()), date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("decimal literal")
    }

    #[test]
    fn rupiah_uses_dot_grouping_without_decimals() {
        assert_eq!(format_rupiah(dec("1500000")), "Rp 1.500.000");
        assert_eq!(format_rupiah(dec("0")), "Rp 0");
        assert_eq!(format_rupiah(dec("999")), "Rp 999");
        assert_eq!(format_rupiah(dec("1000")), "Rp 1.000");
        assert_eq!(format_rupiah(dec("123456789")), "Rp 123.456.789");
    }

    #[test]
    fn rupiah_rounds_to_whole_units() {
        assert_eq!(format_rupiah(dec("1499.5")), "Rp 1.500");
        assert_eq!(format_rupiah(dec("1499.49")), "Rp 1.499");
        assert_eq!(format_rupiah(dec("-0.4")), "Rp 0");
    }

    #[test]
    fn rupiah_negative_amounts_lead_with_a_minus() {
        assert_eq!(format_rupiah(dec("-250000")), "-Rp 250.000");
    }

    #[test]
    fn percent_uses_a_decimal_comma() {
        assert_eq!(format_percent(dec("12.5")), "+12,5%");
        assert_eq!(format_percent(dec("-50")), "-50,0%");
        assert_eq!(format_percent(dec("0")), "0,0%");
        assert_eq!(format_percent(dec("33.333")), "+33,3%");
        assert_eq!(format_percent(dec("-0.01")), "0,0%");
    }

    #[test]
    fn dates_use_indonesian_month_names() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert_eq!(format_date_id(date), "15 Mei 2024");
        assert_eq!(month_name_id(12), "Desember");
        assert_eq!(month_name_id(0), "");
        assert_eq!(month_name_id(13), "");
    }
}
