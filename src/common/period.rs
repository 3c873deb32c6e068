// src/common/period.rs

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::{error::AppError, format::month_name_id};

/// Inclusive date interval covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthRange {
    pub year: i32,
    pub month: u32,
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub start: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2024-05-31")]
    pub end: NaiveDate,
}

impl MonthRange {
    pub fn new(year: i32, month: u32) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidMonth(format!("{:04}-{:02}", year, month));

        let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self { year, month, start, end })
    }

    /// Parses `YYYY-MM`.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidMonth(raw.to_string());

        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.is_empty() || month.len() > 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn containing(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        // The 1st of any month always has a successor month start.
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(date);
        Self { year: date.year(), month: date.month(), start, end }
    }

    pub fn current() -> Self {
        Self::containing(Utc::now().date_naive())
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.start.pred_opt().unwrap_or(self.start))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// `Mei 2024`
    pub fn label_id(&self) -> String {
        format!("{} {}", month_name_id(self.month), self.year)
    }

    /// `Mei_2024`, used in export file names.
    pub fn file_label(&self) -> String {
        format!("{}_{}", month_name_id(self.month), self.year)
    }
}

// `?month=YYYY-MM`; the current month when absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    #[param(example = "2024-05")]
    pub month: Option<String>,
}

impl MonthQuery {
    pub fn resolve(&self) -> Result<MonthRange, AppError> {
        match self.month.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => MonthRange::parse(raw),
            _ => Ok(MonthRange::current()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn bounds_are_first_and_last_calendar_day() {
        let may = MonthRange::parse("2024-05").unwrap();
        assert_eq!((may.start, may.end), (d(2024, 5, 1), d(2024, 5, 31)));

        let leap_feb = MonthRange::parse("2024-02").unwrap();
        assert_eq!(leap_feb.end, d(2024, 2, 29));

        let feb = MonthRange::parse("2023-02").unwrap();
        assert_eq!(feb.end, d(2023, 2, 28));

        let dec = MonthRange::new(2023, 12).unwrap();
        assert_eq!((dec.start, dec.end), (d(2023, 12, 1), d(2023, 12, 31)));
    }

    #[test]
    fn bounds_do_not_depend_on_the_day_of_month() {
        for day in [1, 15, 30] {
            let range = MonthRange::containing(d(2024, 4, day));
            assert_eq!((range.start, range.end), (d(2024, 4, 1), d(2024, 4, 30)));
        }
        assert_eq!(MonthRange::containing(d(2024, 5, 31)), MonthRange::new(2024, 5).unwrap());
    }

    #[test]
    fn previous_wraps_the_year() {
        let jan = MonthRange::new(2024, 1).unwrap();
        assert_eq!(jan.previous(), MonthRange::new(2023, 12).unwrap());
    }

    #[test]
    fn rejects_malformed_months() {
        for raw in ["2024-13", "2024-00", "24-05", "2024/05", "", "abcd-ef"] {
            assert!(MonthRange::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn contains_is_inclusive() {
        let range = MonthRange::new(2024, 5).unwrap();
        assert!(range.contains(d(2024, 5, 1)));
        assert!(range.contains(d(2024, 5, 31)));
        assert!(!range.contains(d(2024, 6, 1)));
    }

    #[test]
    fn labels_use_indonesian_month_names() {
        let range = MonthRange::new(2024, 5).unwrap();
        assert_eq!(range.label_id(), "Mei 2024");
        assert_eq!(range.file_label(), "Mei_2024");
    }

    #[test]
    fn empty_query_means_current_month() {
        let query = MonthQuery { month: Some("  ".into()) };
        assert_eq!(query.resolve().unwrap(), MonthRange::current());
        assert_eq!(MonthQuery::default().resolve().unwrap(), MonthRange::current());
    }
}
