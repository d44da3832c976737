//! Calendar helpers used to turn chart points into transaction date filters.

use chrono::{Datelike, NaiveDate};

/// Errors produced when a chart label or data date cannot be read as a date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateLabelError {
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid month label `{0}`, expected YYYY-MM")]
    InvalidYearMonth(String),
    #[error("invalid year label `{0}`")]
    InvalidYear(String),
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Last day of a month (1-indexed), accounting for leap years.
///
/// Month values outside 1..=12 roll over into the neighbouring years the way
/// calendar arithmetic does: month 13 is January of the next year and month 0
/// is December of the previous one.
pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (year, month) = normalize_month(year, i64::from(month));
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// Fold an arbitrary 1-indexed month offset back into a (year, 1..=12) pair.
fn normalize_month(year: i32, month: i64) -> (i32, u32) {
    let absolute = i64::from(year) * 12 + (month - 1);
    let year = absolute.div_euclid(12);
    let month = absolute.rem_euclid(12) + 1;
    (year.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32, month as u32)
}

/// Format a date as zero-padded `YYYY-MM-DD`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` date. A trailing time part (`2024-03-17T10:00:00Z`) is ignored.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, DateLabelError> {
    let date_part = value.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| DateLabelError::InvalidDate(value.to_string()))
}

/// Parse a `"YYYY-MM"` chart label into (year, month).
///
/// Anything after the first space is ignored so labels such as
/// `"2024-03 March"` resolve to the same month.
pub fn parse_year_month(label: &str) -> Result<(i32, u32), DateLabelError> {
    let invalid = || DateLabelError::InvalidYearMonth(label.to_string());
    let head = label.trim().split(' ').next().unwrap_or_default();
    let (year, month) = head.split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month.parse::<u32>().map_err(|_| invalid())?;
    if (1..=12).contains(&month) {
        Ok((year, month))
    } else {
        Err(invalid())
    }
}

/// Parse a year label such as `"2023"`.
pub fn parse_year(label: &str) -> Result<i32, DateLabelError> {
    label
        .trim()
        .parse::<i32>()
        .map_err(|_| DateLabelError::InvalidYear(label.to_string()))
}

/// An inclusive `[start, end]` date range sent to the transactions view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First through last day of the given month. `None` for months outside 1..=12.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = NaiveDate::from_ymd_opt(year, month, last_day_of_month(year, month))?;
        Some(Self { start, end })
    }

    /// January 1st through December 31st.
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// First day of the date's month through the date itself.
    pub fn month_to_date(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        Self { start, end: date }
    }

    /// Full month window `offset` months after the month containing `first`.
    pub fn nth_month_from(first: NaiveDate, offset: usize) -> Option<Self> {
        let offset = i64::try_from(offset).ok()?;
        let (year, month) = normalize_month(first.year(), i64::from(first.month()) + offset);
        Self::month(year, month)
    }

    pub fn start_iso(&self) -> String {
        format_iso(self.start)
    }

    pub fn end_iso(&self) -> String {
        format_iso(self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2024, 2), 29);
        assert_eq!(last_day_of_month(2023, 2), 28);
        assert_eq!(last_day_of_month(2024, 4), 30);
        assert_eq!(last_day_of_month(2024, 12), 31);
        assert_eq!(last_day_of_month(1900, 2), 28);
        assert_eq!(last_day_of_month(2000, 2), 29);
    }

    #[test]
    fn test_last_day_of_month_rolls_over_out_of_range_months() {
        // Month 13 is January of the following year, month 0 December of the previous one
        assert_eq!(last_day_of_month(2023, 13), 31);
        assert_eq!(last_day_of_month(2024, 0), 31);
        // Month 14 of 2023 is February 2024
        assert_eq!(last_day_of_month(2023, 14), 29);
    }

    #[test]
    fn test_month_window() {
        let window = DateWindow::month(2024, 2).unwrap();
        assert_eq!(window.start_iso(), "2024-02-01");
        assert_eq!(window.end_iso(), "2024-02-29");
        assert!(DateWindow::month(2024, 13).is_none());
    }

    #[test]
    fn test_year_window() {
        let window = DateWindow::year(2023).unwrap();
        assert_eq!(window.start_iso(), "2023-01-01");
        assert_eq!(window.end_iso(), "2023-12-31");
    }

    #[test]
    fn test_month_to_date() {
        let window = DateWindow::month_to_date(date(2024, 3, 17));
        assert_eq!(window.start_iso(), "2024-03-01");
        assert_eq!(window.end_iso(), "2024-03-17");
    }

    #[test]
    fn test_nth_month_from_crosses_year_boundary() {
        let first = date(2023, 11, 1);
        let window = DateWindow::nth_month_from(first, 3).unwrap();
        assert_eq!(window.start_iso(), "2024-02-01");
        assert_eq!(window.end_iso(), "2024-02-29");
    }

    #[test]
    fn test_format_iso_zero_pads() {
        assert_eq!(format_iso(date(987, 1, 5)), "0987-01-05");
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_year_month("2024-03"), Ok((2024, 3)));
        assert_eq!(parse_year_month("2024-03 March"), Ok((2024, 3)));
        assert!(parse_year_month("2024-13").is_err());
        assert!(parse_year_month("2024").is_err());
        assert!(parse_year_month("March 2024").is_err());
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_iso_date("2024-03-17"), Ok(date(2024, 3, 17)));
        assert_eq!(parse_iso_date("2024-03-17T08:30:00Z"), Ok(date(2024, 3, 17)));
        assert!(parse_iso_date("17/03/2024").is_err());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year(" 2023 "), Ok(2023));
        assert_eq!(
            parse_year("last year"),
            Err(DateLabelError::InvalidYear("last year".to_string()))
        );
    }
}
