//! Calendar month+year keys for the period axis.
//!
//! Periods order chronologically, never by their display label.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;

const FULL_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const ABBREVIATED_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Month-name format accepted when resolving a period.
///
/// Full names are the primary format; abbreviated names are the fallback
/// applied only when no row in the input resolves with full names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFormat {
    Full,
    Abbreviated,
}

/// A calendar month pinned to its first day, so periods sort by date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Period(NaiveDate);

impl Period {
    /// Resolves a year and a month name into a period.
    ///
    /// Returns `None` when the month name does not match the requested
    /// format or the year is out of chrono's supported range.
    pub fn resolve(year: i32, month: &str, format: MonthFormat) -> Option<Period> {
        let names: &[&str; 12] = match format {
            MonthFormat::Full => &FULL_MONTHS,
            MonthFormat::Abbreviated => &ABBREVIATED_MONTHS,
        };

        let month = month.trim();
        let index = names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(month))?;

        Period::from_ym(year, index as u32 + 1)
    }

    pub fn from_ym(year: i32, month: u32) -> Option<Period> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Period)
    }

    /// Display label, e.g. `"Jan 2025"`.
    pub fn label(&self) -> String {
        self.0.format("%b %Y").to_string()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month_number(&self) -> u32 {
        self.0.month()
    }

    /// Full month name, e.g. `"January"`.
    pub fn month_name(&self) -> &'static str {
        FULL_MONTHS[self.0.month0() as usize]
    }

    /// The immediately preceding calendar month.
    pub fn previous(&self) -> Option<Period> {
        self.0.checked_sub_months(Months::new(1)).map(Period)
    }

    /// Case-insensitive match against the full or abbreviated month name.
    pub fn matches_month_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.month_name().eq_ignore_ascii_case(name)
            || ABBREVIATED_MONTHS[self.0.month0() as usize].eq_ignore_ascii_case(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_full_month_name() {
        let p = Period::resolve(2024, "January", MonthFormat::Full).unwrap();
        assert_eq!(p.year(), 2024);
        assert_eq!(p.month_number(), 1);
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let p = Period::resolve(2024, "FEBRUARY", MonthFormat::Full).unwrap();
        assert_eq!(p.month_number(), 2);
    }

    #[test]
    fn test_resolve_abbreviated_rejected_by_full_format() {
        assert!(Period::resolve(2024, "Feb", MonthFormat::Full).is_none());
        assert!(Period::resolve(2024, "Feb", MonthFormat::Abbreviated).is_some());
    }

    #[test]
    fn test_ordering_is_chronological_not_lexicographic() {
        // "Apr 2025" sorts before "Jan 2024" as a string; chronologically it
        // comes after.
        let apr_2025 = Period::resolve(2025, "April", MonthFormat::Full).unwrap();
        let jan_2024 = Period::resolve(2024, "January", MonthFormat::Full).unwrap();

        assert!(apr_2025.label() < jan_2024.label());
        assert!(apr_2025 > jan_2024);
    }

    #[test]
    fn test_label() {
        let p = Period::from_ym(2025, 3).unwrap();
        assert_eq!(p.label(), "Mar 2025");
    }

    #[test]
    fn test_previous_crosses_year_boundary() {
        let jan = Period::from_ym(2025, 1).unwrap();
        let prev = jan.previous().unwrap();
        assert_eq!(prev.year(), 2024);
        assert_eq!(prev.month_number(), 12);
    }

    #[test]
    fn test_matches_month_name() {
        let p = Period::from_ym(2025, 9).unwrap();
        assert!(p.matches_month_name("September"));
        assert!(p.matches_month_name("sep"));
        assert!(!p.matches_month_name("Oct"));
    }
}
