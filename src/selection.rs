//! Record selection: the caller's division/year/month/store/grouping filters.
//!
//! An empty filter axis means "no restriction". A selection that excludes
//! every record is an empty-result condition for the view builders, not an
//! error.

use crate::record::Record;

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub divisions: Vec<String>,
    pub years: Vec<i32>,
    pub months: Vec<String>,
    pub stores: Vec<String>,
    pub groupings: Vec<String>,
}

impl Selection {
    pub fn is_unrestricted(&self) -> bool {
        self.divisions.is_empty()
            && self.years.is_empty()
            && self.months.is_empty()
            && self.stores.is_empty()
            && self.groupings.is_empty()
    }

    fn matches(&self, record: &Record) -> bool {
        let by_label = |allowed: &[String], value: &str| {
            allowed.is_empty() || allowed.iter().any(|a| a.trim().eq_ignore_ascii_case(value))
        };

        by_label(&self.divisions, &record.division)
            && by_label(&self.stores, &record.store)
            && by_label(&self.groupings, &record.grouping)
            && (self.years.is_empty() || self.years.contains(&record.period.year()))
            && (self.months.is_empty()
                || self
                    .months
                    .iter()
                    .any(|m| record.period.matches_month_name(m)))
    }

    /// Returns the records that pass every filter axis, preserving order.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        if self.is_unrestricted() {
            return records.to_vec();
        }
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;

    fn record(division: &str, store: &str, grouping: &str, year: i32, month: u32) -> Record {
        Record {
            grouping: grouping.to_string(),
            store: store.to_string(),
            division: division.to_string(),
            period: Period::from_ym(year, month).unwrap(),
            sales: 1.0,
            cost: 0.5,
            margin: 0.5,
            stock_value: 2.0,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            record("GRC+FRS", "Store A", "GRC MILK", 2024, 1),
            record("GRC+FRS", "Store B", "GRC MILK", 2025, 1),
            record("BZR", "Store A", "BZR SNACK", 2025, 2),
        ]
    }

    #[test]
    fn test_unrestricted_selection_keeps_everything() {
        let selection = Selection::default();
        assert_eq!(selection.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_filters_compose_across_axes() {
        let selection = Selection {
            divisions: vec!["GRC+FRS".to_string()],
            years: vec![2025],
            ..Selection::default()
        };
        let kept = selection.apply(&sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].store, "Store B");
    }

    #[test]
    fn test_month_filter_accepts_abbreviated_names() {
        let selection = Selection {
            months: vec!["feb".to_string()],
            ..Selection::default()
        };
        let kept = selection.apply(&sample());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].division, "BZR");
    }

    #[test]
    fn test_all_excluding_selection_yields_empty_not_error() {
        let selection = Selection {
            stores: vec!["Store Z".to_string()],
            ..Selection::default()
        };
        assert!(selection.apply(&sample()).is_empty());
    }
}
