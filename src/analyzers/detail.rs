//! The per-category detail view: every (grouping, store, division)
//! combination with month-over-month changes and within-division ranks.

use crate::analyzers::derive::{difference, percent_change};
use crate::analyzers::pivot::pivot_composite;
use crate::analyzers::ranking::rank_partitioned;
use crate::analyzers::types::{CombinedView, DetailView, PivotTable};
use crate::record::{Dimension, Metric, Record};

/// Builds the detail view. Returns `None` for an empty record set.
///
/// Rows are ordered by (division, rank); ranks are min-tie over each row's
/// total sales, restarting at 1 within each division.
pub fn detail_view(records: &[Record]) -> Option<DetailView> {
    if records.is_empty() {
        return None;
    }

    let base = pivot_composite(
        records,
        &[Dimension::Grouping, Dimension::Store, Dimension::Division],
        Metric::Sales,
    );

    let total_sales: Vec<f64> = base.values.iter().map(|row| row.iter().sum()).collect();
    let divisions: Vec<String> = base
        .row_keys
        .iter()
        .map(|key| key.parts()[2].clone())
        .collect();
    let ranks = rank_partitioned(&divisions, &total_sales, false);

    let mut order: Vec<usize> = (0..base.row_keys.len()).collect();
    order.sort_by(|&a, &b| {
        divisions[a]
            .cmp(&divisions[b])
            .then(ranks[a].cmp(&ranks[b]))
            .then(base.row_keys[a].cmp(&base.row_keys[b]))
    });

    let sorted = PivotTable {
        row_keys: order.iter().map(|&i| base.row_keys[i].clone()).collect(),
        periods: base.periods.clone(),
        values: order.iter().map(|&i| base.values[i].clone()).collect(),
    };
    let total_sales: Vec<f64> = order.iter().map(|&i| total_sales[i]).collect();
    let ranks: Vec<u32> = order.iter().map(|&i| ranks[i]).collect();

    let derived = vec![difference(&sorted), percent_change(&sorted)];
    let view = CombinedView {
        metric_label: Metric::Sales.label(),
        base: sorted,
        derived,
    };

    Some(DetailView {
        view,
        total_sales,
        ranks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;

    fn record(grouping: &str, store: &str, division: &str, month: u32, sales: f64) -> Record {
        Record {
            grouping: grouping.to_string(),
            store: store.to_string(),
            division: division.to_string(),
            period: Period::from_ym(2025, month).unwrap(),
            sales,
            cost: 0.0,
            margin: sales,
            stock_value: 0.0,
        }
    }

    #[test]
    fn test_empty_records_yield_no_view() {
        assert!(detail_view(&[]).is_none());
    }

    #[test]
    fn test_ranks_restart_within_each_division() {
        let records = vec![
            record("BZR SNACK", "Store A", "BZR", 1, 50.0),
            record("BZR DRINK", "Store A", "BZR", 1, 70.0),
            record("GRC MILK", "Store A", "GRC+FRS", 1, 10.0),
            record("GRC BREAD", "Store A", "GRC+FRS", 1, 30.0),
        ];

        let detail = detail_view(&records).unwrap();

        // Both divisions contain a rank-1 row.
        let rank_one: Vec<&str> = detail
            .view
            .base
            .row_keys
            .iter()
            .zip(&detail.ranks)
            .filter(|(_, rank)| **rank == 1)
            .map(|(key, _)| key.parts()[0].as_str())
            .collect();
        assert_eq!(rank_one, vec!["BZR DRINK", "GRC BREAD"]);
    }

    #[test]
    fn test_rows_ordered_by_division_then_rank() {
        let records = vec![
            record("GRC MILK", "Store A", "GRC+FRS", 1, 10.0),
            record("BZR DRINK", "Store A", "BZR", 1, 70.0),
            record("BZR SNACK", "Store A", "BZR", 1, 90.0),
        ];

        let detail = detail_view(&records).unwrap();

        let order: Vec<(String, u32)> = detail
            .view
            .base
            .row_keys
            .iter()
            .zip(&detail.ranks)
            .map(|(key, rank)| (key.parts()[0].clone(), *rank))
            .collect();
        assert_eq!(
            order,
            vec![
                ("BZR SNACK".to_string(), 1),
                ("BZR DRINK".to_string(), 2),
                ("GRC MILK".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_total_sales_spans_all_periods() {
        let records = vec![
            record("BZR SNACK", "Store A", "BZR", 1, 50.0),
            record("BZR SNACK", "Store A", "BZR", 2, 25.0),
        ];

        let detail = detail_view(&records).unwrap();
        assert_eq!(detail.total_sales, vec![75.0]);
    }

    #[test]
    fn test_changes_attached_by_kind() {
        use crate::analyzers::types::DerivationKind;

        let records = vec![
            record("BZR SNACK", "Store A", "BZR", 1, 50.0),
            record("BZR SNACK", "Store A", "BZR", 2, 75.0),
        ];

        let detail = detail_view(&records).unwrap();
        assert_eq!(
            detail.view.cell(0, Some(DerivationKind::Difference), 1),
            Some(25.0)
        );
        assert_eq!(
            detail.view.cell(0, Some(DerivationKind::PercentChange), 1),
            Some(50.0)
        );
    }
}
