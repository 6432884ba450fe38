//! Joins two metrics pivoted on the same dimension into one table with a
//! per-cell ratio.

use std::collections::BTreeSet;

use crate::analyzers::pivot::pivot;
use crate::analyzers::types::{CrossMetricTable, PivotTable, RowKey};
use crate::period::Period;
use crate::record::{Dimension, Metric, Record};

/// Combines two single-dimension pivots.
///
/// The period axis is the chronological union of both sides and the row
/// set is the union of both key sets; missing cells are filled with 0
/// before the ratio is computed, so a period covered by only one side
/// yields a 0 on the other. The ratio is secondary / primary × 100,
/// undefined where the primary cell is 0.
pub fn combine_pivots(
    primary: &PivotTable,
    secondary: &PivotTable,
    dimension: Dimension,
    primary_label: &'static str,
    secondary_label: &'static str,
) -> CrossMetricTable {
    let periods: Vec<Period> = primary
        .periods
        .iter()
        .chain(&secondary.periods)
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let row_keys: Vec<String> = primary
        .row_keys
        .iter()
        .chain(&secondary.row_keys)
        .filter(|key| !key.is_grand_total())
        .map(RowKey::label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let cell = |table: &PivotTable, key: &str, period: Period| -> f64 {
        let row = table.row_position(&RowKey::single(key));
        let col = table.period_position(period);
        match (row, col) {
            (Some(row), Some(col)) => table.value(row, col),
            _ => 0.0,
        }
    };

    let mut primary_values = Vec::with_capacity(row_keys.len());
    let mut secondary_values = Vec::with_capacity(row_keys.len());
    let mut ratios = Vec::with_capacity(row_keys.len());

    for key in &row_keys {
        let primary_row: Vec<f64> = periods.iter().map(|p| cell(primary, key, *p)).collect();
        let secondary_row: Vec<f64> = periods.iter().map(|p| cell(secondary, key, *p)).collect();

        let ratio_row: Vec<Option<f64>> = primary_row
            .iter()
            .zip(&secondary_row)
            .map(|(a, b)| if *a == 0.0 { None } else { Some(b / a * 100.0) })
            .collect();

        primary_values.push(primary_row);
        secondary_values.push(secondary_row);
        ratios.push(ratio_row);
    }

    CrossMetricTable {
        dimension,
        primary_label,
        secondary_label,
        row_keys,
        periods,
        primary: primary_values,
        secondary: secondary_values,
        ratios,
    }
}

/// Pivots two metrics from one record set and combines them. Returns
/// `None` for an empty record set (the empty-result condition).
pub fn cross_metric(
    records: &[Record],
    dimension: Dimension,
    primary: Metric,
    secondary: Metric,
) -> Option<CrossMetricTable> {
    if records.is_empty() {
        return None;
    }

    let primary_pivot = pivot(records, dimension, primary);
    let secondary_pivot = pivot(records, dimension, secondary);

    Some(combine_pivots(
        &primary_pivot,
        &secondary_pivot,
        dimension,
        primary.label(),
        secondary.label(),
    ))
}
