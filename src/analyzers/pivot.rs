//! Groups records by dimension and period and sums a metric per cell.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::analyzers::types::{PivotTable, RowKey};
use crate::analyzers::utility::mean;
use crate::period::Period;
use crate::record::{Dimension, Metric, Record};

/// How `aggregate_by` folds the per-key series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
}

/// Pivots a metric over a single dimension. Rows sort ascending by key,
/// columns chronologically; absent (key, period) pairs are filled with 0.
pub fn pivot(records: &[Record], dimension: Dimension, metric: Metric) -> PivotTable {
    pivot_composite(records, &[dimension], metric)
}

/// Pivots a metric over a composite row key built from several dimensions,
/// in the given order.
pub fn pivot_composite(
    records: &[Record],
    dimensions: &[Dimension],
    metric: Metric,
) -> PivotTable {
    let periods: Vec<Period> = records
        .iter()
        .map(|r| r.period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let row_keys: Vec<RowKey> = records
        .iter()
        .map(|r| composite_key(r, dimensions))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let period_index: HashMap<Period, usize> =
        periods.iter().enumerate().map(|(i, p)| (*p, i)).collect();
    let row_index: HashMap<RowKey, usize> = row_keys
        .iter()
        .enumerate()
        .map(|(i, k)| (k.clone(), i))
        .collect();

    let mut values = vec![vec![0.0; periods.len()]; row_keys.len()];
    for record in records {
        let row = row_index[&composite_key(record, dimensions)];
        let col = period_index[&record.period];
        values[row][col] += metric.value(record);
    }

    PivotTable {
        row_keys,
        periods,
        values,
    }
}

fn composite_key(record: &Record, dimensions: &[Dimension]) -> RowKey {
    RowKey::composite(
        dimensions
            .iter()
            .map(|d| d.key(record).to_string())
            .collect(),
    )
}

/// Collapses the period axis entirely: one aggregate value per dimension
/// member, sorted ascending by key.
pub fn aggregate_by(
    records: &[Record],
    dimension: Dimension,
    metric: Metric,
    aggregation: Aggregation,
) -> Vec<(String, f64)> {
    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        series
            .entry(dimension.key(record).to_string())
            .or_default()
            .push(metric.value(record));
    }

    series
        .into_iter()
        .map(|(key, values)| {
            let aggregate = match aggregation {
                Aggregation::Sum => values.iter().sum(),
                Aggregation::Mean => mean(&values),
            };
            (key, aggregate)
        })
        .collect()
}
