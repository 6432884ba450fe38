//! Gross-margin analysis: headline figures and per-dimension breakdowns.

use std::collections::BTreeMap;

use crate::analyzers::types::{MarginBreakdownRow, MarginSummary};
use crate::period::Period;
use crate::record::{Dimension, Record};

/// Headline margin figures for the record set. Returns `None` when the set
/// is empty.
pub fn margin_summary(records: &[Record]) -> Option<MarginSummary> {
    if records.is_empty() {
        return None;
    }

    let total_margin: f64 = records.iter().map(|r| r.margin).sum();
    let total_sales: f64 = records.iter().map(|r| r.sales).sum();
    let average_margin_percent = if total_sales != 0.0 {
        total_margin / total_sales * 100.0
    } else {
        0.0
    };

    let latest = records.iter().map(|r| r.period).max()?;
    let sum_for = |period: Period| -> f64 {
        records
            .iter()
            .filter(|r| r.period == period)
            .map(|r| r.margin)
            .sum()
    };

    let growth_rate = latest.previous().and_then(|previous| {
        let previous_margin = sum_for(previous);
        if previous_margin > 0.0 {
            Some((sum_for(latest) - previous_margin) / previous_margin * 100.0)
        } else {
            None
        }
    });

    Some(MarginSummary {
        total_margin,
        total_sales,
        average_margin_percent,
        growth_rate,
    })
}

/// Margin and margin-percent per dimension member, sorted by
/// margin-percent descending. A member with zero sales reports 0%.
pub fn margin_by_dimension(records: &[Record], dimension: Dimension) -> Vec<MarginBreakdownRow> {
    let mut sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = sums.entry(dimension.key(record).to_string()).or_default();
        entry.0 += record.margin;
        entry.1 += record.sales;
    }

    let mut rows: Vec<MarginBreakdownRow> = sums
        .into_iter()
        .map(|(key, (margin, sales))| MarginBreakdownRow {
            key,
            margin,
            sales,
            margin_percent: if sales != 0.0 {
                margin / sales * 100.0
            } else {
                0.0
            },
        })
        .collect();

    rows.sort_by(|a, b| {
        b.margin_percent
            .total_cmp(&a.margin_percent)
            .then_with(|| a.key.cmp(&b.key))
    });
    rows
}
