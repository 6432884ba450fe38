//! Period-over-period derivations over a pivot table.
//!
//! Each derivation returns a table aligned with the source pivot. Cells
//! that have no defined value (first period, zero denominator) carry
//! `None`; a derivation never divides by zero and never aborts the
//! transform.

use crate::analyzers::types::{CombinedView, DerivationKind, DerivedTable, PivotTable};
use crate::error::EngineError;

/// cell[t] − cell[t−1] per row. The first period has no prior and is
/// undefined.
pub fn difference(pivot: &PivotTable) -> DerivedTable {
    let cells = pivot
        .values
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|t| {
                    if t == 0 {
                        None
                    } else {
                        Some(row[t] - row[t - 1])
                    }
                })
                .collect()
        })
        .collect();

    DerivedTable {
        kind: DerivationKind::Difference,
        row_keys: pivot.row_keys.clone(),
        periods: pivot.periods.clone(),
        cells,
    }
}

/// (cell[t] − cell[t−1]) / cell[t−1] × 100 per row. Undefined for the
/// first period and wherever the prior cell is 0.
pub fn percent_change(pivot: &PivotTable) -> DerivedTable {
    let cells = pivot
        .values
        .iter()
        .map(|row| {
            (0..row.len())
                .map(|t| {
                    if t == 0 {
                        return None;
                    }
                    let prior = row[t - 1];
                    if prior == 0.0 {
                        None
                    } else {
                        Some((row[t] - prior) / prior * 100.0)
                    }
                })
                .collect()
        })
        .collect();

    DerivedTable {
        kind: DerivationKind::PercentChange,
        row_keys: pivot.row_keys.clone(),
        periods: pivot.periods.clone(),
        cells,
    }
}

/// cell / grand-total-of-period × 100. The source pivot must already carry
/// its grand-total row; a zero grand total makes the column undefined.
pub fn contribution(pivot: &PivotTable) -> Result<DerivedTable, EngineError> {
    if !pivot.has_grand_total() {
        return Err(EngineError::MissingGrandTotal);
    }
    let Some(totals) = pivot.values.last() else {
        return Err(EngineError::MissingGrandTotal);
    };
    let cells = pivot
        .values
        .iter()
        .map(|row| {
            row.iter()
                .zip(totals)
                .map(|(value, total)| {
                    if *total == 0.0 {
                        None
                    } else {
                        Some(value / total * 100.0)
                    }
                })
                .collect()
        })
        .collect();

    Ok(DerivedTable {
        kind: DerivationKind::Contribution,
        row_keys: pivot.row_keys.clone(),
        periods: pivot.periods.clone(),
        cells,
    })
}

/// Attaches the requested derivations to a base pivot, each tagged by
/// kind.
pub fn combined(
    base: PivotTable,
    metric_label: &'static str,
    kinds: &[DerivationKind],
) -> Result<CombinedView, EngineError> {
    let mut derived = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let table = match kind {
            DerivationKind::Difference => difference(&base),
            DerivationKind::PercentChange => percent_change(&base),
            DerivationKind::Contribution => contribution(&base)?,
        };
        derived.push(table);
    }

    Ok(CombinedView {
        metric_label,
        base,
        derived,
    })
}
