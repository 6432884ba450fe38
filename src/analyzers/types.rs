//! Data types produced by the aggregation pipeline.
//!
//! Computation tables carry typed values only: `f64` for summed cells and
//! `Option<f64>` for derived cells, where `None` is the explicit "no value"
//! marker (no prior period, zero denominator). Formatting belongs to the
//! presentation layer.

use serde::Serialize;

use crate::period::Period;
use crate::record::Dimension;

/// Sentinel label of the appended totals row.
pub const GRAND_TOTAL_LABEL: &str = "Grand Total";

/// A pivot row key. Composite keys keep their parts separate; they are only
/// joined for display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RowKey(Vec<String>);

impl RowKey {
    pub fn single(value: impl Into<String>) -> Self {
        RowKey(vec![value.into()])
    }

    pub fn composite(parts: Vec<String>) -> Self {
        RowKey(parts)
    }

    pub fn grand_total() -> Self {
        RowKey(vec![GRAND_TOTAL_LABEL.to_string()])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    pub fn label(&self) -> String {
        self.0.join(" / ")
    }

    pub fn is_grand_total(&self) -> bool {
        self.0.len() == 1 && self.0[0] == GRAND_TOTAL_LABEL
    }
}

/// A metric summed over one dimension (rows) and the period axis (columns).
///
/// Periods are sorted chronologically; cells with no contributing records
/// hold 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub row_keys: Vec<RowKey>,
    pub periods: Vec<Period>,
    /// `values[row][period]`, dense.
    pub values: Vec<Vec<f64>>,
}

impl PivotTable {
    pub fn value(&self, row: usize, period: usize) -> f64 {
        self.values[row][period]
    }

    pub fn row_position(&self, key: &RowKey) -> Option<usize> {
        self.row_keys.iter().position(|k| k == key)
    }

    pub fn period_position(&self, period: Period) -> Option<usize> {
        self.periods.iter().position(|p| *p == period)
    }

    pub fn has_grand_total(&self) -> bool {
        self.row_keys.last().is_some_and(RowKey::is_grand_total)
    }

    /// Column-wise sums over all non-total rows.
    pub fn column_totals(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.periods.len()];
        for (key, row) in self.row_keys.iter().zip(&self.values) {
            if key.is_grand_total() {
                continue;
            }
            for (total, value) in totals.iter_mut().zip(row) {
                *total += value;
            }
        }
        totals
    }

    /// Appends the grand-total row. A table that already carries one is
    /// returned unchanged.
    pub fn with_grand_total(mut self) -> PivotTable {
        if self.has_grand_total() {
            return self;
        }
        let totals = self.column_totals();
        self.row_keys.push(RowKey::grand_total());
        self.values.push(totals);
        self
    }
}

/// The derivations that can be layered over a pivot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DerivationKind {
    Difference,
    PercentChange,
    Contribution,
}

impl DerivationKind {
    pub fn label(&self) -> &'static str {
        match self {
            DerivationKind::Difference => "Difference",
            DerivationKind::PercentChange => "Percent Change",
            DerivationKind::Contribution => "Contribution",
        }
    }
}

/// A pivot-shaped table of derived cells. `None` marks an undefined cell.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub kind: DerivationKind,
    pub row_keys: Vec<RowKey>,
    pub periods: Vec<Period>,
    /// `cells[row][period]`, aligned with the source pivot.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl DerivedTable {
    pub fn cell(&self, row: usize, period: usize) -> Option<f64> {
        self.cells[row][period]
    }
}

/// A base pivot with derivations attached side by side, each tagged by
/// kind. A cell is addressed by (row, kind, period); tables are never
/// merged.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedView {
    pub metric_label: &'static str,
    pub base: PivotTable,
    pub derived: Vec<DerivedTable>,
}

impl CombinedView {
    /// Looks up a cell. `kind == None` addresses the base pivot.
    pub fn cell(&self, row: usize, kind: Option<DerivationKind>, period: usize) -> Option<f64> {
        match kind {
            None => Some(self.base.value(row, period)),
            Some(kind) => self
                .derived
                .iter()
                .find(|table| table.kind == kind)
                .and_then(|table| table.cell(row, period)),
        }
    }
}

/// One ranked dimension member. Ties share the lowest rank among the tied
/// members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub key: String,
    pub value: f64,
    pub rank: u32,
}

/// Two metrics joined on a shared dimension with a per-cell ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossMetricTable {
    pub dimension: Dimension,
    pub primary_label: &'static str,
    pub secondary_label: &'static str,
    pub row_keys: Vec<String>,
    /// Chronological union of both sides' period axes.
    pub periods: Vec<Period>,
    pub primary: Vec<Vec<f64>>,
    pub secondary: Vec<Vec<f64>>,
    /// secondary / primary × 100; `None` where the primary cell is 0.
    pub ratios: Vec<Vec<Option<f64>>>,
}

/// The per-category detail view: a composite pivot with month-over-month
/// changes, per-row totals, and ranks restarting within each division.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub view: CombinedView,
    /// Per-row sum across all periods, aligned with the view's rows.
    pub total_sales: Vec<f64>,
    /// Min-tie rank of `total_sales` within the row's division.
    pub ranks: Vec<u32>,
}

/// Headline gross-margin figures for the selected records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginSummary {
    pub total_margin: f64,
    pub total_sales: f64,
    pub average_margin_percent: f64,
    /// Latest month vs the immediately preceding calendar month; `None`
    /// when the prior month's margin is not positive.
    pub growth_rate: Option<f64>,
}

/// Margin broken down by one dimension member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarginBreakdownRow {
    pub key: String,
    pub margin: f64,
    pub sales: f64,
    pub margin_percent: f64,
}
