//! Plain-text presentation of computed tables.
//!
//! Everything here consumes typed values (`f64`, `Option<f64>`) and
//! produces strings; nothing formatted ever feeds back into computation.
//! Undefined cells render as `N/A`, never as 0.

use crate::analyzers::types::{
    CombinedView, CrossMetricTable, DerivationKind, DetailView, MarginBreakdownRow, MarginSummary,
    RankedEntry,
};

/// Rounds to a whole number and inserts thousands separators.
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Two-decimal percentage with a direction arrow; `N/A` when undefined.
pub fn format_percent(cell: Option<f64>) -> String {
    match cell {
        None => "N/A".to_string(),
        Some(value) => {
            let arrow = if value > 0.0 {
                " ↑"
            } else if value < 0.0 {
                " ↓"
            } else {
                ""
            };
            format!("{value:.2}%{arrow}")
        }
    }
}

fn format_derived(kind: DerivationKind, cell: Option<f64>) -> String {
    match kind {
        DerivationKind::Difference => cell.map_or_else(|| "N/A".to_string(), format_count),
        DerivationKind::PercentChange | DerivationKind::Contribution => format_percent(cell),
    }
}

/// Pads cells into aligned columns: first column left-aligned, the rest
/// right-aligned, two spaces between columns.
fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            widths[index] = widths[index].max(cell.chars().count());
        }
    }

    let render_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let width = widths[index];
                let padding = width - cell.chars().count();
                if index == 0 {
                    format!("{cell}{}", " ".repeat(padding))
                } else {
                    format!("{}{cell}", " ".repeat(padding))
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut lines = vec![render_row(headers)];
    for row in rows {
        lines.push(render_row(row));
    }
    lines.join("\n")
}

/// Renders a base pivot with its attached derivations, one column block
/// per kind.
pub fn render_combined(view: &CombinedView, key_column: &str) -> String {
    let mut headers: Vec<String> = vec![key_column.to_string()];
    for period in &view.base.periods {
        headers.push(format!("{} {}", view.metric_label, period.label()));
    }
    for table in &view.derived {
        for period in &table.periods {
            headers.push(format!("{} {}", table.kind.label(), period.label()));
        }
    }

    let rows: Vec<Vec<String>> = view
        .base
        .row_keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let mut row = vec![key.label()];
            row.extend(view.base.values[index].iter().map(|v| format_count(*v)));
            for table in &view.derived {
                row.extend(
                    table.cells[index]
                        .iter()
                        .map(|cell| format_derived(table.kind, *cell)),
                );
            }
            row
        })
        .collect();

    render_table(&headers, &rows)
}

/// Renders the cross-metric comparison grouped per period: primary,
/// secondary, then the ratio column.
pub fn render_cross_metric(table: &CrossMetricTable) -> String {
    let mut headers: Vec<String> = vec![table.dimension.column_label().to_string()];
    for period in &table.periods {
        headers.push(format!("{} {}", period.label(), table.primary_label));
        headers.push(format!("{} {}", period.label(), table.secondary_label));
        headers.push(format!("{} {}%", period.label(), table.secondary_label));
    }

    let rows: Vec<Vec<String>> = table
        .row_keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let mut row = vec![key.clone()];
            for (col, _) in table.periods.iter().enumerate() {
                row.push(format_count(table.primary[index][col]));
                row.push(format_count(table.secondary[index][col]));
                row.push(format_percent(table.ratios[index][col]));
            }
            row
        })
        .collect();

    render_table(&headers, &rows)
}

/// Renders ranked dimension members, best first.
pub fn render_ranking(key_column: &str, value_column: &str, entries: &[RankedEntry]) -> String {
    let headers = vec![
        "Rank".to_string(),
        key_column.to_string(),
        value_column.to_string(),
    ];
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|entry| {
            vec![
                entry.rank.to_string(),
                entry.key.clone(),
                format_count(entry.value),
            ]
        })
        .collect();
    render_table(&headers, &rows)
}

/// Renders the detail view: composite key columns, the combined table,
/// then total sales and within-division rank.
pub fn render_detail(detail: &DetailView) -> String {
    let view = &detail.view;

    let mut headers: Vec<String> = vec![
        "Grouping".to_string(),
        "Store Name".to_string(),
        "Group".to_string(),
    ];
    for period in &view.base.periods {
        headers.push(format!("{} {}", view.metric_label, period.label()));
    }
    for table in &view.derived {
        for period in &table.periods {
            headers.push(format!("{} {}", table.kind.label(), period.label()));
        }
    }
    headers.push("Total Sales".to_string());
    headers.push("Rank".to_string());

    let rows: Vec<Vec<String>> = view
        .base
        .row_keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let mut row: Vec<String> = key.parts().to_vec();
            row.extend(view.base.values[index].iter().map(|v| format_count(*v)));
            for table in &view.derived {
                row.extend(
                    table.cells[index]
                        .iter()
                        .map(|cell| format_derived(table.kind, *cell)),
                );
            }
            row.push(format_count(detail.total_sales[index]));
            row.push(detail.ranks[index].to_string());
            row
        })
        .collect();

    // The first three columns are all labels; only the first is
    // left-aligned by the generic renderer, which reads fine in practice.
    render_table(&headers, &rows)
}

/// Renders the headline margin figures.
pub fn render_margin_summary(summary: &MarginSummary) -> String {
    let growth = match summary.growth_rate {
        Some(rate) => format_percent(Some(rate)),
        None => "N/A".to_string(),
    };
    format!(
        "Total Gross Margin: {}\nAverage Margin %: {}\nGross Margin Growth Rate: {}",
        format_count(summary.total_margin),
        format_percent(Some(summary.average_margin_percent)),
        growth
    )
}

/// Renders a margin breakdown, one dimension member per row.
pub fn render_margin_breakdown(key_column: &str, rows: &[MarginBreakdownRow]) -> String {
    let headers = vec![
        key_column.to_string(),
        "Gross Margin".to_string(),
        "Sales".to_string(),
        "Gross Margin %".to_string(),
    ];
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                row.key.clone(),
                format_count(row.margin),
                format_count(row.sales),
                format_percent(Some(row.margin_percent)),
            ]
        })
        .collect();
    render_table(&headers, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::derive::combined;
    use crate::analyzers::types::{PivotTable, RowKey};
    use crate::period::Period;

    #[test]
    fn test_format_count_groups_thousands() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1234.0), "1,234");
        assert_eq!(format_count(1234567.4), "1,234,567");
        assert_eq!(format_count(-54321.0), "-54,321");
    }

    #[test]
    fn test_format_percent_arrows_and_na() {
        assert_eq!(format_percent(Some(12.5)), "12.50% ↑");
        assert_eq!(format_percent(Some(-3.0)), "-3.00% ↓");
        assert_eq!(format_percent(Some(0.0)), "0.00%");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn test_render_combined_marks_undefined_cells() {
        let pivot = PivotTable {
            row_keys: vec![RowKey::single("BZR")],
            periods: vec![
                Period::from_ym(2025, 1).unwrap(),
                Period::from_ym(2025, 2).unwrap(),
            ],
            values: vec![vec![1000.0, 1500.0]],
        };
        let view = combined(
            pivot,
            "Sales",
            &[crate::analyzers::types::DerivationKind::Difference],
        )
        .unwrap();

        let text = render_combined(&view, "Group");
        assert!(text.contains("N/A"));
        assert!(text.contains("1,500"));
        assert!(text.contains("Difference Feb 2025"));
    }
}
