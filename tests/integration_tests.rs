use std::path::Path;

use sales_stock_engine::analyzers::compare::cross_metric;
use sales_stock_engine::analyzers::derive::{combined, difference, percent_change};
use sales_stock_engine::analyzers::pivot::pivot;
use sales_stock_engine::analyzers::types::DerivationKind;
use sales_stock_engine::ingest::load_table;
use sales_stock_engine::normalize::normalize;
use sales_stock_engine::output::{comparison_to_csv, parse_column_tag};
use sales_stock_engine::record::{Dimension, Metric, Record};

fn fixture_records() -> Vec<Record> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sales_sample.csv");
    let table = load_table(&path).expect("Failed to load fixture");
    normalize(&table).expect("Failed to normalize fixture")
}

#[test]
fn test_full_pipeline_normalization() {
    let records = fixture_records();

    // 8 raw rows: one dropped for an unparseable measure, one for an
    // unresolvable month, one for a division outside the allow-list.
    assert_eq!(records.len(), 5);

    // Locale-formatted sales value normalizes to a plain number and the
    // margin is recomputed from sales and cost.
    let milk_jan = records
        .iter()
        .find(|r| r.grouping == "GRC MILK" && r.period.month_number() == 1)
        .unwrap();
    assert!((milk_jan.sales - 1234.56).abs() < 1e-9);
    assert!((milk_jan.margin - (1234.56 - 800.06)).abs() < 1e-9);

    // GRC and FRS groupings collapse into the combined division.
    assert!(
        records
            .iter()
            .filter(|r| r.grouping.starts_with("GRC") || r.grouping.starts_with("FRS"))
            .all(|r| r.division == "GRC+FRS")
    );
}

#[test]
fn test_full_pipeline_pivot_and_derivations() {
    let records = fixture_records();
    let table = pivot(&records, Dimension::Division, Metric::Sales).with_grand_total();

    // Jan, Feb, Mar in chronological order.
    let labels: Vec<String> = table.periods.iter().map(|p| p.label()).collect();
    assert_eq!(labels, vec!["Jan 2025", "Feb 2025", "Mar 2025"]);

    // Grand total equals the column-wise sum of the division rows.
    let totals = table.values.last().unwrap().clone();
    for (col, total) in totals.iter().enumerate() {
        let sum: f64 = table
            .values
            .iter()
            .take(table.values.len() - 1)
            .map(|row| row[col])
            .sum();
        assert!((total - sum).abs() < 1e-9);
    }

    let diff = difference(&table);
    let pct = percent_change(&table);
    for row in 0..table.row_keys.len() {
        assert_eq!(diff.cell(row, 0), None);
        assert_eq!(pct.cell(row, 0), None);
        for t in 1..table.periods.len() {
            assert_eq!(
                diff.cell(row, t).unwrap(),
                table.value(row, t) - table.value(row, t - 1)
            );
        }
    }
}

#[test]
fn test_full_pipeline_comparison_export() {
    let records = fixture_records();
    let table = cross_metric(&records, Dimension::Division, Metric::Sales, Metric::StockValue)
        .expect("records are not empty");

    let csv_text = comparison_to_csv(&table).unwrap();
    let header_line = csv_text.lines().next().unwrap();
    let headers: Vec<&str> = header_line.split(',').collect();

    assert_eq!(headers[0], "Group");
    // One sales, one stock, and one ratio column per period.
    assert_eq!(headers.len(), 1 + 3 * table.periods.len());

    // Every data column parses back into its (kind, period) identity.
    for header in &headers[1..] {
        let (left, right) = parse_column_tag(header).unwrap();
        let is_measure = ["Sales", "Stock"].contains(&right)
            && table.periods.iter().any(|p| p.label() == left);
        let is_ratio = left == "Stock%" && table.periods.iter().any(|p| p.label() == right);
        assert!(is_measure || is_ratio, "unrecognized header {header}");
    }

    // One data row per division present in the fixture.
    assert_eq!(csv_text.lines().count(), 1 + table.row_keys.len());
}

#[test]
fn test_full_pipeline_contribution_requires_totals() {
    let records = fixture_records();
    let base = pivot(&records, Dimension::Division, Metric::Sales);

    assert!(combined(base.clone(), "Sales", &[DerivationKind::Contribution]).is_err());
    assert!(
        combined(
            base.with_grand_total(),
            "Sales",
            &[DerivationKind::Contribution]
        )
        .is_ok()
    );
}
