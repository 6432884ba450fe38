//! Cleans raw spreadsheet rows into the canonical record set.
//!
//! Column matching is case-insensitive. Measure and period parse failures
//! drop the offending row and the transform continues; only a missing
//! required column is fatal.

use tracing::{debug, warn};

use crate::error::EngineError;
use crate::ingest::RawTable;
use crate::period::{MonthFormat, Period};
use crate::record::Record;

/// Columns the input sheet must contain (matched case-insensitively).
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Grouping",
    "Penjualan",
    "HPP",
    "Gross Margin",
    "Store Name",
    "Month",
    "year",
    "Stock Value",
];

/// Canonical division labels kept after normalization.
pub const DIVISION_ALLOW_LIST: [&str; 2] = ["GRC+FRS", "BZR"];

const COMBINED_DIVISION: &str = "GRC+FRS";

struct ColumnMap {
    grouping: usize,
    sales: usize,
    cost: usize,
    margin: usize,
    store: usize,
    month: usize,
    year: usize,
    stock_value: usize,
    division: Option<usize>,
}

fn resolve_columns(headers: &[String]) -> Result<ColumnMap, EngineError> {
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let resolved = REQUIRED_COLUMNS.map(find);
    if let [
        Some(grouping),
        Some(sales),
        Some(cost),
        Some(margin),
        Some(store),
        Some(month),
        Some(year),
        Some(stock_value),
    ] = resolved
    {
        return Ok(ColumnMap {
            grouping,
            sales,
            cost,
            margin,
            store,
            month,
            year,
            stock_value,
            division: find("Group"),
        });
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(resolved)
        .filter(|(_, index)| index.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

    Err(EngineError::MissingColumns {
        missing,
        expected: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
    })
}

/// Parses a measure cell that may carry locale punctuation: `.` as the
/// thousands separator and `,` as the decimal separator.
///
/// `"1.234,56"` parses to `1234.56`. Returns `None` for anything that does
/// not survive the cleanup.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    trimmed.parse::<f64>().ok().map(|f| f as i32)
}

/// The measure columns of one row, parsed but not yet validated.
struct RowMeasures {
    sales: f64,
    cost: f64,
    stock_value: f64,
}

fn parse_measures(row: &[String], columns: &ColumnMap) -> Option<RowMeasures> {
    let sales = parse_decimal(&row[columns.sales])?;
    let cost = parse_decimal(&row[columns.cost])?;
    // The reported margin must parse for the row to count, but the stored
    // margin is always recomputed from sales and cost.
    parse_decimal(&row[columns.margin])?;
    let stock_value = parse_decimal(&row[columns.stock_value])?;

    Some(RowMeasures {
        sales,
        cost,
        stock_value,
    })
}

fn resolve_periods(
    rows: &[&Vec<String>],
    columns: &ColumnMap,
    format: MonthFormat,
) -> Vec<Option<Period>> {
    rows.iter()
        .map(|row| {
            let year = parse_year(&row[columns.year])?;
            Period::resolve(year, &row[columns.month], format)
        })
        .collect()
}

/// Collapses the two raw division codes into their combined label. A value
/// supplied in a `Group` column is otherwise used verbatim.
fn canonical_division(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "GRC" || trimmed == "FRS" {
        COMBINED_DIVISION.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Derives a division from the first three characters of the grouping,
/// upper-cased, when the sheet carries no `Group` column.
fn derive_division(grouping: &str) -> String {
    let prefix: String = grouping.trim().chars().take(3).collect();
    canonical_division(&prefix.to_ascii_uppercase())
}

/// Normalizes a raw table into canonical records, sorted by period.
pub fn normalize(table: &RawTable) -> Result<Vec<Record>, EngineError> {
    let columns = resolve_columns(&table.headers)?;

    // Rows with any unparseable required measure are dropped, not
    // zero-filled.
    let mut measured: Vec<(&Vec<String>, RowMeasures)> = Vec::new();
    let mut dropped_measures = 0usize;
    for row in &table.rows {
        match parse_measures(row, &columns) {
            Some(measures) => measured.push((row, measures)),
            None => dropped_measures += 1,
        }
    }

    // Full month names are the primary format; if no surviving row resolves
    // with them, retry the whole set with abbreviated names.
    let rows: Vec<&Vec<String>> = measured.iter().map(|(row, _)| *row).collect();
    let mut periods = resolve_periods(&rows, &columns, MonthFormat::Full);
    if !periods.is_empty() && periods.iter().all(Option::is_none) {
        debug!("No periods resolved with full month names, retrying abbreviated format");
        periods = resolve_periods(&rows, &columns, MonthFormat::Abbreviated);
    }

    let mut records = Vec::new();
    let mut dropped_periods = 0usize;
    let mut dropped_divisions = 0usize;

    for ((row, measures), period) in measured.into_iter().zip(periods) {
        let Some(period) = period else {
            dropped_periods += 1;
            continue;
        };

        let grouping = row[columns.grouping].trim().to_string();
        let store = row[columns.store].trim().to_string();

        let division = match columns.division {
            Some(index) => canonical_division(&row[index]),
            None => derive_division(&grouping),
        };

        if !DIVISION_ALLOW_LIST.contains(&division.as_str()) {
            dropped_divisions += 1;
            continue;
        }

        records.push(Record {
            grouping,
            store,
            division,
            period,
            sales: measures.sales,
            cost: measures.cost,
            margin: measures.sales - measures.cost,
            stock_value: measures.stock_value,
        });
    }

    records.sort_by_key(|r| r.period);

    if dropped_measures + dropped_periods + dropped_divisions > 0 {
        warn!(
            dropped_measures,
            dropped_periods, dropped_divisions, "Dropped rows during normalization"
        );
    }
    debug!(records = records.len(), "Normalization complete");

    Ok(records)
}
