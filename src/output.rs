//! Output formatting and persistence for computed tables.
//!
//! Supports JSON serialization and delimited (CSV) export. Exported
//! numeric cells keep full precision; rounding is the presentation
//! layer's business.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::types::{CombinedView, CrossMetricTable};
use crate::error::EngineError;

/// Logs a value as pretty-printed JSON.
pub fn print_json(value: &impl Serialize) -> Result<(), EngineError> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Serializes the cross-metric comparison to CSV.
///
/// Header layout: the dimension column, then one `<label>_<primary>`
/// column per period, one `<label>_<secondary>` column per period, and one
/// `<secondary>%_<label>` ratio column per period. Undefined ratio cells
/// are written empty.
pub fn comparison_to_csv(table: &CrossMetricTable) -> Result<String, EngineError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = vec![table.dimension.column_label().to_string()];
    for period in &table.periods {
        header.push(format!("{}_{}", period.label(), table.primary_label));
    }
    for period in &table.periods {
        header.push(format!("{}_{}", period.label(), table.secondary_label));
    }
    for period in &table.periods {
        header.push(format!("{}%_{}", table.secondary_label, period.label()));
    }
    writer.write_record(&header)?;

    for (index, key) in table.row_keys.iter().enumerate() {
        let mut row: Vec<String> = vec![key.clone()];
        row.extend(table.primary[index].iter().map(|v| v.to_string()));
        row.extend(table.secondary[index].iter().map(|v| v.to_string()));
        row.extend(
            table.ratios[index]
                .iter()
                .map(|ratio| ratio.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes the cross-metric comparison to a CSV file.
pub fn write_comparison_csv(path: &Path, table: &CrossMetricTable) -> Result<(), EngineError> {
    debug!(path = %path.display(), "Writing comparison CSV");
    std::fs::write(path, comparison_to_csv(table)?)?;
    Ok(())
}

/// Serializes a combined view to CSV: the row-key column followed by one
/// `<kind>_<label>` column per (kind, period), base pivot first. Undefined
/// derived cells are written empty.
pub fn combined_to_csv(view: &CombinedView, key_column: &str) -> Result<String, EngineError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<String> = vec![key_column.to_string()];
    for period in &view.base.periods {
        header.push(format!("{}_{}", view.metric_label, period.label()));
    }
    for table in &view.derived {
        for period in &table.periods {
            header.push(format!("{}_{}", table.kind.label(), period.label()));
        }
    }
    writer.write_record(&header)?;

    for (index, key) in view.base.row_keys.iter().enumerate() {
        let mut row: Vec<String> = vec![key.label()];
        row.extend(view.base.values[index].iter().map(|v| v.to_string()));
        for table in &view.derived {
            row.extend(
                table.cells[index]
                    .iter()
                    .map(|cell| cell.map(|v| v.to_string()).unwrap_or_default()),
            );
        }
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Splits an exported column header back into its two identity parts at
/// the first underscore, e.g. `"Difference_Jan 2025"` into
/// `("Difference", "Jan 2025")`.
pub fn parse_column_tag(header: &str) -> Option<(&str, &str)> {
    header.split_once('_')
}
