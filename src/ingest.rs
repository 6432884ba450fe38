//! Spreadsheet ingestion.
//!
//! Reads a local `.xlsx` or `.csv` file into a raw table of strings. Every
//! cell is carried as text: all parsing (numbers, periods) belongs to the
//! normalizer, so both input formats feed the same pipeline.

use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::EngineError;

/// Headers plus data rows, all as raw strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Loads a spreadsheet from a local path, dispatching on the extension.
pub fn load_table(path: &Path) -> Result<RawTable, EngineError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("xlsx") => load_xlsx(path),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => load_csv(path),
        _ => Err(EngineError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Reads the first sheet of an XLSX workbook.
fn load_xlsx(path: &Path) -> Result<RawTable, EngineError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| EngineError::EmptyWorkbook(path.to_path_buf()))?;

    debug!(sheet = %first_sheet, "Reading first worksheet");
    let range = workbook.worksheet_range(first_sheet)?;

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => Vec::new(),
    };

    let width = headers.len();
    let rows = rows_iter
        .map(|row| {
            let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn load_csv(path: &Path) -> Result<RawTable, EngineError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let width = headers.len();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(width, String::new());
        rows.push(cells);
    }

    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("{:?}", e),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_csv_headers_and_rows() {
        let file = write_temp_csv("Store Name,Month,year\nStore A,January,2025\n");
        let table = load_table(file.path()).unwrap();

        assert_eq!(table.headers, vec!["Store Name", "Month", "year"]);
        assert_eq!(table.rows, vec![vec!["Store A", "January", "2025"]]);
    }

    #[test]
    fn test_load_csv_pads_short_rows() {
        let file = write_temp_csv("a,b,c\n1,2\n");
        let table = load_table(file.path()).unwrap();

        assert_eq!(table.rows, vec![vec!["1", "2", ""]]);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_table(Path::new("data.parquet")).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_float_cells_render_without_trailing_zero() {
        assert_eq!(cell_to_string(&Data::Float(1234.0)), "1234");
        assert_eq!(cell_to_string(&Data::Float(12.5)), "12.5");
    }

    #[test]
    fn test_xlsx_and_csv_paths_agree() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx_path = dir.path().join("sample.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, header) in ["Store Name", "Month", "year"].iter().enumerate() {
            sheet.write_string(0, col as u16, *header).unwrap();
        }
        sheet.write_string(1, 0, "Store A").unwrap();
        sheet.write_string(1, 1, "January").unwrap();
        sheet.write_number(1, 2, 2025.0).unwrap();
        workbook.save(&xlsx_path).unwrap();

        let from_xlsx = load_table(&xlsx_path).unwrap();

        let csv_file = write_temp_csv("Store Name,Month,year\nStore A,January,2025\n");
        let from_csv = load_table(csv_file.path()).unwrap();

        assert_eq!(from_xlsx, from_csv);
    }
}
