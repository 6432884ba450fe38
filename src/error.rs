use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors surfaced by the engine.
///
/// Row-level parse failures are not represented here: offending rows are
/// dropped during normalization and the transform continues. Cell-level
/// undefined values (zero denominators, missing prior periods) are carried
/// as `None` in derived tables, never as errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("the input sheet must contain the following columns: {expected:?} (missing: {missing:?})")]
    MissingColumns {
        missing: Vec<String>,
        expected: Vec<String>,
    },

    #[error("unknown comparison dimension '{0}' (expected one of: Division, Store, Grouping)")]
    UnknownDimension(String),

    #[error("contribution requires a grand-total row in the source pivot table")]
    MissingGrandTotal,

    #[error("workbook contains no sheets: {0}")]
    EmptyWorkbook(PathBuf),

    #[error("unsupported input format for {0} (expected .xlsx or .csv)")]
    UnsupportedFormat(PathBuf),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("XLSX read error: {source}")]
    XlsxRead {
        #[from]
        source: calamine::XlsxError,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
