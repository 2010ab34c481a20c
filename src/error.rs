use thiserror::Error;

/// Failure to build the dataset. Always fatal: the dashboard never runs on
/// a partially loaded table.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("Malformed source: {0}")]
    Malformed(String),

    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}
