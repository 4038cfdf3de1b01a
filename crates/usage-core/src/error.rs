use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the usage report crates.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file was read but its rows could not be decoded.
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// The file extension is not one of the supported sheet formats.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// No file in the batch yielded a server row or a total row.
    #[error("No usable data found in the selected files")]
    NoUsableData,

    /// A comparison period produced no usable data.
    #[error("No usable data found for period {period}")]
    PeriodWithoutData { period: String },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ReportError {
    /// `true` for failures that only affect a single input file.
    ///
    /// Callers skip the file with a warning and keep processing the batch.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ReportError::FileRead { .. }
                | ReportError::Decode { .. }
                | ReportError::UnsupportedFormat(_)
        )
    }
}

/// Convenience alias used throughout the usage report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
