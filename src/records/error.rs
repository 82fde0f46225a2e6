//! Record store error types

use thiserror::Error;

/// Errors raised by the record views
#[derive(Error, Debug)]
pub enum RecordsError {
    /// Export requested with an empty record list
    #[error("No records to export")]
    NothingToExport,

    /// Filter name not recognised
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// Writing the export file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for record operations
pub type RecordsResult<T> = Result<T, RecordsError>;
