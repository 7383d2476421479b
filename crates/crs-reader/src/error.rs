//! Error types for the reader crate.

use thiserror::Error;

/// Errors that can occur while reading CRS archives.
///
/// Inside a multi-file [`range_query`](crate::range_query) every variant
/// is non-fatal: the offending file is logged and skipped.
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open archive: {0}")]
    Archive(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Conversion failed: {0}")]
    Conversion(String),

    #[error("Timed out reading {path} after {seconds}s")]
    Timeout { path: String, seconds: u64 },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type for reader operations.
pub type Result<T> = std::result::Result<T, ReaderError>;
