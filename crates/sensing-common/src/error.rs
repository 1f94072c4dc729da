//! Error types shared by the vegrestore crates.

use thiserror::Error;

/// Result type alias using SensingError.
pub type SensingResult<T> = Result<T, SensingError>;

/// Errors raised by the shared geometry and time types.
#[derive(Debug, Error, PartialEq)]
pub enum SensingError {
    #[error("Unsupported CRS: {0}")]
    InvalidCrs(String),

    #[error("Invalid time specification: {0}")]
    InvalidTime(String),

    #[error("Epoch milliseconds out of range: {0}")]
    TimestampOutOfRange(i64),
}
