//! Error types for tabulation.

use sensing_common::SensingError;
use thiserror::Error;

/// Result type for region tabulation.
pub type RegionResult<T> = Result<T, RegionError>;

/// Result type for FIS tabulation and cleaning.
pub type FisResult<T> = Result<T, FisError>;

/// Errors raised while tabulating a region array.
#[derive(Debug, Error, PartialEq)]
pub enum RegionError {
    /// The array has no header row.
    #[error("region array is empty, expected a header row")]
    MissingHeader,

    /// A header cell is not a column name.
    #[error("header cell {position} is not a column name: {value}")]
    InvalidHeader { position: usize, value: String },

    /// A required column is not named in the header row.
    #[error("column not found in region header: {0}")]
    MissingColumn(String),

    /// A `time` cell is not epoch milliseconds.
    #[error("invalid epoch milliseconds at data row {row}: {value}")]
    InvalidTime { row: usize, value: String },

    /// The payload is not an array of rows.
    #[error("invalid region array: {0}")]
    InvalidArray(String),

    #[error(transparent)]
    Common(#[from] SensingError),
}

/// Errors raised while tabulating or cleaning FIS responses.
#[derive(Debug, Error, PartialEq)]
pub enum FisError {
    /// A column the operation needs is absent from the table.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// A statistic could not be converted to a float.
    #[error("cannot convert {value:?} in column '{column}' to float")]
    Coercion { column: String, value: String },

    /// A primary-channel entry carries no date.
    #[error("entry {row} of channel {channel} has no date")]
    MissingDate { channel: String, row: usize },

    /// An auxiliary channel has a different entry count than the primary channel.
    #[error("channel {channel} has {found} entries, expected {expected}")]
    ChannelLengthMismatch {
        channel: String,
        expected: usize,
        found: usize,
    },

    /// An auxiliary channel entry is dated differently than the primary entry it pairs with.
    #[error("channel {channel} entry {row} is dated {found}, expected {expected}")]
    ChannelDateMismatch {
        channel: String,
        row: usize,
        expected: String,
        found: String,
    },

    /// A response carries more auxiliary channels than it can be mapped to.
    #[error("unexpected extra snow channel: {0}")]
    UnexpectedChannel(String),

    /// The payload does not have the FIS response shape.
    #[error("invalid FIS response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Common(#[from] SensingError),
}

impl From<serde_json::Error> for FisError {
    fn from(err: serde_json::Error) -> Self {
        FisError::InvalidResponse(err.to_string())
    }
}

impl From<serde_json::Error> for RegionError {
    fn from(err: serde_json::Error) -> Self {
        RegionError::InvalidArray(err.to_string())
    }
}
