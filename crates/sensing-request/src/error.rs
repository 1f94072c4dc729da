//! Error types for request helpers.

use sensing_common::{CrsCode, SensingError};
use thiserror::Error;

/// Result type for bounding box construction.
pub type BoundsResult<T> = Result<T, BoundsError>;

/// The sensor/algorithm name is not one of the known scripts.
#[derive(Debug, Error, PartialEq)]
pub enum EvalScriptError {
    #[error("unknown sensor '{0}', expected one of: Sentinel_2_NDVI, Landsat_8_NDVI")]
    UnknownSensor(String),
}

/// Errors raised while deriving a bounding box from geometries.
#[derive(Debug, Error, PartialEq)]
pub enum BoundsError {
    /// No geometry with coordinates was supplied.
    #[error("geometry set is empty")]
    Empty,

    /// Bounds can only be taken over WGS84 geometries.
    #[error("geometries must be in EPSG:4326, got {0}")]
    UnsupportedCrs(CrsCode),

    /// A geometry is not polygonal.
    #[error("invalid geometry input: expected polygons, got {0}")]
    InvalidGeometryInput(String),

    /// The document could not be read as GeoJSON.
    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error(transparent)]
    Common(#[from] SensingError),
}

impl From<serde_json::Error> for BoundsError {
    fn from(err: serde_json::Error) -> Self {
        BoundsError::InvalidGeoJson(err.to_string())
    }
}
