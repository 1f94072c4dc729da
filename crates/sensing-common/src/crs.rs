//! Coordinate Reference System codes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SensingError, SensingResult};

/// Reference systems the statistics and sampling services accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Web Mercator (meters)
    Epsg3857,
}

impl CrsCode {
    /// Parse a CRS identifier.
    ///
    /// Accepts formats like:
    /// - "EPSG:4326"
    /// - "epsg:4326"
    /// - "CRS:84" and "WGS84" (lon/lat axis order)
    /// - the OGC URN / URL forms ending in "4326" or "3857"
    pub fn from_code_string(s: &str) -> SensingResult<Self> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "EPSG:4326" | "CRS:84" | "WGS84" | "4326" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" | "EPSG:900913" | "3857" => Ok(CrsCode::Epsg3857),
            other => {
                if other.ends_with("/4326") || other.ends_with("::4326") || other.ends_with("CRS84") {
                    Ok(CrsCode::Epsg4326)
                } else if other.ends_with("/3857") || other.ends_with("::3857") {
                    Ok(CrsCode::Epsg3857)
                } else {
                    Err(SensingError::InvalidCrs(s.to_string()))
                }
            }
        }
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsCode::Epsg4326 => write!(f, "EPSG:4326"),
            CrsCode::Epsg3857 => write!(f, "EPSG:3857"),
        }
    }
}
