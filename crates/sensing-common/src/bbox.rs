//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::crs::CrsCode;

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Round every bound to `decimals` places, halves away from zero.
    pub fn rounded(&self, decimals: u32) -> BoundingBox {
        let scale = 10f64.powi(decimals as i32);
        let round = |v: f64| (v * scale).round() / scale;

        BoundingBox {
            min_x: round(self.min_x),
            min_y: round(self.min_y),
            max_x: round(self.max_x),
            max_y: round(self.max_y),
        }
    }

    /// Bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<(f64, f64, f64, f64)> for BoundingBox {
    fn from((min_x, min_y, max_x, max_y): (f64, f64, f64, f64)) -> Self {
        Self::new(min_x, min_y, max_x, max_y)
    }
}

/// A bounding box tagged with the reference system its coordinates are in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrsBoundingBox {
    pub bbox: BoundingBox,
    pub crs: CrsCode,
}

impl CrsBoundingBox {
    pub fn new(bbox: BoundingBox, crs: CrsCode) -> Self {
        Self { bbox, crs }
    }

    /// Bounding box in WGS84 longitude/latitude.
    pub fn wgs84(bbox: BoundingBox) -> Self {
        Self::new(bbox, CrsCode::Epsg4326)
    }

    /// Bounds as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.bbox.as_tuple()
    }
}
