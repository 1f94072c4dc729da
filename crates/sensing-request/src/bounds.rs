//! Bounding boxes over sets of polygons.
//!
//! Geometries are read from GeoJSON (a FeatureCollection, a single Feature
//! or geometry, or a list of geometries) into `geo` types.

use geo::{BoundingRect, Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use sensing_common::{BoundingBox, CrsBoundingBox, CrsCode};

use crate::error::{BoundsError, BoundsResult};

/// Decimal places bounds are rounded to.
pub const DEFAULT_PRECISION: u32 = 4;

/// A collection of geometries sharing one reference system.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySet {
    crs: CrsCode,
    geometries: Vec<Geometry<f64>>,
}

impl GeometrySet {
    pub fn new(crs: CrsCode, geometries: Vec<Geometry<f64>>) -> Self {
        Self { crs, geometries }
    }

    /// Geometries in WGS84 longitude/latitude.
    pub fn wgs84(geometries: Vec<Geometry<f64>>) -> Self {
        Self::new(CrsCode::Epsg4326, geometries)
    }

    pub fn crs(&self) -> CrsCode {
        self.crs
    }

    pub fn geometries(&self) -> &[Geometry<f64>] {
        &self.geometries
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Read geometries from a GeoJSON document.
    ///
    /// A FeatureCollection may name its CRS through the legacy `crs` member;
    /// otherwise WGS84 is assumed.
    pub fn from_geojson(value: Value) -> BoundsResult<Self> {
        if value.is_array() {
            let geometries: Vec<GeoJsonGeometry> = serde_json::from_value(value)?;
            return Ok(Self::wgs84(geometries.into_iter().map(GeoJsonGeometry::into_geometry).collect()));
        }

        match serde_json::from_value::<GeoJsonObject>(value)? {
            GeoJsonObject::FeatureCollection { features, crs } => {
                let crs = match crs {
                    Some(named) => CrsCode::from_code_string(&named.properties.name)?,
                    None => CrsCode::Epsg4326,
                };
                Ok(Self::new(
                    crs,
                    features.into_iter().map(|f| f.geometry.into_geometry()).collect(),
                ))
            }
            GeoJsonObject::Feature { geometry } => Ok(Self::wgs84(vec![geometry.into_geometry()])),
            GeoJsonObject::Point { coordinates } => {
                Ok(Self::wgs84(vec![GeoJsonGeometry::Point { coordinates }.into_geometry()]))
            }
            GeoJsonObject::LineString { coordinates } => {
                Ok(Self::wgs84(vec![GeoJsonGeometry::LineString { coordinates }.into_geometry()]))
            }
            GeoJsonObject::Polygon { coordinates } => {
                Ok(Self::wgs84(vec![GeoJsonGeometry::Polygon { coordinates }.into_geometry()]))
            }
            GeoJsonObject::MultiPolygon { coordinates } => {
                Ok(Self::wgs84(vec![GeoJsonGeometry::MultiPolygon { coordinates }.into_geometry()]))
            }
        }
    }
}

/// Bounding box of all geometries, rounded to `precision` decimals and
/// tagged WGS84.
///
/// Only polygonal geometries in EPSG:4326 are accepted; anything else is
/// rejected rather than producing a partial result.
pub fn bbox_from_geometries(set: &GeometrySet, precision: u32) -> BoundsResult<CrsBoundingBox> {
    if set.crs() != CrsCode::Epsg4326 {
        return Err(BoundsError::UnsupportedCrs(set.crs()));
    }

    let mut bounds: Option<BoundingBox> = None;
    for geometry in set.geometries() {
        check_polygonal(geometry)?;

        let Some(rect) = geometry.bounding_rect() else {
            continue;
        };
        let rect = BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
        bounds = Some(match bounds {
            Some(acc) => acc.union(&rect),
            None => rect,
        });
    }

    let bbox = bounds.ok_or(BoundsError::Empty)?.rounded(precision);
    debug!(
        geometries = set.len(),
        min_x = bbox.min_x,
        min_y = bbox.min_y,
        max_x = bbox.max_x,
        max_y = bbox.max_y,
        "Computed bounding box"
    );

    Ok(CrsBoundingBox::wgs84(bbox))
}

fn check_polygonal(geometry: &Geometry<f64>) -> BoundsResult<()> {
    let kind = match geometry {
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
            return Ok(())
        }
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::GeometryCollection(_) => "GeometryCollection",
    };
    Err(BoundsError::InvalidGeometryInput(kind.to_string()))
}

/// GeoJSON geometry objects.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type")]
enum GeoJsonGeometry {
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    /// First ring is the exterior, the rest are holes.
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeature {
    geometry: GeoJsonGeometry,
}

#[derive(Debug, Deserialize)]
struct NamedCrs {
    properties: NamedCrsProperties,
}

#[derive(Debug, Deserialize)]
struct NamedCrsProperties {
    name: String,
}

/// Top-level GeoJSON objects.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJsonObject {
    FeatureCollection {
        features: Vec<GeoJsonFeature>,
        #[serde(default)]
        crs: Option<NamedCrs>,
    },
    Feature {
        geometry: GeoJsonGeometry,
    },
    Point {
        coordinates: [f64; 2],
    },
    LineString {
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

fn ring(coords: Vec<[f64; 2]>) -> LineString<f64> {
    LineString::new(coords.into_iter().map(|[x, y]| Coord { x, y }).collect())
}

fn polygon(mut rings: Vec<Vec<[f64; 2]>>) -> Polygon<f64> {
    if rings.is_empty() {
        return Polygon::new(LineString::new(Vec::new()), Vec::new());
    }
    let exterior = ring(rings.remove(0));
    Polygon::new(exterior, rings.into_iter().map(ring).collect())
}

impl GeoJsonGeometry {
    fn into_geometry(self) -> Geometry<f64> {
        match self {
            GeoJsonGeometry::Point { coordinates: [x, y] } => Geometry::Point(Point::new(x, y)),
            GeoJsonGeometry::LineString { coordinates } => Geometry::LineString(ring(coordinates)),
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(coordinates)),
            GeoJsonGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon(MultiPolygon::new(
                coordinates.into_iter().map(polygon).collect(),
            )),
        }
    }
}
