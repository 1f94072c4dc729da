//! Request-side helpers for the imagery statistics service.
//!
//! - [`evalscript`]: per-sensor pixel evaluation scripts.
//! - [`bounds`]: rounded WGS84 bounding boxes over a set of polygons.

pub mod bounds;
pub mod error;
pub mod evalscript;

pub use bounds::{bbox_from_geometries, GeometrySet, DEFAULT_PRECISION};
pub use error::{BoundsError, BoundsResult, EvalScriptError};
pub use evalscript::{eval_script, Sensor};
