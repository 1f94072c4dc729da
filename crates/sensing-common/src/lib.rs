//! Common types and utilities shared across the vegrestore crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod time;

pub use bbox::{BoundingBox, CrsBoundingBox};
pub use crs::CrsCode;
pub use error::{SensingError, SensingResult};
pub use time::{from_epoch_millis, parse_time};
