//! Tabulation of remote-sensing query results.
//!
//! Two independent pipelines live here:
//!
//! - [`region`]: reshapes the list-of-rows array returned by an image-region
//!   sampling call into a [`RegionTable`] keyed by time.
//! - [`fis`] and [`clean`]: turn per-polygon Feature Info Service responses
//!   into a [`FisTable`], then drop cloud/snow contaminated samples and
//!   average duplicate `(date, ID)` observations into a [`CleanFisTable`].
//!
//! # Example
//!
//! ```rust
//! use sensing_tables::{clean_fis_table, CleanOptions, FisResponse, FisTable, TabulateOptions};
//! use serde_json::json;
//!
//! let response = FisResponse::from_json(json!({
//!     "C0": [{"date": "2019-06-03", "basicStats": {"min": 0.1, "max": 0.8, "mean": 0.5, "stDev": 0.1}}],
//!     "C1": [{"basicStats": {"mean": 0.0}}],
//!     "C2": [{"basicStats": {"mean": 0.0}}]
//! })).unwrap();
//!
//! let table = FisTable::from_identified([("paddock-1", &response)], &TabulateOptions::default()).unwrap();
//! let clean = clean_fis_table(&table, &CleanOptions::default()).unwrap();
//! assert_eq!(clean.len(), 1);
//! ```

pub mod clean;
pub mod error;
pub mod fis;
pub mod region;

pub use clean::{clean_fis_table, CleanFisRow, CleanFisTable, CleanOptions};
pub use error::{FisError, FisResult, RegionError, RegionResult};
pub use fis::{
    BasicStats, Channel, ChannelAlignment, ChannelStat, FisResponse, FisRow, FisTable, StatValue,
    TabulateOptions,
};
pub use region::{tabulate_region, tabulate_region_with, RegionArray, RegionOptions, RegionRow, RegionTable};
