//! Region array tabulation.
//!
//! An image-region sampling call returns a flat array of rows where row 0
//! names the columns and every following row holds the values for one
//! sampled pixel at one acquisition time. Cells pair with the header by
//! position only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use sensing_common::from_epoch_millis;

use crate::error::{RegionError, RegionResult};

/// Geolocation and time columns every region array must carry.
pub const LONGITUDE: &str = "longitude";
pub const LATITUDE: &str = "latitude";
pub const TIME: &str = "time";
pub const DATETIME: &str = "datetime";

/// Raw list-of-rows array as returned by the sampling service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionArray {
    rows: Vec<Vec<Value>>,
}

impl RegionArray {
    pub fn new(rows: Vec<Vec<Value>>) -> Self {
        Self { rows }
    }

    /// Build from a decoded JSON payload.
    pub fn from_json(value: Value) -> RegionResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// All rows, header included.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Header row, if present.
    pub fn header(&self) -> Option<&[Value]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Number of data rows (header excluded).
    pub fn data_len(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }
}

/// Options for [`tabulate_region_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionOptions {
    /// Drop rows whose band value could not be read as a number.
    ///
    /// When false such rows are kept with a missing band value.
    pub drop_unparseable: bool,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            drop_unparseable: true,
        }
    }
}

/// One sampled pixel at one acquisition time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRow {
    /// Acquisition time in epoch milliseconds.
    pub time: i64,
    pub datetime: DateTime<Utc>,
    /// Band values in the order the bands were requested.
    pub values: Vec<Option<f64>>,
}

/// Table with columns `time, datetime, <band1>, <band2>, ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionTable {
    bands: Vec<String>,
    rows: Vec<RegionRow>,
}

impl RegionTable {
    /// Column names in output order.
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec![TIME.to_string(), DATETIME.to_string()];
        columns.extend(self.bands.iter().cloned());
        columns
    }

    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    pub fn rows(&self) -> &[RegionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of a single band column, `None` if the band was not requested.
    pub fn band(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.bands.iter().position(|b| b == name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// Rows as JSON records keyed by column name.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                let mut record = Map::new();
                record.insert(TIME.to_string(), Value::from(row.time));
                record.insert(DATETIME.to_string(), Value::from(row.datetime.to_rfc3339()));
                for (band, value) in self.bands.iter().zip(&row.values) {
                    record.insert(band.clone(), value.map(Value::from).unwrap_or(Value::Null));
                }
                record
            })
            .collect()
    }
}

/// Tabulate a region array with default options.
pub fn tabulate_region<S: AsRef<str>>(array: &RegionArray, bands: &[S]) -> RegionResult<RegionTable> {
    tabulate_region_with(array, bands, &RegionOptions::default())
}

/// Tabulate a region array.
///
/// Rows missing longitude, latitude, time or any requested band are
/// discarded. Band values are read leniently: anything that is not a number
/// or a numeric string becomes missing rather than an error.
pub fn tabulate_region_with<S: AsRef<str>>(
    array: &RegionArray,
    bands: &[S],
    options: &RegionOptions,
) -> RegionResult<RegionTable> {
    let header = array.header().ok_or(RegionError::MissingHeader)?;
    check_header(header)?;

    let lon_idx = column_index(header, LONGITUDE)?;
    let lat_idx = column_index(header, LATITUDE)?;
    let time_idx = column_index(header, TIME)?;
    let band_idx = bands
        .iter()
        .map(|b| column_index(header, b.as_ref()))
        .collect::<RegionResult<Vec<_>>>()?;

    let mut rows = Vec::with_capacity(array.data_len());
    let mut dropped_missing = 0usize;
    let mut dropped_unparseable = 0usize;

    for (row_no, row) in array.rows().iter().enumerate().skip(1) {
        let mut required = [lon_idx, lat_idx, time_idx]
            .into_iter()
            .chain(band_idx.iter().copied());
        if required.any(|idx| is_missing(row.get(idx))) {
            dropped_missing += 1;
            continue;
        }

        let values: Vec<Option<f64>> = band_idx.iter().map(|&idx| to_numeric(&row[idx])).collect();
        if options.drop_unparseable && values.iter().any(Option::is_none) {
            dropped_unparseable += 1;
            continue;
        }

        let time = epoch_millis(&row[time_idx]).ok_or_else(|| RegionError::InvalidTime {
            row: row_no,
            value: row[time_idx].to_string(),
        })?;
        let datetime = from_epoch_millis(time)?;

        rows.push(RegionRow {
            time,
            datetime,
            values,
        });
    }

    debug!(
        input_rows = array.data_len(),
        kept = rows.len(),
        dropped_missing,
        dropped_unparseable,
        "Tabulated region array"
    );

    Ok(RegionTable {
        bands: bands.iter().map(|b| b.as_ref().to_string()).collect(),
        rows,
    })
}

fn check_header(header: &[Value]) -> RegionResult<()> {
    match header.iter().position(|cell| !cell.is_string()) {
        Some(position) => Err(RegionError::InvalidHeader {
            position,
            value: header[position].to_string(),
        }),
        None => Ok(()),
    }
}

fn column_index(header: &[Value], name: &str) -> RegionResult<usize> {
    header
        .iter()
        .position(|cell| cell.as_str() == Some(name))
        .ok_or_else(|| RegionError::MissingColumn(name.to_string()))
}

fn is_missing(cell: Option<&Value>) -> bool {
    matches!(cell, None | Some(Value::Null))
}

/// Lenient numeric conversion; NaN counts as missing.
fn to_numeric(cell: &Value) -> Option<f64> {
    let value = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (!value.is_nan()).then_some(value)
}

/// Epoch milliseconds; fractional values round to the nearest millisecond.
fn epoch_millis(cell: &Value) -> Option<i64> {
    match cell {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.round() as i64))
        }
        _ => None,
    }
}
