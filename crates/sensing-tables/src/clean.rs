//! Cleaning of tabulated FIS statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FisError, FisResult};
use crate::fis::{FisRow, FisTable, StatValue};

/// Options for [`clean_fis_table`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanOptions {
    /// Rows whose cloud or snow mean exceeds this value in magnitude are
    /// contaminated.
    pub contamination_threshold: f64,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            contamination_threshold: 0.0,
        }
    }
}

/// Averaged, uncontaminated statistics of one polygon on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanFisRow {
    pub date: DateTime<Utc>,
    #[serde(rename = "ID")]
    pub id: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    #[serde(rename = "stDev")]
    pub st_dev: f64,
    pub clm_mean: f64,
    pub snw_mean: f64,
}

/// Clean FIS table, sorted by `(ID, date)` and indexed by `date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanFisTable {
    rows: Vec<CleanFisRow>,
}

impl CleanFisTable {
    pub fn rows(&self) -> &[CleanFisRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `date` index, one entry per row.
    pub fn index(&self) -> Vec<DateTime<Utc>> {
        self.rows.iter().map(|r| r.date).collect()
    }

    /// Distinct polygon IDs in table order.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rows.iter().map(|r| r.id.as_str()).collect();
        ids.dedup();
        ids
    }

    /// Time series of a single polygon.
    pub fn series<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a CleanFisRow> + 'a {
        self.rows.iter().filter(move |r| r.id == id)
    }
}

/// Statistic columns in table order after the date.
const STAT_COLUMNS: [&str; 6] = ["min", "max", "mean", "stDev", "clm_mean", "snw_mean"];

/// Clean a combined FIS table.
///
/// Every statistic is converted to `f64` strictly (a non-numeric string
/// fails the whole call), rows with any missing value are dropped, rows
/// whose cloud or snow mean is above the contamination threshold are
/// dropped, and the remainder is averaged per `(date, ID)` and sorted by
/// `(ID, date)`. The input table is left untouched.
pub fn clean_fis_table(table: &FisTable, options: &CleanOptions) -> FisResult<CleanFisTable> {
    if !table.is_empty() && !table.has_ids() {
        return Err(FisError::MissingColumn("ID".to_string()));
    }

    let coerced = table
        .rows()
        .iter()
        .map(coerce_row)
        .collect::<FisResult<Vec<_>>>()?;

    let mut dropped_missing = 0usize;
    let mut dropped_contaminated = 0usize;
    let mut groups: BTreeMap<(&str, DateTime<Utc>), ([f64; 6], usize)> = BTreeMap::new();

    for (row, stats) in table.rows().iter().zip(&coerced) {
        let (Some(date), Some(id)) = (row.date, row.id.as_deref()) else {
            dropped_missing += 1;
            continue;
        };
        let Some(values) = complete(stats) else {
            dropped_missing += 1;
            continue;
        };

        let [.., clm_mean, snw_mean] = values;
        let threshold = options.contamination_threshold;
        if clm_mean.abs() > threshold || snw_mean.abs() > threshold {
            dropped_contaminated += 1;
            continue;
        }

        let (sums, count) = groups.entry((id, date)).or_insert(([0.0; 6], 0));
        for (sum, value) in sums.iter_mut().zip(values) {
            *sum += value;
        }
        *count += 1;
    }

    let rows: Vec<CleanFisRow> = groups
        .into_iter()
        .map(|((id, date), (sums, count))| {
            let [min, max, mean, st_dev, clm_mean, snw_mean] = sums.map(|s| s / count as f64);
            CleanFisRow {
                date,
                id: id.to_string(),
                min,
                max,
                mean,
                st_dev,
                clm_mean,
                snw_mean,
            }
        })
        .collect();

    debug!(
        input_rows = table.len(),
        dropped_missing,
        dropped_contaminated,
        output_rows = rows.len(),
        "Cleaned FIS table"
    );

    Ok(CleanFisTable { rows })
}

fn coerce_row(row: &FisRow) -> FisResult<[Option<f64>; 6]> {
    let cells = [
        &row.min,
        &row.max,
        &row.mean,
        &row.st_dev,
        &row.clm_mean,
        &row.snw_mean,
    ];

    let mut out = [None; 6];
    for ((slot, cell), column) in out.iter_mut().zip(cells).zip(STAT_COLUMNS) {
        *slot = cell.as_ref().map(|v: &StatValue| v.to_f64(column)).transpose()?;
    }
    Ok(out)
}

/// All six statistics, or `None` if any is missing or NaN.
fn complete(stats: &[Option<f64>; 6]) -> Option<[f64; 6]> {
    let mut out = [0.0; 6];
    for (slot, value) in out.iter_mut().zip(stats) {
        *slot = value.filter(|v| !v.is_nan())?;
    }
    Some(out)
}
