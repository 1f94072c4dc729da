//! Feature Info Service response model and tabulation.
//!
//! A FIS response maps channel identifiers to per-timestep statistics.
//! `C0` carries the requested index, `C1` the cloud mask and any other
//! channel the snow mask. Tabulation lines the three up into one row per
//! timestep.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use sensing_common::parse_time;

use crate::error::{FisError, FisResult};

/// A statistic as delivered by the service: a number, or a string such as
/// `"NaN"` that still has to be coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Number(f64),
    Text(String),
}

impl StatValue {
    /// Strict conversion to `f64`. Text that does not parse is an error.
    pub fn to_f64(&self, column: &str) -> FisResult<f64> {
        match self {
            StatValue::Number(n) => Ok(*n),
            StatValue::Text(s) => s.trim().parse::<f64>().map_err(|_| FisError::Coercion {
                column: column.to_string(),
                value: s.clone(),
            }),
        }
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Number(value)
    }
}

/// Summary statistics of one channel at one timestep.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicStats {
    #[serde(default)]
    pub min: Option<StatValue>,
    #[serde(default)]
    pub max: Option<StatValue>,
    #[serde(default)]
    pub mean: Option<StatValue>,
    #[serde(default, rename = "stDev")]
    pub st_dev: Option<StatValue>,
}

/// One per-timestep entry of a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStat {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "basicStats")]
    pub basic_stats: BasicStats,
}

/// Channel role, derived from its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Channel {
    /// `C0`: the requested index.
    Primary,
    /// `C1`: cloud mask.
    CloudMask,
    /// Any other identifier: snow mask.
    SnowMask(String),
}

impl Channel {
    pub fn from_id(id: &str) -> Self {
        match id {
            "C0" => Channel::Primary,
            "C1" => Channel::CloudMask,
            other => Channel::SnowMask(other.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Channel::Primary => "C0",
            Channel::CloudMask => "C1",
            Channel::SnowMask(id) => id,
        }
    }

    /// Table column the channel's mean lands in.
    pub fn mean_column(&self) -> &'static str {
        match self {
            Channel::Primary => "mean",
            Channel::CloudMask => "clm_mean",
            Channel::SnowMask(_) => "snw_mean",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Statistics for one polygon, keyed by channel identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FisResponse {
    channels: BTreeMap<String, Vec<ChannelStat>>,
}

impl FisResponse {
    pub fn new(channels: BTreeMap<String, Vec<ChannelStat>>) -> Self {
        Self { channels }
    }

    /// Build from a decoded JSON payload.
    pub fn from_json(value: Value) -> FisResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Decode a JSON list of responses.
    pub fn list_from_json(value: Value) -> FisResult<Vec<Self>> {
        Ok(serde_json::from_value(value)?)
    }

    /// Channels in identifier order.
    pub fn channels(&self) -> impl Iterator<Item = (Channel, &[ChannelStat])> {
        self.channels
            .iter()
            .map(|(id, stats)| (Channel::from_id(id), stats.as_slice()))
    }

    pub fn channel(&self, id: &str) -> Option<&[ChannelStat]> {
        self.channels.get(id).map(Vec::as_slice)
    }
}

/// How auxiliary channels are paired with the primary channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelAlignment {
    /// Pair by position, but require equal lengths and matching dates
    /// wherever an auxiliary entry carries one.
    #[default]
    Strict,
    /// Pair by position and pad shorter channels with missing values.
    Positional,
}

impl FromStr for ChannelAlignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ChannelAlignment::Strict),
            "positional" => Ok(ChannelAlignment::Positional),
            _ => Err(format!("unknown channel alignment '{s}', expected strict or positional")),
        }
    }
}

/// Options for FIS tabulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TabulateOptions {
    pub alignment: ChannelAlignment,
}

/// One timestep of one polygon, before cleaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FisRow {
    pub date: Option<DateTime<Utc>>,
    pub min: Option<StatValue>,
    pub max: Option<StatValue>,
    pub mean: Option<StatValue>,
    #[serde(rename = "stDev")]
    pub st_dev: Option<StatValue>,
    pub clm_mean: Option<StatValue>,
    pub snw_mean: Option<StatValue>,
    #[serde(rename = "ID")]
    pub id: Option<String>,
}

/// Combined table of `date, min, max, mean, stDev, clm_mean, snw_mean`
/// plus the polygon `ID`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FisTable {
    rows: Vec<FisRow>,
}

impl FisTable {
    pub const COLUMNS: [&'static str; 7] =
        ["date", "min", "max", "mean", "stDev", "clm_mean", "snw_mean"];

    pub fn new(rows: Vec<FisRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FisRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FisRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row carries a polygon ID.
    pub fn has_ids(&self) -> bool {
        self.rows.iter().any(|r| r.id.is_some())
    }

    /// Tag every row with `id`.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        for row in &mut self.rows {
            row.id = Some(id.clone());
        }
        self
    }

    /// Append the rows of all `tables` in order.
    pub fn concat(tables: impl IntoIterator<Item = FisTable>) -> Self {
        Self {
            rows: tables.into_iter().flat_map(|t| t.rows).collect(),
        }
    }

    /// Tabulate a single response.
    pub fn from_response(response: &FisResponse, options: &TabulateOptions) -> FisResult<Self> {
        let mut primary: Option<&[ChannelStat]> = None;
        let mut cloud: Option<&[ChannelStat]> = None;
        let mut snow: Option<(String, &[ChannelStat])> = None;

        for (channel, stats) in response.channels() {
            match channel {
                Channel::Primary => primary = Some(stats),
                Channel::CloudMask => cloud = Some(stats),
                Channel::SnowMask(id) => {
                    if let Some((first, _)) = &snow {
                        return Err(FisError::UnexpectedChannel(format!("{id} (already using {first})")));
                    }
                    snow = Some((id, stats));
                }
            }
        }

        let primary = primary.unwrap_or_default();
        let cloud = cloud.unwrap_or_default();
        let no_snow: &[ChannelStat] = &[];
        let (snow_id, snow) = snow.unwrap_or_else(|| ("C2".to_string(), no_snow));

        let dates = primary
            .iter()
            .enumerate()
            .map(|(row, stat)| -> FisResult<DateTime<Utc>> {
                let date = stat.date.as_deref().ok_or_else(|| FisError::MissingDate {
                    channel: Channel::Primary.id().to_string(),
                    row,
                })?;
                Ok(parse_time(date)?)
            })
            .collect::<FisResult<Vec<_>>>()?;

        let n_rows = match options.alignment {
            ChannelAlignment::Strict => {
                check_aligned(Channel::CloudMask.id(), cloud, &dates)?;
                check_aligned(&snow_id, snow, &dates)?;
                primary.len()
            }
            ChannelAlignment::Positional => {
                let n = primary.len().max(cloud.len()).max(snow.len());
                let ragged = [primary.len(), cloud.len(), snow.len()]
                    .into_iter()
                    .any(|len| len != 0 && len != n);
                if ragged || primary.len() != n {
                    warn!(
                        primary = primary.len(),
                        cloud = cloud.len(),
                        snow = snow.len(),
                        "FIS channels differ in length, padding with missing values"
                    );
                }
                n
            }
        };

        let rows = (0..n_rows)
            .map(|i| {
                let stats = primary.get(i).map(|s| &s.basic_stats);
                FisRow {
                    date: dates.get(i).copied(),
                    min: stats.and_then(|s| s.min.clone()),
                    max: stats.and_then(|s| s.max.clone()),
                    mean: stats.and_then(|s| s.mean.clone()),
                    st_dev: stats.and_then(|s| s.st_dev.clone()),
                    clm_mean: cloud.get(i).and_then(|s| s.basic_stats.mean.clone()),
                    snw_mean: snow.get(i).and_then(|s| s.basic_stats.mean.clone()),
                    id: None,
                }
            })
            .collect::<Vec<_>>();

        debug!(rows = rows.len(), "Tabulated FIS response");
        Ok(Self { rows })
    }

    /// Tabulate every response and concatenate the results in input order.
    pub fn from_responses<'a>(
        responses: impl IntoIterator<Item = &'a FisResponse>,
        options: &TabulateOptions,
    ) -> FisResult<Self> {
        let tables = responses
            .into_iter()
            .map(|r| Self::from_response(r, options))
            .collect::<FisResult<Vec<_>>>()?;
        Ok(Self::concat(tables))
    }

    /// Tabulate `(ID, response)` pairs, tagging each polygon's rows with its ID.
    pub fn from_identified<'a, S: Into<String>>(
        responses: impl IntoIterator<Item = (S, &'a FisResponse)>,
        options: &TabulateOptions,
    ) -> FisResult<Self> {
        let tables = responses
            .into_iter()
            .map(|(id, r)| -> FisResult<Self> { Ok(Self::from_response(r, options)?.with_id(id)) })
            .collect::<FisResult<Vec<_>>>()?;
        Ok(Self::concat(tables))
    }
}

/// An absent auxiliary channel is accepted and leaves its column missing.
fn check_aligned(channel: &str, stats: &[ChannelStat], dates: &[DateTime<Utc>]) -> FisResult<()> {
    if stats.is_empty() {
        return Ok(());
    }

    if stats.len() != dates.len() {
        return Err(FisError::ChannelLengthMismatch {
            channel: channel.to_string(),
            expected: dates.len(),
            found: stats.len(),
        });
    }

    for (row, (stat, expected)) in stats.iter().zip(dates).enumerate() {
        if let Some(date) = stat.date.as_deref() {
            let found = parse_time(date)?;
            if found != *expected {
                return Err(FisError::ChannelDateMismatch {
                    channel: channel.to_string(),
                    row,
                    expected: expected.to_rfc3339(),
                    found: found.to_rfc3339(),
                });
            }
        }
    }

    Ok(())
}
