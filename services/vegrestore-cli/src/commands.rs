//! Subcommand implementations.
//!
//! Each command takes a decoded JSON payload and returns the JSON it prints,
//! so the I/O in `main` stays thin.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::info;

use sensing_request::{bbox_from_geometries, eval_script, GeometrySet};
use sensing_tables::{clean_fis_table, tabulate_region_with, FisResponse, FisTable, RegionArray};

use crate::config::ToolsConfig;

/// Read and decode a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Tabulate a region array into JSON records.
pub fn region(input: Value, bands: &[String], config: &ToolsConfig) -> Result<Value> {
    let array = RegionArray::from_json(input)?;
    let table = tabulate_region_with(&array, bands, &config.region_options())?;
    info!(rows = table.len(), columns = ?table.columns(), "Region table built");
    Ok(Value::Array(
        table.to_records().into_iter().map(Value::Object).collect(),
    ))
}

/// Tabulate a list of FIS responses and, unless `raw`, clean the result.
///
/// Responses are tagged with `ids` in order; without ids each response is
/// tagged with its position in the list.
pub fn fis(input: Value, ids: &[String], raw: bool, config: &ToolsConfig) -> Result<Value> {
    let responses = match input {
        Value::Array(_) => FisResponse::list_from_json(input)?,
        other => vec![FisResponse::from_json(other)?],
    };

    if !ids.is_empty() && ids.len() != responses.len() {
        bail!(
            "got {} ids for {} FIS responses",
            ids.len(),
            responses.len()
        );
    }

    let ids: Vec<String> = if ids.is_empty() {
        (0..responses.len()).map(|i| i.to_string()).collect()
    } else {
        ids.to_vec()
    };

    let table = FisTable::from_identified(
        ids.into_iter().zip(&responses),
        &config.tabulate_options(),
    )?;
    info!(responses = responses.len(), rows = table.len(), "FIS table built");

    if raw {
        return Ok(serde_json::to_value(&table)?);
    }

    let clean = clean_fis_table(&table, &config.clean_options())?;
    info!(rows = clean.len(), "FIS table cleaned");
    Ok(serde_json::to_value(&clean)?)
}

/// Rounded WGS84 bounding box of a GeoJSON document.
pub fn bbox(input: Value, config: &ToolsConfig) -> Result<Value> {
    let set = GeometrySet::from_geojson(input)?;
    let bbox = bbox_from_geometries(&set, config.bbox_precision)?;
    Ok(serde_json::to_value(bbox)?)
}

/// Evalscript for a sensor/algorithm name.
pub fn evalscript(name: &str) -> Result<&'static str> {
    Ok(eval_script(name)?)
}
