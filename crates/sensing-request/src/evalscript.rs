//! Pixel evaluation scripts for common sensor/algorithm pairs.
//!
//! Each script returns three bands so that a statistics request yields
//! channels `C0` (the index), `C1` (cloud mask) and `C2` (snow mask).

use std::fmt;
use std::str::FromStr;

use crate::error::EvalScriptError;

const SENTINEL_2_NDVI: &str = r#"//VERSION=3
function setup() {
  return {
    input: [{
      bands: ["B04", "B08", "CLM", "SNW"]
    }],
    output: {
      bands: 3,
      sampleType: "FLOAT32"
    }
  };
}

function evaluatePixel(samples) {
  let ndvi = (samples.B08 - samples.B04) / (samples.B08 + samples.B04);
  return [ndvi, samples.CLM, samples.SNW];
}
"#;

// BQA bits 5-6 hold cloud confidence and bits 9-10 snow/ice confidence;
// only high confidence (3) is flagged.
const LANDSAT_8_NDVI: &str = r#"//VERSION=3
function setup() {
  return {
    input: [{
      bands: ["B04", "B05", "BQA"]
    }],
    output: {
      bands: 3,
      sampleType: "FLOAT32"
    }
  };
}

function confidence(bqa, shift) {
  return (bqa >> shift) & 3;
}

function evaluatePixel(samples) {
  let ndvi = (samples.B05 - samples.B04) / (samples.B05 + samples.B04);
  let cloud = confidence(samples.BQA, 5) == 3 ? 1 : 0;
  let snow = confidence(samples.BQA, 9) == 3 ? 1 : 0;
  return [ndvi, cloud, snow];
}
"#;

/// Sensor and algorithm pair a script exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sensor {
    Sentinel2Ndvi,
    Landsat8Ndvi,
}

impl Sensor {
    pub fn all() -> &'static [Sensor] {
        &[Sensor::Sentinel2Ndvi, Sensor::Landsat8Ndvi]
    }

    /// Name used to select the script.
    pub fn name(&self) -> &'static str {
        match self {
            Sensor::Sentinel2Ndvi => "Sentinel_2_NDVI",
            Sensor::Landsat8Ndvi => "Landsat_8_NDVI",
        }
    }

    pub fn eval_script(&self) -> &'static str {
        match self {
            Sensor::Sentinel2Ndvi => SENTINEL_2_NDVI,
            Sensor::Landsat8Ndvi => LANDSAT_8_NDVI,
        }
    }

    /// Channel ids a statistics request returns for this script, in band order.
    pub fn output_channels(&self) -> &'static [&'static str] {
        match self {
            Sensor::Sentinel2Ndvi | Sensor::Landsat8Ndvi => &["C0", "C1", "C2"],
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sensor {
    type Err = EvalScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sensor::all()
            .iter()
            .copied()
            .find(|sensor| sensor.name() == s)
            .ok_or_else(|| EvalScriptError::UnknownSensor(s.to_string()))
    }
}

/// Script for a sensor/algorithm name such as `"Sentinel_2_NDVI"`.
pub fn eval_script(name: &str) -> Result<&'static str, EvalScriptError> {
    Ok(name.parse::<Sensor>()?.eval_script())
}
