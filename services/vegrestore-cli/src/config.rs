//! Runtime configuration for the command-line tools.

use serde::{Deserialize, Serialize};
use std::env;

use sensing_request::DEFAULT_PRECISION;
use sensing_tables::{ChannelAlignment, CleanOptions, RegionOptions, TabulateOptions};

/// Settings shared by all subcommands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// How FIS auxiliary channels are paired with the primary channel.
    pub channel_alignment: ChannelAlignment,

    /// Cloud/snow means above this value mark a sample as contaminated.
    pub contamination_threshold: f64,

    /// Decimal places for bounding boxes.
    pub bbox_precision: u32,

    /// Keep region rows whose band values are not numeric.
    pub keep_unparseable_bands: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            channel_alignment: ChannelAlignment::Strict,
            contamination_threshold: 0.0,
            bbox_precision: DEFAULT_PRECISION,
            keep_unparseable_bands: false,
        }
    }
}

impl ToolsConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparseable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("VEGRESTORE_CHANNEL_ALIGNMENT") {
            if let Ok(alignment) = val.parse() {
                config.channel_alignment = alignment;
            }
        }

        if let Some(val) = lookup("VEGRESTORE_CONTAMINATION_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.contamination_threshold = threshold;
            }
        }

        if let Some(val) = lookup("VEGRESTORE_BBOX_PRECISION") {
            if let Ok(precision) = val.parse() {
                config.bbox_precision = precision;
            }
        }

        if let Some(val) = lookup("VEGRESTORE_KEEP_UNPARSEABLE_BANDS") {
            config.keep_unparseable_bands = val.to_lowercase() == "true" || val == "1";
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.contamination_threshold.is_finite() || self.contamination_threshold < 0.0 {
            return Err("contamination_threshold must be a finite value >= 0".to_string());
        }

        if self.bbox_precision > 10 {
            return Err("bbox_precision must be 0-10".to_string());
        }

        Ok(())
    }

    pub fn region_options(&self) -> RegionOptions {
        RegionOptions {
            drop_unparseable: !self.keep_unparseable_bands,
        }
    }

    pub fn tabulate_options(&self) -> TabulateOptions {
        TabulateOptions {
            alignment: self.channel_alignment,
        }
    }

    pub fn clean_options(&self) -> CleanOptions {
        CleanOptions {
            contamination_threshold: self.contamination_threshold,
        }
    }
}
