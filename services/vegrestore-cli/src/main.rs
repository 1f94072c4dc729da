//! vegrestore command-line tools.
//!
//! Reshapes JSON results from the image-region sampling and Feature Info
//! services into tables, prints evalscripts, and computes request bounding
//! boxes. Output is JSON on stdout; logs go to stderr.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use sensing_tables::ChannelAlignment;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use config::ToolsConfig;

#[derive(Parser, Debug)]
#[command(name = "vegrestore")]
#[command(about = "Tabulate remote-sensing query results")]
struct Args {
    /// Log level
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tabulate an image-region sampling array
    Region {
        /// JSON file holding the list-of-rows array
        #[arg(short, long)]
        input: PathBuf,

        /// Band columns to keep (repeatable)
        #[arg(short, long = "band", required = true)]
        bands: Vec<String>,

        /// Keep rows whose band values are not numeric
        #[arg(long)]
        keep_unparseable: bool,
    },

    /// Tabulate and clean Feature Info Service responses
    Fis {
        /// JSON file holding one response or a list of responses
        #[arg(short, long)]
        input: PathBuf,

        /// Polygon ID per response, in order (repeatable)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Print the combined table without cleaning
        #[arg(long)]
        raw: bool,

        /// Channel pairing: strict or positional
        #[arg(long)]
        alignment: Option<ChannelAlignment>,

        /// Cloud/snow mean above which a sample is dropped
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Print the evalscript for a sensor/algorithm name
    Evalscript {
        /// e.g. Sentinel_2_NDVI or Landsat_8_NDVI
        name: String,
    },

    /// Rounded WGS84 bounding box of GeoJSON polygons
    Bbox {
        /// GeoJSON file (FeatureCollection, Feature, geometry or geometry list)
        #[arg(short, long)]
        input: PathBuf,

        /// Decimal places to round to
        #[arg(long)]
        precision: Option<u32>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let mut config = ToolsConfig::from_env();
    apply_overrides(&mut config, &args.command);
    config.validate().map_err(|e| anyhow!("invalid configuration: {e}"))?;
    debug!(?config, "Loaded configuration");

    match args.command {
        Command::Region { input, bands, .. } => {
            let value = commands::read_json(&input)?;
            print_json(&commands::region(value, &bands, &config)?)
        }
        Command::Fis { input, ids, raw, .. } => {
            let value = commands::read_json(&input)?;
            print_json(&commands::fis(value, &ids, raw, &config)?)
        }
        Command::Evalscript { name } => {
            print!("{}", commands::evalscript(&name)?);
            Ok(())
        }
        Command::Bbox { input, .. } => {
            let value = commands::read_json(&input)?;
            print_json(&commands::bbox(value, &config)?)
        }
    }
}

/// Command-line flags win over environment settings.
fn apply_overrides(config: &mut ToolsConfig, command: &Command) {
    match command {
        Command::Region {
            keep_unparseable, ..
        } => {
            if *keep_unparseable {
                config.keep_unparseable_bands = true;
            }
        }
        Command::Fis {
            alignment,
            threshold,
            ..
        } => {
            if let Some(alignment) = alignment {
                config.channel_alignment = *alignment;
            }
            if let Some(threshold) = threshold {
                config.contamination_threshold = *threshold;
            }
        }
        Command::Bbox { precision, .. } => {
            if let Some(precision) = precision {
                config.bbox_precision = *precision;
            }
        }
        Command::Evalscript { .. } => {}
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
