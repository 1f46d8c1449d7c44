#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the poky-incidents pipeline.
//!
//! Runs the full ETL + geocoding build: clean raw exports, resolve
//! addresses through the cached Nominatim geocoder, and write the tidy
//! dataset. Set `RUST_LOG=info` for stage-by-stage row counts.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use poky_geocoder::nominatim::Nominatim;
use poky_pipeline::PipelineConfig;

/// Build the tidy incident dataset from raw police-log exports.
#[derive(Parser)]
#[command(name = "poky", about = "Build the tidy incident dataset from raw police-log exports")]
struct Args {
    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data root directory (overrides the config file).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Raw-export directory (overrides the config file).
    #[arg(long)]
    raw_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = poky_cli_utils::init_logger();
    let args = Args::parse();

    let mut config = PipelineConfig::load(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(raw_dir) = args.raw_dir {
        config.raw_dir = Some(raw_dir);
    }

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    let geocoder = Nominatim::new(client, config.nominatim_base_url.clone());

    let progress = poky_cli_utils::IndicatifProgress::new(&multi);

    log::info!("Starting poky-incidents build");
    let summary = poky_pipeline::run(&config, &geocoder, &progress).await?;
    log::info!(
        "Build complete: {} rows written, {} geocoded ({} cache hits, {} external calls)",
        summary.tidy_rows,
        summary.geocoded_rows,
        summary.resolve.cache_hits,
        summary.resolve.external_calls
    );

    Ok(())
}
