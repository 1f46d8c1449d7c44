#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pipeline orchestrator for poky-incidents.
//!
//! Sequences the stages end to end: load + clean raw files → resolve
//! addresses against the cached geocoder → persist the merged cache and
//! manual-review list → write the tidy dataset.
//!
//! Error policy is fail-fast at this level: any stage error aborts the
//! run. Best-effort recovery (per-address geocoding failures) lives
//! inside the resolver, not here.

pub mod config;

use std::sync::Arc;

use poky_etl::EtlError;
use poky_etl::load::LoadStats;
use poky_geocoder::Geocoder;
use poky_geocoder::resolver::{self, ResolveStats};
use poky_incident_models::progress::ProgressCallback;
use poky_store::paths::DataPaths;
use poky_store::{StoreError, cache::GeocodeCache, review, tidy};
use thiserror::Error;

pub use config::PipelineConfig;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// ETL stage failure (schema violation, unreadable raw files).
    #[error(transparent)]
    Etl(#[from] EtlError),

    /// Storage failure (cache, review list, or tidy output).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Counters summarizing one completed run.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// ETL row counts.
    pub load: LoadStats,
    /// Geocode resolution counts.
    pub resolve: ResolveStats,
    /// Rows written to the tidy dataset.
    pub tidy_rows: u64,
    /// Tidy rows that carried resolved coordinates.
    pub geocoded_rows: u64,
}

/// Runs the full pipeline.
///
/// The pipeline always completes and always produces a tidy dataset
/// (possibly with null coordinates) unless a fatal configuration error —
/// missing canonical columns, unreadable directories — aborts it.
///
/// # Errors
///
/// Returns [`PipelineError`] if any stage fails fatally.
pub async fn run(
    config: &PipelineConfig,
    geocoder: &dyn Geocoder,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RunSummary, PipelineError> {
    let paths = DataPaths::new(&config.data_dir);
    paths.ensure()?;

    log::info!("Loading and cleaning raw files from {}", config.raw_dir().display());
    let (records, load_stats) =
        poky_etl::load_and_clean(&config.raw_dir(), &config.address_suffix, progress)?;
    log::info!("Loaded {} records", load_stats.kept);

    log::info!("Geocoding addresses (with cache)...");
    let mut cache = GeocodeCache::load(&paths.cache_file());
    let addresses: Vec<String> = records.iter().map(|r| r.address.clone()).collect();
    let outcome = resolver::resolve_addresses(geocoder, &addresses, cache.entries(), progress).await;

    cache.merge(outcome.new_entries);
    cache.save(&paths.cache_file())?;
    review::write(&paths.review_file(), &outcome.review)?;

    log::info!("Writing tidy CSV to {}", paths.tidy_file().display());
    let geocoded_rows = tidy::write(&paths.tidy_file(), &records, &cache)?;

    let summary = RunSummary {
        load: load_stats,
        resolve: outcome.stats,
        tidy_rows: records.len() as u64,
        geocoded_rows,
    };
    log::info!(
        "Run complete: {} tidy rows, {} geocoded, {} unmatched, {} deferred to review",
        summary.tidy_rows,
        summary.geocoded_rows,
        summary.resolve.unmatched,
        summary.resolve.intersections
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use poky_geocoder::GeocodeError;
    use poky_incident_models::Coordinate;
    use poky_incident_models::progress::null_progress;
    use std::io::Write as _;
    use std::path::Path;
    use std::sync::Mutex;

    struct MapGeocoder {
        hits: Vec<(String, Coordinate)>,
        calls: Mutex<u64>,
    }

    impl MapGeocoder {
        fn new(hits: Vec<(String, Coordinate)>) -> Self {
            Self {
                hits,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u64 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Geocoder for MapGeocoder {
        async fn resolve(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self
                .hits
                .iter()
                .find(|(addr, _)| addr == query)
                .map(|&(_, coord)| coord))
        }
    }

    fn write_raw(raw_dir: &Path, contents: &str) {
        std::fs::create_dir_all(raw_dir).unwrap();
        let mut file = std::fs::File::create(raw_dir.join("2023_export.csv")).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn test_config(data_dir: &Path) -> PipelineConfig {
        PipelineConfig {
            data_dir: data_dir.to_path_buf(),
            ..PipelineConfig::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn end_to_end_produces_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_raw(
            &config.raw_dir(),
            "Incident,Nature,Area,Agency,Reported,Incident Address\n\
             23-001,THEFT,A1,PPD,2023-07-14 22:15:00,100 MAIN ST\n\
             23-002,DUI,A2,PPD,2023-07-14 23:00:00,4TH & CENTER\n\
             23-003,LOUD NOISE,A1,PPD,2023-07-15 01:30:00,999 NOWHERE RD\n",
        );

        let geocoder = MapGeocoder::new(vec![(
            "100 MAIN ST, Pocatello, ID 83201".to_string(),
            Coordinate {
                lat: 42.87,
                lon: -112.44,
            },
        )]);

        let summary = run(&config, &geocoder, &null_progress()).await.unwrap();

        assert_eq!(summary.tidy_rows, 3);
        assert_eq!(summary.geocoded_rows, 1);
        assert_eq!(summary.resolve.intersections, 1);
        assert_eq!(summary.resolve.unmatched, 1);

        let paths = DataPaths::new(dir.path());
        let tidy = std::fs::read_to_string(paths.tidy_file()).unwrap();
        assert_eq!(tidy.lines().count(), 4);

        let review = std::fs::read_to_string(paths.review_file()).unwrap();
        assert!(review.contains("4TH & CENTER"));

        let cache = GeocodeCache::load(&paths.cache_file());
        // The hit and the documented failure are cached; the intersection
        // is not.
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn second_run_issues_no_external_calls() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_raw(
            &config.raw_dir(),
            "Incident,Nature,Area,Agency,Reported,Incident Address\n\
             23-001,THEFT,A1,PPD,2023-07-14 22:15:00,100 MAIN ST\n\
             23-003,LOUD NOISE,A1,PPD,2023-07-15 01:30:00,999 NOWHERE RD\n",
        );

        let geocoder = MapGeocoder::new(vec![(
            "100 MAIN ST, Pocatello, ID 83201".to_string(),
            Coordinate {
                lat: 42.87,
                lon: -112.44,
            },
        )]);

        run(&config, &geocoder, &null_progress()).await.unwrap();
        let first_run_calls = geocoder.calls();
        assert!(first_run_calls > 0);

        let summary = run(&config, &geocoder, &null_progress()).await.unwrap();
        // Warm cache: both the hit and the documented failure stand.
        assert_eq!(geocoder.calls(), first_run_calls);
        assert_eq!(summary.resolve.external_calls, 0);
        assert_eq!(summary.geocoded_rows, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_columns_abort_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_raw(
            &config.raw_dir(),
            "Incident,Nature,Reported\n23-001,THEFT,2023-07-14 22:15:00\n",
        );

        let geocoder = MapGeocoder::new(Vec::new());
        let err = run(&config, &geocoder, &null_progress()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Etl(EtlError::MissingColumns { .. })));
    }
}
