#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Progress bars and logger setup shared by poky-incidents binaries.
//!
//! Provides an `indicatif`-backed implementation of the pipeline's
//! [`ProgressCallback`] trait, plus [`init_logger`] which wires
//! `pretty_env_logger` through `indicatif-log-bridge` so that `log::info!`
//! and friends are suspended while progress bars redraw.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use poky_incident_models::progress::ProgressCallback;

pub use indicatif::MultiProgress;

/// An `indicatif` progress bar behind the [`ProgressCallback`] trait.
///
/// Each [`ProgressCallback::begin`] call replaces the previous bar, so a
/// single instance can be threaded through every pipeline stage. Stages
/// with an unknown total render as a spinner.
pub struct IndicatifProgress {
    multi: MultiProgress,
    bar: std::sync::Mutex<ProgressBar>,
}

impl IndicatifProgress {
    /// Creates a stage progress reporter attached to `multi`.
    #[must_use]
    pub fn new(multi: &MultiProgress) -> Arc<dyn ProgressCallback> {
        Arc::new(Self {
            multi: multi.clone(),
            bar: std::sync::Mutex::new(ProgressBar::hidden()),
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "  {msg} {wide_bar:.cyan/dim} {pos}/{len} {percent}% [{eta}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl ProgressCallback for IndicatifProgress {
    fn begin(&self, msg: String, total: Option<u64>) {
        let bar = match total {
            Some(len) => {
                let bar = self.multi.add(ProgressBar::new(len));
                bar.set_style(Self::bar_style());
                bar
            }
            None => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.enable_steady_tick(Duration::from_millis(100));
                bar.set_style(Self::spinner_style());
                bar
            }
        };
        bar.set_message(msg);

        let previous = std::mem::replace(&mut *self.bar.lock().unwrap(), bar);
        previous.finish_and_clear();
    }

    fn inc(&self, delta: u64) {
        self.bar.lock().unwrap().inc(delta);
    }

    fn finish(&self, msg: String) {
        self.bar.lock().unwrap().finish_with_message(msg);
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// log lines and progress bars never fight for the terminal.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    // Build the pretty-env-logger logger manually so we can wrap it.
    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)

    log::set_max_level(level);

    multi
}
