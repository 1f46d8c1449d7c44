#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Schema normalization, date parsing, and nature classification for raw
//! police logs.
//!
//! Raw exports arrive as year-prefixed CSV files with inconsistent header
//! casing and spacing, several date formats, and free-text nature strings.
//! This crate reconciles them into [`poky_incident_models::CleanRecord`]s:
//!
//! 1. [`columns`] — declarative raw-header → canonical-field mapping,
//!    validated at load time. Missing canonical fields are a fatal
//!    contract violation, never silently worked around.
//! 2. [`dates`] — ordered-format timestamp parsing; unparseable rows are
//!    dropped (quality over completeness).
//! 3. [`classify`] — ordered keyword rules mapping natures to the fixed
//!    [`poky_incident_models::NatureGroup`] taxonomy.
//! 4. [`load`] — the loader that ties these together and reports row
//!    counts at every filtering step for auditability of data loss.

pub mod classify;
pub mod columns;
pub mod dates;
pub mod load;

use thiserror::Error;

pub use load::{LoadStats, load_and_clean};

/// Errors from the ETL stage.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Required canonical columns were absent after header normalization.
    /// This indicates a schema contract violation in the upstream export.
    #[error("required columns missing: {missing:?}. Available columns: {available:?}")]
    MissingColumns {
        /// Canonical fields that could not be mapped.
        missing: Vec<String>,
        /// Normalized headers that were present in the file.
        available: Vec<String>,
    },

    /// Filesystem error while scanning or reading raw files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No raw files matched the year-prefixed naming pattern.
    #[error("no raw files matching '20*.csv' found in {dir}")]
    NoRawFiles {
        /// Directory that was scanned.
        dir: String,
    },
}
