#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Persistent storage for the poky-incidents pipeline.
//!
//! Everything durable lives here as plain CSV under the data directory:
//!
//! - [`cache`] — the geocode cache (`address,lat,lon`), shared across
//!   runs. Caches both successful geocodes and failed lookups (null
//!   coordinates) so we don't re-query the same addresses.
//! - [`review`] — intersection addresses deferred to manual review,
//!   rewritten fresh each run.
//! - [`tidy`] — the final tidy dataset, one row per cleaned record
//!   left-joined with the cache.
//! - [`paths`] — the canonical data-directory layout.

pub mod cache;
pub mod paths;
pub mod review;
pub mod tidy;

use thiserror::Error;

/// Errors from storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding/decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
