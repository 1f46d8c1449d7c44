#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address canonicalization and cached Nominatim geocoding for
//! poky-incidents.
//!
//! Converts cleaned incident addresses to latitude/longitude coordinates
//! using the Nominatim / `OpenStreetMap` geocoder, which enforces a strict
//! **1 request per second** rate limit. The [`resolver`] applies the full
//! best-effort policy on top of the raw provider:
//!
//! - skip addresses already resolved (or documented as failed) in the
//!   persistent cache,
//! - defer ambiguous intersection addresses to manual review,
//! - retry unmatched addresses with inferred street-type suffixes,
//! - throttle every external call.
//!
//! The provider itself sits behind the [`Geocoder`] trait so the retry
//! policy is testable with a fake, without network I/O.

pub mod address;
pub mod nominatim;
pub mod resolver;

use async_trait::async_trait;
use poky_incident_models::Coordinate;
use thiserror::Error;

/// Errors from a single geocoding call.
///
/// These are recoverable at the batch level: the resolver logs them and
/// treats the address as unmatched rather than aborting the run.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed (includes timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// A single-address geocoding provider.
///
/// The resolver is generic over this seam; tests inject a scripted fake to
/// exercise the cache/fallback policy without network I/O.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a free-form address query to a coordinate.
    ///
    /// `Ok(None)` means the provider answered but found no match.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the request or response parsing fails.
    async fn resolve(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError>;
}
