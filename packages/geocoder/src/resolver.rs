//! Best-effort, cache-aware address resolution.
//!
//! Given the deduplicated set of canonical addresses for a run, resolves
//! each to a coordinate through a [`Geocoder`], consulting the
//! already-loaded cache first. Only cache misses reach the external
//! service; every external attempt is followed by the mandatory rate-limit
//! delay. Provider errors on a single address are recovered locally and
//! recorded as unmatched — one bad address never aborts the batch.
//!
//! Every processed address produces a cache entry (success or documented
//! failure) so it is not re-queried on the next run. Intersection
//! addresses are the exception: they are deferred to manual review without
//! a query and without a cache entry.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use poky_incident_models::Coordinate;
use poky_incident_models::progress::ProgressCallback;

use crate::{Geocoder, address};

/// Mandatory delay after every external geocoding call.
///
/// This is a rate-limiting contract with the Nominatim public instance
/// (1 request per second), not a tunable knob.
pub const RATE_LIMIT_DELAY: Duration = Duration::from_secs(1);

/// Counters describing one resolution run, for logging and assertion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolveStats {
    /// Unique addresses considered.
    pub unique_addresses: u64,
    /// Addresses already cached with coordinates.
    pub cache_hits: u64,
    /// Addresses already cached as failed lookups (not re-queried).
    pub known_failures: u64,
    /// Addresses newly resolved, including via fallback.
    pub resolved: u64,
    /// Subset of `resolved` that needed a street-type fallback query.
    pub fallback_resolved: u64,
    /// Addresses queried but unmatched (cached as failures).
    pub unmatched: u64,
    /// Intersection addresses deferred to manual review.
    pub intersections: u64,
    /// External geocoding calls issued.
    pub external_calls: u64,
}

/// Result of one resolution run.
#[derive(Debug)]
pub struct ResolveOutcome {
    /// New cache entries (successes and documented failures), in
    /// processing order. Merged into the persistent cache by the caller.
    pub new_entries: Vec<(String, Option<Coordinate>)>,
    /// Intersection addresses deferred to manual review.
    pub review: Vec<String>,
    /// Run counters.
    pub stats: ResolveStats,
}

/// Resolves every address not already covered by the cache.
///
/// `addresses` may contain duplicates (one per record); they are
/// deduplicated here so cost scales with unique addresses, not row count.
/// `cached` is the loaded persistent cache: keys with `Some` coordinates
/// are hits, keys with `None` are documented failures — neither is
/// re-queried.
pub async fn resolve_addresses(
    geocoder: &dyn Geocoder,
    addresses: &[String],
    cached: &BTreeMap<String, Option<Coordinate>>,
    progress: &Arc<dyn ProgressCallback>,
) -> ResolveOutcome {
    let mut seen = BTreeSet::new();
    let unique: Vec<&String> = addresses.iter().filter(|a| seen.insert(a.as_str())).collect();

    let mut stats = ResolveStats {
        unique_addresses: unique.len() as u64,
        ..ResolveStats::default()
    };
    let mut new_entries = Vec::new();
    let mut review = Vec::new();

    progress.begin("Geocoding addresses".to_string(), Some(unique.len() as u64));

    for addr in unique {
        match cached.get(addr.as_str()) {
            Some(Some(_)) => {
                stats.cache_hits += 1;
                progress.inc(1);
                continue;
            }
            Some(None) => {
                stats.known_failures += 1;
                progress.inc(1);
                continue;
            }
            None => {}
        }

        if address::is_intersection(addr) {
            log::info!("Skipping intersection address: {addr}");
            stats.intersections += 1;
            review.push(addr.clone());
            progress.inc(1);
            continue;
        }

        let mut coordinate = throttled_resolve(geocoder, addr, &mut stats).await;
        let mut via_fallback = false;

        if coordinate.is_none() {
            for candidate in address::fallback_candidates(addr) {
                if let Some(coord) = throttled_resolve(geocoder, &candidate, &mut stats).await {
                    log::info!(
                        "Geocoded (added street type): {candidate} -> ({:.5}, {:.5})",
                        coord.lat,
                        coord.lon
                    );
                    coordinate = Some(coord);
                    via_fallback = true;
                    break;
                }
            }
        }

        match coordinate {
            Some(coord) => {
                stats.resolved += 1;
                if via_fallback {
                    stats.fallback_resolved += 1;
                } else {
                    log::info!("Geocoded: {addr} -> ({:.5}, {:.5})", coord.lat, coord.lon);
                }
                new_entries.push((addr.clone(), Some(coord)));
            }
            None => {
                log::warn!("No geocode result: {addr}");
                stats.unmatched += 1;
                new_entries.push((addr.clone(), None));
            }
        }

        progress.inc(1);
    }

    progress.finish(format!(
        "Geocoding complete -- {} resolved, {} unmatched, {} for review",
        stats.resolved, stats.unmatched, stats.intersections
    ));

    ResolveOutcome {
        new_entries,
        review,
        stats,
    }
}

/// Issues one external call followed by the mandatory rate-limit delay.
///
/// Provider errors are logged and collapsed into "no match" here — the
/// per-address best-effort policy of the batch.
async fn throttled_resolve(
    geocoder: &dyn Geocoder,
    query: &str,
    stats: &mut ResolveStats,
) -> Option<Coordinate> {
    stats.external_calls += 1;
    let result = geocoder.resolve(query).await;
    tokio::time::sleep(RATE_LIMIT_DELAY).await;

    match result {
        Ok(found) => found,
        Err(e) => {
            log::warn!("Geocode failed for {query}: {e}");
            None
        }
    }
}
