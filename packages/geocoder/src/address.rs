//! Address canonicalization for geocoding.
//!
//! Raw police-log addresses carry trailing descriptors after a semicolon
//! (`"100 MAIN; ALBERTSONS"`) and no geographic context. Canonicalization
//! truncates at the first semicolon, trims, and appends the municipal
//! context suffix, producing the string used as the geocode cache key.
//!
//! Addresses often omit the street-type token (`"100 MAIN"` instead of
//! `"100 MAIN ST"`), which Nominatim frequently fails to match. When the
//! street segment lacks a recognized type, [`fallback_candidates`] yields
//! re-assembled queries with each type appended in turn.

/// Recognized street-type tokens, in fallback order.
pub const STREET_TYPES: &[&str] = &[
    "St", "Ave", "Dr", "Rd", "Blvd", "Pl", "Ct", "Ln", "Way", "Cir", "Ter",
];

/// Default municipal context appended to every cleaned address.
pub const DEFAULT_CONTEXT_SUFFIX: &str = ", Pocatello, ID 83201";

/// Canonicalizes a raw address: truncate at the first semicolon, trim, and
/// append the municipal context suffix.
///
/// Returns `None` when nothing remains after cleaning; the ETL loader
/// drops such rows.
#[must_use]
pub fn canonicalize(raw: &str, context_suffix: &str) -> Option<String> {
    let street = raw.split(';').next().unwrap_or("").trim();
    if street.is_empty() {
        return None;
    }
    Some(format!("{street}{context_suffix}"))
}

/// Whether the address describes an intersection of two cross streets.
///
/// Intersections are inherently ambiguous for single-point geocoding and
/// are deferred to manual review instead of being queried.
#[must_use]
pub fn is_intersection(address: &str) -> bool {
    address.contains('&')
}

/// The street segment of a canonical address: the text before the first
/// comma.
#[must_use]
pub fn street_segment(address: &str) -> &str {
    address.split(',').next().unwrap_or(address).trim()
}

/// Whether the street segment already ends in a recognized street type.
#[must_use]
pub fn has_street_type(segment: &str) -> bool {
    let upper = segment.to_uppercase();
    STREET_TYPES
        .iter()
        .any(|stype| upper.ends_with(&format!(" {}", stype.to_uppercase())))
}

/// Builds the street-type fallback queries for an unmatched address.
///
/// Returns one candidate per [`STREET_TYPES`] entry with the type appended
/// to the street segment, keeping the rest of the address intact. Empty
/// when the segment already carries a street type (no inference to do).
#[must_use]
pub fn fallback_candidates(address: &str) -> Vec<String> {
    let segment = street_segment(address);
    if has_street_type(segment) {
        return Vec::new();
    }

    let rest = address
        .split_once(',')
        .map(|(_, tail)| tail.trim())
        .unwrap_or("");

    STREET_TYPES
        .iter()
        .map(|stype| {
            if rest.is_empty() {
                format!("{segment} {stype}")
            } else {
                format!("{segment} {stype}, {rest}")
            }
        })
        .collect()
}
