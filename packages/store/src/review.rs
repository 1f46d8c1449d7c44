//! Manual-review list for intersection addresses.
//!
//! Addresses skipped during geocoding because they describe a street
//! intersection are written here for a human to resolve. The file is
//! rewritten fresh each run so stale entries never linger.

use std::path::Path;

use serde::Serialize;

use crate::StoreError;

#[derive(Serialize)]
struct ReviewRow<'a> {
    address: &'a str,
}

/// Writes the manual-review list, replacing any previous run's file.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be written.
pub fn write(path: &Path, addresses: &[String]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for address in addresses {
        writer.serialize(ReviewRow { address })?;
    }
    writer.flush()?;

    if !addresses.is_empty() {
        log::info!(
            "Saved {} intersection addresses to {} for manual review",
            addresses.len(),
            path.display()
        );
    }
    Ok(())
}
