//! The persistent geocode cache.
//!
//! A CSV file with columns `address,lat,lon`; the address is the unique
//! key, coordinates are empty for documented failures. A missing or
//! corrupt file loads as an empty cache, never an error — the cache is an
//! optimization, not a source of truth. Merges are last-write-wins by
//! key, and saves go through a temp file + rename so an interrupted run
//! can lose at most the entries not yet flushed, never corrupt the file.

use std::collections::BTreeMap;
use std::path::Path;

use poky_incident_models::Coordinate;
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// One persisted cache row.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRow {
    address: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// In-memory view of the persistent geocode cache.
#[derive(Debug, Default, Clone)]
pub struct GeocodeCache {
    entries: BTreeMap<String, Option<Coordinate>>,
}

impl GeocodeCache {
    /// Loads the cache from `path`.
    ///
    /// A missing or unreadable file yields an empty cache (logged, not
    /// propagated). Duplicate keys within the file resolve last-write-wins.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(cache) => {
                log::info!("Loaded {} cached geocodes from {}", cache.len(), path.display());
                cache
            }
            Err(e) => {
                log::warn!(
                    "Could not read geocode cache at {} ({e}); starting with an empty cache",
                    path.display()
                );
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, StoreError> {
        let mut entries = BTreeMap::new();
        let mut reader = csv::Reader::from_path(path)?;
        for result in reader.deserialize() {
            let row: CacheRow = result?;
            let coordinate = match (row.lat, row.lon) {
                (Some(lat), Some(lon)) => Some(Coordinate { lat, lon }),
                _ => None,
            };
            entries.insert(row.address, coordinate);
        }
        Ok(Self { entries })
    }

    /// Returns the cached outcome for an address: `None` if never tried,
    /// `Some(None)` for a documented failure, `Some(Some(_))` for a hit.
    #[must_use]
    pub fn get(&self, address: &str) -> Option<Option<Coordinate>> {
        self.entries.get(address).copied()
    }

    /// Returns the cached coordinate for an address, if it resolved.
    #[must_use]
    pub fn coordinate(&self, address: &str) -> Option<Coordinate> {
        self.entries.get(address).copied().flatten()
    }

    /// All entries, keyed by canonical address.
    #[must_use]
    pub const fn entries(&self) -> &BTreeMap<String, Option<Coordinate>> {
        &self.entries
    }

    /// Number of cached addresses (hits and documented failures).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merges new entries into the cache, last-write-wins by key.
    pub fn merge(&mut self, new_entries: impl IntoIterator<Item = (String, Option<Coordinate>)>) {
        for (address, coordinate) in new_entries {
            self.entries.insert(address, coordinate);
        }
    }

    /// Persists the cache atomically: write to a temp file alongside the
    /// target, then rename over it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the temp file cannot be written or the
    /// rename fails.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            crate::paths::ensure_dir(parent)?;
        }

        let tmp = path.with_extension("csv.tmp");
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            for (address, coordinate) in &self.entries {
                writer.serialize(CacheRow {
                    address: address.clone(),
                    lat: coordinate.map(|c| c.lat),
                    lon: coordinate.map(|c| c.lon),
                })?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, path)?;

        log::info!("Saved {} geocode cache entries to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = GeocodeCache::load(&dir.path().join("nope.csv"));
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode_cache.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"address,lat,lon\n\"unterminated,not-a-float\n")
            .unwrap();

        let cache = GeocodeCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn round_trips_hits_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode_cache.csv");

        let mut cache = GeocodeCache::default();
        cache.merge([
            ("100 MAIN ST".to_string(), Some(coord(42.87, -112.44))),
            ("999 NOWHERE RD".to_string(), None),
        ]);
        cache.save(&path).unwrap();

        let reloaded = GeocodeCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.coordinate("100 MAIN ST"), Some(coord(42.87, -112.44)));
        // The failed lookup is present but carries no coordinate.
        assert_eq!(reloaded.get("999 NOWHERE RD"), Some(None));
        assert_eq!(reloaded.get("NEVER TRIED"), None);
    }

    #[test]
    fn merge_is_last_write_wins() {
        let mut cache = GeocodeCache::default();
        cache.merge([("A".to_string(), Some(coord(1.0, 2.0)))]);
        cache.merge([("A".to_string(), Some(coord(3.0, 4.0)))]);
        assert_eq!(cache.coordinate("A"), Some(coord(3.0, 4.0)));

        // A later failure also overrides an earlier hit.
        cache.merge([("A".to_string(), None)]);
        assert_eq!(cache.get("A"), Some(None));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode_cache.csv");

        let mut cache = GeocodeCache::default();
        cache.merge([("A".to_string(), Some(coord(1.0, 2.0)))]);
        cache.save(&path).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn duplicate_keys_in_file_resolve_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode_cache.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"address,lat,lon\nA,1.0,2.0\nA,3.0,4.0\n")
            .unwrap();

        let cache = GeocodeCache::load(&path);
        assert_eq!(cache.coordinate("A"), Some(coord(3.0, 4.0)));
    }
}
