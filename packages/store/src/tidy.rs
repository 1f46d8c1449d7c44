//! Tidy-dataset writer.
//!
//! Produces the final output consumed by all downstream reporting: one
//! row per cleaned record, left-joined with the geocode cache by canonical
//! address. Unresolved addresses propagate as empty `lat`/`lon` cells —
//! rows are never dropped for missing coordinates.

use std::path::Path;

use poky_incident_models::{CleanRecord, TidyRecord};

use crate::StoreError;
use crate::cache::GeocodeCache;

/// Writes the tidy dataset, one row per record. Written once per pipeline
/// run, never mutated afterward.
///
/// Returns the number of rows that carried resolved coordinates.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be written.
pub fn write(
    path: &Path,
    records: &[CleanRecord],
    cache: &GeocodeCache,
) -> Result<u64, StoreError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    let mut geocoded = 0u64;
    let mut writer = csv::Writer::from_path(path)?;

    for record in records {
        let coordinate = cache.coordinate(&record.address);
        if coordinate.is_some() {
            geocoded += 1;
        }
        writer.serialize(TidyRecord::from_record(record.clone(), coordinate))?;
    }
    writer.flush()?;

    log::info!(
        "Wrote {} tidy rows ({geocoded} with coordinates) to {}",
        records.len(),
        path.display()
    );
    Ok(geocoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use poky_incident_models::{Coordinate, NatureGroup};

    fn record(id: &str, address: &str) -> CleanRecord {
        CleanRecord::new(
            id.to_string(),
            "THEFT".to_string(),
            NatureGroup::Property,
            address.to_string(),
            NaiveDate::from_ymd_opt(2023, 7, 14)
                .unwrap()
                .and_hms_opt(22, 15, 0)
                .unwrap(),
        )
    }

    #[test]
    fn left_join_keeps_unresolved_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean_incidents.csv");

        let mut cache = GeocodeCache::default();
        cache.merge([(
            "100 MAIN ST, Pocatello, ID 83201".to_string(),
            Some(Coordinate {
                lat: 42.87,
                lon: -112.44,
            }),
        )]);

        let records = vec![
            record("23-001", "100 MAIN ST, Pocatello, ID 83201"),
            record("23-002", "999 NOWHERE RD, Pocatello, ID 83201"),
        ];

        let geocoded = write(&path, &records, &cache).unwrap();
        assert_eq!(geocoded, 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines[0],
            "incident_id,nature,nature_grp,address,reported_dt,year,month,day,hour,dow,lat,lon"
        );
        // Both rows survive; the unresolved one has empty coordinate cells.
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("42.87"));
        assert!(lines[2].ends_with(",,"));
        assert!(lines[2].contains("PROPERTY"));
        assert!(lines[2].contains("2023-07-14 22:15:00"));
    }
}
