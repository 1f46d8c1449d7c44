//! Raw-file loading and row cleaning.
//!
//! Scans the raw directory for year-prefixed CSV exports, reconciles their
//! headers through [`columns::ColumnMap`], and filters rows down to
//! [`CleanRecord`]s. Filtering is lossy by design — rows with unparseable
//! timestamps or blank addresses/natures are dropped, counted, and logged,
//! never propagated as failures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use poky_geocoder::address;
use poky_incident_models::progress::ProgressCallback;
use poky_incident_models::CleanRecord;

use crate::columns::{ColumnMap, normalize_header};
use crate::{EtlError, classify, dates};

/// One row as read from a raw export, before any filtering.
///
/// Ephemeral — exists only during normalization. `area` and `agency` are
/// carried for completeness of the raw schema contract but do not survive
/// into the clean record.
#[derive(Debug, Clone)]
pub struct RawRecord {
    /// Source incident identifier.
    pub incident_id: String,
    /// Free-text nature, as recorded.
    pub nature: String,
    /// Patrol area code.
    pub area: String,
    /// Reporting agency.
    pub agency: String,
    /// Raw reported-timestamp string.
    pub reported_raw: String,
    /// Raw address string.
    pub address_raw: String,
}

/// Row counts at each filtering step, for auditability of data loss.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Raw files loaded.
    pub files: u64,
    /// Rows read across all files.
    pub rows_read: u64,
    /// Rows dropped for an unparseable reported timestamp.
    pub dropped_bad_dates: u64,
    /// Rows dropped for a null/blank address.
    pub dropped_blank_address: u64,
    /// Rows dropped for a blank nature.
    pub dropped_blank_nature: u64,
    /// Rows surviving all filters.
    pub kept: u64,
}

/// Loads and cleans every year-prefixed CSV file under `raw_dir`.
///
/// `address_suffix` is the municipal context appended to every cleaned
/// address (see [`address::canonicalize`]).
///
/// # Errors
///
/// Returns [`EtlError::NoRawFiles`] if nothing matches the naming pattern,
/// [`EtlError::MissingColumns`] if any file's headers fail to map onto the
/// six canonical fields, or an I/O / CSV error if a file cannot be read.
pub fn load_and_clean(
    raw_dir: &Path,
    address_suffix: &str,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(Vec<CleanRecord>, LoadStats), EtlError> {
    let files = raw_files(raw_dir)?;
    if files.is_empty() {
        return Err(EtlError::NoRawFiles {
            dir: raw_dir.display().to_string(),
        });
    }

    let mut stats = LoadStats {
        files: files.len() as u64,
        ..LoadStats::default()
    };
    let mut records = Vec::new();

    progress.begin("Loading raw files".to_string(), Some(files.len() as u64));

    for file in &files {
        let rows = load_file(file)?;
        log::info!("Loaded {} with {} rows", file.display(), rows.len());
        stats.rows_read += rows.len() as u64;

        for raw in rows {
            if let Some(record) = clean_row(&raw, address_suffix, &mut stats) {
                records.push(record);
            }
        }

        progress.inc(1);
    }

    stats.kept = records.len() as u64;
    log::info!(
        "Cleaned {} of {} rows (dropped: {} bad dates, {} blank addresses, {} blank natures)",
        stats.kept,
        stats.rows_read,
        stats.dropped_bad_dates,
        stats.dropped_blank_address,
        stats.dropped_blank_nature
    );
    progress.finish(format!("Cleaned {} rows", stats.kept));

    Ok((records, stats))
}

/// Returns the year-prefixed CSV files under `raw_dir`, sorted by name so
/// multi-year loads are deterministic.
fn raw_files(raw_dir: &Path) -> Result<Vec<PathBuf>, EtlError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(raw_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "csv")
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("20"))
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Reads one raw file into untyped [`RawRecord`]s, validating the header
/// contract first.
fn load_file(path: &Path) -> Result<Vec<RawRecord>, EtlError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    let map = ColumnMap::from_headers(&headers)?;

    let field = |row: &csv::StringRecord, idx: usize| -> String {
        row.get(idx).unwrap_or("").to_string()
    };

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        rows.push(RawRecord {
            incident_id: field(&row, map.incident_id),
            nature: field(&row, map.nature),
            area: field(&row, map.area),
            agency: field(&row, map.agency),
            reported_raw: field(&row, map.reported),
            address_raw: field(&row, map.address),
        });
    }

    Ok(rows)
}

/// Applies the row filters and derivations; `None` means dropped.
fn clean_row(raw: &RawRecord, address_suffix: &str, stats: &mut LoadStats) -> Option<CleanRecord> {
    let Some(reported_dt) = dates::parse_reported(&raw.reported_raw) else {
        stats.dropped_bad_dates += 1;
        return None;
    };

    let Some(canonical_address) = address::canonicalize(&raw.address_raw, address_suffix) else {
        stats.dropped_blank_address += 1;
        return None;
    };

    let nature = raw.nature.trim().to_uppercase();
    if nature.is_empty() {
        stats.dropped_blank_nature += 1;
        return None;
    }

    let nature_grp = classify::nature_group(&nature);

    Some(CleanRecord::new(
        raw.incident_id.trim().to_string(),
        nature,
        nature_grp,
        canonical_address,
        reported_dt,
    ))
}
