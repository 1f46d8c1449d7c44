#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident taxonomy and record types shared across the poky-incidents
//! pipeline.
//!
//! This crate defines the canonical nature-group taxonomy and the record
//! types that flow between the ETL, geocoding, and output stages. All raw
//! police-log rows are normalized into these shared types.

pub mod progress;

use chrono::{NaiveDateTime, Timelike as _};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Semantic grouping of free-text incident natures.
///
/// Every cleaned record is assigned exactly one group via ordered keyword
/// rules (see `poky_etl::classify`). Unmatched natures fall back to
/// [`NatureGroup::Other`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NatureGroup {
    /// Theft, burglary, larceny, shoplifting, robbery
    Property,
    /// Assault, battery, weapons, domestic, sex offenses
    Violent,
    /// Disturbances, disorderly conduct, harassment, noise
    Disorder,
    /// DUI, crashes, traffic offenses, abandoned vehicles
    Traffic,
    /// Welfare checks, mental health, suicide, missing persons
    Service,
    /// Natures not matching any keyword rule
    Other,
}

impl NatureGroup {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Property,
            Self::Violent,
            Self::Disorder,
            Self::Traffic,
            Self::Service,
            Self::Other,
        ]
    }
}

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude (WGS84).
    pub lat: f64,
    /// Longitude (WGS84).
    pub lon: f64,
}

/// A fully cleaned incident record.
///
/// Invariants upheld by the ETL stage: `reported_dt` always parsed from a
/// recognized format, `address` non-empty and canonical (city/state/zip
/// suffixed), `nature` trimmed, uppercased, and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// Source incident identifier.
    pub incident_id: String,
    /// Uppercased free-text nature.
    pub nature: String,
    /// Semantic group derived from `nature`.
    pub nature_grp: NatureGroup,
    /// Canonical address used as the geocode cache key.
    pub address: String,
    /// Parsed reported timestamp.
    #[serde(with = "reported_dt_format")]
    pub reported_dt: NaiveDateTime,
    /// Year of `reported_dt`.
    pub year: i32,
    /// Month of `reported_dt` (1-12).
    pub month: u32,
    /// Day of month of `reported_dt` (1-31).
    pub day: u32,
    /// Hour of `reported_dt` (0-23).
    pub hour: u32,
    /// Day-of-week index of `reported_dt` (Monday = 0).
    pub dow: u32,
}

impl CleanRecord {
    /// Builds a clean record, deriving the date parts from `reported_dt`.
    #[must_use]
    pub fn new(
        incident_id: String,
        nature: String,
        nature_grp: NatureGroup,
        address: String,
        reported_dt: NaiveDateTime,
    ) -> Self {
        use chrono::Datelike as _;

        Self {
            incident_id,
            nature,
            nature_grp,
            address,
            reported_dt,
            year: reported_dt.year(),
            month: reported_dt.month(),
            day: reported_dt.day(),
            hour: reported_dt.hour(),
            dow: reported_dt.weekday().num_days_from_monday(),
        }
    }
}

/// One row of the tidy output dataset: a [`CleanRecord`] left-joined with
/// the geocode cache. Unresolved addresses carry `None` coordinates, never
/// dropped rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyRecord {
    /// Source incident identifier.
    pub incident_id: String,
    /// Uppercased free-text nature.
    pub nature: String,
    /// Semantic group derived from `nature`.
    pub nature_grp: NatureGroup,
    /// Canonical address.
    pub address: String,
    /// Parsed reported timestamp.
    #[serde(with = "reported_dt_format")]
    pub reported_dt: NaiveDateTime,
    /// Year of `reported_dt`.
    pub year: i32,
    /// Month of `reported_dt` (1-12).
    pub month: u32,
    /// Day of month of `reported_dt` (1-31).
    pub day: u32,
    /// Hour of `reported_dt` (0-23).
    pub hour: u32,
    /// Day-of-week index of `reported_dt` (Monday = 0).
    pub dow: u32,
    /// Latitude, if the address resolved.
    pub lat: Option<f64>,
    /// Longitude, if the address resolved.
    pub lon: Option<f64>,
}

impl TidyRecord {
    /// Joins a clean record with an optional resolved coordinate.
    #[must_use]
    pub fn from_record(record: CleanRecord, coordinate: Option<Coordinate>) -> Self {
        Self {
            incident_id: record.incident_id,
            nature: record.nature,
            nature_grp: record.nature_grp,
            address: record.address,
            reported_dt: record.reported_dt,
            year: record.year,
            month: record.month,
            day: record.day,
            hour: record.hour,
            dow: record.dow,
            lat: coordinate.map(|c| c.lat),
            lon: coordinate.map(|c| c.lon),
        }
    }
}

/// Serde adapter for `reported_dt` as `YYYY-MM-DD HH:MM:SS`, the format
/// downstream consumers (charts, dashboard) expect in the tidy CSV.
pub mod reported_dt_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize as _, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Serializes a [`NaiveDateTime`] in the tidy CSV format.
    ///
    /// # Errors
    ///
    /// Returns a serializer error if the underlying writer fails.
    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    /// Deserializes a [`NaiveDateTime`] from the tidy CSV format.
    ///
    /// # Errors
    ///
    /// Returns a deserializer error if the string does not match the format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}
