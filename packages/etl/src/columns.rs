//! Declarative raw-header → canonical-field mapping.
//!
//! Source exports disagree on header casing, spacing, and naming. Headers
//! are normalized (lowercase, trim, spaces → underscores) and then matched
//! against a fixed alias table. The mapping is validated up front: if any
//! canonical field cannot be resolved the whole load fails with
//! [`EtlError::MissingColumns`], since downstream logic assumes all six
//! fields exist.

use crate::EtlError;

/// The six canonical raw-record fields every export must provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalField {
    /// Source incident identifier.
    IncidentId,
    /// Free-text incident nature.
    Nature,
    /// Patrol area code.
    Area,
    /// Reporting agency.
    Agency,
    /// Raw reported-timestamp string.
    Reported,
    /// Raw address string.
    Address,
}

impl CanonicalField {
    /// Returns all canonical fields, in raw-record order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::IncidentId,
            Self::Nature,
            Self::Area,
            Self::Agency,
            Self::Reported,
            Self::Address,
        ]
    }

    /// Canonical name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::IncidentId => "incident",
            Self::Nature => "nature",
            Self::Area => "area",
            Self::Agency => "agency",
            Self::Reported => "reported",
            Self::Address => "incident_address",
        }
    }

    /// Accepted normalized header names for this field, in match order.
    #[must_use]
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::IncidentId => &["incident", "incident_id", "incident_number"],
            Self::Nature => &["nature", "call_nature"],
            Self::Area => &["area", "beat", "district"],
            Self::Agency => &["agency"],
            Self::Reported => &["reported", "reported_dt", "reported_date"],
            Self::Address => &["incident_address", "address", "location"],
        }
    }
}

/// Normalizes a raw header: lowercase, trim, spaces → underscores.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

/// Resolved column indices for the six canonical fields within one file.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    /// Index of the incident identifier column.
    pub incident_id: usize,
    /// Index of the nature column.
    pub nature: usize,
    /// Index of the area column.
    pub area: usize,
    /// Index of the agency column.
    pub agency: usize,
    /// Index of the raw reported-timestamp column.
    pub reported: usize,
    /// Index of the raw address column.
    pub address: usize,
}

impl ColumnMap {
    /// Resolves the canonical fields against a file's normalized headers.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::MissingColumns`] if any canonical field has no
    /// matching header — a fatal schema contract violation.
    pub fn from_headers(headers: &[String]) -> Result<Self, EtlError> {
        let find = |field: CanonicalField| -> Option<usize> {
            field
                .aliases()
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == alias))
        };

        let mut missing = Vec::new();
        let mut resolved = [0usize; 6];

        for (i, &field) in CanonicalField::all().iter().enumerate() {
            match find(field) {
                Some(idx) => resolved[i] = idx,
                None => missing.push(field.name().to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(EtlError::MissingColumns {
                missing,
                available: headers.to_vec(),
            });
        }

        Ok(Self {
            incident_id: resolved[0],
            nature: resolved[1],
            area: resolved[2],
            agency: resolved[3],
            reported: resolved[4],
            address: resolved[5],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| normalize_header(h)).collect()
    }

    #[test]
    fn normalizes_headers() {
        assert_eq!(normalize_header("  Incident Address "), "incident_address");
        assert_eq!(normalize_header("NATURE"), "nature");
    }

    #[test]
    fn maps_exact_headers() {
        let headers = normalized(&[
            "Incident",
            "Nature",
            "Area",
            "Agency",
            "Reported",
            "Incident Address",
        ]);
        let map = ColumnMap::from_headers(&headers).unwrap();
        assert_eq!(map.incident_id, 0);
        assert_eq!(map.address, 5);
    }

    #[test]
    fn maps_variant_headers() {
        let headers = normalized(&[
            "incident_number",
            "Call Nature",
            "District",
            "Agency",
            "Reported Date",
            "Location",
        ]);
        let map = ColumnMap::from_headers(&headers).unwrap();
        assert_eq!(map.nature, 1);
        assert_eq!(map.reported, 4);
        assert_eq!(map.address, 5);
    }

    #[test]
    fn missing_columns_is_fatal() {
        let headers = normalized(&["Incident", "Nature", "Area"]);
        let err = ColumnMap::from_headers(&headers).unwrap_err();
        match err {
            EtlError::MissingColumns { missing, available } => {
                assert_eq!(missing, vec!["agency", "reported", "incident_address"]);
                assert_eq!(available.len(), 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
