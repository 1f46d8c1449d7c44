//! Reported-timestamp parsing.
//!
//! Raw exports mix several timestamp conventions across years. Parsing
//! tries a fixed ordered list of formats; the first match wins. A string
//! matching none of them marks the row invalid, and the loader drops it.

use chrono::NaiveDateTime;

/// Accepted timestamp formats, in match order.
pub const ACCEPTED_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%H:%M:%S %m/%d/%y",
];

/// Parses a raw reported-timestamp string against [`ACCEPTED_FORMATS`].
///
/// Returns `None` when no format matches.
#[must_use]
pub fn parse_reported(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike as _, Timelike as _};

    #[test]
    fn parses_iso_with_space() {
        let dt = parse_reported("2023-07-14 22:15:00").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.hour(), 22);
    }

    #[test]
    fn parses_us_without_seconds() {
        let dt = parse_reported("7/14/2023 22:15").unwrap();
        assert_eq!(dt.month(), 7);
        assert_eq!(dt.minute(), 15);
    }

    #[test]
    fn parses_us_with_seconds() {
        let dt = parse_reported("07/14/2023 22:15:30").unwrap();
        assert_eq!(dt.second(), 30);
    }

    #[test]
    fn parses_iso_t_separator() {
        let dt = parse_reported("2023-07-14T22:15:00").unwrap();
        assert_eq!(dt.day(), 14);
    }

    #[test]
    fn parses_time_first_two_digit_year() {
        let dt = parse_reported("22:15:00 07/14/23").unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.hour(), 22);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert!(parse_reported("  2023-07-14 22:15:00  ").is_some());
    }

    #[test]
    fn rejects_unknown_formats() {
        assert!(parse_reported("July 14, 2023").is_none());
        assert!(parse_reported("").is_none());
        assert!(parse_reported("2023-07-14").is_none());
    }
}
