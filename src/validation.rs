use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};

/// Storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format for interaction timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Validates that a string is not blank (empty or whitespace-only).
/// Returns the trimmed string on success.
pub fn non_blank(value: &str, field: &str) -> TrackerResult<String> {
    let trimmed = value.trim().to_string();
    if trimmed.is_empty() {
        Err(TrackerError::BlankField {
            field: field.to_string(),
        })
    } else {
        Ok(trimmed)
    }
}

/// Parses a `YYYY-MM-DD` date, reporting the offending field on failure.
pub fn date(value: &str, field: &str) -> TrackerResult<NaiveDate> {
    parse_date(value).ok_or_else(|| TrackerError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Validates an optional date string. Blank counts as absent.
/// Returns the trimmed string so it can be stored verbatim.
pub fn optional_date(value: Option<&str>, field: &str) -> TrackerResult<Option<String>> {
    match trim_optional(value) {
        None => Ok(None),
        Some(s) => date(&s, field).map(|_| Some(s)),
    }
}

/// Lenient date parse used when reading stored records. Accepts a bare date
/// or a timestamp whose first ten characters are a date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let head = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(head, DATE_FORMAT).ok()
}

/// Validates that an integer lies within an inclusive range.
pub fn in_range(value: i64, min: i64, max: i64, field: &str) -> TrackerResult<i64> {
    if value < min || value > max {
        Err(TrackerError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        })
    } else {
        Ok(value)
    }
}

/// Trims an optional string, returning None if blank.
pub fn trim_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Splits a comma-separated tag string, dropping blanks.
pub fn split_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_blank_trims_whitespace() {
        assert_eq!(non_blank("  hello  ", "name").unwrap(), "hello");
    }

    #[test]
    fn non_blank_rejects_whitespace_only() {
        assert!(non_blank("   ", "name").is_err());
    }

    #[test]
    fn date_accepts_iso_format() {
        assert_eq!(
            date("2024-01-08", "last_contact").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
        );
    }

    #[test]
    fn date_rejects_other_formats() {
        assert!(date("01/08/2024", "last_contact").is_err());
        assert!(date("2024-13-01", "last_contact").is_err());
    }

    #[test]
    fn parse_date_reads_timestamp_prefix() {
        assert_eq!(
            parse_date("2024-03-05 14:30"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn parse_date_handles_short_input() {
        assert_eq!(parse_date("2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn optional_date_treats_blank_as_none() {
        assert_eq!(optional_date(Some("  "), "last_contact").unwrap(), None);
        assert_eq!(optional_date(None, "last_contact").unwrap(), None);
    }

    #[test]
    fn optional_date_rejects_garbage() {
        assert!(optional_date(Some("yesterday"), "last_contact").is_err());
    }

    #[test]
    fn in_range_bounds_are_inclusive() {
        assert!(in_range(1, 1, 5, "level").is_ok());
        assert!(in_range(5, 1, 5, "level").is_ok());
        assert!(in_range(6, 1, 5, "level").is_err());
        assert!(in_range(0, 1, 5, "level").is_err());
    }

    #[test]
    fn trim_optional_returns_none_for_blank() {
        assert_eq!(trim_optional(Some("   ")), None);
        assert_eq!(trim_optional(Some(" hi ")), Some("hi".to_string()));
    }

    #[test]
    fn split_tags_drops_empty_entries() {
        assert_eq!(split_tags("VC, , Banking,"), vec!["VC", "Banking"]);
    }
}
