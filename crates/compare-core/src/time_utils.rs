use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses the timestamp cell of a sensor log row.
///
/// The result is the wall-clock time as written in the dataset. When the
/// string carries a UTC offset the local time *in that offset* is kept; no
/// timezone conversion is ever applied, so the calendar date of a reading is
/// the date the logger recorded.
pub struct TimestampParser;

/// Naive date-time layouts accepted after the offset-aware attempts fail.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Offset-aware layouts RFC 3339 rejects: basic `+hhmm` offsets, missing
/// seconds, or a space separator.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

impl TimestampParser {
    /// Parse `s` into a naive wall-clock timestamp.
    ///
    /// Returns `None` for empty or unrecognised strings; an unparseable
    /// timestamp is a data condition, not an error.
    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        // RFC 3339 / ISO 8601 with `Z` or a numeric offset.
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }

        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Some(dt.naive_local());
            }
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive);
            }
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return date.and_hms_opt(0, 0, 0);
            }
        }

        trace!("TimestampParser: could not parse timestamp \"{}\"", s);
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
