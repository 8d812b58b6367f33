//! Timestamp parsing for upload records
//!
//! Accepted shapes, tried in order:
//!
//! 1. RFC 3339 with an offset (`2024-01-05T10:00:00Z`, `2024-01-05T10:00:00.123+02:00`)
//! 2. ISO-8601 date-time with an offset and a space separator
//! 3. ISO-8601 date-time without an offset, read as wall-clock time in the
//!    reporting time zone
//! 4. A bare date, read as local midnight

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone};

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse an upload timestamp, returning `None` when it is not a recognised
/// ISO-8601 shape.
pub fn parse_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }

    for format in OFFSET_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(localize(naive, tz));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| localize(naive, tz))
}

/// Attach the zone's offset to a wall-clock time.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times that do not
/// exist locally (DST spring-forward gap) are read as UTC.
fn localize<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> DateTime<FixedOffset> {
    let resolved = tz
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive));
    let offset = resolved.offset().fix();
    resolved.with_timezone(&offset)
}
