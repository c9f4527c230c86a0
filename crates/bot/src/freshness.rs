//! Freshness classification for update markers.
//!
//! The store's `last_edited_time` moves on *any* field edit, including
//! incidental ones (toggling visibility, fixing a typo in an unrelated
//! column), so it cannot alone signal "the maintainer just announced an
//! update". Instead the maintainer writes a free-text marker when they
//! mean it, and an entry counts as fresh only when that marker and the
//! store's edit timestamp land within a tolerance window of each other.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Tolerance window between the marker and the store's edit timestamp.
const TOLERANCE_SECS: i64 = 300;

/// The catalog is maintained in UTC+7; zoneless markers are interpreted
/// in that offset.
const CATALOG_OFFSET_SECS: i32 = 7 * 3600;

/// Long-form civil date-time the maintainers type by hand,
/// e.g. `June 5, 2024 21:30`.
const LONG_FORMAT: &str = "%B %d, %Y %H:%M";

/// Zoneless ISO date-time variants.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Decide whether a marker was set "at the same time" as the store's
/// last edit.
///
/// Fail-safe: an empty, unparseable, or out-of-range marker is never
/// fresh. The comparison is strict - a difference of exactly
/// `TOLERANCE_SECS` is already stale, in both directions.
#[must_use]
pub fn is_fresh(last_edited: DateTime<Utc>, marker: &str) -> bool {
    parse_marker(marker).is_some_and(|instant| {
        (last_edited - instant).num_seconds().abs() < TOLERANCE_SECS
    })
}

/// Parse a maintainer marker into an instant.
///
/// Accepted formats, tried in order:
/// 1. long-form civil date-time (`June 5, 2024 21:30`), at UTC+7
/// 2. RFC 3339 date-time (zone honored)
/// 3. zoneless ISO date-time, at UTC+7
/// 4. bare ISO date (`2024-06-05`), midnight at UTC+7
#[must_use]
pub fn parse_marker(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let offset = catalog_offset();

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, LONG_FORMAT) {
        return resolve_local(&offset, naive);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return resolve_local(&offset, naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return resolve_local(&offset, midnight);
    }

    None
}

fn resolve_local(offset: &FixedOffset, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

fn catalog_offset() -> FixedOffset {
    FixedOffset::east_opt(CATALOG_OFFSET_SECS).expect("catalog offset is in range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn utc(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("valid timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_long_format_interpreted_at_utc_plus_7() {
        // 21:30 at UTC+7 is 14:30 UTC.
        assert!(is_fresh(utc("2024-06-05T14:30:00Z"), "June 5, 2024 21:30"));
        assert!(!is_fresh(utc("2024-06-05T21:30:00Z"), "June 5, 2024 21:30"));
    }

    #[test]
    fn test_rfc3339_zone_honored() {
        assert!(is_fresh(
            utc("2024-06-05T14:30:00Z"),
            "2024-06-05T21:30:00+07:00"
        ));
        assert!(is_fresh(utc("2024-06-05T14:30:00Z"), "2024-06-05T14:30:00Z"));
    }

    #[test]
    fn test_zoneless_datetime_assumes_utc_plus_7() {
        assert!(is_fresh(utc("2024-06-05T14:30:00Z"), "2024-06-05T21:30:00"));
    }

    #[test]
    fn test_bare_date_is_midnight_utc_plus_7() {
        // Midnight June 5 at UTC+7 is 17:00 June 4 UTC.
        assert!(is_fresh(utc("2024-06-04T17:00:00Z"), "2024-06-05"));
    }

    #[test]
    fn test_boundary_just_inside() {
        let marker = "2024-06-05T21:30:00+07:00";
        let base = utc("2024-06-05T14:30:00Z");
        assert!(is_fresh(base + Duration::seconds(299), marker));
        assert!(is_fresh(base - Duration::seconds(299), marker));
    }

    #[test]
    fn test_boundary_at_and_past_tolerance() {
        let marker = "2024-06-05T21:30:00+07:00";
        let base = utc("2024-06-05T14:30:00Z");
        // Exactly 300 s is stale by design, both directions.
        assert!(!is_fresh(base + Duration::seconds(300), marker));
        assert!(!is_fresh(base - Duration::seconds(300), marker));
        assert!(!is_fresh(base + Duration::seconds(301), marker));
        assert!(!is_fresh(base - Duration::seconds(301), marker));
    }

    #[test]
    fn test_garbage_is_never_fresh() {
        let now = utc("2024-06-05T14:30:00Z");
        assert!(!is_fresh(now, ""));
        assert!(!is_fresh(now, "   "));
        assert!(!is_fresh(now, "soon(tm)"));
        assert!(!is_fresh(now, "13/45/2024"));
        assert!(!is_fresh(now, "June 45, 2024 21:30"));
    }

    #[test]
    fn test_old_marker_is_stale() {
        assert!(!is_fresh(utc("2024-06-05T14:30:00Z"), "June 1, 2024 10:00"));
    }
}
