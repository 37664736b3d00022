//! Timestamp handling.
//!
//! The board serializes timestamps with `isoformat()`, usually without an
//! offset. Offset-less values are board-local time (Asia/Seoul).

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer};

/// Time zone the board runs in.
pub const BOARD_TZ: Tz = chrono_tz::Asia::Seoul;

/// Parse a board timestamp.
///
/// Returns `None` for empty or unparseable input.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return BOARD_TZ
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    None
}

/// Format a timestamp the way the board displays it, in board-local time.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// let dt = Utc.with_ymd_and_hms(2024, 3, 1, 0, 30, 5).unwrap();
/// assert_eq!(rboard::models::format_timestamp(&dt), "2024. 03. 01. 09:30:05");
/// ```
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&BOARD_TZ)
        .format("%Y. %m. %d. %H:%M:%S")
        .to_string()
}

/// Serde helper for optional board timestamps.
pub(crate) fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naive_as_board_time() {
        let dt = parse_timestamp("2024-03-01T09:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:30:00+00:00");
    }

    #[test]
    fn test_parse_fractional_and_offset() {
        let dt = parse_timestamp("2024-03-01T09:30:00.123456").unwrap();
        assert_eq!(dt.timestamp(), parse_timestamp("2024-03-01T00:30:00Z").unwrap().timestamp());

        let dt = parse_timestamp("2024-03-01T09:30:00+09:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T00:30:00+00:00");
    }

    #[test]
    fn test_format_roundtrip_board_time() {
        let dt = parse_timestamp("2023-12-31T23:59:59").unwrap();
        assert_eq!(format_timestamp(&dt), "2023. 12. 31. 23:59:59");
    }

    #[test]
    fn test_parse_empty_or_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
