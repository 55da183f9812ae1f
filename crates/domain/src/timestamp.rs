//! Timestamp parsing for freshness checks.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a JSON timestamp.
///
/// Numbers are milliseconds since the Unix epoch. Strings may be RFC 3339,
/// a date-time without offset (taken as UTC), or a bare date (midnight UTC).
#[must_use]
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(number) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f.round() as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        Value::String(text) => parse_timestamp_str(text),
        _ => None,
    }
}

/// Parses a timestamp string. See [`parse_timestamp`].
#[must_use]
pub fn parse_timestamp_str(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Absolute distance between two instants.
#[must_use]
pub fn drift(a: DateTime<Utc>, b: DateTime<Utc>) -> TimeDelta {
    (a - b).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).single().expect("valid date")
    }

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_timestamp(&json!("2026-10-19T12:00:00Z")),
            Some(utc(2026, 10, 19, 12, 0, 0))
        );
        assert_eq!(
            parse_timestamp(&json!("2026-10-19T14:00:00+02:00")),
            Some(utc(2026, 10, 19, 12, 0, 0))
        );
    }

    #[test]
    fn test_parse_naive_as_utc() {
        assert_eq!(
            parse_timestamp(&json!("2026-10-19T12:00:00.250")),
            Some(utc(2026, 10, 19, 12, 0, 0) + TimeDelta::milliseconds(250))
        );
        assert_eq!(
            parse_timestamp(&json!("2026-10-19 12:00:00")),
            Some(utc(2026, 10, 19, 12, 0, 0))
        );
        assert_eq!(parse_timestamp(&json!("2026-10-19")), Some(utc(2026, 10, 19, 0, 0, 0)));
    }

    #[test]
    fn test_parse_epoch_millis() {
        let expected = utc(2026, 10, 19, 12, 0, 0);
        assert_eq!(parse_timestamp(&json!(expected.timestamp_millis())), Some(expected));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(true)), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
    }

    #[test]
    fn test_drift_is_symmetric() {
        let a = utc(2026, 10, 19, 12, 0, 0);
        let b = a + TimeDelta::seconds(3);
        assert_eq!(drift(a, b), TimeDelta::seconds(3));
        assert_eq!(drift(b, a), TimeDelta::seconds(3));
    }
}
