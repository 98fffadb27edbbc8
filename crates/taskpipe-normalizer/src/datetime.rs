//! Timestamp parsing and timezone formatting.

use crate::NormalizeError;
use chrono::TimeZone;
use chrono_tz::Tz;

/// Dataset timestamp format, day first.
pub const DATE_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Resolve a tz-database timezone name ("America/Sao_Paulo").
pub fn parse_timezone(name: &str) -> Result<Tz, NormalizeError> {
    name.parse::<Tz>()
        .map_err(|_| NormalizeError::UnknownTimezone(name.to_string()))
}

/// Convert an upstream millisecond-epoch timestamp (sent as a decimal
/// string) into the dataset format in the target timezone.
pub fn parse_timestamp_millis(raw: &str, tz: Tz) -> Result<String, NormalizeError> {
    let millis: i64 = raw
        .trim()
        .parse()
        .map_err(|_| NormalizeError::BadTimestamp(raw.to_string()))?;

    let utc = chrono::Utc
        .timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| NormalizeError::BadTimestamp(raw.to_string()))?;

    Ok(utc.with_timezone(&tz).format(DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_formatting() {
        let tz = parse_timezone("UTC").unwrap();
        // 2024-01-01T00:00:00Z
        assert_eq!(
            parse_timestamp_millis("1704067200000", tz).unwrap(),
            "01-01-2024 00:00:00"
        );
    }

    #[test]
    fn test_sao_paulo_offset_applied() {
        let tz = parse_timezone("America/Sao_Paulo").unwrap();
        // Midnight UTC is 21:00 the previous day in São Paulo (UTC-3)
        assert_eq!(
            parse_timestamp_millis("1704067200000", tz).unwrap(),
            "31-12-2023 21:00:00"
        );
    }

    #[test]
    fn test_sub_second_precision_is_dropped() {
        let tz = parse_timezone("UTC").unwrap();
        assert_eq!(
            parse_timestamp_millis("1704067200488", tz).unwrap(),
            "01-01-2024 00:00:00"
        );
    }

    #[test]
    fn test_bad_timestamp_rejected() {
        let tz = parse_timezone("UTC").unwrap();
        assert!(matches!(
            parse_timestamp_millis("not-a-number", tz),
            Err(NormalizeError::BadTimestamp(_))
        ));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        assert!(matches!(
            parse_timezone("Mars/Olympus_Mons"),
            Err(NormalizeError::UnknownTimezone(_))
        ));
    }
}
