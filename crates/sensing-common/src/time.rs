//! Time handling for service timestamps.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{SensingError, SensingResult};

/// Parse an ISO 8601 timestamp as returned by the statistics service.
///
/// Timestamps without an offset are taken as UTC; a bare date resolves to
/// midnight UTC.
pub fn parse_time(s: &str) -> SensingResult<DateTime<Utc>> {
    let s = s.trim();

    // Try full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Try without timezone (assume UTC)
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Try date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(SensingError::InvalidTime(s.to_string()))
}

/// Convert Unix epoch milliseconds to a UTC timestamp.
pub fn from_epoch_millis(millis: i64) -> SensingResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or(SensingError::TimestampOutOfRange(millis))
}
