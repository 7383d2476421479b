//! Time handling for CRS radar archives.
//!
//! CRS campaigns store time two ways: IMPACTS files carry seconds since the
//! Unix epoch, the netCDF campaigns carry fractional hours from a base date
//! that is supplied out-of-band (flight selection, not file content). Both
//! are normalized here to `DateTime<Utc>`.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A time window for subsetting, with optional bounds.
///
/// An absent bound defaults to the file's first/last timestamp when the
/// window is resolved. A window whose resolved `start` exceeds its `end`
/// simply matches nothing; that is a legal empty result, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive lower bound; `None` means "from the start of the file".
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound; `None` means "to the end of the file".
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Window covering the whole file (both bounds open).
    pub fn all() -> Self {
        Self::default()
    }

    /// Window with both bounds set.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Close open bounds against a file's first/last timestamp.
    pub fn resolve(
        &self,
        first: DateTime<Utc>,
        last: DateTime<Utc>,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start.unwrap_or(first), self.end.unwrap_or(last))
    }
}

/// Convert a seconds-since-epoch value (IMPACTS `TimeUTC`) to a UTC instant.
///
/// Inputs are UTC by definition; fractional seconds are kept to millisecond
/// resolution.
pub fn epoch_seconds(seconds: f64) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds((seconds * 1000.0) as i64)
}

/// Convert an hour offset from a campaign base date to a UTC instant.
pub fn hours_from_base(base: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    base + Duration::milliseconds((hours * 3_600_000.0) as i64)
}

/// Parse a `YYYYMMDD` filename token into a date.
pub fn parse_yyyymmdd(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token, "%Y%m%d").ok()
}

/// Midnight UTC for a flight date, the base instant for hour-offset times.
pub fn base_datetime(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Parse a timestamp from ISO 8601 style input.
///
/// Supports full RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (assumed UTC), and
/// a bare date (midnight UTC).
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(base_datetime(date));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// Compact `YYYYMMDDThhmmss-YYYYMMDDThhmmss` tag for a time span.
///
/// Downstream plot persistence names image files with this tag.
pub fn format_span_tag(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    format!(
        "{}-{}",
        start.format("%Y%m%dT%H%M%S"),
        end.format("%Y%m%dT%H%M%S")
    )
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),
}
