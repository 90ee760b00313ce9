use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default timezone for ingestion dates.
pub const DEFAULT_INGESTION_TZ: Tz = chrono_tz::UTC;

/// Converts a UTC instant to the calendar date used in dated column names.
pub fn ingestion_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's ingestion date in the given timezone.
pub fn ingestion_date_today(tz: Tz) -> NaiveDate {
    ingestion_date_from_utc(Utc::now(), tz)
}

/// Parses an IANA timezone name such as `America/New_York`.
pub fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| format!("invalid timezone '{}': {}", name, e))
}
