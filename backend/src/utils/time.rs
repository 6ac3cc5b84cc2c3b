use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Date format used in API responses (`dd-mm-YYYY`).
pub const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

const ACCEPTED_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d"];

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// Due date applied to tickets created without one.
pub fn default_due_date(tz: &Tz, days: i64) -> NaiveDate {
    today_local(tz) + Duration::days(days)
}

/// Parses a client supplied date into a calendar date.
///
/// Plain dates in the accepted formats are taken as-is; RFC 3339 timestamps are
/// reduced to their date in `tz`.
pub fn parse_calendar_date(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for format in ACCEPTED_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(tz).date_naive())
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Formats a timestamp as a display date in `tz`.
pub fn format_display_datetime(value: DateTime<Utc>, tz: &Tz) -> String {
    format_display_date(value.with_timezone(tz).date_naive())
}
