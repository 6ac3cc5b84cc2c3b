//! Common validation rules shared across ticket payloads.

use validator::ValidationError;

use crate::models::ticket::TicketStatus;
use crate::utils::time::parse_calendar_date;

/// Rejects empty or whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Validates that a due date parses into a calendar date.
///
/// Validity does not depend on the time zone, so UTC is used here; the service
/// re-parses with the configured zone when storing.
pub fn validate_due_date(value: &str) -> Result<(), ValidationError> {
    if parse_calendar_date(value, &chrono_tz::UTC).is_none() {
        return Err(ValidationError::new("invalid_date"));
    }
    Ok(())
}

/// Validates that a status code is one of the known ticket states.
pub fn validate_status_code(code: i64) -> Result<(), ValidationError> {
    if TicketStatus::try_from(code).is_err() {
        return Err(ValidationError::new("invalid_status"));
    }
    Ok(())
}
