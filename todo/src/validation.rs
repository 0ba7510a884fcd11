//! Input validation for content, due dates and priorities.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Result, TodoError};
use crate::types::Priority;

/// Longest accepted content, in characters
pub const MAX_CONTENT_LEN: usize = 500;

/// Browser `Date::toString` prefix, e.g. "Tue Oct 01 2024 00:00:00"
const BROWSER_FORMAT: &str = "%a %b %d %Y %H:%M:%S";

/// Date-time layouts accepted without an offset; read as UTC.
const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    BROWSER_FORMAT,
];

/// Trims `content` and checks it is non-empty and not too long.
///
/// # Errors
///
/// Returns [`TodoError::Validation`] for blank or oversized content.
pub fn validate_content(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(TodoError::Validation("content must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_CONTENT_LEN {
        return Err(TodoError::Validation(format!(
            "content too long (max {MAX_CONTENT_LEN} characters)"
        )));
    }
    Ok(trimmed.to_string())
}

/// Parses an optional due date.
///
/// Blank input means "no due date". Accepts RFC 3339, `YYYY-MM-DD`,
/// `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS` and
/// `Tue Oct 01 2024 00:00:00`; anything following a browser-style
/// date-time (such as ` GMT+0000 (Coordinated Universal Time)`) is ignored.
///
/// # Errors
///
/// Returns [`TodoError::Validation`] if no layout matches.
pub fn parse_due_date(raw: &str) -> Result<Option<DateTime<Utc>>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Some(parsed.and_utc()));
        }
    }

    // Browser strings carry a zone suffix after the time.
    match NaiveDateTime::parse_and_remainder(raw, BROWSER_FORMAT) {
        Ok((parsed, rest)) if rest.starts_with(' ') => return Ok(Some(parsed.and_utc())),
        _ => {},
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Some(date.and_time(chrono::NaiveTime::MIN).and_utc()));
    }

    Err(TodoError::Validation(format!("invalid submitDate: {raw:?}")))
}

/// Parses an optional priority, defaulting to [`Priority::Medium`].
///
/// # Errors
///
/// Returns [`TodoError::Validation`] for values outside the enumeration.
pub fn parse_priority(raw: Option<&str>) -> Result<Priority> {
    match raw.map(str::trim) {
        None | Some("") => Ok(Priority::default()),
        Some(value) => value.parse(),
    }
}
