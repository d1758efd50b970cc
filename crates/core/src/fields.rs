//! Field rules shared by the API layer and the schema.

use crate::error::{Error, Result};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Check that a bounded text field fits its column.
///
/// Length is counted in characters, matching how both backends measure
/// `VARCHAR`/`length()`.
pub fn validate_max_len(field: &'static str, value: Option<&str>, max: usize) -> Result<()> {
    if let Some(value) = value {
        let actual = value.chars().count();
        if actual > max {
            return Err(Error::FieldTooLong { field, max, actual });
        }
    }
    Ok(())
}

/// Parse a publish date submitted by a client.
///
/// Accepts RFC 3339 timestamps, and local date-times or plain dates which are
/// taken as UTC.
pub fn parse_publish_date(field: &'static str, value: &str) -> Result<OffsetDateTime> {
    let value = value.trim();

    if let Ok(ts) = OffsetDateTime::parse(value, &time::format_description::well_known::Rfc3339) {
        return Ok(ts);
    }

    let with_subsecond =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
    let with_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let with_minutes = format_description!("[year]-[month]-[day]T[hour]:[minute]");

    for format in [with_subsecond, with_seconds, with_minutes] {
        if let Ok(ts) = PrimitiveDateTime::parse(value, format) {
            return Ok(ts.assume_utc());
        }
    }

    if let Ok(date) = Date::parse(value, format_description!("[year]-[month]-[day]")) {
        return Ok(date.midnight().assume_utc());
    }

    Err(Error::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Parse a boolean form flag.
pub fn parse_flag(field: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" | "" => Ok(false),
        _ => Err(Error::InvalidFlag {
            field,
            value: value.to_string(),
        }),
    }
}
