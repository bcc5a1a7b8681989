//! Field parsing for fire dataset rows.
//!
//! Every parser either returns a value or a [`RowIssue`] naming the column and
//! the offending text. Nothing here falls back to a default.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use fire_stats_fire_models::Coordinates;
use fire_stats_source_models::RowIssue;

/// Formats tried, in order, when a dataset does not configure its own.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%m/%d/%Y",
    "%Y-%m-%d",
];

/// Returns `None` for blank cells, otherwise the trimmed text.
#[must_use]
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Parses a datetime against each format in turn. Date-only formats yield
/// midnight.
///
/// # Errors
///
/// Returns [`RowIssue::InvalidDate`] if no format matches.
pub fn parse_datetime<S: AsRef<str>>(
    column: &str,
    value: &str,
    formats: &[S],
) -> Result<NaiveDateTime, RowIssue> {
    let value = value.trim();
    for format in formats {
        let format = format.as_ref();
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_time(NaiveTime::MIN));
        }
    }
    Err(RowIssue::InvalidDate {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Parses an optional datetime cell; blank cells are `Ok(None)`.
///
/// # Errors
///
/// Returns [`RowIssue::InvalidDate`] for non-blank unparseable text.
pub fn parse_optional_datetime<S: AsRef<str>>(
    column: &str,
    value: &str,
    formats: &[S],
) -> Result<Option<NaiveDateTime>, RowIssue> {
    non_blank(value)
        .map(|v| parse_datetime(column, v, formats))
        .transpose()
}

/// Parses a decimal number, accepting thousands separators (`"1,234.5"`).
///
/// # Errors
///
/// Returns [`RowIssue::InvalidNumber`] if the text is not a number.
pub fn parse_f64(column: &str, value: &str) -> Result<f64, RowIssue> {
    let value = value.trim();
    value
        .parse::<f64>()
        .or_else(|_| value.replace(',', "").parse::<f64>())
        .map_err(|_| RowIssue::InvalidNumber {
            column: column.to_string(),
            value: value.to_string(),
        })
}

/// Parses a year. Exports sometimes render integers as `"2,014"` or
/// `"2014.0"`; both are accepted, any fractional part is not.
///
/// # Errors
///
/// Returns [`RowIssue::InvalidNumber`] if the text is not a whole number.
pub fn parse_year(column: &str, value: &str) -> Result<i32, RowIssue> {
    let cleaned = value.trim().replace(',', "");
    let digits = cleaned.strip_suffix(".0").unwrap_or(&cleaned);
    digits.parse::<i32>().map_err(|_| RowIssue::InvalidNumber {
        column: column.to_string(),
        value: value.trim().to_string(),
    })
}

/// Parses an acreage, which must be finite and non-negative.
///
/// # Errors
///
/// Returns [`RowIssue::InvalidNumber`] for non-numeric text and
/// [`RowIssue::InvalidAcres`] for negative or non-finite values.
pub fn parse_acres(column: &str, value: &str) -> Result<f64, RowIssue> {
    let acres = parse_f64(column, value)?;
    if !acres.is_finite() || acres < 0.0 {
        return Err(RowIssue::InvalidAcres { value: acres });
    }
    Ok(acres)
}

/// Parses a latitude/longitude pair.
///
/// Both blank, or both exactly zero (a common placeholder for "not
/// recorded"), yields `Ok(None)`. Only one side present, or values outside
/// WGS84 ranges, is an error.
///
/// # Errors
///
/// Returns [`RowIssue::InvalidNumber`] for non-numeric text and
/// [`RowIssue::InvalidCoordinates`] for half-present or out-of-range pairs.
pub fn parse_coordinates(
    lat_column: &str,
    lat: &str,
    lng_column: &str,
    lng: &str,
) -> Result<Option<Coordinates>, RowIssue> {
    let invalid = || RowIssue::InvalidCoordinates {
        latitude: lat.trim().to_string(),
        longitude: lng.trim().to_string(),
    };

    match (non_blank(lat), non_blank(lng)) {
        (None, None) => Ok(None),
        (Some(lat_str), Some(lng_str)) => {
            let latitude = parse_f64(lat_column, lat_str)?;
            let longitude = parse_f64(lng_column, lng_str)?;
            if latitude == 0.0 && longitude == 0.0 {
                return Ok(None);
            }
            Coordinates::new(latitude, longitude)
                .map(Some)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}
