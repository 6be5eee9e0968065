//! Single value sensor records.
//!
//! Temperature, humidity, and pressure records carry their value as the first payload
//! field. Radar altitude and line number records are navigation records where the value
//! follows a tag, e.g., `$RDALT,123.4,`. There is only one value so any failure rejects the
//! record.
use std::str::FromStr;

use crate::fields::Fields;
use crate::prelude::*;

/// Navigation sub-header for radar altitude records.
pub const RDALT: &str = "$RDALT";
/// Navigation sub-header for survey line number records.
pub const LINE: &str = "$LINE";

/// Parse the first field of `payload`.
///
/// # Errors
/// [Error::InvalidField] if the field is missing or cannot be parsed as `T`.
pub fn leading_value<T: FromStr>(field: &'static str, payload: &str) -> Result<T> {
    let token = Fields::new(payload).next().unwrap_or_default();
    token.trim().parse().map_err(|_| Error::InvalidField {
        field,
        value: token.to_string(),
    })
}

/// Parse the field directly following `tag` in `payload`.
///
/// # Errors
/// [Error::InvalidField] if `payload` does not begin with `tag` and a delimiter, or the
/// value cannot be parsed as `T`.
pub fn tagged_value<T: FromStr>(field: &'static str, tag: &str, payload: &str) -> Result<T> {
    let rest = payload
        .strip_prefix(tag)
        .and_then(|rest| rest.strip_prefix(Fields::DELIMITER))
        .ok_or_else(|| Error::InvalidField {
            field,
            value: payload.to_string(),
        })?;
    leading_value(field, rest)
}

pub fn temperature(payload: &str) -> Result<f64> {
    leading_value("temperature", payload)
}

pub fn humidity(payload: &str) -> Result<f64> {
    leading_value("humidity", payload)
}

pub fn pressure(payload: &str) -> Result<f64> {
    leading_value("pressure", payload)
}

/// Radar altitude above ground level.
pub fn radar_altitude(payload: &str) -> Result<f64> {
    tagged_value("radar altitude", RDALT, payload)
}

pub fn line_number(payload: &str) -> Result<u32> {
    tagged_value("line number", LINE, payload)
}
