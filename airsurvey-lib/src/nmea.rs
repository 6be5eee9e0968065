//! NMEA-style GPS sentence handling.
//!
//! Sentences are checksummed with a single byte XOR of every byte between the leading
//! `$` and the `*` delimiter, written as two hex digits after the `*`.
//!
//! Once a sentence is verified its fields are decoded positionally. A field that fails
//! to parse leaves the previous value in place and is logged; the remaining fields are
//! still decoded.
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fields::Fields;
use crate::prelude::*;

/// Sub-header of a GPS fix sentence.
pub const GGA: &str = "$GPGGA";
/// Sub-header of a GPS time and date sentence.
pub const ZDA: &str = "$GPZDA";

/// XOR of all bytes in `body`.
#[must_use]
pub fn checksum(body: &[u8]) -> u8 {
    body.iter().fold(0, |acc, b| acc ^ b)
}

/// Verify the checksum of `sentence`, returning the checksummed body, i.e., the text
/// strictly between `$` and `*`.
///
/// # Errors
/// [Error::MissingChecksum] if the sentence does not start with `$` or the `*` and two
/// hex digits are absent, and [Error::ChecksumMismatch] if the computed checksum does not
/// match the one in the sentence.
pub fn verify(sentence: &str) -> Result<&str> {
    let rest = sentence.strip_prefix('$').ok_or(Error::MissingChecksum)?;
    let (body, tail) = rest.split_once('*').ok_or(Error::MissingChecksum)?;
    let digits = tail.get(..2).ok_or(Error::MissingChecksum)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::MissingChecksum);
    }
    let expected = u8::from_str_radix(digits, 16).map_err(|_| Error::MissingChecksum)?;
    let actual = checksum(body.as_bytes());
    if expected != actual {
        return Err(Error::ChecksumMismatch { expected, actual });
    }
    Ok(body)
}

/// Parse a single positional token, logging failures.
fn field<T: FromStr>(name: &'static str, token: &str) -> Option<T> {
    match token.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            debug!(field = name, token, "failed to extract field from gps sentence");
            None
        }
    }
}

fn first_char(name: &'static str, token: &str) -> Option<char> {
    let c = token.chars().next();
    if c.is_none() {
        debug!(field = name, "failed to extract field from gps sentence");
    }
    c
}

/// Convert an NMEA `DDMM.mmmm` (or `DDDMM.mmmm`) angle to decimal degrees.
#[must_use]
pub fn degrees_minutes_to_decimal(value: f64) -> f64 {
    let value = value / 100.0;
    let degrees = value.floor();
    let minutes = value - degrees;
    (100.0 * minutes) / 60.0 + degrees
}

/// GPS fix quality indicator.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FixQuality {
    #[default]
    Invalid = 0,
    Gps = 1,
    Dgps = 2,
}

impl FixQuality {
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => FixQuality::Gps,
            2 => FixQuality::Dgps,
            _ => FixQuality::Invalid,
        }
    }

    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Fields of a `$GPGGA` fix sentence.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct GpsFix {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: f32,
    /// Latitude in decimal degrees
    pub latitude: f64,
    pub latitude_hemisphere: char,
    /// Longitude in decimal degrees
    pub longitude: f64,
    pub longitude_hemisphere: char,
    pub fix: FixQuality,
    /// Number of satellites in use
    pub satellites: u32,
    /// Horizontal dilution of precision
    pub hdop: f32,
    /// Altitude above mean sea level
    pub altitude: f32,
    pub altitude_unit: char,
    /// Difference between the WGS84 ellipsoid and mean sea level
    pub geoid_separation: f32,
    pub geoid_separation_unit: char,
    /// Seconds since the last differential update
    pub differential_age: f32,
    pub base_station_id: u16,
}

/// Split `HHMMSS.ss` into hour, minute, and fractional seconds.
fn split_time_of_day(token: &str) -> Option<(u8, u8, f32)> {
    let hours = token.get(..2)?.parse().ok()?;
    let minutes = token.get(2..4)?.parse().ok()?;
    let seconds = token.get(4..)?.parse().ok()?;
    Some((hours, minutes, seconds))
}

impl GpsFix {
    /// Number of positional fields following the sentence id.
    pub const NUM_FIELDS: usize = 14;

    /// Verify `sentence` and update from its fields.
    ///
    /// # Errors
    /// Checksum errors from [verify]. Nothing is modified if the sentence is rejected.
    pub fn update(&mut self, sentence: &str) -> Result<()> {
        let body = verify(sentence)?;
        self.apply(body);
        Ok(())
    }

    /// Apply the fields of an already verified sentence body.
    pub fn apply(&mut self, body: &str) {
        // skip the sentence id
        let fields = Fields::new(body).skip(1).take(Self::NUM_FIELDS);
        for (idx, token) in fields.enumerate() {
            if token.is_empty() {
                continue;
            }
            match idx + 1 {
                1 => match split_time_of_day(token) {
                    Some((h, m, s)) => {
                        self.hours = h;
                        self.minutes = m;
                        self.seconds = s;
                    }
                    None => debug!(token, "failed to extract time field from gps sentence"),
                },
                2 => {
                    if let Some(v) = field("latitude", token) {
                        self.latitude = degrees_minutes_to_decimal(v);
                    }
                }
                3 => {
                    if let Some(c) = first_char("latitude hemisphere", token) {
                        self.latitude_hemisphere = c;
                    }
                }
                4 => {
                    if let Some(v) = field("longitude", token) {
                        self.longitude = degrees_minutes_to_decimal(v);
                    }
                }
                5 => {
                    if let Some(c) = first_char("longitude hemisphere", token) {
                        self.longitude_hemisphere = c;
                    }
                }
                6 => {
                    if let Some(v) = field("fix quality", token) {
                        self.fix = FixQuality::from_code(v);
                    }
                }
                7 => {
                    if let Some(v) = field("satellites", token) {
                        self.satellites = v;
                    }
                }
                8 => {
                    if let Some(v) = field("hdop", token) {
                        self.hdop = v;
                    }
                }
                9 => {
                    if let Some(v) = field("altitude", token) {
                        self.altitude = v;
                    }
                }
                10 => {
                    if let Some(c) = first_char("altitude unit", token) {
                        self.altitude_unit = c;
                    }
                }
                11 => {
                    if let Some(v) = field("geoid separation", token) {
                        self.geoid_separation = v;
                    }
                }
                12 => {
                    if let Some(c) = first_char("geoid separation unit", token) {
                        self.geoid_separation_unit = c;
                    }
                }
                13 => {
                    if let Some(v) = field("differential age", token) {
                        self.differential_age = v;
                    }
                }
                14 => {
                    if let Some(v) = field("base station id", token) {
                        self.base_station_id = v;
                    }
                }
                _ => unreachable!("fields are limited to {}", Self::NUM_FIELDS),
            }
        }
    }
}

/// Fields of a `$GPZDA` time and date sentence.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct GpsDate {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub day: u8,
    pub month: u8,
    pub year: u16,
}

/// Split `HHMMSS` into hour, minute, and second ignoring anything trailing.
fn split_packed_time(token: &str) -> Option<(u8, u8, u8)> {
    let hour = token.get(..2)?.parse().ok()?;
    let minute = token.get(2..4)?.parse().ok()?;
    let second = token.get(4..6)?.parse().ok()?;
    Some((hour, minute, second))
}

impl GpsDate {
    pub const NUM_FIELDS: usize = 4;

    /// Verify `sentence` and update from its fields.
    ///
    /// # Errors
    /// Checksum errors from [verify]. Nothing is modified if the sentence is rejected.
    pub fn update(&mut self, sentence: &str) -> Result<()> {
        let body = verify(sentence)?;
        self.apply(body);
        Ok(())
    }

    pub fn apply(&mut self, body: &str) {
        let fields = Fields::new(body).skip(1).take(Self::NUM_FIELDS);
        for (idx, token) in fields.enumerate() {
            if token.is_empty() {
                continue;
            }
            match idx + 1 {
                1 => match split_packed_time(token) {
                    Some((h, m, s)) => {
                        self.hour = h;
                        self.minute = m;
                        self.second = s;
                    }
                    None => debug!(token, "failed to extract hr, min and seconds from gps sentence"),
                },
                2 => {
                    if let Some(v) = field("day", token) {
                        self.day = v;
                    }
                }
                3 => {
                    if let Some(v) = field("month", token) {
                        self.month = v;
                    }
                }
                4 => {
                    if let Some(v) = field("year", token) {
                        self.year = v;
                    }
                }
                _ => unreachable!("fields are limited to {}", Self::NUM_FIELDS),
            }
        }
    }
}
