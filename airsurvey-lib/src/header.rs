//! Line classification.
//!
//! Every text line starts with a record header token and the recording time in
//! milliseconds, e.g., `$TRM,1234.0,23.5,`. The remainder is the record payload.
use serde::{Deserialize, Serialize};

use crate::fields::Fields;
use crate::nmea;
use crate::sensor;
use crate::snapshot::Channel;

/// Top-level record header.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Header {
    /// Spectrometer marker, followed in the stream by a binary [crate::Frame].
    Spectrometer,
    /// Navigation group, `$RDALT` or `$LINE` payloads.
    Navigation,
    /// GPS group, `$GPGGA` or `$GPZDA` payloads.
    Gps,
    Pressure,
    Temperature,
    Humidity,
}

impl Header {
    const PREFIXES: [(&'static str, Header); 6] = [
        ("$RSX", Header::Spectrometer),
        ("$NAV", Header::Navigation),
        ("$GPS", Header::Gps),
        ("$BAR", Header::Pressure),
        ("$TRM", Header::Temperature),
        ("$HUM", Header::Humidity),
    ];

    /// Classify a header token by prefix. Returns `None` for unrecognized headers.
    #[must_use]
    pub fn classify(token: &str) -> Option<Header> {
        Self::PREFIXES
            .iter()
            .find(|(prefix, _)| token.starts_with(prefix))
            .map(|(_, hdr)| *hdr)
    }

    /// Determine the channel a payload for this header updates. Group headers are
    /// resolved using the payload's leading sub-header token.
    #[must_use]
    pub fn route(&self, payload: &str) -> Option<Channel> {
        match self {
            Header::Spectrometer => Some(Channel::Spectrometer),
            Header::Pressure => Some(Channel::Pressure),
            Header::Temperature => Some(Channel::Temperature),
            Header::Humidity => Some(Channel::Humidity),
            Header::Navigation => {
                if payload.starts_with(sensor::RDALT) {
                    Some(Channel::RadarAltitude)
                } else if payload.starts_with(sensor::LINE) {
                    Some(Channel::LineNumber)
                } else {
                    None
                }
            }
            Header::Gps => {
                if payload.starts_with(nmea::GGA) {
                    Some(Channel::GpsFix)
                } else if payload.starts_with(nmea::ZDA) {
                    Some(Channel::GpsDate)
                } else {
                    None
                }
            }
        }
    }
}

/// Largest recording time magnitude, in milliseconds, accepted by [split_record].
pub const MAX_TIMESTAMP_MS: f64 = 1e15;

/// A classified line with its recording time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawRecord<'a> {
    pub header: Header,
    /// Recording time in milliseconds
    pub timestamp_ms: f64,
    /// Everything after the recording time field
    pub payload: &'a str,
}

impl RawRecord<'_> {
    /// Recording time in whole seconds.
    #[must_use]
    pub fn epoch(&self) -> i64 {
        (self.timestamp_ms / 1000.0).floor() as i64
    }
}

/// Why a line was skipped by [split_record].
#[derive(Debug, Clone, PartialEq)]
pub enum Skip {
    UnknownHeader,
    /// Nothing follows the header token.
    NoRemainder(Header),
    BadTimestamp { header: Header, token: String },
}

impl Skip {
    /// The header of the skipped line, if it was recognized.
    #[must_use]
    pub fn header(&self) -> Option<Header> {
        match self {
            Skip::UnknownHeader => None,
            Skip::NoRemainder(header) | Skip::BadTimestamp { header, .. } => Some(*header),
        }
    }
}

/// Split a line into its header, recording time and payload.
///
/// Trailing line terminators are removed before splitting.
///
/// # Errors
/// A [Skip] if the header is not recognized or the recording time is missing, invalid,
/// not finite or larger in magnitude than [MAX_TIMESTAMP_MS].
///
/// # Example
/// ```
/// use airsurvey::header::{split_record, Header};
///
/// let rec = split_record("$TRM,5250.5,23.25,\r\n").unwrap();
/// assert_eq!(rec.header, Header::Temperature);
/// assert_eq!(rec.epoch(), 5);
/// assert_eq!(rec.payload, "23.25,");
/// ```
pub fn split_record(line: &str) -> Result<RawRecord<'_>, Skip> {
    let line = line.trim_end_matches(['\r', '\n']);
    let mut fields = Fields::new(line);
    let header = fields
        .next()
        .and_then(Header::classify)
        .ok_or(Skip::UnknownHeader)?;
    if fields.remainder().is_none() {
        return Err(Skip::NoRemainder(header));
    }
    let token = fields.next().unwrap_or_default();
    let bad_timestamp = || Skip::BadTimestamp {
        header,
        token: token.to_string(),
    };
    let timestamp_ms: f64 = token.trim().parse().map_err(|_| bad_timestamp())?;
    if !(timestamp_ms.is_finite() && timestamp_ms.abs() <= MAX_TIMESTAMP_MS) {
        return Err(bad_timestamp());
    }

    Ok(RawRecord {
        header,
        timestamp_ms,
        payload: fields.remainder().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("$RSX", Some(Header::Spectrometer); "spectrometer")]
    #[test_case("$NAV", Some(Header::Navigation); "navigation")]
    #[test_case("$GPS", Some(Header::Gps); "gps")]
    #[test_case("$BAR", Some(Header::Pressure); "pressure")]
    #[test_case("$TRM", Some(Header::Temperature); "temperature")]
    #[test_case("$HUM", Some(Header::Humidity); "humidity")]
    #[test_case("$HUMX", Some(Header::Humidity); "prefix match")]
    #[test_case("$MAG", None; "magnetometer")]
    #[test_case("$trm", None; "case sensitive")]
    #[test_case("", None; "empty")]
    fn classify(token: &str, expected: Option<Header>) {
        assert_eq!(Header::classify(token), expected);
    }

    #[test_case(Header::Navigation, "$RDALT,120.5,", Some(Channel::RadarAltitude); "radar altitude")]
    #[test_case(Header::Navigation, "$LINE,1020,", Some(Channel::LineNumber); "line number")]
    #[test_case(Header::Navigation, "$HDG,1.0,", None; "unknown nav")]
    #[test_case(Header::Gps, "$GPGGA,134259.30,", Some(Channel::GpsFix); "fix")]
    #[test_case(Header::Gps, "$GPZDA,134259,", Some(Channel::GpsDate); "date")]
    #[test_case(Header::Gps, "$GPRMC,134259,", None; "unknown gps")]
    #[test_case(Header::Pressure, "", Some(Channel::Pressure); "pressure")]
    #[test_case(Header::Spectrometer, "", Some(Channel::Spectrometer); "spectrometer")]
    fn route(header: Header, payload: &str, expected: Option<Channel>) {
        assert_eq!(header.route(payload), expected);
    }

    #[test]
    fn split_record_gps() {
        let rec = split_record("$GPS,1999.9,$GPGGA,1,2*00\n").unwrap();
        assert_eq!(rec.header, Header::Gps);
        assert_eq!(rec.timestamp_ms, 1999.9);
        assert_eq!(rec.epoch(), 1);
        assert_eq!(rec.payload, "$GPGGA,1,2*00");
    }

    #[test]
    fn split_record_without_payload() {
        let rec = split_record("$RSX,6000").unwrap();
        assert_eq!(rec.header, Header::Spectrometer);
        assert_eq!(rec.epoch(), 6);
        assert_eq!(rec.payload, "");
    }

    #[test_case("$TRM,NaN,20.0", "NaN"; "nan")]
    #[test_case("$TRM,inf,20.0", "inf"; "infinite")]
    #[test_case("$TRM,-infinity,20.0", "-infinity"; "negative infinite")]
    #[test_case("$TRM,5e21,20.0", "5e21"; "too large")]
    #[test_case("$TRM,-5e21,20.0", "-5e21"; "too small")]
    fn split_record_rejects_unusable_timestamp(line: &str, token: &str) {
        let expected = Skip::BadTimestamp {
            header: Header::Temperature,
            token: token.to_string(),
        };
        assert_eq!(split_record(line), Err(expected));
    }

    #[test]
    fn split_record_accepts_largest_timestamp() {
        let rec = split_record("$TRM,-1e15,20.0").unwrap();
        assert_eq!(rec.epoch(), -1_000_000_000_000);
        assert!(split_record("$TRM,1e15,20.0").is_ok());
    }

    #[test_case("$XYZ,100,1", Skip::UnknownHeader; "unknown header")]
    #[test_case("$BAR\r\n", Skip::NoRemainder(Header::Pressure); "no remainder")]
    #[test_case("$BAR,abc,1013", Skip::BadTimestamp { header: Header::Pressure, token: "abc".to_string() }; "bad timestamp")]
    #[test_case("$BAR,,1013", Skip::BadTimestamp { header: Header::Pressure, token: String::new() }; "empty timestamp")]
    fn split_record_skips(line: &str, expected: Skip) {
        assert_eq!(split_record(line), Err(expected));
    }

    #[test]
    fn epoch_floors_negative_times() {
        let rec = RawRecord {
            header: Header::Temperature,
            timestamp_ms: -0.5,
            payload: "",
        };
        assert_eq!(rec.epoch(), -1);
    }
}
