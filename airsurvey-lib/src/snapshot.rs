use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::nmea::{GpsDate, GpsFix};
use crate::spectrometer::Frame;

/// A data channel tracked by the synchronizer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Temperature,
    Humidity,
    Pressure,
    Spectrometer,
    GpsFix,
    GpsDate,
    RadarAltitude,
    LineNumber,
}

impl Channel {
    pub const COUNT: usize = 8;

    /// All channels, in the order they are checked for staleness.
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Temperature,
        Channel::Humidity,
        Channel::Pressure,
        Channel::Spectrometer,
        Channel::GpsFix,
        Channel::GpsDate,
        Channel::RadarAltitude,
        Channel::LineNumber,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Channel::Temperature => "Temperature",
            Channel::Humidity => "Humidity",
            Channel::Pressure => "Pressure",
            Channel::Spectrometer => "RSX",
            Channel::GpsFix => "GPS GPGGA",
            Channel::GpsDate => "GPS GPZDA",
            Channel::RadarAltitude => "NAV RDALT",
            Channel::LineNumber => "NAV LINE",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Latest decoded value of every channel.
///
/// A snapshot is only ever updated field by field as records are decoded; it is never
/// reset, so a channel that stops reporting keeps its last value.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Snapshot {
    /// Epoch (integer seconds of recording time) this snapshot was flushed at
    pub epoch: i64,
    pub gps_fix: GpsFix,
    pub gps_date: GpsDate,
    /// Height above ground level
    pub radar_altitude: f64,
    pub line_number: u32,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub spectrometer: Frame,
}
