#![allow(dead_code)]
use std::fs;
use std::path::Path;

use airsurvey::nmea::checksum;
use airsurvey::spectrometer::{CrystalLabel, Frame, NUM_CHANNELS};

pub const GGA_BODY: &str = "GPGGA,134259.30,2350.4087,N,07344.9629,E,1,05,4.1,312.48,M,-53.10,M,,";
pub const ZDA_BODY: &str = "GPZDA,134259.00,03,06,2021,00,00";

/// Wrap `body` in `$` and `*HH`.
pub fn sentence(body: &str) -> String {
    format!("${body}*{:02X}", checksum(body.as_bytes()))
}

/// A frame with distinct detector values and a spectrum containing newline bytes.
pub fn frame(timestamp: u32) -> Frame {
    let mut frame = Frame {
        timestamp,
        ..Default::default()
    };
    frame.down.acquisition_time = 1000;
    frame.down.live_time = 990;
    frame.down.total_gamma_count = 321;
    frame.up.acquisition_time = 1001;
    frame.up.live_time = 991;
    frame.up.total_gamma_count = 123;
    for idx in 0..NUM_CHANNELS {
        frame.down.spectrum[idx] = 0x0a0a;
        frame.up.spectrum[idx] = idx as u16;
    }
    for (idx, status) in frame.crystals.iter_mut().enumerate() {
        (status.label, status.error) = match idx % 3 {
            0 => (CrystalLabel::DownActive, false),
            1 => (CrystalLabel::UpActive, false),
            _ => (CrystalLabel::Error, true),
        };
    }
    frame
}

/// Builds an in-memory survey log.
#[derive(Default)]
pub struct LogBuilder {
    dat: Vec<u8>,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(mut self, line: &str) -> Self {
        self.dat.extend_from_slice(line.as_bytes());
        self.dat.push(b'\n');
        self
    }

    pub fn gps(self, ms: u64, body: &str) -> Self {
        let line = format!("$GPS,{ms},{}", sentence(body));
        self.line(&line)
    }

    /// Spectrometer marker line followed by raw frame bytes.
    pub fn frame_bytes(self, ms: u64, dat: &[u8]) -> Self {
        let mut zelf = self.line(&format!("$RSX,{ms},"));
        zelf.dat.extend_from_slice(dat);
        zelf
    }

    pub fn frame(self, ms: u64, frame: &Frame) -> Self {
        self.frame_bytes(ms, &frame.encode())
    }

    pub fn build(self) -> Vec<u8> {
        self.dat
    }

    pub fn write(self, path: &Path) {
        fs::write(path, self.dat).expect("writing survey log");
    }
}
