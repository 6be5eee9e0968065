//! Gamma-ray spectrometer (RSX) frame decoding.
//!
//! A frame is a fixed 4248 byte binary block following an `$RSX` record line. It holds a
//! frame time, crystal status bitmasks, and two virtual detectors ("down" and "up"), each
//! with timing, a total count, and a 1024 channel spectrum.
//!
//! Layout (offsets in bytes, all integers little-endian):
//!
//! |offset|size|field|
//! |---|---|---|
//! |0|4|magic `55 90 10 04`|
//! |7|1|XOR of bytes 0..7|
//! |12|4|frame time|
//! |19|2|down-active crystal mask|
//! |23|2|up-active crystal mask|
//! |27|2|error crystal mask|
//! |126|2060|down virtual detector|
//! |2187|2060|up virtual detector|
//! |4247|1|XOR of bytes 8..4246|
//!
//! Virtual detector layout, relative to its offset: acquisition time (4), live time (4),
//! total gamma count (2), 2 unused bytes, then 1024 2-byte channel counts.
mod cursor;

use serde::{Deserialize, Serialize};

use crate::nmea::checksum;
use crate::prelude::*;
use cursor::Cursor;

/// Number of spectrum channels per virtual detector.
pub const NUM_CHANNELS: usize = 1024;
/// Number of scintillator crystals.
pub const NUM_CRYSTALS: usize = 15;

/// Bytes every frame starts with.
pub const MAGIC: [u8; 4] = [0x55, 0x90, 0x10, 0x04];

const HEADER_CHECKSUM_OFFSET: usize = 7;
const BODY_OFFSET: usize = 8;
const BODY_CHECKSUM_OFFSET: usize = Frame::LEN - 1;
// Byte before the body checksum is not covered by it.
const BODY_END: usize = Frame::LEN - 2;
const TIMESTAMP_OFFSET: usize = 12;
const DOWN_MASK_OFFSET: usize = 19;
const UP_MASK_OFFSET: usize = 23;
const ERROR_MASK_OFFSET: usize = 27;
const DOWN_DETECTOR_OFFSET: usize = 126;
const UP_DETECTOR_OFFSET: usize = 2187;

/// Crystal state derived from the frame bitmasks.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CrystalLabel {
    DownActive,
    UpActive,
    Error,
    #[default]
    None,
}

impl CrystalLabel {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            CrystalLabel::DownActive => 'D',
            CrystalLabel::UpActive => 'U',
            CrystalLabel::Error => 'E',
            CrystalLabel::None => 'N',
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrystalStatus {
    pub label: CrystalLabel,
    pub error: bool,
}

impl Default for CrystalStatus {
    fn default() -> Self {
        CrystalStatus {
            label: CrystalLabel::None,
            error: true,
        }
    }
}

impl CrystalStatus {
    /// Status of crystal `idx` where bit `idx` of each mask belongs to that crystal.
    ///
    /// Error takes priority over down-active, which takes priority over up-active. A
    /// crystal with no bits set is [CrystalLabel::None], which is an error condition.
    #[must_use]
    pub fn from_masks(idx: usize, down: u16, up: u16, error: u16) -> Self {
        let bit = 1u16 << idx;
        let (label, error) = if error & bit != 0 {
            (CrystalLabel::Error, true)
        } else if down & bit != 0 {
            (CrystalLabel::DownActive, false)
        } else if up & bit != 0 {
            (CrystalLabel::UpActive, false)
        } else {
            (CrystalLabel::None, true)
        };
        CrystalStatus { label, error }
    }
}

/// One of the two independent detectors in a frame.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VirtualDetector {
    pub acquisition_time: u32,
    pub live_time: u32,
    pub total_gamma_count: u16,
    /// [NUM_CHANNELS] channel counts
    pub spectrum: Vec<u16>,
}

impl Default for VirtualDetector {
    fn default() -> Self {
        VirtualDetector {
            acquisition_time: 0,
            live_time: 0,
            total_gamma_count: 0,
            spectrum: vec![0; NUM_CHANNELS],
        }
    }
}

impl VirtualDetector {
    const SPECTRUM_OFFSET: usize = 12;

    fn decode(dat: &[u8], offset: usize) -> Self {
        let mut cur = Cursor::at(dat, offset);
        let acquisition_time = cur.read_u32_le();
        let live_time = cur.read_u32_le();
        let total_gamma_count = cur.read_u16_le();

        let mut cur = Cursor::at(dat, offset + Self::SPECTRUM_OFFSET);
        let spectrum = (0..NUM_CHANNELS).map(|_| cur.read_u16_le()).collect();

        VirtualDetector {
            acquisition_time,
            live_time,
            total_gamma_count,
            spectrum,
        }
    }

    fn encode_into(&self, dat: &mut [u8], offset: usize) {
        dat[offset..offset + 4].copy_from_slice(&self.acquisition_time.to_le_bytes());
        dat[offset + 4..offset + 8].copy_from_slice(&self.live_time.to_le_bytes());
        dat[offset + 8..offset + 10].copy_from_slice(&self.total_gamma_count.to_le_bytes());
        let start = offset + Self::SPECTRUM_OFFSET;
        for (i, count) in self.spectrum.iter().take(NUM_CHANNELS).enumerate() {
            let o = start + 2 * i;
            dat[o..o + 2].copy_from_slice(&count.to_le_bytes());
        }
    }
}

/// A decoded spectrometer frame.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Frame {
    pub timestamp: u32,
    pub down: VirtualDetector,
    pub up: VirtualDetector,
    pub crystals: [CrystalStatus; NUM_CRYSTALS],
}

impl Frame {
    /// Frame length in bytes
    pub const LEN: usize = 4248;

    /// Decode and validate a frame from the first [Frame::LEN] bytes of `dat`.
    ///
    /// # Errors
    /// [Error::NotEnoughData] if `dat` is short, [Error::InvalidMagic] if it does not start
    /// with [MAGIC], and [Error::HeaderChecksum] or [Error::BodyChecksum] on integrity
    /// failures.
    pub fn decode(dat: &[u8]) -> Result<Self> {
        if dat.len() < Self::LEN {
            return Err(Error::NotEnoughData {
                actual: dat.len(),
                minimum: Self::LEN,
            });
        }

        let magic = [dat[0], dat[1], dat[2], dat[3]];
        if magic != MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let expected = dat[HEADER_CHECKSUM_OFFSET];
        let actual = checksum(&dat[..HEADER_CHECKSUM_OFFSET]);
        if expected != actual {
            return Err(Error::HeaderChecksum { expected, actual });
        }

        let expected = dat[BODY_CHECKSUM_OFFSET];
        let actual = checksum(&dat[BODY_OFFSET..BODY_END]);
        if expected != actual {
            return Err(Error::BodyChecksum { expected, actual });
        }

        let timestamp = Cursor::at(dat, TIMESTAMP_OFFSET).read_u32_le();
        let down_mask = Cursor::at(dat, DOWN_MASK_OFFSET).read_u16_le();
        let up_mask = Cursor::at(dat, UP_MASK_OFFSET).read_u16_le();
        let error_mask = Cursor::at(dat, ERROR_MASK_OFFSET).read_u16_le();

        Ok(Frame {
            timestamp,
            down: VirtualDetector::decode(dat, DOWN_DETECTOR_OFFSET),
            up: VirtualDetector::decode(dat, UP_DETECTOR_OFFSET),
            crystals: std::array::from_fn(|idx| {
                CrystalStatus::from_masks(idx, down_mask, up_mask, error_mask)
            }),
        })
    }

    /// Encode into a valid frame, including magic and checksums.
    ///
    /// Crystal masks are rebuilt from the crystal labels; the error flags are not encoded
    /// separately.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut dat = vec![0u8; Self::LEN];
        dat[..MAGIC.len()].copy_from_slice(&MAGIC);
        dat[HEADER_CHECKSUM_OFFSET] = checksum(&dat[..HEADER_CHECKSUM_OFFSET]);

        let (mut down, mut up, mut error) = (0u16, 0u16, 0u16);
        for (idx, status) in self.crystals.iter().enumerate() {
            match status.label {
                CrystalLabel::DownActive => down |= 1 << idx,
                CrystalLabel::UpActive => up |= 1 << idx,
                CrystalLabel::Error => error |= 1 << idx,
                CrystalLabel::None => (),
            }
        }
        dat[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 4].copy_from_slice(&self.timestamp.to_le_bytes());
        dat[DOWN_MASK_OFFSET..DOWN_MASK_OFFSET + 2].copy_from_slice(&down.to_le_bytes());
        dat[UP_MASK_OFFSET..UP_MASK_OFFSET + 2].copy_from_slice(&up.to_le_bytes());
        dat[ERROR_MASK_OFFSET..ERROR_MASK_OFFSET + 2].copy_from_slice(&error.to_le_bytes());
        self.down.encode_into(&mut dat, DOWN_DETECTOR_OFFSET);
        self.up.encode_into(&mut dat, UP_DETECTOR_OFFSET);

        dat[BODY_CHECKSUM_OFFSET] = checksum(&dat[BODY_OFFSET..BODY_END]);
        dat
    }
}
