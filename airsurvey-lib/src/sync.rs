//! Epoch synchronization of channel values.
//!
//! Records are accumulated into a single [Snapshot] while their epoch is not past the
//! running epoch. The first record with a later epoch closes the window: the snapshot is
//! stamped with the new epoch and handed back to the caller to be written, and the
//! record itself is dropped without being decoded.
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::header::{Header, RawRecord};
use crate::prelude::*;
use crate::sensor;
use crate::snapshot::{Channel, Snapshot};
use crate::spectrometer::Frame;

/// A channel not updated for at least this many seconds is reported as stale when a
/// window closes.
pub const STALE_AFTER_SECS: i64 = 3000;

/// A channel found stale when a window closed.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    pub channel: Channel,
    /// Seconds since the channel was last updated
    pub lag: i64,
}

/// Result of processing a single record.
#[derive(Debug)]
pub enum Step {
    /// The header group has no channel for the record's sub-header.
    Skipped(Header),
    /// The record updated the channel value.
    Accumulated(Channel),
    /// The record failed to decode and the channel value was not changed.
    Rejected(Channel, Error),
    /// The record closed the window. The snapshot is ready to be written.
    Flushed { epoch: i64, stale: Vec<Staleness> },
}

#[derive(Debug, Clone)]
struct Window {
    running: i64,
    watermarks: [i64; Channel::COUNT],
}

impl Window {
    fn seeded(epoch: i64) -> Self {
        Window {
            running: epoch,
            watermarks: [epoch; Channel::COUNT],
        }
    }

    fn stale(&self, epoch: i64) -> Vec<Staleness> {
        Channel::ALL
            .iter()
            .filter_map(|channel| {
                let lag = epoch.saturating_sub(self.watermarks[channel.index()]);
                (lag >= STALE_AFTER_SECS).then_some(Staleness {
                    channel: *channel,
                    lag,
                })
            })
            .collect()
    }
}

/// Owns the current [Snapshot] and decides when it is flushed.
#[derive(Debug, Default)]
pub struct Synchronizer {
    window: Option<Window>,
    snapshot: Snapshot,
}

impl Synchronizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset epoch tracking for a new input stream. The next record seeds the running
    /// epoch and every channel watermark. Channel values are kept.
    pub fn begin_stream(&mut self) {
        self.window = None;
    }

    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// The running epoch, if a record has been seen since the stream began.
    #[must_use]
    pub fn running_epoch(&self) -> Option<i64> {
        self.window.as_ref().map(|w| w.running)
    }

    /// Process a single record.
    ///
    /// `frame` is the binary data that followed a spectrometer marker line. It is only
    /// used for [Header::Spectrometer] records.
    pub fn process(&mut self, rec: &RawRecord<'_>, frame: Option<&[u8]>) -> Step {
        let epoch = rec.epoch();
        let window = self.window.get_or_insert_with(|| Window::seeded(epoch));

        if epoch > window.running {
            let stale = window.stale(epoch);
            for s in &stale {
                warn!(epoch, "{} data not found for {} seconds", s.channel, s.lag);
            }
            window.running = epoch;
            self.snapshot.epoch = epoch;
            return Step::Flushed { epoch, stale };
        }

        let Some(channel) = rec.header.route(rec.payload) else {
            trace!(header = ?rec.header, payload = rec.payload, "no channel for record");
            return Step::Skipped(rec.header);
        };

        match decode_into(&mut self.snapshot, channel, rec.payload, frame) {
            Ok(()) => {
                window.watermarks[channel.index()] = epoch;
                Step::Accumulated(channel)
            }
            Err(err) => {
                debug!(%channel, epoch, "rejected record: {err}");
                Step::Rejected(channel, err)
            }
        }
    }
}

/// Decode `payload` into the part of `snapshot` owned by `channel`. Nothing is modified
/// on error.
fn decode_into(
    snapshot: &mut Snapshot,
    channel: Channel,
    payload: &str,
    frame: Option<&[u8]>,
) -> Result<()> {
    match channel {
        Channel::Temperature => snapshot.temperature = sensor::temperature(payload)?,
        Channel::Humidity => snapshot.humidity = sensor::humidity(payload)?,
        Channel::Pressure => snapshot.pressure = sensor::pressure(payload)?,
        Channel::RadarAltitude => snapshot.radar_altitude = sensor::radar_altitude(payload)?,
        Channel::LineNumber => snapshot.line_number = sensor::line_number(payload)?,
        Channel::GpsFix => snapshot.gps_fix.update(payload)?,
        Channel::GpsDate => snapshot.gps_date.update(payload)?,
        Channel::Spectrometer => {
            let dat = frame.unwrap_or_default();
            snapshot.spectrometer = Frame::decode(dat)?;
        }
    }
    Ok(())
}
