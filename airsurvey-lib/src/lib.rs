#![doc = include_str!("../README.md")]

mod error;

pub mod fields;
pub mod header;
pub mod nmea;
pub mod reader;
pub mod sensor;
pub mod sink;
pub mod snapshot;
pub mod spectrometer;
pub mod stream;
pub mod summary;
pub mod sync;

pub use error::{Error, Result};
pub use header::{Header, RawRecord, Skip};
pub use sink::{CsvWriter, Discard, JsonLinesWriter, Sink};
pub use snapshot::{Channel, Snapshot};
pub use spectrometer::Frame;
pub use stream::{process_file, process_reader};
pub use summary::Summary;
pub use sync::{Staleness, Step, Synchronizer};

pub(crate) mod prelude {
    pub use crate::error::{Error, Result};
}
