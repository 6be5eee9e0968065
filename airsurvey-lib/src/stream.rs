//! Drives a [Synchronizer] over survey log streams.
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::header::{split_record, Header};
use crate::prelude::*;
use crate::reader::{RecordReader, MAX_LINE_LEN};
use crate::sink::Sink;
use crate::snapshot::Channel;
use crate::spectrometer::Frame;
use crate::summary::Summary;
use crate::sync::{Step, Synchronizer};

/// Process a single survey log stream, appending every flushed snapshot to `sink`.
///
/// Epoch tracking restarts at the start of the stream while channel values carry over
/// from anything `sync` has already processed. The [Frame::LEN] bytes following a
/// spectrometer line are always consumed, so a skipped or rejected frame does not
/// misalign the lines after it. Lines longer than [MAX_LINE_LEN] bytes are skipped.
///
/// # Errors
/// [Error::Io] if reading fails, or any error from the sink. Bad lines and records are
/// not errors; they are counted in the returned [Summary].
pub fn process_reader<R, S>(reader: R, sync: &mut Synchronizer, sink: &mut S) -> Result<Summary>
where
    R: BufRead,
    S: Sink + ?Sized,
{
    let mut reader = RecordReader::new(reader);
    let mut summary = Summary::default();
    let mut line = Vec::new();
    let mut frame = vec![0u8; Frame::LEN];

    sync.begin_stream();
    loop {
        let offset = reader.offset();
        let Some(len) = reader.read_line(&mut line)? else {
            break;
        };
        summary.lines += 1;
        let text = String::from_utf8_lossy(&line);
        let split = split_record(&text);

        let header = match &split {
            Ok(rec) => Some(rec.header),
            Err(skip) => skip.header(),
        };
        let frame_dat = if header == Some(Header::Spectrometer) {
            let n = reader.fill(&mut frame)?;
            summary.frames += 1;
            if n < Frame::LEN {
                debug!(offset, bytes = n, "stream ended inside spectrometer frame");
            }
            Some(&frame[..n])
        } else {
            None
        };

        if len > line.len() {
            debug!(offset, len, "skipping line longer than {MAX_LINE_LEN} bytes");
            summary.skipped += 1;
            continue;
        }
        let rec = match split {
            Ok(rec) => rec,
            Err(skip) => {
                debug!(offset, ?skip, "skipping line");
                summary.skipped += 1;
                continue;
            }
        };

        let step = sync.process(&rec, frame_dat);
        match &step {
            Step::Flushed { epoch, .. } => {
                debug!(offset, epoch, "flushing snapshot");
                sink.append(sync.snapshot())?;
            }
            Step::Rejected(Channel::Spectrometer, err) => {
                warn!(offset, epoch = rec.epoch(), "spectrometer frame rejected: {err}");
            }
            _ => {}
        }
        summary.add(&step);
    }

    Ok(summary)
}

/// Open and process the survey log at `path`. See [process_reader].
///
/// # Errors
/// [Error::Io] if the file cannot be opened or read, or any error from the sink.
pub fn process_file<S>(path: &Path, sync: &mut Synchronizer, sink: &mut S) -> Result<Summary>
where
    S: Sink + ?Sized,
{
    info!("processing {path:?}");
    let file = File::open(path)?;
    let summary = process_reader(BufReader::new(file), sync, sink)?;
    info!(
        lines = summary.lines,
        records = summary.records,
        flushes = summary.flushes,
        "finished {path:?}"
    );
    Ok(summary)
}
