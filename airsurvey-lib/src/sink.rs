//! Snapshot output.
use std::io::Write;

use crate::prelude::*;
use crate::snapshot::Snapshot;
use crate::spectrometer::NUM_CRYSTALS;

/// Destination for flushed snapshots.
///
/// Implementations write any preamble when they are created.
pub trait Sink {
    /// Write a single snapshot.
    ///
    /// # Errors
    /// On any write or encoding failure.
    fn append(&mut self, snapshot: &Snapshot) -> Result<()>;

    /// Flush all buffered output and close the sink.
    ///
    /// # Errors
    /// If flushing fails.
    fn finish(self) -> Result<()>
    where
        Self: Sized;
}

const CSV_LEADING_COLUMNS: &str = "REC_TIME,GPS_DATE,GPS_TIME,GPS_LAT,GPS_LON,GPS_ALT,GPS_FIX,\
    GPS_SATS,GPS_HDOP,RAD_ALT,LINE_NUM,BAR,TRM,HUM,MAG,MAG_AMP,RSX_TIME,";
const CSV_TRAILING_COLUMNS: &str =
    "ACQ_TIME_D,ACQ_TIME_U,LIVE_TIME_D,LIVE_TIME_U,GAMMA_TOTAL_D,GAMMA_TOTAL_U,";

/// Writes one fixed schema CSV row per snapshot.
///
/// Every column is terminated by a comma, including the last. Spectra are not written;
/// the magnetometer columns are always empty.
pub struct CsvWriter<W: Write> {
    writer: W,
}

impl<W: Write> CsvWriter<W> {
    /// Create a writer and write the header row.
    ///
    /// # Errors
    /// If writing the header fails.
    pub fn new(mut writer: W) -> Result<Self> {
        writer.write_all(CSV_LEADING_COLUMNS.as_bytes())?;
        for idx in 1..=NUM_CRYSTALS {
            write!(writer, "CR{idx:02},")?;
        }
        for idx in 1..=NUM_CRYSTALS {
            write!(writer, "CR_ERR{idx:02},")?;
        }
        writer.write_all(CSV_TRAILING_COLUMNS.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(CsvWriter { writer })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for CsvWriter<W> {
    fn append(&mut self, snap: &Snapshot) -> Result<()> {
        let w = &mut self.writer;
        let (fix, date, rsx) = (&snap.gps_fix, &snap.gps_date, &snap.spectrometer);

        write!(w, "{:.6},", snap.epoch as f64)?;
        write!(w, "{:04}/{:02}/{:02},", date.year, date.month, date.day)?;
        write!(w, "{:02}:{:02}:{:04.2},", fix.hours, fix.minutes, fix.seconds)?;
        write!(w, "{:7.4},{:7.4},", fix.latitude, fix.longitude)?;
        write!(w, "{:.2},", fix.altitude)?;
        write!(w, "{},{},", fix.fix.as_u8(), fix.satellites)?;
        write!(w, "{:.1},", fix.hdop)?;
        write!(w, "{:.1},", snap.radar_altitude)?;
        write!(w, "{},", snap.line_number)?;
        write!(w, "{:.2},{:.2},{:.2},", snap.pressure, snap.temperature, snap.humidity)?;
        // magnetometer and amplitude
        w.write_all(b",,")?;
        write!(w, "{},", rsx.timestamp)?;
        for status in &rsx.crystals {
            write!(w, "{},", status.label.as_char())?;
        }
        for status in &rsx.crystals {
            write!(w, "{},", u8::from(status.error))?;
        }
        write!(
            w,
            "{},{},{},{},{},{},",
            rsx.down.acquisition_time,
            rsx.up.acquisition_time,
            rsx.down.live_time,
            rsx.up.live_time,
            rsx.down.total_gamma_count,
            rsx.up.total_gamma_count
        )?;
        w.write_all(b"\n")?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes each snapshot, including spectra, as a single line JSON object.
pub struct JsonLinesWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesWriter { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Sink for JsonLinesWriter<W> {
    fn append(&mut self, snapshot: &Snapshot) -> Result<()> {
        serde_json::to_writer(&mut self.writer, snapshot)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Drops every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl Sink for Discard {
    fn append(&mut self, _: &Snapshot) -> Result<()> {
        Ok(())
    }

    fn finish(self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nmea::FixQuality;
    use crate::spectrometer::CrystalLabel;

    fn csv_lines(snapshots: &[Snapshot]) -> Vec<String> {
        let mut sink = CsvWriter::new(Vec::new()).unwrap();
        for snap in snapshots {
            sink.append(snap).unwrap();
        }
        let dat = sink.into_inner();
        String::from_utf8(dat)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn csv_header() {
        let lines = csv_lines(&[]);
        assert_eq!(lines.len(), 1);
        let columns: Vec<&str> = lines[0].split(',').collect();
        // 17 leading, 30 crystal, 6 trailing, plus the empty after the last comma
        assert_eq!(columns.len(), 17 + 30 + 6 + 1);
        assert_eq!(columns[0], "REC_TIME");
        assert_eq!(columns[17], "CR01");
        assert_eq!(columns[31], "CR15");
        assert_eq!(columns[32], "CR_ERR01");
        assert_eq!(columns[46], "CR_ERR15");
        assert_eq!(columns[52], "GAMMA_TOTAL_U");
        assert_eq!(columns[53], "");
    }

    #[test]
    fn csv_default_row() {
        let lines = csv_lines(&[Snapshot::default()]);
        assert_eq!(
            lines[1],
            "0.000000,0000/00/00,00:00:0.00, 0.0000, 0.0000,0.00,0,0,0.0,0.0,0,0.00,0.00,0.00,,,0,\
             N,N,N,N,N,N,N,N,N,N,N,N,N,N,N,\
             1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,\
             0,0,0,0,0,0,"
        );
    }

    #[test]
    fn csv_row() {
        let mut snap = Snapshot {
            epoch: 1_700_000_000,
            radar_altitude: 152.3,
            line_number: 1020,
            temperature: 21.456,
            humidity: 55.0,
            pressure: 1013.2,
            ..Default::default()
        };
        snap.gps_date.year = 2021;
        snap.gps_date.month = 6;
        snap.gps_date.day = 3;
        snap.gps_fix.hours = 13;
        snap.gps_fix.minutes = 42;
        snap.gps_fix.seconds = 5.3;
        snap.gps_fix.latitude = 23.840145;
        snap.gps_fix.longitude = 73.749382;
        snap.gps_fix.altitude = 312.48;
        snap.gps_fix.fix = FixQuality::Gps;
        snap.gps_fix.satellites = 5;
        snap.gps_fix.hdop = 4.1;
        let rsx = &mut snap.spectrometer;
        rsx.timestamp = 99;
        rsx.crystals[0].label = CrystalLabel::DownActive;
        rsx.crystals[0].error = false;
        rsx.crystals[1].label = CrystalLabel::UpActive;
        rsx.crystals[1].error = false;
        rsx.crystals[2].label = CrystalLabel::Error;
        rsx.down.acquisition_time = 1000;
        rsx.up.acquisition_time = 1001;
        rsx.down.live_time = 990;
        rsx.up.live_time = 991;
        rsx.down.total_gamma_count = 12;
        rsx.up.total_gamma_count = 13;

        let lines = csv_lines(&[snap]);
        let columns: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(columns.len(), 54);
        assert_eq!(
            columns[..17],
            [
                "1700000000.000000",
                "2021/06/03",
                "13:42:5.30",
                "23.8401",
                "73.7494",
                "312.48",
                "1",
                "5",
                "4.1",
                "152.3",
                "1020",
                "1013.20",
                "21.46",
                "55.00",
                "",
                "",
                "99",
            ]
        );
        assert_eq!(columns[17..20], ["D", "U", "E"]);
        assert_eq!(columns[32..35], ["0", "0", "1"]);
        assert_eq!(columns[47..53], ["1000", "1001", "990", "991", "12", "13"]);
    }

    #[test]
    fn json_lines() {
        let mut sink = JsonLinesWriter::new(Vec::new());
        let snap = Snapshot {
            epoch: 7,
            temperature: 20.5,
            ..Default::default()
        };
        sink.append(&snap).unwrap();
        sink.append(&snap).unwrap();
        let dat = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = dat.lines().collect();
        assert_eq!(lines.len(), 2);

        let decoded: Snapshot = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(decoded, snap);
    }
}
