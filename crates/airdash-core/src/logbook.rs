//! Durable CSV log of every completed tick.
//!
//! One file, appended forever:
//!
//! ```text
//! timestamp,temperature_C,humidity_pct,co2_ppm,pm1_0,pm2_5,pm4_0,pm10_0,ambient_humidity_pct,ambient_temperature_C,voc_index,nox_index
//! 2026-02-15 01:30:00,21.43,38.10,612.00,1.20,2.35,3.10,3.40,41.02,22.75,101.00,1.00
//! ```
//!
//! The header is written once when the file is created. Readings are
//! rounded to two decimals; a field with no reading is left empty.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::source::{SampleSet, fields};

/// Log columns, in file order.
pub const LOG_COLUMNS: [&str; 12] = [
    "timestamp",
    fields::TEMPERATURE_C,
    fields::HUMIDITY_PCT,
    fields::CO2_PPM,
    fields::PM1_0,
    fields::PM2_5,
    fields::PM4_0,
    fields::PM10_0,
    fields::AMBIENT_HUMIDITY_PCT,
    fields::AMBIENT_TEMPERATURE_C,
    fields::VOC_INDEX,
    fields::NOX_INDEX,
];

/// The header line, without a trailing newline.
pub fn header_line() -> String {
    LOG_COLUMNS.join(",")
}

// ---------------------------------------------------------------------------
// LogRecord
// ---------------------------------------------------------------------------

/// One row of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// `YYYY-MM-DD HH:MM:SS`, UTC.
    pub timestamp: String,
    /// Readings in [`fields::ALL`] order.
    pub values: [Option<f64>; 11],
}

impl LogRecord {
    pub fn from_samples(timestamp: String, samples: &SampleSet) -> Self {
        Self {
            timestamp,
            values: fields::ALL.map(|f| samples.get(f).filter(|v| v.is_finite())),
        }
    }

    /// The readings present in this row.
    pub fn to_samples(&self) -> SampleSet {
        fields::ALL
            .iter()
            .zip(self.values.iter())
            .filter_map(|(f, v)| v.map(|v| (*f, v)))
            .collect()
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        fields::ALL
            .iter()
            .position(|f| *f == field)
            .and_then(|i| self.values[i])
    }

    pub fn to_csv_row(&self) -> String {
        let mut row = self.timestamp.clone();
        for v in &self.values {
            row.push(',');
            if let Some(v) = v {
                row.push_str(&format!("{v:.2}"));
            }
        }
        row
    }

    pub fn parse_csv_row(line: &str) -> io::Result<Self> {
        let cells: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
        if cells.len() != LOG_COLUMNS.len() {
            return Err(invalid(format!(
                "expected {} columns, found {}",
                LOG_COLUMNS.len(),
                cells.len()
            )));
        }
        let mut values = [None; 11];
        for (i, cell) in cells[1..].iter().enumerate() {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let v: f64 = cell
                .parse()
                .map_err(|_| invalid(format!("bad {} value '{cell}'", fields::ALL[i])))?;
            values[i] = Some(v);
        }
        Ok(Self {
            timestamp: cells[0].trim().to_string(),
            values,
        })
    }
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

// ---------------------------------------------------------------------------
// LogWriter
// ---------------------------------------------------------------------------

/// Appends rows to the log, one flush per row.
pub struct LogWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    rows_written: u64,
}

impl LogWriter {
    /// Open `path` for appending, creating it (and its directory) with a
    /// header if it does not exist yet. An existing non-empty file must
    /// carry the same header.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let existing_len = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if existing_len > 0 {
            let mut first = String::new();
            BufReader::new(File::open(&path)?).read_line(&mut first)?;
            if first.trim_end() != header_line() {
                return Err(invalid(format!(
                    "{} has an unexpected header: {}",
                    path.display(),
                    first.trim_end()
                )));
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        if existing_len == 0 {
            writeln!(writer, "{}", header_line())?;
            writer.flush()?;
        }

        Ok(Self {
            path,
            writer,
            rows_written: 0,
        })
    }

    pub fn append(&mut self, record: &LogRecord) -> io::Result<()> {
        writeln!(self.writer, "{}", record.to_csv_row())?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    /// Stamp `samples` with `at` and append them.
    pub fn append_samples(&mut self, at: SystemTime, samples: &SampleSet) -> io::Result<LogRecord> {
        let record = LogRecord::from_samples(format_timestamp(at), samples);
        self.append(&record)?;
        Ok(record)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended by this writer (not counting rows already in the file).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

/// Read every row of a log file.
pub fn read_log(path: impl AsRef<Path>) -> io::Result<Vec<LogRecord>> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut lines = reader.lines();

    match lines.next() {
        Some(header) => {
            let header = header?;
            if header.trim_end() != header_line() {
                return Err(invalid(format!(
                    "{} has an unexpected header: {}",
                    path.display(),
                    header.trim_end()
                )));
            }
        }
        None => return Ok(Vec::new()),
    }

    let mut records = Vec::new();
    for (i, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = LogRecord::parse_csv_row(&line)
            .map_err(|e| invalid(format!("{} line {}: {e}", path.display(), i + 2)))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Statistics of one log column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub last: Option<f64>,
}

/// Overview of a whole log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSummary {
    pub rows: usize,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    pub columns: Vec<ColumnSummary>,
}

pub fn summarize(records: &[LogRecord]) -> LogSummary {
    let columns = fields::ALL
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let present: Vec<f64> = records.iter().filter_map(|r| r.values[i]).collect();
            let count = present.len();
            let mean = if count > 0 {
                Some(present.iter().sum::<f64>() / count as f64)
            } else {
                None
            };
            ColumnSummary {
                column: name.to_string(),
                count,
                min: present.iter().copied().reduce(f64::min),
                max: present.iter().copied().reduce(f64::max),
                mean,
                last: present.last().copied(),
            }
        })
        .collect();

    LogSummary {
        rows: records.len(),
        first_timestamp: records.first().map(|r| r.timestamp.clone()),
        last_timestamp: records.last().map(|r| r.timestamp.clone()),
        columns,
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Format a wall-clock time as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(at: SystemTime) -> String {
    format_since_epoch(at.duration_since(UNIX_EPOCH).unwrap_or_default())
}

fn format_since_epoch(since_epoch: Duration) -> String {
    let (year, month, day, hour, min, sec) = secs_to_utc(since_epoch.as_secs());
    format!("{year:04}-{month:02}-{day:02} {hour:02}:{min:02}:{sec:02}")
}

/// Convert seconds since Unix epoch to (year, month, day, hour, minute, second) UTC.
/// No leap seconds.
fn secs_to_utc(secs: u64) -> (u64, u64, u64, u64, u64, u64) {
    let sec = secs % 60;
    let min = (secs / 60) % 60;
    let hour = (secs / 3600) % 24;

    let mut days = secs / 86400;
    let mut year = 1970u64;
    loop {
        let days_in_year = if is_leap(year) { 366 } else { 365 };
        if days < days_in_year {
            break;
        }
        days -= days_in_year;
        year += 1;
    }

    let months_days: [u64; 12] = if is_leap(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1u64;
    for &md in &months_days {
        if days < md {
            break;
        }
        days -= md;
        month += 1;
    }

    (year, month, days + 1, hour, min, sec)
}

fn is_leap(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> SampleSet {
        [
            (fields::TEMPERATURE_C, 21.4321),
            (fields::HUMIDITY_PCT, 38.1),
            (fields::CO2_PPM, 612.0),
            (fields::PM2_5, 2.349),
            (fields::VOC_INDEX, 101.0),
        ]
        .into_iter()
        .collect()
    }

    // -----------------------------------------------------------------------
    // Rows
    // -----------------------------------------------------------------------

    #[test]
    fn test_header_line() {
        assert_eq!(
            header_line(),
            "timestamp,temperature_C,humidity_pct,co2_ppm,pm1_0,pm2_5,pm4_0,pm10_0,\
             ambient_humidity_pct,ambient_temperature_C,voc_index,nox_index"
        );
    }

    #[test]
    fn test_csv_row_rounds_and_leaves_gaps() {
        let r = LogRecord::from_samples("2026-01-01 00:00:00".into(), &sample_set());
        assert_eq!(
            r.to_csv_row(),
            "2026-01-01 00:00:00,21.43,38.10,612.00,,2.35,,,,,101.00,"
        );
    }

    #[test]
    fn test_non_finite_readings_are_dropped() {
        let s: SampleSet = [(fields::CO2_PPM, f64::NAN), (fields::PM1_0, f64::INFINITY)]
            .into_iter()
            .collect();
        let r = LogRecord::from_samples("t".into(), &s);
        assert_eq!(r.get(fields::CO2_PPM), None);
        assert_eq!(r.get(fields::PM1_0), None);
    }

    #[test]
    fn test_parse_row_rejects_wrong_width() {
        assert!(LogRecord::parse_csv_row("2026-01-01 00:00:00,1,2").is_err());
    }

    #[test]
    fn test_parse_row_rejects_garbage() {
        let err = LogRecord::parse_csv_row("t,abc,,,,,,,,,,").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_to_samples_skips_missing() {
        let r = LogRecord::from_samples("t".into(), &sample_set());
        let s = r.to_samples();
        assert_eq!(s.len(), 5);
        assert_eq!(s.get(fields::CO2_PPM), Some(612.0));
        assert_eq!(s.get(fields::NOX_INDEX), None);
    }

    // -----------------------------------------------------------------------
    // Writer / reader
    // -----------------------------------------------------------------------

    #[test]
    fn test_round_trip_to_two_decimals() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("air.csv");
        let original = sample_set();

        let mut w = LogWriter::open(&path).unwrap();
        w.append_samples(UNIX_EPOCH + Duration::from_secs(1_771_119_000), &original)
            .unwrap();
        drop(w);

        let records = read_log(&path).unwrap();
        assert_eq!(records.len(), 1);
        let back = records[0].to_samples();
        for (field, v) in original.iter() {
            let got = back.get(field).unwrap();
            assert!((got - v).abs() <= 0.005 + 1e-9, "{field}: {got} vs {v}");
        }
        assert_eq!(back.get(fields::PM1_0), None);
    }

    #[test]
    fn test_header_written_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("air.csv");

        let mut w = LogWriter::open(&path).unwrap();
        w.append_samples(SystemTime::now(), &sample_set()).unwrap();
        drop(w);
        let mut w = LogWriter::open(&path).unwrap();
        w.append_samples(SystemTime::now(), &sample_set()).unwrap();
        assert_eq!(w.rows_written(), 1);
        drop(w);

        let text = fs::read_to_string(&path).unwrap();
        let headers = text.lines().filter(|l| l.starts_with("timestamp,")).count();
        assert_eq!(headers, 1);
        assert_eq!(text.lines().count(), 3);
        assert_eq!(read_log(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_open_creates_parent_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("air.csv");
        let w = LogWriter::open(&path).unwrap();
        assert_eq!(w.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_open_rejects_foreign_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("other.csv");
        fs::write(&path, "a,b,c\n1,2,3\n").unwrap();
        let err = LogWriter::open(&path).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(read_log(&path).unwrap_err().kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.csv");
        fs::write(&path, "").unwrap();
        assert!(read_log(&path).unwrap().is_empty());
    }

    #[test]
    fn test_record_json_roundtrip() {
        let r = LogRecord::from_samples("2026-01-01 00:00:00".into(), &sample_set());
        let json = serde_json::to_string(&r).unwrap();
        let back: LogRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }

    // -----------------------------------------------------------------------
    // Summary
    // -----------------------------------------------------------------------

    #[test]
    fn test_summarize() {
        let mut a = SampleSet::new();
        a.insert(fields::CO2_PPM, 400.0);
        let mut b = SampleSet::new();
        b.insert(fields::CO2_PPM, 800.0);
        b.insert(fields::TEMPERATURE_C, 20.0);
        let records = vec![
            LogRecord::from_samples("2026-01-01 00:00:00".into(), &a),
            LogRecord::from_samples("2026-01-01 00:00:20".into(), &b),
        ];
        let s = summarize(&records);
        assert_eq!(s.rows, 2);
        assert_eq!(s.first_timestamp.as_deref(), Some("2026-01-01 00:00:00"));
        assert_eq!(s.last_timestamp.as_deref(), Some("2026-01-01 00:00:20"));
        let co2 = s.columns.iter().find(|c| c.column == fields::CO2_PPM).unwrap();
        assert_eq!(co2.count, 2);
        assert_eq!(co2.min, Some(400.0));
        assert_eq!(co2.max, Some(800.0));
        assert_eq!(co2.mean, Some(600.0));
        assert_eq!(co2.last, Some(800.0));
        let nox = s.columns.iter().find(|c| c.column == fields::NOX_INDEX).unwrap();
        assert_eq!(nox.count, 0);
        assert_eq!(nox.mean, None);
    }

    #[test]
    fn test_summarize_empty() {
        let s = summarize(&[]);
        assert_eq!(s.rows, 0);
        assert_eq!(s.columns.len(), 11);
        assert!(s.first_timestamp.is_none());
    }

    // -----------------------------------------------------------------------
    // Timestamps
    // -----------------------------------------------------------------------

    #[test]
    fn test_format_timestamp_epoch() {
        assert_eq!(format_timestamp(UNIX_EPOCH), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_format_timestamp_known_date() {
        // 2000-02-29 12:34:56 UTC
        let t = UNIX_EPOCH + Duration::from_secs(951_827_696);
        assert_eq!(format_timestamp(t), "2000-02-29 12:34:56");
    }

    #[test]
    fn test_secs_to_utc_year_end() {
        // 1999-12-31 23:59:59 UTC
        assert_eq!(secs_to_utc(946_684_799), (1999, 12, 31, 23, 59, 59));
    }

    #[test]
    fn test_is_leap() {
        assert!(is_leap(2000));
        assert!(is_leap(2024));
        assert!(!is_leap(1900));
        assert!(!is_leap(2023));
    }
}
