//! Replays a recorded log file, one row per poll.

use std::io;
use std::path::Path;

use crate::logbook::{LogRecord, read_log};
use crate::source::{SampleSet, SampleSource};

/// Plays back log rows in order. Once the rows run out every poll reports
/// "not ready", so the dashboard keeps showing the final history.
pub struct ReplaySource {
    records: Vec<LogRecord>,
    next: usize,
}

impl ReplaySource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::from_records(read_log(path)?))
    }

    pub fn from_records(records: Vec<LogRecord>) -> Self {
        Self { records, next: 0 }
    }

    /// Rows not yet played.
    pub fn remaining(&self) -> usize {
        self.records.len() - self.next
    }
}

impl SampleSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn poll(&mut self) -> io::Result<Option<SampleSet>> {
        let Some(record) = self.records.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        Ok(Some(record.to_samples()))
    }
}
