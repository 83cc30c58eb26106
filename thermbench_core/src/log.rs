//! Reading log and export sink.
//!
//! The log is an append-only, arrival-ordered sequence of readings.
//! The exporter rewrites the whole flat table (columns Timestamp,
//! Setpoint, Temperature, Duty_Cycle, Mode) every Nth accepted
//! reading and once more at session end. Export failures are logged
//! and ignored: the console's job is monitoring and safety, and a
//! spreadsheet held open elsewhere must not stop the interlock
//! pipeline.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use thermbench_common::reading::Reading;

/// Append-only ordered sequence of readings.
///
/// Strictly ordered by `elapsed_seconds` (non-decreasing); cleared
/// only on explicit session reset.
#[derive(Debug, Default)]
pub struct ReadingLog {
    readings: Vec<Reading>,
}

impl ReadingLog {
    /// Create an empty log.
    pub const fn new() -> Self {
        Self {
            readings: Vec::new(),
        }
    }

    /// Append one reading in arrival order.
    pub fn append(&mut self, reading: Reading) {
        debug_assert!(
            self.readings
                .last()
                .is_none_or(|last| reading.elapsed_seconds >= last.elapsed_seconds),
            "reading log must be non-decreasing in elapsed_seconds"
        );
        self.readings.push(reading);
    }

    /// All readings, oldest first.
    #[inline]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Number of accepted readings.
    #[inline]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// True when no readings have been accepted.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Latest reading, if any.
    #[inline]
    pub fn latest(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Clear the log (session reset).
    pub fn clear(&mut self) {
        self.readings.clear();
    }
}

/// Periodic CSV export sink.
#[derive(Debug)]
pub struct CsvExporter {
    path: PathBuf,
    /// Accepted readings between flushes.
    every: usize,
}

impl CsvExporter {
    /// Create an exporter writing to `path` every `every` readings.
    pub fn new(path: impl Into<PathBuf>, every: usize) -> Self {
        Self {
            path: path.into(),
            every: every.max(1),
        }
    }

    /// Sink path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush if the log has just reached a multiple of the cadence.
    ///
    /// Called after every append; a no-op between flush points.
    pub fn maybe_flush(&self, log: &ReadingLog) {
        if !log.is_empty() && log.len() % self.every == 0 {
            self.flush(log);
        }
    }

    /// Write the full table to the sink. Best-effort: failures are
    /// logged and swallowed.
    pub fn flush(&self, log: &ReadingLog) {
        match self.write_table(log) {
            Ok(()) => debug!(
                rows = log.len(),
                path = %self.path.display(),
                "exported reading log"
            ),
            Err(e) => warn!(
                path = %self.path.display(),
                "export failed, continuing: {e}"
            ),
        }
    }

    fn write_table(&self, log: &ReadingLog) -> std::io::Result<()> {
        let mut out = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)?;

        writeln!(out, "Timestamp,Setpoint,Temperature,Duty_Cycle,Mode")?;
        for r in log.readings() {
            writeln!(
                out,
                "{},{},{},{},{}",
                r.elapsed_seconds, r.setpoint, r.temperature, r.duty_cycle, r.mode as u8
            )?;
        }
        out.flush()
    }
}
