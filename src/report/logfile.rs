//! Result log written with `--output`.
//!
//! Text format, one block per response or failure:
//!
//! ```text
//! baudsweep results - 2026-01-01 12:00:00 - port /dev/ttyUSB0 (45 candidates)
//!
//! [2026-01-01 12:00:04.518] baud 19200
//!   result: ASCII
//!   hex:    4F 4B 0D 0A
//!   text:   OK\r\n
//! ```
//!
//! JSON format writes one object per line: a `start` record, one record per
//! outcome, and a closing `summary` record.

use crate::probe::{display_text, hex_dump, ProbeOutcome};
use crate::sweep::{Reporter, SweepSummary};
use chrono::Local;
use clap::ValueEnum;
use serde_json::json;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Characters of decoded text kept per block.
pub const LOG_TEXT_LIMIT: usize = 100;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Log file layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable blocks
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Appends every probe result to a log.
///
/// Write errors are reported once and then the log goes quiet; they never
/// stop the sweep.
pub struct LogFileReporter<W: Write + Send = BufWriter<File>> {
    writer: Option<W>,
    format: LogFormat,
}

impl LogFileReporter<BufWriter<File>> {
    /// Create (or truncate) the log at `path`.
    pub fn create(path: &Path, format: LogFormat) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), format))
    }
}

impl<W: Write + Send> LogFileReporter<W> {
    pub fn new(writer: W, format: LogFormat) -> Self {
        Self {
            writer: Some(writer),
            format,
        }
    }

    /// The underlying writer, unless a write error disabled it.
    pub fn into_inner(self) -> Option<W> {
        self.writer
    }

    fn write_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut W, LogFormat) -> io::Result<()>,
    {
        let format = self.format;
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = f(writer, format) {
                warn!(error = %e, "result log write failed; further results will not be logged");
                self.writer = None;
            }
        }
    }
}

fn write_header<W: Write>(
    out: &mut W,
    format: LogFormat,
    port: &str,
    total: usize,
) -> io::Result<()> {
    let now = Local::now();
    match format {
        LogFormat::Text => {
            writeln!(
                out,
                "baudsweep results - {} - port {} ({} candidates)",
                now.format("%Y-%m-%d %H:%M:%S"),
                port,
                total
            )?;
            writeln!(out)
        }
        LogFormat::Json => {
            let record = json!({
                "event": "start",
                "port": port,
                "candidates": total,
                "started_at": now,
            });
            writeln!(out, "{}", record)
        }
    }
}

fn write_outcome<W: Write>(
    out: &mut W,
    format: LogFormat,
    outcome: &ProbeOutcome,
) -> io::Result<()> {
    match (format, outcome) {
        (_, ProbeOutcome::NoResponse { .. }) => Ok(()),
        (LogFormat::Json, outcome) => {
            let record = serde_json::to_string(outcome).map_err(io::Error::other)?;
            writeln!(out, "{}", record)
        }
        (LogFormat::Text, ProbeOutcome::Response(r)) => {
            writeln!(out, "[{}] baud {}", r.timestamp.format(TIMESTAMP_FORMAT), r.baud)?;
            writeln!(out, "  result: {}", r.classification)?;
            writeln!(out, "  hex:    {}", hex_dump(&r.raw))?;
            writeln!(out, "  text:   {}", log_text(&r.raw))?;
            writeln!(out)
        }
        (LogFormat::Text, ProbeOutcome::Failed(f)) => {
            writeln!(out, "[{}] baud {}", f.timestamp.format(TIMESTAMP_FORMAT), f.baud)?;
            writeln!(out, "  result: ERROR: {}", f.message)?;
            writeln!(out)
        }
    }
}

/// Escaped text cut to `LOG_TEXT_LIMIT` characters after escaping.
fn log_text(raw: &[u8]) -> String {
    display_text(raw, raw.len())
        .chars()
        .take(LOG_TEXT_LIMIT)
        .collect()
}

fn write_footer<W: Write>(
    out: &mut W,
    format: LogFormat,
    summary: &SweepSummary,
) -> io::Result<()> {
    match format {
        LogFormat::Text => {
            writeln!(
                out,
                "tested {}, ascii {}, non-ascii {}, errors {}, silent {}{}",
                summary.tested,
                summary.ascii.len(),
                summary.non_ascii.len(),
                summary.errors.len(),
                summary.silent,
                if summary.interrupted { " (interrupted)" } else { "" }
            )?;
        }
        LogFormat::Json => {
            let record = json!({
                "event": "summary",
                "tested": summary.tested,
                "silent": summary.silent,
                "ascii_bauds": summary.ascii.iter().map(|r| r.baud).collect::<Vec<_>>(),
                "non_ascii_bauds": summary.non_ascii_bauds(),
                "error_bauds": summary.errors.iter().map(|f| f.baud).collect::<Vec<_>>(),
                "interrupted": summary.interrupted,
                "finished_at": summary.finished_at,
            });
            writeln!(out, "{}", record)?;
        }
    }
    out.flush()
}

impl<W: Write + Send> Reporter for LogFileReporter<W> {
    fn on_start(&mut self, port: &str, total: usize) {
        self.write_with(|out, format| write_header(out, format, port, total));
    }

    fn on_probe(&mut self, _index: usize, _total: usize, outcome: &ProbeOutcome) {
        self.write_with(|out, format| write_outcome(out, format, outcome));
    }

    fn on_finish(&mut self, summary: &SweepSummary) {
        self.write_with(|out, format| write_footer(out, format, summary));
    }
}
