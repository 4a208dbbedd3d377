//! Aggregated results of a sweep.

use crate::probe::{ProbeFailure, ProbeOutcome, ProbeResponse};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Counts and partitioned results, built up one probe at a time.
#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    pub port: String,
    /// Framing used for every probe, e.g. `8N1`.
    pub framing: String,
    /// Candidates probed, whatever the outcome.
    pub tested: usize,
    /// Candidates that produced no bytes.
    pub silent: usize,
    /// Printable responses, longest first once finalized.
    pub ascii: Vec<ProbeResponse>,
    pub non_ascii: Vec<ProbeResponse>,
    pub errors: Vec<ProbeFailure>,
    /// Set when the sweep stopped before exhausting its candidates.
    pub interrupted: bool,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
}

impl SweepSummary {
    pub fn new(port: impl Into<String>, framing: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            framing: framing.into(),
            tested: 0,
            silent: 0,
            ascii: Vec::new(),
            non_ascii: Vec::new(),
            errors: Vec::new(),
            interrupted: false,
            started_at: Local::now(),
            finished_at: None,
        }
    }

    /// Route one outcome into its bucket.
    pub fn record(&mut self, outcome: ProbeOutcome) {
        self.tested += 1;
        match outcome {
            ProbeOutcome::NoResponse { .. } => self.silent += 1,
            ProbeOutcome::Response(r) if r.is_ascii() => self.ascii.push(r),
            ProbeOutcome::Response(r) => self.non_ascii.push(r),
            ProbeOutcome::Failed(f) => self.errors.push(f),
        }
    }

    /// Sort the ASCII bucket by response length, longest first, and stamp
    /// the finish time. Equal lengths keep probe order.
    pub fn finalize(&mut self) {
        self.ascii.sort_by(|a, b| b.len().cmp(&a.len()));
        self.finished_at = Some(Local::now());
    }

    /// Candidates that answered with any bytes.
    pub fn valid(&self) -> usize {
        self.ascii.len() + self.non_ascii.len()
    }

    /// Sum of every bucket plus silent candidates; equals `tested`.
    pub fn accounted(&self) -> usize {
        self.silent + self.valid() + self.errors.len()
    }

    /// Baud rates with non-ASCII replies, ascending.
    pub fn non_ascii_bauds(&self) -> Vec<u32> {
        let mut bauds: Vec<u32> = self.non_ascii.iter().map(|r| r.baud).collect();
        bauds.sort_unstable();
        bauds
    }
}
