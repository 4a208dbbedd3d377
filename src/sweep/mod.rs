//! The sweep: probe every candidate baud rate in order and collect results.
//!
//! A sweep owns its port for its whole duration. The port is opened once
//! before the first probe and dropped exactly once after the last one, on
//! every path out of [`Sweeper::run`]: completion, cancellation, or a panic
//! unwinding through it.

pub mod candidates;
pub mod reporter;
pub mod summary;

pub use candidates::{
    common_first, default_candidates, parse_baud_list, COMMON_BAUD_RATES, DEFAULT_BAUD_RATES,
};
pub use reporter::{Fanout, NullReporter, Reporter};
pub use summary::SweepSummary;

use crate::port::{LineConfig, PortError, SerialPortAdapter, SyncSerialPort};
use crate::probe::{probe, ProbeSettings};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Shared stop request, checked between candidates.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What to probe and how.
#[derive(Debug, Clone)]
pub struct SweepPlan {
    /// Rates in the order they are tried.
    pub candidates: Vec<u32>,
    pub settings: ProbeSettings,
}

impl Default for SweepPlan {
    fn default() -> Self {
        Self {
            candidates: default_candidates(),
            settings: ProbeSettings::default(),
        }
    }
}

/// Runs a [`SweepPlan`] against a port.
#[derive(Debug, Clone)]
pub struct Sweeper {
    plan: SweepPlan,
}

impl Sweeper {
    pub fn new(plan: SweepPlan) -> Self {
        Self { plan }
    }

    /// Open `port_path` and sweep it.
    ///
    /// Failing to open is the only error; everything after that is recorded
    /// in the summary.
    pub fn open_and_run(
        &self,
        port_path: &str,
        reporter: &mut dyn Reporter,
        cancel: &CancelFlag,
    ) -> Result<SweepSummary, PortError> {
        self.open_with(|line| SyncSerialPort::open(port_path, line), reporter, cancel)
    }

    /// Open a port with `open` and sweep it.
    ///
    /// The port is opened at the plan's own line rate, not at a candidate, so
    /// a driver that refuses the first candidate only fails that candidate.
    pub fn open_with<P, F>(
        &self,
        open: F,
        reporter: &mut dyn Reporter,
        cancel: &CancelFlag,
    ) -> Result<SweepSummary, PortError>
    where
        P: SerialPortAdapter,
        F: FnOnce(&LineConfig) -> Result<P, PortError>,
    {
        let port = open(&self.plan.settings.line)?;
        Ok(self.run(port, reporter, cancel))
    }

    /// Probe every candidate on `port`, which is released before returning.
    pub fn run<P>(&self, port: P, reporter: &mut dyn Reporter, cancel: &CancelFlag) -> SweepSummary
    where
        P: SerialPortAdapter,
    {
        let mut port = port;
        let total = self.plan.candidates.len();
        let mut summary = SweepSummary::new(port.name(), self.plan.settings.line.framing());

        info!(
            port = port.name(),
            candidates = total,
            framing = %summary.framing,
            "starting baud rate sweep"
        );
        reporter.on_start(port.name(), total);

        for (i, &baud) in self.plan.candidates.iter().enumerate() {
            if cancel.is_cancelled() {
                warn!(remaining = total - i, "sweep interrupted");
                summary.interrupted = true;
                break;
            }

            debug!(baud, index = i + 1, total, "probing");
            let outcome = probe(&mut port, baud, &self.plan.settings);
            reporter.on_probe(i + 1, total, &outcome);
            summary.record(outcome);
        }

        drop(port);
        summary.finalize();

        info!(
            tested = summary.tested,
            ascii = summary.ascii.len(),
            non_ascii = summary.non_ascii.len(),
            errors = summary.errors.len(),
            "sweep finished"
        );
        reporter.on_finish(&summary);
        summary
    }
}
