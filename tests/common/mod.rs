//! Shared test utilities for baudsweep integration tests.
//!
//! - Fast sweep plans (no inter-command delay, short read window)
//! - A reporter that records every callback
//! - Helpers to run a sweep against a `MockDevice`

#![allow(dead_code)]

use baudsweep::port::MockDevice;
use baudsweep::probe::{ProbeCommand, ProbeOutcome, ProbeSettings};
use baudsweep::sweep::{CancelFlag, Reporter, SweepPlan, SweepSummary, Sweeper};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Plan over `candidates` with the default commands, no delay and a 10ms window.
pub fn fast_plan(candidates: &[u32]) -> SweepPlan {
    let mut settings = ProbeSettings::default();
    settings.commands.delay = Duration::ZERO;
    settings.line.timeout = Duration::from_millis(10);
    SweepPlan {
        candidates: candidates.to_vec(),
        settings,
    }
}

/// Same as `fast_plan` but sending `commands` instead of the defaults.
pub fn fast_plan_with_commands(candidates: &[u32], commands: &[&str]) -> SweepPlan {
    let mut plan = fast_plan(candidates);
    plan.settings.commands = ProbeCommand::from_escaped(commands)
        .expect("valid escapes")
        .with_delay(Duration::ZERO);
    plan
}

/// Everything a reporter was told, in order.
#[derive(Debug, Default)]
pub struct Recorded {
    pub started: Option<(String, usize)>,
    pub probes: Vec<(usize, usize, ProbeOutcome)>,
    pub finished: Option<SweepSummary>,
}

/// Reporter that records callbacks into shared storage.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    pub recorded: Arc<Mutex<Recorded>>,
    /// Cancel this flag once `on_probe` has seen this many candidates.
    pub cancel_after: Option<(usize, CancelFlag)>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(count: usize, flag: CancelFlag) -> Self {
        Self {
            recorded: Arc::default(),
            cancel_after: Some((count, flag)),
        }
    }

    pub fn probed_bauds(&self) -> Vec<u32> {
        self.recorded
            .lock()
            .unwrap()
            .probes
            .iter()
            .map(|(_, _, o)| o.baud())
            .collect()
    }
}

impl Reporter for RecordingReporter {
    fn on_start(&mut self, port: &str, total: usize) {
        self.recorded.lock().unwrap().started = Some((port.to_string(), total));
    }

    fn on_probe(&mut self, index: usize, total: usize, outcome: &ProbeOutcome) {
        self.recorded
            .lock()
            .unwrap()
            .probes
            .push((index, total, outcome.clone()));
        if let Some((count, flag)) = &self.cancel_after {
            if index >= *count {
                flag.cancel();
            }
        }
    }

    fn on_finish(&mut self, summary: &SweepSummary) {
        self.recorded.lock().unwrap().finished = Some(summary.clone());
    }
}

/// Sweep `device` with `plan`, discarding callbacks.
pub fn sweep(device: &MockDevice, plan: SweepPlan) -> SweepSummary {
    let mut reporter = RecordingReporter::new();
    Sweeper::new(plan).run(device.connect(), &mut reporter, &CancelFlag::new())
}
