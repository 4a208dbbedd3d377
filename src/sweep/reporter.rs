//! Progress callbacks the sweep invokes.

use super::summary::SweepSummary;
use crate::probe::ProbeOutcome;

/// Receives sweep progress.
///
/// `on_probe` is called after every candidate, including silent ones, with a
/// 1-based `index`.
pub trait Reporter: Send {
    fn on_start(&mut self, _port: &str, _total: usize) {}

    fn on_probe(&mut self, index: usize, total: usize, outcome: &ProbeOutcome);

    fn on_finish(&mut self, _summary: &SweepSummary) {}
}

/// Forwards every callback to each inner reporter in order.
#[derive(Default)]
pub struct Fanout {
    reporters: Vec<Box<dyn Reporter>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for Fanout {
    fn on_start(&mut self, port: &str, total: usize) {
        for r in &mut self.reporters {
            r.on_start(port, total);
        }
    }

    fn on_probe(&mut self, index: usize, total: usize, outcome: &ProbeOutcome) {
        for r in &mut self.reporters {
            r.on_probe(index, total, outcome);
        }
    }

    fn on_finish(&mut self, summary: &SweepSummary) {
        for r in &mut self.reporters {
            r.on_finish(summary);
        }
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn on_probe(&mut self, _index: usize, _total: usize, _outcome: &ProbeOutcome) {}
}
