//! Results of a single probe.

use super::classify::{classify, response_text, Classification};
use chrono::{DateTime, Local};
use serde::Serialize;

/// Bytes received at one baud rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResponse {
    pub baud: u32,
    pub raw: Vec<u8>,
    pub classification: Classification,
    /// ASCII text, or the Latin-1 decoding for binary responses.
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ProbeResponse {
    /// Classify `raw` and stamp it with the current time.
    pub fn new(baud: u32, raw: Vec<u8>) -> Self {
        let classification = classify(&raw);
        let text = response_text(&raw, classification);
        Self {
            baud,
            raw,
            classification,
            text,
            timestamp: Local::now(),
        }
    }

    pub fn is_ascii(&self) -> bool {
        self.classification == Classification::Ascii
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// A probe that could not be completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeFailure {
    pub baud: u32,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl ProbeFailure {
    pub fn new(baud: u32, message: impl Into<String>) -> Self {
        Self {
            baud,
            message: message.into(),
            timestamp: Local::now(),
        }
    }
}

/// Tagged result of probing one baud rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The read window closed with nothing received.
    NoResponse { baud: u32 },
    Response(ProbeResponse),
    Failed(ProbeFailure),
}

impl ProbeOutcome {
    pub fn baud(&self) -> u32 {
        match self {
            ProbeOutcome::NoResponse { baud } => *baud,
            ProbeOutcome::Response(r) => r.baud,
            ProbeOutcome::Failed(f) => f.baud,
        }
    }
}
