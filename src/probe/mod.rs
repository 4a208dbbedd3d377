//! Probing a single baud rate and judging what came back.
//!
//! - `classify`: printable-ASCII test and display decoding
//! - `command`: the byte strings sent during a probe
//! - `executor`: the configure, flush, send, read cycle
//! - `outcome`: tagged per-rate results

pub mod classify;
pub mod command;
pub mod executor;
pub mod outcome;

pub use classify::{classify, decode_latin1, display_text, hex_dump, Classification};
pub use command::{unescape, ProbeCommand, DEFAULT_COMMAND_DELAY};
pub use executor::{probe, ProbeSettings, DEFAULT_MAX_READ_BYTES, MAX_READ_TIMEOUT};
pub use outcome::{ProbeFailure, ProbeOutcome, ProbeResponse};
