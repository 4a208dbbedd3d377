//! Configuration schema definitions.
//!
//! This module defines the structure of the configuration file using serde.
//! Every section has defaults, so an empty file is a valid configuration.

use super::error::{ConfigError, ConfigResult};
use crate::port::{DataBits, LineConfig, Parity, StopBits};
use crate::probe::{
    ProbeCommand, DEFAULT_COMMAND_DELAY, DEFAULT_MAX_READ_BYTES, MAX_READ_TIMEOUT,
};
use crate::sweep::{common_first, DEFAULT_BAUD_RATES};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Serial line configuration
    pub serial: SerialConfig,
    /// Probe behaviour
    pub probe: ProbeConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Check every value that the type system does not.
    pub fn validate(&self) -> ConfigResult<()> {
        self.line_config()?;
        self.probe_command()?;

        if self.serial.timeout() > MAX_READ_TIMEOUT {
            return Err(ConfigError::validation(
                "serial.timeout_ms",
                format!("must be at most {} ms", MAX_READ_TIMEOUT.as_millis()),
            ));
        }

        if self.probe.baud_rates.is_empty() {
            return Err(ConfigError::validation(
                "probe.baud_rates",
                "at least one baud rate is required",
            ));
        }
        if self.probe.baud_rates.contains(&0) {
            return Err(ConfigError::validation(
                "probe.baud_rates",
                "baud rates must be greater than zero",
            ));
        }
        if let Some(rate) = first_repeat(&self.probe.baud_rates) {
            return Err(ConfigError::validation(
                "probe.baud_rates",
                format!("{rate} is listed more than once"),
            ));
        }
        if self.probe.max_read_bytes == 0 {
            return Err(ConfigError::validation(
                "probe.max_read_bytes",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Line parameters from the `[serial]` section.
    pub fn line_config(&self) -> ConfigResult<LineConfig> {
        let data_bits: DataBits = self
            .serial
            .data_bits
            .to_string()
            .parse()
            .map_err(|e: String| ConfigError::validation("serial.data_bits", e))?;
        let parity: Parity = self
            .serial
            .parity
            .parse()
            .map_err(|e: String| ConfigError::validation("serial.parity", e))?;
        let stop_bits: StopBits = self
            .serial
            .stop_bits
            .parse()
            .map_err(|e: String| ConfigError::validation("serial.stop_bits", e))?;

        Ok(LineConfig {
            data_bits,
            parity,
            stop_bits,
            timeout: self.serial.timeout(),
            ..LineConfig::default()
        })
    }

    /// Probe commands from the `[probe]` section.
    pub fn probe_command(&self) -> ConfigResult<ProbeCommand> {
        let command = if self.probe.commands.is_empty() {
            ProbeCommand::default()
        } else {
            ProbeCommand::from_escaped(&self.probe.commands)
                .map_err(|e| ConfigError::validation("probe.commands", e))?
        };
        Ok(command.with_delay(self.probe.command_delay()))
    }

    /// Candidate rates in the order they should be tried.
    pub fn candidates(&self) -> Vec<u32> {
        if self.probe.common_first {
            common_first(&self.probe.baud_rates)
        } else {
            self.probe.baud_rates.clone()
        }
    }
}

fn first_repeat(rates: &[u32]) -> Option<u32> {
    rates
        .iter()
        .enumerate()
        .find(|(i, rate)| rates[..*i].contains(rate))
        .map(|(_, &rate)| rate)
}

/// Serial line section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device to probe when none is given on the command line
    pub default_port: Option<String>,
    /// Data bits: 5, 6, 7 or 8
    pub data_bits: u8,
    /// Parity: "none", "even", "odd", "mark" or "space"
    pub parity: String,
    /// Stop bits: "1", "1.5" or "2"
    pub stop_bits: String,
    /// Per-probe read timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            default_port: None,
            data_bits: 8,
            parity: "none".to_string(),
            stop_bits: "1".to_string(),
            timeout_ms: 1000,
        }
    }
}

impl SerialConfig {
    /// Get the read timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Probe section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Commands with C-style escapes; empty means the built-in wake + greeting
    pub commands: Vec<String>,
    /// Pause after each command in milliseconds
    pub command_delay_ms: u64,
    /// Most bytes kept per probe
    pub max_read_bytes: usize,
    /// Candidate baud rates in scan order
    pub baud_rates: Vec<u32>,
    /// Try common rates before exotic ones
    pub common_first: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            command_delay_ms: DEFAULT_COMMAND_DELAY.as_millis() as u64,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
            baud_rates: DEFAULT_BAUD_RATES.to_vec(),
            common_first: false,
        }
    }
}

impl ProbeConfig {
    /// Get the inter-command delay as Duration
    pub fn command_delay(&self) -> Duration {
        Duration::from_millis(self.command_delay_ms)
    }
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset, e.g. "warn" or "baudsweep=debug"
    pub level: String,
    /// Diagnostic log layout
    pub format: TracingFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: TracingFormat::Compact,
        }
    }
}

/// Layout of diagnostic log lines on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TracingFormat {
    /// Multi-line with colors
    Pretty,
    /// One line per event
    #[default]
    Compact,
}
