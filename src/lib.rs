//! Baud rate discovery for serial devices.
//!
//! A sweep opens one serial port, then for each candidate baud rate sends a
//! short probe and classifies whatever comes back. Rates that answer with
//! printable ASCII are the likely line speed.
//!
//! # Modules
//!
//! - `port`: Serial port abstraction, the `serialport` backend and a scriptable mock
//! - `probe`: Probe commands, the single-rate probe and response classification
//! - `sweep`: Candidate lists, the sweep loop, summaries and the reporter seam
//! - `report`: Console and log-file reporters
//! - `config`: Configuration management with TOML support
//! - `cli`: Command-line arguments
//! - `error`: Fatal application errors
//!
//! # Example
//!
//! ```rust
//! use baudsweep::port::MockDevice;
//! use baudsweep::sweep::{CancelFlag, NullReporter, SweepPlan, Sweeper};
//! use std::time::Duration;
//!
//! let device = MockDevice::new("MOCK0");
//! device.reply_at(19200, b"OK\r\n");
//!
//! let mut plan = SweepPlan::default();
//! plan.candidates = vec![9600, 19200];
//! plan.settings.commands.delay = Duration::ZERO;
//! plan.settings.line.timeout = Duration::from_millis(10);
//!
//! let summary = Sweeper::new(plan).run(device.connect(), &mut NullReporter, &CancelFlag::new());
//! assert_eq!(summary.ascii[0].baud, 19200);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod port;
pub mod probe;
pub mod report;
pub mod sweep;

// Re-export commonly used types for convenience
pub use error::{AppError, AppResult};
pub use port::{
    DataBits, LineConfig, MockDevice, MockSerialPort, Parity, PortError, SerialPortAdapter,
    StopBits, SyncSerialPort,
};
pub use probe::{classify, Classification, ProbeCommand, ProbeOutcome, ProbeSettings};
pub use sweep::{CancelFlag, Reporter, SweepPlan, SweepSummary, Sweeper};

// Re-export config types
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
