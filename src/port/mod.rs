//! Port abstraction layer for serial communication.
//!
//! Provides the `SerialPortAdapter` trait, a `serialport`-backed
//! implementation, a scripted mock device for tests, and device enumeration.

pub mod discovery;
pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use discovery::{default_port_path, list_ports, PortKind, PortListing};
pub use error::PortError;
pub use mock::{MockDevice, MockSerialPort};
pub use sync_port::SyncSerialPort;
pub use traits::*;
