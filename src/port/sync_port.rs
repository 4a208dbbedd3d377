//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own
//! `SerialPortAdapter` trait so the sweep can be driven by a mock in tests.

use super::error::PortError;
use super::traits::{LineConfig, SerialPortAdapter};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::debug;

/// Synchronous serial port implementation wrapping `serialport::SerialPort`.
///
/// The device is closed when this value is dropped.
pub struct SyncSerialPort {
    /// The underlying serial port implementation.
    port: Box<dyn serialport::SerialPort>,
    /// The port name/path for identification.
    name: String,
}

impl SyncSerialPort {
    /// Open a serial port with the given line configuration.
    ///
    /// # Arguments
    /// * `port_name` - The system path to the serial port (e.g., "/dev/ttyUSB0" or "COM3")
    /// * `config` - Line parameters to open the port with
    ///
    /// # Example
    /// ```no_run
    /// use baudsweep::port::{LineConfig, SyncSerialPort};
    ///
    /// let port = SyncSerialPort::open("/dev/ttyUSB0", &LineConfig::default())?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port_name: &str, config: &LineConfig) -> Result<Self, PortError> {
        let parity = serialport::Parity::try_from(config.parity)?;
        let stop_bits = serialport::StopBits::try_from(config.stop_bits)?;

        let port = serialport::new(port_name, config.baud_rate)
            .data_bits(config.data_bits.into())
            .flow_control(serialport::FlowControl::None)
            .parity(parity)
            .stop_bits(stop_bits)
            .timeout(config.timeout)
            .open()
            .map_err(|e| map_open_error(port_name, e))?;

        debug!(port = port_name, framing = %config.framing(), "serial port opened");

        Ok(Self {
            port,
            name: port_name.to_string(),
        })
    }
}

fn map_open_error(port_name: &str, e: serialport::Error) -> PortError {
    match e.kind() {
        serialport::ErrorKind::NoDevice => PortError::not_found(port_name),
        serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
        serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
            PortError::not_found(port_name)
        }
        serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
            PortError::PermissionDenied(port_name.to_string())
        }
        _ => PortError::Serial(e),
    }
}

impl SerialPortAdapter for SyncSerialPort {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), PortError> {
        self.port.set_baud_rate(baud_rate).map_err(PortError::Serial)
    }

    fn apply_line_config(&mut self, config: &LineConfig) -> Result<(), PortError> {
        let parity = serialport::Parity::try_from(config.parity)?;
        let stop_bits = serialport::StopBits::try_from(config.stop_bits)?;

        self.port.set_baud_rate(config.baud_rate)?;
        self.port.set_data_bits(config.data_bits.into())?;
        self.port.set_parity(parity)?;
        self.port.set_stop_bits(stop_bits)?;
        Ok(())
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError> {
        self.port.set_timeout(timeout).map_err(PortError::Serial)
    }

    fn clear_input(&mut self) -> Result<(), PortError> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(PortError::Serial)
    }

    fn clear_output(&mut self) -> Result<(), PortError> {
        self.port
            .clear(serialport::ClearBuffer::Output)
            .map_err(PortError::Serial)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.port.write(data).map_err(PortError::Io)
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read(buffer).map_err(PortError::Io)
    }
}

impl Drop for SyncSerialPort {
    fn drop(&mut self) {
        debug!(port = %self.name, "serial port closed");
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{Parity, StopBits};

    #[test]
    fn test_port_not_found_error() {
        let result = SyncSerialPort::open("/dev/nonexistent_port_12345", &LineConfig::default());

        match result {
            Err(PortError::NotFound(name)) => assert!(name.contains("nonexistent")),
            Err(other) => panic!("Expected NotFound error, got: {other:?}"),
            Ok(_) => panic!("Expected NotFound error, port opened"),
        }
    }

    #[test]
    fn test_unsupported_framing_rejected_before_open() {
        let config = LineConfig {
            parity: Parity::Space,
            ..LineConfig::default()
        };
        let result = SyncSerialPort::open("/dev/nonexistent_port_12345", &config);
        assert!(matches!(result, Err(PortError::Unsupported(_))));

        let config = LineConfig {
            stop_bits: StopBits::OnePointFive,
            ..LineConfig::default()
        };
        let result = SyncSerialPort::open("/dev/nonexistent_port_12345", &config);
        assert!(matches!(result, Err(PortError::Unsupported(_))));
    }
}
