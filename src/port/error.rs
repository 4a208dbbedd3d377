//! Port-specific error types.
//!
//! Kept separate from application-level errors: a `PortError` raised during a
//! single probe is folded into that probe's outcome, while one raised while
//! opening the port ends the run.

use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// The process lacks permission to open the device.
    #[error("Permission denied opening {0}")]
    PermissionDenied(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration was rejected.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The requested line setting has no equivalent in the serial backend.
    #[error("Unsupported line setting: {0}")]
    Unsupported(String),

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an Unsupported error from a description of the setting.
    pub fn unsupported(setting: impl Into<String>) -> Self {
        Self::Unsupported(setting.into())
    }

    /// Whether this error only means "the read window closed with no data".
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PortError::not_found("/dev/ttyUSB0");
        assert_eq!(err.to_string(), "Serial port not found: /dev/ttyUSB0");

        let err = PortError::config("Invalid baud rate");
        assert_eq!(err.to_string(), "Configuration error: Invalid baud rate");

        let err = PortError::unsupported("mark parity");
        assert_eq!(err.to_string(), "Unsupported line setting: mark parity");
    }

    #[test]
    fn test_timeout_detection() {
        let err = PortError::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "t"));
        assert!(err.is_timeout());

        let err = PortError::Io(std::io::Error::new(std::io::ErrorKind::WouldBlock, "w"));
        assert!(err.is_timeout());

        let err = PortError::Io(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "b"));
        assert!(!err.is_timeout());
        assert!(!PortError::config("x").is_timeout());
    }
}
