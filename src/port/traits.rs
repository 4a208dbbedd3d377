//! Core traits for serial port abstraction.
//!
//! Defines the `SerialPortAdapter` trait that lets the sweep drive either a
//! real serial port or a scripted mock device, plus the line configuration
//! types shared by both.

use super::error::PortError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Line parameters for a serial port.
///
/// Built once per run; only `baud_rate` changes between probes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineConfig {
    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Number of data bits (5, 6, 7, or 8).
    pub data_bits: DataBits,

    /// Parity checking mode.
    pub parity: Parity,

    /// Number of stop bits.
    pub stop_bits: StopBits,

    /// Read timeout for a single probe.
    pub timeout: Duration,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout: Duration::from_secs(1),
        }
    }
}

impl LineConfig {
    /// Copy of this configuration at a different baud rate.
    pub fn with_baud(&self, baud_rate: u32) -> Self {
        Self {
            baud_rate,
            ..self.clone()
        }
    }

    /// Whether the framing is plain 8N1.
    pub fn is_8n1(&self) -> bool {
        self.data_bits == DataBits::Eight
            && self.parity == Parity::None
            && self.stop_bits == StopBits::One
    }

    /// Short framing notation, e.g. `8N1` or `7E2`.
    pub fn framing(&self) -> String {
        format!("{}{}{}", self.data_bits, self.parity.letter(), self.stop_bits)
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

impl FromStr for DataBits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5" => Ok(Self::Five),
            "6" => Ok(Self::Six),
            "7" => Ok(Self::Seven),
            "8" => Ok(Self::Eight),
            other => Err(format!("invalid data bits '{other}' (expected 5, 6, 7 or 8)")),
        }
    }
}

impl fmt::Display for DataBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        };
        write!(f, "{n}")
    }
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Even,
    Odd,
    Mark,
    Space,
}

impl Parity {
    fn letter(self) -> char {
        match self {
            Self::None => 'N',
            Self::Even => 'E',
            Self::Odd => 'O',
            Self::Mark => 'M',
            Self::Space => 'S',
        }
    }
}

impl TryFrom<Parity> for serialport::Parity {
    type Error = PortError;

    fn try_from(parity: Parity) -> Result<Self, Self::Error> {
        match parity {
            Parity::None => Ok(serialport::Parity::None),
            Parity::Even => Ok(serialport::Parity::Even),
            Parity::Odd => Ok(serialport::Parity::Odd),
            Parity::Mark | Parity::Space => {
                Err(PortError::unsupported(format!("{parity} parity")))
            }
        }
    }
}

impl FromStr for Parity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "even" => Ok(Self::Even),
            "odd" => Ok(Self::Odd),
            "mark" => Ok(Self::Mark),
            "space" => Ok(Self::Space),
            other => Err(format!(
                "invalid parity '{other}' (expected none, even, odd, mark or space)"
            )),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Even => "even",
            Self::Odd => "odd",
            Self::Mark => "mark",
            Self::Space => "space",
        };
        f.write_str(name)
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopBits {
    One,
    #[serde(rename = "1.5")]
    OnePointFive,
    Two,
}

impl TryFrom<StopBits> for serialport::StopBits {
    type Error = PortError;

    fn try_from(bits: StopBits) -> Result<Self, Self::Error> {
        match bits {
            StopBits::One => Ok(serialport::StopBits::One),
            StopBits::Two => Ok(serialport::StopBits::Two),
            StopBits::OnePointFive => Err(PortError::unsupported("1.5 stop bits")),
        }
    }
}

impl FromStr for StopBits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Self::One),
            "1.5" => Ok(Self::OnePointFive),
            "2" => Ok(Self::Two),
            other => Err(format!("invalid stop bits '{other}' (expected 1, 1.5 or 2)")),
        }
    }
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::One => "1",
            Self::OnePointFive => "1.5",
            Self::Two => "2",
        };
        f.write_str(s)
    }
}

/// Trait for serial port I/O operations.
///
/// This is the seam between the sweep and the operating system. The handle
/// is opened once by the caller and released when the implementing value is
/// dropped.
pub trait SerialPortAdapter: Send + fmt::Debug {
    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Change the active baud rate without reopening the device.
    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), PortError>;

    /// Apply every line parameter of `config`, including its baud rate.
    fn apply_line_config(&mut self, config: &LineConfig) -> Result<(), PortError>;

    /// Set the timeout used by subsequent reads.
    fn set_timeout(&mut self, timeout: Duration) -> Result<(), PortError>;

    /// Discard unread data in the receive buffer.
    fn clear_input(&mut self) -> Result<(), PortError>;

    /// Discard unsent data in the transmit buffer.
    fn clear_output(&mut self) -> Result<(), PortError>;

    /// Write bytes to the serial port.
    ///
    /// Returns the number of bytes actually written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read. A read that sees no data
    /// before the timeout fails with an I/O `TimedOut` error.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = LineConfig::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert!(config.is_8n1());
        assert_eq!(config.framing(), "8N1");
    }

    #[test]
    fn test_with_baud_keeps_framing() {
        let config = LineConfig {
            parity: Parity::Even,
            data_bits: DataBits::Seven,
            ..LineConfig::default()
        };
        let moved = config.with_baud(115200);
        assert_eq!(moved.baud_rate, 115200);
        assert_eq!(moved.framing(), "7E1");
        assert!(!moved.is_8n1());
    }

    #[test]
    fn test_data_bits_conversion() {
        let serialport_bits: serialport::DataBits = DataBits::Five.into();
        assert_eq!(serialport_bits, serialport::DataBits::Five);
    }

    #[test]
    fn test_parity_conversion() {
        let parity = serialport::Parity::try_from(Parity::Odd).unwrap();
        assert_eq!(parity, serialport::Parity::Odd);
        assert!(matches!(
            serialport::Parity::try_from(Parity::Mark),
            Err(PortError::Unsupported(_))
        ));
    }

    #[test]
    fn test_stop_bits_conversion() {
        let bits = serialport::StopBits::try_from(StopBits::Two).unwrap();
        assert_eq!(bits, serialport::StopBits::Two);
        assert!(serialport::StopBits::try_from(StopBits::OnePointFive).is_err());
    }

    #[test]
    fn test_cli_spellings_parse() {
        assert_eq!("7".parse::<DataBits>().unwrap(), DataBits::Seven);
        assert_eq!("EVEN".parse::<Parity>().unwrap(), Parity::Even);
        assert_eq!("1.5".parse::<StopBits>().unwrap(), StopBits::OnePointFive);
        assert!("9".parse::<DataBits>().is_err());
        assert!("parity".parse::<Parity>().is_err());
        assert!("3".parse::<StopBits>().is_err());
    }

    #[test]
    fn test_display_matches_cli_spelling() {
        for s in ["1", "1.5", "2"] {
            assert_eq!(s.parse::<StopBits>().unwrap().to_string(), s);
        }
        for s in ["none", "even", "odd", "mark", "space"] {
            assert_eq!(s.parse::<Parity>().unwrap().to_string(), s);
        }
    }
}
