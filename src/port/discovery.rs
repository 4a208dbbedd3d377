//! Enumeration of serial devices present on the system.

use super::error::PortError;
use serde::Serialize;
use serialport::{available_ports, SerialPortType};

/// One serial device reported by the operating system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortListing {
    pub name: String,
    pub kind: PortKind,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

/// Transport behind a serial device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortKind {
    Usb,
    Bluetooth,
    Pci,
    Unknown,
}

impl std::fmt::Display for PortKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortKind::Usb => write!(f, "USB"),
            PortKind::Bluetooth => write!(f, "Bluetooth"),
            PortKind::Pci => write!(f, "PCI"),
            PortKind::Unknown => write!(f, "Unknown"),
        }
    }
}

impl From<serialport::SerialPortInfo> for PortListing {
    fn from(info: serialport::SerialPortInfo) -> Self {
        let mut listing = PortListing {
            name: info.port_name,
            kind: PortKind::Unknown,
            vid: None,
            pid: None,
            manufacturer: None,
            product: None,
            serial_number: None,
        };

        match info.port_type {
            SerialPortType::UsbPort(usb) => {
                listing.kind = PortKind::Usb;
                listing.vid = Some(usb.vid);
                listing.pid = Some(usb.pid);
                listing.manufacturer = usb.manufacturer;
                listing.product = usb.product;
                listing.serial_number = usb.serial_number;
            }
            SerialPortType::BluetoothPort => listing.kind = PortKind::Bluetooth,
            SerialPortType::PciPort => listing.kind = PortKind::Pci,
            SerialPortType::Unknown => {}
        }

        listing
    }
}

/// List the serial devices currently available, sorted by name.
pub fn list_ports() -> Result<Vec<PortListing>, PortError> {
    let mut ports: Vec<PortListing> = available_ports()?
        .into_iter()
        .map(PortListing::from)
        .collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ports)
}

/// Placeholder device path used when no port is given.
pub fn default_port_path() -> &'static str {
    if cfg!(windows) {
        "COM1"
    } else if cfg!(target_os = "macos") {
        "/dev/cu.usbserial"
    } else {
        "/dev/ttyUSB0"
    }
}
