//! Mock serial device for testing.
//!
//! A `MockDevice` is a scripted stand-in for the hardware on the far end of
//! the line: it answers writes with a reply chosen by the active baud rate and
//! can refuse specific baud rates. `MockDevice::connect` hands out a
//! `MockSerialPort` handle that drives it through `SerialPortAdapter`, and the
//! device records everything the handle did so tests can inspect it after the
//! handle has been consumed.

use super::error::PortError;
use super::traits::{LineConfig, SerialPortAdapter};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Inner state of the mock device, shared between the device and its handles.
#[derive(Debug, Default)]
struct MockDeviceState {
    /// Baud rate currently configured on the handle.
    baud_rate: u32,
    /// Bytes waiting to be read.
    read_queue: VecDeque<u8>,
    /// Reply emitted after every write, keyed by baud rate.
    replies: HashMap<u32, Vec<u8>>,
    /// Baud rates the "driver" rejects, with the message to report.
    rejected: HashMap<u32, String>,
    /// Baud rates at which writes fail.
    write_failures: HashMap<u32, String>,
    /// Bytes that show up in the receive buffer whenever the baud changes.
    line_noise: Vec<u8>,
    /// Log of all bytes written, with the baud rate active at the time.
    write_log: Vec<(u32, Vec<u8>)>,
    /// Every baud rate successfully applied, in order.
    baud_log: Vec<u32>,
    /// Every full line configuration applied, in order.
    line_configs: Vec<LineConfig>,
    input_clears: usize,
    output_clears: usize,
    opens: usize,
    closes: usize,
}

/// Scripted serial device used by tests.
///
/// # Example
/// ```
/// use baudsweep::port::{MockDevice, SerialPortAdapter};
///
/// let device = MockDevice::new("MOCK0");
/// device.reply_at(19200, b"OK\r\n");
///
/// let mut port = device.connect();
/// port.set_baud_rate(19200).unwrap();
/// port.write_bytes(b"AT\r").unwrap();
///
/// let mut buffer = [0u8; 16];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"OK\r\n");
///
/// drop(port);
/// assert_eq!(device.close_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockDevice {
    name: String,
    state: Arc<Mutex<MockDeviceState>>,
}

impl MockDevice {
    /// Create a silent device with the given port name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockDeviceState {
                baud_rate: 9600,
                ..Default::default()
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockDeviceState> {
        // A poisoned lock only means another test thread panicked mid-update.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Answer every write made at `baud_rate` with `reply`.
    pub fn reply_at(&self, baud_rate: u32, reply: &[u8]) -> &Self {
        self.state().replies.insert(baud_rate, reply.to_vec());
        self
    }

    /// Make the driver reject `baud_rate` with `message`.
    pub fn reject_baud(&self, baud_rate: u32, message: impl Into<String>) -> &Self {
        self.state().rejected.insert(baud_rate, message.into());
        self
    }

    /// Make writes fail while `baud_rate` is active.
    pub fn fail_writes_at(&self, baud_rate: u32, message: impl Into<String>) -> &Self {
        self.state().write_failures.insert(baud_rate, message.into());
        self
    }

    /// Put `noise` in the receive buffer every time the baud rate changes.
    pub fn emit_noise_on_reconfigure(&self, noise: &[u8]) -> &Self {
        self.state().line_noise = noise.to_vec();
        self
    }

    /// Queue bytes for the next read regardless of what is written.
    pub fn enqueue_read(&self, data: &[u8]) {
        self.state().read_queue.extend(data);
    }

    /// Open a handle to this device.
    pub fn connect(&self) -> MockSerialPort {
        self.state().opens += 1;
        MockSerialPort {
            device: self.clone(),
        }
    }

    /// Get a copy of all data written, tagged with the active baud rate.
    pub fn write_log(&self) -> Vec<(u32, Vec<u8>)> {
        self.state().write_log.clone()
    }

    /// Writes issued while `baud_rate` was active.
    pub fn writes_at(&self, baud_rate: u32) -> Vec<Vec<u8>> {
        self.state()
            .write_log
            .iter()
            .filter(|(baud, _)| *baud == baud_rate)
            .map(|(_, data)| data.clone())
            .collect()
    }

    /// Baud rates applied through the handle, in order.
    pub fn baud_log(&self) -> Vec<u32> {
        self.state().baud_log.clone()
    }

    /// Full line configurations applied through the handle, in order.
    pub fn line_configs(&self) -> Vec<LineConfig> {
        self.state().line_configs.clone()
    }

    /// Number of input-buffer clears.
    pub fn input_clears(&self) -> usize {
        self.state().input_clears
    }

    /// Number of output-buffer clears.
    pub fn output_clears(&self) -> usize {
        self.state().output_clears
    }

    /// Number of handles opened.
    pub fn open_count(&self) -> usize {
        self.state().opens
    }

    /// Number of handles released.
    pub fn close_count(&self) -> usize {
        self.state().closes
    }

    /// Get the number of bytes available to read.
    pub fn available_bytes(&self) -> usize {
        self.state().read_queue.len()
    }

    fn switch_baud(state: &mut MockDeviceState, baud_rate: u32) -> Result<(), PortError> {
        if let Some(message) = state.rejected.get(&baud_rate) {
            return Err(PortError::config(message.clone()));
        }
        state.baud_rate = baud_rate;
        state.baud_log.push(baud_rate);
        let noise = state.line_noise.clone();
        state.read_queue.extend(noise);
        Ok(())
    }
}

/// Handle to a `MockDevice`; dropping it counts as closing the port.
pub struct MockSerialPort {
    device: MockDevice,
}

impl SerialPortAdapter for MockSerialPort {
    fn name(&self) -> &str {
        &self.device.name
    }

    fn set_baud_rate(&mut self, baud_rate: u32) -> Result<(), PortError> {
        let mut state = self.device.state();
        MockDevice::switch_baud(&mut state, baud_rate)
    }

    fn apply_line_config(&mut self, config: &LineConfig) -> Result<(), PortError> {
        serialport::Parity::try_from(config.parity)?;
        serialport::StopBits::try_from(config.stop_bits)?;

        let mut state = self.device.state();
        MockDevice::switch_baud(&mut state, config.baud_rate)?;
        state.line_configs.push(config.clone());
        Ok(())
    }

    fn set_timeout(&mut self, _timeout: Duration) -> Result<(), PortError> {
        // Reads never block; an empty queue answers with a timeout at once.
        Ok(())
    }

    fn clear_input(&mut self) -> Result<(), PortError> {
        let mut state = self.device.state();
        state.read_queue.clear();
        state.input_clears += 1;
        Ok(())
    }

    fn clear_output(&mut self) -> Result<(), PortError> {
        self.device.state().output_clears += 1;
        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.device.state();
        let baud = state.baud_rate;

        if let Some(message) = state.write_failures.get(&baud) {
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                message.clone(),
            )));
        }

        state.write_log.push((baud, data.to_vec()));
        if let Some(reply) = state.replies.get(&baud).cloned() {
            state.read_queue.extend(reply);
        }

        Ok(data.len())
    }

    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.device.state();

        let mut bytes_read = 0;
        for byte in buffer.iter_mut() {
            match state.read_queue.pop_front() {
                Some(queued) => {
                    *byte = queued;
                    bytes_read += 1;
                }
                None => break,
            }
        }

        if bytes_read == 0 && !buffer.is_empty() {
            // Same shape as a real port whose read window closed empty.
            Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "Operation timed out",
            )))
        } else {
            Ok(bytes_read)
        }
    }
}

impl Drop for MockSerialPort {
    fn drop(&mut self) {
        self.device.state().closes += 1;
    }
}

impl std::fmt::Debug for MockSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSerialPort")
            .field("name", &self.device.name)
            .field("available_bytes", &self.device.available_bytes())
            .finish()
    }
}
