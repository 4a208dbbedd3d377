//! One configure, send and read cycle at a single baud rate.

use super::command::ProbeCommand;
use super::outcome::{ProbeFailure, ProbeOutcome, ProbeResponse};
use crate::port::{LineConfig, PortError, SerialPortAdapter};
use std::io;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Most bytes kept from a single probe's read.
pub const DEFAULT_MAX_READ_BYTES: usize = 100;

/// Longest accepted per-probe read timeout.
pub const MAX_READ_TIMEOUT: Duration = Duration::from_secs(3600);

/// Everything a probe needs besides the port and the baud rate.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Framing and read timeout; `baud_rate` is replaced per probe.
    pub line: LineConfig,
    pub commands: ProbeCommand,
    pub max_read_bytes: usize,
    /// Re-apply the full line configuration on every probe instead of only
    /// the baud rate.
    pub reapply_line_config: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self::new(LineConfig::default(), ProbeCommand::default())
    }
}

impl ProbeSettings {
    /// Settings for `line`, re-applying framing only when it isn't 8N1.
    pub fn new(line: LineConfig, commands: ProbeCommand) -> Self {
        let reapply_line_config = !line.is_8n1();
        Self {
            line,
            commands,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
            reapply_line_config,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.line.timeout
    }
}

/// Probe `baud` on `port`.
///
/// Never fails: faults from the port become `ProbeOutcome::Failed` so the
/// caller can move on to the next rate.
pub fn probe<P>(port: &mut P, baud: u32, settings: &ProbeSettings) -> ProbeOutcome
where
    P: SerialPortAdapter + ?Sized,
{
    match exchange(port, baud, settings) {
        Ok(raw) if raw.is_empty() => {
            trace!(baud, "no response");
            ProbeOutcome::NoResponse { baud }
        }
        Ok(raw) => {
            let response = ProbeResponse::new(baud, raw);
            debug!(
                baud,
                bytes = response.len(),
                classification = %response.classification,
                "response received"
            );
            ProbeOutcome::Response(response)
        }
        Err(e) => {
            debug!(baud, error = %e, "probe failed");
            ProbeOutcome::Failed(ProbeFailure::new(baud, e.to_string()))
        }
    }
}

fn exchange<P>(port: &mut P, baud: u32, settings: &ProbeSettings) -> Result<Vec<u8>, PortError>
where
    P: SerialPortAdapter + ?Sized,
{
    if settings.reapply_line_config {
        port.apply_line_config(&settings.line.with_baud(baud))?;
    } else {
        port.set_baud_rate(baud)?;
    }

    // Garbage received at the previous rate must not count as a reply.
    port.clear_input()?;
    port.clear_output()?;

    for payload in &settings.commands.payloads {
        write_all(port, payload)?;
        trace!(baud, bytes = payload.len(), "probe command sent");
        if !settings.commands.delay.is_zero() {
            std::thread::sleep(settings.commands.delay);
        }
    }

    read_window(port, settings.max_read_bytes, settings.timeout())
}

fn write_all<P>(port: &mut P, mut data: &[u8]) -> Result<(), PortError>
where
    P: SerialPortAdapter + ?Sized,
{
    while !data.is_empty() {
        match port.write_bytes(data)? {
            0 => {
                return Err(PortError::Io(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "port accepted no bytes",
                )))
            }
            n => data = &data[n..],
        }
    }
    Ok(())
}

/// Read until `cap` bytes arrive or `timeout` elapses, whichever is first.
///
/// At least one read is attempted even with a zero timeout.
fn read_window<P>(port: &mut P, cap: usize, timeout: Duration) -> Result<Vec<u8>, PortError>
where
    P: SerialPortAdapter + ?Sized,
{
    let start = Instant::now();
    let deadline = start
        .checked_add(timeout.min(MAX_READ_TIMEOUT))
        .unwrap_or(start);
    let mut buffer = vec![0u8; cap];
    let mut filled = 0;

    while filled < cap {
        let remaining = deadline.saturating_duration_since(Instant::now());
        port.set_timeout(remaining)?;

        match port.read_bytes(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.is_timeout() => break,
            Err(e) => return Err(e),
        }

        if Instant::now() >= deadline {
            break;
        }
    }

    buffer.truncate(filled);
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{MockDevice, Parity};
    use crate::probe::Classification;

    fn fast_settings() -> ProbeSettings {
        let mut settings = ProbeSettings::default();
        settings.commands.delay = Duration::ZERO;
        settings.line.timeout = Duration::from_millis(10);
        settings
    }

    #[test]
    fn test_silent_device_is_no_response() {
        let device = MockDevice::new("MOCK0");
        let mut port = device.connect();

        let outcome = probe(&mut port, 9600, &fast_settings());
        assert_eq!(outcome, ProbeOutcome::NoResponse { baud: 9600 });
    }

    #[test]
    fn test_sends_every_command_in_order() {
        let device = MockDevice::new("MOCK0");
        let mut port = device.connect();

        probe(&mut port, 57600, &fast_settings());
        assert_eq!(
            device.writes_at(57600),
            vec![b"\r\n\r\n".to_vec(), b"hello\r\n".to_vec()]
        );
    }

    #[test]
    fn test_ascii_reply_is_classified() {
        let device = MockDevice::new("MOCK0");
        device.reply_at(115200, b"U-Boot> ");
        let mut port = device.connect();

        match probe(&mut port, 115200, &fast_settings()) {
            ProbeOutcome::Response(r) => {
                assert_eq!(r.baud, 115200);
                assert_eq!(r.classification, Classification::Ascii);
                assert!(r.text.starts_with("U-Boot> "));
            }
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[test]
    fn test_read_is_capped() {
        let device = MockDevice::new("MOCK0");
        device.reply_at(9600, &[b'A'; 80]);
        let mut port = device.connect();

        match probe(&mut port, 9600, &fast_settings()) {
            ProbeOutcome::Response(r) => assert_eq!(r.len(), DEFAULT_MAX_READ_BYTES),
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[test]
    fn test_stale_bytes_are_flushed() {
        let device = MockDevice::new("MOCK0");
        device.emit_noise_on_reconfigure(&[0xF0, 0x0F, 0xAA]);
        let mut port = device.connect();

        let outcome = probe(&mut port, 230400, &fast_settings());
        assert_eq!(outcome, ProbeOutcome::NoResponse { baud: 230400 });
        assert_eq!(device.input_clears(), 1);
        assert_eq!(device.output_clears(), 1);
    }

    #[test]
    fn test_rejected_baud_becomes_failure() {
        let device = MockDevice::new("MOCK0");
        device.reject_baud(134, "Invalid argument");
        let mut port = device.connect();

        match probe(&mut port, 134, &fast_settings()) {
            ProbeOutcome::Failed(f) => {
                assert_eq!(f.baud, 134);
                assert!(f.message.contains("Invalid argument"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(device.write_log().is_empty());
    }

    #[test]
    fn test_write_fault_becomes_failure() {
        let device = MockDevice::new("MOCK0");
        device.fail_writes_at(1200, "device unplugged");
        let mut port = device.connect();

        let outcome = probe(&mut port, 1200, &fast_settings());
        assert!(matches!(outcome, ProbeOutcome::Failed(_)));
    }

    #[test]
    fn test_non_8n1_reapplies_full_line_config() {
        let device = MockDevice::new("MOCK0");
        let mut port = device.connect();

        let mut settings = fast_settings();
        settings.line.parity = Parity::Even;
        settings = ProbeSettings::new(settings.line, settings.commands);
        assert!(settings.reapply_line_config);

        probe(&mut port, 2400, &settings);
        let applied = device.line_configs();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].baud_rate, 2400);
        assert_eq!(applied[0].parity, Parity::Even);
    }

    #[test]
    fn test_huge_timeout_does_not_overflow() {
        let device = MockDevice::new("MOCK0");
        device.reply_at(9600, b"OK\r\n");
        let mut port = device.connect();

        let mut settings = fast_settings();
        settings.line.timeout = Duration::MAX;

        match probe(&mut port, 9600, &settings) {
            ProbeOutcome::Response(r) => assert_eq!(r.raw, b"OK\r\nOK\r\n".to_vec()),
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[test]
    fn test_8n1_only_sets_baud() {
        let device = MockDevice::new("MOCK0");
        let mut port = device.connect();

        probe(&mut port, 4800, &fast_settings());
        assert!(device.line_configs().is_empty());
        assert_eq!(device.baud_log(), vec![4800]);
    }
}
