//! Probe byte sequences.

use std::time::Duration;

/// Pause after each command so slow devices can process the line.
pub const DEFAULT_COMMAND_DELAY: Duration = Duration::from_millis(500);

/// Wake sequence sent first: two carriage-return/line-feed pairs.
pub const WAKE_SEQUENCE: &[u8] = b"\r\n\r\n";

/// Greeting sent after the wake sequence.
pub const GREETING: &[u8] = b"hello\r\n";

/// Ordered byte strings written during one probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    /// Byte strings, written in order.
    pub payloads: Vec<Vec<u8>>,
    /// Delay after every write. Always fully elapses.
    pub delay: Duration,
}

impl Default for ProbeCommand {
    fn default() -> Self {
        Self {
            payloads: vec![WAKE_SEQUENCE.to_vec(), GREETING.to_vec()],
            delay: DEFAULT_COMMAND_DELAY,
        }
    }
}

impl ProbeCommand {
    /// Use `payloads` in place of the defaults.
    pub fn new(payloads: Vec<Vec<u8>>) -> Self {
        Self {
            payloads,
            ..Self::default()
        }
    }

    /// Parse user-supplied command strings, expanding escapes in each.
    pub fn from_escaped<S: AsRef<str>>(commands: &[S]) -> Result<Self, String> {
        let payloads = commands
            .iter()
            .map(|c| unescape(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(payloads))
    }

    /// Override the inter-command delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Expand C-style escapes into raw bytes.
///
/// Recognized: `\r`, `\n`, `\t`, `\0`, `\\`, `\"`, `\'` and `\xNN`. Any other
/// character is taken as its UTF-8 bytes.
pub fn unescape(input: &str) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        match chars.next() {
            Some('r') => out.push(b'\r'),
            Some('n') => out.push(b'\n'),
            Some('t') => out.push(b'\t'),
            Some('0') => out.push(0),
            Some('\\') => out.push(b'\\'),
            Some('"') => out.push(b'"'),
            Some('\'') => out.push(b'\''),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return Err(format!("incomplete \\x escape in '{input}'"));
                }
                let byte = u8::from_str_radix(&hex, 16)
                    .map_err(|_| format!("invalid \\x escape '\\x{hex}' in '{input}'"))?;
                out.push(byte);
            }
            Some(other) => return Err(format!("unknown escape '\\{other}' in '{input}'")),
            None => return Err(format!("trailing backslash in '{input}'")),
        }
    }

    Ok(out)
}
