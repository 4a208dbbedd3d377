//! Response classification and display decoding.

use serde::Serialize;
use std::fmt;

/// How a response's bytes look.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Every byte is printable ASCII, CR, LF or TAB.
    Ascii,
    /// At least one byte is outside that set.
    Binary,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Ascii => write!(f, "ASCII"),
            Classification::Binary => write!(f, "Non-ASCII"),
        }
    }
}

/// Whether `byte` counts as printable for classification.
#[inline]
pub fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E | b'\r' | b'\n' | b'\t')
}

/// Classify a response.
///
/// The empty sequence is vacuously printable and classifies as `Ascii`.
pub fn classify(bytes: &[u8]) -> Classification {
    if bytes.iter().copied().all(is_printable) {
        Classification::Ascii
    } else {
        Classification::Binary
    }
}

/// Decode bytes one-to-one into U+0000..=U+00FF. Never fails.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Latin-1 decode the first `limit` bytes for terminal display.
///
/// Control characters are written as escapes so raw device noise cannot move
/// the cursor or ring the bell.
pub fn display_text(bytes: &[u8], limit: usize) -> String {
    let mut out = String::with_capacity(limit.min(bytes.len()));
    for c in bytes.iter().take(limit).map(|&b| char::from(b)) {
        if c.is_control() {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

/// Text carried by a response: the ASCII string itself, or its Latin-1 decoding.
pub fn response_text(bytes: &[u8], classification: Classification) -> String {
    match classification {
        // Printable ASCII is valid UTF-8 byte for byte.
        Classification::Ascii => String::from_utf8_lossy(bytes).into_owned(),
        Classification::Binary => decode_latin1(bytes),
    }
}

/// Space-separated uppercase hex, e.g. `4F 4B 0D 0A`.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
