//! Candidate baud rate lists.

/// Standard and specialised rates in scan order.
pub const DEFAULT_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 135, 150, 200, 300, 600, 1200, 1800, 2400, 3600, 4800, 7200, 9600, 14400,
    19200, 28800, 31250, 38400, 56000, 57600, 76800, 115200, 115700, 125000, 128000, 230400,
    250000, 256000, 460800, 500000, 512000, 600000, 750000, 921600, 1000000, 1152000, 1382400,
    1500000, 2000000, 3686400, 3000000, 4000000,
];

/// Rates most devices ship with, ordered by popularity.
pub const COMMON_BAUD_RATES: &[u32] = &[
    9600,   // Most common default
    115200, // Modern devices, microcontrollers
    19200,  // Legacy devices
    38400,  // Medium speed devices
    57600,  // High speed legacy
    230400, // Very high speed
    460800, // Ultra high speed
    921600, // Maximum typical speed
    4800,   // Very slow legacy
    2400,   // Ancient devices
    1200,   // Historical
];

/// The default candidate list as an owned value.
pub fn default_candidates() -> Vec<u32> {
    DEFAULT_BAUD_RATES.to_vec()
}

/// Reorder `rates` so common rates present in it come first.
///
/// Rates not in the common list keep their relative order after them. The
/// result always has as many entries as `rates`.
pub fn common_first(rates: &[u32]) -> Vec<u32> {
    let mut ordered: Vec<u32> = Vec::with_capacity(rates.len());
    for &common in COMMON_BAUD_RATES {
        ordered.extend(rates.iter().copied().filter(|&r| r == common));
    }
    ordered.extend(rates.iter().copied().filter(|r| !COMMON_BAUD_RATES.contains(r)));
    ordered
}

/// Parse a comma-separated list such as `9600,19200,115200`.
///
/// Order is preserved; a rate listed twice is an error.
pub fn parse_baud_list(spec: &str) -> Result<Vec<u32>, String> {
    let mut rates = Vec::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let rate: u32 = part
            .parse()
            .map_err(|_| format!("Invalid baud rate: {}", part))?;
        if rate == 0 {
            return Err("Baud rate must be greater than zero".to_string());
        }
        if rates.contains(&rate) {
            return Err(format!("Baud rate {} is listed more than once", rate));
        }
        rates.push(rate);
    }

    if rates.is_empty() {
        return Err("No baud rates specified".to_string());
    }

    Ok(rates)
}
