//! Human-readable renderings of frame bytes for logging hand-off.

use std::fmt::Write;

/// Render bytes as space-separated uppercase hex pairs: `"3A A3 0F CC"`.
pub fn hex_pairs(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02X}");
    }
    out
}

/// Render bytes as a string of escaped literals: `"\x3A\xA3\x0F\xCC"`.
pub fn escaped_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 4);
    for byte in bytes {
        let _ = write!(out, "\\x{byte:02X}");
    }
    out
}
