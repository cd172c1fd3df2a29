//! Table-driven CRC-16 (polynomial `0xA001`, reflected, init `0x0000`).
//!
//! This is the ARC variant: no final XOR, applied byte-wise with a
//! 256-entry lookup table that is built once per process.

use std::sync::OnceLock;

/// Reflected form of the CRC-16 polynomial `0x8005`.
pub const CRC_POLY: u16 = 0xA001;

static CRC_TABLE: OnceLock<[u16; 256]> = OnceLock::new();

/// Build the 256-entry lookup table from scratch.
///
/// Pure and deterministic; use [`crc_table`] for the cached copy.
pub fn build_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    for (value, entry) in table.iter_mut().enumerate() {
        let mut crc = 0u16;
        let mut c = value as u16;
        for _ in 0..8 {
            if (crc ^ c) & 0x0001 != 0 {
                crc = (crc >> 1) ^ CRC_POLY;
            } else {
                crc >>= 1;
            }
            c >>= 1;
        }
        *entry = crc;
    }
    table
}

/// The process-wide lookup table, built on first use and immutable after.
pub fn crc_table() -> &'static [u16; 256] {
    CRC_TABLE.get_or_init(build_table)
}

/// Compute the CRC-16 of a byte sequence.
///
/// The empty sequence checksums to `0x0000`.
pub fn checksum(data: &[u8]) -> u16 {
    let table = crc_table();
    let mut crc = 0u16;
    for &byte in data {
        crc = (crc >> 8) ^ table[((crc ^ u16::from(byte)) & 0x00FF) as usize];
    }
    crc
}
