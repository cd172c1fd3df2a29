use bytes::{Buf, Bytes, BytesMut};
use tracing::debug;

use crate::crc::checksum;
use crate::error::{FrameError, Result};

/// Sync marker bytes at the start of every frame.
pub const SYNC: [u8; 2] = [0x3A, 0xA3];

/// Fixed prefix: sync (2) + CRC (2) + length (1) = 5 bytes.
pub const FIXED_HEADER: usize = 5;

/// Smallest complete frame: fixed prefix + message id.
pub const MIN_FRAME_SIZE: usize = FIXED_HEADER + 1;

/// The length byte counts the message id plus payload, so at most 255
/// bytes follow the fixed prefix.
pub const MAX_COUNTED: usize = 255;

/// Largest possible frame on the wire.
pub const MAX_FRAME_SIZE: usize = FIXED_HEADER + MAX_COUNTED;

pub(crate) const CRC_OFFSET: usize = 2;
pub(crate) const LEN_OFFSET: usize = 4;
pub(crate) const ID_OFFSET: usize = 5;

/// A decoded frame: the message id and the payload bytes that followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub msg_id: u8,
    pub payload: Bytes,
}

/// Decode one frame from the front of a buffer.
///
/// Wire format:
/// ```text
/// ┌────────────┬──────────┬──────────┬──────────┬──────────────┐
/// │ Sync (2B)  │ CRC      │ Length   │ Msg id   │ Payload       │
/// │ 0x3A 0xA3  │ (2B LE)  │ (1B)     │ (1B)     │ (Length - 1)  │
/// └────────────┴──────────┴──────────┴──────────┴──────────────┘
/// ```
/// The CRC covers the message id and payload; Length counts both.
///
/// Returns `Ok(None)` if the buffer doesn't contain a complete frame yet.
/// On success, verifies the CRC and consumes the frame bytes.
pub fn decode_frame(src: &mut BytesMut) -> Result<Option<Frame>> {
    if src.len() < MIN_FRAME_SIZE {
        return Ok(None); // Need more data
    }

    if src[0..2] != SYNC {
        debug!(found = ?&src[0..2], "sync marker mismatch");
        return Err(FrameError::InvalidSync);
    }

    let counted = src[LEN_OFFSET] as usize;
    if counted == 0 {
        return Err(FrameError::EmptyFrame);
    }

    let total = FIXED_HEADER + counted;
    if src.len() < total {
        return Ok(None); // Need more data
    }

    let stored = u16::from_le_bytes([src[CRC_OFFSET], src[CRC_OFFSET + 1]]);
    let computed = checksum(&src[ID_OFFSET..total]);
    if stored != computed {
        debug!(stored, computed, "checksum mismatch");
        return Err(FrameError::ChecksumMismatch { stored, computed });
    }

    let msg_id = src[ID_OFFSET];
    src.advance(ID_OFFSET + 1);
    let payload = src.split_to(counted - 1).freeze();

    Ok(Some(Frame { msg_id, payload }))
}

/// Check a complete frame's stored CRC against a fresh checksum of the
/// bytes after the length byte.
///
/// The length byte is not validated against the actual buffer size; a
/// frame is valid iff the stored and computed CRCs agree.
pub fn verify_checksum(frame: &[u8]) -> bool {
    if frame.len() < MIN_FRAME_SIZE {
        return false;
    }
    let stored = u16::from_le_bytes([frame[CRC_OFFSET], frame[CRC_OFFSET + 1]]);
    stored == checksum(&frame[ID_OFFSET..])
}
