/// Errors that can occur while building or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The buffer does not start with the sync marker.
    #[error("invalid sync marker (expected 0x3A 0xA3)")]
    InvalidSync,

    /// The length byte is zero, leaving no room for the message id.
    #[error("frame length byte is zero")]
    EmptyFrame,

    /// Appending would push the counted region past what the length byte can hold.
    #[error("length overflow ({size} counted bytes, max {max})")]
    LengthOverflow { size: usize, max: usize },

    /// The stored CRC does not match the checksum of the received bytes.
    #[error("checksum mismatch (stored {stored:#06x}, computed {computed:#06x})")]
    ChecksumMismatch { stored: u16, computed: u16 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
