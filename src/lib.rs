//! Sync-marked, CRC-checked message framing for small binary protocols.
//!
//! Every frame carries:
//! - A 2-byte sync marker (`0x3A 0xA3`) for locating frame boundaries
//! - A 2-byte little-endian CRC-16 over the message id and payload
//! - A 1-byte length counting the message id plus payload
//! - A 1-byte message id
//! - Zero or more typed fields, serialized in append order
//!
//! [`MessageBuilder`] re-derives the length byte and CRC after every
//! append, so the buffer is a complete, self-checking frame at all times.
//!
//! ```
//! use sps_frame::{FieldValue, MessageBuilder};
//!
//! let mut builder = MessageBuilder::new(1);
//! builder
//!     .append_fields([FieldValue::from("status"), FieldValue::Integer(200)])
//!     .unwrap();
//! assert!(builder.verify_checksum());
//! let frame = builder.into_bytes();
//! ```

pub mod builder;
pub mod codec;
pub mod crc;
pub mod error;
pub mod field;
pub mod render;

pub use builder::MessageBuilder;
pub use codec::{
    decode_frame, verify_checksum, Frame, MAX_COUNTED, MAX_FRAME_SIZE, MIN_FRAME_SIZE, SYNC,
};
pub use crc::{build_table, checksum, crc_table};
pub use error::{FrameError, Result};
pub use field::{FieldValue, FormatValue};
pub use render::{escaped_literal, hex_pairs};
