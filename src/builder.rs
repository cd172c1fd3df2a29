use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::codec::{
    self, CRC_OFFSET, FIXED_HEADER, ID_OFFSET, LEN_OFFSET, MAX_COUNTED, MAX_FRAME_SIZE, SYNC,
};
use crate::crc::checksum;
use crate::error::{FrameError, Result};
use crate::field::{FieldValue, FormatValue};

/// Builds one frame incrementally.
///
/// The builder owns the frame buffer and re-derives the length byte and
/// CRC after every append, so the buffer is a complete, self-checking
/// frame at all times. Appends are atomic: an append that would overflow
/// the length byte fails without touching the buffer.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: BytesMut,
}

impl MessageBuilder {
    /// Start a frame for the given message id.
    ///
    /// The result is already a valid empty-payload frame (length byte
    /// `0x01`, CRC over the id byte).
    pub fn new(msg_id: u8) -> Self {
        let mut buf = BytesMut::with_capacity(MAX_FRAME_SIZE);
        buf.put_slice(&SYNC);
        buf.put_u16_le(0); // CRC placeholder, sealed below
        buf.put_u8(1); // length: just the message id so far
        buf.put_u8(msg_id);
        let mut builder = Self { buf };
        builder.seal();
        builder
    }

    /// Append a sequence of typed fields in order.
    pub fn append_fields<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = FieldValue>,
    {
        let mut staged = BytesMut::new();
        for item in items {
            item.encode(&mut staged);
        }
        self.append_raw(&staged)
    }

    /// Append one scalar with an explicitly chosen fixed-width layout.
    pub fn append_typed(&mut self, value: FormatValue) -> Result<()> {
        let mut staged = BytesMut::with_capacity(value.width());
        value.encode(&mut staged);
        self.append_raw(&staged)
    }

    /// Append one NUL-terminated text field.
    pub fn append_text(&mut self, text: &str) -> Result<()> {
        self.append_fields([FieldValue::from(text)])
    }

    /// Append one 4-byte little-endian signed integer.
    pub fn append_integer(&mut self, value: i32) -> Result<()> {
        self.append_fields([FieldValue::Integer(value)])
    }

    /// Append one 4-byte little-endian float.
    pub fn append_real(&mut self, value: f32) -> Result<()> {
        self.append_fields([FieldValue::Real(value)])
    }

    /// Append a homogeneous slice of values, element by element.
    pub fn append_array<T>(&mut self, values: &[T]) -> Result<()>
    where
        T: Clone + Into<FieldValue>,
    {
        self.append_fields(values.iter().cloned().map(Into::into))
    }

    fn append_raw(&mut self, bytes: &[u8]) -> Result<()> {
        let counted = self.buf.len() - FIXED_HEADER + bytes.len();
        if counted > MAX_COUNTED {
            return Err(FrameError::LengthOverflow {
                size: counted,
                max: MAX_COUNTED,
            });
        }
        self.buf.put_slice(bytes);
        self.seal();
        trace!(added = bytes.len(), total = self.buf.len(), "appended fields");
        Ok(())
    }

    /// Re-derive the length byte, then the CRC over the counted region.
    fn seal(&mut self) {
        let counted = self.buf.len() - FIXED_HEADER;
        self.buf[LEN_OFFSET] = counted as u8;
        let crc = checksum(&self.buf[ID_OFFSET..]);
        self.buf[CRC_OFFSET..CRC_OFFSET + 2].copy_from_slice(&crc.to_le_bytes());
    }

    /// Recompute the CRC and compare it to the stored field.
    pub fn verify_checksum(&self) -> bool {
        codec::verify_checksum(&self.buf)
    }

    /// The message id this frame was created with.
    pub fn msg_id(&self) -> u8 {
        self.buf[ID_OFFSET]
    }

    /// The CRC currently stored in the header, as a u16.
    pub fn stored_crc(&self) -> u16 {
        u16::from_le_bytes([self.buf[CRC_OFFSET], self.buf[CRC_OFFSET + 1]])
    }

    /// Payload bytes appended so far (after the message id).
    pub fn payload(&self) -> &[u8] {
        &self.buf[ID_OFFSET + 1..]
    }

    /// Number of payload bytes appended so far.
    pub fn payload_len(&self) -> usize {
        self.buf.len() - ID_OFFSET - 1
    }

    /// Total wire size of the frame.
    pub fn wire_size(&self) -> usize {
        self.buf.len()
    }

    /// The complete frame bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the builder and hand off the frame as an immutable value.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_valid_and_empty() {
        let builder = MessageBuilder::new(1);
        // CRC16([0x01]) = 0xC0C1, stored little-endian.
        assert_eq!(builder.as_bytes(), &[0x3A, 0xA3, 0xC1, 0xC0, 0x01, 0x01]);
        assert!(builder.verify_checksum());
        assert_eq!(builder.msg_id(), 1);
        assert_eq!(builder.payload_len(), 0);
        assert!(builder.payload().is_empty());
    }

    #[test]
    fn known_reference_frame() {
        let mut builder = MessageBuilder::new(0x0A);
        builder
            .append_typed(FormatValue::U32(0x0000_07B5))
            .unwrap();
        assert_eq!(
            builder.as_bytes(),
            &[0x3A, 0xA3, 0x0F, 0xCC, 0x05, 0x0A, 0xB5, 0x07, 0x00, 0x00]
        );
    }

    #[test]
    fn length_and_crc_hold_after_every_append() {
        let mut builder = MessageBuilder::new(7);
        let fields = [
            FieldValue::from("hello"),
            FieldValue::Integer(-42),
            FieldValue::Real(3.5),
            FieldValue::Sequence(vec![FieldValue::Integer(1), FieldValue::from("x")]),
        ];
        for field in fields {
            builder.append_fields([field]).unwrap();
            let frame = builder.as_bytes();
            assert_eq!(frame[4] as usize, frame.len() - 5);
            assert!(builder.verify_checksum());
        }
    }

    #[test]
    fn append_typed_widths_land_on_the_wire() {
        let mut builder = MessageBuilder::new(2);
        builder.append_typed(FormatValue::U8(0xAB)).unwrap();
        builder.append_typed(FormatValue::I16(-1)).unwrap();
        builder.append_typed(FormatValue::F64(0.0)).unwrap();
        assert_eq!(builder.payload_len(), 1 + 2 + 8);
        assert_eq!(&builder.payload()[..3], &[0xAB, 0xFF, 0xFF]);
        assert!(builder.verify_checksum());
    }

    #[test]
    fn convenience_appends_match_append_fields() {
        let mut a = MessageBuilder::new(9);
        a.append_text("abc").unwrap();
        a.append_integer(5).unwrap();
        a.append_real(1.0).unwrap();

        let mut b = MessageBuilder::new(9);
        b.append_fields([
            FieldValue::from("abc"),
            FieldValue::Integer(5),
            FieldValue::Real(1.0),
        ])
        .unwrap();

        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn append_array_flattens_elements() {
        let mut builder = MessageBuilder::new(3);
        builder.append_array(&[1i32, 2, 3]).unwrap();
        assert_eq!(builder.payload_len(), 12);
        assert_eq!(&builder.payload()[..4], &[0x01, 0x00, 0x00, 0x00]);
        assert!(builder.verify_checksum());
    }

    #[test]
    fn overflow_is_rejected_without_mutation() {
        let mut builder = MessageBuilder::new(1);
        builder.append_text(&"a".repeat(200)).unwrap();
        let before = builder.as_bytes().to_vec();

        // 202 counted bytes so far; 60 more would exceed 255.
        let err = builder.append_text(&"b".repeat(59)).unwrap_err();
        assert!(matches!(
            err,
            FrameError::LengthOverflow { size: 262, max: 255 }
        ));
        assert_eq!(builder.as_bytes(), &before[..]);
        assert!(builder.verify_checksum());
    }

    #[test]
    fn overflow_mid_batch_leaves_frame_unchanged() {
        let mut builder = MessageBuilder::new(1);
        let before = builder.as_bytes().to_vec();
        let err = builder
            .append_fields([
                FieldValue::from("short"),
                FieldValue::from("x".repeat(300)),
            ])
            .unwrap_err();
        assert!(matches!(err, FrameError::LengthOverflow { .. }));
        assert_eq!(builder.as_bytes(), &before[..]);
    }

    #[test]
    fn fill_to_exactly_max_counted() {
        let mut builder = MessageBuilder::new(1);
        // 253 text bytes + NUL + the id byte = 255 counted bytes.
        builder.append_text(&"c".repeat(253)).unwrap();
        assert_eq!(builder.as_bytes()[4], 0xFF);
        assert!(builder.verify_checksum());
        assert!(builder.append_typed(FormatValue::U8(0)).is_err());
    }

    #[test]
    fn into_bytes_hands_off_the_same_frame() {
        let mut builder = MessageBuilder::new(4);
        builder.append_integer(77).unwrap();
        let expected = builder.as_bytes().to_vec();
        let frozen = builder.into_bytes();
        assert_eq!(frozen.as_ref(), &expected[..]);
    }
}
