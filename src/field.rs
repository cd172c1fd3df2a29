//! Typed payload fields and their wire encodings.

use bytes::{BufMut, BytesMut};

/// One typed value serialized into a frame's payload.
///
/// All numeric encodings are little-endian.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text bytes followed by a single NUL terminator.
    Text(String),
    /// 4-byte signed integer.
    Integer(i32),
    /// 4-byte IEEE-754 single-precision float.
    Real(f32),
    /// Nested values, appended in order (flattened on the wire).
    Sequence(Vec<FieldValue>),
}

impl FieldValue {
    /// Wire size of this field in bytes.
    pub fn encoded_len(&self) -> usize {
        match self {
            FieldValue::Text(s) => s.len() + 1,
            FieldValue::Integer(_) | FieldValue::Real(_) => 4,
            FieldValue::Sequence(items) => items.iter().map(FieldValue::encoded_len).sum(),
        }
    }

    pub(crate) fn encode(&self, dst: &mut BytesMut) {
        match self {
            FieldValue::Text(s) => {
                dst.put_slice(s.as_bytes());
                dst.put_u8(0);
            }
            FieldValue::Integer(v) => dst.put_i32_le(*v),
            FieldValue::Real(v) => dst.put_f32_le(*v),
            FieldValue::Sequence(items) => {
                for item in items {
                    item.encode(dst);
                }
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Real(v)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::Sequence(items)
    }
}

/// A scalar with an explicitly chosen fixed-width binary layout.
///
/// Used by [`MessageBuilder::append_typed`](crate::MessageBuilder::append_typed)
/// when the default 4-byte integer/float layouts are not wanted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormatValue {
    /// Single character byte.
    Char(u8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
}

impl FormatValue {
    /// Wire width of this format in bytes.
    pub fn width(&self) -> usize {
        match self {
            FormatValue::Char(_) | FormatValue::U8(_) => 1,
            FormatValue::I16(_) | FormatValue::U16(_) => 2,
            FormatValue::I32(_) | FormatValue::U32(_) | FormatValue::F32(_) => 4,
            FormatValue::F64(_) => 8,
        }
    }

    pub(crate) fn encode(&self, dst: &mut BytesMut) {
        match *self {
            FormatValue::Char(v) | FormatValue::U8(v) => dst.put_u8(v),
            FormatValue::I16(v) => dst.put_i16_le(v),
            FormatValue::U16(v) => dst.put_u16_le(v),
            FormatValue::I32(v) => dst.put_i32_le(v),
            FormatValue::U32(v) => dst.put_u32_le(v),
            FormatValue::F32(v) => dst.put_f32_le(v),
            FormatValue::F64(v) => dst.put_f64_le(v),
        }
    }
}
