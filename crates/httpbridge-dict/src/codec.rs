use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::dictionary::{Dictionary, Tuple};
use crate::error::{DictError, Result};
use crate::value::{TupleType, Value};

/// Dictionary header: tuple count (1) = 1 byte.
pub const DICT_HEADER_SIZE: usize = 1;

/// Tuple header: key (4) + type (1) + length (2) = 7 bytes.
pub const TUPLE_HEADER_SIZE: usize = 7;

/// Maximum number of tuples a dictionary can carry.
pub const MAX_TUPLES: usize = u8::MAX as usize;

/// Maximum encoded length of a single value.
pub const MAX_VALUE_LEN: usize = u16::MAX as usize;

/// Encode a dictionary into the wire format.
pub fn encode_dict(dict: &Dictionary, dst: &mut BytesMut) -> Result<()> {
    encode_tuples(dict.as_slice(), dst)
}

/// Encode tuples into the wire format.
///
/// Wire format:
/// ```text
/// ┌───────────┬──────────┬──────────┬────────────┬─────────────────┬─────
/// │ Count     │ Key      │ Type     │ Length     │ Value           │ ...
/// │ (1B)      │ (4B LE)  │ (1B)     │ (2B LE)    │ (Length bytes)  │
/// └───────────┴──────────┴──────────┴────────────┴─────────────────┴─────
/// ```
///
/// Integers are little-endian; cstrings carry a trailing NUL.
pub fn encode_tuples(tuples: &[Tuple], dst: &mut BytesMut) -> Result<()> {
    if tuples.len() > MAX_TUPLES {
        return Err(DictError::NotEnoughStorage);
    }

    let total =
        DICT_HEADER_SIZE + tuples.iter().map(Tuple::encoded_len).sum::<usize>();
    dst.reserve(total);
    dst.put_u8(tuples.len() as u8);

    for tuple in tuples {
        let len = tuple.value.encoded_len();
        if len > MAX_VALUE_LEN {
            return Err(DictError::InvalidArgs);
        }
        dst.put_u32_le(tuple.key);
        dst.put_u8(tuple.value.tuple_type() as u8);
        dst.put_u16_le(len as u16);
        put_value(&tuple.value, dst);
    }

    Ok(())
}

fn put_value(value: &Value, dst: &mut BytesMut) {
    match value {
        Value::ByteArray(data) => dst.put_slice(data),
        Value::CString(text) => {
            dst.put_slice(text.as_bytes());
            dst.put_u8(0);
        }
        Value::UInt8(v) => dst.put_u8(*v),
        Value::UInt16(v) => dst.put_u16_le(*v),
        Value::UInt32(v) => dst.put_u32_le(*v),
        Value::Int8(v) => dst.put_i8(*v),
        Value::Int16(v) => dst.put_i16_le(*v),
        Value::Int32(v) => dst.put_i32_le(*v),
    }
}

/// Decode a complete dictionary from wire bytes.
///
/// Truncated input, unknown type tags, integer widths other than 1/2/4,
/// unterminated or non-UTF-8 cstrings, and trailing bytes all yield
/// [`DictError::InternalInconsistency`].
pub fn decode_dict(mut src: &[u8]) -> Result<Dictionary> {
    if src.remaining() < DICT_HEADER_SIZE {
        return Err(DictError::InternalInconsistency);
    }
    let count = src.get_u8() as usize;
    let mut tuples = Vec::with_capacity(count);

    for _ in 0..count {
        if src.remaining() < TUPLE_HEADER_SIZE {
            return Err(DictError::InternalInconsistency);
        }
        let key = src.get_u32_le();
        let tag = src.get_u8();
        let len = src.get_u16_le() as usize;

        if src.remaining() < len {
            return Err(DictError::InternalInconsistency);
        }
        let tuple_type = TupleType::from_u8(tag).ok_or(DictError::InternalInconsistency)?;
        let value = decode_value(tuple_type, &src[..len])?;
        src.advance(len);

        tuples.push(Tuple { key, value });
    }

    if src.has_remaining() {
        return Err(DictError::InternalInconsistency);
    }

    Ok(Dictionary::from(tuples))
}

fn decode_value(tuple_type: TupleType, mut raw: &[u8]) -> Result<Value> {
    let value = match (tuple_type, raw.len()) {
        (TupleType::ByteArray, _) => Value::ByteArray(Bytes::copy_from_slice(raw)),
        (TupleType::CString, _) => {
            let (nul, text) = raw.split_last().ok_or(DictError::InternalInconsistency)?;
            if *nul != 0 {
                return Err(DictError::InternalInconsistency);
            }
            let text =
                std::str::from_utf8(text).map_err(|_| DictError::InternalInconsistency)?;
            Value::CString(text.to_string())
        }
        (TupleType::UInt, 1) => Value::UInt8(raw.get_u8()),
        (TupleType::UInt, 2) => Value::UInt16(raw.get_u16_le()),
        (TupleType::UInt, 4) => Value::UInt32(raw.get_u32_le()),
        (TupleType::Int, 1) => Value::Int8(raw.get_i8()),
        (TupleType::Int, 2) => Value::Int16(raw.get_i16_le()),
        (TupleType::Int, 4) => Value::Int32(raw.get_i32_le()),
        (TupleType::UInt | TupleType::Int, _) => return Err(DictError::InternalInconsistency),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dictionary {
        vec![
            Tuple::new(0xFFFF, "http://x/"),
            Tuple::new(0xFFFC, 42i32),
            Tuple::new(7, -3i8),
            Tuple::new(8, 513u16),
            Tuple::new(9, vec![0xde, 0xad, 0xbe, 0xef]),
        ]
        .into()
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let dict = sample();
        let mut buf = BytesMut::new();

        encode_dict(&dict, &mut buf).unwrap();
        assert_eq!(buf.len(), dict.encoded_len());

        let decoded = decode_dict(&buf).unwrap();
        assert_eq!(decoded, dict);
    }

    #[test]
    fn test_wire_layout() {
        let dict: Dictionary = vec![Tuple::new(0x0102_0304, 0x0506u16)].into();
        let mut buf = BytesMut::new();
        encode_dict(&dict, &mut buf).unwrap();

        assert_eq!(
            buf.as_ref(),
            &[1, 0x04, 0x03, 0x02, 0x01, TupleType::UInt as u8, 2, 0, 0x06, 0x05]
        );
    }

    #[test]
    fn test_cstring_carries_terminator() {
        let dict: Dictionary = vec![Tuple::new(1, "ab")].into();
        let mut buf = BytesMut::new();
        encode_dict(&dict, &mut buf).unwrap();

        assert_eq!(&buf[DICT_HEADER_SIZE + TUPLE_HEADER_SIZE..], b"ab\0");
    }

    #[test]
    fn test_empty_dictionary() {
        let mut buf = BytesMut::new();
        encode_dict(&Dictionary::new(), &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0]);
        assert!(decode_dict(&buf).unwrap().is_empty());
    }

    #[test]
    fn test_decode_truncated_header() {
        let mut buf = BytesMut::new();
        encode_dict(&sample(), &mut buf).unwrap();
        buf.truncate(DICT_HEADER_SIZE + 3);

        assert_eq!(decode_dict(&buf), Err(DictError::InternalInconsistency));
    }

    #[test]
    fn test_decode_truncated_value() {
        let mut buf = BytesMut::new();
        encode_dict(&sample(), &mut buf).unwrap();
        let len = buf.len();
        buf.truncate(len - 1);

        assert_eq!(decode_dict(&buf), Err(DictError::InternalInconsistency));
    }

    #[test]
    fn test_decode_unknown_type() {
        let mut buf = BytesMut::new();
        buf.put_u8(1);
        buf.put_u32_le(1);
        buf.put_u8(9);
        buf.put_u16_le(1);
        buf.put_u8(0);

        assert_eq!(decode_dict(&buf), Err(DictError::InternalInconsistency));
    }

    #[test]
    fn test_decode_bad_integer_width() {
        let mut buf = BytesMut::new();
        buf.put_u8(1);
        buf.put_u32_le(1);
        buf.put_u8(TupleType::Int as u8);
        buf.put_u16_le(3);
        buf.put_slice(&[1, 2, 3]);

        assert_eq!(decode_dict(&buf), Err(DictError::InternalInconsistency));
    }

    #[test]
    fn test_decode_unterminated_cstring() {
        let mut buf = BytesMut::new();
        buf.put_u8(1);
        buf.put_u32_le(1);
        buf.put_u8(TupleType::CString as u8);
        buf.put_u16_le(2);
        buf.put_slice(b"ab");

        assert_eq!(decode_dict(&buf), Err(DictError::InternalInconsistency));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut buf = BytesMut::new();
        encode_dict(&Dictionary::new(), &mut buf).unwrap();
        buf.put_u8(0xAA);

        assert_eq!(decode_dict(&buf), Err(DictError::InternalInconsistency));
    }
}
