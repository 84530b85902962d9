//! The literal wire codec: the contract between compiler and VM.
//!
//! A literal is `[tag:1][len:1][payload:len]`. Integer payloads are
//! big-endian two's complement of their width and `len` must equal that
//! width. Array literals use `len` as the element count and nest further
//! self-describing literals. Names (for `LOAD_GLOBAL`/`STORE_GLOBAL`)
//! are `[len:1][bytes]` with no tag.

use crate::error::{DecodeError, EncodeError};
use crate::type_tag::TypeTag;
use crate::value::Value;

/// Append the wire encoding of `value` to `out`.
///
/// Integers are re-narrowed to the smallest signed width that holds them,
/// regardless of the variant they arrive in, so a literal always carries
/// the same tag the record loader would assign to the same number.
pub fn encode_value(value: &Value, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    match value {
        Value::Bool(b) => {
            out.push(TypeTag::Bool as u8);
            out.push(1);
            out.push(u8::from(*b));
            Ok(())
        }
        Value::I8(n) => encode_int(i32::from(*n), out),
        Value::I16(n) => encode_int(i32::from(*n), out),
        Value::I32(n) => encode_int(*n, out),
        Value::Str(s) => {
            let len = s.len();
            if len > 255 {
                return Err(EncodeError::StringTooLong(len));
            }
            out.push(TypeTag::Str as u8);
            out.push(len as u8);
            out.extend_from_slice(s.as_bytes());
            Ok(())
        }
        Value::Array(items) => encode_array(items, out),
    }
}

/// Append an array literal built from a slice of element values.
pub fn encode_array(items: &[Value], out: &mut Vec<u8>) -> Result<(), EncodeError> {
    if items.len() > 255 {
        return Err(EncodeError::ArrayTooLong(items.len()));
    }
    out.push(TypeTag::Array as u8);
    out.push(items.len() as u8);
    for item in items {
        encode_value(item, out)?;
    }
    Ok(())
}

/// Append a length-prefixed name.
pub fn encode_name(name: &str, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    let len = name.len();
    if len > 255 {
        return Err(EncodeError::NameTooLong {
            name: name.to_string(),
            len,
        });
    }
    out.push(len as u8);
    out.extend_from_slice(name.as_bytes());
    Ok(())
}

fn encode_int(n: i32, out: &mut Vec<u8>) -> Result<(), EncodeError> {
    if let Ok(v) = i8::try_from(n) {
        out.push(TypeTag::I8 as u8);
        out.push(1);
        out.push(v as u8);
    } else if let Ok(v) = i16::try_from(n) {
        out.push(TypeTag::I16 as u8);
        out.push(2);
        out.extend_from_slice(&v.to_be_bytes());
    } else {
        out.push(TypeTag::I32 as u8);
        out.push(4);
        out.extend_from_slice(&n.to_be_bytes());
    }
    Ok(())
}

/// Decode one literal starting at `*pos`, advancing `*pos` past it.
pub fn decode_value(bytes: &[u8], pos: &mut usize) -> Result<Value, DecodeError> {
    let tag_at = *pos;
    let tag = TypeTag::try_from(take_byte(bytes, pos)?)?;
    let len = take_byte(bytes, pos)?;

    match tag {
        TypeTag::Bool => {
            expect_len(tag_at, tag, len, 1)?;
            Ok(Value::Bool(take_byte(bytes, pos)? != 0))
        }
        TypeTag::I8 => {
            expect_len(tag_at, tag, len, 1)?;
            Ok(Value::I8(take_byte(bytes, pos)? as i8))
        }
        TypeTag::I16 => {
            expect_len(tag_at, tag, len, 2)?;
            let payload = take_slice(bytes, pos, 2)?;
            Ok(Value::I16(i16::from_be_bytes([payload[0], payload[1]])))
        }
        TypeTag::I32 => {
            expect_len(tag_at, tag, len, 4)?;
            let payload = take_slice(bytes, pos, 4)?;
            Ok(Value::I32(i32::from_be_bytes([
                payload[0], payload[1], payload[2], payload[3],
            ])))
        }
        TypeTag::Str => {
            let at = *pos;
            let payload = take_slice(bytes, pos, len as usize)?;
            let text = std::str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8 { at })?;
            Ok(Value::Str(text.to_string()))
        }
        TypeTag::Array => {
            let mut items = Vec::with_capacity(len as usize);
            for _ in 0..len {
                items.push(decode_value(bytes, pos)?);
            }
            Ok(Value::Array(items))
        }
    }
}

/// Decode one length-prefixed name starting at `*pos`.
pub fn decode_name(bytes: &[u8], pos: &mut usize) -> Result<String, DecodeError> {
    let len = take_byte(bytes, pos)?;
    let at = *pos;
    let payload = take_slice(bytes, pos, len as usize)?;
    let name = std::str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8 { at })?;
    Ok(name.to_string())
}

fn take_byte(bytes: &[u8], pos: &mut usize) -> Result<u8, DecodeError> {
    let byte = *bytes
        .get(*pos)
        .ok_or(DecodeError::UnexpectedEnd { at: *pos })?;
    *pos += 1;
    Ok(byte)
}

fn take_slice<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8], DecodeError> {
    let end = pos
        .checked_add(len)
        .ok_or(DecodeError::UnexpectedEnd { at: *pos })?;
    if end > bytes.len() {
        return Err(DecodeError::UnexpectedEnd { at: bytes.len() });
    }
    let slice = &bytes[*pos..end];
    *pos = end;
    Ok(slice)
}

fn expect_len(at: usize, tag: TypeTag, len: u8, width: u8) -> Result<(), DecodeError> {
    if len != width {
        return Err(DecodeError::LengthMismatch {
            at,
            tag: tag.name(),
            len,
        });
    }
    Ok(())
}
