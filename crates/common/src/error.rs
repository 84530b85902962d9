//! Wire-format errors for sift bytecode streams.

use thiserror::Error;

/// Errors that occur while decoding bytecode bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A byte in opcode position is not a known opcode.
    #[error("unknown opcode {byte:#04x}")]
    UnknownOpcode { byte: u8 },

    /// A byte in type-tag position is not a known tag.
    #[error("unknown type tag {byte:#04x}")]
    UnknownTypeTag { byte: u8 },

    /// The stream ended in the middle of a literal or name.
    #[error("unexpected end of bytecode at offset {at}")]
    UnexpectedEnd { at: usize },

    /// A fixed-width literal carried the wrong length byte.
    #[error("literal length {len} does not match width of {tag} at offset {at}")]
    LengthMismatch { at: usize, tag: &'static str, len: u8 },

    /// A text or name payload is not valid UTF-8.
    #[error("payload is not valid UTF-8 at offset {at}")]
    InvalidUtf8 { at: usize },
}

/// Errors that occur while encoding values into bytecode.
///
/// All length prefixes in the wire format are a single byte, so 255 is a
/// hard limit on names, text payloads, and array element counts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("string literal is {0} bytes, the wire format allows at most 255")]
    StringTooLong(usize),

    #[error("array literal has {0} elements, the wire format allows at most 255")]
    ArrayTooLong(usize),

    #[error("name '{name}' is {len} bytes, the wire format allows at most 255")]
    NameTooLong { name: String, len: usize },
}
