//! Runtime value representation.
//!
//! Values live on the VM data stack and in the globals map. Two values
//! are comparable only when their tags match; there is no implicit
//! coercion anywhere in the engine.

use std::cmp::Ordering;
use std::fmt;

use crate::type_tag::TypeTag;

/// A tagged runtime value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Signed 8-bit integer.
    I8(i8),
    /// Signed 16-bit integer.
    I16(i16),
    /// Signed 32-bit integer.
    I32(i32),
    /// UTF-8 text.
    Str(String),
    /// Ordered sequence of values; elements may nest arbitrarily.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Bool(_) => TypeTag::Bool,
            Value::I8(_) => TypeTag::I8,
            Value::I16(_) => TypeTag::I16,
            Value::I32(_) => TypeTag::I32,
            Value::Str(_) => TypeTag::Str,
            Value::Array(_) => TypeTag::Array,
        }
    }

    /// Builds an integer value in the smallest signed width that holds it.
    ///
    /// All integers in the engine are narrowed this way, both at record
    /// load and at literal encoding, so equal numbers always carry equal
    /// tags.
    pub fn int(n: i32) -> Value {
        if let Ok(v) = i8::try_from(n) {
            Value::I8(v)
        } else if let Ok(v) = i16::try_from(n) {
            Value::I16(v)
        } else {
            Value::I32(n)
        }
    }

    /// Three-way comparison. Returns `None` when the tags differ,
    /// including a tag mismatch between array elements.
    ///
    /// Ordering rules: `false < true`; integers numerically; text
    /// lexicographically by byte; arrays element-wise, with the first
    /// differing element deciding and the shorter array ranking lower
    /// when one is a prefix of the other.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::I8(a), Value::I8(b)) => Some(a.cmp(b)),
            (Value::I16(a), Value::I16(b)) => Some(a.cmp(b)),
            (Value::I32(a), Value::I32(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            (Value::Array(a), Value::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        diff => return Some(diff),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::I8(n) => write!(f, "{n}"),
            Value::I16(n) => write!(f, "{n}"),
            Value::I32(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}
