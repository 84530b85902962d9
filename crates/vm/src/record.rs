//! The record surface: dynamically-typed field values a predicate
//! evaluates against.
//!
//! Unsupported kinds (floats, null, structured objects) are
//! unrepresentable by construction; the one remaining load failure is an
//! integer outside the signed 32-bit range.

use std::collections::BTreeMap;

use crate::error::LoadError;
use sift_common::Value;

/// A single field value in a record. Lists nest recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<FieldValue>),
}

/// A record: field name → value.
pub type Record = BTreeMap<String, FieldValue>;

impl FieldValue {
    /// Convert to a runtime value, narrowing integers to the smallest
    /// signed width that holds them. `field` is only for error context.
    pub(crate) fn to_value(&self, field: &str) -> Result<Value, LoadError> {
        match self {
            FieldValue::Bool(b) => Ok(Value::Bool(*b)),
            FieldValue::Int(n) => {
                let narrow = i32::try_from(*n).map_err(|_| LoadError::IntOutOfRange {
                    field: field.to_string(),
                    value: *n,
                })?;
                Ok(Value::int(narrow))
            }
            FieldValue::Str(s) => Ok(Value::Str(s.clone())),
            FieldValue::List(items) => items
                .iter()
                .map(|item| item.to_value(field))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Int(i64::from(n))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Str(s)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        FieldValue::List(items)
    }
}
