//! Runtime and load errors for the sift VM.
//!
//! Every runtime error carries `at`, the byte offset of the opcode whose
//! execution failed.

use sift_common::DecodeError;
use thiserror::Error;

/// A failure reported by a native function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct NativeError(pub String);

/// Errors that occur while executing bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Pop on an empty (or too shallow) stack.
    #[error("stack underflow at offset {at}")]
    StackUnderflow { at: usize },

    /// A byte in opcode position is not a known opcode.
    #[error("unknown opcode {byte:#04x} at offset {at}")]
    UnknownOpcode { at: usize, byte: u8 },

    /// An inline operand (literal, name, native index) failed to decode.
    #[error("malformed operand at offset {at}: {source}")]
    BadOperand {
        at: usize,
        #[source]
        source: DecodeError,
    },

    /// `LOAD_GLOBAL` on a name absent from the globals map.
    #[error("undefined global '{name}' at offset {at}")]
    UndefinedGlobal { at: usize, name: String },

    /// A comparison between values with different tags.
    #[error("cannot compare different types in {op} at offset {at}")]
    CompareMismatch { at: usize, op: &'static str },

    /// A text operator applied to non-text operands.
    #[error("{op} requires string operands at offset {at}")]
    StringOperands { at: usize, op: &'static str },

    /// A logical connective applied to non-boolean operands.
    #[error("{op} requires boolean operands at offset {at}")]
    BooleanOperands { at: usize, op: &'static str },

    /// `OP_IN` with a non-array right operand.
    #[error("OP_IN requires an array as right operand at offset {at}")]
    ArrayOperand { at: usize },

    /// `CALL_NATIVE` with an index past the native table.
    #[error("native function index {index} out of bounds at offset {at}")]
    UnknownNative { at: usize, index: usize },

    /// A native function returned an error.
    #[error("native function failed at offset {at}: {source}")]
    NativeFailed {
        at: usize,
        #[source]
        source: NativeError,
    },

    /// Execution finished with an empty stack.
    #[error("program finished with an empty stack")]
    NoResult,

    /// Execution finished with more than one value on the stack.
    #[error("program finished with {count} values on the stack (expected 1)")]
    ExcessResults { count: usize },

    /// Execution finished with a non-boolean on the stack.
    #[error("program result is {tag}, expected BOOL")]
    NonBooleanResult { tag: &'static str },
}

/// Errors that occur while loading a record into the globals map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// Record integers must fit the widest literal width.
    #[error("field '{field}': integer {value} does not fit in 32 bits")]
    IntOutOfRange { field: String, value: i64 },
}
