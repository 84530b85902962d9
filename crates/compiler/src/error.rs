//! Error types for parsing and compilation.
//!
//! Every parse error carries the byte position of the failure and a short
//! window of the surrounding source text.

use sift_common::EncodeError;
use thiserror::Error;

/// Errors produced while parsing filter text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `)` with no matching `(`.
    #[error("unmatched ')' at position {pos} (context: ...{context}...)")]
    UnmatchedClose { pos: usize, context: String },

    /// One or more `(` never closed before end of input.
    #[error("{count} unclosed '(' at positions {positions:?} (context: ...{context}...)")]
    UnclosedParens {
        count: usize,
        positions: Vec<usize>,
        context: String,
    },

    /// No comparison operator in a term that needs one.
    #[error("no comparison operator at position {pos} (context: ...{context}...)")]
    MissingOperator { pos: usize, context: String },

    /// A comparison operator with nothing on its left.
    #[error("missing field before operator at position {pos} (context: ...{context}...)")]
    MissingField { pos: usize, context: String },

    /// Two comparison operators back to back, e.g. `a==b`.
    #[error("double operator at position {pos} (context: ...{context}...)")]
    DoubleOperator { pos: usize, context: String },

    /// A field name containing a comparison-operator lexeme.
    #[error("operator inside field name at position {pos} (context: ...{context}...)")]
    OperatorInField { pos: usize, context: String },

    /// A quoted value with no closing quote.
    #[error("unterminated quote at position {pos} (context: ...{context}...)")]
    UnterminatedQuote { pos: usize, context: String },

    /// A `\` with nothing after it.
    #[error("dangling escape at position {pos} (context: ...{context}...)")]
    DanglingEscape { pos: usize, context: String },

    /// A scalar operator given a comma-separated list.
    #[error("operator {op} expects a single value, got {count} at position {pos} (context: ...{context}...)")]
    ExpectedSingleValue {
        op: &'static str,
        count: usize,
        pos: usize,
        context: String,
    },

    /// A field name longer than the wire format allows.
    #[error("field name is {len} bytes at position {pos}, the wire format allows at most 255")]
    FieldTooLong { pos: usize, len: usize },
}

/// Errors produced while lowering a syntax tree to bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The tree has no root node.
    #[error("cannot compile an empty syntax tree")]
    EmptyTree,

    /// A literal or name does not fit the wire format.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}
