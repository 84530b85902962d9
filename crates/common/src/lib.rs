//! sift common types and wire encoding.
//!
//! This crate provides the foundational data structures shared by the
//! filter compiler and the virtual machine:
//!
//! - [`Value`] — tagged runtime value (bool, narrow integers, text, array)
//! - [`TypeTag`] — the one-byte kind discriminant used on the wire
//! - [`Opcode`] — the instruction set, one byte per opcode
//! - [`literal`] — the `[tag][len][payload]` literal codec
//! - [`Program`] — an immutable compiled bytecode sequence
//! - [`DecodeError`] / [`EncodeError`] — wire-format failures
//!
//! # Dependencies
//!
//! This crate uses `thiserror` (compile-time proc-macro, zero runtime
//! cost) and has no other dependencies.

pub mod error;
pub mod literal;
pub mod opcode;
pub mod program;
pub mod type_tag;
pub mod value;

// Re-export commonly used types at the crate root.
pub use error::{DecodeError, EncodeError};
pub use opcode::Opcode;
pub use program::Program;
pub use type_tag::TypeTag;
pub use value::Value;
