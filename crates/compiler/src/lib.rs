//! sift filter-language front end: parser, syntax tree, and bytecode
//! emission.
//!
//! The language is a compact single-line predicate syntax with no
//! mandatory whitespace: `roleINadmin,moderator^status=active`. Parsing
//! produces an [`Ast`]; [`Ast::compile`] lowers it to a [`Program`] in
//! Reverse Polish order for the stack VM.
//!
//! # Usage
//!
//! ```
//! use sift_compiler::parse;
//!
//! let ast = parse("status=active^age>25").unwrap();
//! let program = ast.compile().unwrap();
//! assert!(!program.is_empty());
//! ```

pub mod ast;
pub mod error;
pub mod operators;
pub mod scan;

mod parser;

pub use ast::{Ast, Node, Operand};
pub use error::{CompileError, ParseError};
pub use operators::{CompareOp, LogicalOp};
pub use parser::parse;

pub use sift_common::Program;
