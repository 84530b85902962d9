//! sift — one-line filter predicates over records.
//!
//! The pipeline is `text → parser → syntax tree → bytecode → VM →
//! boolean`. [`Expression`] wires the phases together; the underlying
//! crates (`sift-compiler`, `sift-vm`, `sift-common`) stay usable on
//! their own for callers that want the syntax tree or hand-built
//! bytecode.
//!
//! # Usage
//!
//! ```
//! use sift::{Expression, Record};
//!
//! let mut expr = Expression::new();
//! expr.parse("roleINadmin,moderator^status=active").unwrap();
//!
//! let record: Record = [
//!     ("role".to_string(), "moderator".into()),
//!     ("status".to_string(), "active".into()),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert!(expr.eval(&record).unwrap());
//! ```
//!
//! A compiled [`Program`] is immutable and may be shared across threads;
//! each worker evaluates with its own VM. One `Expression` must not be
//! evaluated concurrently from several threads — clone it instead (the
//! clone shares nothing mutable).

use thiserror::Error;
use tracing::debug;

pub use sift_common::{Program, Value};
pub use sift_compiler::{Ast, CompileError, ParseError};
pub use sift_vm::{FieldValue, LoadError, NativeError, RuntimeError, Record, Vm};

/// Any failure across the parse → compile → load → execute pipeline.
///
/// Each phase's error is surfaced verbatim; the façade adds only the
/// not-parsed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// `eval` called before a successful `parse`.
    #[error("expression not parsed yet")]
    NotParsed,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// A reusable compiled predicate.
///
/// `parse` stores the compiled bytecode; `eval` runs it against a record
/// on a fresh VM, so one expression can be evaluated against any number
/// of records.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    program: Option<Program>,
}

impl Expression {
    /// An expression with nothing parsed yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and compile filter text, replacing any previous program.
    pub fn parse(&mut self, text: &str) -> Result<(), Error> {
        let ast = sift_compiler::parse(text)?;
        let program = ast.compile()?;
        debug!(bytes = program.len(), "expression ready");
        self.program = Some(program);
        Ok(())
    }

    /// The compiled program, once `parse` has succeeded.
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// Evaluate the stored program against one record.
    pub fn eval(&self, record: &Record) -> Result<bool, Error> {
        let program = self.program.as_ref().ok_or(Error::NotParsed)?;
        let mut vm = Vm::new(program);
        vm.load_record(record)?;
        vm.execute()?;
        Ok(vm.finish()?)
    }
}

/// One-shot convenience: parse, compile, and evaluate in a single call.
pub fn evaluate(text: &str, record: &Record) -> Result<bool, Error> {
    let mut expr = Expression::new();
    expr.parse(text)?;
    expr.eval(record)
}
