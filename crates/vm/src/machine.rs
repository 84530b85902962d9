//! VM state: program, counter, globals map, data stack, native table.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{LoadError, NativeError, RuntimeError};
use crate::record::Record;
use sift_common::{Program, Value};

/// A host function callable through `CALL_NATIVE`.
///
/// The parser never emits `CALL_NATIVE`; the table is an extension point
/// for callers that assemble bytecode themselves.
pub type NativeFn = Box<dyn Fn(&[Value]) -> Result<Value, NativeError>>;

/// The sift virtual machine.
///
/// Borrows the compiled program, which may be shared across any number of
/// machines. Everything else (counter, globals, stack) is per-execution
/// state, so one machine must not be driven from two threads at once —
/// the pattern for parallel evaluation is one `Vm` per worker over the
/// same `Program`.
pub struct Vm<'p> {
    pub(crate) program: &'p Program,
    pub(crate) pc: usize,
    pub(crate) globals: HashMap<String, Value>,
    pub(crate) stack: Vec<Value>,
    pub(crate) natives: Vec<NativeFn>,
}

impl<'p> Vm<'p> {
    /// Create a machine with an empty native table.
    pub fn new(program: &'p Program) -> Self {
        Self::with_natives(program, Vec::new())
    }

    /// Create a machine with a native-function table. The table is fixed
    /// for the machine's lifetime and survives [`Vm::reset`].
    pub fn with_natives(program: &'p Program, natives: Vec<NativeFn>) -> Self {
        Self {
            program,
            pc: 0,
            globals: HashMap::new(),
            stack: Vec::new(),
            natives,
        }
    }

    /// Populate the globals map from a record, narrowing integers and
    /// converting lists recursively.
    pub fn load_record(&mut self, record: &Record) -> Result<(), LoadError> {
        for (name, value) in record {
            let converted = value.to_value(name)?;
            self.globals.insert(name.clone(), converted);
        }
        debug!(fields = record.len(), "record loaded");
        Ok(())
    }

    /// Clear the counter, globals, and stack so the same machine can
    /// evaluate the program against another record. The native table is
    /// left intact.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.globals.clear();
        self.stack.clear();
    }

    /// The current data stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Look up a global by name.
    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    /// Read the result after execution: exactly one boolean on the stack.
    pub fn finish(&self) -> Result<bool, RuntimeError> {
        match self.stack.as_slice() {
            [Value::Bool(b)] => Ok(*b),
            [] => Err(RuntimeError::NoResult),
            [value] => Err(RuntimeError::NonBooleanResult {
                tag: value.type_tag().name(),
            }),
            values => Err(RuntimeError::ExcessResults {
                count: values.len(),
            }),
        }
    }

    pub(crate) fn pop(&mut self, at: usize) -> Result<Value, RuntimeError> {
        self.stack
            .pop()
            .ok_or(RuntimeError::StackUnderflow { at })
    }

    /// Pop `n` values, preserving their stack order in the result.
    pub(crate) fn pop_n(&mut self, n: usize, at: usize) -> Result<Vec<Value>, RuntimeError> {
        if self.stack.len() < n {
            return Err(RuntimeError::StackUnderflow { at });
        }
        Ok(self.stack.split_off(self.stack.len() - n))
    }
}
