//! Main execution loop and opcode dispatch.

use std::cmp::Ordering;

use tracing::trace;

use crate::error::RuntimeError;
use crate::machine::Vm;
use sift_common::{literal, DecodeError, Opcode, Value};

impl<'p> Vm<'p> {
    /// Run from the current counter to the end of the bytecode.
    ///
    /// A well-formed program leaves exactly one boolean on the stack;
    /// read it with [`Vm::finish`]. The first failing opcode aborts
    /// execution and is reported with its byte offset.
    pub fn execute(&mut self) -> Result<(), RuntimeError> {
        let bytes = self.program.as_bytes();
        while self.pc < bytes.len() {
            let at = self.pc;
            let byte = bytes[at];
            let opcode =
                Opcode::try_from(byte).map_err(|_| RuntimeError::UnknownOpcode { at, byte })?;
            self.pc += 1;
            trace!(offset = at, op = opcode.mnemonic(), "dispatch");

            match opcode {
                Opcode::Push => self.exec_push(at)?,
                Opcode::Pop => {
                    self.pop(at)?;
                }
                Opcode::StoreGlobal => self.exec_store_global(at)?,
                Opcode::LoadGlobal => self.exec_load_global(at)?,
                Opcode::CallNative => self.exec_call_native(at)?,

                Opcode::OpEq => self.exec_compare(at, opcode, |ord| ord == Ordering::Equal)?,
                Opcode::OpGt => self.exec_compare(at, opcode, |ord| ord == Ordering::Greater)?,
                Opcode::OpLt => self.exec_compare(at, opcode, |ord| ord == Ordering::Less)?,
                Opcode::OpGte => self.exec_compare(at, opcode, |ord| ord != Ordering::Less)?,
                Opcode::OpLte => self.exec_compare(at, opcode, |ord| ord != Ordering::Greater)?,

                Opcode::OpStartswith => self.exec_text(at, opcode, |s, n| s.starts_with(n))?,
                Opcode::OpEndswith => self.exec_text(at, opcode, |s, n| s.ends_with(n))?,
                Opcode::OpContains => self.exec_text(at, opcode, |s, n| s.contains(n))?,
                Opcode::OpIn => self.exec_in(at)?,

                Opcode::OpAnd => self.exec_logical(at, opcode, |a, b| a && b)?,
                Opcode::OpOr => self.exec_logical(at, opcode, |a, b| a || b)?,
                Opcode::OpXor => self.exec_logical(at, opcode, |a, b| a != b)?,
                Opcode::OpNot => self.exec_not(at)?,
            }
        }
        Ok(())
    }

    fn exec_push(&mut self, at: usize) -> Result<(), RuntimeError> {
        let value = literal::decode_value(self.program.as_bytes(), &mut self.pc)
            .map_err(|source| RuntimeError::BadOperand { at, source })?;
        self.stack.push(value);
        Ok(())
    }

    fn exec_store_global(&mut self, at: usize) -> Result<(), RuntimeError> {
        let bytes = self.program.as_bytes();
        let name = literal::decode_name(bytes, &mut self.pc)
            .map_err(|source| RuntimeError::BadOperand { at, source })?;
        // Decode the value fully before touching the globals map, so a
        // malformed literal leaves no partial write behind.
        let value = literal::decode_value(bytes, &mut self.pc)
            .map_err(|source| RuntimeError::BadOperand { at, source })?;
        self.globals.insert(name, value);
        Ok(())
    }

    fn exec_load_global(&mut self, at: usize) -> Result<(), RuntimeError> {
        let name = literal::decode_name(self.program.as_bytes(), &mut self.pc)
            .map_err(|source| RuntimeError::BadOperand { at, source })?;
        match self.globals.get(&name) {
            Some(value) => {
                self.stack.push(value.clone());
                Ok(())
            }
            None => Err(RuntimeError::UndefinedGlobal { at, name }),
        }
    }

    fn exec_call_native(&mut self, at: usize) -> Result<(), RuntimeError> {
        let index = self.operand_byte(at)? as usize;
        let argc = self.operand_byte(at)? as usize;
        if index >= self.natives.len() {
            return Err(RuntimeError::UnknownNative { at, index });
        }
        let args = self.pop_n(argc, at)?;
        let result = (self.natives[index])(&args)
            .map_err(|source| RuntimeError::NativeFailed { at, source })?;
        self.stack.push(result);
        Ok(())
    }

    /// Binary three-way comparison: pop right, pop left, push a boolean.
    fn exec_compare(
        &mut self,
        at: usize,
        op: Opcode,
        pred: fn(Ordering) -> bool,
    ) -> Result<(), RuntimeError> {
        let right = self.pop(at)?;
        let left = self.pop(at)?;
        let ord = left
            .compare(&right)
            .ok_or(RuntimeError::CompareMismatch {
                at,
                op: op.mnemonic(),
            })?;
        self.stack.push(Value::Bool(pred(ord)));
        Ok(())
    }

    /// Text operators: both operands must be strings.
    fn exec_text(
        &mut self,
        at: usize,
        op: Opcode,
        test: fn(&str, &str) -> bool,
    ) -> Result<(), RuntimeError> {
        let needle = self.pop(at)?;
        let subject = self.pop(at)?;
        match (&subject, &needle) {
            (Value::Str(s), Value::Str(n)) => {
                self.stack.push(Value::Bool(test(s, n)));
                Ok(())
            }
            _ => Err(RuntimeError::StringOperands {
                at,
                op: op.mnemonic(),
            }),
        }
    }

    /// Membership: a scalar needle matches any equal element; an array
    /// needle matches when the intersection is non-empty. Element
    /// comparisons against a mismatched tag are an error, not a miss.
    fn exec_in(&mut self, at: usize) -> Result<(), RuntimeError> {
        let haystack = self.pop(at)?;
        let needle = self.pop(at)?;
        let Value::Array(haystack) = haystack else {
            return Err(RuntimeError::ArrayOperand { at });
        };

        let needles = match &needle {
            Value::Array(items) => items.as_slice(),
            scalar => std::slice::from_ref(scalar),
        };

        let mut found = false;
        'search: for n in needles {
            for item in &haystack {
                let ord = n.compare(item).ok_or(RuntimeError::CompareMismatch {
                    at,
                    op: Opcode::OpIn.mnemonic(),
                })?;
                if ord == Ordering::Equal {
                    found = true;
                    break 'search;
                }
            }
        }
        self.stack.push(Value::Bool(found));
        Ok(())
    }

    /// Boolean connectives: pop right, pop left, push the combination.
    fn exec_logical(
        &mut self,
        at: usize,
        op: Opcode,
        apply: fn(bool, bool) -> bool,
    ) -> Result<(), RuntimeError> {
        let right = self.pop(at)?;
        let left = self.pop(at)?;
        match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => {
                self.stack.push(Value::Bool(apply(a, b)));
                Ok(())
            }
            _ => Err(RuntimeError::BooleanOperands {
                at,
                op: op.mnemonic(),
            }),
        }
    }

    fn exec_not(&mut self, at: usize) -> Result<(), RuntimeError> {
        match self.pop(at)? {
            Value::Bool(b) => {
                self.stack.push(Value::Bool(!b));
                Ok(())
            }
            _ => Err(RuntimeError::BooleanOperands {
                at,
                op: Opcode::OpNot.mnemonic(),
            }),
        }
    }

    /// Read one inline operand byte at the counter.
    fn operand_byte(&mut self, at: usize) -> Result<u8, RuntimeError> {
        let byte = self
            .program
            .as_bytes()
            .get(self.pc)
            .copied()
            .ok_or(RuntimeError::BadOperand {
                at,
                source: DecodeError::UnexpectedEnd { at: self.pc },
            })?;
        self.pc += 1;
        Ok(byte)
    }
}
