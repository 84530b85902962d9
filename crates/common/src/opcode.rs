//! Opcode definitions for the sift instruction set.

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// Opcodes are single bytes; the `#[repr(u8)]` attribute pins each variant
/// to its wire value. `PUSH`, `STORE_GLOBAL`, `LOAD_GLOBAL`, and
/// `CALL_NATIVE` read inline operands after the opcode byte; every other
/// opcode works purely on the data stack.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Stack and globals
    /// Decode the typed literal that follows and push it.
    Push = 0x00,
    /// Drop the top of stack.
    Pop = 0x01,
    /// Decode a name and a typed literal, write the value to globals.
    StoreGlobal = 0x02,
    /// Decode a name, look it up in globals, push the value.
    LoadGlobal = 0x03,
    /// Decode `(index, argc)`, pop argc values, call the native, push result.
    CallNative = 0x04,

    // Comparisons: pop right, pop left, push a boolean
    OpEq = 0x05,
    OpGt = 0x06,
    OpLt = 0x07,
    OpGte = 0x08,
    OpLte = 0x09,

    // Text operators: both operands must be text
    OpStartswith = 0x0A,
    OpEndswith = 0x0B,
    OpContains = 0x0C,
    /// Membership: right operand must be an array.
    OpIn = 0x0D,

    // Logical connectives: operands must be booleans
    OpAnd = 0x0E,
    OpOr = 0x0F,
    OpXor = 0x10,
    OpNot = 0x11,
}

/// All valid opcodes, in wire order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 18] = [
    Opcode::Push,
    Opcode::Pop,
    Opcode::StoreGlobal,
    Opcode::LoadGlobal,
    Opcode::CallNative,
    Opcode::OpEq,
    Opcode::OpGt,
    Opcode::OpLt,
    Opcode::OpGte,
    Opcode::OpLte,
    Opcode::OpStartswith,
    Opcode::OpEndswith,
    Opcode::OpContains,
    Opcode::OpIn,
    Opcode::OpAnd,
    Opcode::OpOr,
    Opcode::OpXor,
    Opcode::OpNot,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x00 => Ok(Opcode::Push),
            0x01 => Ok(Opcode::Pop),
            0x02 => Ok(Opcode::StoreGlobal),
            0x03 => Ok(Opcode::LoadGlobal),
            0x04 => Ok(Opcode::CallNative),
            0x05 => Ok(Opcode::OpEq),
            0x06 => Ok(Opcode::OpGt),
            0x07 => Ok(Opcode::OpLt),
            0x08 => Ok(Opcode::OpGte),
            0x09 => Ok(Opcode::OpLte),
            0x0A => Ok(Opcode::OpStartswith),
            0x0B => Ok(Opcode::OpEndswith),
            0x0C => Ok(Opcode::OpContains),
            0x0D => Ok(Opcode::OpIn),
            0x0E => Ok(Opcode::OpAnd),
            0x0F => Ok(Opcode::OpOr),
            0x10 => Ok(Opcode::OpXor),
            0x11 => Ok(Opcode::OpNot),
            _ => Err(DecodeError::UnknownOpcode { byte }),
        }
    }
}

impl Opcode {
    /// Returns the canonical mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::StoreGlobal => "STORE_GLOBAL",
            Opcode::LoadGlobal => "LOAD_GLOBAL",
            Opcode::CallNative => "CALL_NATIVE",
            Opcode::OpEq => "OP_EQ",
            Opcode::OpGt => "OP_GT",
            Opcode::OpLt => "OP_LT",
            Opcode::OpGte => "OP_GTE",
            Opcode::OpLte => "OP_LTE",
            Opcode::OpStartswith => "OP_STARTSWITH",
            Opcode::OpEndswith => "OP_ENDSWITH",
            Opcode::OpContains => "OP_CONTAINS",
            Opcode::OpIn => "OP_IN",
            Opcode::OpAnd => "OP_AND",
            Opcode::OpOr => "OP_OR",
            Opcode::OpXor => "OP_XOR",
            Opcode::OpNot => "OP_NOT",
        }
    }

    /// True for the operators that pop operands and push a comparison result.
    pub fn is_comparison(&self) -> bool {
        (Opcode::OpEq as u8..=Opcode::OpIn as u8).contains(&(*self as u8))
    }

    /// True for the boolean connectives.
    pub fn is_logical(&self) -> bool {
        (Opcode::OpAnd as u8..=Opcode::OpNot as u8).contains(&(*self as u8))
    }
}
