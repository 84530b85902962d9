//! Operator lexemes and their opcode mappings.

use std::fmt;

use sift_common::Opcode;

/// Comparison operators of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
    StartsWith,
    EndsWith,
    Contains,
    In,
}

impl CompareOp {
    /// The exact source-text lexeme. Case-sensitive.
    pub fn lexeme(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Gte => ">=",
            CompareOp::Lte => "<=",
            CompareOp::StartsWith => "STARTSWITH",
            CompareOp::EndsWith => "ENDSWITH",
            CompareOp::Contains => "CONTAINS",
            CompareOp::In => "IN",
        }
    }

    /// The opcode this operator lowers to.
    pub fn opcode(&self) -> Opcode {
        match self {
            CompareOp::Eq => Opcode::OpEq,
            CompareOp::Gt => Opcode::OpGt,
            CompareOp::Lt => Opcode::OpLt,
            CompareOp::Gte => Opcode::OpGte,
            CompareOp::Lte => Opcode::OpLte,
            CompareOp::StartsWith => Opcode::OpStartswith,
            CompareOp::EndsWith => Opcode::OpEndswith,
            CompareOp::Contains => Opcode::OpContains,
            CompareOp::In => Opcode::OpIn,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme())
    }
}

/// Scan order for comparison operators: longest lexeme first, so `>=`
/// wins over `>` and `CONTAINS` wins over the `IN` it contains.
pub const COMPARE_SCAN_ORDER: [CompareOp; 9] = [
    CompareOp::StartsWith,
    CompareOp::EndsWith,
    CompareOp::Contains,
    CompareOp::In,
    CompareOp::Gte,
    CompareOp::Lte,
    CompareOp::Gt,
    CompareOp::Lt,
    CompareOp::Eq,
];

/// Logical connectives of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Xor,
}

impl LogicalOp {
    /// The exact source-text lexeme.
    pub fn lexeme(&self) -> &'static str {
        match self {
            LogicalOp::And => "^",
            LogicalOp::Or => "^OR",
            LogicalOp::Xor => "^XOR",
        }
    }

    /// The opcode this connective lowers to.
    pub fn opcode(&self) -> Opcode {
        match self {
            LogicalOp::And => Opcode::OpAnd,
            LogicalOp::Or => Opcode::OpOr,
            LogicalOp::Xor => Opcode::OpXor,
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lexeme())
    }
}

/// Scan order for logical splits: lowest precedence first, so the split
/// found becomes the root of the subtree. AND binds tightest, then XOR,
/// then OR. `^` must be scanned last since it prefixes the other two
/// lexemes; `^OR` can never falsely match inside `^XOR` because that
/// lexeme has no `^O` adjacency.
pub const LOGICAL_SCAN_ORDER: [LogicalOp; 3] = [LogicalOp::Or, LogicalOp::Xor, LogicalOp::And];
