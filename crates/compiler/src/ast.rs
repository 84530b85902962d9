//! Typed syntax tree and bytecode emission.
//!
//! The tree owns its children and lives only between parsing and
//! compilation; the emitted [`Program`] is the sole artifact needed at
//! evaluation time. Emission is post-order (operands first, operator
//! last) and byte-exact for a given tree.

use std::fmt;

use tracing::debug;

use crate::error::CompileError;
use crate::operators::{CompareOp, LogicalOp};
use sift_common::{literal, Opcode, Program, Value};

/// Right-hand operand of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A single literal, for the scalar operators.
    Single(Value),
    /// An ordered list of literals, for set membership.
    Many(Vec<Value>),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Single(value) => write!(f, "{value}"),
            Operand::Many(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// One node of the filter syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `field OP value` or `field IN v1,v2,...`
    Comparison {
        field: String,
        op: CompareOp,
        rhs: Operand,
    },
    /// A binary connective over two subtrees.
    Logical {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Logical negation of a subtree.
    Not(Box<Node>),
}

impl Node {
    pub fn comparison(field: &str, op: CompareOp, rhs: Operand) -> Node {
        Node::Comparison {
            field: field.to_string(),
            op,
            rhs,
        }
    }

    pub fn logical(op: LogicalOp, left: Node, right: Node) -> Node {
        Node::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn not(inner: Node) -> Node {
        Node::Not(Box::new(inner))
    }

    fn emit(&self, out: &mut Vec<u8>) -> Result<(), CompileError> {
        match self {
            Node::Comparison { field, op, rhs } => {
                out.push(Opcode::LoadGlobal as u8);
                literal::encode_name(field, out)?;
                out.push(Opcode::Push as u8);
                match rhs {
                    Operand::Single(value) => literal::encode_value(value, out)?,
                    Operand::Many(values) => literal::encode_array(values, out)?,
                }
                out.push(op.opcode() as u8);
                Ok(())
            }
            Node::Logical { op, left, right } => {
                left.emit(out)?;
                right.emit(out)?;
                out.push(op.opcode() as u8);
                Ok(())
            }
            Node::Not(inner) => {
                inner.emit(out)?;
                out.push(Opcode::OpNot as u8);
                Ok(())
            }
        }
    }
}

/// A parsed filter expression.
///
/// `Display` renders the tree one node per line with box-drawing
/// connectors, which is handy when debugging operator precedence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ast {
    root: Option<Node>,
}

impl Ast {
    pub(crate) fn new(root: Node) -> Self {
        Self { root: Some(root) }
    }

    /// The root node, if the tree is non-empty.
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Lower the tree to a bytecode program.
    ///
    /// Deterministic: the same tree always yields byte-identical output.
    pub fn compile(&self) -> Result<Program, CompileError> {
        let root = self.root.as_ref().ok_or(CompileError::EmptyTree)?;
        let mut out = Vec::new();
        root.emit(&mut out)?;
        debug!(bytes = out.len(), "compiled filter expression");
        Ok(Program::new(out))
    }
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(node) => write_tree(f, node, "", true),
            None => Ok(()),
        }
    }
}

fn write_tree(f: &mut fmt::Formatter<'_>, node: &Node, prefix: &str, is_last: bool) -> fmt::Result {
    let connector = if is_last { "└── " } else { "├── " };
    let ext = if is_last { "    " } else { "│   " };
    match node {
        Node::Logical { op, left, right } => {
            writeln!(f, "{prefix}{connector}{op}")?;
            write_tree(f, left, &format!("{prefix}{ext}"), false)?;
            write_tree(f, right, &format!("{prefix}{ext}"), true)
        }
        Node::Not(inner) => {
            writeln!(f, "{prefix}{connector}NOT")?;
            write_tree(f, inner, &format!("{prefix}{ext}"), true)
        }
        Node::Comparison { field, op, rhs } => {
            writeln!(f, "{prefix}{connector}{field} {op} {rhs}")
        }
    }
}
