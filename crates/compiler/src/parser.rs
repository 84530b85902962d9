//! Recursive-descent parser for the filter language.
//!
//! The language has no mandatory whitespace: field names, operator
//! keywords, and operand literals abut (`roleINadmin,moderator^status=active`).
//! Each recursion step works on a byte range of the original input so
//! every error reports an absolute position.

use tracing::debug;

use crate::ast::{Ast, Node, Operand};
use crate::error::ParseError;
use crate::operators::{CompareOp, COMPARE_SCAN_ORDER, LOGICAL_SCAN_ORDER};
use crate::scan::{
    check_parens, find_outside, find_outside_quotes, snippet, split_values, strip_outer_parens,
};
use sift_common::Value;

/// Field names must fit the single-byte length prefix of the name encoding.
const MAX_FIELD_LEN: usize = 255;

/// Parse filter text into a syntax tree.
///
/// Parenthesis balance is validated over the whole input before any
/// structural parsing. Parsing is a pure function of its input: the same
/// text always produces the same tree.
pub fn parse(text: &str) -> Result<Ast, ParseError> {
    check_parens(text)?;
    let root = parse_expr(text, 0, text.len())?;
    debug!(len = text.len(), "parsed filter expression");
    Ok(Ast::new(root))
}

fn parse_expr(src: &str, lo: usize, hi: usize) -> Result<Node, ParseError> {
    let (lo, hi) = trim_range(src, lo, hi);
    let expr = &src[lo..hi];

    // A fully parenthesized expression is the inner expression.
    if strip_outer_parens(expr).is_some() {
        return parse_expr(src, lo + 1, hi - 1);
    }

    // Split on the lowest-precedence connective present at depth 0.
    for op in LOGICAL_SCAN_ORDER {
        if let Some(rel) = find_outside(expr, op.lexeme()) {
            let split = lo + rel;
            let left = parse_expr(src, lo, split)?;
            let right = parse_expr(src, split + op.lexeme().len(), hi)?;
            return Ok(Node::logical(op, left, right));
        }
    }

    // Prefix negation, including `!!` and `!(...)`.
    if expr.starts_with('!') {
        let inner = parse_expr(src, lo + 1, hi)?;
        return Ok(Node::not(inner));
    }

    parse_comparison(src, lo, hi)
}

fn parse_comparison(src: &str, lo: usize, hi: usize) -> Result<Node, ParseError> {
    let (lo, hi) = trim_range(src, lo, hi);
    let expr = &src[lo..hi];

    let mut found = None;
    for op in COMPARE_SCAN_ORDER {
        let negated = format!("!{}", op.lexeme());
        if let Some(rel) = find_outside_quotes(expr, &negated) {
            found = Some((op, rel, true));
            break;
        }
        if let Some(rel) = find_outside_quotes(expr, op.lexeme()) {
            found = Some((op, rel, false));
            break;
        }
    }

    let Some((op, rel, negated)) = found else {
        return Err(ParseError::MissingOperator {
            pos: lo,
            context: snippet(src, lo),
        });
    };

    if rel == 0 {
        return Err(ParseError::MissingField {
            pos: lo,
            context: snippet(src, lo),
        });
    }

    let op_len = op.lexeme().len() + usize::from(negated);
    let after = lo + rel + op_len;

    // Another operator directly after the accepted one (`a==b`) is malformed.
    if after < hi {
        let rest = &src[after..hi];
        if COMPARE_SCAN_ORDER
            .iter()
            .any(|other| rest.starts_with(other.lexeme()))
        {
            return Err(ParseError::DoubleOperator {
                pos: after,
                context: snippet(src, after),
            });
        }
    }

    let (field_lo, field_hi) = trim_range(src, lo, lo + rel);
    let field = &src[field_lo..field_hi];
    // The scan picks the longest operator anywhere in the term, so a
    // shorter lexeme left of it would otherwise end up inside the field.
    if COMPARE_SCAN_ORDER
        .iter()
        .any(|other| find_outside_quotes(field, other.lexeme()).is_some())
    {
        return Err(ParseError::OperatorInField {
            pos: field_lo,
            context: snippet(src, field_lo),
        });
    }
    if field.len() > MAX_FIELD_LEN {
        return Err(ParseError::FieldTooLong {
            pos: field_lo,
            len: field.len(),
        });
    }

    // The right side is trimmed as a whole before splitting; quoted
    // values keep their interior whitespace.
    let (val_lo, val_hi) = trim_range(src, after, hi);
    let mut values = split_values(src, val_lo, val_hi)?;
    let rhs = if op == CompareOp::In {
        Operand::Many(values.into_iter().map(Value::Str).collect())
    } else if values.len() == 1 {
        Operand::Single(Value::Str(values.swap_remove(0)))
    } else {
        return Err(ParseError::ExpectedSingleValue {
            op: op.lexeme(),
            count: values.len(),
            pos: val_lo,
            context: snippet(src, val_lo),
        });
    };

    let node = Node::comparison(field, op, rhs);
    Ok(if negated { Node::not(node) } else { node })
}

/// Shrink a byte range past surrounding whitespace.
fn trim_range(src: &str, lo: usize, hi: usize) -> (usize, usize) {
    let s = &src[lo..hi];
    let start = s.len() - s.trim_start().len();
    let end = s.trim_end().len().max(start);
    (lo + start, lo + end)
}
