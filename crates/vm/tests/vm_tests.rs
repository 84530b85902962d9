//! Integration tests for the sift VM, organized by instruction group.
//!
//! Programs are assembled by hand from the wire format so the tests
//! exercise exactly the bytes the VM will see in production.

use sift_common::{literal, DecodeError, Opcode, Program, Value};
use sift_vm::{NativeError, NativeFn, Record, RuntimeError, Vm};

// ============================================================
// Helper functions
// ============================================================

fn load_global(name: &str) -> Vec<u8> {
    let mut bytes = vec![Opcode::LoadGlobal as u8];
    literal::encode_name(name, &mut bytes).unwrap();
    bytes
}

fn store_global(name: &str, value: &Value) -> Vec<u8> {
    let mut bytes = vec![Opcode::StoreGlobal as u8];
    literal::encode_name(name, &mut bytes).unwrap();
    literal::encode_value(value, &mut bytes).unwrap();
    bytes
}

fn push(value: &Value) -> Vec<u8> {
    let mut bytes = vec![Opcode::Push as u8];
    literal::encode_value(value, &mut bytes).unwrap();
    bytes
}

fn op(opcode: Opcode) -> Vec<u8> {
    vec![opcode as u8]
}

fn assemble(parts: Vec<Vec<u8>>) -> Program {
    Program::new(parts.concat())
}

fn str_value(s: &str) -> Value {
    Value::Str(s.to_string())
}

fn record(fields: &[(&str, &str)]) -> Record {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), (*value).into()))
        .collect()
}

/// Execute a program with no record and read the boolean result.
fn run(program: &Program) -> Result<bool, RuntimeError> {
    let mut vm = Vm::new(program);
    vm.execute()?;
    vm.finish()
}

// ============================================================
// Stack and globals
// ============================================================

#[test]
fn empty_program_leaves_empty_stack() {
    let program = Program::new(vec![]);
    assert_eq!(run(&program), Err(RuntimeError::NoResult));
}

#[test]
fn push_then_pop_leaves_nothing() {
    let program = assemble(vec![
        push(&Value::Bool(true)),
        push(&str_value("x")),
        op(Opcode::Pop),
    ]);
    let mut vm = Vm::new(&program);
    vm.execute().unwrap();
    assert_eq!(vm.stack(), &[Value::Bool(true)]);
}

#[test]
fn pop_on_empty_stack_underflows() {
    let program = assemble(vec![op(Opcode::Pop)]);
    let mut vm = Vm::new(&program);
    assert_eq!(
        vm.execute(),
        Err(RuntimeError::StackUnderflow { at: 0 })
    );
}

#[test]
fn store_global_then_load_global() {
    let program = assemble(vec![
        store_global("flag", &Value::Bool(true)),
        load_global("flag"),
    ]);
    assert_eq!(run(&program), Ok(true));
}

#[test]
fn load_global_from_record() {
    let program = assemble(vec![
        load_global("status"),
        push(&str_value("active")),
        op(Opcode::OpEq),
    ]);
    let mut vm = Vm::new(&program);
    vm.load_record(&record(&[("status", "active")])).unwrap();
    vm.execute().unwrap();
    assert!(vm.finish().unwrap());
}

#[test]
fn load_global_unknown_name_fails() {
    let program = assemble(vec![load_global("missing")]);
    let mut vm = Vm::new(&program);
    assert_eq!(
        vm.execute(),
        Err(RuntimeError::UndefinedGlobal {
            at: 0,
            name: "missing".to_string()
        })
    );
}

#[test]
fn unknown_opcode_reports_byte_and_offset() {
    let program = Program::new(vec![0x00, 0x00, 1, 1, 0x7F]);
    let mut vm = Vm::new(&program);
    assert_eq!(
        vm.execute(),
        Err(RuntimeError::UnknownOpcode { at: 4, byte: 0x7F })
    );
}

#[test]
fn truncated_literal_is_a_bad_operand() {
    // PUSH of a string claiming 9 bytes with only 2 present.
    let program = Program::new(vec![0x00, 0x04, 9, b'h', b'i']);
    let mut vm = Vm::new(&program);
    assert!(matches!(
        vm.execute(),
        Err(RuntimeError::BadOperand {
            at: 0,
            source: DecodeError::UnexpectedEnd { .. }
        })
    ));
}

#[test]
fn malformed_store_leaves_globals_untouched() {
    // STORE_GLOBAL with a truncated value literal, then LOAD_GLOBAL of
    // the same name: the store must not have committed.
    let mut bytes = vec![Opcode::StoreGlobal as u8];
    literal::encode_name("x", &mut bytes).unwrap();
    bytes.extend_from_slice(&[0x04, 9, b'h']); // truncated STR payload
    let program = Program::new(bytes);

    let mut vm = Vm::new(&program);
    assert!(matches!(
        vm.execute(),
        Err(RuntimeError::BadOperand { .. })
    ));
    assert!(vm.global("x").is_none());
}

// ============================================================
// Comparisons
// ============================================================

#[test]
fn integer_comparisons() {
    let cases = [
        (Opcode::OpEq, 5, 5, true),
        (Opcode::OpEq, 5, 6, false),
        (Opcode::OpGt, 7, 5, true),
        (Opcode::OpGt, 5, 7, false),
        (Opcode::OpLt, 5, 7, true),
        (Opcode::OpGte, 5, 5, true),
        (Opcode::OpGte, 4, 5, false),
        (Opcode::OpLte, 5, 5, true),
        (Opcode::OpLte, 6, 5, false),
    ];
    for (opcode, left, right, expected) in cases {
        let program = assemble(vec![
            push(&Value::int(left)),
            push(&Value::int(right)),
            op(opcode),
        ]);
        assert_eq!(
            run(&program),
            Ok(expected),
            "{left} {} {right}",
            opcode.mnemonic()
        );
    }
}

#[test]
fn string_comparison_is_lexicographic() {
    let program = assemble(vec![
        push(&str_value("30")),
        push(&str_value("25")),
        op(Opcode::OpGt),
    ]);
    assert_eq!(run(&program), Ok(true));

    let program = assemble(vec![
        push(&str_value("20")),
        push(&str_value("25")),
        op(Opcode::OpGt),
    ]);
    assert_eq!(run(&program), Ok(false));
}

#[test]
fn operand_order_is_left_then_right() {
    // 3 < 7: left is pushed first.
    let program = assemble(vec![
        push(&Value::int(3)),
        push(&Value::int(7)),
        op(Opcode::OpLt),
    ]);
    assert_eq!(run(&program), Ok(true));
}

#[test]
fn comparing_mixed_tags_fails() {
    let program = assemble(vec![
        push(&str_value("5")),
        push(&Value::int(5)),
        op(Opcode::OpEq),
    ]);
    let offset = push(&str_value("5")).len() + push(&Value::int(5)).len();
    assert_eq!(
        run(&program),
        Err(RuntimeError::CompareMismatch {
            at: offset,
            op: "OP_EQ"
        })
    );
}

#[test]
fn comparing_different_integer_widths_fails() {
    // An I8 and an I16 never compare, even when numerically equal. The
    // encoder narrows literals so this only happens with hand-built code.
    let mut bytes = push(&Value::int(5));
    bytes.extend_from_slice(&[0x00, 0x02, 2, 0x00, 0x05]); // PUSH I16 5
    bytes.push(Opcode::OpEq as u8);
    let program = Program::new(bytes);
    assert!(matches!(
        run(&program),
        Err(RuntimeError::CompareMismatch { .. })
    ));
}

#[test]
fn array_comparison_elementwise() {
    let left = Value::Array(vec![Value::int(1), Value::int(3)]);
    let right = Value::Array(vec![Value::int(1), Value::int(2)]);
    let program = assemble(vec![push(&left), push(&right), op(Opcode::OpGt)]);
    assert_eq!(run(&program), Ok(true));
}

#[test]
fn comparison_underflow() {
    let program = assemble(vec![push(&Value::int(1)), op(Opcode::OpEq)]);
    assert!(matches!(
        run(&program),
        Err(RuntimeError::StackUnderflow { .. })
    ));
}

// ============================================================
// Text operators
// ============================================================

#[test]
fn text_operators() {
    let cases = [
        (Opcode::OpStartswith, "Alice Martin", "Alice", true),
        (Opcode::OpStartswith, "Alice Martin", "Martin", false),
        (Opcode::OpEndswith, "Alice Martin", "Martin", true),
        (Opcode::OpEndswith, "Alice Martin", "Alice", false),
        (Opcode::OpContains, "Alice Martin", "ce Ma", true),
        (Opcode::OpContains, "Alice Martin", "Lopez", false),
        (Opcode::OpContains, "abc", "", true),
    ];
    for (opcode, subject, needle, expected) in cases {
        let program = assemble(vec![
            push(&str_value(subject)),
            push(&str_value(needle)),
            op(opcode),
        ]);
        assert_eq!(
            run(&program),
            Ok(expected),
            "{subject:?} {} {needle:?}",
            opcode.mnemonic()
        );
    }
}

#[test]
fn text_operators_require_strings() {
    for opcode in [Opcode::OpStartswith, Opcode::OpEndswith, Opcode::OpContains] {
        let program = assemble(vec![
            push(&Value::int(5)),
            push(&str_value("5")),
            op(opcode),
        ]);
        assert!(
            matches!(run(&program), Err(RuntimeError::StringOperands { .. })),
            "{} should reject integers",
            opcode.mnemonic()
        );
    }
}

// ============================================================
// Membership
// ============================================================

fn str_array(items: &[&str]) -> Value {
    Value::Array(items.iter().map(|s| str_value(s)).collect())
}

#[test]
fn in_scalar_needle() {
    let haystack = str_array(&["admin", "moderator"]);
    for (needle, expected) in [("moderator", true), ("guest", false)] {
        let program = assemble(vec![
            push(&str_value(needle)),
            push(&haystack),
            op(Opcode::OpIn),
        ]);
        assert_eq!(run(&program), Ok(expected), "needle {needle:?}");
    }
}

#[test]
fn in_array_needle_is_intersection() {
    let haystack = str_array(&["a", "b", "c"]);
    for (needles, expected) in [
        (vec!["x", "b"], true),
        (vec!["x", "y"], false),
        (vec![], false),
    ] {
        let program = assemble(vec![
            push(&str_array(&needles)),
            push(&haystack),
            op(Opcode::OpIn),
        ]);
        assert_eq!(run(&program), Ok(expected), "needles {needles:?}");
    }
}

#[test]
fn in_requires_array_haystack() {
    let program = assemble(vec![
        push(&str_value("a")),
        push(&str_value("abc")),
        op(Opcode::OpIn),
    ]);
    assert!(matches!(
        run(&program),
        Err(RuntimeError::ArrayOperand { .. })
    ));
}

#[test]
fn in_mismatched_element_tag_is_an_error_not_a_miss() {
    let haystack = Value::Array(vec![Value::int(1), str_value("x")]);
    let program = assemble(vec![
        push(&str_value("x")),
        push(&haystack),
        op(Opcode::OpIn),
    ]);
    assert!(matches!(
        run(&program),
        Err(RuntimeError::CompareMismatch { op: "OP_IN", .. })
    ));
}

// ============================================================
// Logical connectives
// ============================================================

#[test]
fn logical_truth_tables() {
    let cases = [
        (Opcode::OpAnd, true, true, true),
        (Opcode::OpAnd, true, false, false),
        (Opcode::OpAnd, false, false, false),
        (Opcode::OpOr, false, false, false),
        (Opcode::OpOr, true, false, true),
        (Opcode::OpOr, true, true, true),
        (Opcode::OpXor, true, true, false),
        (Opcode::OpXor, true, false, true),
        (Opcode::OpXor, false, false, false),
    ];
    for (opcode, left, right, expected) in cases {
        let program = assemble(vec![
            push(&Value::Bool(left)),
            push(&Value::Bool(right)),
            op(opcode),
        ]);
        assert_eq!(
            run(&program),
            Ok(expected),
            "{left} {} {right}",
            opcode.mnemonic()
        );
    }
}

#[test]
fn not_flips_the_top() {
    let program = assemble(vec![push(&Value::Bool(false)), op(Opcode::OpNot)]);
    assert_eq!(run(&program), Ok(true));

    let program = assemble(vec![
        push(&Value::Bool(true)),
        op(Opcode::OpNot),
        op(Opcode::OpNot),
    ]);
    assert_eq!(run(&program), Ok(true));
}

#[test]
fn logical_ops_require_booleans() {
    let program = assemble(vec![
        push(&Value::int(1)),
        push(&Value::Bool(true)),
        op(Opcode::OpAnd),
    ]);
    assert!(matches!(
        run(&program),
        Err(RuntimeError::BooleanOperands { op: "OP_AND", .. })
    ));

    let program = assemble(vec![push(&str_value("true")), op(Opcode::OpNot)]);
    assert!(matches!(
        run(&program),
        Err(RuntimeError::BooleanOperands { op: "OP_NOT", .. })
    ));
}

// ============================================================
// Native functions
// ============================================================

fn natives_returning_arg_count() -> Vec<NativeFn> {
    vec![
        Box::new(|args| Ok(Value::Bool(args.len() == 2))),
        Box::new(|_| Err(NativeError("always fails".to_string()))),
    ]
}

#[test]
fn call_native_pops_args_and_pushes_result() {
    // CALL_NATIVE index=0 argc=2
    let mut bytes = Vec::new();
    bytes.extend(push(&Value::int(1)));
    bytes.extend(push(&Value::int(2)));
    bytes.extend_from_slice(&[Opcode::CallNative as u8, 0, 2]);
    let program = Program::new(bytes);

    let mut vm = Vm::with_natives(&program, natives_returning_arg_count());
    vm.execute().unwrap();
    assert_eq!(vm.finish(), Ok(true));
}

#[test]
fn call_native_unknown_index() {
    let program = Program::new(vec![Opcode::CallNative as u8, 9, 0]);
    let mut vm = Vm::with_natives(&program, natives_returning_arg_count());
    assert_eq!(
        vm.execute(),
        Err(RuntimeError::UnknownNative { at: 0, index: 9 })
    );
}

#[test]
fn call_native_failure_is_wrapped() {
    let program = Program::new(vec![Opcode::CallNative as u8, 1, 0]);
    let mut vm = Vm::with_natives(&program, natives_returning_arg_count());
    assert_eq!(
        vm.execute(),
        Err(RuntimeError::NativeFailed {
            at: 0,
            source: NativeError("always fails".to_string())
        })
    );
}

#[test]
fn call_native_underflow_when_args_missing() {
    let program = Program::new(vec![Opcode::CallNative as u8, 0, 2]);
    let mut vm = Vm::with_natives(&program, natives_returning_arg_count());
    assert_eq!(
        vm.execute(),
        Err(RuntimeError::StackUnderflow { at: 0 })
    );
}

#[test]
fn call_native_truncated_operands() {
    let program = Program::new(vec![Opcode::CallNative as u8, 0]);
    let mut vm = Vm::with_natives(&program, natives_returning_arg_count());
    assert!(matches!(
        vm.execute(),
        Err(RuntimeError::BadOperand { at: 0, .. })
    ));
}

// ============================================================
// Reset and reuse
// ============================================================

#[test]
fn one_machine_many_records() {
    let program = assemble(vec![
        load_global("status"),
        push(&str_value("active")),
        op(Opcode::OpEq),
    ]);
    let mut vm = Vm::new(&program);

    for (status, expected) in [("active", true), ("inactive", false), ("active", true)] {
        vm.reset();
        vm.load_record(&record(&[("status", status)])).unwrap();
        vm.execute().unwrap();
        assert_eq!(vm.finish(), Ok(expected), "status {status:?}");
    }
}

#[test]
fn record_integers_meet_narrowed_literals() {
    // A record integer 5 loads as I8; a compiled literal 5 is I8 too, so
    // the comparison succeeds instead of mismatching.
    let program = assemble(vec![
        load_global("age"),
        push(&Value::int(5)),
        op(Opcode::OpEq),
    ]);
    let mut vm = Vm::new(&program);
    let rec: Record = [("age".to_string(), 5i64.into())].into_iter().collect();
    vm.load_record(&rec).unwrap();
    vm.execute().unwrap();
    assert_eq!(vm.finish(), Ok(true));
}

#[test]
fn excess_results_detected() {
    let program = assemble(vec![push(&Value::Bool(true)), push(&Value::Bool(false))]);
    assert_eq!(run(&program), Err(RuntimeError::ExcessResults { count: 2 }));
}

#[test]
fn non_boolean_result_detected() {
    let program = assemble(vec![push(&str_value("yes"))]);
    assert_eq!(
        run(&program),
        Err(RuntimeError::NonBooleanResult { tag: "STR" })
    );
}

// ============================================================
// Properties
// ============================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Scalar IN agrees with slice membership for arbitrary lists.
        #[test]
        fn in_matches_slice_contains(
            needle in "[a-z]{1,6}",
            haystack in prop::collection::vec("[a-z]{1,6}", 0..8)
        ) {
            let expected = haystack.contains(&needle);
            let items: Vec<&str> = haystack.iter().map(String::as_str).collect();
            let program = assemble(vec![
                push(&str_value(&needle)),
                push(&str_array(&items)),
                op(Opcode::OpIn),
            ]);
            prop_assert_eq!(run(&program), Ok(expected));
        }

        /// OP_NOT is an involution on any boolean program result.
        #[test]
        fn double_not_is_identity(value in any::<bool>()) {
            let program = assemble(vec![
                push(&Value::Bool(value)),
                op(Opcode::OpNot),
                op(Opcode::OpNot),
            ]);
            prop_assert_eq!(run(&program), Ok(value));
        }
    }
}
