//! Unit tests for the checker module.
//!
//! This module contains tests for semantic analysis including:
//! - Identifier resolution, shadowing and duplicate detection
//! - Structural type checking of operators, assignments and calls
//! - Recursive and mutually-recursive routine groups
//! - Cascade suppression for faulted subtrees

use std::rc::Rc;

use crate::errors::errors::DiagnosticClass;
use crate::errors::reporter::Reporter;
use crate::lexer::lexer::tokenize;
use crate::parser::parser::parse;

use super::checker::check;

fn check_source(source: &str) -> Reporter {
    let mut reporter = Reporter::new();
    let tokens = tokenize(
        source.to_string(),
        Some("test.slate".to_string()),
        &mut reporter,
    );
    let mut program = parse(tokens, Rc::new("test.slate".to_string()), &mut reporter);
    assert_eq!(
        reporter.num_errors(),
        0,
        "source should scan and parse cleanly: {:?}",
        source
    );
    check(&mut program, &mut reporter);
    reporter
}

fn assert_clean(source: &str) {
    let reporter = check_source(source);
    assert_eq!(
        reporter.num_errors(),
        0,
        "expected no diagnostics for {:?}, found {:?}",
        source,
        reporter.diagnostics()
    );
}

#[test]
fn test_clean_program() {
    assert_clean("let var x : Integer in begin x := 40 + 2; putint(x) end");
}

#[test]
fn test_standard_environment_is_visible() {
    assert_clean("let var c : Char in begin get(var c); put(c); putint(ord(c)) end");
    assert_clean("if eol() then puteol() else put(chr(33))");
    assert_clean("putint(maxint)");
}

#[test]
fn test_undeclared_identifier() {
    let reporter = check_source("putint(x)");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(
        reporter.diagnostics()[0].get_class(),
        DiagnosticClass::Name
    );
}

#[test]
fn test_duplicate_declaration_yields_exactly_one_diagnostic() {
    // One NameError at the duplicate, and no type diagnostics caused by
    // the same identifier elsewhere.
    let reporter =
        check_source("let x : Integer ~ 1; x : Integer ~ 2 in putint(x)");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(
        reporter.diagnostics()[0].get_class(),
        DiagnosticClass::Name
    );
}

#[test]
fn test_duplicate_position_is_the_second_declaration() {
    let source = "let x : Integer ~ 1; x : Integer ~ 2 in putint(x)";
    let reporter = check_source(source);
    let position = reporter.diagnostics()[0].get_position().0 as usize;
    assert_eq!(position, 21);
    assert_eq!(&source[position..position + 1], "x");
}

#[test]
fn test_shadowing_is_permitted() {
    assert_clean(
        "let var x : Integer in let var x : Boolean in x := true",
    );
}

#[test]
fn test_inner_declaration_invisible_after_block() {
    let reporter = check_source(
        "begin let var x : Integer in x := 1; x := 2 end",
    );
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(
        reporter.diagnostics()[0].get_class(),
        DiagnosticClass::Name
    );
}

#[test]
fn test_redeclaring_after_inner_block_exit_is_legal() {
    assert_clean(
        "begin let var x : Integer in x := 1; let var x : Boolean in x := true end",
    );
}

#[test]
fn test_assignment_type_mismatch() {
    let reporter = check_source("let var x : Integer in x := true");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(
        reporter.diagnostics()[0].get_class(),
        DiagnosticClass::Type
    );
}

#[test]
fn test_assignment_to_constant() {
    let reporter = check_source("let x : Integer ~ 1 in x := 2");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics()[0].get_error_name(), "NotAVariable");
}

#[test]
fn test_condition_must_be_boolean() {
    let reporter = check_source("while 1 do puteol()");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(
        reporter.diagnostics()[0].get_error_name(),
        "ConditionNotBoolean"
    );
}

#[test]
fn test_operator_operand_types() {
    let reporter = check_source("putint(1 + 'a')");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(
        reporter.diagnostics()[0].get_error_name(),
        "InvalidOperator"
    );
}

#[test]
fn test_equality_is_polymorphic() {
    assert_clean("if 'a' = 'b' then puteol() else puteol()");
    let reporter = check_source("if 'a' = 1 then puteol() else puteol()");
    assert_eq!(reporter.num_errors(), 1);
}

#[test]
fn test_call_arity_mismatch() {
    let reporter = check_source("putint(1, 2)");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics()[0].get_error_name(), "ArityMismatch");
}

#[test]
fn test_var_argument_must_be_a_variable() {
    let reporter = check_source("let x : Integer ~ 1 in getint(var x)");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics()[0].get_error_name(), "NotAVariable");
}

#[test]
fn test_direct_recursion() {
    assert_clean(
        "let func fact(n : Integer) : Integer ~ \
         if n = 0 then 1 else n * fact(n - 1) \
         in putint(fact(5))",
    );
}

#[test]
fn test_mutual_recursion_with_forward_reference() {
    assert_clean(
        "let proc a(n : Integer) ~ if n > 0 then b(n - 1) else puteol(); \
         proc b(n : Integer) ~ a(n) \
         in a(3)",
    );
}

#[test]
fn test_routine_parameters() {
    assert_clean(
        "let proc apply(proc p(n : Integer), n : Integer) ~ p(n) \
         in apply(proc putint, 7)",
    );
}

#[test]
fn test_arrays_and_records() {
    assert_clean(
        "let type Point ~ record x : Integer, y : Integer end; \
         var p : Point; \
         var a : array 3 of Integer \
         in begin p.x := 1; a[0] := p.x; a[p.y] := 2 end",
    );
}

#[test]
fn test_subscript_of_non_array() {
    let reporter = check_source("let var x : Integer in x[0] := 1");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics()[0].get_error_name(), "NotAnArray");
}

#[test]
fn test_index_must_be_integer() {
    let reporter =
        check_source("let var a : array 3 of Integer in a[true] := 1");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(
        reporter.diagnostics()[0].get_error_name(),
        "IndexNotInteger"
    );
}

#[test]
fn test_unknown_record_field() {
    let reporter = check_source(
        "let type Point ~ record x : Integer, y : Integer end; var p : Point in p.z := 1",
    );
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics()[0].get_error_name(), "NoSuchField");
}

#[test]
fn test_unknown_type_name() {
    let reporter = check_source("let var x : Intger in x := 1");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(
        reporter.diagnostics()[0].get_class(),
        DiagnosticClass::Name
    );
}

#[test]
fn test_error_typed_subtree_suppresses_cascades() {
    // `x` is undeclared; the `+`, the call and the assignment must not
    // pile further diagnostics on the same root cause.
    let reporter = check_source("putint(x + 1)");
    assert_eq!(reporter.num_errors(), 1);
}

#[test]
fn test_function_result_type_is_checked() {
    let reporter = check_source(
        "let func wrong(n : Integer) : Boolean ~ n + 1 in putint(1)",
    );
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics()[0].get_error_name(), "TypeMismatch");
}

#[test]
fn test_constant_value_must_match_its_type() {
    let reporter = check_source("let x : Boolean ~ 2 in putint(1)");
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics()[0].get_error_name(), "TypeMismatch");
}
