//! Unit tests for the constant folder.
//!
//! This module verifies:
//! - Literal-operand applications collapse to single literals
//! - Folded arithmetic wraps exactly like the machine's
//! - Division by a literal zero is left for the runtime
//! - Folding is idempotent

use std::rc::Rc;

use crate::ast::ast::{ActualParamKind, CommandKind, DeclarationKind, Program};
use crate::ast::expressions::ExpressionKind;
use crate::ast::types::Type;
use crate::checker::checker::check;
use crate::errors::reporter::Reporter;
use crate::lexer::lexer::tokenize;
use crate::parser::parser::parse;

use super::folder::fold_program;

fn checked_program(source: &str) -> Program {
    let mut reporter = Reporter::new();
    let tokens = tokenize(
        source.to_string(),
        Some("test.slate".to_string()),
        &mut reporter,
    );
    let mut program = parse(tokens, Rc::new("test.slate".to_string()), &mut reporter);
    check(&mut program, &mut reporter);
    assert_eq!(
        reporter.num_errors(),
        0,
        "source should check cleanly: {:?}",
        source
    );
    program
}

fn folded_program(source: &str) -> (Program, Reporter) {
    let mut program = checked_program(source);
    let mut reporter = Reporter::new();
    fold_program(&mut program, &mut reporter);
    (program, reporter)
}

/// The value argument of the single call command at the program root.
fn first_call_argument(program: &Program) -> &crate::ast::expressions::Expression {
    match &program.command.kind {
        CommandKind::Call { args, .. } => match &args[0].kind {
            ActualParamKind::Value { expr } => expr,
            other => panic!("expected a value argument, found {:?}", other),
        },
        other => panic!("expected a call command, found {:?}", other),
    }
}

#[test]
fn test_folds_constant_addition() {
    let (program, _) = folded_program("let x : Integer ~ 2 + 3 in putint(x)");
    match &program.command.kind {
        CommandKind::Let { declarations, .. } => match &declarations[0].kind {
            DeclarationKind::Const { value, .. } => {
                assert!(matches!(value.kind, ExpressionKind::IntLit { value: 5 }));
            }
            other => panic!("expected a constant, found {:?}", other),
        },
        other => panic!("expected a let command, found {:?}", other),
    }
}

#[test]
fn test_folds_nested_expressions() {
    let (program, _) = folded_program("putint((2 + 3) * 4 - 1)");
    let argument = first_call_argument(&program);
    assert!(matches!(
        argument.kind,
        ExpressionKind::IntLit { value: 19 }
    ));
}

#[test]
fn test_folds_unary_negation() {
    let (program, _) = folded_program("putint(-(2 + 3))");
    let argument = first_call_argument(&program);
    assert!(matches!(
        argument.kind,
        ExpressionKind::IntLit { value: -5 }
    ));
}

#[test]
fn test_fold_wraps_like_the_machine() {
    let (program, _) = folded_program("putint(2147483647 + 1)");
    let argument = first_call_argument(&program);
    assert!(matches!(
        argument.kind,
        ExpressionKind::IntLit {
            value: -2147483648
        }
    ));
}

#[test]
fn test_division_by_literal_zero_is_not_folded() {
    let (program, reporter) = folded_program("putint(1 / 0)");
    let argument = first_call_argument(&program);
    assert!(matches!(argument.kind, ExpressionKind::Binary { .. }));

    // A warning is raised, but no error: the code still compiles and
    // fails at runtime exactly like the unfolded program.
    assert_eq!(reporter.num_errors(), 0);
    assert_eq!(reporter.diagnostics().len(), 1);
}

#[test]
fn test_modulo_by_literal_zero_is_not_folded() {
    let (program, reporter) = folded_program("putint(1 // 0)");
    let argument = first_call_argument(&program);
    assert!(matches!(argument.kind, ExpressionKind::Binary { .. }));
    assert_eq!(reporter.num_errors(), 0);
}

#[test]
fn test_folded_comparison_keeps_its_boolean_type() {
    let (program, _) = folded_program("if 1 < 2 then puteol() else puteol()");
    match &program.command.kind {
        CommandKind::If { condition, .. } => {
            assert!(matches!(
                condition.kind,
                ExpressionKind::IntLit { value: 1 }
            ));
            assert_eq!(condition.ty, Some(Type::Bool));
        }
        other => panic!("expected an if command, found {:?}", other),
    }
}

#[test]
fn test_folds_logical_operators() {
    let (program, _) = folded_program("if true /\\ (1 < 2) then puteol() else puteol()");
    match &program.command.kind {
        CommandKind::If { condition, .. } => {
            // `true` is a standard constant, not a literal, so only the
            // comparison folds; the conjunction survives.
            assert!(matches!(condition.kind, ExpressionKind::Binary { .. }));
        }
        other => panic!("expected an if command, found {:?}", other),
    }

    let (program, _) = folded_program("if (1 < 2) \\/ (3 < 4) then puteol() else puteol()");
    match &program.command.kind {
        CommandKind::If { condition, .. } => {
            assert!(matches!(
                condition.kind,
                ExpressionKind::IntLit { value: 1 }
            ));
        }
        other => panic!("expected an if command, found {:?}", other),
    }
}

#[test]
fn test_folding_is_idempotent() {
    let (mut program, _) = folded_program("let x : Integer ~ 2 + 3 * 4 in putint(x - 1)");
    let after_one_pass = format!("{:?}", program);

    let mut reporter = Reporter::new();
    fold_program(&mut program, &mut reporter);
    let after_two_passes = format!("{:?}", program);

    assert_eq!(after_one_pass, after_two_passes);
    assert_eq!(reporter.diagnostics().len(), 0);
}

#[test]
fn test_non_constant_operands_are_untouched() {
    let (program, _) = folded_program("let var x : Integer in putint(x + 1)");
    match &program.command.kind {
        CommandKind::Let { body, .. } => match &body.kind {
            CommandKind::Call { args, .. } => match &args[0].kind {
                ActualParamKind::Value { expr } => {
                    assert!(matches!(expr.kind, ExpressionKind::Binary { .. }));
                }
                other => panic!("expected a value argument, found {:?}", other),
            },
            other => panic!("expected a call, found {:?}", other),
        },
        other => panic!("expected a let command, found {:?}", other),
    }
}
