//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs
//! including:
//! - Commands (assignment, call, sequence, if, while, let)
//! - Declarations (constants, variables, procedures, functions, types)
//! - Expressions with operator precedence
//! - Value-names and aggregates
//! - Error recovery

use std::rc::Rc;

use crate::ast::ast::{CommandKind, DeclarationKind, Program, VnameKind};
use crate::ast::expressions::ExpressionKind;
use crate::errors::reporter::Reporter;
use crate::lexer::lexer::tokenize;

use super::parser::parse;

fn parse_source(source: &str) -> (Program, Reporter) {
    let mut reporter = Reporter::new();
    let tokens = tokenize(
        source.to_string(),
        Some("test.slate".to_string()),
        &mut reporter,
    );
    let program = parse(tokens, Rc::new("test.slate".to_string()), &mut reporter);
    (program, reporter)
}

fn parse_clean(source: &str) -> Program {
    let (program, reporter) = parse_source(source);
    assert_eq!(
        reporter.num_errors(),
        0,
        "expected a clean parse of {:?}",
        source
    );
    program
}

#[test]
fn test_parse_assignment() {
    let program = parse_clean("x := 42");
    assert!(matches!(
        program.command.kind,
        CommandKind::Assign { .. }
    ));
}

#[test]
fn test_parse_call_command() {
    let program = parse_clean("putint(42)");
    match program.command.kind {
        CommandKind::Call { name, args } => {
            assert_eq!(name.spelling, "putint");
            assert_eq!(args.len(), 1);
        }
        other => panic!("expected a call command, found {:?}", other),
    }
}

#[test]
fn test_parse_sequence() {
    let program = parse_clean("begin x := 1; y := 2 end");
    match program.command.kind {
        CommandKind::Sequence { commands } => assert_eq!(commands.len(), 2),
        other => panic!("expected a sequence, found {:?}", other),
    }
}

#[test]
fn test_parse_let_with_var_declaration() {
    let program = parse_clean("let var x : Integer in x := 1");
    match program.command.kind {
        CommandKind::Let { declarations, .. } => {
            assert_eq!(declarations.len(), 1);
            assert!(matches!(declarations[0].kind, DeclarationKind::Var { .. }));
        }
        other => panic!("expected a let command, found {:?}", other),
    }
}

#[test]
fn test_parse_constant_declaration() {
    let program = parse_clean("let x : Integer ~ 2 + 3 in putint(x)");
    match program.command.kind {
        CommandKind::Let { declarations, .. } => {
            assert_eq!(declarations.len(), 1);
            match &declarations[0].kind {
                DeclarationKind::Const { name, .. } => assert_eq!(name.spelling, "x"),
                other => panic!("expected a constant, found {:?}", other),
            }
        }
        other => panic!("expected a let command, found {:?}", other),
    }
}

#[test]
fn test_parse_if_command() {
    let program = parse_clean("if x > 0 then putint(1) else putint(2)");
    assert!(matches!(program.command.kind, CommandKind::If { .. }));
}

#[test]
fn test_parse_while_command() {
    let program = parse_clean("while x < 10 do x := x + 1");
    assert!(matches!(program.command.kind, CommandKind::While { .. }));
}

#[test]
fn test_parse_proc_declaration() {
    let program = parse_clean("let proc double(var n : Integer) ~ n := n * 2 in double(var x)");
    match program.command.kind {
        CommandKind::Let { declarations, .. } => {
            match &declarations[0].kind {
                DeclarationKind::Proc { name, params, .. } => {
                    assert_eq!(name.spelling, "double");
                    assert_eq!(params.len(), 1);
                }
                other => panic!("expected a procedure, found {:?}", other),
            }
        }
        other => panic!("expected a let command, found {:?}", other),
    }
}

#[test]
fn test_parse_func_declaration() {
    let program = parse_clean("let func square(n : Integer) : Integer ~ n * n in putint(square(3))");
    match program.command.kind {
        CommandKind::Let { declarations, .. } => {
            assert!(matches!(declarations[0].kind, DeclarationKind::Func { .. }));
        }
        other => panic!("expected a let command, found {:?}", other),
    }
}

#[test]
fn test_parse_type_declaration() {
    let program = parse_clean(
        "let type Point ~ record x : Integer, y : Integer end; var p : Point in p.x := 1",
    );
    match program.command.kind {
        CommandKind::Let { declarations, .. } => {
            assert_eq!(declarations.len(), 2);
            assert!(matches!(
                declarations[0].kind,
                DeclarationKind::TypeDecl { .. }
            ));
        }
        other => panic!("expected a let command, found {:?}", other),
    }
}

#[test]
fn test_parse_precedence() {
    // `1 + 2 * 3` must parse as `1 + (2 * 3)`.
    let program = parse_clean("x := 1 + 2 * 3");
    match program.command.kind {
        CommandKind::Assign { value, .. } => match value.kind {
            ExpressionKind::Binary {
                operator, right, ..
            } => {
                assert_eq!(operator.value, "+");
                assert!(matches!(right.kind, ExpressionKind::Binary { .. }));
            }
            other => panic!("expected a binary expression, found {:?}", other),
        },
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_parse_left_associativity() {
    // `10 - 4 - 3` must parse as `(10 - 4) - 3`.
    let program = parse_clean("x := 10 - 4 - 3");
    match program.command.kind {
        CommandKind::Assign { value, .. } => match value.kind {
            ExpressionKind::Binary { left, right, .. } => {
                assert!(matches!(left.kind, ExpressionKind::Binary { .. }));
                assert!(matches!(right.kind, ExpressionKind::IntLit { value: 3 }));
            }
            other => panic!("expected a binary expression, found {:?}", other),
        },
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_parse_vname_suffixes() {
    let program = parse_clean("a[1].f := 0");
    match program.command.kind {
        CommandKind::Assign { target, .. } => {
            assert!(matches!(target.kind, VnameKind::Dot { .. }));
        }
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_parse_aggregates() {
    let program = parse_clean("a := [1, 2, 3]");
    match program.command.kind {
        CommandKind::Assign { value, .. } => match value.kind {
            ExpressionKind::ArrayAggregate { elements } => assert_eq!(elements.len(), 3),
            other => panic!("expected an array aggregate, found {:?}", other),
        },
        other => panic!("expected an assignment, found {:?}", other),
    }

    let program = parse_clean("p := {x ~ 1, y ~ 2}");
    match program.command.kind {
        CommandKind::Assign { value, .. } => match value.kind {
            ExpressionKind::RecordAggregate { fields } => assert_eq!(fields.len(), 2),
            other => panic!("expected a record aggregate, found {:?}", other),
        },
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_parse_let_and_if_expressions() {
    parse_clean("x := let y : Integer ~ 2 in y + 1");
    parse_clean("x := if b then 1 else 2");
}

#[test]
fn test_missing_end_is_reported() {
    let (_, reporter) = parse_source("begin x := 1; y := 2");
    assert!(reporter.num_errors() >= 1);

    // The diagnostic must point at or after the gap.
    let position = reporter.diagnostics()[0].get_position().0;
    assert!(position >= 13);
}

#[test]
fn test_missing_else_is_reported() {
    let (_, reporter) = parse_source("if x > 0 then putint(1)");
    assert!(reporter.num_errors() >= 1);
}

#[test]
fn test_recovery_surfaces_multiple_errors() {
    // Both faulty commands produce a diagnostic, not just the first.
    let (_, reporter) = parse_source("begin x := ); y := ) end");
    assert!(reporter.num_errors() >= 2);
}

#[test]
fn test_recovery_in_declarations() {
    let (program, reporter) = parse_source("let var x : ; var y : Integer in y := 1");
    assert!(reporter.num_errors() >= 1);

    // The second declaration survived recovery.
    if let CommandKind::Let { declarations, .. } = program.command.kind {
        assert!(declarations
            .iter()
            .any(|declaration| matches!(declaration.kind, DeclarationKind::Var { .. })));
    } else {
        panic!("expected a let command");
    }
}

#[test]
fn test_best_effort_tree_always_returned() {
    let (program, reporter) = parse_source(")");
    assert!(reporter.num_errors() >= 1);
    assert!(matches!(program.command.kind, CommandKind::Skip));
}
