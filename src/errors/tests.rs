//! Unit tests for diagnostics.
//!
//! This module contains tests for diagnostic construction, classification
//! and the reporter's error count.

use crate::errors::errors::{Diagnostic, DiagnosticClass, DiagnosticKind, Severity};
use crate::errors::reporter::Reporter;
use crate::Position;
use std::rc::Rc;

#[test]
fn test_diagnostic_creation() {
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UnrecognisedCharacter { character: '@' },
        Position(10, Rc::new("test.slate".to_string())),
    );

    assert_eq!(diagnostic.get_error_name(), "UnrecognisedCharacter");
    assert_eq!(diagnostic.get_severity(), Severity::Error);
    assert_eq!(diagnostic.get_class(), DiagnosticClass::Lexical);
}

#[test]
fn test_diagnostic_position() {
    let pos = Position(42, Rc::new("test.slate".to_string()));
    let diagnostic = Diagnostic::new(
        DiagnosticKind::UnexpectedToken {
            token: "then".to_string(),
            expected: "`;`".to_string(),
        },
        pos.clone(),
    );

    assert_eq!(diagnostic.get_position().0, 42);
    assert_eq!(diagnostic.get_class(), DiagnosticClass::Syntax);
}

#[test]
fn test_name_and_type_classes() {
    let name = DiagnosticKind::IdentifierAlreadyDeclared {
        identifier: "x".to_string(),
    };
    let ty = DiagnosticKind::TypeMismatch {
        expected: "Integer".to_string(),
        found: "Boolean".to_string(),
    };

    assert_eq!(name.get_class(), DiagnosticClass::Name);
    assert_eq!(ty.get_class(), DiagnosticClass::Type);
}

#[test]
fn test_reporter_counts_only_errors() {
    let mut reporter = Reporter::new();
    assert_eq!(reporter.num_errors(), 0);

    reporter.warn(
        DiagnosticKind::ConstantDivisionByZero,
        Position(0, Rc::new("test.slate".to_string())),
    );
    assert_eq!(reporter.num_errors(), 0);
    assert_eq!(reporter.diagnostics().len(), 1);

    reporter.report(
        DiagnosticKind::IdentifierNotDeclared {
            identifier: "y".to_string(),
        },
        Position(5, Rc::new("test.slate".to_string())),
    );
    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics().len(), 2);
}

#[test]
fn test_reporter_preserves_order() {
    let mut reporter = Reporter::new();
    reporter.report(
        DiagnosticKind::IdentifierNotDeclared {
            identifier: "a".to_string(),
        },
        Position(1, Rc::new("test.slate".to_string())),
    );
    reporter.report(
        DiagnosticKind::IdentifierNotDeclared {
            identifier: "b".to_string(),
        },
        Position(9, Rc::new("test.slate".to_string())),
    );

    let positions: Vec<u32> = reporter
        .diagnostics()
        .iter()
        .map(|diagnostic| diagnostic.get_position().0)
        .collect();
    assert_eq!(positions, vec![1, 9]);
}
