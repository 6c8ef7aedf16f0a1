use crate::errors::errors::{Diagnostic, DiagnosticKind, Severity};
use crate::Position;

/// Collects diagnostics in the order they are raised.
///
/// Every stage of the pipeline writes into the same reporter; the error
/// count decides whether the next stage may run. Diagnostics are never
/// thrown, so one run can surface many independent faults.
#[derive(Debug, Default)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter {
            diagnostics: vec![],
        }
    }

    pub fn report(&mut self, kind: DiagnosticKind, position: Position) {
        self.diagnostics.push(Diagnostic::new(kind, position));
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn warn(&mut self, kind: DiagnosticKind, position: Position) {
        self.diagnostics.push(Diagnostic::warning(kind, position));
    }

    pub fn num_errors(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.get_severity() == Severity::Error)
            .count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
