use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// How serious a diagnostic is. Only `Error` diagnostics stop the
/// pipeline; warnings are displayed and otherwise ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// The broad fault classes of the compiler. Lexical, syntax, name and
/// type faults accumulate; IO faults abort the run immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticClass {
    Lexical,
    Syntax,
    Name,
    Type,
    Internal,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    position: Position,
    severity: Severity,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, position: Position) -> Self {
        Diagnostic {
            kind,
            position,
            severity: Severity::Error,
        }
    }

    pub fn warning(kind: DiagnosticKind, position: Position) -> Self {
        Diagnostic {
            kind,
            position,
            severity: Severity::Warning,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn get_kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn get_class(&self) -> DiagnosticClass {
        self.kind.get_class()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.kind {
            DiagnosticKind::UnrecognisedCharacter { .. } => "UnrecognisedCharacter",
            DiagnosticKind::UnexpectedToken { .. } => "UnexpectedToken",
            DiagnosticKind::IntegerLiteralTooLarge { .. } => "IntegerLiteralTooLarge",
            DiagnosticKind::IdentifierNotDeclared { .. } => "IdentifierNotDeclared",
            DiagnosticKind::IdentifierAlreadyDeclared { .. } => "IdentifierAlreadyDeclared",
            DiagnosticKind::TypeMismatch { .. } => "TypeMismatch",
            DiagnosticKind::InvalidOperator { .. } => "InvalidOperator",
            DiagnosticKind::ArityMismatch { .. } => "ArityMismatch",
            DiagnosticKind::ParameterMismatch { .. } => "ParameterMismatch",
            DiagnosticKind::NotARoutine { .. } => "NotARoutine",
            DiagnosticKind::NotAType { .. } => "NotAType",
            DiagnosticKind::NotAVariable { .. } => "NotAVariable",
            DiagnosticKind::ConditionNotBoolean { .. } => "ConditionNotBoolean",
            DiagnosticKind::NotAnArray { .. } => "NotAnArray",
            DiagnosticKind::NotARecord { .. } => "NotARecord",
            DiagnosticKind::NoSuchField { .. } => "NoSuchField",
            DiagnosticKind::IndexNotInteger { .. } => "IndexNotInteger",
            DiagnosticKind::TooManyNestingLevels => "TooManyNestingLevels",
            DiagnosticKind::ConstantDivisionByZero => "ConstantDivisionByZero",
            DiagnosticKind::UnresolvedJump => "UnresolvedJump",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.kind {
            DiagnosticKind::UnrecognisedCharacter { character } => ErrorTip::Suggestion(format!(
                "the character `{}` is not part of the language",
                character
            )),
            DiagnosticKind::UnexpectedToken { token, expected } => ErrorTip::Suggestion(format!(
                "unexpected token `{}`, expected {}",
                token, expected
            )),
            DiagnosticKind::IntegerLiteralTooLarge { spelling } => ErrorTip::Suggestion(format!(
                "`{}` does not fit in a machine word",
                spelling
            )),
            DiagnosticKind::IdentifierNotDeclared { identifier } => {
                ErrorTip::Suggestion(format!("`{}` is not declared here", identifier))
            }
            DiagnosticKind::IdentifierAlreadyDeclared { identifier } => ErrorTip::Suggestion(
                format!("`{}` is already declared in this scope", identifier),
            ),
            DiagnosticKind::TypeMismatch { expected, found } => ErrorTip::Suggestion(format!(
                "expected type `{}`, found `{}`",
                expected, found
            )),
            DiagnosticKind::InvalidOperator { operator, operand } => ErrorTip::Suggestion(
                format!("`{}` cannot be applied to `{}`", operator, operand),
            ),
            DiagnosticKind::ArityMismatch { expected, found } => ErrorTip::Suggestion(format!(
                "expected {} arguments, found {}",
                expected, found
            )),
            DiagnosticKind::ParameterMismatch { number } => ErrorTip::Suggestion(format!(
                "argument {} does not match the declared parameter",
                number
            )),
            DiagnosticKind::NotARoutine { identifier } => ErrorTip::Suggestion(format!(
                "`{}` is not a procedure or function",
                identifier
            )),
            DiagnosticKind::NotAType { identifier } => {
                ErrorTip::Suggestion(format!("`{}` does not name a type", identifier))
            }
            DiagnosticKind::NotAVariable { identifier } => ErrorTip::Suggestion(format!(
                "`{}` cannot be used as a variable here",
                identifier
            )),
            DiagnosticKind::ConditionNotBoolean { found } => ErrorTip::Suggestion(format!(
                "conditions must be Boolean, found `{}`",
                found
            )),
            DiagnosticKind::NotAnArray { found } => {
                ErrorTip::Suggestion(format!("only arrays can be indexed, found `{}`", found))
            }
            DiagnosticKind::NotARecord { found } => {
                ErrorTip::Suggestion(format!("only records have fields, found `{}`", found))
            }
            DiagnosticKind::NoSuchField { field } => {
                ErrorTip::Suggestion(format!("the record has no field `{}`", field))
            }
            DiagnosticKind::IndexNotInteger { found } => ErrorTip::Suggestion(format!(
                "array indices must be Integer, found `{}`",
                found
            )),
            DiagnosticKind::TooManyNestingLevels => ErrorTip::Suggestion(String::from(
                "the machine can only address 6 enclosing routine levels",
            )),
            DiagnosticKind::ConstantDivisionByZero => ErrorTip::Suggestion(String::from(
                "this division will fail when the program runs",
            )),
            DiagnosticKind::UnresolvedJump => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum DiagnosticKind {
    #[error("unrecognised character: {character:?}")]
    UnrecognisedCharacter { character: char },
    #[error("unexpected token {token:?}, expected {expected}")]
    UnexpectedToken { token: String, expected: String },
    #[error("integer literal out of range: {spelling:?}")]
    IntegerLiteralTooLarge { spelling: String },
    #[error("identifier {identifier:?} not declared")]
    IdentifierNotDeclared { identifier: String },
    #[error("identifier {identifier:?} already declared")]
    IdentifierAlreadyDeclared { identifier: String },
    #[error("types do not match: expected {expected:?}, found {found:?}")]
    TypeMismatch { expected: String, found: String },
    #[error("operator {operator:?} cannot be applied to {operand:?}")]
    InvalidOperator { operator: String, operand: String },
    #[error("wrong number of arguments: expected {expected:?}, found {found:?}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("argument {number:?} does not match its parameter")]
    ParameterMismatch { number: usize },
    #[error("identifier {identifier:?} is not a procedure or function")]
    NotARoutine { identifier: String },
    #[error("identifier {identifier:?} does not name a type")]
    NotAType { identifier: String },
    #[error("identifier {identifier:?} is not a variable")]
    NotAVariable { identifier: String },
    #[error("condition is not Boolean: found {found:?}")]
    ConditionNotBoolean { found: String },
    #[error("subscripted value is not an array: found {found:?}")]
    NotAnArray { found: String },
    #[error("selected value is not a record: found {found:?}")]
    NotARecord { found: String },
    #[error("record has no field named {field:?}")]
    NoSuchField { field: String },
    #[error("array index is not Integer: found {found:?}")]
    IndexNotInteger { found: String },
    #[error("object is nested too deeply to address")]
    TooManyNestingLevels,
    #[error("constant division by zero")]
    ConstantDivisionByZero,
    #[error("unresolved jump in generated code")]
    UnresolvedJump,
}

impl DiagnosticKind {
    pub fn get_class(&self) -> DiagnosticClass {
        match self {
            DiagnosticKind::UnrecognisedCharacter { .. } => DiagnosticClass::Lexical,
            DiagnosticKind::UnexpectedToken { .. }
            | DiagnosticKind::IntegerLiteralTooLarge { .. } => DiagnosticClass::Syntax,
            DiagnosticKind::IdentifierNotDeclared { .. }
            | DiagnosticKind::IdentifierAlreadyDeclared { .. } => DiagnosticClass::Name,
            DiagnosticKind::TypeMismatch { .. }
            | DiagnosticKind::InvalidOperator { .. }
            | DiagnosticKind::ArityMismatch { .. }
            | DiagnosticKind::ParameterMismatch { .. }
            | DiagnosticKind::NotARoutine { .. }
            | DiagnosticKind::NotAType { .. }
            | DiagnosticKind::NotAVariable { .. }
            | DiagnosticKind::ConditionNotBoolean { .. }
            | DiagnosticKind::NotAnArray { .. }
            | DiagnosticKind::NotARecord { .. }
            | DiagnosticKind::NoSuchField { .. }
            | DiagnosticKind::IndexNotInteger { .. }
            | DiagnosticKind::TooManyNestingLevels
            | DiagnosticKind::ConstantDivisionByZero => DiagnosticClass::Type,
            DiagnosticKind::UnresolvedJump => DiagnosticClass::Internal,
        }
    }
}
