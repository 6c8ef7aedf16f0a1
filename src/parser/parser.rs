//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct. The parser keeps the token
//! sequence, the current position (one-token lookahead), and the lookup
//! tables used by the Pratt expression parser:
//!
//! - NUD (null denotation) handlers for prefix positions
//! - LED (left denotation) handlers for infix operators
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::{Command, CommandKind, Program},
    errors::{
        errors::{Diagnostic, DiagnosticKind},
        reporter::Reporter,
    },
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    commands::parse_single_command,
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
    },
};

/// The main parser structure that maintains parsing state.
pub struct Parser<'a> {
    /// The token sequence being parsed
    tokens: Vec<Token>,
    /// Current position in the token sequence
    pos: i32,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Destination for syntax diagnostics
    reporter: &'a mut Reporter,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, file: Rc<String>, reporter: &'a mut Reporter) -> Self {
        Parser {
            tokens,
            pos: 0,
            file,
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            reporter,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos as usize]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens[self.pos as usize].kind
    }

    /// Advances past the current token and returns it. The EOF token is
    /// never consumed, so lookahead stays in bounds.
    pub fn advance(&mut self) -> &Token {
        if self.current_token_kind() != TokenKind::EOF {
            self.pos += 1;
            &self.tokens[(self.pos - 1) as usize]
        } else {
            &self.tokens[self.pos as usize]
        }
    }

    /// Expects a token of the specified kind, with an optional custom
    /// diagnostic when the expectation fails.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Diagnostic>,
    ) -> Result<Token, Diagnostic> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Diagnostic::new(
                    DiagnosticKind::UnexpectedToken {
                        token: token.value.clone(),
                        expected: format!("`{}`", expected_kind),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with the default diagnostic.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Diagnostic> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Hands a syntax diagnostic to the reporter.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.reporter.add(diagnostic);
    }

    /// Panic-mode recovery: skips tokens until one of the given kinds (or
    /// EOF) is the current token.
    pub fn skip_to(&mut self, kinds: &[TokenKind]) {
        while self.current_token_kind() != TokenKind::EOF
            && !kinds.contains(&self.current_token_kind())
        {
            self.advance();
        }
    }

    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token. The
    /// binding power table is left alone so that tokens usable in both
    /// positions (like `-`) keep their infix precedence.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    pub fn get_file(&self) -> Rc<String> {
        Rc::clone(&self.file)
    }
}

/// Parses a token sequence into a Program.
///
/// This is the main entry point for parsing. Faults are reported to the
/// reporter and recovered from, so a best-effort tree always comes back;
/// the caller gates the next stage on the reporter's error count.
pub fn parse(tokens: Vec<Token>, file: Rc<String>, reporter: &mut Reporter) -> Program {
    let mut parser = Parser::new(tokens, file, reporter);
    create_token_lookups(&mut parser);

    let start = parser.get_position();
    let command = match parse_single_command(&mut parser) {
        Ok(command) => command,
        Err(diagnostic) => {
            let position = diagnostic.get_position().clone();
            parser.report(diagnostic);
            parser.skip_to(&[]);
            Command {
                kind: CommandKind::Skip,
                span: Span {
                    start: position.clone(),
                    end: position,
                },
            }
        }
    };

    if parser.has_tokens() {
        let token = parser.current_token().clone();
        parser.report(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                token: token.value,
                expected: String::from("end of program"),
            },
            token.span.start,
        ));
    }

    Program {
        command,
        span: Span {
            start,
            end: parser.get_position(),
        },
    }
}
