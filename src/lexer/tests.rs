//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Reserved words and identifiers
//! - Integer and character literals
//! - Operators and punctuation
//! - Comments
//! - Unrecognised characters

use crate::errors::reporter::Reporter;

use super::{lexer::tokenize, tokens::TokenKind};

fn tokenize_clean(source: &str) -> Vec<super::tokens::Token> {
    let mut reporter = Reporter::new();
    let tokens = tokenize(
        source.to_string(),
        Some("test.slate".to_string()),
        &mut reporter,
    );
    assert_eq!(reporter.num_errors(), 0, "unexpected lexical errors");
    tokens
}

#[test]
fn test_tokenize_reserved_words() {
    let tokens =
        tokenize_clean("array begin const do else end func if in let of proc record then type var while");

    assert_eq!(tokens[0].kind, TokenKind::Array);
    assert_eq!(tokens[1].kind, TokenKind::Begin);
    assert_eq!(tokens[2].kind, TokenKind::Const);
    assert_eq!(tokens[3].kind, TokenKind::Do);
    assert_eq!(tokens[4].kind, TokenKind::Else);
    assert_eq!(tokens[5].kind, TokenKind::End);
    assert_eq!(tokens[6].kind, TokenKind::Func);
    assert_eq!(tokens[7].kind, TokenKind::If);
    assert_eq!(tokens[8].kind, TokenKind::In);
    assert_eq!(tokens[9].kind, TokenKind::Let);
    assert_eq!(tokens[10].kind, TokenKind::Of);
    assert_eq!(tokens[11].kind, TokenKind::Proc);
    assert_eq!(tokens[12].kind, TokenKind::Record);
    assert_eq!(tokens[13].kind, TokenKind::Then);
    assert_eq!(tokens[14].kind, TokenKind::Type);
    assert_eq!(tokens[15].kind, TokenKind::Var);
    assert_eq!(tokens[16].kind, TokenKind::While);
    assert_eq!(tokens[17].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_identifiers() {
    let tokens = tokenize_clean("foo bar baz_123 CamelCase letter");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "bar");
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].value, "CamelCase");
    // A reserved word prefix does not make an identifier reserved.
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "letter");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let tokens = tokenize_clean("42 0 100500");

    assert_eq!(tokens[0].kind, TokenKind::IntLit);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::IntLit);
    assert_eq!(tokens[1].value, "0");
    assert_eq!(tokens[2].kind, TokenKind::IntLit);
    assert_eq!(tokens[2].value, "100500");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_char_literals() {
    let tokens = tokenize_clean("'a' 'Z' ' '");

    assert_eq!(tokens[0].kind, TokenKind::CharLit);
    assert_eq!(tokens[0].value, "a");
    assert_eq!(tokens[1].kind, TokenKind::CharLit);
    assert_eq!(tokens[1].value, "Z");
    assert_eq!(tokens[2].kind, TokenKind::CharLit);
    assert_eq!(tokens[2].value, " ");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    let tokens = tokenize_clean("+ - * / // < <= > >= = \\= /\\ \\/ \\");

    assert_eq!(tokens[0].kind, TokenKind::Plus);
    assert_eq!(tokens[1].kind, TokenKind::Dash);
    assert_eq!(tokens[2].kind, TokenKind::Star);
    assert_eq!(tokens[3].kind, TokenKind::Slash);
    assert_eq!(tokens[4].kind, TokenKind::SlashSlash);
    assert_eq!(tokens[5].kind, TokenKind::Less);
    assert_eq!(tokens[6].kind, TokenKind::LessEquals);
    assert_eq!(tokens[7].kind, TokenKind::Greater);
    assert_eq!(tokens[8].kind, TokenKind::GreaterEquals);
    assert_eq!(tokens[9].kind, TokenKind::Equals);
    assert_eq!(tokens[10].kind, TokenKind::BackslashEquals);
    assert_eq!(tokens[11].kind, TokenKind::LogAnd);
    assert_eq!(tokens[12].kind, TokenKind::LogOr);
    assert_eq!(tokens[13].kind, TokenKind::Backslash);
    assert_eq!(tokens[14].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_punctuation() {
    let tokens = tokenize_clean(":= : ~ ; , . ( ) [ ] { }");

    assert_eq!(tokens[0].kind, TokenKind::Becomes);
    assert_eq!(tokens[1].kind, TokenKind::Colon);
    assert_eq!(tokens[2].kind, TokenKind::Tilde);
    assert_eq!(tokens[3].kind, TokenKind::Semicolon);
    assert_eq!(tokens[4].kind, TokenKind::Comma);
    assert_eq!(tokens[5].kind, TokenKind::Dot);
    assert_eq!(tokens[6].kind, TokenKind::OpenParen);
    assert_eq!(tokens[7].kind, TokenKind::CloseParen);
    assert_eq!(tokens[8].kind, TokenKind::OpenBracket);
    assert_eq!(tokens[9].kind, TokenKind::CloseBracket);
    assert_eq!(tokens[10].kind, TokenKind::OpenCurly);
    assert_eq!(tokens[11].kind, TokenKind::CloseCurly);
    assert_eq!(tokens[12].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_assignment_command() {
    let tokens = tokenize_clean("x := x + 1");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Becomes);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
    assert_eq!(tokens[3].kind, TokenKind::Plus);
    assert_eq!(tokens[4].kind, TokenKind::IntLit);
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_comments() {
    let tokens = tokenize_clean("x ! the rest of this line vanishes\n:= 1");

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Becomes);
    assert_eq!(tokens[2].kind, TokenKind::IntLit);
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_positions() {
    let tokens = tokenize_clean("let x");

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[1].span.start.0, 4);
}

#[test]
fn test_unrecognised_character_is_reported_and_skipped() {
    let mut reporter = Reporter::new();
    let tokens = tokenize(
        "x @ y".to_string(),
        Some("test.slate".to_string()),
        &mut reporter,
    );

    assert_eq!(reporter.num_errors(), 1);
    assert_eq!(reporter.diagnostics()[0].get_position().0, 2);

    // Scanning continued past the bad character.
    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].value, "y");
    assert_eq!(tokens[2].kind, TokenKind::EOF);
}

#[test]
fn test_multiple_unrecognised_characters() {
    let mut reporter = Reporter::new();
    let tokens = tokenize(
        "# $ %".to_string(),
        Some("test.slate".to_string()),
        &mut reporter,
    );

    assert_eq!(reporter.num_errors(), 3);
    assert_eq!(tokens.last().unwrap().kind, TokenKind::EOF);
}
