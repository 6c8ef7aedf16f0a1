use std::collections::HashMap;

use crate::{ast::expressions::Expression, errors::errors::Diagnostic, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser};

/// Operator precedence, loosest first. Binary operators are
/// left-associative: the LED handler parses its right operand at the
/// operator's own binding power, and the expression loop only continues
/// while the next operator binds strictly tighter.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    LogicalOr,
    LogicalAnd,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Primary,
}

pub type NUDHandler = fn(&mut Parser) -> Result<Expression, Diagnostic>;
pub type LEDHandler = fn(&mut Parser, Expression, BindingPower) -> Result<Expression, Diagnostic>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Logical
    parser.led(TokenKind::LogOr, BindingPower::LogicalOr, parse_binary_expr);
    parser.led(TokenKind::LogAnd, BindingPower::LogicalAnd, parse_binary_expr);

    // Relational
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::BackslashEquals, BindingPower::Relational, parse_binary_expr);

    // Additive and multiplicative
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::SlashSlash, BindingPower::Multiplicative, parse_binary_expr);

    // Literals, names and prefix forms
    parser.nud(TokenKind::IntLit, parse_primary_expr);
    parser.nud(TokenKind::CharLit, parse_primary_expr);
    parser.nud(TokenKind::Identifier, parse_primary_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::Backslash, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_aggregate);
    parser.nud(TokenKind::OpenCurly, parse_record_aggregate);
    parser.nud(TokenKind::Let, parse_let_expr);
    parser.nud(TokenKind::If, parse_if_expr);
}

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
