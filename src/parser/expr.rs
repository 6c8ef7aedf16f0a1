use crate::{
    ast::{
        ast::{Identifier, Vname, VnameKind},
        expressions::{Expression, ExpressionKind},
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    commands::{parse_actual_params, parse_declaration_sequence},
    lookups::BindingPower,
    parser::Parser,
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expression, Diagnostic> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    if !parser.get_nud_lookup().contains_key(&token_kind) {
        return Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                token: parser.current_token().value.clone(),
                expected: String::from("an expression"),
            },
            parser.get_position(),
        ));
    }

    let nud_fn = *parser.get_nud_lookup().get(&token_kind).unwrap();
    let mut left = nud_fn(parser)?;

    // While the next operator binds tighter than the current context,
    // keep extending the left-hand side.
    while *parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .unwrap_or(&BindingPower::Default)
        > bp
    {
        let token_kind = parser.current_token_kind();
        let led_fn = match parser.get_led_lookup().get(&token_kind) {
            Some(led_fn) => *led_fn,
            None => break,
        };
        let operator_bp = *parser.get_bp_lookup().get(&token_kind).unwrap();

        left = led_fn(parser, left, operator_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expression, Diagnostic> {
    match parser.current_token_kind() {
        TokenKind::IntLit => {
            let token = parser.advance().clone();
            match token.value.parse::<i32>() {
                Ok(value) => Ok(Expression::new(
                    ExpressionKind::IntLit { value },
                    token.span,
                )),
                Err(_) => Err(Diagnostic::new(
                    DiagnosticKind::IntegerLiteralTooLarge {
                        spelling: token.value,
                    },
                    token.span.start,
                )),
            }
        }
        TokenKind::CharLit => {
            let token = parser.advance().clone();
            let value = token.value.chars().next().unwrap_or(' ');
            Ok(Expression::new(
                ExpressionKind::CharLit { value },
                token.span,
            ))
        }
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            let name = Identifier {
                spelling: token.value.clone(),
                span: token.span.clone(),
            };

            if parser.current_token_kind() == TokenKind::OpenParen {
                let args = parse_actual_params(parser)?;
                let span = Span {
                    start: token.span.start,
                    end: parser.get_position(),
                };
                Ok(Expression::new(ExpressionKind::Call { name, args }, span))
            } else {
                let base = Vname::new(VnameKind::Simple { name }, token.span);
                let vname = parse_vname_suffixes(parser, base)?;
                let span = vname.span.clone();
                Ok(Expression::new(ExpressionKind::Vname { vname }, span))
            }
        }
        _ => Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                token: parser.current_token().value.clone(),
                expected: String::from("an expression"),
            },
            parser.get_position(),
        )),
    }
}

/// Extends a value-name with `.field` and `[index]` suffixes.
pub fn parse_vname_suffixes(parser: &mut Parser, base: Vname) -> Result<Vname, Diagnostic> {
    let mut vname = base;

    loop {
        match parser.current_token_kind() {
            TokenKind::Dot => {
                parser.advance();
                let field_token = parser.expect(TokenKind::Identifier)?;
                let span = Span {
                    start: vname.span.start.clone(),
                    end: field_token.span.end.clone(),
                };
                vname = Vname::new(
                    VnameKind::Dot {
                        record: Box::new(vname),
                        field: Identifier {
                            spelling: field_token.value,
                            span: field_token.span,
                        },
                    },
                    span,
                );
            }
            TokenKind::OpenBracket => {
                parser.advance();
                let index = parse_expr(parser, BindingPower::Default)?;
                let close = parser.expect(TokenKind::CloseBracket)?;
                let span = Span {
                    start: vname.span.start.clone(),
                    end: close.span.end,
                };
                vname = Vname::new(
                    VnameKind::Subscript {
                        array: Box::new(vname),
                        index: Box::new(index),
                    },
                    span,
                );
            }
            _ => break,
        }
    }

    Ok(vname)
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: Expression,
    bp: BindingPower,
) -> Result<Expression, Diagnostic> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    let span = Span {
        start: left.span.start.clone(),
        end: right.span.end.clone(),
    };
    Ok(Expression::new(
        ExpressionKind::Binary {
            operator: operator_token,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    ))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expression, Diagnostic> {
    let operator_token = parser.advance().clone();
    let operand = parse_expr(parser, BindingPower::Unary)?;

    let span = Span {
        start: operator_token.span.start.clone(),
        end: operand.span.end.clone(),
    };
    Ok(Expression::new(
        ExpressionKind::Unary {
            operator: operator_token,
            operand: Box::new(operand),
        },
        span,
    ))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expression, Diagnostic> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_let_expr(parser: &mut Parser) -> Result<Expression, Diagnostic> {
    let start = parser.advance().span.start.clone();

    let declarations = parse_declaration_sequence(parser);
    parser.expect(TokenKind::In)?;
    let body = parse_expr(parser, BindingPower::Default)?;

    let span = Span {
        start,
        end: body.span.end.clone(),
    };
    Ok(Expression::new(
        ExpressionKind::Let {
            declarations,
            body: Box::new(body),
        },
        span,
    ))
}

pub fn parse_if_expr(parser: &mut Parser) -> Result<Expression, Diagnostic> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Then)?;
    let then_expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Else)?;
    let else_expr = parse_expr(parser, BindingPower::Default)?;

    let span = Span {
        start,
        end: else_expr.span.end.clone(),
    };
    Ok(Expression::new(
        ExpressionKind::If {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        },
        span,
    ))
}

pub fn parse_array_aggregate(parser: &mut Parser) -> Result<Expression, Diagnostic> {
    let start = parser.advance().span.start.clone();

    let mut elements = vec![parse_expr(parser, BindingPower::Default)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        elements.push(parse_expr(parser, BindingPower::Default)?);
    }

    let close = parser.expect(TokenKind::CloseBracket)?;
    Ok(Expression::new(
        ExpressionKind::ArrayAggregate { elements },
        Span {
            start,
            end: close.span.end,
        },
    ))
}

pub fn parse_record_aggregate(parser: &mut Parser) -> Result<Expression, Diagnostic> {
    let start = parser.advance().span.start.clone();

    let mut fields = vec![];
    loop {
        let field_token = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Tilde)?;
        let value = parse_expr(parser, BindingPower::Default)?;
        fields.push((
            Identifier {
                spelling: field_token.value,
                span: field_token.span,
            },
            value,
        ));

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let close = parser.expect(TokenKind::CloseCurly)?;
    Ok(Expression::new(
        ExpressionKind::RecordAggregate { fields },
        Span {
            start,
            end: close.span.end,
        },
    ))
}
