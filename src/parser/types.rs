use crate::{
    ast::{
        ast::Identifier,
        types::{TypeDenoter, TypeDenoterKind},
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::TokenKind,
    Span,
};

use super::parser::Parser;

/// Parses a type denoter: a type identifier, `array N of T`, or
/// `record I1 : T1 , ... end`.
pub fn parse_type_denoter(parser: &mut Parser) -> Result<TypeDenoter, Diagnostic> {
    let start = parser.get_position();

    match parser.current_token_kind() {
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            Ok(TypeDenoter::new(
                TypeDenoterKind::Name {
                    name: Identifier {
                        spelling: token.value,
                        span: token.span.clone(),
                    },
                },
                token.span,
            ))
        }
        TokenKind::Array => {
            parser.advance();
            let size_token = parser.expect(TokenKind::IntLit)?;
            let size = match size_token.value.parse::<i32>() {
                Ok(size) => size,
                Err(_) => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::IntegerLiteralTooLarge {
                            spelling: size_token.value,
                        },
                        size_token.span.start,
                    ))
                }
            };
            parser.expect(TokenKind::Of)?;
            let elem = parse_type_denoter(parser)?;
            let span = Span {
                start,
                end: elem.span.end.clone(),
            };
            Ok(TypeDenoter::new(
                TypeDenoterKind::Array {
                    size,
                    elem: Box::new(elem),
                },
                span,
            ))
        }
        TokenKind::Record => {
            parser.advance();
            let mut fields = vec![];
            loop {
                let field_token = parser.expect(TokenKind::Identifier)?;
                parser.expect(TokenKind::Colon)?;
                let denoter = parse_type_denoter(parser)?;
                fields.push((
                    Identifier {
                        spelling: field_token.value,
                        span: field_token.span,
                    },
                    denoter,
                ));

                if parser.current_token_kind() == TokenKind::Comma {
                    parser.advance();
                } else {
                    break;
                }
            }
            let end_token = parser.expect(TokenKind::End)?;
            Ok(TypeDenoter::new(
                TypeDenoterKind::Record { fields },
                Span {
                    start,
                    end: end_token.span.end,
                },
            ))
        }
        _ => Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                token: parser.current_token().value.clone(),
                expected: String::from("a type denoter"),
            },
            parser.get_position(),
        )),
    }
}
