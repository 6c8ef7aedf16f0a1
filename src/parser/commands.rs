use crate::{
    ast::ast::{
        ActualParam, ActualParamKind, Command, CommandKind, Declaration, DeclarationKind,
        FormalParam, FormalParamKind, Identifier, Vname, VnameKind,
    },
    errors::errors::{Diagnostic, DiagnosticKind},
    lexer::tokens::TokenKind,
    Span,
};

use super::{
    expr::{parse_expr, parse_vname_suffixes},
    lookups::BindingPower,
    parser::Parser,
    types::parse_type_denoter,
};

/// Parses a command sequence (`C1 ; C2 ; ...`) up to one of the given
/// closing tokens. On a syntax fault the parser resynchronises at the next
/// `;` or closing token, so one run surfaces several independent faults.
pub fn parse_command(parser: &mut Parser, stop: &[TokenKind]) -> Command {
    let start = parser.get_position();
    let mut commands = vec![];

    loop {
        match parse_single_command(parser) {
            Ok(command) => commands.push(command),
            Err(diagnostic) => {
                parser.report(diagnostic);
                let mut sync = vec![TokenKind::Semicolon];
                sync.extend_from_slice(stop);
                parser.skip_to(&sync);
            }
        }

        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        } else {
            break;
        }
    }

    if commands.len() == 1 {
        return commands.remove(0);
    }

    let span = Span {
        start,
        end: parser.get_position(),
    };
    Command {
        kind: CommandKind::Sequence { commands },
        span,
    }
}

pub fn parse_single_command(parser: &mut Parser) -> Result<Command, Diagnostic> {
    let start = parser.get_position();

    match parser.current_token_kind() {
        TokenKind::Begin => {
            parser.advance();
            let command = parse_command(parser, &[TokenKind::End]);
            parser.expect(TokenKind::End)?;
            Ok(command)
        }
        TokenKind::Let => {
            parser.advance();
            let declarations = parse_declaration_sequence(parser);
            parser.expect(TokenKind::In)?;
            let body = parse_single_command(parser)?;
            let span = Span {
                start,
                end: parser.get_position(),
            };
            Ok(Command {
                kind: CommandKind::Let {
                    declarations,
                    body: Box::new(body),
                },
                span,
            })
        }
        TokenKind::If => {
            parser.advance();
            let condition = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Then)?;
            let then_command = parse_single_command(parser)?;
            parser.expect(TokenKind::Else)?;
            let else_command = parse_single_command(parser)?;
            let span = Span {
                start,
                end: parser.get_position(),
            };
            Ok(Command {
                kind: CommandKind::If {
                    condition,
                    then_command: Box::new(then_command),
                    else_command: Box::new(else_command),
                },
                span,
            })
        }
        TokenKind::While => {
            parser.advance();
            let condition = parse_expr(parser, BindingPower::Default)?;
            parser.expect(TokenKind::Do)?;
            let body = parse_single_command(parser)?;
            let span = Span {
                start,
                end: parser.get_position(),
            };
            Ok(Command {
                kind: CommandKind::While {
                    condition,
                    body: Box::new(body),
                },
                span,
            })
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
                    start,
                    end: parser.get_position(),
                };
                Ok(Command {
                    kind: CommandKind::Call { name, args },
                    span,
                })
            } else {
                let base = Vname::new(VnameKind::Simple { name }, token.span);
                let target = parse_vname_suffixes(parser, base)?;
                parser.expect(TokenKind::Becomes)?;
                let value = parse_expr(parser, BindingPower::Default)?;
                let span = Span {
                    start,
                    end: value.span.end.clone(),
                };
                Ok(Command {
                    kind: CommandKind::Assign { target, value },
                    span,
                })
            }
        }
        // The empty command.
        TokenKind::Semicolon
        | TokenKind::End
        | TokenKind::In
        | TokenKind::Else
        | TokenKind::EOF => Ok(Command {
            kind: CommandKind::Skip,
            span: Span {
                start: start.clone(),
                end: start,
            },
        }),
        _ => Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                token: parser.current_token().value.clone(),
                expected: String::from("a command"),
            },
            parser.get_position(),
        )),
    }
}

/// Parses a declaration sequence (`D1 ; D2 ; ...`), recovering at `;` and
/// `in` so later declarations still parse after a fault.
pub fn parse_declaration_sequence(parser: &mut Parser) -> Vec<Declaration> {
    let mut declarations = vec![];

    loop {
        match parse_declaration(parser) {
            Ok(declaration) => declarations.push(declaration),
            Err(diagnostic) => {
                parser.report(diagnostic);
                parser.skip_to(&[TokenKind::Semicolon, TokenKind::In]);
            }
        }

        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        } else {
            break;
        }
    }

    declarations
}

pub fn parse_declaration(parser: &mut Parser) -> Result<Declaration, Diagnostic> {
    let start = parser.get_position();

    match parser.current_token_kind() {
        TokenKind::Var => {
            parser.advance();
            let name = expect_identifier(parser, "an identifier after `var`")?;
            parser.expect(TokenKind::Colon)?;
            let denoter = parse_type_denoter(parser)?;
            let span = Span {
                start,
                end: denoter.span.end.clone(),
            };
            Ok(Declaration {
                kind: DeclarationKind::Var { name, denoter },
                span,
            })
        }
        TokenKind::Proc => {
            parser.advance();
            let name = expect_identifier(parser, "a procedure name")?;
            let params = parse_formal_params(parser)?;
            parser.expect(TokenKind::Tilde)?;
            let body = parse_single_command(parser)?;
            let span = Span {
                start,
                end: parser.get_position(),
            };
            Ok(Declaration {
                kind: DeclarationKind::Proc {
                    name,
                    params,
                    body: Box::new(body),
                },
                span,
            })
        }
        TokenKind::Func => {
            parser.advance();
            let name = expect_identifier(parser, "a function name")?;
            let params = parse_formal_params(parser)?;
            parser.expect(TokenKind::Colon)?;
            let result = parse_type_denoter(parser)?;
            parser.expect(TokenKind::Tilde)?;
            let body = parse_expr(parser, BindingPower::Default)?;
            let span = Span {
                start,
                end: body.span.end.clone(),
            };
            Ok(Declaration {
                kind: DeclarationKind::Func {
                    name,
                    params,
                    result,
                    body: Box::new(body),
                },
                span,
            })
        }
        TokenKind::Type => {
            parser.advance();
            let name = expect_identifier(parser, "a type name")?;
            parser.expect(TokenKind::Tilde)?;
            let denoter = parse_type_denoter(parser)?;
            let span = Span {
                start,
                end: denoter.span.end.clone(),
            };
            Ok(Declaration {
                kind: DeclarationKind::TypeDecl { name, denoter },
                span,
            })
        }
        // Constant: `I : T ~ E`
        TokenKind::Identifier => {
            let name = expect_identifier(parser, "an identifier")?;
            parser.expect(TokenKind::Colon)?;
            let denoter = parse_type_denoter(parser)?;
            parser.expect(TokenKind::Tilde)?;
            let value = parse_expr(parser, BindingPower::Default)?;
            let span = Span {
                start,
                end: value.span.end.clone(),
            };
            Ok(Declaration {
                kind: DeclarationKind::Const {
                    name,
                    denoter,
                    value,
                },
                span,
            })
        }
        _ => Err(Diagnostic::new(
            DiagnosticKind::UnexpectedToken {
                token: parser.current_token().value.clone(),
                expected: String::from("a declaration"),
            },
            parser.get_position(),
        )),
    }
}

fn expect_identifier(parser: &mut Parser, expected: &str) -> Result<Identifier, Diagnostic> {
    let error = Diagnostic::new(
        DiagnosticKind::UnexpectedToken {
            token: parser.current_token().value.clone(),
            expected: String::from(expected),
        },
        parser.get_position(),
    );
    let token = parser.expect_error(TokenKind::Identifier, Some(error))?;
    Ok(Identifier {
        spelling: token.value,
        span: token.span,
    })
}

/// Parses a parenthesised formal parameter list.
pub fn parse_formal_params(parser: &mut Parser) -> Result<Vec<FormalParam>, Diagnostic> {
    parser.expect(TokenKind::OpenParen)?;

    let mut params = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let start = parser.get_position();
        let kind = match parser.current_token_kind() {
            TokenKind::Var => {
                parser.advance();
                let name = expect_identifier(parser, "a parameter name")?;
                parser.expect(TokenKind::Colon)?;
                let denoter = parse_type_denoter(parser)?;
                FormalParamKind::VarParam { name, denoter }
            }
            TokenKind::Proc => {
                parser.advance();
                let name = expect_identifier(parser, "a parameter name")?;
                let inner = parse_formal_params(parser)?;
                FormalParamKind::ProcParam {
                    name,
                    params: inner,
                }
            }
            TokenKind::Func => {
                parser.advance();
                let name = expect_identifier(parser, "a parameter name")?;
                let inner = parse_formal_params(parser)?;
                parser.expect(TokenKind::Colon)?;
                let result = parse_type_denoter(parser)?;
                FormalParamKind::FuncParam {
                    name,
                    params: inner,
                    result,
                }
            }
            _ => {
                let name = expect_identifier(parser, "a parameter name")?;
                parser.expect(TokenKind::Colon)?;
                let denoter = parse_type_denoter(parser)?;
                FormalParamKind::Value { name, denoter }
            }
        };

        params.push(FormalParam {
            kind,
            span: Span {
                start,
                end: parser.get_position(),
            },
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(params)
}

/// Parses a parenthesised actual parameter list.
pub fn parse_actual_params(parser: &mut Parser) -> Result<Vec<ActualParam>, Diagnostic> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = vec![];
    while parser.current_token_kind() != TokenKind::CloseParen {
        let start = parser.get_position();
        let kind = match parser.current_token_kind() {
            TokenKind::Var => {
                parser.advance();
                let name = expect_identifier(parser, "a variable name after `var`")?;
                let span = name.span.clone();
                let base = Vname::new(VnameKind::Simple { name }, span);
                let vname = parse_vname_suffixes(parser, base)?;
                ActualParamKind::VarParam { vname }
            }
            TokenKind::Proc => {
                parser.advance();
                let name = expect_identifier(parser, "a procedure name after `proc`")?;
                ActualParamKind::ProcParam { name }
            }
            TokenKind::Func => {
                parser.advance();
                let name = expect_identifier(parser, "a function name after `func`")?;
                ActualParamKind::FuncParam { name }
            }
            _ => ActualParamKind::Value {
                expr: parse_expr(parser, BindingPower::Default)?,
            },
        };

        args.push(ActualParam {
            kind,
            span: Span {
                start,
                end: parser.get_position(),
            },
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(args)
}
