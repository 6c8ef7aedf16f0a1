use crate::{
    ast::{
        ast::{
            ActualParam, ActualParamKind, Command, CommandKind, Declaration, DeclarationKind,
            Program, Vname, VnameKind,
        },
        expressions::{Expression, ExpressionKind},
    },
    errors::{errors::DiagnosticKind, reporter::Reporter},
    lexer::tokens::TokenKind,
};

/// Folds every constant subexpression of a checked program in place.
pub fn fold_program(program: &mut Program, reporter: &mut Reporter) {
    fold_command(&mut program.command, reporter);
}

fn fold_command(command: &mut Command, reporter: &mut Reporter) {
    match &mut command.kind {
        CommandKind::Assign { target, value } => {
            fold_vname(target, reporter);
            fold_expression(value, reporter);
        }
        CommandKind::Call { args, .. } => {
            for arg in args {
                fold_actual_param(arg, reporter);
            }
        }
        CommandKind::Sequence { commands } => {
            for command in commands {
                fold_command(command, reporter);
            }
        }
        CommandKind::If {
            condition,
            then_command,
            else_command,
        } => {
            fold_expression(condition, reporter);
            fold_command(then_command, reporter);
            fold_command(else_command, reporter);
        }
        CommandKind::While { condition, body } => {
            fold_expression(condition, reporter);
            fold_command(body, reporter);
        }
        CommandKind::Let { declarations, body } => {
            for declaration in declarations {
                fold_declaration(declaration, reporter);
            }
            fold_command(body, reporter);
        }
        CommandKind::Skip => {}
    }
}

fn fold_declaration(declaration: &mut Declaration, reporter: &mut Reporter) {
    match &mut declaration.kind {
        DeclarationKind::Const { value, .. } => fold_expression(value, reporter),
        DeclarationKind::Proc { body, .. } => fold_command(body, reporter),
        DeclarationKind::Func { body, .. } => fold_expression(body, reporter),
        DeclarationKind::Var { .. } | DeclarationKind::TypeDecl { .. } => {}
    }
}

fn fold_actual_param(arg: &mut ActualParam, reporter: &mut Reporter) {
    match &mut arg.kind {
        ActualParamKind::Value { expr } => fold_expression(expr, reporter),
        ActualParamKind::VarParam { vname } => fold_vname(vname, reporter),
        ActualParamKind::ProcParam { .. } | ActualParamKind::FuncParam { .. } => {}
    }
}

fn fold_vname(vname: &mut Vname, reporter: &mut Reporter) {
    match &mut vname.kind {
        VnameKind::Simple { .. } => {}
        VnameKind::Dot { record, .. } => fold_vname(record, reporter),
        VnameKind::Subscript { array, index } => {
            fold_vname(array, reporter);
            fold_expression(index, reporter);
        }
    }
}

/// Bottom-up fold of one expression. Subtrees are folded first; when the
/// operands of an operator application end up literal, the application is
/// replaced by a literal node holding the result the machine would
/// compute. The node's checked type annotation is kept, so a folded
/// comparison stays a Boolean expression holding 0 or 1.
pub fn fold_expression(expr: &mut Expression, reporter: &mut Reporter) {
    let folded = match &mut expr.kind {
        ExpressionKind::IntLit { .. } | ExpressionKind::CharLit { .. } => None,
        ExpressionKind::Vname { vname } => {
            fold_vname(vname, reporter);
            None
        }
        ExpressionKind::Call { args, .. } => {
            for arg in args {
                fold_actual_param(arg, reporter);
            }
            None
        }
        ExpressionKind::Unary { operator, operand } => {
            fold_expression(operand, reporter);
            match operand.literal_value() {
                Some(value) => match operator.kind {
                    TokenKind::Dash => Some(value.wrapping_neg()),
                    TokenKind::Backslash => Some((value == 0) as i32),
                    _ => None,
                },
                None => None,
            }
        }
        ExpressionKind::Binary {
            operator,
            left,
            right,
        } => {
            fold_expression(left, reporter);
            fold_expression(right, reporter);
            match (left.literal_value(), right.literal_value()) {
                (Some(left_value), Some(right_value)) => {
                    if matches!(operator.kind, TokenKind::Slash | TokenKind::SlashSlash)
                        && right_value == 0
                    {
                        // The machine fails on this at runtime; folding it
                        // away would change that, so the division stays.
                        reporter.warn(
                            DiagnosticKind::ConstantDivisionByZero,
                            operator.span.start.clone(),
                        );
                        None
                    } else {
                        fold_binary(operator.kind, left_value, right_value)
                    }
                }
                _ => None,
            }
        }
        ExpressionKind::Let { declarations, body } => {
            for declaration in declarations {
                fold_declaration(declaration, reporter);
            }
            fold_expression(body, reporter);
            None
        }
        ExpressionKind::If {
            condition,
            then_expr,
            else_expr,
        } => {
            fold_expression(condition, reporter);
            fold_expression(then_expr, reporter);
            fold_expression(else_expr, reporter);
            None
        }
        ExpressionKind::ArrayAggregate { elements } => {
            for element in elements {
                fold_expression(element, reporter);
            }
            None
        }
        ExpressionKind::RecordAggregate { fields } => {
            for (_, value) in fields {
                fold_expression(value, reporter);
            }
            None
        }
    };

    if let Some(value) = folded {
        expr.kind = ExpressionKind::IntLit { value };
    }
}

/// The statically computed machine word for one binary application, or
/// None for operators that are not compile-time evaluable. Arithmetic
/// wraps exactly as the machine's primitives do.
fn fold_binary(operator: TokenKind, left: i32, right: i32) -> Option<i32> {
    match operator {
        TokenKind::Plus => Some(left.wrapping_add(right)),
        TokenKind::Dash => Some(left.wrapping_sub(right)),
        TokenKind::Star => Some(left.wrapping_mul(right)),
        TokenKind::Slash => Some(left.wrapping_div(right)),
        TokenKind::SlashSlash => Some(left.wrapping_rem(right)),
        TokenKind::Less => Some((left < right) as i32),
        TokenKind::LessEquals => Some((left <= right) as i32),
        TokenKind::Greater => Some((left > right) as i32),
        TokenKind::GreaterEquals => Some((left >= right) as i32),
        TokenKind::Equals => Some((left == right) as i32),
        TokenKind::BackslashEquals => Some((left != right) as i32),
        TokenKind::LogAnd => Some((left != 0 && right != 0) as i32),
        TokenKind::LogOr => Some((left != 0 || right != 0) as i32),
        _ => None,
    }
}
