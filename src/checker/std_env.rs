//! The standard environment: the types, constants and routines every
//! program can use without declaring, plus the operator signature tables.
//! All of it lives in the outermost scope frame and may be shadowed.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::ast::types::Type;
use crate::lexer::tokens::TokenKind;

use super::scope::{DeclInfo, ParamSig, ScopeStack};

/// Signature of a binary operator.
#[derive(Debug, Clone)]
pub enum BinaryOpSig {
    /// Both operands of one fixed type.
    Fixed { operand: Type, result: Type },
    /// `=` and `\=`: both operands of the same arbitrary type.
    Equality,
}

lazy_static! {
    pub static ref BINARY_OPS: HashMap<TokenKind, BinaryOpSig> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Plus, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Int });
        map.insert(TokenKind::Dash, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Int });
        map.insert(TokenKind::Star, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Int });
        map.insert(TokenKind::Slash, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Int });
        map.insert(TokenKind::SlashSlash, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Int });
        map.insert(TokenKind::Less, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Bool });
        map.insert(TokenKind::LessEquals, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Bool });
        map.insert(TokenKind::Greater, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Bool });
        map.insert(TokenKind::GreaterEquals, BinaryOpSig::Fixed { operand: Type::Int, result: Type::Bool });
        map.insert(TokenKind::LogAnd, BinaryOpSig::Fixed { operand: Type::Bool, result: Type::Bool });
        map.insert(TokenKind::LogOr, BinaryOpSig::Fixed { operand: Type::Bool, result: Type::Bool });
        map.insert(TokenKind::Equals, BinaryOpSig::Equality);
        map.insert(TokenKind::BackslashEquals, BinaryOpSig::Equality);
        map
    };

    /// Unary operator signatures: operand type and result type.
    pub static ref UNARY_OPS: HashMap<TokenKind, (Type, Type)> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Dash, (Type::Int, Type::Int));
        map.insert(TokenKind::Backslash, (Type::Bool, Type::Bool));
        map
    };
}

/// Enters the standard environment into the outermost scope frame.
pub fn populate(scope: &mut ScopeStack<DeclInfo>) {
    scope.declare("Integer", DeclInfo::TypeName { ty: Type::Int });
    scope.declare("Char", DeclInfo::TypeName { ty: Type::Char });
    scope.declare("Boolean", DeclInfo::TypeName { ty: Type::Bool });

    scope.declare("false", DeclInfo::Constant { ty: Type::Bool });
    scope.declare("true", DeclInfo::Constant { ty: Type::Bool });
    scope.declare("maxint", DeclInfo::Constant { ty: Type::Int });

    scope.declare(
        "chr",
        DeclInfo::Function {
            params: vec![ParamSig::Value(Type::Int)],
            result: Type::Char,
        },
    );
    scope.declare(
        "ord",
        DeclInfo::Function {
            params: vec![ParamSig::Value(Type::Char)],
            result: Type::Int,
        },
    );
    scope.declare(
        "eol",
        DeclInfo::Function {
            params: vec![],
            result: Type::Bool,
        },
    );
    scope.declare(
        "eof",
        DeclInfo::Function {
            params: vec![],
            result: Type::Bool,
        },
    );

    scope.declare(
        "get",
        DeclInfo::Procedure {
            params: vec![ParamSig::Var(Type::Char)],
        },
    );
    scope.declare(
        "put",
        DeclInfo::Procedure {
            params: vec![ParamSig::Value(Type::Char)],
        },
    );
    scope.declare(
        "getint",
        DeclInfo::Procedure {
            params: vec![ParamSig::Var(Type::Int)],
        },
    );
    scope.declare(
        "putint",
        DeclInfo::Procedure {
            params: vec![ParamSig::Value(Type::Int)],
        },
    );
    scope.declare("geteol", DeclInfo::Procedure { params: vec![] });
    scope.declare("puteol", DeclInfo::Procedure { params: vec![] });
}
