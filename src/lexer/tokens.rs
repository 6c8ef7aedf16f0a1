use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("array", TokenKind::Array);
        map.insert("begin", TokenKind::Begin);
        map.insert("const", TokenKind::Const);
        map.insert("do", TokenKind::Do);
        map.insert("else", TokenKind::Else);
        map.insert("end", TokenKind::End);
        map.insert("func", TokenKind::Func);
        map.insert("if", TokenKind::If);
        map.insert("in", TokenKind::In);
        map.insert("let", TokenKind::Let);
        map.insert("of", TokenKind::Of);
        map.insert("proc", TokenKind::Proc);
        map.insert("record", TokenKind::Record);
        map.insert("then", TokenKind::Then);
        map.insert("type", TokenKind::Type);
        map.insert("var", TokenKind::Var);
        map.insert("while", TokenKind::While);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    IntLit,
    CharLit,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Becomes,   // :=
    Tilde,     // ~
    Colon,
    Semicolon,
    Comma,
    Dot,

    Equals,          // =
    BackslashEquals, // \=
    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    LogAnd, // /\
    LogOr,  // \/
    Backslash,

    Plus,
    Dash,
    Star,
    Slash,
    SlashSlash, // //

    // Reserved
    Array,
    Begin,
    Const,
    Do,
    Else,
    End,
    Func,
    If,
    In,
    Let,
    Of,
    Proc,
    Record,
    Then,
    Type,
    Var,
    While,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    fn is_one_of_many(&self, tokens: Vec<TokenKind>) -> bool {
        for token in tokens {
            if token == self.kind {
                return true;
            }
        }

        false
    }

    pub fn debug(&self) {
        if self.is_one_of_many(vec![
            TokenKind::CharLit,
            TokenKind::Identifier,
            TokenKind::IntLit,
        ]) {
            println!("{} ({})", self.kind, self.value);
        } else {
            println!("{} ()", self.kind);
        }
    }
}
