//! Description of the SAM target machine.
//!
//! SAM is a word-addressed stack machine with 32-bit signed words.
//! Arithmetic wraps modulo 2^32; division and modulo by zero fail at
//! runtime. An instruction is four words (op, r, n, d), serialized
//! big-endian in emission order; the loader expects nothing else in the
//! object file.

use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::lexer::tokens::TokenKind;

/// Sizes of values in machine words.
pub const INTEGER_SIZE: i32 = 1;
pub const CHARACTER_SIZE: i32 = 1;
pub const BOOLEAN_SIZE: i32 = 1;
pub const ADDRESS_SIZE: i32 = 1;
/// A routine closure: static link plus code address.
pub const CLOSURE_SIZE: i32 = 2;

/// Runtime representations of the standard constants.
pub const FALSE_REP: i32 = 0;
pub const TRUE_REP: i32 = 1;
pub const MAXINT_REP: i32 = i32::MAX;

/// Words of link data (static link, dynamic link, return address) at the
/// base of every routine frame; locals start above them. The globals
/// frame has no link data.
pub const LINK_DATA_SIZE: i32 = 3;

/// The display register file covers the local frame plus six enclosing
/// levels; deeper non-local access cannot be addressed.
pub const MAX_ROUTINE_LEVEL: u8 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Opcode {
    Load = 0,
    Loada = 1,
    Loadi = 2,
    Loadl = 3,
    Store = 4,
    Storei = 5,
    Call = 6,
    Calli = 7,
    Return = 8,
    Push = 10,
    Pop = 11,
    Jump = 12,
    Jumpi = 13,
    Jumpif = 14,
    Halt = 15,
}

/// Machine registers by number, as used in an instruction's r field.
pub mod registers {
    pub const CB: i32 = 0;
    pub const CT: i32 = 1;
    pub const PB: i32 = 2;
    pub const PT: i32 = 3;
    pub const SB: i32 = 4;
    pub const ST: i32 = 5;
    pub const HB: i32 = 6;
    pub const HT: i32 = 7;
    pub const LB: i32 = 8;
    pub const L1: i32 = 9;
    pub const L2: i32 = 10;
    pub const L3: i32 = 11;
    pub const L4: i32 = 12;
    pub const L5: i32 = 13;
    pub const L6: i32 = 14;
    pub const CP: i32 = 15;
}

/// Displacements of the primitive routines from the PB register.
pub mod primitives {
    pub const ID: i32 = 1;
    pub const NOT: i32 = 2;
    pub const AND: i32 = 3;
    pub const OR: i32 = 4;
    pub const SUCC: i32 = 5;
    pub const PRED: i32 = 6;
    pub const NEG: i32 = 7;
    pub const ADD: i32 = 8;
    pub const SUB: i32 = 9;
    pub const MULT: i32 = 10;
    pub const DIV: i32 = 11;
    pub const MOD: i32 = 12;
    pub const LT: i32 = 13;
    pub const LE: i32 = 14;
    pub const GE: i32 = 15;
    pub const GT: i32 = 16;
    pub const EQ: i32 = 17;
    pub const NE: i32 = 18;
    pub const EOL: i32 = 19;
    pub const EOF: i32 = 20;
    pub const GET: i32 = 21;
    pub const PUT: i32 = 22;
    pub const GETEOL: i32 = 23;
    pub const PUTEOL: i32 = 24;
    pub const GETINT: i32 = 25;
    pub const PUTINT: i32 = 26;
}

lazy_static! {
    /// Binary operators realized as a single primitive call. `=` and `\=`
    /// are absent: they additionally push the compared size.
    pub static ref BINARY_OP_PRIMITIVES: HashMap<TokenKind, i32> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Plus, primitives::ADD);
        map.insert(TokenKind::Dash, primitives::SUB);
        map.insert(TokenKind::Star, primitives::MULT);
        map.insert(TokenKind::Slash, primitives::DIV);
        map.insert(TokenKind::SlashSlash, primitives::MOD);
        map.insert(TokenKind::Less, primitives::LT);
        map.insert(TokenKind::LessEquals, primitives::LE);
        map.insert(TokenKind::Greater, primitives::GT);
        map.insert(TokenKind::GreaterEquals, primitives::GE);
        map.insert(TokenKind::LogAnd, primitives::AND);
        map.insert(TokenKind::LogOr, primitives::OR);
        map
    };

    pub static ref UNARY_OP_PRIMITIVES: HashMap<TokenKind, i32> = {
        let mut map = HashMap::new();
        map.insert(TokenKind::Dash, primitives::NEG);
        map.insert(TokenKind::Backslash, primitives::NOT);
        map
    };

    /// The standard routines, by spelling. `chr` and `ord` are the
    /// identity on machine words.
    pub static ref PRIMITIVE_ROUTINES: HashMap<&'static str, i32> = {
        let mut map = HashMap::new();
        map.insert("chr", primitives::ID);
        map.insert("ord", primitives::ID);
        map.insert("eol", primitives::EOL);
        map.insert("eof", primitives::EOF);
        map.insert("get", primitives::GET);
        map.insert("put", primitives::PUT);
        map.insert("getint", primitives::GETINT);
        map.insert("putint", primitives::PUTINT);
        map.insert("geteol", primitives::GETEOL);
        map.insert("puteol", primitives::PUTEOL);
        map
    };
}
