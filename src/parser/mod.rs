//! Parser module for building the Abstract Syntax Tree (AST).
//!
//! This module contains the recursive-descent parser that transforms the
//! token sequence into an AST with one token of lookahead. It uses a Pratt
//! parser for expressions with binding powers for precedence and handles:
//!
//! - Command and declaration parsing
//! - Expression parsing (binary ops, calls, aggregates, literals)
//! - Value-name parsing (record fields, array subscripts)
//! - Type denoter parsing
//!
//! Syntax faults are reported to the diagnostics reporter at the offending
//! token; the parser then skips to the next command or declaration boundary
//! and continues, so several independent faults surface in one run. The
//! resulting tree is best-effort and must not be checked when any
//! diagnostics were raised.

pub mod commands;
pub mod expr;
pub mod lookups;
pub mod parser;
pub mod types;

#[cfg(test)]
mod tests;
