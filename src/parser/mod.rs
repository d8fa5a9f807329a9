//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with table-driven operator precedence and handles:
//!
//! - Statement parsing (declarations, `end`-terminated blocks, control flow)
//! - Expression parsing (binary ops, calls, literals, UI elements)
//! - Type parsing for type annotations
//! - String interpolation through nested parsers
//! - Error accumulation and recovery
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod interpolation;
pub mod lookups;
pub mod parser;
pub mod recovery;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
