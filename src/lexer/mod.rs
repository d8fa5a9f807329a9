//! Lexical analysis module.
//!
//! The parsing engine treats the tokenizer as an external collaborator; this
//! is the reference token source used by the CLI, the tests and the
//! re-entrant interpolation parser. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - 1-based line/column tracking for error reporting
//! - Comments, emitted as `Comment` tokens for the parser to filter

pub mod lexer;
pub mod tokens;
