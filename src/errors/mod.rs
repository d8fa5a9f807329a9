//! Error types and error reporting for the front end.
//!
//! This module defines the diagnostics produced while tokenizing and
//! parsing. It includes:
//!
//! - Error structures with line/column position information
//! - The closed set of failure kinds (`ErrorImpl`)
//! - Error formatting and short suggestions for the CLI

pub mod errors;

#[cfg(test)]
mod tests;
