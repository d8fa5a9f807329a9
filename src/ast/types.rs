//! Supporting value types for the syntax tree.
//!
//! These are not statements or expressions themselves but the pieces the
//! larger nodes are assembled from:
//!
//! - Type annotations (with nested generic parameters)
//! - Parameters and struct fields
//! - `else if` clauses and `case` branches
//! - Test blocks and their assertions (`check` and `where`)
//! - Interpolated string fragments

use std::fmt::Display;

use super::{
    ast::{Expr, Stmt},
    statements::BlockStmt,
};

/// A named type, optionally applied to generic parameters: `Map<string, List<number>>`.
///
/// `parameters` is empty for simple named types.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub name: String,
    pub parameters: Vec<TypeAnnotation>,
}

impl TypeAnnotation {
    pub fn simple(name: &str) -> Self {
        TypeAnnotation {
            name: name.to_string(),
            parameters: vec![],
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.parameters.is_empty()
    }
}

impl Display for TypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_generic() {
            write!(f, "<{}>", join(&self.parameters, ", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<TypeAnnotation>,
}

impl Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.type_annotation {
            Some(ty) => write!(f, "{}: {}", self.name, ty),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: String,
    pub type_annotation: TypeAnnotation,
}

impl Display for StructField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.type_annotation)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIfClause {
    pub condition: Expr,
    pub body: BlockStmt,
}

/// One `pattern => result` arm. A bare `_` pattern is the catch-all.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub pattern: Expr,
    pub result: Expr,
}

impl CaseBranch {
    pub fn is_wildcard(&self) -> bool {
        matches!(&self.pattern, Expr::Symbol(symbol) if symbol.value == "_")
    }
}

impl Display for CaseBranch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} => {}", self.pattern, self.result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    /// The left side alone must be truthy; there is no right side.
    Truthy,
}

impl AssertionOp {
    pub fn from_operator(operator: &str) -> Option<Self> {
        match operator {
            "==" => Some(AssertionOp::Equal),
            "!=" => Some(AssertionOp::NotEqual),
            "<" => Some(AssertionOp::Less),
            "<=" => Some(AssertionOp::LessEqual),
            ">" => Some(AssertionOp::Greater),
            ">=" => Some(AssertionOp::GreaterEqual),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssertionOp::Equal => "==",
            AssertionOp::NotEqual => "!=",
            AssertionOp::Less => "<",
            AssertionOp::LessEqual => "<=",
            AssertionOp::Greater => ">",
            AssertionOp::GreaterEqual => ">=",
            AssertionOp::Truthy => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assertion {
    pub left: Expr,
    pub operator: AssertionOp,
    pub right: Option<Expr>,
}

impl Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.right {
            Some(right) => write!(f, "{} {} {}", self.left, self.operator.as_str(), right),
            None => write!(f, "{}", self.left),
        }
    }
}

/// Shared shape of a standalone `check` block and a function's `where` block.
///
/// `label` is only ever set for `check`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestBlock {
    pub label: Option<String>,
    pub setup: Vec<Stmt>,
    pub assertions: Vec<Assertion>,
}

impl Display for TestBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for stmt in &self.setup {
            write!(f, "{} ", stmt)?;
        }
        for assertion in &self.assertions {
            write!(f, "{} ", assertion)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationPart {
    Text(String),
    Expression(Expr),
}

/// Escapes text so it lexes back to the same string literal content.
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn join<T: Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}
