use std::fmt::Display;

use crate::{lexer::tokens::Token, Span};

use super::{
    ast::Expr,
    statements::BlockStmt,
    types::{escape_string, join, CaseBranch, InterpolationPart, Parameter, TypeAnnotation},
};

// LITERALS

/// Symbol Expression
/// Represents an identifier in the AST. This includes functions.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

impl Display for SymbolExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Number Expression
/// Represents a numeric literal in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    pub value: f64,
    pub span: Span,
}

impl Display for NumberExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// String Expression
/// Represents a string literal without interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

impl Display for StringExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", escape_string(&self.value))
    }
}

/// A string literal containing at least one `#{...}` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolatedStringExpr {
    pub parts: Vec<InterpolationPart>,
    pub span: Span,
}

impl Display for InterpolatedStringExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"")?;
        for part in &self.parts {
            match part {
                InterpolationPart::Text(text) => write!(f, "{}", escape_string(text))?,
                InterpolationPart::Expression(expr) => {
                    write!(f, "#{{{}}}", escape_string(&expr.to_string()))?
                }
            }
        }
        write!(f, "\"")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

impl Display for BooleanExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NilExpr {
    pub span: Span,
}

impl Display for NilExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "nil")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

impl Display for ArrayExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", join(&self.elements, ", "))
    }
}

/// Map literal; pairs keep their source order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapExpr {
    pub pairs: Vec<(Expr, Expr)>,
    pub span: Span,
}

impl Display for MapExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pairs = self
            .pairs
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect::<Vec<_>>();
        write!(f, "{{{}}}", pairs.join(", "))
    }
}

/// Anonymous function: `fn(a, b) :: ... end`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    pub body: BlockStmt,
    pub span: Span,
}

impl Display for FunctionExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn({})", join(&self.parameters, ", "))?;
        if let Some(ty) = &self.return_type {
            write!(f, " -> {}", ty)?;
        }
        write!(f, " :: {}end", self.body)
    }
}

// COMPLEX

/// Prefix Expression
/// Represents a unary operator applied to one operand: `-x`, `!done`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

impl Display for PrefixExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}{})", self.operator.value, self.right_expr)
    }
}

/// Binary Expression
/// Represents a binary operation between two expressions in the AST.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

impl Display for BinaryExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator.value, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

impl Display for CallExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.callee, join(&self.arguments, ", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    pub object: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

impl Display for IndexExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.object, self.index)
    }
}

/// Property access: `object.property`. The property may be spelled like a keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: String,
    pub span: Span,
}

impl Display for MemberExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.object, self.property)
    }
}

/// Assignment Expression
/// `=` or a compound operator such as `+=`; `assignee` is a name, index or member.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub assignee: Box<Expr>,
    pub operator: Token,
    pub value: Box<Expr>,
    pub span: Span,
}

impl AssignmentExpr {
    /// Writes the assignment without its surrounding parentheses. Only valid
    /// where nothing can bind to either side, i.e. as a whole statement.
    pub fn fmt_unwrapped(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.assignee, self.operator.value, self.value)
    }
}

impl Display for AssignmentExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        self.fmt_unwrapped(f)?;
        write!(f, ")")
    }
}

/// `start..end` (half-open) or `start..=end` (inclusive).
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpr {
    pub start: Box<Expr>,
    pub end: Box<Expr>,
    pub inclusive: bool,
    pub span: Span,
}

impl Display for RangeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = if self.inclusive { "..=" } else { ".." };
        write!(f, "({}{}{})", self.start, operator, self.end)
    }
}

/// The value-producing form of `case`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub subject: Box<Expr>,
    pub branches: Vec<CaseBranch>,
    pub span: Span,
}

impl Display for CaseExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "case {} :: ", self.subject)?;
        for branch in &self.branches {
            write!(f, "{} ", branch)?;
        }
        write!(f, "end")
    }
}

/// UI element: `@Column(padding: 4) { @Text(value: "hi"), @Button(label: "+") }`.
#[derive(Debug, Clone, PartialEq)]
pub struct UiElementExpr {
    pub name: String,
    pub properties: Vec<(String, Expr)>,
    pub children: Vec<Expr>,
    pub span: Span,
}

impl UiElementExpr {
    pub fn get_property(&self, name: &str) -> Option<&Expr> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

impl Display for UiElementExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.properties.is_empty() {
            let properties = self
                .properties
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect::<Vec<_>>();
            write!(f, "({})", properties.join(", "))?;
        }
        if !self.children.is_empty() {
            write!(f, " {{ {} }}", join(&self.children, ", "))?;
        }
        Ok(())
    }
}
