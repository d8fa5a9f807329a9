use std::{
    fmt::Display,
    slice::{Iter, IterMut},
};

use crate::Span;

use super::{
    ast::{Expr, Stmt},
    expressions::UiElementExpr,
    types::{
        escape_string, join, CaseBranch, ElseIfClause, Parameter, StructField, TestBlock,
        TypeAnnotation,
    },
};

/// An ordered statement sequence owned by a block-bearing construct. The
/// closing keyword belongs to the construct, not the block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
    pub fn iter_mut(&mut self) -> IterMut<'_, Stmt> {
        self.body.iter_mut()
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for stmt in &self.body {
            write!(f, "{} ", stmt)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

impl Display for ExpressionStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.expression {
            Expr::Assignment(assignment) => assignment.fmt_unwrapped(f),
            expression => write!(f, "{}", expression),
        }
    }
}

/// `var a, b: T = value` or `const NAME = value`. `identifiers` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub identifiers: Vec<String>,
    pub is_constant: bool,
    pub explicit_type: Option<TypeAnnotation>,
    pub assigned_value: Expr,
    pub span: Span,
}

impl Display for VarDeclStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keyword = if self.is_constant { "const" } else { "var" };
        write!(f, "{} {}", keyword, self.identifiers.join(", "))?;
        if let Some(ty) = &self.explicit_type {
            write!(f, ": {}", ty)?;
        }
        write!(f, " = {}", self.assigned_value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub identifier: String,
    /// Set for method-style declarations: `fn Point.area() :: ... end`.
    pub receiver: Option<TypeAnnotation>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    pub body: BlockStmt,
    pub where_block: Option<TestBlock>,
    pub span: Span,
}

impl Display for FnDeclStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fn ")?;
        if let Some(receiver) = &self.receiver {
            write!(f, "{}.", receiver)?;
        }
        write!(f, "{}({})", self.identifier, join(&self.parameters, ", "))?;
        if let Some(ty) = &self.return_type {
            write!(f, " -> {}", ty)?;
        }
        write!(f, " :: {}", self.body)?;
        if let Some(tests) = &self.where_block {
            write!(f, "where {}", tests)?;
        }
        write!(f, "end")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDeclStmt {
    pub name: String,
    pub fields: Vec<StructField>,
    pub span: Span,
}

impl Display for StructDeclStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "struct {} :: ", self.name)?;
        if !self.fields.is_empty() {
            write!(f, "{} ", join(&self.fields, ", "))?;
        }
        write!(f, "end")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasStmt {
    pub name: String,
    pub aliased: TypeAnnotation,
    pub span: Span,
}

impl Display for TypeAliasStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "type {} = {}", self.name, self.aliased)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleStmt {
    pub name: String,
    pub body: BlockStmt,
    pub span: Span,
}

impl Display for ModuleStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "module {} :: {}end", self.name, self.body)
    }
}

/// `using ui.widgets as w` or `using "lib/util"`.
#[derive(Debug, Clone, PartialEq)]
pub struct UsingStmt {
    pub path: String,
    /// The path was written as a string literal rather than dotted names.
    pub quoted: bool,
    pub alias: Option<String>,
    pub span: Span,
}

impl Display for UsingStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.quoted {
            write!(f, "using \"{}\"", escape_string(&self.path))?;
        } else {
            write!(f, "using {}", self.path)?;
        }
        if let Some(alias) = &self.alias {
            write!(f, " as {}", alias)?;
        }
        Ok(())
    }
}

/// A UI component: ordinary statements plus at most one root element.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStmt {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: BlockStmt,
    pub root: Option<UiElementExpr>,
    pub span: Span,
}

impl Display for ComponentStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "component {}", self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", join(&self.parameters, ", "))?;
        }
        write!(f, " :: {}", self.body)?;
        if let Some(root) = &self.root {
            write!(f, "{} ", root)?;
        }
        write!(f, "end")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: BlockStmt,
    pub else_ifs: Vec<ElseIfClause>,
    pub else_body: Option<BlockStmt>,
    pub span: Span,
}

impl Display for IfStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "if {} :: {}", self.condition, self.then_body)?;
        for clause in &self.else_ifs {
            write!(f, "else if {} :: {}", clause.condition, clause.body)?;
        }
        if let Some(else_body) = &self.else_body {
            write!(f, "else {}", else_body)?;
        }
        write!(f, "end")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseStmt {
    pub subject: Expr,
    pub branches: Vec<CaseBranch>,
    pub span: Span,
}

impl Display for CaseStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "case {} :: ", self.subject)?;
        for branch in &self.branches {
            write!(f, "{} ", branch)?;
        }
        write!(f, "end")
    }
}

/// `for value in iterable` or `for index, value in iterable`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub index: Option<String>,
    pub value: String,
    pub iterable: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

impl Display for ForStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "for ")?;
        if let Some(index) = &self.index {
            write!(f, "{}, ", index)?;
        }
        write!(f, "{} in {} :: {}end", self.value, self.iterable, self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckStmt {
    pub tests: TestBlock,
    pub span: Span,
}

impl Display for CheckStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "check ")?;
        if let Some(label) = &self.tests.label {
            write!(f, "\"{}\" ", escape_string(label))?;
        }
        write!(f, ":: {}end", self.tests)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub values: Vec<Expr>,
    pub span: Span,
}

impl Display for ReturnStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.values.is_empty() {
            write!(f, "return")
        } else {
            write!(f, "return {}", join(&self.values, ", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}

impl Display for BreakStmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "break")
    }
}
