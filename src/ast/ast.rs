use std::fmt::Display;

use crate::Span;

use super::{expressions::*, statements::*};

/// Statement Types
///
/// The node kind of a statement, used when only the shape of a tree matters.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StmtType {
    VarDeclStmt,
    FnDeclStmt,
    StructDeclStmt,
    TypeAliasStmt,
    ModuleStmt,
    UsingStmt,
    ComponentStmt,
    IfStmt,
    CaseStmt,
    ForStmt,
    CheckStmt,
    ReturnStmt,
    BreakStmt,
    ExpressionStmt,
}

/// A statement node. The set of statements is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    FnDecl(FnDeclStmt),
    StructDecl(StructDeclStmt),
    TypeAlias(TypeAliasStmt),
    Module(ModuleStmt),
    Using(UsingStmt),
    Component(ComponentStmt),
    If(IfStmt),
    Case(CaseStmt),
    For(ForStmt),
    Check(CheckStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Expression(ExpressionStmt),
}

impl Stmt {
    pub fn get_stmt_type(&self) -> StmtType {
        match self {
            Stmt::VarDecl(_) => StmtType::VarDeclStmt,
            Stmt::FnDecl(_) => StmtType::FnDeclStmt,
            Stmt::StructDecl(_) => StmtType::StructDeclStmt,
            Stmt::TypeAlias(_) => StmtType::TypeAliasStmt,
            Stmt::Module(_) => StmtType::ModuleStmt,
            Stmt::Using(_) => StmtType::UsingStmt,
            Stmt::Component(_) => StmtType::ComponentStmt,
            Stmt::If(_) => StmtType::IfStmt,
            Stmt::Case(_) => StmtType::CaseStmt,
            Stmt::For(_) => StmtType::ForStmt,
            Stmt::Check(_) => StmtType::CheckStmt,
            Stmt::Return(_) => StmtType::ReturnStmt,
            Stmt::Break(_) => StmtType::BreakStmt,
            Stmt::Expression(_) => StmtType::ExpressionStmt,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::StructDecl(stmt) => &stmt.span,
            Stmt::TypeAlias(stmt) => &stmt.span,
            Stmt::Module(stmt) => &stmt.span,
            Stmt::Using(stmt) => &stmt.span,
            Stmt::Component(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::Case(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Check(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Break(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::VarDecl(stmt) => stmt.fmt(f),
            Stmt::FnDecl(stmt) => stmt.fmt(f),
            Stmt::StructDecl(stmt) => stmt.fmt(f),
            Stmt::TypeAlias(stmt) => stmt.fmt(f),
            Stmt::Module(stmt) => stmt.fmt(f),
            Stmt::Using(stmt) => stmt.fmt(f),
            Stmt::Component(stmt) => stmt.fmt(f),
            Stmt::If(stmt) => stmt.fmt(f),
            Stmt::Case(stmt) => stmt.fmt(f),
            Stmt::For(stmt) => stmt.fmt(f),
            Stmt::Check(stmt) => stmt.fmt(f),
            Stmt::Return(stmt) => stmt.fmt(f),
            Stmt::Break(stmt) => stmt.fmt(f),
            Stmt::Expression(stmt) => stmt.fmt(f),
        }
    }
}

/// Expression Types
///
/// Defines the various kinds of expressions in the AST.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ExprType {
    Symbol,
    Number,
    String,
    InterpolatedString,
    Boolean,
    Nil,
    Array,
    Map,
    Function,
    Prefix,
    Binary,
    Call,
    Index,
    Member,
    Assignment,
    Range,
    Case,
    UiElement,
}

/// An expression node. The set of expressions is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Symbol(SymbolExpr),
    Number(NumberExpr),
    String(StringExpr),
    InterpolatedString(InterpolatedStringExpr),
    Boolean(BooleanExpr),
    Nil(NilExpr),
    Array(ArrayExpr),
    Map(MapExpr),
    Function(FunctionExpr),
    Prefix(PrefixExpr),
    Binary(BinaryExpr),
    Call(CallExpr),
    Index(IndexExpr),
    Member(MemberExpr),
    Assignment(AssignmentExpr),
    Range(RangeExpr),
    Case(CaseExpr),
    UiElement(UiElementExpr),
}

impl Expr {
    pub fn get_expr_type(&self) -> ExprType {
        match self {
            Expr::Symbol(_) => ExprType::Symbol,
            Expr::Number(_) => ExprType::Number,
            Expr::String(_) => ExprType::String,
            Expr::InterpolatedString(_) => ExprType::InterpolatedString,
            Expr::Boolean(_) => ExprType::Boolean,
            Expr::Nil(_) => ExprType::Nil,
            Expr::Array(_) => ExprType::Array,
            Expr::Map(_) => ExprType::Map,
            Expr::Function(_) => ExprType::Function,
            Expr::Prefix(_) => ExprType::Prefix,
            Expr::Binary(_) => ExprType::Binary,
            Expr::Call(_) => ExprType::Call,
            Expr::Index(_) => ExprType::Index,
            Expr::Member(_) => ExprType::Member,
            Expr::Assignment(_) => ExprType::Assignment,
            Expr::Range(_) => ExprType::Range,
            Expr::Case(_) => ExprType::Case,
            Expr::UiElement(_) => ExprType::UiElement,
        }
    }

    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Symbol(expr) => &expr.span,
            Expr::Number(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::InterpolatedString(expr) => &expr.span,
            Expr::Boolean(expr) => &expr.span,
            Expr::Nil(expr) => &expr.span,
            Expr::Array(expr) => &expr.span,
            Expr::Map(expr) => &expr.span,
            Expr::Function(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Index(expr) => &expr.span,
            Expr::Member(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::Range(expr) => &expr.span,
            Expr::Case(expr) => &expr.span,
            Expr::UiElement(expr) => &expr.span,
        }
    }

    /// Whether this expression may appear on the left of `=`.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Symbol(_) | Expr::Index(_) | Expr::Member(_))
    }

    /// Wraps the expression as an expression statement.
    pub fn into_stmt(self) -> Stmt {
        let span = *self.get_span();
        Stmt::Expression(ExpressionStmt {
            expression: self,
            span,
        })
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Symbol(expr) => expr.fmt(f),
            Expr::Number(expr) => expr.fmt(f),
            Expr::String(expr) => expr.fmt(f),
            Expr::InterpolatedString(expr) => expr.fmt(f),
            Expr::Boolean(expr) => expr.fmt(f),
            Expr::Nil(expr) => expr.fmt(f),
            Expr::Array(expr) => expr.fmt(f),
            Expr::Map(expr) => expr.fmt(f),
            Expr::Function(expr) => expr.fmt(f),
            Expr::Prefix(expr) => expr.fmt(f),
            Expr::Binary(expr) => expr.fmt(f),
            Expr::Call(expr) => expr.fmt(f),
            Expr::Index(expr) => expr.fmt(f),
            Expr::Member(expr) => expr.fmt(f),
            Expr::Assignment(expr) => expr.fmt(f),
            Expr::Range(expr) => expr.fmt(f),
            Expr::Case(expr) => expr.fmt(f),
            Expr::UiElement(expr) => expr.fmt(f),
        }
    }
}

/// The root of a parsed source file. Always produced, even when parsing
/// recorded errors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    pub fn iter(&self) -> std::slice::Iter<'_, Stmt> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, stmt) in self.body.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}
