use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("const", TokenKind::Const);
        map.insert("fn", TokenKind::Fn);
        map.insert("struct", TokenKind::Struct);
        map.insert("type", TokenKind::Type);
        map.insert("module", TokenKind::Module);
        map.insert("using", TokenKind::Using);
        map.insert("as", TokenKind::As);
        map.insert("component", TokenKind::Component);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("case", TokenKind::Case);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("return", TokenKind::Return);
        map.insert("break", TokenKind::Break);
        map.insert("check", TokenKind::Check);
        map.insert("where", TokenKind::Where);
        map.insert("end", TokenKind::End);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("nil", TokenKind::Nil);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Comment,
    Number,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Dot,
    DotDot,       // ..
    DotDotEquals, // ..=
    Comma,
    Colon,
    DoubleColon, // ::
    Arrow,       // ->
    FatArrow,    // =>
    At,

    PlusEquals,
    MinusEquals,
    StarEquals,
    SlashEquals,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
    Caret,

    // Reserved
    Var,
    Const,
    Fn,
    Struct,
    Type,
    Module,
    Using,
    As,
    Component,
    If,
    Else,
    Case,
    For,
    In,
    Return,
    Break,
    Check,
    Where,
    End,
    And,
    Or,
    True,
    False,
    Nil,
}

impl TokenKind {
    /// Every word in `RESERVED_LOOKUP`.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Var
                | TokenKind::Const
                | TokenKind::Fn
                | TokenKind::Struct
                | TokenKind::Type
                | TokenKind::Module
                | TokenKind::Using
                | TokenKind::As
                | TokenKind::Component
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Case
                | TokenKind::For
                | TokenKind::In
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Check
                | TokenKind::Where
                | TokenKind::End
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }

    /// Keywords that introduce a statement.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Var
                | TokenKind::Const
                | TokenKind::Fn
                | TokenKind::Struct
                | TokenKind::Type
                | TokenKind::Module
                | TokenKind::Using
                | TokenKind::Component
                | TokenKind::If
                | TokenKind::Case
                | TokenKind::For
                | TokenKind::Return
                | TokenKind::Break
                | TokenKind::Check
        )
    }

    /// Keywords that only ever close (or split) a block.
    pub fn is_block_terminator(&self) -> bool {
        matches!(self, TokenKind::End | TokenKind::Else | TokenKind::Where)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Number,
            TokenKind::Comment,
        ]) {
            write!(
                f,
                "{}:{} {} ({})",
                self.span.start.line, self.span.start.column, self.kind, self.value
            )
        } else {
            write!(f, "{}:{} {}", self.span.start.line, self.span.start.column, self.kind)
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }
}
