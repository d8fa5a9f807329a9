use std::fmt::Display;

use thiserror::Error;

use crate::{lexer::tokens::TokenKind, Position};

/// A single recorded diagnostic: what went wrong and where.
///
/// Renders as `line <L>, column <C>: <message>`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{position}: {internal_error}")]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NoPrefixParser { .. } => "NoPrefixParser",
            ErrorImpl::UnterminatedBlock { .. } => "UnterminatedBlock",
            ErrorImpl::UnexpectedTerminator { .. } => "UnexpectedTerminator",
            ErrorImpl::InvalidPropertyName { .. } => "InvalidPropertyName",
            ErrorImpl::ReservedIdentifier { .. } => "ReservedIdentifier",
            ErrorImpl::InvalidAssignmentTarget { .. } => "InvalidAssignmentTarget",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DuplicateRootElement { .. } => "DuplicateRootElement",
            ErrorImpl::Interpolation { .. } => "Interpolation",
            ErrorImpl::EmptyInterpolation => "EmptyInterpolation",
            ErrorImpl::NestingTooDeep { .. } => "NestingTooDeep",
            ErrorImpl::InternalFault { .. } => "InternalFault",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { expected, found } => {
                if expected.contains(&TokenKind::End) && *found == TokenKind::EOF {
                    ErrorTip::Suggestion(String::from("is a block missing its `end`?"))
                } else if expected.contains(&TokenKind::DoubleColon) {
                    ErrorTip::Suggestion(String::from("blocks open with `::` after their signature"))
                } else {
                    ErrorTip::None
                }
            }
            ErrorImpl::NoPrefixParser { found } => ErrorTip::Suggestion(format!(
                "`{}` cannot start an expression",
                found
            )),
            ErrorImpl::UnterminatedBlock { construct } => {
                ErrorTip::Suggestion(format!("add an `end` to close the {} block", construct))
            }
            ErrorImpl::UnexpectedTerminator { found } => ErrorTip::Suggestion(format!(
                "`{}` does not close any open block",
                found
            )),
            ErrorImpl::InvalidPropertyName { .. } => ErrorTip::Suggestion(String::from(
                "property names must be identifiers or keywords",
            )),
            ErrorImpl::ReservedIdentifier { name, .. } => {
                ErrorTip::Suggestion(format!("rename `{}`, it is a keyword", name))
            }
            ErrorImpl::InvalidAssignmentTarget { .. } => ErrorTip::Suggestion(String::from(
                "only names, properties and indexes can be assigned to",
            )),
            ErrorImpl::NumberParseError { .. } => ErrorTip::None,
            ErrorImpl::DuplicateRootElement { .. } => ErrorTip::Suggestion(String::from(
                "wrap the elements in a single container element",
            )),
            ErrorImpl::Interpolation { .. } | ErrorImpl::EmptyInterpolation => {
                ErrorTip::Suggestion(String::from("`#{...}` must hold exactly one expression"))
            }
            ErrorImpl::NestingTooDeep { .. } => ErrorTip::None,
            ErrorImpl::InternalFault { .. } => ErrorTip::None,
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("expected {}, got {}", join_kinds(.expected), .found)]
    UnexpectedToken {
        expected: Vec<TokenKind>,
        found: TokenKind,
    },
    #[error("no prefix parse function for {found} found")]
    NoPrefixParser { found: TokenKind },
    #[error("unterminated {construct} block: reached end of input before `end`")]
    UnterminatedBlock { construct: String },
    #[error("unexpected {found} outside of any block")]
    UnexpectedTerminator { found: TokenKind },
    #[error("invalid property name {token:?} after '.'")]
    InvalidPropertyName { token: String },
    #[error("{name:?} is a reserved word and cannot be used as a {context} name")]
    ReservedIdentifier { name: String, context: String },
    #[error("invalid assignment target: {target}")]
    InvalidAssignmentTarget { target: String },
    #[error("could not parse {token:?} as a number")]
    NumberParseError { token: String },
    #[error("component {component:?} already has a root element")]
    DuplicateRootElement { component: String },
    #[error("in string interpolation: {message}")]
    Interpolation { message: String },
    #[error("empty interpolation `#{{}}` in string")]
    EmptyInterpolation,
    #[error("nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep { limit: usize },
    #[error("internal parser fault: {message}")]
    InternalFault { message: String },
}

/// Joins expected token kinds as `A`, `A or B`, `A, B or C`.
pub fn join_kinds(kinds: &[TokenKind]) -> String {
    match kinds {
        [] => String::from("nothing"),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|kind| kind.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} or {}", head, last)
        }
    }
}
