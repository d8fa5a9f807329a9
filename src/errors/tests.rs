//! Unit tests for error handling.
//!
//! This module contains tests for error kinds, names and message shapes.

use crate::errors::errors::{join_kinds, Error, ErrorImpl, ErrorTip};
use crate::lexer::tokens::TokenKind;
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "$".to_string(),
        },
        Position::new(3, 7),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position(), &Position::new(3, 7));
}

#[test]
fn test_display_has_line_and_column_prefix() {
    let error = Error::new(
        ErrorImpl::NoPrefixParser {
            found: TokenKind::CloseParen,
        },
        Position::new(2, 14),
    );

    assert_eq!(
        error.to_string(),
        "line 2, column 14: no prefix parse function for CloseParen found"
    );
}

#[test]
fn test_expectation_message_single_kind() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: vec![TokenKind::Assignment],
            found: TokenKind::EOF,
        },
        Position::new(1, 6),
    );

    assert_eq!(error.to_string(), "line 1, column 6: expected Assignment, got EOF");
}

#[test]
fn test_join_kinds() {
    assert_eq!(join_kinds(&[TokenKind::End]), "End");
    assert_eq!(join_kinds(&[TokenKind::End, TokenKind::Else]), "End or Else");
    assert_eq!(
        join_kinds(&[TokenKind::Comma, TokenKind::CloseParen, TokenKind::Colon]),
        "Comma, CloseParen or Colon"
    );
}

#[test]
fn test_expectation_message_many_kinds() {
    let error = ErrorImpl::UnexpectedToken {
        expected: vec![TokenKind::Comma, TokenKind::CloseBracket],
        found: TokenKind::Number,
    };

    assert_eq!(error.to_string(), "expected Comma or CloseBracket, got Number");
}

#[test]
fn test_reserved_identifier_message() {
    let error = ErrorImpl::ReservedIdentifier {
        name: "end".to_string(),
        context: "function".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "\"end\" is a reserved word and cannot be used as a function name"
    );
}

#[test]
fn test_unterminated_block_error() {
    let error = Error::new(
        ErrorImpl::UnterminatedBlock {
            construct: "for".to_string(),
        },
        Position::new(9, 1),
    );

    assert_eq!(error.get_error_name(), "UnterminatedBlock");
    assert!(error.to_string().contains("unterminated for block"));
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "$".to_string(),
        },
        Position::new(1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_for_missing_end() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: vec![TokenKind::End],
            found: TokenKind::EOF,
        },
        Position::new(4, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert!(tip.contains("end")),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_empty_interpolation_message() {
    let error = ErrorImpl::EmptyInterpolation;

    assert_eq!(error.to_string(), "empty interpolation `#{}` in string");
}
