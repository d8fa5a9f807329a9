//! Error recovery.
//!
//! Parse routines record a diagnostic and bail; the strategies here decide
//! where parsing resumes:
//!
//! - `synchronize`: top level, skip to the next statement keyword or `end`.
//! - `skip_to_next_statement`: inside a block, after a failed statement.
//! - `skip_to_end`: skip the remainder of a construct, honouring nested blocks.
//! - `recover_signature`: a construct whose signature failed is skipped whole.
//!
//! Bounded lookahead repair lives on the parser (`expect_with_repair`).

use log::debug;

use crate::{ast::ast::Stmt, errors::errors::ErrorImpl, lexer::tokens::TokenKind};

use super::{
    parser::{Bail, PResult, Parser},
    stmt::parse_stmt,
};

/// Parses one top-level statement behind a fault barrier. Failures of any
/// kind are recorded and followed by resynchronization.
pub fn parse_stmt_guarded(parser: &mut Parser) -> Option<Stmt> {
    match parse_stmt(parser) {
        Ok(stmt) => stmt,
        Err(Bail::Recorded) => {
            synchronize(parser);
            None
        }
        Err(Bail::Recovered) => None,
        Err(Bail::Fault(error)) => {
            debug!("fault barrier caught: {}", error);
            parser.push_error(error);
            synchronize(parser);
            None
        }
    }
}

/// Records a stray `end`, `else` or `where` at top level and steps over it.
pub fn recover_unexpected_terminator(parser: &mut Parser) {
    let token = parser.advance();
    parser.record(ErrorImpl::UnexpectedTerminator { found: token.kind }, token.span.start);
}

/// Advances until a statement keyword, `end` or end of input. An `end`
/// found this way closes the abandoned construct and is consumed.
pub fn synchronize(parser: &mut Parser) {
    debug!("synchronizing from {}", parser.current_token());

    loop {
        let kind = parser.current_token_kind();
        if kind == TokenKind::EOF || kind.starts_statement() {
            return;
        }
        if kind == TokenKind::End {
            parser.advance();
            return;
        }
        parser.advance();
    }
}

/// Inside a block: advances to the next statement keyword, block terminator
/// or end of input. Always makes progress relative to `started_at`.
pub fn skip_to_next_statement(parser: &mut Parser, started_at: usize) {
    debug!("skipping to next statement from {}", parser.current_token());

    let stops = |kind: TokenKind| {
        kind == TokenKind::EOF || kind.starts_statement() || kind.is_block_terminator()
    };

    if parser.consumed() == started_at && !stops(parser.current_token_kind()) {
        parser.advance();
    }

    while !stops(parser.current_token_kind()) {
        parser.advance();
    }
}

/// Advances to the `end` closing the current construct without consuming it.
///
/// With `inside_body` false the construct's own `::` is still ahead, so the
/// first block opener seen belongs to it. Nested blocks are balanced by
/// counting `::` markers; the `::` of an `else if` reuses the chain's `end`.
pub fn skip_to_end(parser: &mut Parser, inside_body: bool) {
    debug!("skipping to end from {}", parser.current_token());

    let mut depth: i32 = if inside_body { 0 } else { -1 };
    let mut else_if_pending = false;

    loop {
        match parser.current_token_kind() {
            TokenKind::EOF => return,
            TokenKind::End => {
                if depth <= 0 {
                    return;
                }
                depth -= 1;
            }
            TokenKind::Else if parser.peek_token_kind() == TokenKind::If => {
                else_if_pending = true;
            }
            TokenKind::DoubleColon => {
                if else_if_pending {
                    else_if_pending = false;
                } else {
                    depth += 1;
                }
            }
            _ => {}
        }
        parser.advance();
    }
}

/// From inside a construct's body: skips past its closing `end`.
pub fn skip_past_end(parser: &mut Parser) -> Bail {
    skip_to_end(parser, true);
    if parser.current_token_kind() == TokenKind::End {
        parser.advance();
    }
    Bail::Recovered
}

/// Passes a successful signature through. A failed one abandons the whole
/// construct, body included, so its `end` is not mistaken for a stray one.
pub fn recover_signature<T>(parser: &mut Parser, signature: PResult<T>) -> PResult<T> {
    match signature {
        Err(Bail::Recorded) => {
            skip_to_end(parser, false);
            if parser.current_token_kind() == TokenKind::End {
                parser.advance();
            }
            Err(Bail::Recovered)
        }
        other => other,
    }
}
