//! Parser implementation for building the syntax tree.
//!
//! This module contains the main Parser struct and the parse entry points.
//! The parser keeps a two-token window (`current` and `peek`) over the token
//! source, pulling tokens on demand and silently dropping comments. Handlers
//! for statements and expressions are looked up by token kind in the
//! tables built in `lookups`.
//!
//! Failures are recorded, not thrown: every routine returns `PResult`, and
//! `Bail::Recorded` tells the caller a diagnostic is already in the error
//! list so it only has to decide how to resume.

use std::collections::VecDeque;

use log::{debug, info, trace};

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    Position, Span,
};

use super::recovery::{parse_stmt_guarded, recover_unexpected_terminator};

/// Why a parse routine stopped early.
#[derive(Debug, Clone, PartialEq)]
pub enum Bail {
    /// The diagnostic is already in the error list; propagate silently.
    Recorded,
    /// Recorded, and the token stream was already resynchronized past the
    /// failed construct; callers must not skip any further.
    Recovered,
    /// An internal fault. Only the guarded statement entry turns this into
    /// a recorded error.
    Fault(Error),
}

pub type PResult<T> = Result<T, Bail>;

/// Tunables for a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum nesting of statements, blocks, expressions and types before
    /// the parse of the current statement is abandoned with `NestingTooDeep`.
    /// A nested block costs two levels (its statement and the block).
    pub max_depth: usize,
    /// How many tokens ahead `expect_with_repair` looks for a missing token.
    pub repair_window: usize,
    /// Whether errors inside `#{...}` are reported on the enclosing parse.
    pub merge_interpolation_errors: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: 128,
            repair_window: 3,
            merge_interpolation_errors: true,
        }
    }
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The token source
    tokens: std::vec::IntoIter<Token>,
    /// Tokens pulled beyond `peek` by bounded lookahead
    lookahead: VecDeque<Token>,
    current: Token,
    peek: Token,
    /// End of the most recently consumed token, used to close spans
    previous_end: Position,
    /// End of the last token pulled from the source, where a synthetic EOF lands
    source_end: Position,
    errors: Vec<Error>,
    config: ParserConfig,
    depth: usize,
    consumed: usize,
}

impl Parser {
    /// Creates a parser over `tokens` with the default configuration.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser::with_config(tokens, ParserConfig::default())
    }

    pub fn with_config(tokens: Vec<Token>, config: ParserConfig) -> Self {
        let placeholder = Token {
            kind: TokenKind::EOF,
            value: String::from("EOF"),
            span: Span::default(),
        };

        let mut parser = Parser {
            tokens: tokens.into_iter(),
            lookahead: VecDeque::new(),
            current: placeholder.clone(),
            peek: placeholder,
            previous_end: Position::new(1, 1),
            source_end: Position::new(1, 1),
            errors: vec![],
            config,
            depth: 0,
            consumed: 0,
        };

        // Prime both window slots.
        parser.current = parser.pull();
        parser.peek = parser.pull();
        parser
    }

    fn pull(&mut self) -> Token {
        match self.lookahead.pop_front() {
            Some(token) => token,
            None => self.pull_from_source(),
        }
    }

    fn pull_from_source(&mut self) -> Token {
        for token in self.tokens.by_ref() {
            if token.kind == TokenKind::Comment {
                continue;
            }
            self.source_end = token.span.end;
            return token;
        }

        Token {
            kind: TokenKind::EOF,
            value: String::from("EOF"),
            span: Span::new(self.source_end, self.source_end),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Returns the token after the current one.
    pub fn peek_token(&self) -> &Token {
        &self.peek
    }

    pub fn peek_token_kind(&self) -> TokenKind {
        self.peek.kind
    }

    /// Kind of the token `offset` places ahead of the current one
    /// (0 is current, 1 is peek), pulling from the source as needed.
    pub fn peek_kind_at(&mut self, offset: usize) -> TokenKind {
        match offset {
            0 => self.current.kind,
            1 => self.peek.kind,
            _ => {
                while self.lookahead.len() < offset - 1 {
                    let token = self.pull_from_source();
                    self.lookahead.push_back(token);
                }
                self.lookahead[offset - 2].kind
            }
        }
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Token {
        let next = self.pull();
        let peek = std::mem::replace(&mut self.peek, next);
        let previous = std::mem::replace(&mut self.current, peek);

        trace!("consumed {}", previous);

        self.previous_end = previous.span.end;
        self.consumed += 1;
        previous
    }

    /// Number of tokens consumed so far; used to detect lack of progress.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn at_eof(&self) -> bool {
        self.current.kind == TokenKind::EOF
    }

    /// Returns the start position of the current token.
    pub fn get_position(&self) -> Position {
        self.current.span.start
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.previous_end)
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enters one level of nesting, faulting past `max_depth`.
    pub fn descend(&mut self) -> PResult<()> {
        if self.depth >= self.config.max_depth {
            return Err(Bail::Fault(Error::new(
                ErrorImpl::NestingTooDeep {
                    limit: self.config.max_depth,
                },
                self.get_position(),
            )));
        }

        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Records an error at `position` and returns the matching `Bail`.
    pub fn record(&mut self, error_impl: ErrorImpl, position: Position) -> Bail {
        let error = Error::new(error_impl, position);
        debug!("recorded parse error: {}", error);
        self.errors.push(error);
        Bail::Recorded
    }

    /// Records an error at the current token.
    pub fn record_here(&mut self, error_impl: ErrorImpl) -> Bail {
        let position = self.get_position();
        self.record(error_impl, position)
    }

    pub fn push_error(&mut self, error: Error) {
        debug!("recorded parse error: {}", error);
        self.errors.push(error);
    }

    fn unexpected(&mut self, expected: Vec<TokenKind>) -> Bail {
        let found = self.current.kind;
        self.record_here(ErrorImpl::UnexpectedToken { expected, found })
    }

    /// Consumes the current token if it has the expected kind, otherwise
    /// records an expectation error.
    pub fn expect(&mut self, expected_kind: TokenKind) -> PResult<Token> {
        if self.current.kind == expected_kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(vec![expected_kind]))
        }
    }

    /// Like `expect`, accepting any of `expected_kinds`.
    pub fn expect_one_of(&mut self, expected_kinds: &[TokenKind]) -> PResult<Token> {
        if expected_kinds.contains(&self.current.kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected_kinds.to_vec()))
        }
    }

    /// Expects `expected_kind`; when it is missing, records the error and
    /// looks up to `repair_window` tokens ahead for it. If found there, the
    /// tokens in between are skipped and parsing continues.
    pub fn expect_with_repair(&mut self, expected_kind: TokenKind) -> PResult<Token> {
        if self.current.kind == expected_kind {
            return Ok(self.advance());
        }

        let bail = self.unexpected(vec![expected_kind]);

        for offset in 1..=self.config.repair_window {
            let ahead = self.peek_kind_at(offset);
            if ahead == expected_kind {
                debug!("repairing: skipping {} token(s) to reach {}", offset, expected_kind);
                for _ in 0..offset {
                    self.advance();
                }
                return Ok(self.advance());
            }
            if matches!(ahead, TokenKind::EOF | TokenKind::End) {
                break;
            }
        }

        Err(bail)
    }

    /// Expects the `::` that opens a construct's body.
    pub fn expect_block_open(&mut self) -> PResult<Token> {
        self.expect_with_repair(TokenKind::DoubleColon)
    }

    /// Expects an identifier in a naming position. Keywords are rejected
    /// with a reserved-word error naming `context`.
    pub fn expect_identifier(&mut self, context: &str) -> PResult<String> {
        match self.current.kind {
            TokenKind::Identifier => Ok(self.advance().value),
            kind if kind.is_keyword() => {
                let position = self.get_position();
                let name = self.current.value.clone();

                // The keyword stands in for a name; step over it unless it closes a block.
                if !kind.is_block_terminator() {
                    self.advance();
                }

                Err(self.record(
                    ErrorImpl::ReservedIdentifier {
                        name,
                        context: context.to_string(),
                    },
                    position,
                ))
            }
            _ => Err(self.unexpected(vec![TokenKind::Identifier])),
        }
    }

    /// All errors recorded so far, in the order they were found.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Errors as `line <L>, column <C>: <message>` strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|error| error.to_string()).collect()
    }

    /// A 1-based numbered list of the errors, one per line.
    pub fn format_errors(&self) -> String {
        self.errors
            .iter()
            .enumerate()
            .map(|(i, error)| format!("{}. {}", i + 1, error))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn clear_errors(&mut self) {
        self.errors.clear();
    }

    pub fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    /// Parses statements until end of input. Always returns a program;
    /// failures end up in the error list.
    pub fn parse_program(&mut self) -> Program {
        let start = self.get_position();
        let mut body = vec![];

        while !self.at_eof() {
            let before = self.consumed;

            if self.current.kind.is_block_terminator() {
                recover_unexpected_terminator(self);
                continue;
            }

            if let Some(stmt) = parse_stmt_guarded(self) {
                body.push(stmt);
            }

            if self.consumed == before {
                self.advance();
            }
        }

        Program {
            body,
            span: self.span_from(start),
        }
    }
}

/// Parses a stream of tokens into a `Program`.
///
/// This is the main entry point for parsing. It returns the parser (holding
/// the accumulated errors) together with the program, which is produced
/// even when errors were recorded.
pub fn parse(tokens: Vec<Token>) -> (Parser, Program) {
    parse_with_config(tokens, ParserConfig::default())
}

pub fn parse_with_config(tokens: Vec<Token>, config: ParserConfig) -> (Parser, Program) {
    info!("Beginning parse of {} tokens", tokens.len());

    let mut parser = Parser::with_config(tokens, config);
    let program = parser.parse_program();

    info!(
        "Parsed {} statement(s) with {} error(s)",
        program.len(),
        parser.errors().len()
    );

    (parser, program)
}

/// Tokenizes and parses `source`. Only a tokenizer failure is returned as
/// `Err`; parse errors are on the returned parser.
pub fn parse_source(source: &str) -> Result<(Parser, Program), Error> {
    let tokens = tokenize(source)?;
    Ok(parse(tokens))
}
