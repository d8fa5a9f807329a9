//! String literals with `#{expr}` interpolation.
//!
//! Each embedded fragment is tokenized and parsed by a fresh, independent
//! parser; its errors are reported on the outer parse at the position of the
//! string literal when `merge_interpolation_errors` is set.
//!
//! Fragment tokens are moved onto the literal's source line before parsing,
//! so embedded nodes carry file positions. The mapping assumes the literal
//! is spelled the way `escape_string` renders it.

use std::collections::HashMap;

use log::debug;

use crate::{
    ast::{
        ast::Expr,
        expressions::{InterpolatedStringExpr, StringExpr},
        types::{escape_string, InterpolationPart},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    expr::parse_expr,
    lookups::BindingPower,
    parser::{Bail, PResult, Parser, ParserConfig},
};

#[derive(Debug, PartialEq)]
enum Fragment<'a> {
    Text(&'a str),
    Code(&'a str),
}

/// Splits `text` at `#{...}` markers. Returns `None` when there are no
/// markers or when a marker's braces never balance; either way the text is
/// a plain string.
fn split_fragments(text: &str) -> Option<Vec<Fragment<'_>>> {
    let mut fragments = vec![];
    let mut rest = text;

    while let Some(open) = rest.find("#{") {
        if open > 0 {
            fragments.push(Fragment::Text(&rest[..open]));
        }

        let code_start = open + 2;
        let mut depth = 1;
        let mut close = None;
        for (i, ch) in rest[code_start..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(code_start + i);
                        break;
                    }
                }
                _ => {}
            }
        }

        let close = close?;
        fragments.push(Fragment::Code(&rest[code_start..close]));
        rest = &rest[close + 1..];
    }

    if fragments.is_empty() {
        return None;
    }

    if !rest.is_empty() {
        fragments.push(Fragment::Text(rest));
    }

    Some(fragments)
}

/// Prefix handler for string tokens.
pub fn parse_string_expr(parser: &mut Parser) -> PResult<Expr> {
    let token = parser.advance();

    let Some(fragments) = split_fragments(&token.value) else {
        return Ok(Expr::String(StringExpr {
            value: token.value.clone(),
            span: token.span,
        }));
    };

    let start = token.span.start;
    // Source column of the next fragment, just past the opening quote.
    let mut column = start.column + 1;

    let mut parts: Vec<InterpolationPart> = vec![];
    for fragment in fragments {
        match fragment {
            Fragment::Text(text) => {
                push_text(&mut parts, text);
                column += source_width(text);
            }
            Fragment::Code(code) => {
                let origin = Position::new(start.line, column + 2);
                match parse_embedded(parser, code, start, origin)? {
                    Some(expr) => parts.push(InterpolationPart::Expression(expr)),
                    None => push_text(&mut parts, &format!("#{{{}}}", code)),
                }
                column += source_width(code) + 3;
            }
        }
    }

    match parts.as_slice() {
        [InterpolationPart::Text(text)] => Ok(Expr::String(StringExpr {
            value: text.clone(),
            span: token.span,
        })),
        _ => Ok(Expr::InterpolatedString(InterpolatedStringExpr {
            parts,
            span: token.span,
        })),
    }
}

fn push_text(parts: &mut Vec<InterpolationPart>, text: &str) {
    if let Some(InterpolationPart::Text(previous)) = parts.last_mut() {
        previous.push_str(text);
    } else {
        parts.push(InterpolationPart::Text(text.to_string()));
    }
}

/// Columns `text` occupies inside a string literal.
fn source_width(text: &str) -> usize {
    escape_string(text).chars().count()
}

/// Rewrites fragment-relative token positions to file positions, given the
/// file position of the fragment's first character.
fn anchor_tokens(tokens: &mut [Token], code: &str, origin: Position) {
    let mut anchors = HashMap::new();
    let mut local = Position::new(1, 1);
    let mut column = origin.column;

    for ch in code.chars() {
        anchors.insert(local, Position::new(origin.line, column));
        column += source_width(ch.encode_utf8(&mut [0; 4]));
        if ch == '\n' {
            local = Position::new(local.line + 1, 1);
        } else {
            local.column += 1;
        }
    }
    anchors.insert(local, Position::new(origin.line, column));

    for token in tokens {
        if let Some(start) = anchors.get(&token.span.start) {
            token.span.start = *start;
        }
        if let Some(end) = anchors.get(&token.span.end) {
            token.span.end = *end;
        }
    }
}

/// Parses one embedded fragment. A fragment that fails to parse is kept as
/// literal text (`Ok(None)`) after its errors are reported at `position`.
fn parse_embedded(
    parser: &mut Parser,
    code: &str,
    position: Position,
    origin: Position,
) -> PResult<Option<Expr>> {
    debug!("parsing interpolated fragment {:?}", code);

    if code.trim().is_empty() {
        report(parser, vec![ErrorImpl::EmptyInterpolation], position);
        return Ok(None);
    }

    let mut tokens = match tokenize(code) {
        Ok(tokens) => tokens,
        Err(error) => {
            report(parser, vec![error.get_kind().clone()], position);
            return Ok(None);
        }
    };

    anchor_tokens(&mut tokens, code, origin);

    let outer = parser.config();
    let config = ParserConfig {
        max_depth: outer.max_depth.saturating_sub(parser.depth()),
        ..outer
    };

    let mut sub_parser = Parser::with_config(tokens, config);
    let expr = match parse_expr(&mut sub_parser, BindingPower::Default) {
        Ok(expr) => Some(expr),
        Err(Bail::Fault(error)) => {
            return Err(Bail::Fault(Error::new(error.get_kind().clone(), position)))
        }
        Err(_) => None,
    };

    if expr.is_some() && !sub_parser.at_eof() {
        let found = sub_parser.current_token_kind();
        sub_parser.record_here(ErrorImpl::UnexpectedToken {
            expected: vec![TokenKind::EOF],
            found,
        });
    }

    if sub_parser.has_errors() {
        let kinds = sub_parser
            .take_errors()
            .into_iter()
            .map(|error| error.get_kind().clone())
            .collect();
        report(parser, kinds, position);
        return Ok(None);
    }

    Ok(expr)
}

fn report(parser: &mut Parser, kinds: Vec<ErrorImpl>, position: Position) {
    if !parser.config().merge_interpolation_errors {
        return;
    }

    for kind in kinds {
        let error_impl = match kind {
            ErrorImpl::EmptyInterpolation => ErrorImpl::EmptyInterpolation,
            other => ErrorImpl::Interpolation {
                message: other.to_string(),
            },
        };
        parser.record(error_impl, position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_text() {
        assert_eq!(split_fragments("hello"), None);
        assert_eq!(split_fragments(""), None);
        assert_eq!(split_fragments("price # { 4 }"), None);
    }

    #[test]
    fn test_split_single_marker() {
        assert_eq!(
            split_fragments("Count: #{count}"),
            Some(vec![Fragment::Text("Count: "), Fragment::Code("count")])
        );
    }

    #[test]
    fn test_split_nested_braces() {
        assert_eq!(
            split_fragments("#{ {a: 1}[\"a\"] }!"),
            Some(vec![Fragment::Code(" {a: 1}[\"a\"] "), Fragment::Text("!")])
        );
    }

    #[test]
    fn test_split_unbalanced_is_plain() {
        assert_eq!(split_fragments("broken #{a + {b}"), None);
        assert_eq!(split_fragments("ok #{a} then #{b"), None);
    }

    #[test]
    fn test_split_adjacent_markers() {
        assert_eq!(
            split_fragments("#{a}#{b}"),
            Some(vec![Fragment::Code("a"), Fragment::Code("b")])
        );
    }
}
