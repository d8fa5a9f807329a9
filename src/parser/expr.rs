use log::debug;

use crate::{
    ast::{
        ast::Expr,
        expressions::{
            ArrayExpr, AssignmentExpr, BinaryExpr, BooleanExpr, CallExpr, CaseExpr,
            FunctionExpr, IndexExpr, MapExpr, MemberExpr, NilExpr, NumberExpr, PrefixExpr,
            RangeExpr, SymbolExpr, UiElementExpr,
        },
        types::{CaseBranch, Parameter, TypeAnnotation},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Position, Span,
};

use super::{
    lookups::{BindingPower, LOOKUPS},
    parser::{Bail, PResult, Parser},
    recovery::{recover_signature, skip_past_end},
    stmt::{parse_block, parse_parameters, parse_return_type},
};

/// Parses an expression whose infix operators all bind tighter than `bp`.
pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> PResult<Expr> {
    parser.descend()?;
    let result = parse_expr_inner(parser, bp);
    parser.ascend();
    result
}

fn parse_expr_inner(parser: &mut Parser, bp: BindingPower) -> PResult<Expr> {
    let token_kind = parser.current_token_kind();
    let Some(nud) = LOOKUPS.get_nud(token_kind) else {
        return Err(parser.record_here(ErrorImpl::NoPrefixParser { found: token_kind }));
    };

    let left = nud(parser)?;
    parse_infix_loop(parser, left, bp)
}

/// Folds infix operators onto `left` while they bind tighter than `bp`.
pub fn parse_infix_loop(parser: &mut Parser, mut left: Expr, bp: BindingPower) -> PResult<Expr> {
    loop {
        let token_kind = parser.current_token_kind();
        let Some(led) = LOOKUPS.get_led(token_kind) else {
            break;
        };

        let token_bp = LOOKUPS.get_binding_power(token_kind);
        if token_bp <= bp {
            break;
        }

        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

fn span_between(left: &Expr, right: &Expr) -> Span {
    Span::new(left.get_span().start, right.get_span().end)
}

pub fn parse_primary_expr(parser: &mut Parser) -> PResult<Expr> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance();
            match token.value.parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Expr::Number(NumberExpr {
                    value,
                    span: token.span,
                })),
                _ => Err(parser.record(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                )),
            }
        }
        TokenKind::Identifier => {
            let token = parser.advance();
            Ok(Expr::Symbol(SymbolExpr {
                value: token.value,
                span: token.span,
            }))
        }
        TokenKind::True | TokenKind::False => {
            let token = parser.advance();
            Ok(Expr::Boolean(BooleanExpr {
                value: token.kind == TokenKind::True,
                span: token.span,
            }))
        }
        TokenKind::Nil => Ok(Expr::Nil(NilExpr {
            span: parser.advance().span,
        })),
        other => Err(Bail::Fault(Error::new(
            ErrorImpl::InternalFault {
                message: format!("primary expression handler invoked on {}", other),
            },
            parser.get_position(),
        ))),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> PResult<Expr> {
    let operator_token = parser.advance();
    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: span_between(&left, &right),
        left: Box::new(left),
        operator: operator_token,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> PResult<Expr> {
    let operator_token = parser.advance();
    let rhs = parse_expr(parser, BindingPower::Prefix)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: Span::new(operator_token.span.start, rhs.get_span().end),
        operator: operator_token,
        right_expr: Box::new(rhs),
    }))
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> PResult<Expr> {
    if !left.is_assignable() {
        return Err(parser.record(
            ErrorImpl::InvalidAssignmentTarget {
                target: left.to_string(),
            },
            left.get_span().start,
        ));
    }

    let operator_token = parser.advance();
    let rhs = parse_expr(parser, bp)?;

    Ok(Expr::Assignment(AssignmentExpr {
        span: span_between(&left, &rhs),
        assignee: Box::new(left),
        operator: operator_token,
        value: Box::new(rhs),
    }))
}

pub fn parse_range_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> PResult<Expr> {
    let inclusive = parser.advance().kind == TokenKind::DotDotEquals;
    let end = parse_expr(parser, bp)?;

    Ok(Expr::Range(RangeExpr {
        span: span_between(&left, &end),
        start: Box::new(left),
        end: Box::new(end),
        inclusive,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> PResult<Expr> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses `item`s separated by commas up to `close`, which is consumed.
/// A trailing comma is allowed. A missing `close` goes through bounded repair.
pub fn parse_comma_list<T>(
    parser: &mut Parser,
    close: TokenKind,
    mut item: impl FnMut(&mut Parser) -> PResult<T>,
) -> PResult<Vec<T>> {
    let mut items = vec![];

    while parser.current_token_kind() != close {
        items.push(item(parser)?);

        if parser.current_token_kind() != TokenKind::Comma {
            break;
        }
        parser.advance();
    }

    parser.expect_with_repair(close)?;
    Ok(items)
}

pub fn parse_array_expr(parser: &mut Parser) -> PResult<Expr> {
    let start = parser.advance().span.start;
    let elements = parse_comma_list(parser, TokenKind::CloseBracket, |parser| {
        parse_expr(parser, BindingPower::Default)
    })?;

    Ok(Expr::Array(ArrayExpr {
        elements,
        span: parser.span_from(start),
    }))
}

pub fn parse_map_expr(parser: &mut Parser) -> PResult<Expr> {
    let start = parser.advance().span.start;
    let pairs = parse_comma_list(parser, TokenKind::CloseCurly, |parser| {
        let key = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Colon)?;
        let value = parse_expr(parser, BindingPower::Default)?;
        Ok((key, value))
    })?;

    Ok(Expr::Map(MapExpr {
        pairs,
        span: parser.span_from(start),
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> PResult<Expr> {
    parser.advance();
    let arguments = parse_comma_list(parser, TokenKind::CloseParen, parse_call_argument)?;

    Ok(Expr::Call(CallExpr {
        span: parser.span_from(left.get_span().start),
        callee: Box::new(left),
        arguments,
    }))
}

fn parse_call_argument(parser: &mut Parser) -> PResult<Expr> {
    if parser.current_token_kind() == TokenKind::OpenParen && is_paren_lambda(parser) {
        debug!("parsing parenthesised function literal argument");
        let start = parser.get_position();
        let function = parse_function_tail(parser, start)?;
        return parse_infix_loop(parser, function, BindingPower::Default);
    }

    parse_expr(parser, BindingPower::Default)
}

/// Looks past a `(` for a parameter list closed by `)` and followed by `::`
/// or `->`. Only names, commas, colons and generic angle brackets may appear
/// inside, so ordinary grouped expressions bail out within a token or two.
fn is_paren_lambda(parser: &mut Parser) -> bool {
    let mut offset = 1;
    loop {
        match parser.peek_kind_at(offset) {
            TokenKind::CloseParen => break,
            TokenKind::Identifier
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Less
            | TokenKind::Greater => offset += 1,
            _ => return false,
        }
    }

    matches!(
        parser.peek_kind_at(offset + 1),
        TokenKind::DoubleColon | TokenKind::Arrow
    )
}

pub fn parse_index_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> PResult<Expr> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect_with_repair(TokenKind::CloseBracket)?;

    Ok(Expr::Index(IndexExpr {
        span: parser.span_from(left.get_span().start),
        object: Box::new(left),
        index: Box::new(index),
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> PResult<Expr> {
    parser.advance();
    let property = expect_property_name(parser)?;

    Ok(Expr::Member(MemberExpr {
        span: parser.span_from(left.get_span().start),
        object: Box::new(left),
        property,
    }))
}

/// Property names may be spelled like keywords; only `end` is refused.
pub fn expect_property_name(parser: &mut Parser) -> PResult<String> {
    let kind = parser.current_token_kind();
    if kind == TokenKind::Identifier || (kind.is_keyword() && kind != TokenKind::End) {
        return Ok(parser.advance().value);
    }

    let token = parser.current_token().value.clone();
    Err(parser.record_here(ErrorImpl::InvalidPropertyName { token }))
}

/// `fn(params) [-> T] :: body end`
pub fn parse_fn_expr(parser: &mut Parser) -> PResult<Expr> {
    let start = parser.advance().span.start;
    parse_function_tail(parser, start)
}

/// Parses from the opening `(` of a parameter list to the closing `end` of a
/// function literal.
fn parse_function_tail(parser: &mut Parser, start: Position) -> PResult<Expr> {
    let signature = parse_function_signature(parser);
    let (parameters, return_type) = recover_signature(parser, signature)?;

    let body = parse_block(parser, "fn")?;
    parser.expect(TokenKind::End)?;

    Ok(Expr::Function(FunctionExpr {
        parameters,
        return_type,
        body,
        span: parser.span_from(start),
    }))
}

fn parse_function_signature(
    parser: &mut Parser,
) -> PResult<(Vec<Parameter>, Option<TypeAnnotation>)> {
    let parameters = parse_parameters(parser)?;
    let return_type = parse_return_type(parser)?;
    parser.expect_block_open()?;
    Ok((parameters, return_type))
}

pub fn parse_case_expr(parser: &mut Parser) -> PResult<Expr> {
    let start = parser.get_position();
    let (subject, branches) = parse_case_parts(parser)?;

    Ok(Expr::Case(CaseExpr {
        subject: Box::new(subject),
        branches,
        span: parser.span_from(start),
    }))
}

/// Shared by the statement and expression forms of `case`. Consumes
/// everything up to and including `end`.
pub fn parse_case_parts(parser: &mut Parser) -> PResult<(Expr, Vec<CaseBranch>)> {
    debug!("parsing case at {}", parser.get_position());
    parser.advance();

    let header = parse_case_header(parser);
    let subject = recover_signature(parser, header)?;

    let mut branches = vec![];
    loop {
        match parser.current_token_kind() {
            TokenKind::End => break,
            TokenKind::EOF => {
                return Err(parser.record_here(ErrorImpl::UnterminatedBlock {
                    construct: String::from("case"),
                }))
            }
            _ => {}
        }

        match parse_case_branch(parser) {
            Ok(branch) => branches.push(branch),
            Err(Bail::Recorded) => return Err(skip_past_end(parser)),
            Err(other) => return Err(other),
        }
    }

    parser.expect(TokenKind::End)?;
    Ok((subject, branches))
}

fn parse_case_header(parser: &mut Parser) -> PResult<Expr> {
    let subject = parse_expr(parser, BindingPower::Default)?;
    parser.expect_block_open()?;
    Ok(subject)
}

fn parse_case_branch(parser: &mut Parser) -> PResult<CaseBranch> {
    let pattern = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::FatArrow)?;
    let result = parse_expr(parser, BindingPower::Default)?;

    Ok(CaseBranch { pattern, result })
}

/// `@Name(prop: value, ...) { child, ... }`; properties and children are optional.
pub fn parse_ui_element_expr(parser: &mut Parser) -> PResult<Expr> {
    parse_ui_element(parser).map(Expr::UiElement)
}

fn parse_ui_element(parser: &mut Parser) -> PResult<UiElementExpr> {
    let start = parser.advance().span.start;
    let name = parser.expect_identifier("element")?;

    let mut properties = vec![];
    if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance();
        properties = parse_comma_list(parser, TokenKind::CloseParen, |parser| {
            let key = expect_property_name(parser)?;
            parser.expect(TokenKind::Colon)?;
            let value = parse_expr(parser, BindingPower::Default)?;
            Ok((key, value))
        })?;
    }

    let mut children = vec![];
    if parser.current_token_kind() == TokenKind::OpenCurly {
        parser.advance();
        children = parse_comma_list(parser, TokenKind::CloseCurly, |parser| {
            parse_expr(parser, BindingPower::Default)
        })?;
    }

    Ok(UiElementExpr {
        name,
        properties,
        children,
        span: parser.span_from(start),
    })
}
