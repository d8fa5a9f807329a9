use log::debug;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::UiElementExpr,
        statements::{
            BlockStmt, BreakStmt, CaseStmt, CheckStmt, ComponentStmt, ExpressionStmt, FnDeclStmt,
            ForStmt, IfStmt, ModuleStmt, ReturnStmt, StructDeclStmt, TypeAliasStmt, UsingStmt,
            VarDeclStmt,
        },
        types::{
            Assertion, AssertionOp, ElseIfClause, Parameter, StructField, TestBlock,
            TypeAnnotation,
        },
    },
    errors::errors::ErrorImpl,
    lexer::tokens::TokenKind,
};

use super::{
    expr::{parse_case_parts, parse_comma_list, parse_expr},
    lookups::{BindingPower, LOOKUPS},
    parser::{Bail, PResult, Parser},
    recovery::{recover_signature, skip_past_end, skip_to_next_statement},
    types::parse_type,
};

/// Parses one statement. Returns `Ok(None)` on a block terminator or end of
/// input, which the caller treats as the end of its block.
pub fn parse_stmt(parser: &mut Parser) -> PResult<Option<Stmt>> {
    parser.descend()?;
    let result = parse_stmt_inner(parser);
    parser.ascend();
    result
}

fn parse_stmt_inner(parser: &mut Parser) -> PResult<Option<Stmt>> {
    let kind = parser.current_token_kind();
    if kind == TokenKind::EOF || kind.is_block_terminator() {
        return Ok(None);
    }

    if let Some(handler) = LOOKUPS.get_stmt(kind) {
        return handler(parser).map(Some);
    }

    parse_expression_stmt(parser).map(Some)
}

pub fn parse_expression_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let expression = parse_expr(parser, BindingPower::Default)?;
    let span = *expression.get_span();

    Ok(Stmt::Expression(ExpressionStmt { expression, span }))
}

/// Parses statements up to (not including) `end`, `else` or `where`.
/// Failed statements are skipped so the rest of the block is still parsed.
pub fn parse_block(parser: &mut Parser, construct: &str) -> PResult<BlockStmt> {
    parser.descend()?;
    let result = parse_block_inner(parser, construct);
    parser.ascend();
    result
}

fn parse_block_inner(parser: &mut Parser, construct: &str) -> PResult<BlockStmt> {
    let start = parser.get_position();
    let mut body = vec![];

    loop {
        let kind = parser.current_token_kind();
        if kind.is_block_terminator() {
            break;
        }
        if kind == TokenKind::EOF {
            return Err(parser.record_here(ErrorImpl::UnterminatedBlock {
                construct: construct.to_string(),
            }));
        }

        let before = parser.consumed();
        match parse_stmt(parser) {
            Ok(Some(stmt)) => body.push(stmt),
            Ok(None) => {}
            Err(Bail::Recorded) => {
                // A nested construct already reported running out of input.
                if parser.at_eof() {
                    return Err(Bail::Recorded);
                }
                skip_to_next_statement(parser, before);
            }
            Err(Bail::Recovered) => {}
            Err(fault) => return Err(fault),
        }
    }

    Ok(BlockStmt {
        body,
        span: parser.span_from(start),
    })
}

/// `(name[: T], ...)`
pub fn parse_parameters(parser: &mut Parser) -> PResult<Vec<Parameter>> {
    parser.expect(TokenKind::OpenParen)?;
    parse_comma_list(parser, TokenKind::CloseParen, parse_parameter)
}

fn parse_parameter(parser: &mut Parser) -> PResult<Parameter> {
    let name = parser.expect_identifier("parameter")?;
    let type_annotation = parse_optional_annotation(parser)?;

    Ok(Parameter {
        name,
        type_annotation,
    })
}

fn parse_optional_annotation(parser: &mut Parser) -> PResult<Option<TypeAnnotation>> {
    if parser.current_token_kind() != TokenKind::Colon {
        return Ok(None);
    }

    parser.advance();
    parse_type(parser).map(Some)
}

/// Optional `-> T` after a parameter list.
pub fn parse_return_type(parser: &mut Parser) -> PResult<Option<TypeAnnotation>> {
    if parser.current_token_kind() != TokenKind::Arrow {
        return Ok(None);
    }

    parser.advance();
    parse_type(parser).map(Some)
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.get_position();
    let is_constant = parser.advance().kind == TokenKind::Const;
    let context = if is_constant { "constant" } else { "variable" };

    let mut identifiers = vec![parser.expect_identifier(context)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        identifiers.push(parser.expect_identifier(context)?);
    }

    let explicit_type = parse_optional_annotation(parser)?;

    parser.expect(TokenKind::Assignment)?;
    let assigned_value = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::VarDecl(VarDeclStmt {
        identifiers,
        is_constant,
        explicit_type,
        assigned_value,
        span: parser.span_from(start),
    }))
}

/// `fn` directly followed by `(` is a function literal used as a statement;
/// anything else is a declaration.
pub fn parse_fn_stmt(parser: &mut Parser) -> PResult<Stmt> {
    if parser.peek_token_kind() == TokenKind::OpenParen {
        return parse_expression_stmt(parser);
    }

    parse_fn_decl_stmt(parser)
}

struct FnSignature {
    identifier: String,
    receiver: Option<TypeAnnotation>,
    parameters: Vec<Parameter>,
    return_type: Option<TypeAnnotation>,
}

fn parse_fn_decl_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;

    let signature = parse_fn_signature(parser);
    let signature = recover_signature(parser, signature)?;
    debug!("parsing body of fn {}", signature.identifier);

    let body = parse_block(parser, "fn")?;

    let mut where_block = None;
    if parser.current_token_kind() == TokenKind::Where {
        parser.advance();
        where_block = Some(parse_test_items(parser, None, "where")?);
    }

    parser.expect(TokenKind::End)?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        identifier: signature.identifier,
        receiver: signature.receiver,
        parameters: signature.parameters,
        return_type: signature.return_type,
        body,
        where_block,
        span: parser.span_from(start),
    }))
}

fn parse_fn_signature(parser: &mut Parser) -> PResult<FnSignature> {
    let first = parser.expect_identifier("function")?;

    let (receiver, identifier) = if parser.current_token_kind() == TokenKind::Dot {
        parser.advance();
        let method = parser.expect_identifier("method")?;
        (Some(TypeAnnotation::simple(&first)), method)
    } else {
        (None, first)
    };

    let parameters = parse_parameters(parser)?;
    let return_type = parse_return_type(parser)?;
    parser.expect_block_open()?;

    Ok(FnSignature {
        identifier,
        receiver,
        parameters,
        return_type,
    })
}

pub fn parse_struct_decl_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;

    let header = parse_named_header(parser, "struct");
    let name = recover_signature(parser, header)?;
    debug!("parsing fields of struct {}", name);

    let mut fields = vec![];
    loop {
        match parser.current_token_kind() {
            TokenKind::End => break,
            TokenKind::EOF => {
                return Err(parser.record_here(ErrorImpl::UnterminatedBlock {
                    construct: String::from("struct"),
                }))
            }
            _ => {}
        }

        match parse_struct_field(parser) {
            Ok(field) => fields.push(field),
            Err(Bail::Recorded) => return Err(skip_past_end(parser)),
            Err(other) => return Err(other),
        }
    }

    parser.expect(TokenKind::End)?;

    Ok(Stmt::StructDecl(StructDeclStmt {
        name,
        fields,
        span: parser.span_from(start),
    }))
}

/// `name ::` for constructs whose signature is only a name.
fn parse_named_header(parser: &mut Parser, context: &str) -> PResult<String> {
    let name = parser.expect_identifier(context)?;
    parser.expect_block_open()?;
    Ok(name)
}

fn parse_struct_field(parser: &mut Parser) -> PResult<StructField> {
    let name = parser.expect_identifier("field")?;
    parser.expect(TokenKind::Colon)?;
    let type_annotation = parse_type(parser)?;

    if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
    }

    Ok(StructField {
        name,
        type_annotation,
    })
}

pub fn parse_type_alias_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;
    let name = parser.expect_identifier("type")?;
    parser.expect(TokenKind::Assignment)?;
    let aliased = parse_type(parser)?;

    Ok(Stmt::TypeAlias(TypeAliasStmt {
        name,
        aliased,
        span: parser.span_from(start),
    }))
}

pub fn parse_module_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;

    let header = parse_named_header(parser, "module");
    let name = recover_signature(parser, header)?;

    let body = parse_block(parser, "module")?;
    parser.expect(TokenKind::End)?;

    Ok(Stmt::Module(ModuleStmt {
        name,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_using_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;

    let (path, quoted) = if parser.current_token_kind() == TokenKind::String {
        (parser.advance().value, true)
    } else {
        let mut segments = vec![parser.expect_identifier("module")?];
        while parser.current_token_kind() == TokenKind::Dot {
            parser.advance();
            segments.push(parser.expect_identifier("module")?);
        }
        (segments.join("."), false)
    };

    let mut alias = None;
    if parser.current_token_kind() == TokenKind::As {
        parser.advance();
        alias = Some(parser.expect_identifier("alias")?);
    }

    Ok(Stmt::Using(UsingStmt {
        path,
        quoted,
        alias,
        span: parser.span_from(start),
    }))
}

pub fn parse_component_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;

    let header = parse_component_header(parser);
    let (name, parameters) = recover_signature(parser, header)?;
    debug!("parsing component {}", name);

    let block = parse_block(parser, "component")?;
    parser.expect(TokenKind::End)?;

    let mut root: Option<UiElementExpr> = None;
    let mut body = vec![];
    for stmt in block.body {
        match stmt {
            Stmt::Expression(ExpressionStmt {
                expression: Expr::UiElement(element),
                ..
            }) => {
                if root.is_some() {
                    parser.record(
                        ErrorImpl::DuplicateRootElement {
                            component: name.clone(),
                        },
                        element.span.start,
                    );
                } else {
                    root = Some(element);
                }
            }
            other => body.push(other),
        }
    }

    Ok(Stmt::Component(ComponentStmt {
        name,
        parameters,
        body: BlockStmt {
            body,
            span: block.span,
        },
        root,
        span: parser.span_from(start),
    }))
}

fn parse_component_header(parser: &mut Parser) -> PResult<(String, Vec<Parameter>)> {
    let name = parser.expect_identifier("component")?;

    let mut parameters = vec![];
    if parser.current_token_kind() == TokenKind::OpenParen {
        parameters = parse_parameters(parser)?;
    }

    parser.expect_block_open()?;
    Ok((name, parameters))
}

pub fn parse_if_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;

    let header = parse_condition_header(parser);
    let condition = recover_signature(parser, header)?;
    let then_body = parse_block(parser, "if")?;

    let mut else_ifs = vec![];
    let mut else_body = None;

    while parser.current_token_kind() == TokenKind::Else {
        parser.advance();

        if parser.current_token_kind() == TokenKind::If {
            parser.advance();
            let header = parse_condition_header(parser);
            let condition = recover_signature(parser, header)?;
            let body = parse_block(parser, "else if")?;
            else_ifs.push(ElseIfClause { condition, body });
        } else {
            else_body = Some(parse_block(parser, "else")?);
            break;
        }
    }

    parser.expect(TokenKind::End)?;

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_ifs,
        else_body,
        span: parser.span_from(start),
    }))
}

fn parse_condition_header(parser: &mut Parser) -> PResult<Expr> {
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect_block_open()?;
    Ok(condition)
}

pub fn parse_case_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.get_position();
    let (subject, branches) = parse_case_parts(parser)?;

    Ok(Stmt::Case(CaseStmt {
        subject,
        branches,
        span: parser.span_from(start),
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;

    let header = parse_for_header(parser);
    let (index, value, iterable) = recover_signature(parser, header)?;

    let body = parse_block(parser, "for")?;
    parser.expect(TokenKind::End)?;

    Ok(Stmt::For(ForStmt {
        index,
        value,
        iterable,
        body,
        span: parser.span_from(start),
    }))
}

fn parse_for_header(parser: &mut Parser) -> PResult<(Option<String>, String, Expr)> {
    let first = parser.expect_identifier("loop variable")?;

    let (index, value) = if parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        (Some(first), parser.expect_identifier("loop variable")?)
    } else {
        (None, first)
    };

    parser.expect(TokenKind::In)?;
    let iterable = parse_expr(parser, BindingPower::Default)?;
    parser.expect_block_open()?;

    Ok((index, value, iterable))
}

pub fn parse_check_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let start = parser.advance().span.start;

    let header = parse_check_header(parser);
    let label = recover_signature(parser, header)?;

    let tests = parse_test_items(parser, label, "check")?;
    parser.expect(TokenKind::End)?;

    Ok(Stmt::Check(CheckStmt {
        tests,
        span: parser.span_from(start),
    }))
}

fn parse_check_header(parser: &mut Parser) -> PResult<Option<String>> {
    let mut label = None;
    if parser.current_token_kind() == TokenKind::String {
        label = Some(parser.advance().value);
    }

    parser.expect_block_open()?;
    Ok(label)
}

/// Items of a `check` or `where` block up to (not including) the terminator.
/// Keyword-led statements and assignments are setup; any other expression
/// is an assertion.
pub fn parse_test_items(
    parser: &mut Parser,
    label: Option<String>,
    construct: &str,
) -> PResult<TestBlock> {
    parser.descend()?;
    let result = parse_test_items_inner(parser, label, construct);
    parser.ascend();
    result
}

fn parse_test_items_inner(
    parser: &mut Parser,
    label: Option<String>,
    construct: &str,
) -> PResult<TestBlock> {
    let mut tests = TestBlock {
        label,
        ..TestBlock::default()
    };

    loop {
        let kind = parser.current_token_kind();
        if kind.is_block_terminator() {
            break;
        }
        if kind == TokenKind::EOF {
            return Err(parser.record_here(ErrorImpl::UnterminatedBlock {
                construct: construct.to_string(),
            }));
        }

        let before = parser.consumed();
        match parse_test_item(parser, &mut tests) {
            Ok(()) => {}
            Err(Bail::Recorded) => {
                if parser.at_eof() {
                    return Err(Bail::Recorded);
                }
                skip_to_next_statement(parser, before);
            }
            Err(Bail::Recovered) => {}
            Err(fault) => return Err(fault),
        }
    }

    Ok(tests)
}

fn parse_test_item(parser: &mut Parser, tests: &mut TestBlock) -> PResult<()> {
    let kind = parser.current_token_kind();
    let is_fn_literal = kind == TokenKind::Fn && parser.peek_token_kind() == TokenKind::OpenParen;

    if kind.starts_statement() && kind != TokenKind::Case && !is_fn_literal {
        if let Some(stmt) = parse_stmt(parser)? {
            tests.setup.push(stmt);
        }
        return Ok(());
    }

    let expr = parse_expr(parser, BindingPower::Default)?;
    match expr {
        Expr::Assignment(_) => tests.setup.push(expr.into_stmt()),
        Expr::Binary(binary) => match AssertionOp::from_operator(&binary.operator.value) {
            Some(operator) => tests.assertions.push(Assertion {
                left: *binary.left,
                operator,
                right: Some(*binary.right),
            }),
            None => tests.assertions.push(Assertion {
                left: Expr::Binary(binary),
                operator: AssertionOp::Truthy,
                right: None,
            }),
        },
        other => tests.assertions.push(Assertion {
            left: other,
            operator: AssertionOp::Truthy,
            right: None,
        }),
    }

    Ok(())
}

pub fn parse_return_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let keyword = parser.advance();
    let mut values = vec![];

    if starts_return_value(parser) {
        values.push(parse_expr(parser, BindingPower::Default)?);
        while parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
            values.push(parse_expr(parser, BindingPower::Default)?);
        }
    }

    Ok(Stmt::Return(ReturnStmt {
        values,
        span: parser.span_from(keyword.span.start),
    }))
}

/// A bare `return` is followed by a terminator, a statement keyword or
/// end of input.
fn starts_return_value(parser: &Parser) -> bool {
    match parser.current_token_kind() {
        TokenKind::EOF => false,
        TokenKind::Fn => parser.peek_token_kind() == TokenKind::OpenParen,
        TokenKind::Case => true,
        kind => !kind.is_block_terminator() && !kind.starts_statement(),
    }
}

pub fn parse_break_stmt(parser: &mut Parser) -> PResult<Stmt> {
    let span = parser.advance().span;
    Ok(Stmt::Break(BreakStmt { span }))
}
