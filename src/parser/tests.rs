//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Operator precedence and associativity
//! - Declarations and `end`-terminated blocks
//! - The `fn` declaration / literal ambiguity
//! - String interpolation
//! - Error accumulation and recovery

use crate::ast::ast::{Expr, ExprType, Program, Stmt, StmtType};
use crate::ast::types::{AssertionOp, InterpolationPart};
use crate::errors::errors::ErrorImpl;
use crate::lexer::lexer::tokenize;
use crate::{Position, Span};

use super::parser::{parse, parse_source, parse_with_config, Parser, ParserConfig};

fn parse_clean(source: &str) -> Program {
    let (parser, program) = parse_source(source).unwrap();
    assert!(
        !parser.has_errors(),
        "unexpected errors for {:?}:\n{}",
        source,
        parser.format_errors()
    );
    program
}

fn parse_with_errors(source: &str) -> (Parser, Program) {
    let (parser, program) = parse_source(source).unwrap();
    assert!(parser.has_errors(), "expected errors for {:?}", source);
    (parser, program)
}

fn first_expr(source: &str) -> Expr {
    let program = parse_clean(source);
    match program.body.into_iter().next() {
        Some(Stmt::Expression(stmt)) => stmt.expression,
        other => panic!("expected an expression statement, got {:?}", other),
    }
}

fn render(source: &str) -> String {
    parse_clean(source).to_string()
}

fn error_names(parser: &Parser) -> Vec<&str> {
    parser.errors().iter().map(|error| error.get_error_name()).collect()
}

#[test]
fn test_prefix_binds_tighter_than_product() {
    assert_eq!(render("-a * b"), "((-a) * b)");
}

#[test]
fn test_mixed_precedence() {
    assert_eq!(
        render("a + b * c + d / e - f"),
        "(((a + (b * c)) + (d / e)) - f)"
    );
}

#[test]
fn test_grouping_overrides_precedence() {
    assert_eq!(render("(5 + 5) * 2"), "((5 + 5) * 2)");
}

#[test]
fn test_left_associativity() {
    assert_eq!(render("a - b - c"), "((a - b) - c)");
    assert_eq!(render("2 ^ 3 ^ 2"), "((2 ^ 3) ^ 2)");
}

#[test]
fn test_logical_and_comparison_levels() {
    assert_eq!(render("a or b and c"), "(a or (b and c))");
    assert_eq!(render("a == b < c"), "(a == (b < c))");
    assert_eq!(render("!done and ready"), "((!done) and ready)");
    assert_eq!(render("x % 2 == 0"), "((x % 2) == 0)");
}

#[test]
fn test_range_binds_looser_than_sum() {
    assert_eq!(render("1..n + 1"), "(1..(n + 1))");
    assert_eq!(render("0..=9"), "(0..=9)");

    match first_expr("0..=9") {
        Expr::Range(range) => assert!(range.inclusive),
        other => panic!("expected range, got {:?}", other),
    }
}

#[test]
fn test_postfix_chain() {
    assert_eq!(render("a.b.c(1)[2]"), "a.b.c(1)[2]");
    assert_eq!(render("-a.b"), "(-a.b)");
}

#[test]
fn test_assignment_expression() {
    assert_eq!(render("x = 1 + 2"), "x = (1 + 2)");
    assert_eq!(render("items[0] += 1"), "items[0] += 1");
    assert_eq!(render("point.x = 3"), "point.x = 3");

    assert_eq!(first_expr("x = 1").get_expr_type(), ExprType::Assignment);
}

#[test]
fn test_nested_assignment_keeps_parentheses() {
    assert_eq!(render("(a = 1) + 2"), "((a = 1) + 2)");
    assert_eq!(render("var x = (a = 1)"), "var x = (a = 1)");
    assert_eq!(render("f(a = 1)"), "f((a = 1))");
}

#[test]
fn test_invalid_assignment_target() {
    let (parser, _) = parse_with_errors("1 = 2");
    assert_eq!(error_names(&parser), vec!["InvalidAssignmentTarget"]);
}

#[test]
fn test_number_out_of_range() {
    let source = format!("x = 1{}\nvar ok = 1", "0".repeat(400));
    let (parser, program) = parse_with_errors(&source);

    assert_eq!(error_names(&parser), vec!["NumberParseError"]);
    assert_eq!(program.to_string(), "var ok = 1");
}

#[test]
fn test_literals() {
    assert_eq!(render("[1, 2, 3]"), "[1, 2, 3]");
    assert_eq!(render("[]"), "[]");
    assert_eq!(render("{name: \"kes\", \"age\": 3}"), "{name: \"kes\", \"age\": 3}");
    assert_eq!(render("{}"), "{}");
    assert_eq!(render("[true, false, nil, 3.5]"), "[true, false, nil, 3.5]");
}

#[test]
fn test_trailing_comma_in_lists() {
    assert_eq!(render("[1, 2,]"), "[1, 2]");
    assert_eq!(render("f(a, b,)"), "f(a, b)");
}

#[test]
fn test_keywords_as_property_names() {
    assert_eq!(render("obj.type.for"), "obj.type.for");
    assert_eq!(render("ui.component(1)"), "ui.component(1)");
}

#[test]
fn test_end_is_not_a_property_name() {
    let (parser, _) = parse_with_errors("obj.end");
    assert_eq!(error_names(&parser), vec!["InvalidPropertyName"]);

    let (parser, _) = parse_with_errors("obj.5");
    assert_eq!(error_names(&parser), vec!["InvalidPropertyName"]);
}

#[test]
fn test_missing_prefix_parser() {
    let (parser, _) = parse_with_errors(")");
    assert_eq!(
        parser.error_messages(),
        vec!["line 1, column 1: no prefix parse function for CloseParen found"]
    );
}

#[test]
fn test_fn_literal_is_expression_statement() {
    let program = parse_clean("fn() :: 1 end");
    assert_eq!(program.len(), 1);

    match &program.body[0] {
        Stmt::Expression(stmt) => {
            assert_eq!(stmt.expression.get_expr_type(), ExprType::Function)
        }
        other => panic!("expected expression statement, got {:?}", other),
    }
    assert_eq!(program.to_string(), "fn() :: 1 end");
}

#[test]
fn test_fn_with_name_is_declaration() {
    let program = parse_clean("fn add() :: 1 end");

    match &program.body[0] {
        Stmt::FnDecl(decl) => {
            assert_eq!(decl.identifier, "add");
            assert!(decl.receiver.is_none());
            assert!(decl.where_block.is_none());
        }
        other => panic!("expected fn declaration, got {:?}", other),
    }
}

#[test]
fn test_fn_declaration_with_types_and_receiver() {
    let program = parse_clean("fn Point.scale(by: number) -> Point :: return self end");

    match &program.body[0] {
        Stmt::FnDecl(decl) => {
            assert_eq!(decl.identifier, "scale");
            assert_eq!(decl.receiver.as_ref().map(|r| r.name.as_str()), Some("Point"));
            assert_eq!(decl.parameters.len(), 1);
            assert_eq!(decl.parameters[0].to_string(), "by: number");
            assert_eq!(decl.return_type.as_ref().map(|t| t.to_string()), Some("Point".to_string()));
        }
        other => panic!("expected fn declaration, got {:?}", other),
    }
}

#[test]
fn test_fn_literal_inside_block() {
    let program = parse_clean("fn outer() :: fn() :: 1 end end");

    match &program.body[0] {
        Stmt::FnDecl(decl) => {
            assert_eq!(decl.body.body.len(), 1);
            assert_eq!(decl.body.body[0].get_stmt_type(), StmtType::ExpressionStmt);
        }
        other => panic!("expected fn declaration, got {:?}", other),
    }
}

#[test]
fn test_paren_lambda_in_call_arguments() {
    assert_eq!(
        render("map(xs, (x) :: x * 2 end)"),
        "map(xs, fn(x) :: (x * 2) end)"
    );
    assert_eq!(render("run(() :: 1 end)"), "run(fn() :: 1 end)");
    assert_eq!(render("reduce(xs, (a, b: number) -> number :: a + b end, 0)"),
        "reduce(xs, fn(a, b: number) -> number :: (a + b) end, 0)");
}

#[test]
fn test_parenthesised_arguments_are_grouping() {
    assert_eq!(render("f((a + b))"), "f((a + b))");
    assert_eq!(render("f((a))"), "f(a)");
}

#[test]
fn test_var_declarations() {
    assert_eq!(render("var a, b: number = 1"), "var a, b: number = 1");
    assert_eq!(render("const PI = 3.14"), "const PI = 3.14");

    match &parse_clean("const LIMIT = 10").body[0] {
        Stmt::VarDecl(decl) => {
            assert!(decl.is_constant);
            assert_eq!(decl.identifiers, vec!["LIMIT".to_string()]);
        }
        other => panic!("expected var declaration, got {:?}", other),
    }
}

#[test]
fn test_var_without_value_records_one_error() {
    let (parser, program) = parse_with_errors("var x");

    assert!(program.is_empty());
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(
        parser.error_messages(),
        vec!["line 1, column 6: expected Assignment, got EOF"]
    );
}

#[test]
fn test_reserved_word_in_naming_position() {
    let (parser, _) = parse_with_errors("var if = 1");

    assert_eq!(parser.errors().len(), 1);
    assert_eq!(
        parser.errors()[0].get_kind(),
        &ErrorImpl::ReservedIdentifier {
            name: "if".to_string(),
            context: "variable".to_string(),
        }
    );

    let (parser, _) = parse_with_errors("fn f(end) :: 1 end");
    assert_eq!(error_names(&parser)[0], "ReservedIdentifier");
}

#[test]
fn test_generic_type_annotations() {
    assert_eq!(
        render("type Table = Map<string, List<number>>"),
        "type Table = Map<string, List<number>>"
    );

    match &parse_clean("var xs: List<number> = []").body[0] {
        Stmt::VarDecl(decl) => {
            let ty = decl.explicit_type.as_ref().unwrap();
            assert!(ty.is_generic());
            assert_eq!(ty.parameters[0].name, "number");
            assert!(!ty.parameters[0].is_generic());
        }
        other => panic!("expected var declaration, got {:?}", other),
    }
}

#[test]
fn test_struct_declaration() {
    match &parse_clean("struct Point :: x: number, y: number end").body[0] {
        Stmt::StructDecl(decl) => {
            assert_eq!(decl.name, "Point");
            assert_eq!(decl.fields.len(), 2);
            assert_eq!(decl.fields[1].to_string(), "y: number");
        }
        other => panic!("expected struct, got {:?}", other),
    }

    assert_eq!(render("struct Empty :: end"), "struct Empty :: end");
}

#[test]
fn test_module_and_using() {
    let program = parse_clean("module geometry :: var origin = 0 end\nusing ui.widgets as w\nusing \"lib/util\"");

    assert_eq!(program.len(), 3);
    assert_eq!(program.body[0].get_stmt_type(), StmtType::ModuleStmt);

    match &program.body[1] {
        Stmt::Using(using) => {
            assert_eq!(using.path, "ui.widgets");
            assert_eq!(using.alias.as_deref(), Some("w"));
            assert!(!using.quoted);
        }
        other => panic!("expected using, got {:?}", other),
    }

    match &program.body[2] {
        Stmt::Using(using) => {
            assert_eq!(using.path, "lib/util");
            assert!(using.quoted);
            assert!(using.alias.is_none());
        }
        other => panic!("expected using, got {:?}", other),
    }
}

#[test]
fn test_if_else_chain() {
    let source = "if a :: 1 else if b :: 2 else if c :: 3 else 4 end";
    assert_eq!(render(source), source);

    match &parse_clean(source).body[0] {
        Stmt::If(stmt) => {
            assert_eq!(stmt.else_ifs.len(), 2);
            assert!(stmt.else_body.is_some());
        }
        other => panic!("expected if, got {:?}", other),
    }
}

#[test]
fn test_for_loop_forms() {
    match &parse_clean("for v in 1..10 :: break end").body[0] {
        Stmt::For(stmt) => {
            assert!(stmt.index.is_none());
            assert_eq!(stmt.value, "v");
            assert_eq!(stmt.iterable.get_expr_type(), ExprType::Range);
        }
        other => panic!("expected for, got {:?}", other),
    }

    match &parse_clean("for i, v in items :: print(i, v) end").body[0] {
        Stmt::For(stmt) => {
            assert_eq!(stmt.index.as_deref(), Some("i"));
            assert_eq!(stmt.value, "v");
        }
        other => panic!("expected for, got {:?}", other),
    }
}

#[test]
fn test_case_statement_and_expression() {
    match &parse_clean("case x :: 1 => \"one\" _ => \"many\" end").body[0] {
        Stmt::Case(stmt) => {
            assert_eq!(stmt.branches.len(), 2);
            assert!(!stmt.branches[0].is_wildcard());
            assert!(stmt.branches[1].is_wildcard());
        }
        other => panic!("expected case statement, got {:?}", other),
    }

    match &parse_clean("var r = case x :: 1 => a end").body[0] {
        Stmt::VarDecl(decl) => {
            assert_eq!(decl.assigned_value.get_expr_type(), ExprType::Case)
        }
        other => panic!("expected var declaration, got {:?}", other),
    }
}

#[test]
fn test_return_values() {
    let program = parse_clean("fn f() :: return end fn g() :: return 1, 2 end");

    let counts = program
        .iter()
        .map(|stmt| match stmt {
            Stmt::FnDecl(decl) => match &decl.body.body[0] {
                Stmt::Return(ret) => ret.values.len(),
                other => panic!("expected return, got {:?}", other),
            },
            other => panic!("expected fn declaration, got {:?}", other),
        })
        .collect::<Vec<_>>();

    assert_eq!(counts, vec![0, 2]);
}

#[test]
fn test_return_before_statement_keyword_has_no_value() {
    let program = parse_clean("fn f() :: if x :: return var y = 1 end end");
    assert_eq!(
        program.to_string(),
        "fn f() :: if x :: return var y = 1 end end"
    );
}

#[test]
fn test_check_block_classifies_items() {
    let source = "check \"math\" ::\n  var a = 2\n  a == 2\n  a < 3\n  valid(a)\n  a = 3\nend";

    match &parse_clean(source).body[0] {
        Stmt::Check(check) => {
            let tests = &check.tests;
            assert_eq!(tests.label.as_deref(), Some("math"));
            assert_eq!(tests.setup.len(), 2);
            let operators = tests
                .assertions
                .iter()
                .map(|assertion| assertion.operator)
                .collect::<Vec<_>>();
            assert_eq!(
                operators,
                vec![AssertionOp::Equal, AssertionOp::Less, AssertionOp::Truthy]
            );
            assert!(tests.assertions[2].right.is_none());
        }
        other => panic!("expected check, got {:?}", other),
    }
}

#[test]
fn test_fn_where_block() {
    let source = "fn double(x) :: return x * 2 where double(2) == 4 double(0) != 1 end";

    match &parse_clean(source).body[0] {
        Stmt::FnDecl(decl) => {
            let tests = decl.where_block.as_ref().unwrap();
            assert!(tests.label.is_none());
            assert_eq!(tests.assertions.len(), 2);
            assert_eq!(tests.assertions[1].operator, AssertionOp::NotEqual);
        }
        other => panic!("expected fn declaration, got {:?}", other),
    }

    assert_eq!(
        render(source),
        "fn double(x) :: return (x * 2) where double(2) == 4 double(0) != 1 end"
    );
}

#[test]
fn test_component_with_root_element() {
    let source = "component Counter(start) ::\n  var count = start\n  @Column(padding: 4) { @Text(value: count), @Button(label: \"+\") }\nend";

    match &parse_clean(source).body[0] {
        Stmt::Component(component) => {
            assert_eq!(component.name, "Counter");
            assert_eq!(component.parameters.len(), 1);
            assert_eq!(component.body.body.len(), 1);

            let root = component.root.as_ref().unwrap();
            assert_eq!(root.name, "Column");
            assert_eq!(root.children.len(), 2);
            assert_eq!(root.get_property("padding").map(|p| p.to_string()), Some("4".to_string()));
        }
        other => panic!("expected component, got {:?}", other),
    }
}

#[test]
fn test_component_with_two_roots() {
    let (parser, program) = parse_with_errors("component C :: @A @B end");

    assert_eq!(error_names(&parser), vec!["DuplicateRootElement"]);
    match &program.body[0] {
        Stmt::Component(component) => {
            assert_eq!(component.root.as_ref().map(|r| r.name.as_str()), Some("A"))
        }
        other => panic!("expected component, got {:?}", other),
    }
}

#[test]
fn test_interpolated_string() {
    match first_expr("\"Count: #{count}\"") {
        Expr::InterpolatedString(string) => {
            assert_eq!(string.parts.len(), 2);
            assert_eq!(string.parts[0], InterpolationPart::Text("Count: ".to_string()));
            match &string.parts[1] {
                InterpolationPart::Expression(Expr::Symbol(symbol)) => {
                    assert_eq!(symbol.value, "count")
                }
                other => panic!("expected symbol fragment, got {:?}", other),
            }
        }
        other => panic!("expected interpolated string, got {:?}", other),
    }
}

#[test]
fn test_plain_and_unbalanced_strings() {
    assert_eq!(first_expr("\"hello\"").get_expr_type(), ExprType::String);
    assert_eq!(first_expr("\"oops #{a + \"").get_expr_type(), ExprType::String);
}

#[test]
fn test_interpolated_expression_fragment() {
    assert_eq!(render("\"sum: #{a + b}!\""), "\"sum: #{(a + b)}!\"");
}

#[test]
fn test_interpolated_fragment_with_quotes() {
    let source = "print(\"#{f(\\\"x\\\")}\")";

    let text = render(source);
    assert_eq!(text, source);
    assert_eq!(render(&text), text);
}

#[test]
fn test_interpolated_fragment_positions() {
    let program = parse_clean("var s = \"ab #{x + y}\"");
    let Stmt::VarDecl(decl) = &program.body[0] else {
        panic!("expected var declaration");
    };
    let Expr::InterpolatedString(string) = &decl.assigned_value else {
        panic!("expected interpolated string");
    };
    let InterpolationPart::Expression(expr) = &string.parts[1] else {
        panic!("expected expression fragment");
    };
    assert_eq!(
        expr.get_span(),
        &Span::new(Position::new(1, 15), Position::new(1, 20))
    );

    match first_expr(r#""\"q\" #{n}""#) {
        Expr::InterpolatedString(string) => match &string.parts[1] {
            InterpolationPart::Expression(expr) => assert_eq!(
                expr.get_span(),
                &Span::new(Position::new(1, 10), Position::new(1, 11))
            ),
            other => panic!("expected expression fragment, got {:?}", other),
        },
        other => panic!("expected interpolated string, got {:?}", other),
    }
}

#[test]
fn test_interpolation_errors_are_merged() {
    let (parser, program) = parse_with_errors("\"bad #{1 +}\"");

    assert_eq!(error_names(&parser), vec!["Interpolation"]);
    assert_eq!(program.body[0].to_string(), "\"bad #{1 +}\"");

    let (parser, _) = parse_with_errors("\"empty #{}\"");
    assert_eq!(error_names(&parser), vec!["EmptyInterpolation"]);

    let (parser, _) = parse_with_errors("\"two #{a b}\"");
    assert_eq!(error_names(&parser), vec!["Interpolation"]);
}

#[test]
fn test_interpolation_errors_can_be_dropped() {
    let config = ParserConfig {
        merge_interpolation_errors: false,
        ..ParserConfig::default()
    };
    let (parser, program) = parse_with_config(tokenize("\"bad #{1 +}\"").unwrap(), config);

    assert!(!parser.has_errors());
    assert_eq!(program.body[0].to_string(), "\"bad #{1 +}\"");
}

#[test]
fn test_unterminated_blocks() {
    let cases = [
        ("fn f() :: 1", "fn"),
        ("if x :: y", "if"),
        ("if x :: y else z", "else"),
        ("for i in xs :: y", "for"),
        ("struct P :: x: number", "struct"),
        ("case x :: 1 => 2", "case"),
        ("module m :: var a = 1", "module"),
        ("component C :: @Text", "component"),
        ("check :: 1 == 1", "check"),
        ("fn f() :: 1 where f() == 1", "where"),
        ("x = fn() :: 1", "fn"),
        ("fn f() :: if x :: 1", "if"),
    ];

    for (source, construct) in cases {
        let (parser, program) = parse_source(source).unwrap();
        assert_eq!(parser.errors().len(), 1, "{:?}: {}", source, parser.format_errors());
        assert_eq!(
            parser.errors()[0].get_kind(),
            &ErrorImpl::UnterminatedBlock {
                construct: construct.to_string()
            },
            "{:?}",
            source
        );
        assert!(program.is_empty(), "{:?}", source);
    }
}

#[test]
fn test_synchronize_resumes_at_next_statement() {
    let (parser, program) = parse_with_errors("var = 5\nvar y = 10");

    assert_eq!(parser.errors().len(), 1);
    assert_eq!(program.len(), 1);
    assert_eq!(program.to_string(), "var y = 10");
}

#[test]
fn test_independent_errors_are_all_collected() {
    let (parser, program) = parse_with_errors("var x\nvar y = )\nvar z = 3");

    assert_eq!(error_names(&parser), vec!["UnexpectedToken", "NoPrefixParser"]);
    assert_eq!(program.to_string(), "var z = 3");
}

#[test]
fn test_block_recovery_skips_to_next_statement() {
    let (parser, program) = parse_with_errors("fn f() ::\n  var = 1\n  return 2\nend");

    assert_eq!(parser.errors().len(), 1);
    assert_eq!(program.to_string(), "fn f() :: return 2 end");
}

#[test]
fn test_failed_signature_skips_whole_construct() {
    let (parser, program) = parse_with_errors("fn 1() :: if x :: y end end\nvar z = 1");

    assert_eq!(parser.errors().len(), 1);
    assert_eq!(program.to_string(), "var z = 1");
}

#[test]
fn test_failed_else_if_header_reports_once() {
    let (parser, program) = parse_with_errors("fn f() :: if a :: b else if :: c end end\nvar ok = 1");

    assert_eq!(error_names(&parser), vec!["NoPrefixParser"]);
    let kinds = program.iter().map(Stmt::get_stmt_type).collect::<Vec<_>>();
    assert_eq!(kinds, vec![StmtType::FnDeclStmt, StmtType::VarDeclStmt]);
}

#[test]
fn test_failed_struct_field_skips_to_end() {
    let (parser, program) = parse_with_errors("struct P :: x number end\nvar z = 1");

    assert_eq!(parser.errors().len(), 1);
    assert_eq!(program.to_string(), "var z = 1");
}

#[test]
fn test_stray_terminator_at_top_level() {
    let (parser, program) = parse_with_errors("end\nvar a = 1");

    assert_eq!(error_names(&parser), vec!["UnexpectedTerminator"]);
    assert_eq!(program.len(), 1);
}

#[test]
fn test_bounded_repair_of_call_arguments() {
    let (parser, program) = parse_with_errors("print(1 2)");

    assert_eq!(
        parser.error_messages(),
        vec!["line 1, column 9: expected CloseParen, got Number"]
    );
    assert_eq!(program.to_string(), "print(1)");
}

#[test]
fn test_bounded_repair_of_block_open() {
    let (parser, program) = parse_with_errors("if x y :: 1 end");

    assert_eq!(parser.errors().len(), 1);
    assert_eq!(program.body[0].get_stmt_type(), StmtType::IfStmt);
}

#[test]
fn test_repair_gives_up_beyond_window() {
    let (parser, program) = parse_with_errors("print(1 2 3 4 5)\nvar ok = 1");

    assert_eq!(parser.errors().len(), 1);
    assert_eq!(program.to_string(), "var ok = 1");
}

#[test]
fn test_nesting_limit_is_reported() {
    let config = ParserConfig {
        max_depth: 32,
        ..ParserConfig::default()
    };
    let source = format!("{}1{}\nvar after = 1", "(".repeat(100), ")".repeat(100));
    let (parser, program) = parse_with_config(tokenize(&source).unwrap(), config);

    assert_eq!(error_names(&parser), vec!["NestingTooDeep"]);
    assert_eq!(program.to_string(), "var after = 1");
    assert_eq!(parser.depth(), 0);
}

#[test]
fn test_nesting_within_limit() {
    let source = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(render(&source), "1");
}

fn nested_ifs(levels: usize) -> String {
    format!("{}b{}", "if a :: ".repeat(levels), " end".repeat(levels))
}

#[test]
fn test_default_nesting_limit_fits_default_stack() {
    // Spawned threads get the default 2 MiB stack.
    std::thread::spawn(|| {
        let (parser, program) = parse_source(&nested_ifs(63)).unwrap();
        assert!(!parser.has_errors(), "{}", parser.format_errors());
        assert_eq!(program.len(), 1);

        let (parser, _) = parse_source(&nested_ifs(64)).unwrap();
        assert_eq!(parser.errors()[0].get_error_name(), "NestingTooDeep");

        let parens = format!("{}1{}", "(".repeat(126), ")".repeat(126));
        let (parser, _) = parse_source(&parens).unwrap();
        assert!(!parser.has_errors(), "{}", parser.format_errors());
    })
    .join()
    .unwrap();
}

#[test]
fn test_clear_errors_and_reparse_is_idempotent() {
    let source = "var x\nfn :: end\n)\nvar y = 2";

    let (mut first, _) = parse(tokenize(source).unwrap());
    let first_messages = first.error_messages();
    assert!(!first_messages.is_empty());

    first.clear_errors();
    assert!(!first.has_errors());
    assert_eq!(first.format_errors(), "");

    let (second, _) = parse(tokenize(source).unwrap());
    let (third, _) = parse(tokenize(source).unwrap());
    assert_eq!(second.error_messages(), first_messages);
    assert_eq!(third.error_messages(), first_messages);
}

#[test]
fn test_format_errors_is_numbered() {
    let (parser, _) = parse_with_errors("var x\nvar = 1");

    let formatted = parser.format_errors();
    let lines = formatted.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1. line 2, column 1: expected Assignment"));
    assert!(lines[1].starts_with("2. line 2, column 5: expected Identifier"));
}

#[test]
fn test_comments_are_invisible_to_the_parser() {
    let program = parse_clean("// leading\nvar a = 1 // trailing\n// between\nvar b = a");
    assert_eq!(program.to_string(), "var a = 1\nvar b = a");
}

#[test]
fn test_empty_input() {
    let (parser, program) = parse(vec![]);
    assert!(!parser.has_errors());
    assert!(program.is_empty());

    let program = parse_clean("// only a comment");
    assert!(program.is_empty());
}

#[test]
fn test_canonical_text_round_trips() {
    let sources = [
        "var a, b: number = 1 + 2 * 3",
        "const GREETING = \"hi\\n\\\"there\\\"\"",
        "fn add(a: number, b: number) -> number :: return a + b end",
        "fn Point.len() :: return (self.x ^ 2 + self.y ^ 2) end",
        "fn double(x) :: return x * 2 where double(2) == 4 end",
        "struct Point :: x: number, y: number end",
        "type Table = Map<string, List<number>>",
        "module m :: var a = [1, 2, {k: \"v\"}] end",
        "using ui.widgets as w",
        "component C(n) :: var x = n @Row { @Text(value: \"#{x}\") } end",
        "if a and !b :: f() else if c :: g() else h() end",
        "case x :: 1 => \"one\" _ => \"other\" end",
        "for i, v in 0..=len(xs) :: if v > 2 :: break end end",
        "check \"label\" :: var a = 1 a == 1 ok(a) end",
        "map(xs, (x) :: x.name end)",
        "total += price * (1 - discount)",
        "\"Count: #{count}, next: #{count + 1}\"",
        "(a = 1) + 2",
        "var x = (a = 1)",
        "print(\"#{f(\\\"x\\\")}\")",
    ];

    for source in sources {
        let first = parse_clean(source);
        let text = first.to_string();
        let second = parse_clean(&text);

        let kinds = |program: &Program| program.iter().map(Stmt::get_stmt_type).collect::<Vec<_>>();
        assert_eq!(kinds(&first), kinds(&second), "{:?}", source);
        assert_eq!(second.to_string(), text, "{:?}", source);
    }
}
