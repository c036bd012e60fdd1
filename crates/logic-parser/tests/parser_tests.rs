//! Parser integration tests.
//!
//! Trees are rendered as an indented outline of node kinds (with names and
//! literal values inline) and compared against inline insta snapshots.

use std::fmt::Write;

use insta::assert_snapshot;
use logic_parser::ast::{
    Declaration, Expression, FunctionCallArgument, FunctionParameter, Literal, Statement,
    SyntaxNode,
};
use logic_parser::visit::{children, walk};
use logic_parser::{parse, parse_with_spans, Program};

// ── Helpers ────────────────────────────────────────────────────────────

fn outline(source: &str) -> String {
    let program = parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
    let mut out = String::new();
    render(SyntaxNode::Program(&program), 0, &mut out);
    out.trim_end().to_string()
}

fn render(node: SyntaxNode<'_>, depth: usize, out: &mut String) {
    let detail = match node {
        SyntaxNode::Pattern(p) => format!(" {}", p.name),
        SyntaxNode::Identifier(i) => format!(" {}", i.string),
        SyntaxNode::Literal(Literal::Number { value, .. }) => format!(" {value}"),
        SyntaxNode::Literal(Literal::Boolean { value, .. }) => format!(" {value}"),
        SyntaxNode::Literal(Literal::String { value, .. })
        | SyntaxNode::Literal(Literal::Color { value, .. }) => format!(" {value:?}"),
        SyntaxNode::Expression(Expression::BinaryExpression(b)) => format!(" {}", b.op.symbol()),
        SyntaxNode::Argument(FunctionCallArgument::Argument(a)) => a
            .label
            .as_ref()
            .map(|l| format!(" {l}:"))
            .unwrap_or_default(),
        SyntaxNode::FunctionParameter(FunctionParameter::Parameter(p)) => p
            .external_name
            .as_ref()
            .map(|l| format!(" {l}"))
            .unwrap_or_default(),
        _ => String::new(),
    };
    let _ = writeln!(out, "{}{}{}", "  ".repeat(depth), node.kind(), detail);
    for child in children(node) {
        render(child, depth + 1, out);
    }
}

fn parse_error(source: &str) -> String {
    match parse(source) {
        Ok(program) => panic!("expected a parse error, got {program:?}"),
        Err(err) => format!("{} @{}..{}", err.message, err.span.start, err.span.end),
    }
}

// ── Declarations ───────────────────────────────────────────────────────

#[test]
fn variable_with_number_literal() {
    assert_snapshot!(outline("let x: Number = 5"), @r###"
    program
      declaration
        variable
          pattern x
          typeIdentifier
            identifier Number
          literalExpression
            number 5
    "###);
}

#[test]
fn enumeration_cases_on_one_line() {
    assert_snapshot!(outline("enum Direction { case up, down }"), @r###"
    program
      declaration
        enumeration
          pattern Direction
          enumerationCase
            pattern up
          enumerationCase
            pattern down
    "###);
}

#[test]
fn generic_enumeration_with_associated_values() {
    assert_snapshot!(outline("enum Result<T> {\n  case ok(T)\n  case failed(String, Number)\n}"), @r###"
    program
      declaration
        enumeration
          pattern Result
          parameter
            pattern T
          enumerationCase
            pattern ok
            typeIdentifier
              identifier T
          enumerationCase
            pattern failed
            typeIdentifier
              identifier String
            typeIdentifier
              identifier Number
    "###);
}

#[test]
fn function_with_labels_and_default() {
    assert_snapshot!(
        outline("func add(_ a: Number, to b: Number = 1) -> Number {\n  return a\n}"),
        @r###"
    program
      declaration
        function
          pattern add
          typeIdentifier
            identifier Number
          parameter _
            pattern a
            typeIdentifier
              identifier Number
          parameter to
            pattern b
            typeIdentifier
              identifier Number
            literalExpression
              number 1
          returnStatement
            identifierExpression
              identifier a
    "###
    );
}

#[test]
fn function_without_return_type_returns_void() {
    let program = parse("func noop() {}").unwrap();
    let Some(Declaration::Function(f)) = program.declarations().next() else {
        panic!("expected a function");
    };
    assert!(f.return_type.is_void());
    assert!(f.block.is_empty());
}

#[test]
fn caseless_enum_is_namespace() {
    assert_snapshot!(
        outline("enum Colors {\n  static let primary: Color = #color(css: \"#FF0000\")\n}"),
        @r###"
    program
      declaration
        namespace
          pattern Colors
          variable
            pattern primary
            typeIdentifier
              identifier Color
            literalExpression
              color "#FF0000"
    "###
    );
}

#[test]
fn struct_with_optional_field() {
    assert_snapshot!(outline("struct Shadow { let color: Optional<Color>; let radius: Number = 0 }"), @r###"
    program
      declaration
        record
          pattern Shadow
          variable
            pattern color
            typeIdentifier
              identifier Optional
              typeIdentifier
                identifier Color
          variable
            pattern radius
            typeIdentifier
              identifier Number
            literalExpression
              number 0
    "###);
}

#[test]
fn function_type_annotation() {
    assert_snapshot!(outline("let f: (Number, Number) -> Boolean"), @r###"
    program
      declaration
        variable
          pattern f
          functionType
            typeIdentifier
              identifier Number
            typeIdentifier
              identifier Number
            typeIdentifier
              identifier Boolean
    "###);
}

#[test]
fn doc_comments_attach_to_next_declaration() {
    let program = parse("/// The brand color.\n/// Used everywhere.\nlet brand: Color").unwrap();
    let decl = program.declarations().next().unwrap();
    assert_eq!(
        decl.comment().map(|c| c.string()),
        Some("The brand color.\nUsed everywhere.")
    );
}

#[test]
fn plain_comments_are_ignored() {
    let program = parse("// nothing here\n/* or here */ let a: Number = 1 // trailing").unwrap();
    assert_eq!(program.declarations().count(), 1);
}

// ── Expressions ────────────────────────────────────────────────────────

#[test]
fn member_chain_call_with_labels() {
    assert_snapshot!(outline("let a: Shadow = Styles.shadow(radius: -1.5, \"x\")"), @r###"
    program
      declaration
        variable
          pattern a
          typeIdentifier
            identifier Shadow
          functionCallExpression
            memberExpression
              identifierExpression
                identifier Styles
              identifier shadow
            argument radius:
              literalExpression
                number -1.5
            argument
              literalExpression
                string "x"
    "###);
}

#[test]
fn statements_in_function_body() {
    assert_snapshot!(
        outline("func f(x: Number) -> Boolean {\n  let y: Number = x\n  if y >= 2 { y = 3 }\n  return true\n}"),
        @r###"
    program
      declaration
        function
          pattern f
          typeIdentifier
            identifier Boolean
          parameter
            pattern x
            typeIdentifier
              identifier Number
          declaration
            variable
              pattern y
              typeIdentifier
                identifier Number
              identifierExpression
                identifier x
          branch
            binaryExpression >=
              identifierExpression
                identifier y
              literalExpression
                number 2
            expression
              binaryExpression =
                identifierExpression
                  identifier y
                literalExpression
                  number 3
          returnStatement
            literalExpression
              boolean true
    "###
    );
}

#[test]
fn array_literal_with_trailing_comma() {
    assert_snapshot!(outline("let a: Array<Number> = [1, 2,]"), @r###"
    program
      declaration
        variable
          pattern a
          typeIdentifier
            identifier Array
            typeIdentifier
              identifier Number
          literalExpression
            array
              literalExpression
                number 1
              literalExpression
                number 2
    "###);
}

#[test]
fn string_escapes_are_decoded() {
    let program = parse(r#"let s: String = "a\"b\n\u{41}""#).unwrap();
    let Some(Declaration::Variable(v)) = program.declarations().next() else {
        panic!("expected a variable");
    };
    let Some(Expression::LiteralExpression(lit)) = &v.initializer else {
        panic!("expected a literal");
    };
    assert_eq!(
        lit.literal,
        Literal::String {
            id: lit.literal.id().clone(),
            value: "a\"b\nA".to_string()
        }
    );
}

// ── Optional.value unwrap ──────────────────────────────────────────────

/// `Optional.value(x)` in argument position is replaced by `x`.
#[test]
fn optional_value_argument_is_unwrapped() {
    let program =
        parse(r##"let s: Shadow = Shadow(color: Optional.value(#color(css: "#FF0000")))"##)
            .unwrap();

    let mut argument_kinds = Vec::new();
    walk(SyntaxNode::Program(&program), &mut |node| {
        if let SyntaxNode::Argument(FunctionCallArgument::Argument(arg)) = node {
            if let Expression::LiteralExpression(lit) = &arg.expression {
                if let Literal::Color { value, .. } = &lit.literal {
                    argument_kinds.push(value.clone());
                }
            } else {
                argument_kinds.push(arg.expression.kind().to_string());
            }
        }
    });

    assert_eq!(argument_kinds, vec!["#FF0000".to_string()]);
}

// ── Errors ─────────────────────────────────────────────────────────────

#[test]
fn missing_type_after_colon() {
    assert_snapshot!(parse_error("let a: = 1"), @"expected type, found `=` @7..8");
}

#[test]
fn chained_comparison_is_rejected() {
    assert_snapshot!(parse_error("let a: Boolean = 1 < 2 < 3"), @"comparison operators cannot be chained @23..24");
}

#[test]
fn unclosed_struct_points_at_opening_brace() {
    let err = parse("struct A {\n  let a: Number\n").unwrap_err();
    assert_eq!(err.message, "expected `}` to close struct body, found end of file");
    let (msg, span) = err.related.unwrap();
    assert_eq!(msg, "struct body opened here");
    assert_eq!(span.start, 9);
}

#[test]
fn cases_mixed_with_declarations() {
    let err = parse("enum A { case a\n let b: Number }").unwrap_err();
    assert_eq!(err.message, "enum cases cannot be mixed with other declarations");
}

#[test]
fn lexer_errors_become_parse_errors() {
    assert_snapshot!(parse_error("let a: String = \"open"), @"unterminated string literal @16..21");
}

#[test]
fn number_literal_out_of_range() {
    assert_snapshot!(parse_error("let x: Number = 1e400"), @"number literal out of range: 1e400 @16..21");
}

#[test]
fn deep_nesting_is_an_error() {
    let depth = 3000;
    let source = format!(
        "let x: Array<Number> = {}{}",
        "[".repeat(depth),
        "]".repeat(depth)
    );
    let err = parse(&source).unwrap_err();
    assert_eq!(err.message, "nesting is too deep (the limit is 64 levels)");

    let annotation = format!("let x: {}Number{}", "Array<".repeat(depth), ">".repeat(depth));
    assert!(parse(&annotation).is_err());

    let blocks = format!(
        "func f() -> Number {{\n{}return 1\n{}}}",
        "if true {\n".repeat(depth),
        "}\n".repeat(depth)
    );
    assert!(parse(&blocks).is_err());
}

#[test]
fn moderate_nesting_parses() {
    let source = format!(
        "let x: Array<Number> = {}1{}",
        "[".repeat(20),
        "]".repeat(20)
    );
    assert!(parse(&source).is_ok());
}

#[test]
fn invalid_color_literal() {
    assert_snapshot!(parse_error("let c: Color = #rgb(1)"), @"expected `color` after `#`, found identifier @16..19");
}

// ── Spans and ids ──────────────────────────────────────────────────────

#[test]
fn spans_are_recorded_for_references() {
    let source = "let x: Number = y";
    let parsed = parse_with_spans(source).unwrap();
    let Some(Declaration::Variable(v)) = parsed.program.declarations().next() else {
        panic!("expected a variable");
    };
    let init = v.initializer.as_ref().unwrap();
    let span = parsed.source_map.get(init.id()).unwrap();
    assert_eq!(&source[span.to_range()], "y");
    let decl_span = parsed
        .source_map
        .get(parsed.program.declarations().next().unwrap().id())
        .unwrap();
    assert_eq!(&source[decl_span.to_range()], source);
}

#[test]
fn node_ids_are_unique() {
    let program = parse("enum E { case a, b }\nlet x: E = E.a\nfunc f() { return x }").unwrap();
    let ids = program.ids();
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn find_returns_node_by_id() {
    let program = parse("let a: Number = 1\nlet b: Number = a").unwrap();
    let Some(Statement::Declaration { content, .. }) = program.block.get(1) else {
        panic!("expected a declaration");
    };
    let found = program.find(content.id()).unwrap();
    assert_eq!(found.kind(), "variable");
    assert!(program.find(&logic_parser::NodeId::new("missing")).is_none());
}

#[test]
fn semicolons_are_optional() {
    let with = parse("let a: Number = 1; let b: Number = 2;").unwrap();
    let without = parse("let a: Number = 1 let b: Number = 2").unwrap();
    assert_eq!(with.declarations().count(), 2);
    assert_eq!(without.declarations().count(), 2);
}

#[test]
fn empty_source_is_empty_program() {
    let program: Program = parse("  \n// only a comment\n").unwrap();
    assert!(program.block.is_empty());
}
