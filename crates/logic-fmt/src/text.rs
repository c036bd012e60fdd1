//! Text printer: AST to Swift-like Logic source.
//!
//! Every printable node implements [`ToDoc`], producing a [`FormatIR`]
//! document that [`crate::printer::render`] lays out. Placeholders produce
//! [`FormatIR::Empty`] and are dropped from lists before joining, so they
//! never leave blank lines behind.

use logic_parser::ast::{
    Argument, Comment, Declaration, EnumCase, Expression, FunctionCallArgument,
    FunctionDeclaration, GenericParameter, Literal, Parameter, Program, Statement,
    TypeAnnotation,
};

use crate::ir::{concat, delimited, hardline, indent, join, text, FormatIR};
use crate::printer::{render, PrintOptions};

/// A node that can be printed as Logic source.
pub trait ToDoc {
    fn to_doc(&self) -> FormatIR;
}

/// Print any node. Programs end with a newline; other nodes do not.
pub fn print<N: ToDoc + ?Sized>(node: &N, options: &PrintOptions) -> String {
    render(&node.to_doc(), options)
}

impl ToDoc for Program {
    fn to_doc(&self) -> FormatIR {
        let items: Vec<FormatIR> = self
            .block
            .iter()
            .filter(|s| !s.is_placeholder())
            .map(ToDoc::to_doc)
            .collect();
        if items.is_empty() {
            return FormatIR::Empty;
        }
        concat(vec![join(items, || concat(vec![hardline(), hardline()])), hardline()])
    }
}

impl ToDoc for Statement {
    fn to_doc(&self) -> FormatIR {
        match self {
            Statement::Branch {
                condition, block, ..
            } => concat(vec![text("if "), condition.to_doc(), statement_block(block)]),
            Statement::Declaration { content, .. } => declaration(content, false),
            Statement::Expression { expression, .. } => expression.to_doc(),
            Statement::ReturnStatement { expression, .. } => match expression {
                Some(e) => concat(vec![text("return "), e.to_doc()]),
                None => text("return"),
            },
            Statement::Placeholder { .. } => FormatIR::Empty,
        }
    }
}

impl ToDoc for Declaration {
    fn to_doc(&self) -> FormatIR {
        declaration(self, false)
    }
}

impl ToDoc for Expression {
    fn to_doc(&self) -> FormatIR {
        match self {
            Expression::IdentifierExpression(e) => identifier(&e.identifier),
            Expression::MemberExpression(e) => concat(vec![
                e.expression.to_doc(),
                text("."),
                identifier(&e.member_name),
            ]),
            Expression::FunctionCallExpression(e) => {
                let arguments = e
                    .arguments
                    .iter()
                    .filter_map(|a| match a {
                        FunctionCallArgument::Argument(a) => Some(argument(a)),
                        FunctionCallArgument::Placeholder(_) => None,
                    })
                    .collect();
                concat(vec![e.expression.to_doc(), delimited("(", arguments, ")")])
            }
            Expression::BinaryExpression(e) => concat(vec![
                e.left.to_doc(),
                text(format!(" {} ", e.op.symbol())),
                e.right.to_doc(),
            ]),
            Expression::LiteralExpression(e) => e.literal.to_doc(),
            Expression::Placeholder(_) => FormatIR::Empty,
        }
    }
}

impl ToDoc for Literal {
    fn to_doc(&self) -> FormatIR {
        match self {
            Literal::Boolean { value, .. } => text(value.to_string()),
            Literal::Number { value, .. } => text(number(*value)),
            Literal::String { value, .. } => text(logic_lexer::escape(value)),
            Literal::Color { value, .. } => {
                text(format!("#color(css: {})", logic_lexer::escape(value)))
            }
            Literal::Array { value, .. } => {
                let items = value
                    .iter()
                    .filter(|e| !matches!(e, Expression::Placeholder(_)))
                    .map(ToDoc::to_doc)
                    .collect();
                delimited("[", items, "]")
            }
        }
    }
}

impl ToDoc for TypeAnnotation {
    fn to_doc(&self) -> FormatIR {
        text(type_string(self))
    }
}

/// `Name<A, B>` or `(A, B) -> R`. Placeholders are empty.
pub fn type_string(annotation: &TypeAnnotation) -> String {
    match annotation {
        TypeAnnotation::TypeIdentifier {
            identifier,
            generic_arguments,
            ..
        } => {
            let arguments = type_list(generic_arguments);
            if arguments.is_empty() {
                identifier.string.clone()
            } else {
                format!("{}<{}>", identifier.string, arguments.join(", "))
            }
        }
        TypeAnnotation::FunctionType {
            return_type,
            argument_types,
            ..
        } => format!(
            "({}) -> {}",
            type_list(argument_types).join(", "),
            type_string(return_type)
        ),
        TypeAnnotation::Placeholder { .. } => String::new(),
    }
}

fn type_list(annotations: &[TypeAnnotation]) -> Vec<String> {
    annotations
        .iter()
        .filter(|a| !matches!(a, TypeAnnotation::Placeholder { .. }))
        .map(type_string)
        .collect()
}

/// Whole numbers print without a fractional part.
fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn identifier(identifier: &logic_parser::ast::Identifier) -> FormatIR {
    if identifier.is_placeholder {
        FormatIR::Empty
    } else {
        text(identifier.string.as_str())
    }
}

fn argument(argument: &Argument) -> FormatIR {
    match &argument.label {
        Some(label) => concat(vec![text(format!("{}: ", label)), argument.expression.to_doc()]),
        None => argument.expression.to_doc(),
    }
}

// ── Declarations ─────────────────────────────────────────────────────────

/// `member` declarations sit inside a namespace or record and get `static `.
fn declaration(declaration: &Declaration, member: bool) -> FormatIR {
    let head = match declaration {
        Declaration::Placeholder(_) => return FormatIR::Empty,
        Declaration::ImportDeclaration(d) => text(format!("import {}", d.name.name)),
        Declaration::Variable(d) => {
            let mut parts = vec![text(format!("let {}", d.name.name))];
            if let Some(annotation) = &d.annotation {
                parts.push(text(format!(": {}", type_string(annotation))));
            }
            if let Some(initializer) = &d.initializer {
                parts.push(text(" = "));
                parts.push(initializer.to_doc());
            }
            concat(parts)
        }
        Declaration::Function(d) => function(d),
        Declaration::Enumeration(d) => {
            let cases: Vec<FormatIR> = d.cases().map(case).collect();
            concat(vec![
                text(format!(
                    "enum {}{}",
                    d.name.name,
                    generics(&d.generic_parameters)
                )),
                braced(cases),
            ])
        }
        Declaration::Record(d) => concat(vec![
            text(format!(
                "struct {}{}",
                d.name.name,
                generics(&d.generic_parameters)
            )),
            members(&d.declarations),
        ]),
        Declaration::Namespace(d) => concat(vec![
            text(format!("enum {}", d.name.name)),
            members(&d.declarations),
        ]),
    };

    let head = if member {
        concat(vec![text("static "), head])
    } else {
        head
    };
    with_comment(declaration.comment(), head)
}

fn function(d: &FunctionDeclaration) -> FormatIR {
    let parameters = d.parameters().map(parameter).collect();
    let mut parts = vec![
        text(format!(
            "func {}{}",
            d.name.name,
            generics(&d.generic_parameters)
        )),
        delimited("(", parameters, ")"),
    ];
    if !d.return_type.is_void() {
        parts.push(text(format!(" -> {}", type_string(&d.return_type))));
    }
    parts.push(statement_block(&d.block));
    concat(parts)
}

fn parameter(parameter: &Parameter) -> FormatIR {
    let mut head = match &parameter.external_name {
        Some(label) => format!("{} {}", label, parameter.local_name.name),
        None => parameter.local_name.name.clone(),
    };
    head.push_str(": ");
    head.push_str(&type_string(&parameter.annotation));

    let mut parts = vec![text(head)];
    if let Some(default) = parameter.default_value.expression() {
        parts.push(text(" = "));
        parts.push(default.to_doc());
    }
    with_comment(parameter.comment.as_ref(), concat(parts))
}

fn case(case: &EnumCase) -> FormatIR {
    let types = type_list(&case.associated_value_types);
    let line = if types.is_empty() {
        format!("case {}", case.name.name)
    } else {
        format!("case {}({})", case.name.name, types.join(", "))
    };
    with_comment(case.comment.as_ref(), text(line))
}

fn generics(params: &[GenericParameter]) -> String {
    let names = logic_parser::ast::generic_names(params);
    if names.is_empty() {
        String::new()
    } else {
        format!("<{}>", names.join(", "))
    }
}

fn members(declarations: &[Declaration]) -> FormatIR {
    braced(
        declarations
            .iter()
            .filter(|d| !d.is_placeholder())
            .map(|d| declaration(d, true))
            .collect(),
    )
}

fn statement_block(block: &[Statement]) -> FormatIR {
    braced(
        block
            .iter()
            .filter(|s| !s.is_placeholder())
            .map(ToDoc::to_doc)
            .collect(),
    )
}

/// ` {` items one per line `}`, or ` {}` when empty.
fn braced(items: Vec<FormatIR>) -> FormatIR {
    if items.is_empty() {
        return text(" {}");
    }
    concat(vec![
        text(" {"),
        indent(concat(vec![hardline(), join(items, hardline)])),
        hardline(),
        text("}"),
    ])
}

/// Prefix `doc` with `/// ` lines for `comment`.
fn with_comment(comment: Option<&Comment>, doc: FormatIR) -> FormatIR {
    let Some(comment) = comment else {
        return doc;
    };
    let mut parts = Vec::new();
    for line in comment.string().lines() {
        if line.is_empty() {
            parts.push(text("///"));
        } else {
            parts.push(text(format!("/// {}", line)));
        }
        parts.push(hardline());
    }
    parts.push(doc);
    concat(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use logic_parser::ast::{Identifier, Placeholder};

    #[test]
    fn whole_numbers_have_no_fraction() {
        assert_eq!(number(5.0), "5");
        assert_eq!(number(-3.0), "-3");
        assert_eq!(number(1.5), "1.5");
    }

    #[test]
    fn type_strings() {
        let optional = TypeAnnotation::named("Optional", vec![TypeAnnotation::named("Color", vec![])]);
        assert_eq!(type_string(&optional), "Optional<Color>");

        let function = TypeAnnotation::FunctionType {
            id: logic_parser::NodeId::fresh(),
            return_type: Box::new(TypeAnnotation::named("Boolean", vec![])),
            argument_types: vec![
                TypeAnnotation::named("Number", vec![]),
                TypeAnnotation::Placeholder {
                    id: logic_parser::NodeId::fresh(),
                },
            ],
        };
        assert_eq!(type_string(&function), "(Number) -> Boolean");
    }

    #[test]
    fn placeholder_expressions_print_nothing() {
        let call = Expression::FunctionCallExpression(logic_parser::ast::FunctionCallExpression {
            id: logic_parser::NodeId::fresh(),
            expression: Box::new(Expression::identifier("f")),
            arguments: vec![
                FunctionCallArgument::Placeholder(Placeholder::new()),
                FunctionCallArgument::Argument(Argument::new(
                    Some("x".into()),
                    Expression::literal(Literal::Boolean {
                        id: logic_parser::NodeId::fresh(),
                        value: true,
                    }),
                )),
            ],
        });
        assert_eq!(print(&call, &PrintOptions::default()), "f(x: true)");

        let mut hole = Identifier::new("");
        hole.is_placeholder = true;
        let member = Expression::MemberExpression(logic_parser::ast::MemberExpression {
            id: logic_parser::NodeId::fresh(),
            expression: Box::new(Expression::identifier("a")),
            member_name: hole,
        });
        assert_eq!(print(&member, &PrintOptions::default()), "a.");
    }

    #[test]
    fn empty_program_prints_nothing() {
        let program = Program::new(vec![Statement::Placeholder {
            id: logic_parser::NodeId::fresh(),
        }]);
        assert_eq!(print(&program, &PrintOptions::default()), "");
    }
}
