//! AST <-> element tree mapping.
//!
//! Statement-level declarations are `Declaration.<Kind>` elements; the same
//! declarations nested in a namespace or record use the bare `<Kind>`.
//! Type annotations travel as attribute strings: `Optional(Color)`,
//! `(Number,Number)->Boolean`.

use logic_lexer::Cursor;
use logic_parser::ast::{
    Argument, BinaryExpression, Comment, Declaration, DefaultValue, EnumCase, EnumerationCase,
    EnumerationDeclaration, Expression, FunctionCallArgument, FunctionCallExpression,
    FunctionDeclaration, FunctionParameter, GenericParameter, GenericParameterData, Identifier,
    IdentifierExpression, ImportDeclaration, Literal, MemberExpression, NamespaceDeclaration,
    NodeId, Parameter, Pattern, Placeholder, Program, RecordDeclaration, Statement,
    TypeAnnotation, VariableDeclaration,
};

use super::{Element, XmlError};

const DECLARATION_PREFIX: &str = "Declaration.";

// ── Encoding ─────────────────────────────────────────────────────────────

pub(super) fn program(program: &Program) -> Element {
    let mut root = Element::new("Program");
    root.children = program.block.iter().filter_map(statement).collect();
    root
}

fn statement(statement: &Statement) -> Option<Element> {
    let element = match statement {
        Statement::Branch {
            condition, block, ..
        } => {
            let mut element = Element::new("Branch").child(expression(condition));
            element.children.extend(block.iter().filter_map(self::statement));
            element
        }
        Statement::Declaration { content, .. } => return declaration(content, true),
        Statement::Expression { expression: e, .. } => {
            Element::new("Expression").child(expression(e))
        }
        Statement::ReturnStatement { expression: e, .. } => {
            let element = Element::new("ReturnStatement");
            match e {
                Some(e) => element.child(expression(e)),
                None => element,
            }
        }
        Statement::Placeholder { .. } => return None,
    };
    Some(element)
}

fn declaration(declaration: &Declaration, in_statement: bool) -> Option<Element> {
    let tag = match declaration {
        Declaration::Placeholder(_) => return None,
        Declaration::ImportDeclaration(_) => "ImportDeclaration",
        Declaration::Variable(_) => "Variable",
        Declaration::Function(_) => "Function",
        Declaration::Enumeration(_) => "Enumeration",
        Declaration::Record(_) => "Record",
        Declaration::Namespace(_) => "Namespace",
    };
    let name = if in_statement {
        format!("{}{}", DECLARATION_PREFIX, tag)
    } else {
        tag.to_string()
    };

    let mut element = Element::new(name);
    if let Some(pattern) = declaration.name() {
        element = element.attr("name", pattern.name.as_str());
    }

    match declaration {
        Declaration::Variable(d) => {
            if let Some(annotation) = &d.annotation {
                element = element.attr("type", type_string(annotation));
            }
            match d.initializer.as_ref().and_then(|e| compact_value(e, d.annotation.as_ref())) {
                Some(value) => element = element.attr("value", value),
                None => {
                    if let Some(initializer) = &d.initializer {
                        element = element.child(expression(initializer));
                    }
                }
            }
        }
        Declaration::Function(d) => {
            if !d.return_type.is_void() {
                element = element.attr("returnType", type_string(&d.return_type));
            }
            element = generics(element, &d.generic_parameters);
            element
                .children
                .extend(d.parameters().map(parameter));
            element
                .children
                .extend(d.block.iter().filter_map(statement));
        }
        Declaration::Enumeration(d) => {
            element = generics(element, &d.generic_parameters);
            element.children.extend(d.cases().map(case));
        }
        Declaration::Record(d) => {
            element = generics(element, &d.generic_parameters);
            element.children.extend(members(&d.declarations));
        }
        Declaration::Namespace(d) => {
            element.children.extend(members(&d.declarations));
        }
        Declaration::ImportDeclaration(_) | Declaration::Placeholder(_) => {}
    }

    Some(with_comment(element, declaration.comment()))
}

fn members(declarations: &[Declaration]) -> Vec<Element> {
    declarations
        .iter()
        .filter_map(|d| declaration(d, false))
        .collect()
}

fn generics(element: Element, params: &[GenericParameter]) -> Element {
    let names = logic_parser::ast::generic_names(params);
    if names.is_empty() {
        element
    } else {
        element.attr("genericParameters", names.join(","))
    }
}

fn with_comment(element: Element, comment: Option<&Comment>) -> Element {
    match comment {
        Some(comment) => element.attr("comment", comment.string()),
        None => element,
    }
}

fn parameter(parameter: &Parameter) -> Element {
    let mut element = Element::new("Parameter");
    if let Some(label) = &parameter.external_name {
        element = element.attr("label", label.as_str());
    }
    element = element
        .attr("name", parameter.local_name.name.as_str())
        .attr("type", type_string(&parameter.annotation));
    element = with_comment(element, parameter.comment.as_ref());
    match parameter.default_value.expression() {
        Some(default) => element.child(expression(default)),
        None => element,
    }
}

fn case(case: &EnumCase) -> Element {
    let mut element = Element::new("Case").attr("name", case.name.name.as_str());
    let types: Vec<String> = case
        .associated_value_types
        .iter()
        .filter(|t| !matches!(t, TypeAnnotation::Placeholder { .. }))
        .map(type_string)
        .collect();
    if !types.is_empty() {
        element = element.attr("associatedValues", types.join(","));
    }
    with_comment(element, case.comment.as_ref())
}

/// The `value` attribute for a scalar literal of the annotated type.
fn compact_value(initializer: &Expression, annotation: Option<&TypeAnnotation>) -> Option<String> {
    let Expression::LiteralExpression(e) = initializer else {
        return None;
    };
    let annotation = annotation?;
    let TypeAnnotation::TypeIdentifier {
        generic_arguments, ..
    } = annotation
    else {
        return None;
    };
    if !generic_arguments.is_empty() || e.literal.scalar_type_name() != annotation.name() {
        return None;
    }
    match &e.literal {
        Literal::Boolean { value, .. } => Some(value.to_string()),
        Literal::Number { value, .. } => Some(number(*value)),
        Literal::String { value, .. } | Literal::Color { value, .. } => Some(value.clone()),
        Literal::Array { .. } => None,
    }
}

/// Expressions in required slots always produce an element; a placeholder
/// there is written as `<Placeholder/>`.
fn expression(expression: &Expression) -> Element {
    match expression {
        Expression::IdentifierExpression(e) => {
            Element::new("IdentifierExpression").attr("name", e.identifier.string.as_str())
        }
        Expression::MemberExpression(e) => Element::new("MemberExpression")
            .attr("name", e.member_name.string.as_str())
            .child(self::expression(&e.expression)),
        Expression::FunctionCallExpression(e) => {
            let mut element =
                Element::new("FunctionCallExpression").child(self::expression(&e.expression));
            for argument in e.arguments() {
                let mut child = Element::new("Argument");
                if let Some(label) = &argument.label {
                    child = child.attr("label", label.as_str());
                }
                element = element.child(child.child(self::expression(&argument.expression)));
            }
            element
        }
        Expression::BinaryExpression(e) => Element::new("BinaryExpression")
            .attr("operator", e.op.tag())
            .child(self::expression(&e.left))
            .child(self::expression(&e.right)),
        Expression::LiteralExpression(e) => literal(&e.literal),
        Expression::Placeholder(_) => Element::new("Placeholder"),
    }
}

fn literal(literal: &Literal) -> Element {
    let element = Element::new("Literal");
    match literal {
        Literal::Boolean { value, .. } => element.attr("type", "Boolean").attr("value", value.to_string()),
        Literal::Number { value, .. } => element.attr("type", "Number").attr("value", number(*value)),
        Literal::String { value, .. } => element.attr("type", "String").attr("value", value.as_str()),
        Literal::Color { value, .. } => element.attr("type", "Color").attr("value", value.as_str()),
        Literal::Array { value, .. } => {
            let mut element = element.attr("type", "Array");
            element.children = value
                .iter()
                .filter(|e| !matches!(e, Expression::Placeholder(_)))
                .map(expression)
                .collect();
            element
        }
    }
}

fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// `Name(A,B)` or `(A,B)->R`. Placeholders are empty.
pub(super) fn type_string(annotation: &TypeAnnotation) -> String {
    match annotation {
        TypeAnnotation::TypeIdentifier {
            identifier,
            generic_arguments,
            ..
        } => {
            let arguments = type_strings(generic_arguments);
            if arguments.is_empty() {
                identifier.string.clone()
            } else {
                format!("{}({})", identifier.string, arguments.join(","))
            }
        }
        TypeAnnotation::FunctionType {
            return_type,
            argument_types,
            ..
        } => format!(
            "({})->{}",
            type_strings(argument_types).join(","),
            type_string(return_type)
        ),
        TypeAnnotation::Placeholder { .. } => String::new(),
    }
}

fn type_strings(annotations: &[TypeAnnotation]) -> Vec<String> {
    annotations
        .iter()
        .filter(|a| !matches!(a, TypeAnnotation::Placeholder { .. }))
        .map(type_string)
        .collect()
}

// ── Decoding ─────────────────────────────────────────────────────────────

pub(super) fn to_program(root: &Element) -> Result<Program, XmlError> {
    match root.name.as_str() {
        "Program" => {
            let block = root
                .children
                .iter()
                .map(to_statement)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Program::new(block))
        }
        "Declarations" => {
            let declarations = root
                .children
                .iter()
                .map(|c| to_declaration(c, c.name.strip_prefix(DECLARATION_PREFIX).unwrap_or(&c.name)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Program::from_declarations(declarations))
        }
        other => Err(XmlError::new(
            format!("expected a <Program> or <Declarations> root, found <{}>", other),
            root.offset,
        )),
    }
}

fn unexpected(element: &Element, what: &str) -> XmlError {
    XmlError::new(
        format!("unexpected <{}>, expected {}", element.name, what),
        element.offset,
    )
}

fn to_statement(element: &Element) -> Result<Statement, XmlError> {
    if let Some(kind) = element.name.strip_prefix(DECLARATION_PREFIX) {
        return Ok(Statement::declaration(to_declaration(element, kind)?));
    }
    let id = NodeId::fresh();
    match element.name.as_str() {
        "Branch" => {
            let (condition, block) = element
                .children
                .split_first()
                .ok_or_else(|| XmlError::new("<Branch> needs a condition", element.offset))?;
            Ok(Statement::Branch {
                id,
                condition: to_expression(condition)?,
                block: block.iter().map(to_statement).collect::<Result<_, _>>()?,
            })
        }
        "Expression" => Ok(Statement::Expression {
            id,
            expression: to_expression(only_child(element)?)?,
        }),
        "ReturnStatement" => Ok(Statement::ReturnStatement {
            id,
            expression: element.children.first().map(to_expression).transpose()?,
        }),
        _ => Err(unexpected(element, "a statement")),
    }
}

fn only_child(element: &Element) -> Result<&Element, XmlError> {
    match element.children.as_slice() {
        [child] => Ok(child),
        _ => Err(XmlError::new(
            format!("<{}> needs exactly one child", element.name),
            element.offset,
        )),
    }
}

fn to_comment(element: &Element) -> Option<Comment> {
    element.get("comment").map(Comment::new)
}

fn to_pattern(element: &Element) -> Result<Pattern, XmlError> {
    Ok(Pattern::new(element.require("name")?))
}

fn to_declaration(element: &Element, kind: &str) -> Result<Declaration, XmlError> {
    let id = NodeId::fresh();
    let declaration = match kind {
        "ImportDeclaration" => Declaration::ImportDeclaration(ImportDeclaration {
            id,
            name: to_pattern(element)?,
        }),
        "Variable" => {
            let annotation = element
                .get("type")
                .map(|t| parse_type(t, element.offset))
                .transpose()?;
            let initializer = match element.get("value") {
                Some(value) => Some(compact_literal(element, value, annotation.as_ref())?),
                None => element.children.first().map(to_expression).transpose()?,
            };
            Declaration::Variable(VariableDeclaration {
                id,
                name: to_pattern(element)?,
                annotation,
                initializer,
                comment: to_comment(element),
            })
        }
        "Function" => {
            let return_type = match element.get("returnType") {
                Some(t) => parse_type(t, element.offset)?,
                None => TypeAnnotation::void(),
            };
            let mut parameters = Vec::new();
            let mut block = Vec::new();
            for child in &element.children {
                if child.name == "Parameter" {
                    parameters.push(FunctionParameter::Parameter(to_parameter(child)?));
                } else {
                    block.push(to_statement(child)?);
                }
            }
            Declaration::Function(FunctionDeclaration {
                id,
                name: to_pattern(element)?,
                return_type,
                generic_parameters: to_generics(element),
                parameters,
                block,
                comment: to_comment(element),
            })
        }
        "Enumeration" => {
            let cases = element
                .children
                .iter()
                .map(|c| to_case(c).map(EnumerationCase::EnumerationCase))
                .collect::<Result<_, _>>()?;
            Declaration::Enumeration(EnumerationDeclaration {
                id,
                name: to_pattern(element)?,
                generic_parameters: to_generics(element),
                cases,
                comment: to_comment(element),
            })
        }
        "Record" => Declaration::Record(RecordDeclaration {
            id,
            name: to_pattern(element)?,
            generic_parameters: to_generics(element),
            declarations: to_members(element)?,
            comment: to_comment(element),
        }),
        "Namespace" => Declaration::Namespace(NamespaceDeclaration {
            id,
            name: to_pattern(element)?,
            declarations: to_members(element)?,
            comment: to_comment(element),
        }),
        _ => return Err(unexpected(element, "a declaration")),
    };
    Ok(declaration)
}

fn to_members(element: &Element) -> Result<Vec<Declaration>, XmlError> {
    element
        .children
        .iter()
        .map(|c| to_declaration(c, &c.name))
        .collect()
}

fn to_generics(element: &Element) -> Vec<GenericParameter> {
    element
        .get("genericParameters")
        .map(|names| {
            names
                .split(',')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(|n| {
                    GenericParameter::Parameter(GenericParameterData {
                        id: NodeId::fresh(),
                        name: Pattern::new(n),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn to_parameter(element: &Element) -> Result<Parameter, XmlError> {
    let default_value = match element.children.first() {
        Some(child) => DefaultValue::Value {
            id: NodeId::fresh(),
            expression: to_expression(child)?,
        },
        None => DefaultValue::none(),
    };
    Ok(Parameter {
        id: NodeId::fresh(),
        external_name: element.get("label").map(str::to_string),
        local_name: to_pattern(element)?,
        annotation: parse_type(element.require("type")?, element.offset)?,
        default_value,
        comment: to_comment(element),
    })
}

fn to_case(element: &Element) -> Result<EnumCase, XmlError> {
    if element.name != "Case" {
        return Err(unexpected(element, "<Case>"));
    }
    let associated_value_types = match element.get("associatedValues") {
        Some(types) => parse_type_list(types, element.offset)?,
        None => Vec::new(),
    };
    Ok(EnumCase {
        id: NodeId::fresh(),
        name: to_pattern(element)?,
        associated_value_types,
        comment: to_comment(element),
    })
}

fn compact_literal(
    element: &Element,
    value: &str,
    annotation: Option<&TypeAnnotation>,
) -> Result<Expression, XmlError> {
    let kind = annotation.and_then(TypeAnnotation::name).ok_or_else(|| {
        XmlError::new(
            format!("<{}> has a `value` but no scalar `type`", element.name),
            element.offset,
        )
    })?;
    Ok(Expression::literal(scalar_literal(element, kind, value)?))
}

fn scalar_literal(element: &Element, kind: &str, value: &str) -> Result<Literal, XmlError> {
    let id = NodeId::fresh();
    let invalid = || {
        XmlError::new(
            format!("invalid {} value `{}`", kind, value),
            element.offset,
        )
    };
    let literal = match kind {
        "Boolean" => Literal::Boolean {
            id,
            value: value.parse().map_err(|_| invalid())?,
        },
        "Number" => Literal::Number {
            id,
            value: value
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(invalid)?,
        },
        "String" => Literal::String {
            id,
            value: value.to_string(),
        },
        "Color" => Literal::Color {
            id,
            value: value.to_string(),
        },
        _ => {
            return Err(XmlError::new(
                format!("`{}` has no literal form", kind),
                element.offset,
            ))
        }
    };
    Ok(literal)
}

fn to_expression(element: &Element) -> Result<Expression, XmlError> {
    let id = NodeId::fresh();
    let expression = match element.name.as_str() {
        "IdentifierExpression" => Expression::IdentifierExpression(IdentifierExpression {
            id,
            identifier: Identifier::new(element.require("name")?),
        }),
        "MemberExpression" => Expression::MemberExpression(MemberExpression {
            id,
            expression: Box::new(to_expression(only_child(element)?)?),
            member_name: Identifier::new(element.require("name")?),
        }),
        "FunctionCallExpression" => {
            let (callee, arguments) = element.children.split_first().ok_or_else(|| {
                XmlError::new("<FunctionCallExpression> needs a callee", element.offset)
            })?;
            let arguments = arguments
                .iter()
                .map(|a| {
                    if a.name != "Argument" {
                        return Err(unexpected(a, "<Argument>"));
                    }
                    Ok(FunctionCallArgument::Argument(Argument::new(
                        a.get("label").map(str::to_string),
                        to_expression(only_child(a)?)?,
                    )))
                })
                .collect::<Result<_, _>>()?;
            Expression::FunctionCallExpression(FunctionCallExpression {
                id,
                expression: Box::new(to_expression(callee)?),
                arguments,
            })
        }
        "BinaryExpression" => {
            let operator = element.require("operator")?;
            let op = logic_parser::ast::BinaryOperator::from_tag(operator).ok_or_else(|| {
                XmlError::new(format!("unknown operator `{}`", operator), element.offset)
            })?;
            let [left, right] = element.children.as_slice() else {
                return Err(XmlError::new(
                    "<BinaryExpression> needs two operands",
                    element.offset,
                ));
            };
            let binary = BinaryExpression {
                id,
                left: Box::new(to_expression(left)?),
                right: Box::new(to_expression(right)?),
                op,
            };
            if let Some(message) = binary.nesting_error() {
                return Err(XmlError::new(message, element.offset));
            }
            Expression::BinaryExpression(binary)
        }
        "Literal" => {
            let kind = element.require("type")?;
            let literal = if kind == "Array" {
                Literal::Array {
                    id: NodeId::fresh(),
                    value: element
                        .children
                        .iter()
                        .map(to_expression)
                        .collect::<Result<_, _>>()?,
                }
            } else {
                scalar_literal(element, kind, element.require("value")?)?
            };
            Expression::literal(literal)
        }
        "Placeholder" => Expression::Placeholder(Placeholder { id }),
        _ => return Err(unexpected(element, "an expression")),
    };
    Ok(expression)
}

// ── Type annotation strings ──────────────────────────────────────────────

fn parse_type(source: &str, offset: usize) -> Result<TypeAnnotation, XmlError> {
    if source.trim().is_empty() {
        return Ok(TypeAnnotation::Placeholder { id: NodeId::fresh() });
    }
    let mut cursor = Cursor::new(source);
    let annotation = type_annotation(&mut cursor);
    cursor.eat_while(char::is_whitespace);
    match annotation {
        Ok(annotation) if cursor.is_eof() => Ok(annotation),
        _ => Err(XmlError::new(format!("invalid type `{}`", source), offset)),
    }
}

fn parse_type_list(source: &str, offset: usize) -> Result<Vec<TypeAnnotation>, XmlError> {
    let mut cursor = Cursor::new(source);
    let mut types = Vec::new();
    loop {
        match type_annotation(&mut cursor) {
            Ok(t) => types.push(t),
            Err(()) => return Err(XmlError::new(format!("invalid type list `{}`", source), offset)),
        }
        cursor.eat_while(char::is_whitespace);
        if cursor.is_eof() {
            return Ok(types);
        }
        if !cursor.eat(',') {
            return Err(XmlError::new(format!("invalid type list `{}`", source), offset));
        }
    }
}

fn type_annotation(cursor: &mut Cursor) -> Result<TypeAnnotation, ()> {
    cursor.eat_while(char::is_whitespace);
    if cursor.eat('(') {
        let argument_types = type_arguments(cursor)?;
        cursor.eat_while(char::is_whitespace);
        if !(cursor.eat('-') && cursor.eat('>')) {
            return Err(());
        }
        let return_type = type_annotation(cursor)?;
        return Ok(TypeAnnotation::FunctionType {
            id: NodeId::fresh(),
            return_type: Box::new(return_type),
            argument_types,
        });
    }

    let start = cursor.pos();
    cursor.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '.');
    let name = cursor.slice(start, cursor.pos());
    if name.is_empty() {
        return Err(());
    }
    let generic_arguments = if cursor.eat('(') {
        type_arguments(cursor)?
    } else {
        Vec::new()
    };
    Ok(TypeAnnotation::named(name, generic_arguments))
}

/// Comma-separated types up to and including `)`; the `(` is consumed.
fn type_arguments(cursor: &mut Cursor) -> Result<Vec<TypeAnnotation>, ()> {
    let mut types = Vec::new();
    cursor.eat_while(char::is_whitespace);
    if cursor.eat(')') {
        return Ok(types);
    }
    loop {
        types.push(type_annotation(cursor)?);
        cursor.eat_while(char::is_whitespace);
        if cursor.eat(')') {
            return Ok(types);
        }
        if !cursor.eat(',') {
            return Err(());
        }
    }
}
