//! Generic traversal over the syntax tree.
//!
//! [`walk`] is a read-only pre-order walk over [`SyntaxNode`] views. The
//! mutable walk only visits expressions, which is all the rewrite passes
//! need.

use crate::ast::{
    BinaryExpression, Declaration, DefaultValue, EnumerationCase, Expression, FunctionCallArgument,
    FunctionParameter, GenericParameter, Literal, Program, Statement, SyntaxNode, TypeAnnotation,
};

/// Visit `node` and every descendant, parents before children.
pub fn walk<'a>(node: SyntaxNode<'a>, f: &mut impl FnMut(SyntaxNode<'a>)) {
    f(node);
    for child in children(node) {
        walk(child, f);
    }
}

/// Direct children of a node, in source order.
pub fn children<'a>(node: SyntaxNode<'a>) -> Vec<SyntaxNode<'a>> {
    let mut out = Vec::new();
    match node {
        SyntaxNode::Program(program) => {
            out.extend(program.block.iter().map(SyntaxNode::Statement));
        }
        SyntaxNode::Statement(statement) => match statement {
            Statement::Branch {
                condition, block, ..
            } => {
                out.push(SyntaxNode::Expression(condition));
                out.extend(block.iter().map(SyntaxNode::Statement));
            }
            Statement::Declaration { content, .. } => out.push(SyntaxNode::Declaration(content)),
            Statement::Expression { expression, .. } => {
                out.push(SyntaxNode::Expression(expression))
            }
            Statement::ReturnStatement { expression, .. } => {
                out.extend(expression.iter().map(SyntaxNode::Expression))
            }
            Statement::Placeholder { .. } => {}
        },
        SyntaxNode::Declaration(declaration) => declaration_children(declaration, &mut out),
        SyntaxNode::Expression(expression) => match expression {
            Expression::IdentifierExpression(e) => out.push(SyntaxNode::Identifier(&e.identifier)),
            Expression::MemberExpression(e) => {
                out.push(SyntaxNode::Expression(&e.expression));
                out.push(SyntaxNode::Identifier(&e.member_name));
            }
            Expression::FunctionCallExpression(e) => {
                out.push(SyntaxNode::Expression(&e.expression));
                out.extend(e.arguments.iter().map(SyntaxNode::Argument));
            }
            Expression::BinaryExpression(e) => {
                out.push(SyntaxNode::Expression(&e.left));
                out.push(SyntaxNode::Expression(&e.right));
            }
            Expression::LiteralExpression(e) => out.push(SyntaxNode::Literal(&e.literal)),
            Expression::Placeholder(_) => {}
        },
        SyntaxNode::Literal(Literal::Array { value, .. }) => {
            out.extend(value.iter().map(SyntaxNode::Expression));
        }
        SyntaxNode::Literal(_) => {}
        SyntaxNode::TypeAnnotation(annotation) => match annotation {
            TypeAnnotation::TypeIdentifier {
                identifier,
                generic_arguments,
                ..
            } => {
                out.push(SyntaxNode::Identifier(identifier));
                out.extend(generic_arguments.iter().map(SyntaxNode::TypeAnnotation));
            }
            TypeAnnotation::FunctionType {
                return_type,
                argument_types,
                ..
            } => {
                out.extend(argument_types.iter().map(SyntaxNode::TypeAnnotation));
                out.push(SyntaxNode::TypeAnnotation(return_type));
            }
            TypeAnnotation::Placeholder { .. } => {}
        },
        SyntaxNode::FunctionParameter(FunctionParameter::Parameter(param)) => {
            out.push(SyntaxNode::Pattern(&param.local_name));
            out.push(SyntaxNode::TypeAnnotation(&param.annotation));
            out.extend(param.default_value.expression().map(SyntaxNode::Expression));
        }
        SyntaxNode::GenericParameter(GenericParameter::Parameter(param)) => {
            out.push(SyntaxNode::Pattern(&param.name));
        }
        SyntaxNode::EnumerationCase(EnumerationCase::EnumerationCase(case)) => {
            out.push(SyntaxNode::Pattern(&case.name));
            out.extend(
                case.associated_value_types
                    .iter()
                    .map(SyntaxNode::TypeAnnotation),
            );
        }
        SyntaxNode::Argument(FunctionCallArgument::Argument(argument)) => {
            out.push(SyntaxNode::Expression(&argument.expression));
        }
        SyntaxNode::FunctionParameter(_)
        | SyntaxNode::GenericParameter(_)
        | SyntaxNode::EnumerationCase(_)
        | SyntaxNode::Argument(_)
        | SyntaxNode::Pattern(_)
        | SyntaxNode::Identifier(_) => {}
    }
    out
}

fn declaration_children<'a>(declaration: &'a Declaration, out: &mut Vec<SyntaxNode<'a>>) {
    match declaration {
        Declaration::ImportDeclaration(d) => out.push(SyntaxNode::Pattern(&d.name)),
        Declaration::Variable(d) => {
            out.push(SyntaxNode::Pattern(&d.name));
            out.extend(d.annotation.iter().map(SyntaxNode::TypeAnnotation));
            out.extend(d.initializer.iter().map(SyntaxNode::Expression));
        }
        Declaration::Function(d) => {
            out.push(SyntaxNode::Pattern(&d.name));
            out.push(SyntaxNode::TypeAnnotation(&d.return_type));
            out.extend(d.generic_parameters.iter().map(SyntaxNode::GenericParameter));
            out.extend(d.parameters.iter().map(SyntaxNode::FunctionParameter));
            out.extend(d.block.iter().map(SyntaxNode::Statement));
        }
        Declaration::Enumeration(d) => {
            out.push(SyntaxNode::Pattern(&d.name));
            out.extend(d.generic_parameters.iter().map(SyntaxNode::GenericParameter));
            out.extend(d.cases.iter().map(SyntaxNode::EnumerationCase));
        }
        Declaration::Record(d) => {
            out.push(SyntaxNode::Pattern(&d.name));
            out.extend(d.generic_parameters.iter().map(SyntaxNode::GenericParameter));
            out.extend(d.declarations.iter().map(SyntaxNode::Declaration));
        }
        Declaration::Namespace(d) => {
            out.push(SyntaxNode::Pattern(&d.name));
            out.extend(d.declarations.iter().map(SyntaxNode::Declaration));
        }
        Declaration::Placeholder(_) => {}
    }
}

// ── Mutable expression walk ──────────────────────────────────────────────

/// Visit every expression in the program, parents before children.
///
/// The callback may replace the expression it is given; the walk then
/// descends into the replacement.
pub fn walk_expressions_mut(program: &mut Program, f: &mut impl FnMut(&mut Expression)) {
    statements_mut(&mut program.block, f);
}

fn statements_mut(block: &mut [Statement], f: &mut impl FnMut(&mut Expression)) {
    for statement in block {
        match statement {
            Statement::Branch {
                condition, block, ..
            } => {
                expression_mut(condition, f);
                statements_mut(block, f);
            }
            Statement::Declaration { content, .. } => declaration_mut(content, f),
            Statement::Expression { expression, .. } => expression_mut(expression, f),
            Statement::ReturnStatement {
                expression: Some(expression),
                ..
            } => expression_mut(expression, f),
            Statement::ReturnStatement { .. } | Statement::Placeholder { .. } => {}
        }
    }
}

fn declaration_mut(declaration: &mut Declaration, f: &mut impl FnMut(&mut Expression)) {
    match declaration {
        Declaration::Variable(d) => {
            if let Some(initializer) = &mut d.initializer {
                expression_mut(initializer, f);
            }
        }
        Declaration::Function(d) => {
            for param in &mut d.parameters {
                if let FunctionParameter::Parameter(param) = param {
                    if let DefaultValue::Value { expression, .. } =
                        &mut param.default_value
                    {
                        expression_mut(expression, f);
                    }
                }
            }
            statements_mut(&mut d.block, f);
        }
        Declaration::Record(d) => {
            for nested in &mut d.declarations {
                declaration_mut(nested, f);
            }
        }
        Declaration::Namespace(d) => {
            for nested in &mut d.declarations {
                declaration_mut(nested, f);
            }
        }
        Declaration::ImportDeclaration(_)
        | Declaration::Enumeration(_)
        | Declaration::Placeholder(_) => {}
    }
}

fn expression_mut(expression: &mut Expression, f: &mut impl FnMut(&mut Expression)) {
    f(expression);
    match expression {
        Expression::MemberExpression(e) => expression_mut(&mut e.expression, f),
        Expression::FunctionCallExpression(e) => {
            expression_mut(&mut e.expression, f);
            for argument in &mut e.arguments {
                if let FunctionCallArgument::Argument(argument) = argument {
                    expression_mut(&mut argument.expression, f);
                }
            }
        }
        Expression::BinaryExpression(e) => {
            expression_mut(&mut e.left, f);
            expression_mut(&mut e.right, f);
        }
        Expression::LiteralExpression(e) => {
            if let Literal::Array { value, .. } = &mut e.literal {
                for element in value {
                    expression_mut(element, f);
                }
            }
        }
        Expression::IdentifierExpression(_) | Expression::Placeholder(_) => {}
    }
}

/// The first binary expression, in pre-order, whose operands cannot be
/// written as text. See [`BinaryExpression::nesting_error`].
pub fn find_nested_binary(program: &Program) -> Option<(&BinaryExpression, &'static str)> {
    let mut found = None;
    walk(SyntaxNode::Program(program), &mut |node| {
        if found.is_some() {
            return;
        }
        if let SyntaxNode::Expression(Expression::BinaryExpression(binary)) = node {
            found = binary.nesting_error().map(|message| (binary, message));
        }
    });
    found
}

// ── Rewrite passes ───────────────────────────────────────────────────────

/// Replace every call argument of the form `Optional.value(x)` with `x`.
///
/// Only argument positions are rewritten, and only one level deep:
/// `f(Optional.value(Optional.value(x)))` becomes `f(Optional.value(x))`.
pub fn unwrap_optional_arguments(program: &mut Program) {
    walk_expressions_mut(program, &mut |expression| {
        let Expression::FunctionCallExpression(call) = expression else {
            return;
        };
        for argument in &mut call.arguments {
            if let FunctionCallArgument::Argument(argument) = argument {
                if let Some(inner) = optional_value_payload(&argument.expression) {
                    argument.expression = inner;
                }
            }
        }
    });
}

fn optional_value_payload(expression: &Expression) -> Option<Expression> {
    let Expression::FunctionCallExpression(call) = expression else {
        return None;
    };
    if call.expression.member_path()? != ["Optional", "value"] {
        return None;
    }
    let mut arguments = call.arguments();
    match (arguments.next(), arguments.next()) {
        (Some(only), None) => Some(only.expression.clone()),
        _ => None,
    }
}
