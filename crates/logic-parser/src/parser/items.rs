//! Statement and declaration parsers.
//!
//! Declarations may be preceded by `///` doc comments and an optional
//! `static` modifier. The modifier is accepted anywhere and discarded; the
//! printer re-derives it from the enclosing namespace or record.

use logic_common::span::Span;
use logic_common::token::TokenKind;

use crate::ast::{
    Comment, Declaration, DefaultValue, EnumCase, EnumerationCase, EnumerationDeclaration,
    FunctionDeclaration, FunctionParameter, GenericParameter, GenericParameterData,
    ImportDeclaration, NamespaceDeclaration, NodeId, Parameter, Pattern, Program,
    RecordDeclaration, Statement, TypeAnnotation, VariableDeclaration,
};

use super::expressions::{at_expression_start, expr, type_annotation};
use super::{PResult, Parser};

const DECLARATION_START: &[TokenKind] = &[
    TokenKind::DocComment,
    TokenKind::Static,
    TokenKind::Import,
    TokenKind::Let,
    TokenKind::Func,
    TokenKind::Enum,
    TokenKind::Struct,
];

pub(crate) fn program(p: &mut Parser) -> PResult<Program> {
    let mut block = Vec::new();
    p.skip_semicolons();
    while !p.at(TokenKind::Eof) {
        block.push(statement(p)?);
        p.skip_semicolons();
    }
    let program = Program::new(block);
    p.record_span(&program.id, Span::new(0, p.prev_end()));
    Ok(program)
}

// ── Statements ───────────────────────────────────────────────────────────

fn statement(p: &mut Parser) -> PResult<Statement> {
    p.nested(statement_at_depth)
}

fn statement_at_depth(p: &mut Parser) -> PResult<Statement> {
    let start = p.current_span().start;

    let statement = match p.current() {
        kind if DECLARATION_START.contains(&kind) => {
            let content = declaration(p)?;
            Statement::Declaration {
                id: NodeId::fresh(),
                content,
            }
        }
        TokenKind::Return => {
            p.advance();
            let expression = if at_expression_start(p) {
                Some(expr(p)?)
            } else {
                None
            };
            Statement::ReturnStatement {
                id: NodeId::fresh(),
                expression,
            }
        }
        TokenKind::If => {
            p.advance();
            let condition = expr(p)?;
            let block = statement_block(p, "`if` block")?;
            Statement::Branch {
                id: NodeId::fresh(),
                condition,
                block,
            }
        }
        _ if at_expression_start(p) => Statement::Expression {
            id: NodeId::fresh(),
            expression: expr(p)?,
        },
        _ => return Err(p.unexpected("statement")),
    };

    p.record(statement.id(), start);
    Ok(statement)
}

/// `{ statement* }`
fn statement_block(p: &mut Parser, what: &str) -> PResult<Vec<Statement>> {
    let open = p.expect(TokenKind::LBrace)?;
    let mut block = Vec::new();
    p.skip_semicolons();
    while !p.at_any(&[TokenKind::RBrace, TokenKind::Eof]) {
        block.push(statement(p)?);
        p.skip_semicolons();
    }
    p.expect_closing(TokenKind::RBrace, open, what)?;
    Ok(block)
}

// ── Declarations ─────────────────────────────────────────────────────────

/// Consecutive `///` lines, joined with newlines.
fn doc_comment(p: &mut Parser) -> Option<Comment> {
    let mut lines = Vec::new();
    while p.at(TokenKind::DocComment) {
        let text = p.current_text();
        let line = text.strip_prefix("///").unwrap_or(text);
        lines.push(line.strip_prefix(' ').unwrap_or(line).to_string());
        p.advance();
    }
    if lines.is_empty() {
        None
    } else {
        Some(Comment::new(lines.join("\n")))
    }
}

fn declaration(p: &mut Parser) -> PResult<Declaration> {
    p.nested(declaration_at_depth)
}

fn declaration_at_depth(p: &mut Parser) -> PResult<Declaration> {
    let comment = doc_comment(p);
    let start = p.current_span().start;
    p.eat(TokenKind::Static);

    let declaration = match p.current() {
        TokenKind::Import => {
            p.advance();
            let name = pattern(p, "module name")?;
            Declaration::ImportDeclaration(ImportDeclaration {
                id: NodeId::fresh(),
                name,
            })
        }
        TokenKind::Let => variable(p, comment)?,
        TokenKind::Func => function(p, comment)?,
        TokenKind::Enum => enumeration(p, comment)?,
        TokenKind::Struct => record(p, comment)?,
        _ => return Err(p.unexpected("declaration")),
    };

    p.record(declaration.id(), start);
    Ok(declaration)
}

fn pattern(p: &mut Parser, what: &str) -> PResult<Pattern> {
    let (name, span) = p.expect_ident(what)?;
    let pattern = Pattern::new(name);
    p.record_span(&pattern.id, span);
    Ok(pattern)
}

/// `let name: Type = initializer`
fn variable(p: &mut Parser, comment: Option<Comment>) -> PResult<Declaration> {
    p.expect(TokenKind::Let)?;
    let name = pattern(p, "variable name")?;
    let annotation = if p.eat(TokenKind::Colon) {
        Some(type_annotation(p)?)
    } else {
        None
    };
    let initializer = if p.eat(TokenKind::Eq) {
        Some(expr(p)?)
    } else {
        None
    };
    Ok(Declaration::Variable(VariableDeclaration {
        id: NodeId::fresh(),
        name,
        annotation,
        initializer,
        comment,
    }))
}

/// `func name<T>(params) -> Type { body }`
fn function(p: &mut Parser, comment: Option<Comment>) -> PResult<Declaration> {
    p.expect(TokenKind::Func)?;
    let name = pattern(p, "function name")?;
    let generic_parameters = generic_parameters(p)?;

    let open = p.expect(TokenKind::LParen)?;
    let mut parameters = Vec::new();
    while !p.at(TokenKind::RParen) {
        parameters.push(FunctionParameter::Parameter(parameter(p)?));
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect_closing(TokenKind::RParen, open, "parameter list")?;

    let return_type = if p.eat(TokenKind::Arrow) {
        type_annotation(p)?
    } else {
        TypeAnnotation::void()
    };
    let block = statement_block(p, "function body")?;

    Ok(Declaration::Function(FunctionDeclaration {
        id: NodeId::fresh(),
        name,
        return_type,
        generic_parameters,
        parameters,
        block,
        comment,
    }))
}

/// `[label] name: Type [= default]`
fn parameter(p: &mut Parser) -> PResult<Parameter> {
    let comment = doc_comment(p);
    let start = p.current_span().start;
    let external_name = if p.at(TokenKind::Ident) && p.nth(1) == TokenKind::Ident {
        let (label, _) = p.expect_ident("parameter label")?;
        Some(label)
    } else {
        None
    };
    let local_name = pattern(p, "parameter name")?;
    p.expect(TokenKind::Colon)?;
    let annotation = type_annotation(p)?;
    let default_value = if p.eat(TokenKind::Eq) {
        DefaultValue::Value {
            id: NodeId::fresh(),
            expression: expr(p)?,
        }
    } else {
        DefaultValue::none()
    };

    let parameter = Parameter {
        id: NodeId::fresh(),
        external_name,
        local_name,
        annotation,
        default_value,
        comment,
    };
    p.record(&parameter.id, start);
    Ok(parameter)
}

/// `<A, B>`, or nothing.
fn generic_parameters(p: &mut Parser) -> PResult<Vec<GenericParameter>> {
    let mut params = Vec::new();
    if !p.at(TokenKind::Lt) {
        return Ok(params);
    }
    let open = p.advance();
    loop {
        let name = pattern(p, "generic parameter name")?;
        params.push(GenericParameter::Parameter(GenericParameterData {
            id: NodeId::fresh(),
            name,
        }));
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    p.expect_closing(TokenKind::Gt, open, "generic parameters")?;
    Ok(params)
}

/// `{ declaration* }`
fn declaration_block(p: &mut Parser, what: &str) -> PResult<Vec<Declaration>> {
    let open = p.expect(TokenKind::LBrace)?;
    let mut declarations = Vec::new();
    p.skip_semicolons();
    while !p.at_any(&[TokenKind::RBrace, TokenKind::Eof]) {
        declarations.push(declaration(p)?);
        p.skip_semicolons();
    }
    p.expect_closing(TokenKind::RBrace, open, what)?;
    Ok(declarations)
}

/// `struct Name<T> { declarations }`
fn record(p: &mut Parser, comment: Option<Comment>) -> PResult<Declaration> {
    p.expect(TokenKind::Struct)?;
    let name = pattern(p, "struct name")?;
    let generic_parameters = generic_parameters(p)?;
    let declarations = declaration_block(p, "struct body")?;
    Ok(Declaration::Record(RecordDeclaration {
        id: NodeId::fresh(),
        name,
        generic_parameters,
        declarations,
        comment,
    }))
}

/// `enum Name<T> { ... }`: an enumeration when it has cases, otherwise a
/// namespace of declarations.
fn enumeration(p: &mut Parser, comment: Option<Comment>) -> PResult<Declaration> {
    p.expect(TokenKind::Enum)?;
    let name = pattern(p, "enum name")?;
    let generic_parameters = generic_parameters(p)?;

    let open = p.expect(TokenKind::LBrace)?;
    let mut cases = Vec::new();
    let mut declarations = Vec::new();
    p.skip_semicolons();
    while !p.at_any(&[TokenKind::RBrace, TokenKind::Eof]) {
        let is_case = p.at(TokenKind::Case)
            || (p.at(TokenKind::DocComment) && next_after_docs(p) == TokenKind::Case);
        if is_case {
            if !declarations.is_empty() {
                return Err(p.error("enum cases cannot be mixed with other declarations"));
            }
            case_line(p, &mut cases)?;
        } else {
            if !cases.is_empty() {
                return Err(p.error("enum cases cannot be mixed with other declarations"));
            }
            declarations.push(declaration(p)?);
        }
        p.skip_semicolons();
    }
    p.expect_closing(TokenKind::RBrace, open, "enum body")?;

    if cases.is_empty() && generic_parameters.is_empty() {
        Ok(Declaration::Namespace(NamespaceDeclaration {
            id: NodeId::fresh(),
            name,
            declarations,
            comment,
        }))
    } else {
        Ok(Declaration::Enumeration(EnumerationDeclaration {
            id: NodeId::fresh(),
            name,
            generic_parameters,
            cases,
            comment,
        }))
    }
}

fn next_after_docs(p: &Parser) -> TokenKind {
    let mut n = 0;
    while p.nth(n) == TokenKind::DocComment {
        n += 1;
    }
    p.nth(n)
}

/// `case a(T, U), b`
fn case_line(p: &mut Parser, cases: &mut Vec<EnumerationCase>) -> PResult<()> {
    let mut comment = doc_comment(p);
    p.expect(TokenKind::Case)?;
    loop {
        let start = p.current_span().start;
        let name = pattern(p, "case name")?;
        let mut associated_value_types = Vec::new();
        if p.at(TokenKind::LParen) {
            let open = p.advance();
            while !p.at(TokenKind::RParen) {
                associated_value_types.push(type_annotation(p)?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            p.expect_closing(TokenKind::RParen, open, "associated values")?;
        }
        let case = EnumCase {
            id: NodeId::fresh(),
            name,
            associated_value_types,
            comment: comment.take(),
        };
        p.record(&case.id, start);
        cases.push(EnumerationCase::EnumerationCase(case));

        if !p.eat(TokenKind::Comma) {
            return Ok(());
        }
    }
}
