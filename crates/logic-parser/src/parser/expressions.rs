//! Expression and type-annotation parsers.
//!
//! Precedence, lowest to highest:
//!
//! | level      | operators                      | assoc |
//! |------------|--------------------------------|-------|
//! | assignment | `=`                            | right |
//! | comparison | `==` `!=` `<` `>` `<=` `>=`    | none  |
//! | postfix    | `.member`, `(args)`            | left  |

use logic_common::token::TokenKind;

use crate::ast::{
    Argument, BinaryExpression, BinaryOperator, Expression, FunctionCallArgument,
    FunctionCallExpression, Identifier, IdentifierExpression, Literal, LiteralExpression,
    MemberExpression, NodeId, TypeAnnotation,
};

use super::{PResult, Parser};

const COMPARISON_OPS: &[TokenKind] = &[
    TokenKind::EqEq,
    TokenKind::NotEq,
    TokenKind::Lt,
    TokenKind::Gt,
    TokenKind::LtEq,
    TokenKind::GtEq,
];

/// Whether the current token can begin an expression.
pub(crate) fn at_expression_start(p: &Parser) -> bool {
    p.at_any(&[
        TokenKind::Ident,
        TokenKind::Number,
        TokenKind::Minus,
        TokenKind::String,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Hash,
        TokenKind::LBracket,
    ])
}

pub(crate) fn expr(p: &mut Parser) -> PResult<Expression> {
    p.nested(assignment)
}

fn assignment(p: &mut Parser) -> PResult<Expression> {
    let start = p.current_span().start;
    let left = comparison(p)?;

    if p.at(TokenKind::Eq) {
        let op_span = p.advance();
        let op = BinaryOperator::SetEqualTo { id: NodeId::fresh() };
        p.record_span(op.id(), op_span);
        let right = expr(p)?;
        return Ok(binary(p, left, op, right, start));
    }

    Ok(left)
}

fn comparison(p: &mut Parser) -> PResult<Expression> {
    let start = p.current_span().start;
    let left = postfix(p)?;

    let Some(op) = comparison_op(p.current()) else {
        return Ok(left);
    };
    let op_span = p.advance();
    p.record_span(op.id(), op_span);
    let right = postfix(p)?;

    if p.at_any(COMPARISON_OPS) {
        return Err(p.error("comparison operators cannot be chained"));
    }

    Ok(binary(p, left, op, right, start))
}

fn comparison_op(kind: TokenKind) -> Option<BinaryOperator> {
    if !COMPARISON_OPS.contains(&kind) {
        return None;
    }
    let id = NodeId::fresh();
    Some(match kind {
        TokenKind::EqEq => BinaryOperator::IsEqualTo { id },
        TokenKind::NotEq => BinaryOperator::IsNotEqualTo { id },
        TokenKind::Lt => BinaryOperator::IsLessThan { id },
        TokenKind::Gt => BinaryOperator::IsGreaterThan { id },
        TokenKind::LtEq => BinaryOperator::IsLessThanOrEqual { id },
        _ => BinaryOperator::IsGreaterThanOrEqual { id },
    })
}

fn binary(
    p: &mut Parser,
    left: Expression,
    op: BinaryOperator,
    right: Expression,
    start: u32,
) -> Expression {
    let id = NodeId::fresh();
    p.record(&id, start);
    Expression::BinaryExpression(BinaryExpression {
        id,
        left: Box::new(left),
        right: Box::new(right),
        op,
    })
}

fn postfix(p: &mut Parser) -> PResult<Expression> {
    let start = p.current_span().start;
    let mut lhs = primary(p)?;

    loop {
        match p.current() {
            TokenKind::Dot => {
                p.advance();
                let (name, name_span) = p.expect_ident("member name after `.`")?;
                let member_name = Identifier::new(name);
                p.record_span(&member_name.id, name_span);
                let id = NodeId::fresh();
                p.record(&id, start);
                lhs = Expression::MemberExpression(MemberExpression {
                    id,
                    expression: Box::new(lhs),
                    member_name,
                });
            }
            TokenKind::LParen => {
                let arguments = argument_list(p)?;
                let id = NodeId::fresh();
                p.record(&id, start);
                lhs = Expression::FunctionCallExpression(FunctionCallExpression {
                    id,
                    expression: Box::new(lhs),
                    arguments,
                });
            }
            _ => return Ok(lhs),
        }
    }
}

/// `( [label:] expr, ... )`, trailing comma allowed.
fn argument_list(p: &mut Parser) -> PResult<Vec<FunctionCallArgument>> {
    let open = p.expect(TokenKind::LParen)?;
    let mut arguments = Vec::new();

    while !p.at(TokenKind::RParen) {
        let start = p.current_span().start;
        let label = if p.at(TokenKind::Ident) && p.nth(1) == TokenKind::Colon {
            let (label, _) = p.expect_ident("argument label")?;
            p.advance(); // :
            Some(label)
        } else {
            None
        };
        let expression = expr(p)?;
        let argument = Argument::new(label, expression);
        p.record(&argument.id, start);
        arguments.push(FunctionCallArgument::Argument(argument));

        if !p.eat(TokenKind::Comma) {
            break;
        }
    }

    p.expect_closing(TokenKind::RParen, open, "argument list")?;
    Ok(arguments)
}

fn primary(p: &mut Parser) -> PResult<Expression> {
    let start = p.current_span().start;

    let expression = match p.current() {
        TokenKind::Ident => {
            let (name, span) = p.expect_ident("identifier")?;
            let identifier = Identifier::new(name);
            p.record_span(&identifier.id, span);
            Expression::IdentifierExpression(IdentifierExpression {
                id: NodeId::fresh(),
                identifier,
            })
        }
        TokenKind::Minus => {
            p.advance();
            if !p.at(TokenKind::Number) {
                return Err(p.unexpected("number after `-`"));
            }
            let value = number(p)?;
            literal(p, Literal::Number { id: NodeId::fresh(), value: -value }, start)
        }
        TokenKind::Number => {
            let value = number(p)?;
            literal(p, Literal::Number { id: NodeId::fresh(), value }, start)
        }
        TokenKind::String => {
            let value = string(p);
            literal(p, Literal::String { id: NodeId::fresh(), value }, start)
        }
        TokenKind::True | TokenKind::False => {
            let value = p.at(TokenKind::True);
            p.advance();
            literal(p, Literal::Boolean { id: NodeId::fresh(), value }, start)
        }
        TokenKind::Hash => {
            let value = color(p)?;
            literal(p, Literal::Color { id: NodeId::fresh(), value }, start)
        }
        TokenKind::LBracket => {
            let open = p.advance();
            let mut value = Vec::new();
            while !p.at(TokenKind::RBracket) {
                value.push(expr(p)?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            p.expect_closing(TokenKind::RBracket, open, "array literal")?;
            literal(p, Literal::Array { id: NodeId::fresh(), value }, start)
        }
        _ => return Err(p.unexpected("expression")),
    };

    p.record(expression.id(), start);
    Ok(expression)
}

fn literal(p: &mut Parser, literal: Literal, start: u32) -> Expression {
    p.record(literal.id(), start);
    Expression::LiteralExpression(LiteralExpression {
        id: NodeId::fresh(),
        literal,
    })
}

fn number(p: &mut Parser) -> PResult<f64> {
    let text = p.current_text();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            p.advance();
            Ok(value)
        }
        Ok(_) => Err(p.error(format!("number literal out of range: {text}"))),
        Err(_) => Err(p.error(format!("invalid number literal: {text}"))),
    }
}

fn string(p: &mut Parser) -> String {
    let value = logic_lexer::unescape(p.current_text());
    p.advance();
    value
}

/// `#color(css: "...")`
fn color(p: &mut Parser) -> PResult<String> {
    p.expect(TokenKind::Hash)?;
    if p.current_text() != "color" {
        return Err(p.unexpected("`color` after `#`"));
    }
    p.advance();
    let open = p.expect(TokenKind::LParen)?;
    if p.current_text() != "css" {
        return Err(p.unexpected("`css:` label"));
    }
    p.advance();
    p.expect(TokenKind::Colon)?;
    if !p.at(TokenKind::String) {
        return Err(p.unexpected("color string"));
    }
    let value = string(p);
    p.expect_closing(TokenKind::RParen, open, "color literal")?;
    Ok(value)
}

// ── Type annotations ─────────────────────────────────────────────────────

/// `Name<Args>` or `(A, B) -> R`.
pub(crate) fn type_annotation(p: &mut Parser) -> PResult<TypeAnnotation> {
    p.nested(annotation)
}

fn annotation(p: &mut Parser) -> PResult<TypeAnnotation> {
    let start = p.current_span().start;

    let annotation = if p.at(TokenKind::LParen) {
        let open = p.advance();
        let mut argument_types = Vec::new();
        while !p.at(TokenKind::RParen) {
            argument_types.push(type_annotation(p)?);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
        p.expect_closing(TokenKind::RParen, open, "function type")?;
        p.expect(TokenKind::Arrow)?;
        let return_type = type_annotation(p)?;
        TypeAnnotation::FunctionType {
            id: NodeId::fresh(),
            return_type: Box::new(return_type),
            argument_types,
        }
    } else {
        let (name, span) = p.expect_ident("type")?;
        let identifier = Identifier::new(name);
        p.record_span(&identifier.id, span);
        let mut generic_arguments = Vec::new();
        if p.at(TokenKind::Lt) {
            let open = p.advance();
            loop {
                generic_arguments.push(type_annotation(p)?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            p.expect_closing(TokenKind::Gt, open, "generic arguments")?;
        }
        TypeAnnotation::TypeIdentifier {
            id: NodeId::fresh(),
            identifier,
            generic_arguments,
        }
    };

    p.record(annotation.id(), start);
    Ok(annotation)
}
