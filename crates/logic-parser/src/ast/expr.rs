//! Expressions, literals and call arguments.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Identifier, NodeId, Placeholder};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Expression {
    IdentifierExpression(IdentifierExpression),
    MemberExpression(MemberExpression),
    FunctionCallExpression(FunctionCallExpression),
    BinaryExpression(BinaryExpression),
    LiteralExpression(LiteralExpression),
    Placeholder(Placeholder),
}

impl Expression {
    pub fn id(&self) -> &NodeId {
        match self {
            Expression::IdentifierExpression(e) => &e.id,
            Expression::MemberExpression(e) => &e.id,
            Expression::FunctionCallExpression(e) => &e.id,
            Expression::BinaryExpression(e) => &e.id,
            Expression::LiteralExpression(e) => &e.id,
            Expression::Placeholder(p) => &p.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Expression::IdentifierExpression(_) => "identifierExpression",
            Expression::MemberExpression(_) => "memberExpression",
            Expression::FunctionCallExpression(_) => "functionCallExpression",
            Expression::BinaryExpression(_) => "binaryExpression",
            Expression::LiteralExpression(_) => "literalExpression",
            Expression::Placeholder(_) => "placeholder",
        }
    }

    pub fn identifier(name: impl Into<String>) -> Expression {
        Expression::IdentifierExpression(IdentifierExpression {
            id: NodeId::fresh(),
            identifier: Identifier::new(name),
        })
    }

    pub fn member(base: Expression, name: impl Into<String>) -> Expression {
        Expression::MemberExpression(MemberExpression {
            id: NodeId::fresh(),
            expression: Box::new(base),
            member_name: Identifier::new(name),
        })
    }

    pub fn literal(literal: Literal) -> Expression {
        Expression::LiteralExpression(LiteralExpression {
            id: NodeId::fresh(),
            literal,
        })
    }

    /// Flatten an identifier/member chain `a.b.c` into `["a", "b", "c"]`.
    ///
    /// Returns `None` when the chain is rooted in anything other than an
    /// identifier (e.g. a call), or contains a placeholder name.
    pub fn member_path(&self) -> Option<Vec<&str>> {
        match self {
            Expression::IdentifierExpression(e) if !e.identifier.is_placeholder => {
                Some(vec![e.identifier.string.as_str()])
            }
            Expression::MemberExpression(e) if !e.member_name.is_placeholder => {
                let mut path = e.expression.member_path()?;
                path.push(e.member_name.string.as_str());
                Some(path)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierExpression {
    pub id: NodeId,
    pub identifier: Identifier,
}

/// `expression.memberName`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberExpression {
    pub id: NodeId,
    pub expression: Box<Expression>,
    pub member_name: Identifier,
}

/// `expression(arguments)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallExpression {
    pub id: NodeId,
    pub expression: Box<Expression>,
    #[serde(default)]
    pub arguments: Vec<FunctionCallArgument>,
}

impl FunctionCallExpression {
    pub fn arguments(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter().filter_map(|a| match a {
            FunctionCallArgument::Argument(a) => Some(a),
            FunctionCallArgument::Placeholder(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub id: NodeId,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub op: BinaryOperator,
}

impl BinaryExpression {
    /// Why the operands have no text form, if they have none. Text has no
    /// parentheses, so a comparison operand is never binary and an
    /// assignment target is never an assignment.
    pub fn nesting_error(&self) -> Option<&'static str> {
        let binary = |e: &Expression| match e {
            Expression::BinaryExpression(b) => Some(b.op.is_assignment()),
            _ => None,
        };
        if self.op.is_assignment() {
            match binary(&self.left) {
                Some(true) => Some("an assignment cannot be the target of another assignment"),
                _ => None,
            }
        } else if binary(&self.left).is_some() || binary(&self.right).is_some() {
            Some("a comparison operand cannot be a comparison or an assignment")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralExpression {
    pub id: NodeId,
    pub literal: Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum FunctionCallArgument {
    Argument(Argument),
    Placeholder(Placeholder),
}

impl FunctionCallArgument {
    pub fn id(&self) -> &NodeId {
        match self {
            FunctionCallArgument::Argument(a) => &a.id,
            FunctionCallArgument::Placeholder(p) => &p.id,
        }
    }
}

/// `label: expression`, or a bare `expression` when unlabeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub expression: Expression,
}

impl Argument {
    pub fn new(label: Option<String>, expression: Expression) -> Self {
        Argument {
            id: NodeId::fresh(),
            label,
            expression,
        }
    }
}

// ── Operators ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum BinaryOperator {
    IsEqualTo { id: NodeId },
    IsNotEqualTo { id: NodeId },
    IsLessThan { id: NodeId },
    IsGreaterThan { id: NodeId },
    IsLessThanOrEqual { id: NodeId },
    IsGreaterThanOrEqual { id: NodeId },
    SetEqualTo { id: NodeId },
}

impl BinaryOperator {
    pub fn id(&self) -> &NodeId {
        match self {
            BinaryOperator::IsEqualTo { id }
            | BinaryOperator::IsNotEqualTo { id }
            | BinaryOperator::IsLessThan { id }
            | BinaryOperator::IsGreaterThan { id }
            | BinaryOperator::IsLessThanOrEqual { id }
            | BinaryOperator::IsGreaterThanOrEqual { id }
            | BinaryOperator::SetEqualTo { id } => id,
        }
    }

    /// Source spelling of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOperator::IsEqualTo { .. } => "==",
            BinaryOperator::IsNotEqualTo { .. } => "!=",
            BinaryOperator::IsLessThan { .. } => "<",
            BinaryOperator::IsGreaterThan { .. } => ">",
            BinaryOperator::IsLessThanOrEqual { .. } => "<=",
            BinaryOperator::IsGreaterThanOrEqual { .. } => ">=",
            BinaryOperator::SetEqualTo { .. } => "=",
        }
    }

    /// The on-disk tag, also used as the XML `operator` attribute.
    pub fn tag(&self) -> &'static str {
        match self {
            BinaryOperator::IsEqualTo { .. } => "isEqualTo",
            BinaryOperator::IsNotEqualTo { .. } => "isNotEqualTo",
            BinaryOperator::IsLessThan { .. } => "isLessThan",
            BinaryOperator::IsGreaterThan { .. } => "isGreaterThan",
            BinaryOperator::IsLessThanOrEqual { .. } => "isLessThanOrEqual",
            BinaryOperator::IsGreaterThanOrEqual { .. } => "isGreaterThanOrEqual",
            BinaryOperator::SetEqualTo { .. } => "setEqualTo",
        }
    }

    /// Build an operator from its on-disk tag, with a fresh id.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let id = NodeId::fresh();
        let op = match tag {
            "isEqualTo" => BinaryOperator::IsEqualTo { id },
            "isNotEqualTo" => BinaryOperator::IsNotEqualTo { id },
            "isLessThan" => BinaryOperator::IsLessThan { id },
            "isGreaterThan" => BinaryOperator::IsGreaterThan { id },
            "isLessThanOrEqual" => BinaryOperator::IsLessThanOrEqual { id },
            "isGreaterThanOrEqual" => BinaryOperator::IsGreaterThanOrEqual { id },
            "setEqualTo" => BinaryOperator::SetEqualTo { id },
            _ => return None,
        };
        Some(op)
    }

    pub fn is_assignment(&self) -> bool {
        matches!(self, BinaryOperator::SetEqualTo { .. })
    }
}

// ── Literals ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Literal {
    Boolean {
        id: NodeId,
        value: bool,
    },
    Number {
        id: NodeId,
        #[serde(serialize_with = "serialize_number", deserialize_with = "deserialize_number")]
        value: f64,
    },
    String {
        id: NodeId,
        value: String,
    },
    /// A CSS color string.
    Color {
        id: NodeId,
        value: String,
    },
    Array {
        id: NodeId,
        #[serde(default)]
        value: Vec<Expression>,
    },
}

impl Literal {
    pub fn id(&self) -> &NodeId {
        match self {
            Literal::Boolean { id, .. }
            | Literal::Number { id, .. }
            | Literal::String { id, .. }
            | Literal::Color { id, .. }
            | Literal::Array { id, .. } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Boolean { .. } => "boolean",
            Literal::Number { .. } => "number",
            Literal::String { .. } => "string",
            Literal::Color { .. } => "color",
            Literal::Array { .. } => "array",
        }
    }

    /// The prelude type a scalar literal belongs to. Arrays are generic.
    pub fn scalar_type_name(&self) -> Option<&'static str> {
        match self {
            Literal::Boolean { .. } => Some("Boolean"),
            Literal::Number { .. } => Some("Number"),
            Literal::String { .. } => Some("String"),
            Literal::Color { .. } => Some("Color"),
            Literal::Array { .. } => None,
        }
    }
}

/// Whole-valued numbers are written as integers so documents diff cleanly.
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

fn deserialize_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    f64::deserialize(deserializer)
}
