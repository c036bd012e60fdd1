//! Runtime values.
//!
//! Every value pairs its solved type with a tagged memory representation.
//! Colors are `Color` records holding their CSS string; optionals are the
//! prelude's `Optional` enum (`value(x)` / `none`).

use std::fmt;

use logic_parser::NodeId;
use logic_typeck::ty::Ty;

#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    pub ty: Ty,
    pub memory: Memory,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Memory {
    Unit,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Enum { case: String, payload: Vec<Value> },
    /// Fields in declaration order.
    Record(Vec<(String, Value)>),
    Function(Function),
}

/// Something a call expression can apply.
#[derive(Clone, Debug, PartialEq)]
pub enum Function {
    /// A declared function, identified by its name pattern.
    Declared { pattern: NodeId },
    /// A record constructor.
    RecordInit { pattern: NodeId },
    /// An enum case with associated values.
    EnumInit { case: String },
}

impl Value {
    pub fn new(ty: Ty, memory: Memory) -> Self {
        Value { ty, memory }
    }

    pub fn unit() -> Self {
        Value::new(Ty::unit(), Memory::Unit)
    }

    pub fn bool(value: bool) -> Self {
        Value::new(Ty::bool(), Memory::Bool(value))
    }

    pub fn number(value: f64) -> Self {
        Value::new(Ty::number(), Memory::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Value::new(Ty::string(), Memory::String(value.into()))
    }

    pub fn color(css: impl Into<String>) -> Self {
        Value::new(
            Ty::color(),
            Memory::Record(vec![("value".to_string(), Value::string(css))]),
        )
    }

    pub fn optional_value(inner: Value) -> Self {
        Value::new(
            Ty::optional(inner.ty.clone()),
            Memory::Enum {
                case: "value".to_string(),
                payload: vec![inner],
            },
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.memory {
            Memory::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.memory {
            Memory::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.memory {
            Memory::String(s) => Some(s),
            _ => None,
        }
    }

    /// A record field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match &self.memory {
            Memory::Record(fields) => fields.iter().find(|(n, _)| n == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// The CSS string of a `Color` record.
    pub fn as_color(&self) -> Option<&str> {
        if self.ty.con_name() != Some("Color") {
            return None;
        }
        self.field("value").and_then(Value::as_str)
    }

    /// Structural equality on memory, ignoring types.
    pub fn same(&self, other: &Value) -> bool {
        match (&self.memory, &other.memory) {
            (Memory::Unit, Memory::Unit) => true,
            (Memory::Bool(a), Memory::Bool(b)) => a == b,
            (Memory::Number(a), Memory::Number(b)) => a == b,
            (Memory::String(a), Memory::String(b)) => a == b,
            (Memory::Array(a), Memory::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same(y))
            }
            (
                Memory::Enum {
                    case: a,
                    payload: pa,
                },
                Memory::Enum {
                    case: b,
                    payload: pb,
                },
            ) => a == b && pa.len() == pb.len() && pa.iter().zip(pb).all(|(x, y)| x.same(y)),
            (Memory::Record(a), Memory::Record(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((na, va), (nb, vb))| na == nb && va.same(vb))
            }
            (Memory::Function(a), Memory::Function(b)) => a == b,
            _ => false,
        }
    }
}

/// Numbers print without a fractional part when they are whole.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(css) = self.as_color() {
            return write!(f, "#color(css: {})", logic_lexer::escape(css));
        }
        match &self.memory {
            Memory::Unit => write!(f, "()"),
            Memory::Bool(b) => write!(f, "{}", b),
            Memory::Number(n) => write!(f, "{}", format_number(*n)),
            Memory::String(s) => write!(f, "{}", logic_lexer::escape(s)),
            Memory::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Memory::Enum { case, payload } => {
                if let Some(name) = self.ty.con_name() {
                    write!(f, "{}.", name)?;
                }
                write!(f, "{}", case)?;
                if !payload.is_empty() {
                    write!(f, "(")?;
                    for (i, item) in payload.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", item)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Memory::Record(fields) => {
                write!(f, "{}(", self.ty.con_name().unwrap_or("record"))?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, value)?;
                }
                write!(f, ")")
            }
            Memory::Function(_) => write!(f, "<function {}>", self.ty),
        }
    }
}
