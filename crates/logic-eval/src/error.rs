//! Evaluation errors.

use std::fmt;

use logic_parser::NodeId;

#[derive(Clone, Debug, PartialEq)]
pub enum EvaluationError {
    /// An identifier the scope resolver could not bind.
    UnresolvedIdentifier { id: NodeId, name: String },
    /// A member expression that is neither a qualified path nor a field.
    UnresolvedMember { id: NodeId, name: String },
    /// No solved type was recorded for an expression.
    MissingType { id: NodeId },
    /// Initializers that depend on each other, e.g. `a -> b -> a`.
    CyclicInitializer { path: Vec<String> },
    /// A variable read before it was given a value.
    UninitializedVariable { name: String },
    NotCallable { id: NodeId },
    ArityMismatch {
        function: String,
        expected: usize,
        found: usize,
    },
    MissingArgument { function: String, label: String },
    /// A body-less prelude function without a native implementation.
    UnknownBuiltin { path: String },
    InvalidOperands { operator: String, message: String },
    RecursionLimit { depth: usize },
}

impl EvaluationError {
    /// The node the error is attached to, if it has one.
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            EvaluationError::UnresolvedIdentifier { id, .. }
            | EvaluationError::UnresolvedMember { id, .. }
            | EvaluationError::MissingType { id }
            | EvaluationError::NotCallable { id } => Some(id),
            _ => None,
        }
    }

    pub(crate) fn operands(operator: impl Into<String>, message: impl Into<String>) -> Self {
        EvaluationError::InvalidOperands {
            operator: operator.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvaluationError::UnresolvedIdentifier { name, .. } => {
                write!(f, "unresolved identifier `{}`", name)
            }
            EvaluationError::UnresolvedMember { name, .. } => {
                write!(f, "unresolved member `{}`", name)
            }
            EvaluationError::MissingType { id } => {
                write!(f, "no type was inferred for node {}", id)
            }
            EvaluationError::CyclicInitializer { path } => {
                write!(f, "cyclic initializer: {}", path.join(" -> "))
            }
            EvaluationError::UninitializedVariable { name } => {
                write!(f, "variable `{}` is used before it is initialized", name)
            }
            EvaluationError::NotCallable { .. } => write!(f, "value is not callable"),
            EvaluationError::ArityMismatch {
                function,
                expected,
                found,
            } => write!(
                f,
                "`{}` takes {} argument(s) but {} were supplied",
                function, expected, found
            ),
            EvaluationError::MissingArgument { function, label } => {
                write!(f, "missing argument `{}` in call to `{}`", label, function)
            }
            EvaluationError::UnknownBuiltin { path } => write!(f, "unknown builtin `{}`", path),
            EvaluationError::InvalidOperands { operator, message } => {
                write!(f, "invalid operands to `{}`: {}", operator, message)
            }
            EvaluationError::RecursionLimit { depth } => {
                write!(f, "recursion limit of {} calls exceeded", depth)
            }
        }
    }
}

impl std::error::Error for EvaluationError {}
