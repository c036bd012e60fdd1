//! Unification errors.
//!
//! Every error names the expected (constraint head) and found (constraint
//! tail) types as they stood when unification failed, plus the id of the
//! node whose constraint failed.

use std::fmt;

use logic_parser::NodeId;

use crate::ty::{Ty, TyVar};

#[derive(Clone, Debug, PartialEq)]
pub enum UnificationError {
    /// Two different type constructors, e.g. `Number` and `String`.
    NameMismatch {
        expected: Ty,
        found: Ty,
        origin: NodeId,
    },
    /// Same constructor applied to a different number of generic arguments.
    GenericArgumentsCountMismatch {
        expected: Ty,
        found: Ty,
        origin: NodeId,
    },
    /// A call passes more positional arguments than the function takes, or
    /// leaves out one without a default.
    ArgumentCountMismatch {
        expected: Ty,
        found: Ty,
        origin: NodeId,
    },
    /// A call uses a label the function does not declare.
    LabelMismatch {
        expected: Ty,
        found: Ty,
        origin: NodeId,
    },
    /// A function type meets a non-function type.
    KindMismatch {
        expected: Ty,
        found: Ty,
        origin: NodeId,
    },
    /// A variable would have to contain itself, e.g. `?0 = Array<?0>`.
    InfiniteType { var: TyVar, ty: Ty, origin: NodeId },
}

impl UnificationError {
    pub fn origin(&self) -> &NodeId {
        match self {
            UnificationError::NameMismatch { origin, .. }
            | UnificationError::GenericArgumentsCountMismatch { origin, .. }
            | UnificationError::ArgumentCountMismatch { origin, .. }
            | UnificationError::LabelMismatch { origin, .. }
            | UnificationError::KindMismatch { origin, .. }
            | UnificationError::InfiniteType { origin, .. } => origin,
        }
    }

    /// The expected and found types, in that order.
    pub fn types(&self) -> (Ty, Ty) {
        match self {
            UnificationError::NameMismatch {
                expected, found, ..
            }
            | UnificationError::GenericArgumentsCountMismatch {
                expected, found, ..
            }
            | UnificationError::ArgumentCountMismatch {
                expected, found, ..
            }
            | UnificationError::LabelMismatch {
                expected, found, ..
            }
            | UnificationError::KindMismatch {
                expected, found, ..
            } => (expected.clone(), found.clone()),
            UnificationError::InfiniteType { var, ty, .. } => (Ty::Var(*var), ty.clone()),
        }
    }
}

impl fmt::Display for UnificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnificationError::NameMismatch {
                expected, found, ..
            } => write!(f, "type mismatch: expected `{}`, found `{}`", expected, found),
            UnificationError::GenericArgumentsCountMismatch {
                expected, found, ..
            } => write!(
                f,
                "generic argument count mismatch: expected `{}`, found `{}`",
                expected, found
            ),
            UnificationError::ArgumentCountMismatch {
                expected, found, ..
            } => write!(
                f,
                "argument count mismatch: expected `{}`, found `{}`",
                expected, found
            ),
            UnificationError::LabelMismatch {
                expected, found, ..
            } => write!(
                f,
                "argument label mismatch: expected `{}`, found `{}`",
                expected, found
            ),
            UnificationError::KindMismatch {
                expected, found, ..
            } => write!(
                f,
                "kind mismatch: expected `{}`, found `{}`",
                expected, found
            ),
            UnificationError::InfiniteType { var, ty, .. } => {
                write!(f, "infinite type: `?{}` occurs in `{}`", var.0, ty)
            }
        }
    }
}

impl std::error::Error for UnificationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_display_names_both_types() {
        let err = UnificationError::NameMismatch {
            expected: Ty::number(),
            found: Ty::string(),
            origin: NodeId::new("A"),
        };
        assert_eq!(
            err.to_string(),
            "type mismatch: expected `Number`, found `String`"
        );
        assert_eq!(err.origin().as_str(), "A");
        assert_eq!(err.types(), (Ty::number(), Ty::string()));
    }
}
