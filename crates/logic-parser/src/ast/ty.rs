use serde::{Deserialize, Serialize};

use super::{Identifier, NodeId};

/// A written type: `Name<Args>`, `(A, B) -> R`, or a hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum TypeAnnotation {
    TypeIdentifier {
        id: NodeId,
        identifier: Identifier,
        #[serde(default)]
        generic_arguments: Vec<TypeAnnotation>,
    },
    FunctionType {
        id: NodeId,
        return_type: Box<TypeAnnotation>,
        #[serde(default)]
        argument_types: Vec<TypeAnnotation>,
    },
    Placeholder {
        id: NodeId,
    },
}

impl TypeAnnotation {
    pub fn id(&self) -> &NodeId {
        match self {
            TypeAnnotation::TypeIdentifier { id, .. }
            | TypeAnnotation::FunctionType { id, .. }
            | TypeAnnotation::Placeholder { id } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TypeAnnotation::TypeIdentifier { .. } => "typeIdentifier",
            TypeAnnotation::FunctionType { .. } => "functionType",
            TypeAnnotation::Placeholder { .. } => "placeholder",
        }
    }

    /// A named type with the given generic arguments.
    pub fn named(name: impl Into<String>, generic_arguments: Vec<TypeAnnotation>) -> Self {
        TypeAnnotation::TypeIdentifier {
            id: NodeId::fresh(),
            identifier: Identifier::new(name),
            generic_arguments,
        }
    }

    pub fn void() -> Self {
        Self::named("Void", Vec::new())
    }

    /// The head name of a type identifier.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeAnnotation::TypeIdentifier { identifier, .. } => Some(&identifier.string),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(
            self,
            TypeAnnotation::TypeIdentifier { identifier, generic_arguments, .. }
                if identifier.string == "Void" && generic_arguments.is_empty()
        )
    }

    /// `Optional<T>` yields `T`.
    pub fn optional_inner(&self) -> Option<&TypeAnnotation> {
        match self {
            TypeAnnotation::TypeIdentifier {
                identifier,
                generic_arguments,
                ..
            } if identifier.string == "Optional" && generic_arguments.len() == 1 => {
                generic_arguments.first()
            }
            _ => None,
        }
    }
}
