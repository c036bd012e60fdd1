//! Statements and the two program roots.

use serde::{Deserialize, Serialize};

use super::{Declaration, Expression, NodeId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Statement {
    /// `if condition { block }`
    Branch {
        id: NodeId,
        condition: Expression,
        #[serde(default)]
        block: Vec<Statement>,
    },
    Declaration {
        id: NodeId,
        content: Declaration,
    },
    Expression {
        id: NodeId,
        expression: Expression,
    },
    ReturnStatement {
        id: NodeId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expression: Option<Expression>,
    },
    Placeholder {
        id: NodeId,
    },
}

impl Statement {
    pub fn id(&self) -> &NodeId {
        match self {
            Statement::Branch { id, .. }
            | Statement::Declaration { id, .. }
            | Statement::Expression { id, .. }
            | Statement::ReturnStatement { id, .. }
            | Statement::Placeholder { id } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Statement::Branch { .. } => "branch",
            Statement::Declaration { .. } => "declaration",
            Statement::Expression { .. } => "expression",
            Statement::ReturnStatement { .. } => "returnStatement",
            Statement::Placeholder { .. } => "placeholder",
        }
    }

    pub fn declaration(content: Declaration) -> Self {
        Statement::Declaration {
            id: NodeId::fresh(),
            content,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            Statement::Declaration { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        match self {
            Statement::Placeholder { .. } => true,
            Statement::Declaration { content, .. } => content.is_placeholder(),
            _ => false,
        }
    }
}

/// The root of a compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub id: NodeId,
    #[serde(default)]
    pub block: Vec<Statement>,
}

impl Program {
    pub fn new(block: Vec<Statement>) -> Self {
        Program {
            id: NodeId::fresh(),
            block,
        }
    }

    pub fn from_declarations(declarations: Vec<Declaration>) -> Self {
        Self::new(declarations.into_iter().map(Statement::declaration).collect())
    }

    /// Declarations in the program block, in order, skipping placeholders.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.block
            .iter()
            .filter_map(Statement::as_declaration)
            .filter(|d| !d.is_placeholder())
    }
}

/// The alternate on-disk root used by token files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopLevelDeclarations {
    pub id: NodeId,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
}

impl From<TopLevelDeclarations> for Program {
    fn from(top: TopLevelDeclarations) -> Self {
        Program {
            id: top.id,
            block: top
                .declarations
                .into_iter()
                .map(Statement::declaration)
                .collect(),
        }
    }
}
