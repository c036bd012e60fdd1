//! The Logic syntax tree.
//!
//! Every node carries a stable [`NodeId`]. Each AST category is a closed
//! enum whose serde representation is the on-disk `{ "type": .., "data": .. }`
//! shape, so the JSON codec is a thin layer over these types.
//!
//! Categories:
//! - [`stmt`]: `Program`, `TopLevelDeclarations`, `Statement`
//! - [`decl`]: `Declaration` and its parts (parameters, cases, generics)
//! - [`expr`]: `Expression`, `Literal`, `BinaryOperator`, call arguments
//! - [`ty`]: `TypeAnnotation`

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod ty;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub use decl::*;
pub use expr::*;
pub use stmt::*;
pub use ty::*;

// ── Node ids ─────────────────────────────────────────────────────────────

/// A globally unique node id.
///
/// Documents on disk use upper-case UUID strings. Ids minted in-process by
/// the parser and the XML decoder come from a process-wide counter, so they
/// are unique per process and deterministic for a given sequence of parses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// Mint a new id, UUID-shaped so it can sit next to ids read from disk.
    pub fn fresh() -> Self {
        let n = NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed);
        NodeId(format!("00000000-0000-0000-0000-{:012X}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Leaf nodes ───────────────────────────────────────────────────────────

/// A binding site: the name of a variable, function, type, case or parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: NodeId,
    pub name: String,
}

impl Pattern {
    pub fn new(name: impl Into<String>) -> Self {
        Pattern {
            id: NodeId::fresh(),
            name: name.into(),
        }
    }
}

/// A use site of a name (in expressions and type annotations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identifier {
    pub id: NodeId,
    pub string: String,
    #[serde(default)]
    pub is_placeholder: bool,
}

impl Identifier {
    pub fn new(string: impl Into<String>) -> Self {
        Identifier {
            id: NodeId::fresh(),
            string: string.into(),
            is_placeholder: false,
        }
    }
}

/// An unfilled slot in a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placeholder {
    pub id: NodeId,
}

impl Placeholder {
    pub fn new() -> Self {
        Placeholder { id: NodeId::fresh() }
    }
}

impl Default for Placeholder {
    fn default() -> Self {
        Self::new()
    }
}

/// A documentation comment attached to a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Comment {
    Comment { id: NodeId, string: String },
}

impl Comment {
    pub fn new(string: impl Into<String>) -> Self {
        Comment::Comment {
            id: NodeId::fresh(),
            string: string.into(),
        }
    }

    pub fn id(&self) -> &NodeId {
        match self {
            Comment::Comment { id, .. } => id,
        }
    }

    pub fn string(&self) -> &str {
        match self {
            Comment::Comment { string, .. } => string,
        }
    }
}

// ── Borrowed node view ───────────────────────────────────────────────────

/// A borrowed view of any node, used for generic traversal and id lookup.
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNode<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Declaration(&'a Declaration),
    Expression(&'a Expression),
    Literal(&'a Literal),
    TypeAnnotation(&'a TypeAnnotation),
    FunctionParameter(&'a FunctionParameter),
    GenericParameter(&'a GenericParameter),
    EnumerationCase(&'a EnumerationCase),
    Argument(&'a FunctionCallArgument),
    Pattern(&'a Pattern),
    Identifier(&'a Identifier),
}

impl<'a> SyntaxNode<'a> {
    pub fn id(&self) -> &'a NodeId {
        match *self {
            SyntaxNode::Program(n) => &n.id,
            SyntaxNode::Statement(n) => n.id(),
            SyntaxNode::Declaration(n) => n.id(),
            SyntaxNode::Expression(n) => n.id(),
            SyntaxNode::Literal(n) => n.id(),
            SyntaxNode::TypeAnnotation(n) => n.id(),
            SyntaxNode::FunctionParameter(n) => n.id(),
            SyntaxNode::GenericParameter(n) => n.id(),
            SyntaxNode::EnumerationCase(n) => n.id(),
            SyntaxNode::Argument(n) => n.id(),
            SyntaxNode::Pattern(n) => &n.id,
            SyntaxNode::Identifier(n) => &n.id,
        }
    }

    /// The on-disk `type` tag of the node.
    pub fn kind(&self) -> &'static str {
        match *self {
            SyntaxNode::Program(_) => "program",
            SyntaxNode::Statement(n) => n.kind(),
            SyntaxNode::Declaration(n) => n.kind(),
            SyntaxNode::Expression(n) => n.kind(),
            SyntaxNode::Literal(n) => n.kind(),
            SyntaxNode::TypeAnnotation(n) => n.kind(),
            SyntaxNode::FunctionParameter(FunctionParameter::Parameter(_)) => "parameter",
            SyntaxNode::GenericParameter(GenericParameter::Parameter(_)) => "parameter",
            SyntaxNode::EnumerationCase(EnumerationCase::EnumerationCase(_)) => "enumerationCase",
            SyntaxNode::Argument(FunctionCallArgument::Argument(_)) => "argument",
            SyntaxNode::FunctionParameter(_)
            | SyntaxNode::GenericParameter(_)
            | SyntaxNode::EnumerationCase(_)
            | SyntaxNode::Argument(_) => "placeholder",
            SyntaxNode::Pattern(_) => "pattern",
            SyntaxNode::Identifier(_) => "identifier",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind() == "placeholder"
    }
}
