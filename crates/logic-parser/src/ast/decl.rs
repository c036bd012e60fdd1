//! Declarations: imports, variables, functions, enumerations, records and
//! namespaces, plus their parameter/case/generic parts.

use serde::{Deserialize, Serialize};

use super::{Comment, Expression, NodeId, Pattern, Placeholder, Statement, TypeAnnotation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Declaration {
    ImportDeclaration(ImportDeclaration),
    Variable(VariableDeclaration),
    Function(FunctionDeclaration),
    Enumeration(EnumerationDeclaration),
    Record(RecordDeclaration),
    Namespace(NamespaceDeclaration),
    Placeholder(Placeholder),
}

impl Declaration {
    pub fn id(&self) -> &NodeId {
        match self {
            Declaration::ImportDeclaration(d) => &d.id,
            Declaration::Variable(d) => &d.id,
            Declaration::Function(d) => &d.id,
            Declaration::Enumeration(d) => &d.id,
            Declaration::Record(d) => &d.id,
            Declaration::Namespace(d) => &d.id,
            Declaration::Placeholder(p) => &p.id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Declaration::ImportDeclaration(_) => "importDeclaration",
            Declaration::Variable(_) => "variable",
            Declaration::Function(_) => "function",
            Declaration::Enumeration(_) => "enumeration",
            Declaration::Record(_) => "record",
            Declaration::Namespace(_) => "namespace",
            Declaration::Placeholder(_) => "placeholder",
        }
    }

    /// The pattern the declaration binds, if any.
    pub fn name(&self) -> Option<&Pattern> {
        match self {
            Declaration::ImportDeclaration(d) => Some(&d.name),
            Declaration::Variable(d) => Some(&d.name),
            Declaration::Function(d) => Some(&d.name),
            Declaration::Enumeration(d) => Some(&d.name),
            Declaration::Record(d) => Some(&d.name),
            Declaration::Namespace(d) => Some(&d.name),
            Declaration::Placeholder(_) => None,
        }
    }

    pub fn comment(&self) -> Option<&Comment> {
        match self {
            Declaration::Variable(d) => d.comment.as_ref(),
            Declaration::Function(d) => d.comment.as_ref(),
            Declaration::Enumeration(d) => d.comment.as_ref(),
            Declaration::Record(d) => d.comment.as_ref(),
            Declaration::Namespace(d) => d.comment.as_ref(),
            Declaration::ImportDeclaration(_) | Declaration::Placeholder(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Declaration::Placeholder(_))
    }
}

/// `import Name`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDeclaration {
    pub id: NodeId,
    pub name: Pattern,
}

/// `let name: Annotation = initializer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub name: Pattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<TypeAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Expression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
}

/// `func name<T>(label local: Type = default) -> ReturnType { block }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDeclaration {
    pub id: NodeId,
    pub name: Pattern,
    pub return_type: TypeAnnotation,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(default)]
    pub parameters: Vec<FunctionParameter>,
    #[serde(default)]
    pub block: Vec<Statement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
}

impl FunctionDeclaration {
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter_map(|p| match p {
            FunctionParameter::Parameter(p) => Some(p),
            FunctionParameter::Placeholder(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum FunctionParameter {
    Parameter(Parameter),
    Placeholder(Placeholder),
}

impl FunctionParameter {
    pub fn id(&self) -> &NodeId {
        match self {
            FunctionParameter::Parameter(p) => &p.id,
            FunctionParameter::Placeholder(p) => &p.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: NodeId,
    /// The call-site label. `None` means the local name is the label;
    /// `Some("_")` means the argument is positional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_name: Option<String>,
    pub local_name: Pattern,
    pub annotation: TypeAnnotation,
    pub default_value: DefaultValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
}

impl Parameter {
    /// The label a call must use for this parameter, `None` when positional.
    pub fn label(&self) -> Option<&str> {
        match self.external_name.as_deref() {
            Some("_") => None,
            Some(label) => Some(label),
            None => Some(&self.local_name.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum DefaultValue {
    None { id: NodeId },
    Value { id: NodeId, expression: Expression },
}

impl DefaultValue {
    pub fn none() -> Self {
        DefaultValue::None { id: NodeId::fresh() }
    }

    pub fn expression(&self) -> Option<&Expression> {
        match self {
            DefaultValue::None { .. } => None,
            DefaultValue::Value { expression, .. } => Some(expression),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum GenericParameter {
    Parameter(GenericParameterData),
    Placeholder(Placeholder),
}

impl GenericParameter {
    pub fn id(&self) -> &NodeId {
        match self {
            GenericParameter::Parameter(p) => &p.id,
            GenericParameter::Placeholder(p) => &p.id,
        }
    }

    pub fn name(&self) -> Option<&Pattern> {
        match self {
            GenericParameter::Parameter(p) => Some(&p.name),
            GenericParameter::Placeholder(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericParameterData {
    pub id: NodeId,
    pub name: Pattern,
}

/// `enum Name<T> { case a(T) ... }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumerationDeclaration {
    pub id: NodeId,
    pub name: Pattern,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(default)]
    pub cases: Vec<EnumerationCase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
}

impl EnumerationDeclaration {
    pub fn cases(&self) -> impl Iterator<Item = &EnumCase> {
        self.cases.iter().filter_map(|c| match c {
            EnumerationCase::EnumerationCase(c) => Some(c),
            EnumerationCase::Placeholder(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum EnumerationCase {
    EnumerationCase(EnumCase),
    Placeholder(Placeholder),
}

impl EnumerationCase {
    pub fn id(&self) -> &NodeId {
        match self {
            EnumerationCase::EnumerationCase(c) => &c.id,
            EnumerationCase::Placeholder(p) => &p.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumCase {
    pub id: NodeId,
    pub name: Pattern,
    #[serde(default)]
    pub associated_value_types: Vec<TypeAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
}

/// `struct Name<T> { declarations }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDeclaration {
    pub id: NodeId,
    pub name: Pattern,
    #[serde(default)]
    pub generic_parameters: Vec<GenericParameter>,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
}

impl RecordDeclaration {
    /// The stored fields: variable declarations, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.declarations.iter().filter_map(|d| match d {
            Declaration::Variable(v) => Some(v),
            _ => None,
        })
    }
}

/// A caseless `enum Name { ... }` used purely for grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespaceDeclaration {
    pub id: NodeId,
    pub name: Pattern,
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<Comment>,
}

/// Names of the generic parameters, skipping placeholders.
pub fn generic_names(params: &[GenericParameter]) -> Vec<&str> {
    params
        .iter()
        .filter_map(|p| p.name().map(|n| n.name.as_str()))
        .collect()
}
