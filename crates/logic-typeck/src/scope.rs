//! Scope resolution: map every identifier and member expression to the
//! pattern it refers to.
//!
//! Resolution runs in two passes. The first registers every namespace-level
//! declaration under its qualified path, so references at namespace level
//! are order independent. The second walks every declaration and
//! expression once, keeping a stack of block scopes for function parameters
//! and body-level `let`s, which bind sequentially.
//!
//! Resolution never fails: unresolved references are collected in
//! [`ScopeContext::undefined_identifiers`] and
//! [`ScopeContext::undefined_member_expressions`].

use std::collections::BTreeSet;

use logic_parser::ast::{Declaration, Expression, Literal, MemberExpression, NodeId, Program, Statement};
use rustc_hash::FxHashMap;

use crate::bindings::{Binding, Bindings};

/// Builtin value types whose record declarations do not act as constructors.
pub const BUILTIN_VALUE_TYPES: &[&str] = &["Boolean", "Number", "WholeNumber", "String", "Array"];

/// A record field and the head name of its annotated type.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: String,
    pub type_name: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ScopeContext {
    /// Identifier or member expression id -> binding pattern id. For a
    /// field access chain `v.a.b` the base expression `v` is mapped.
    pub identifier_to_pattern: FxHashMap<NodeId, NodeId>,
    pub undefined_identifiers: BTreeSet<NodeId>,
    pub undefined_member_expressions: BTreeSet<NodeId>,
    /// Qualified path -> pattern id of every namespace-level declaration.
    pub namespace: FxHashMap<Vec<String>, NodeId>,
    /// Pattern id -> declared name.
    pub pattern_names: FxHashMap<NodeId, String>,
    /// Member expression id -> accessed field name, for member expressions
    /// that project a field out of a value.
    pub field_accesses: FxHashMap<NodeId, String>,
    /// Record type name -> fields in declaration order.
    pub record_fields: FxHashMap<String, Vec<Field>>,
}

impl ScopeContext {
    pub fn has_errors(&self) -> bool {
        !self.undefined_identifiers.is_empty() || !self.undefined_member_expressions.is_empty()
    }

    pub fn pattern_for(&self, expression: &NodeId) -> Option<&NodeId> {
        self.identifier_to_pattern.get(expression)
    }
}

/// Resolve every reference in `program`.
pub fn build(program: &Program) -> ScopeContext {
    let bindings = Bindings::build(program);
    let mut ctx = ScopeContext::default();
    let mut value_types = FxHashMap::default();

    for (pattern, binding) in bindings.iter() {
        let name = match binding {
            Binding::Variable(d) => {
                let type_name = d.annotation.as_ref().and_then(|a| a.name());
                value_types.insert(pattern.clone(), type_name.map(str::to_string));
                &d.name.name
            }
            Binding::Parameter(p) => {
                value_types.insert(pattern.clone(), p.annotation.name().map(str::to_string));
                &p.local_name.name
            }
            Binding::Function(d) => &d.name.name,
            Binding::Record(d) => &d.name.name,
            Binding::Enumeration(d) => &d.name.name,
            Binding::Case { case, .. } => &case.name.name,
            Binding::Namespace(d) => &d.name.name,
        };
        ctx.pattern_names.insert(pattern.clone(), name.clone());
    }

    for (path, pattern) in bindings.paths() {
        if let Some(Binding::Record(record)) = bindings.get(pattern) {
            if path.len() == 1 && BUILTIN_VALUE_TYPES.contains(&record.name.name.as_str()) {
                continue;
            }
        }
        ctx.namespace.entry(path.clone()).or_insert_with(|| pattern.clone());
    }

    for (_, binding) in bindings.iter() {
        let Binding::Record(declared) = binding else {
            continue;
        };
        if let Some(record) = bindings.record(&declared.name.name) {
            let fields = record
                .fields()
                .map(|f| Field {
                    name: f.name.name.clone(),
                    type_name: f.annotation.as_ref().and_then(|a| a.name()).map(str::to_string),
                })
                .collect();
            ctx.record_fields.insert(record.name.name.clone(), fields);
        }
    }

    let mut resolver = Resolver {
        ctx,
        value_types,
        scopes: Vec::new(),
        ns: Vec::new(),
    };
    resolver.block(&program.block);
    resolver.ctx
}

struct Resolver {
    ctx: ScopeContext,
    /// Pattern id of every variable and parameter -> head name of its
    /// annotated type.
    value_types: FxHashMap<NodeId, Option<String>>,
    scopes: Vec<FxHashMap<String, NodeId>>,
    ns: Vec<String>,
}

impl Resolver {
    // ── Lookup ─────────────────────────────────────────────────────────

    fn is_local(&self, name: &str) -> bool {
        self.scopes.iter().any(|s| s.contains_key(name))
    }

    fn lookup(&self, name: &str) -> Option<NodeId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.get(name).cloned())
            .or_else(|| self.qualified(&[name]))
    }

    /// Look a path up relative to each enclosing namespace, innermost first.
    fn qualified(&self, path: &[&str]) -> Option<NodeId> {
        (0..=self.ns.len()).rev().find_map(|depth| {
            let full: Vec<String> = self.ns[..depth]
                .iter()
                .cloned()
                .chain(path.iter().map(|s| s.to_string()))
                .collect();
            self.ctx.namespace.get(&full).cloned()
        })
    }

    fn bind(&mut self, name: &str, pattern: &NodeId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), pattern.clone());
        }
    }

    // ── Statements and declarations ────────────────────────────────────

    fn block(&mut self, block: &[Statement]) {
        for statement in block {
            match statement {
                Statement::Declaration { content, .. } => self.declaration(content),
                Statement::Expression { expression, .. } => self.expression(expression),
                Statement::ReturnStatement { expression, .. } => {
                    if let Some(e) = expression {
                        self.expression(e);
                    }
                }
                Statement::Branch {
                    condition, block, ..
                } => {
                    self.expression(condition);
                    self.scopes.push(FxHashMap::default());
                    self.block(block);
                    self.scopes.pop();
                }
                Statement::Placeholder { .. } => {}
            }
        }
    }

    fn declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Variable(d) => {
                if let Some(init) = &d.initializer {
                    self.expression(init);
                }
                self.bind(&d.name.name, &d.name.id);
            }
            Declaration::Function(d) => {
                self.bind(&d.name.name, &d.name.id);
                self.scopes.push(FxHashMap::default());
                for param in d.parameters() {
                    if let Some(default) = param.default_value.expression() {
                        self.expression(default);
                    }
                    self.bind(&param.local_name.name, &param.local_name.id);
                }
                self.block(&d.block);
                self.scopes.pop();
            }
            Declaration::Record(d) => {
                self.bind(&d.name.name, &d.name.id);
                self.ns.push(d.name.name.clone());
                for nested in &d.declarations {
                    match nested {
                        Declaration::Variable(field) => {
                            if let Some(init) = &field.initializer {
                                self.expression(init);
                            }
                        }
                        _ => self.declaration(nested),
                    }
                }
                self.ns.pop();
            }
            Declaration::Namespace(d) => {
                self.bind(&d.name.name, &d.name.id);
                self.ns.push(d.name.name.clone());
                for nested in &d.declarations {
                    self.declaration(nested);
                }
                self.ns.pop();
            }
            Declaration::Enumeration(d) => self.bind(&d.name.name, &d.name.id),
            Declaration::ImportDeclaration(_) | Declaration::Placeholder(_) => {}
        }
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn expression(&mut self, expression: &Expression) {
        match expression {
            Expression::IdentifierExpression(e) => {
                if e.identifier.is_placeholder {
                    return;
                }
                match self.lookup(&e.identifier.string) {
                    Some(pattern) => {
                        self.ctx.identifier_to_pattern.insert(e.id.clone(), pattern);
                    }
                    None => {
                        self.ctx.undefined_identifiers.insert(e.id.clone());
                    }
                }
            }
            Expression::MemberExpression(e) => self.member(e),
            Expression::FunctionCallExpression(e) => {
                self.expression(&e.expression);
                for arg in e.arguments() {
                    self.expression(&arg.expression);
                }
            }
            Expression::BinaryExpression(e) => {
                self.expression(&e.left);
                self.expression(&e.right);
            }
            Expression::LiteralExpression(e) => {
                if let Literal::Array { value, .. } = &e.literal {
                    for element in value {
                        self.expression(element);
                    }
                }
            }
            Expression::Placeholder(_) => {}
        }
    }

    fn member(&mut self, member: &MemberExpression) {
        let path = match member.expression.member_path() {
            Some(mut path) if !member.member_name.is_placeholder => {
                path.push(member.member_name.string.as_str());
                path
            }
            _ => {
                // Field access on a computed value; the type checker decides.
                self.expression(&member.expression);
                self.ctx
                    .field_accesses
                    .insert(member.id.clone(), member.member_name.string.clone());
                return;
            }
        };

        if !self.is_local(path[0]) {
            if let Some(pattern) = self.qualified(&path) {
                self.ctx.identifier_to_pattern.insert(member.id.clone(), pattern);
                return;
            }
        }

        // ids[j] is the expression covering path[..=j].
        let ids = chain_ids(member);
        for split in (1..path.len()).rev() {
            let base = if split == 1 {
                self.lookup(path[0])
            } else if self.is_local(path[0]) {
                None
            } else {
                self.qualified(&path[..split])
            };
            let Some(base) = base else { continue };
            let Some(base_type) = self.value_types.get(&base) else {
                continue;
            };
            if !self.fields_exist(base_type.as_deref(), &path[split..]) {
                break;
            }
            self.ctx
                .identifier_to_pattern
                .insert(ids[split - 1].clone(), base);
            for j in split..path.len() {
                self.ctx
                    .field_accesses
                    .insert(ids[j].clone(), path[j].to_string());
            }
            return;
        }

        self.ctx.undefined_member_expressions.insert(member.id.clone());
    }

    /// Walk `fields` through the record field lists. Types that are not
    /// known records accept any field.
    fn fields_exist(&self, base_type: Option<&str>, fields: &[&str]) -> bool {
        let mut current = base_type.map(str::to_string);
        for field in fields {
            let Some(type_name) = &current else {
                return true;
            };
            let Some(record) = self.ctx.record_fields.get(type_name) else {
                return true;
            };
            let Some(found) = record.iter().find(|f| f.name == *field) else {
                return false;
            };
            current = found.type_name.clone();
        }
        true
    }
}

/// Ids of the expressions along a member chain, root first.
fn chain_ids(member: &MemberExpression) -> Vec<NodeId> {
    let mut ids = vec![member.id.clone()];
    let mut current = &*member.expression;
    loop {
        match current {
            Expression::MemberExpression(m) => {
                ids.push(m.id.clone());
                current = &m.expression;
            }
            other => {
                ids.push(other.id().clone());
                break;
            }
        }
    }
    ids.reverse();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use logic_parser::ast::Declaration;
    use logic_parser::parse;

    fn initializer(program: &Program, index: usize) -> &Expression {
        let Some(Declaration::Variable(v)) = program.declarations().nth(index) else {
            panic!("expected a variable at {index}");
        };
        v.initializer.as_ref().unwrap()
    }

    #[test]
    fn identifier_resolves_to_namespace_level_variable() {
        let program = parse("let x: Number = y\nlet y: Number = 1").unwrap();
        let ctx = build(&program);
        let y_pattern = &program.declarations().nth(1).unwrap().name().unwrap().id;
        assert_eq!(ctx.pattern_for(initializer(&program, 0).id()), Some(y_pattern));
        assert!(!ctx.has_errors());
    }

    #[test]
    fn unresolved_identifier_is_recorded() {
        let program = parse("let x: Number = y").unwrap();
        let ctx = build(&program);
        let id = initializer(&program, 0).id().clone();
        assert_eq!(ctx.undefined_identifiers.iter().collect::<Vec<_>>(), vec![&id]);
        assert!(ctx.identifier_to_pattern.is_empty());
    }

    #[test]
    fn enum_case_resolves_by_qualified_path() {
        let program = parse("enum Mode { case light, dark }\nlet m: Mode = Mode.dark").unwrap();
        let ctx = build(&program);
        let pattern = ctx.pattern_for(initializer(&program, 1).id()).unwrap();
        assert_eq!(ctx.pattern_names[pattern], "dark");
    }

    #[test]
    fn sibling_in_namespace_resolves_unqualified() {
        let program = parse(
            "enum Colors {\n  static let a: Number = b\n  static let b: Number = 1\n}",
        )
        .unwrap();
        let ctx = build(&program);
        assert!(!ctx.has_errors());
        assert_eq!(ctx.identifier_to_pattern.len(), 1);
    }

    #[test]
    fn field_access_is_validated_against_record() {
        let program = parse(
            "struct P { let x: Number }\nlet p: P = P(x: 1)\nlet a: Number = p.x\nlet b: Number = p.y",
        )
        .unwrap();
        let ctx = build(&program);
        let good = initializer(&program, 2);
        let bad = initializer(&program, 3);
        assert_eq!(ctx.field_accesses.get(good.id()).map(String::as_str), Some("x"));
        assert_eq!(
            ctx.undefined_member_expressions.iter().collect::<Vec<_>>(),
            vec![bad.id()]
        );
        assert!(ctx.undefined_identifiers.is_empty());
    }

    #[test]
    fn locals_are_sequential() {
        let program = parse(
            "func f() -> Number {\n  let a: Number = b\n  let b: Number = 1\n  return b\n}",
        )
        .unwrap();
        let ctx = build(&program);
        assert_eq!(ctx.undefined_identifiers.len(), 1);
        assert_eq!(ctx.identifier_to_pattern.len(), 1);
    }

    #[test]
    fn parameters_shadow_namespace_declarations() {
        let program = parse("let a: Number = 1\nfunc f(a: String) -> String { return a }").unwrap();
        let ctx = build(&program);
        let Some(Declaration::Function(f)) = program.declarations().nth(1) else {
            panic!("expected a function");
        };
        let param = &f.parameters().next().unwrap().local_name.id;
        assert!(ctx.identifier_to_pattern.values().any(|p| p == param));
    }

    #[test]
    fn builtin_value_types_are_not_constructors() {
        let program = parse(
            "struct Number {\n  static func add(_ a: Number, _ b: Number) -> Number {}\n}\nlet n: Number = Number.add(1, 2)\nlet m: Number = Number",
        )
        .unwrap();
        let ctx = build(&program);
        assert!(ctx.namespace.contains_key(&vec!["Number".to_string(), "add".to_string()]));
        assert!(!ctx.namespace.contains_key(&vec!["Number".to_string()]));
        assert_eq!(ctx.undefined_identifiers.len(), 1);
    }
}
