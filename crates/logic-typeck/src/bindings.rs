//! Index of every binding site in a program.
//!
//! Maps each declaration's pattern id to the declaration it names, and
//! namespace-level patterns to their qualified path (`["Colors", "primary"]`).
//! The resolver, the constraint generator and the evaluator all look
//! declarations up through this index instead of re-walking the tree.

use logic_parser::ast::{
    Declaration, EnumCase, EnumerationDeclaration, FunctionDeclaration, NamespaceDeclaration,
    NodeId, Parameter, Program, RecordDeclaration, Statement, VariableDeclaration,
};
use rustc_hash::FxHashMap;

/// The declaration a pattern id binds.
#[derive(Debug, Clone, Copy)]
pub enum Binding<'a> {
    Variable(&'a VariableDeclaration),
    Function(&'a FunctionDeclaration),
    Parameter(&'a Parameter),
    Record(&'a RecordDeclaration),
    Enumeration(&'a EnumerationDeclaration),
    Case {
        enumeration: &'a EnumerationDeclaration,
        case: &'a EnumCase,
    },
    Namespace(&'a NamespaceDeclaration),
}

impl Binding<'_> {
    /// Variables and parameters hold values whose fields can be accessed.
    pub fn is_value(&self) -> bool {
        matches!(self, Binding::Variable(_) | Binding::Parameter(_))
    }
}

#[derive(Debug, Default)]
pub struct Bindings<'a> {
    by_pattern: FxHashMap<NodeId, Binding<'a>>,
    paths: Vec<(Vec<String>, NodeId)>,
    records: FxHashMap<String, &'a RecordDeclaration>,
}

impl<'a> Bindings<'a> {
    pub fn build(program: &'a Program) -> Self {
        let mut bindings = Bindings::default();
        bindings.block(&program.block, &[], true);
        bindings
    }

    pub fn get(&self, pattern: &NodeId) -> Option<Binding<'a>> {
        self.by_pattern.get(pattern).copied()
    }

    /// Qualified paths of namespace-level declarations, in declaration order.
    pub fn paths(&self) -> &[(Vec<String>, NodeId)] {
        &self.paths
    }

    /// The qualified path of a namespace-level pattern.
    pub fn path_of(&self, pattern: &NodeId) -> Option<&[String]> {
        self.paths
            .iter()
            .find(|(_, id)| id == pattern)
            .map(|(path, _)| path.as_slice())
    }

    /// A record declaration by type name. The first declaration wins.
    pub fn record(&self, name: &str) -> Option<&'a RecordDeclaration> {
        self.records.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Binding<'a>)> {
        self.by_pattern.iter()
    }

    // ── Collection ─────────────────────────────────────────────────────

    fn block(&mut self, block: &'a [Statement], ns: &[String], qualified: bool) {
        for statement in block {
            match statement {
                Statement::Declaration { content, .. } => self.declaration(content, ns, qualified),
                Statement::Branch { block, .. } => self.block(block, ns, false),
                _ => {}
            }
        }
    }

    fn insert(&mut self, pattern: &NodeId, name: &str, binding: Binding<'a>, ns: &[String], qualified: bool) {
        self.by_pattern.insert(pattern.clone(), binding);
        if qualified {
            let mut path = ns.to_vec();
            path.push(name.to_string());
            self.paths.push((path, pattern.clone()));
        }
    }

    fn declaration(&mut self, declaration: &'a Declaration, ns: &[String], qualified: bool) {
        match declaration {
            Declaration::Variable(d) => {
                self.insert(&d.name.id, &d.name.name, Binding::Variable(d), ns, qualified);
            }
            Declaration::Function(d) => {
                self.insert(&d.name.id, &d.name.name, Binding::Function(d), ns, qualified);
                for param in d.parameters() {
                    self.by_pattern
                        .insert(param.local_name.id.clone(), Binding::Parameter(param));
                }
                self.block(&d.block, ns, false);
            }
            Declaration::Record(d) => {
                self.insert(&d.name.id, &d.name.name, Binding::Record(d), ns, qualified);
                self.records.entry(d.name.name.clone()).or_insert(d);
                let inner = child_ns(ns, &d.name.name);
                for nested in &d.declarations {
                    match nested {
                        // Fields are reached through values, never by path.
                        Declaration::Variable(field) => {
                            self.by_pattern
                                .insert(field.name.id.clone(), Binding::Variable(field));
                        }
                        _ => self.declaration(nested, &inner, qualified),
                    }
                }
            }
            Declaration::Enumeration(d) => {
                self.insert(&d.name.id, &d.name.name, Binding::Enumeration(d), ns, qualified);
                let inner = child_ns(ns, &d.name.name);
                for case in d.cases() {
                    let binding = Binding::Case {
                        enumeration: d,
                        case,
                    };
                    self.insert(&case.name.id, &case.name.name, binding, &inner, qualified);
                }
            }
            Declaration::Namespace(d) => {
                self.insert(&d.name.id, &d.name.name, Binding::Namespace(d), ns, qualified);
                let inner = child_ns(ns, &d.name.name);
                for nested in &d.declarations {
                    self.declaration(nested, &inner, qualified);
                }
            }
            Declaration::ImportDeclaration(_) | Declaration::Placeholder(_) => {}
        }
    }
}

fn child_ns(ns: &[String], name: &str) -> Vec<String> {
    let mut inner = ns.to_vec();
    inner.push(name.to_string());
    inner
}
