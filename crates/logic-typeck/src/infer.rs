//! Constraint generation.
//!
//! Walks the program once to assign every pattern a type scheme, then again
//! to give every expression a type and emit `head = tail` constraints in
//! evaluation order. No constraint is solved here; see [`crate::unify`].

use logic_parser::ast::{
    generic_names, Declaration, Expression, GenericParameter, Literal, NodeId, Program,
    Statement, TypeAnnotation,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::bindings::Bindings;
use crate::scope::ScopeContext;
use crate::ty::{FnArg, Scheme, Ty, TyVar};

/// One equation between an expected (`head`) and a found (`tail`) type.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub head: Ty,
    pub tail: Ty,
    pub origin: NodeId,
}

#[derive(Clone, Debug, Default)]
pub struct UnificationContext {
    pub constraints: Vec<Constraint>,
    /// Expression id -> its (unsolved) type.
    pub nodes: FxHashMap<NodeId, Ty>,
    /// Pattern id -> its type scheme.
    pub pattern_types: FxHashMap<NodeId, Scheme>,
    pub var_count: u32,
}

impl UnificationContext {
    pub fn node_type(&self, id: &NodeId) -> Option<&Ty> {
        self.nodes.get(id)
    }
}

type Generics = FxHashMap<String, Ty>;

/// Generate constraints for every expression in `program`.
pub fn generate(program: &Program, scope: &ScopeContext) -> UnificationContext {
    let bindings = Bindings::build(program);
    let mut gen = Generator {
        ctx: UnificationContext::default(),
        scope,
        bindings: &bindings,
        unconstrained: FxHashSet::default(),
        return_types: Vec::new(),
    };
    let root = Generics::default();
    for declaration in program.declarations() {
        gen.declare(declaration, &root);
    }
    gen.block(&program.block, &root);
    gen.ctx
}

struct Generator<'a> {
    ctx: UnificationContext,
    scope: &'a ScopeContext,
    bindings: &'a Bindings<'a>,
    /// Variables standing in for unresolved references.
    unconstrained: FxHashSet<TyVar>,
    /// Return type of each enclosing function, innermost last.
    return_types: Vec<Ty>,
}

impl Generator<'_> {
    fn fresh(&mut self) -> Ty {
        let var = TyVar(self.ctx.var_count);
        self.ctx.var_count += 1;
        Ty::Var(var)
    }

    fn unresolved(&mut self) -> Ty {
        let ty = self.fresh();
        if let Ty::Var(v) = ty {
            self.unconstrained.insert(v);
        }
        ty
    }

    fn constrain(&mut self, head: Ty, tail: Ty, origin: &NodeId) {
        let skip = |ty: &Ty| matches!(ty, Ty::Var(v) if self.unconstrained.contains(v));
        if skip(&head) || skip(&tail) {
            return;
        }
        self.ctx.constraints.push(Constraint {
            head,
            tail,
            origin: origin.clone(),
        });
    }

    /// Bind fresh variables for `params`, on top of the enclosing generics.
    fn generics(&mut self, params: &[GenericParameter], outer: &Generics) -> (Generics, Vec<TyVar>) {
        let mut env = outer.clone();
        let mut vars = Vec::new();
        for name in generic_names(params) {
            let ty = self.fresh();
            if let Ty::Var(v) = ty {
                vars.push(v);
            }
            env.insert(name.to_string(), ty);
        }
        (env, vars)
    }

    /// The generics a declaration bound in the first pass, recovered from
    /// its scheme.
    fn declared_generics(&self, pattern: &NodeId, params: &[GenericParameter], outer: &Generics) -> Generics {
        let mut env = outer.clone();
        if let Some(scheme) = self.ctx.pattern_types.get(pattern) {
            for (name, var) in generic_names(params).into_iter().zip(&scheme.vars) {
                env.insert(name.to_string(), Ty::Var(*var));
            }
        }
        env
    }

    fn annotation(&mut self, annotation: &TypeAnnotation, generics: &Generics) -> Ty {
        match annotation {
            TypeAnnotation::TypeIdentifier {
                identifier,
                generic_arguments,
                ..
            } => {
                if generic_arguments.is_empty() {
                    if let Some(ty) = generics.get(&identifier.string) {
                        return ty.clone();
                    }
                }
                let args = generic_arguments
                    .iter()
                    .map(|a| self.annotation(a, generics))
                    .collect();
                Ty::named(identifier.string.clone(), args)
            }
            TypeAnnotation::FunctionType {
                return_type,
                argument_types,
                ..
            } => {
                let args = argument_types
                    .iter()
                    .map(|a| FnArg::positional(self.annotation(a, generics)))
                    .collect();
                let ret = self.annotation(return_type, generics);
                Ty::fun(args, ret)
            }
            TypeAnnotation::Placeholder { .. } => self.fresh(),
        }
    }

    fn instantiate(&mut self, pattern: &NodeId) -> Ty {
        let Some(scheme) = self.ctx.pattern_types.get(pattern).cloned() else {
            return self.fresh();
        };
        if scheme.vars.is_empty() {
            return scheme.ty;
        }
        let fresh: Vec<(TyVar, Ty)> = scheme.vars.iter().map(|v| (*v, self.fresh())).collect();
        scheme
            .ty
            .substitute(&|v| fresh.iter().find(|(from, _)| *from == v).map(|(_, to)| to.clone()))
    }

    // ── Pass 1: schemes ────────────────────────────────────────────────

    fn declare(&mut self, declaration: &Declaration, outer: &Generics) {
        match declaration {
            Declaration::Variable(d) => {
                let ty = match &d.annotation {
                    Some(a) => self.annotation(a, outer),
                    None => self.fresh(),
                };
                self.ctx
                    .pattern_types
                    .insert(d.name.id.clone(), Scheme::mono(ty));
            }
            Declaration::Function(d) => {
                let (env, vars) = self.generics(&d.generic_parameters, outer);
                let mut args = Vec::new();
                for param in d.parameters() {
                    let ty = self.annotation(&param.annotation, &env);
                    self.ctx
                        .pattern_types
                        .insert(param.local_name.id.clone(), Scheme::mono(ty.clone()));
                    args.push(FnArg {
                        label: param.label().map(str::to_string),
                        ty,
                        has_default: param.default_value.expression().is_some(),
                    });
                }
                let ret = self.annotation(&d.return_type, &env);
                self.ctx.pattern_types.insert(
                    d.name.id.clone(),
                    Scheme {
                        vars,
                        ty: Ty::fun(args, ret),
                    },
                );
            }
            Declaration::Record(d) => {
                let (env, vars) = self.generics(&d.generic_parameters, outer);
                let this = Ty::named(
                    d.name.name.clone(),
                    vars.iter().map(|v| Ty::Var(*v)).collect(),
                );
                let mut args = Vec::new();
                for nested in &d.declarations {
                    match nested {
                        Declaration::Variable(field) => {
                            let ty = match &field.annotation {
                                Some(a) => self.annotation(a, &env),
                                None => self.fresh(),
                            };
                            self.ctx
                                .pattern_types
                                .insert(field.name.id.clone(), Scheme::mono(ty.clone()));
                            args.push(
                                FnArg::labeled(field.name.name.clone(), ty)
                                    .with_default(field.initializer.is_some()),
                            );
                        }
                        other => self.declare(other, &env),
                    }
                }
                self.ctx.pattern_types.insert(
                    d.name.id.clone(),
                    Scheme {
                        vars,
                        ty: Ty::fun(args, this),
                    },
                );
            }
            Declaration::Enumeration(d) => {
                let (env, vars) = self.generics(&d.generic_parameters, outer);
                let this = Ty::named(
                    d.name.name.clone(),
                    vars.iter().map(|v| Ty::Var(*v)).collect(),
                );
                for case in d.cases() {
                    let ty = if case.associated_value_types.is_empty() {
                        this.clone()
                    } else {
                        let args = case
                            .associated_value_types
                            .iter()
                            .map(|a| FnArg::positional(self.annotation(a, &env)))
                            .collect();
                        Ty::fun(args, this.clone())
                    };
                    self.ctx.pattern_types.insert(
                        case.name.id.clone(),
                        Scheme {
                            vars: vars.clone(),
                            ty,
                        },
                    );
                }
                self.ctx
                    .pattern_types
                    .insert(d.name.id.clone(), Scheme { vars, ty: this });
            }
            Declaration::Namespace(d) => {
                self.ctx.pattern_types.insert(
                    d.name.id.clone(),
                    Scheme::mono(Ty::named(d.name.name.clone(), Vec::new())),
                );
                for nested in &d.declarations {
                    self.declare(nested, outer);
                }
            }
            Declaration::ImportDeclaration(_) | Declaration::Placeholder(_) => {}
        }
    }

    // ── Pass 2: constraints ────────────────────────────────────────────

    fn block(&mut self, block: &[Statement], generics: &Generics) {
        for statement in block {
            match statement {
                Statement::Declaration { content, .. } => {
                    let local = !self.return_types.is_empty();
                    self.declaration(content, generics, local);
                }
                Statement::Expression { expression, .. } => {
                    self.expression(expression);
                }
                Statement::ReturnStatement { id, expression } => {
                    let found = match expression {
                        Some(e) => self.expression(e),
                        None => Ty::unit(),
                    };
                    if let Some(expected) = self.return_types.last().cloned() {
                        let origin = expression.as_ref().map(|e| e.id()).unwrap_or(id);
                        self.constrain(expected, found, origin);
                    }
                }
                Statement::Branch {
                    condition, block, ..
                } => {
                    let found = self.expression(condition);
                    self.constrain(Ty::bool(), found, condition.id());
                    self.block(block, generics);
                }
                Statement::Placeholder { .. } => {}
            }
        }
    }

    fn declaration(&mut self, declaration: &Declaration, generics: &Generics, local: bool) {
        match declaration {
            Declaration::Variable(d) => {
                let found = d.initializer.as_ref().map(|init| self.expression(init));
                if local {
                    let ty = match (&d.annotation, &found) {
                        (Some(a), _) => self.annotation(a, generics),
                        (None, Some(found)) => found.clone(),
                        (None, None) => self.fresh(),
                    };
                    self.ctx
                        .pattern_types
                        .insert(d.name.id.clone(), Scheme::mono(ty));
                }
                if let (Some(found), Some(init)) = (found, &d.initializer) {
                    if let Some(expected) = self.ctx.pattern_types.get(&d.name.id) {
                        let expected = expected.ty.clone();
                        self.constrain(expected, found, init.id());
                    }
                }
            }
            Declaration::Function(d) => {
                if local {
                    self.declare(declaration, generics);
                }
                let env = self.declared_generics(&d.name.id, &d.generic_parameters, generics);
                for param in d.parameters() {
                    if let Some(default) = param.default_value.expression() {
                        let found = self.expression(default);
                        if let Some(expected) = self.ctx.pattern_types.get(&param.local_name.id) {
                            let expected = expected.ty.clone();
                            self.constrain(expected, found, default.id());
                        }
                    }
                }
                let ret = match self.ctx.pattern_types.get(&d.name.id).map(|s| &s.ty) {
                    Some(Ty::Fun(_, ret)) => (**ret).clone(),
                    _ => Ty::unit(),
                };
                self.return_types.push(ret);
                self.block(&d.block, &env);
                self.return_types.pop();
            }
            Declaration::Record(d) => {
                if local {
                    self.declare(declaration, generics);
                }
                let env = self.declared_generics(&d.name.id, &d.generic_parameters, generics);
                for nested in &d.declarations {
                    match nested {
                        Declaration::Variable(field) => {
                            let Some(init) = &field.initializer else {
                                continue;
                            };
                            let found = self.expression(init);
                            if let Some(expected) = self.ctx.pattern_types.get(&field.name.id) {
                                let expected = expected.ty.clone();
                                self.constrain(expected, found, init.id());
                            }
                        }
                        other => self.declaration(other, &env, false),
                    }
                }
            }
            Declaration::Enumeration(_) => {
                if local {
                    self.declare(declaration, generics);
                }
            }
            Declaration::Namespace(d) => {
                if local {
                    self.declare(declaration, generics);
                }
                for nested in &d.declarations {
                    self.declaration(nested, generics, false);
                }
            }
            Declaration::ImportDeclaration(_) | Declaration::Placeholder(_) => {}
        }
    }

    fn expression(&mut self, expression: &Expression) -> Ty {
        let ty = match expression {
            Expression::IdentifierExpression(e) => match self.scope.pattern_for(&e.id) {
                Some(pattern) => self.instantiate(pattern),
                None => self.unresolved(),
            },
            Expression::MemberExpression(e) => {
                if let Some(pattern) = self.scope.pattern_for(&e.id) {
                    self.instantiate(pattern)
                } else if let Some(field) = self.scope.field_accesses.get(&e.id) {
                    let base = self.expression(&e.expression);
                    self.field_type(&base, field)
                } else {
                    self.unresolved()
                }
            }
            Expression::FunctionCallExpression(e) => {
                let callee = self.expression(&e.expression);
                let mut params = Vec::new();
                let mut found = Vec::new();
                for arg in e.arguments() {
                    let arg_ty = self.expression(&arg.expression);
                    let param = self.fresh();
                    params.push(FnArg {
                        label: arg.label.clone(),
                        ty: param.clone(),
                        has_default: false,
                    });
                    found.push((param, arg_ty, arg.expression.id()));
                }
                let ret = self.fresh();
                self.constrain(callee, Ty::fun(params, ret.clone()), &e.id);
                for (param, arg_ty, origin) in found {
                    self.constrain(param, arg_ty, origin);
                }
                ret
            }
            Expression::BinaryExpression(e) => {
                let left = self.expression(&e.left);
                let right = self.expression(&e.right);
                self.constrain(left, right, &e.id);
                if e.op.is_assignment() {
                    Ty::unit()
                } else {
                    Ty::bool()
                }
            }
            Expression::LiteralExpression(e) => {
                let ty = self.literal(&e.literal);
                self.ctx.nodes.insert(e.literal.id().clone(), ty.clone());
                ty
            }
            Expression::Placeholder(_) => self.fresh(),
        };
        self.ctx.nodes.insert(expression.id().clone(), ty.clone());
        ty
    }

    fn literal(&mut self, literal: &Literal) -> Ty {
        match literal {
            Literal::Boolean { .. } => Ty::bool(),
            Literal::Number { .. } => Ty::number(),
            Literal::String { .. } => Ty::string(),
            Literal::Color { .. } => Ty::color(),
            Literal::Array { value, .. } => {
                let element = self.fresh();
                for item in value {
                    let found = self.expression(item);
                    self.constrain(element.clone(), found, item.id());
                }
                Ty::array(element)
            }
        }
    }

    /// The type of `field` on a value of type `base`, when `base` is a known
    /// record; a fresh variable otherwise.
    fn field_type(&mut self, base: &Ty, field: &str) -> Ty {
        let Ty::Con(con, args) = base else {
            return self.fresh();
        };
        let Some(record) = self.bindings.record(&con.name) else {
            return self.fresh();
        };
        let Some(declared) = record.fields().find(|f| f.name.name == field) else {
            return self.fresh();
        };
        let Some(field_ty) = self.ctx.pattern_types.get(&declared.name.id).map(|s| s.ty.clone()) else {
            return self.fresh();
        };
        let Some(vars) = self.ctx.pattern_types.get(&record.name.id).map(|s| s.vars.clone()) else {
            return field_ty;
        };
        if vars.len() != args.len() {
            return field_ty;
        }
        field_ty.substitute(&|v| {
            vars.iter()
                .position(|var| *var == v)
                .map(|i| args[i].clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope;
    use logic_parser::parse;

    fn constraints(source: &str) -> Vec<String> {
        let program = parse(source).unwrap();
        let scope = scope::build(&program);
        generate(&program, &scope)
            .constraints
            .iter()
            .map(|c| format!("{} = {}", c.head, c.tail))
            .collect()
    }

    #[test]
    fn annotated_variable_constrains_initializer() {
        assert_eq!(constraints("let x: Number = 5"), vec!["Number = Number"]);
    }

    #[test]
    fn call_constrains_callee_then_arguments() {
        let out = constraints(
            "func pick(_ a: Number, or b: Number) -> Number { return a }\nlet x: Number = pick(1, or: 2)",
        );
        assert_eq!(
            out,
            vec![
                "Number = Number",
                "(Number, or: Number) -> Number = (?0, or: ?1) -> ?2",
                "?0 = Number",
                "?1 = Number",
                "Number = ?2",
            ]
        );
    }

    #[test]
    fn unresolved_reference_is_never_constrained() {
        assert!(constraints("let x: Number = y").is_empty());
    }

    #[test]
    fn generic_enum_case_is_instantiated_per_use() {
        let out = constraints(
            "enum Opt<T> { case some(T)\n case none }\nlet a: Opt<Number> = Opt.some(1)\nlet b: Opt<String> = Opt.none",
        );
        assert_eq!(
            out,
            vec![
                "(?1) -> Opt<?1> = (?2) -> ?3",
                "?2 = Number",
                "Opt<Number> = ?3",
                "Opt<String> = Opt<?4>",
            ]
        );
    }

    #[test]
    fn array_literal_constrains_each_element() {
        let out = constraints("let a: Array<Number> = [1, 2]");
        assert_eq!(
            out,
            vec!["?0 = Number", "?0 = Number", "Array<Number> = Array<?0>"]
        );
    }
}
