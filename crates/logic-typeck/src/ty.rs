//! Type representation for the Logic type system.
//!
//! Types are constructors (`Number`, `Optional<Color>`), function types with
//! optionally labeled arguments, or inference variables. Variables are
//! numbered per constraint-generation run; the `ena` table in
//! [`crate::unify`] keys on the same indices.

use std::fmt;

/// A type variable, identified by a `u32` index into the unification table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVar(pub u32);

/// A type constructor, identified by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyCon {
    pub name: String,
}

impl TyCon {
    pub fn new(name: impl Into<String>) -> Self {
        TyCon { name: name.into() }
    }
}

impl fmt::Display for TyCon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One argument of a function type. `label` is `None` for positional
/// arguments. `has_default` marks declared parameters a call may omit.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FnArg {
    pub label: Option<String>,
    pub ty: Ty,
    pub has_default: bool,
}

impl FnArg {
    pub fn positional(ty: Ty) -> Self {
        FnArg {
            label: None,
            ty,
            has_default: false,
        }
    }

    pub fn labeled(label: impl Into<String>, ty: Ty) -> Self {
        FnArg {
            label: Some(label.into()),
            ty,
            has_default: false,
        }
    }

    pub fn with_default(mut self, has_default: bool) -> Self {
        self.has_default = has_default;
        self
    }
}

/// A Logic type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    /// An inference variable.
    Var(TyVar),
    /// A named type applied to its generic arguments (empty when not generic).
    Con(TyCon, Vec<Ty>),
    /// A function type: `(args) -> return`.
    Fun(Vec<FnArg>, Box<Ty>),
}

impl Ty {
    pub fn named(name: impl Into<String>, args: Vec<Ty>) -> Ty {
        Ty::Con(TyCon::new(name), args)
    }

    pub fn number() -> Ty {
        Ty::named("Number", Vec::new())
    }

    pub fn whole_number() -> Ty {
        Ty::named("WholeNumber", Vec::new())
    }

    pub fn bool() -> Ty {
        Ty::named("Boolean", Vec::new())
    }

    pub fn string() -> Ty {
        Ty::named("String", Vec::new())
    }

    pub fn color() -> Ty {
        Ty::named("Color", Vec::new())
    }

    /// The type of statements and of functions without `-> T`.
    pub fn unit() -> Ty {
        Ty::named("Void", Vec::new())
    }

    pub fn optional(inner: Ty) -> Ty {
        Ty::named("Optional", vec![inner])
    }

    pub fn array(element: Ty) -> Ty {
        Ty::named("Array", vec![element])
    }

    pub fn fun(args: Vec<FnArg>, ret: Ty) -> Ty {
        Ty::Fun(args, Box::new(ret))
    }

    /// Constructor name, if this is a `Con`.
    pub fn con_name(&self) -> Option<&str> {
        match self {
            Ty::Con(con, _) => Some(&con.name),
            _ => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        self.con_name() == Some("Optional")
    }

    /// Replace variables according to `map`, leaving others untouched.
    pub fn substitute(&self, map: &impl Fn(TyVar) -> Option<Ty>) -> Ty {
        match self {
            Ty::Var(v) => map(*v).unwrap_or(Ty::Var(*v)),
            Ty::Con(con, args) => Ty::Con(
                con.clone(),
                args.iter().map(|a| a.substitute(map)).collect(),
            ),
            Ty::Fun(args, ret) => Ty::Fun(
                args.iter()
                    .map(|a| FnArg {
                        ty: a.ty.substitute(map),
                        ..a.clone()
                    })
                    .collect(),
                Box::new(ret.substitute(map)),
            ),
        }
    }

    /// Every variable in the type, in order of first occurrence.
    pub fn free_vars(&self) -> Vec<TyVar> {
        let mut out = Vec::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut Vec<TyVar>) {
        match self {
            Ty::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            Ty::Con(_, args) => args.iter().for_each(|a| a.collect_vars(out)),
            Ty::Fun(args, ret) => {
                args.iter().for_each(|a| a.ty.collect_vars(out));
                ret.collect_vars(out);
            }
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Var(v) => write!(f, "?{}", v.0),
            Ty::Con(con, args) => {
                write!(f, "{}", con)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", a)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Ty::Fun(args, ret) => {
                write!(f, "(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if let Some(label) = &a.label {
                        write!(f, "{}: ", label)?;
                    }
                    write!(f, "{}", a.ty)?;
                }
                write!(f, ") -> {}", ret)
            }
        }
    }
}

/// A polymorphic type scheme: a type with universally quantified variables.
///
/// Generic functions, records and enumerations bind their generic
/// parameters as `vars`; every reference instantiates them afresh.
#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    pub vars: Vec<TyVar>,
    pub ty: Ty,
}

impl Scheme {
    /// A monomorphic scheme (no quantified variables).
    pub fn mono(ty: Ty) -> Self {
        Scheme {
            vars: Vec::new(),
            ty,
        }
    }
}

// ── ena trait implementations ──────────────────────────────────────────

impl ena::unify::UnifyKey for TyVar {
    type Value = Option<Ty>;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        TyVar(u)
    }

    fn tag() -> &'static str {
        "TyVar"
    }
}

impl ena::unify::EqUnifyValue for Ty {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_generic_and_function_types() {
        let ty = Ty::fun(
            vec![
                FnArg::labeled("color", Ty::optional(Ty::color())),
                FnArg::positional(Ty::Var(TyVar(3))),
            ],
            Ty::array(Ty::number()),
        );
        assert_eq!(ty.to_string(), "(color: Optional<Color>, ?3) -> Array<Number>");
    }

    #[test]
    fn substitute_replaces_only_mapped_vars() {
        let ty = Ty::fun(
            vec![FnArg::positional(Ty::Var(TyVar(0)))],
            Ty::Var(TyVar(1)),
        );
        let out = ty.substitute(&|v| (v == TyVar(0)).then(Ty::string));
        assert_eq!(out.to_string(), "(String) -> ?1");
    }

    #[test]
    fn free_vars_in_order() {
        let ty = Ty::named(
            "Pair",
            vec![Ty::Var(TyVar(2)), Ty::Var(TyVar(0)), Ty::Var(TyVar(2))],
        );
        assert_eq!(ty.free_vars(), vec![TyVar(2), TyVar(0)]);
    }
}
