//! Constraint solving.
//!
//! Constraints are solved in generation order against `ena`'s union-find
//! table. Both sides are resolved through the current bindings before they
//! are compared, so each constraint sees every binding made by the ones
//! before it. The first failure stops solving.

use std::collections::BTreeMap;

use ena::unify::InPlaceUnificationTable;
use logic_parser::NodeId;

use crate::error::UnificationError;
use crate::infer::Constraint;
use crate::ty::{FnArg, Ty, TyVar};

/// Solved bindings: every variable that unification bound (or merged with
/// another variable), mapped to its fully resolved type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Substitution(BTreeMap<TyVar, Ty>);

impl Substitution {
    pub fn get(&self, var: TyVar) -> Option<&Ty> {
        self.0.get(&var)
    }

    /// Replace every bound variable in `ty`.
    pub fn apply(&self, ty: &Ty) -> Ty {
        ty.substitute(&|v| self.0.get(&v).cloned())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TyVar, &Ty)> {
        self.0.iter()
    }
}

/// Solve `constraints` in order.
pub fn unify(constraints: &[Constraint]) -> Result<Substitution, UnificationError> {
    let mut unifier = Unifier {
        table: InPlaceUnificationTable::new(),
    };
    for constraint in constraints {
        unifier.ensure(&constraint.head);
        unifier.ensure(&constraint.tail);
        unifier.unify(&constraint.head, &constraint.tail, &constraint.origin)?;
    }
    Ok(unifier.substitution())
}

struct Unifier {
    table: InPlaceUnificationTable<TyVar>,
}

impl Unifier {
    /// Create table keys up to the highest variable in `ty`.
    fn ensure(&mut self, ty: &Ty) {
        for var in ty.free_vars() {
            while (self.table.len() as u32) <= var.0 {
                self.table.new_key(None);
            }
        }
    }

    fn resolve(&mut self, ty: &Ty) -> Ty {
        match ty {
            Ty::Var(v) => match self.table.probe_value(*v) {
                Some(inner) => self.resolve(&inner),
                None => Ty::Var(self.table.find(*v)),
            },
            Ty::Con(con, args) => Ty::Con(con.clone(), args.iter().map(|a| self.resolve(a)).collect()),
            Ty::Fun(args, ret) => Ty::Fun(
                args.iter()
                    .map(|a| FnArg {
                        label: a.label.clone(),
                        ty: self.resolve(&a.ty),
                        has_default: a.has_default,
                    })
                    .collect(),
                Box::new(self.resolve(ret)),
            ),
        }
    }

    fn substitution(mut self) -> Substitution {
        let mut map = BTreeMap::new();
        for index in 0..self.table.len() as u32 {
            let var = TyVar(index);
            let resolved = self.resolve(&Ty::Var(var));
            if resolved != Ty::Var(var) {
                map.insert(var, resolved);
            }
        }
        Substitution(map)
    }

    fn unify(&mut self, head: &Ty, tail: &Ty, origin: &NodeId) -> Result<(), UnificationError> {
        let head = self.resolve(head);
        let tail = self.resolve(tail);

        match (&head, &tail) {
            (Ty::Var(a), Ty::Var(b)) if a == b => Ok(()),

            (Ty::Var(a), Ty::Var(b)) => self
                .table
                .unify_var_var(*a, *b)
                .map_err(|(expected, found)| UnificationError::NameMismatch {
                    expected,
                    found,
                    origin: origin.clone(),
                }),

            (Ty::Var(var), ty) | (ty, Ty::Var(var)) => {
                if ty.free_vars().contains(var) {
                    return Err(UnificationError::InfiniteType {
                        var: *var,
                        ty: ty.clone(),
                        origin: origin.clone(),
                    });
                }
                self.table
                    .unify_var_value(*var, Some(ty.clone()))
                    .map_err(|(expected, found)| UnificationError::NameMismatch {
                        expected,
                        found,
                        origin: origin.clone(),
                    })
            }

            (Ty::Con(expected, expected_args), Ty::Con(found, found_args)) => {
                if expected == found {
                    if expected_args.len() != found_args.len() {
                        return Err(UnificationError::GenericArgumentsCountMismatch {
                            expected: head.clone(),
                            found: tail.clone(),
                            origin: origin.clone(),
                        });
                    }
                    for (e, f) in expected_args.iter().zip(found_args) {
                        self.unify(e, f, origin)?;
                    }
                    return Ok(());
                }
                // WholeNumber widens to Number, never the reverse.
                if head == Ty::number() && tail == Ty::whole_number() {
                    return Ok(());
                }
                if head.is_optional() && expected_args.len() == 1 && !tail.is_optional() {
                    return self.unify(&expected_args[0], &tail, origin);
                }
                Err(UnificationError::NameMismatch {
                    expected: head.clone(),
                    found: tail.clone(),
                    origin: origin.clone(),
                })
            }

            (Ty::Fun(expected_args, expected_ret), Ty::Fun(found_args, found_ret)) => {
                let expected_positional: Vec<&FnArg> =
                    expected_args.iter().filter(|a| a.label.is_none()).collect();
                let found_positional: Vec<&FnArg> =
                    found_args.iter().filter(|a| a.label.is_none()).collect();

                if found_positional.len() > expected_positional.len() {
                    let err = if expected_positional.is_empty() && !expected_args.is_empty() {
                        UnificationError::LabelMismatch {
                            expected: head.clone(),
                            found: tail.clone(),
                            origin: origin.clone(),
                        }
                    } else {
                        UnificationError::ArgumentCountMismatch {
                            expected: head.clone(),
                            found: tail.clone(),
                            origin: origin.clone(),
                        }
                    };
                    return Err(err);
                }
                let required = expected_positional
                    .iter()
                    .filter(|a| !a.has_default)
                    .count();
                if found_positional.len() < required {
                    return Err(UnificationError::ArgumentCountMismatch {
                        expected: head.clone(),
                        found: tail.clone(),
                        origin: origin.clone(),
                    });
                }
                for (e, f) in expected_positional.iter().zip(&found_positional) {
                    self.unify(&e.ty, &f.ty, origin)?;
                }

                for f in found_args.iter().filter(|a| a.label.is_some()) {
                    let Some(e) = expected_args.iter().find(|e| e.label == f.label) else {
                        return Err(UnificationError::LabelMismatch {
                            expected: head.clone(),
                            found: tail.clone(),
                            origin: origin.clone(),
                        });
                    };
                    self.unify(&e.ty, &f.ty, origin)?;
                }

                self.unify(expected_ret, found_ret, origin)
            }

            _ => Err(UnificationError::KindMismatch {
                expected: head.clone(),
                found: tail.clone(),
                origin: origin.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(n: u32) -> Ty {
        Ty::Var(TyVar(n))
    }

    fn c(head: Ty, tail: Ty) -> Constraint {
        Constraint {
            head,
            tail,
            origin: NodeId::new("origin"),
        }
    }

    #[test]
    fn binds_variables_transitively() {
        let subst = unify(&[c(var(0), var(1)), c(var(1), Ty::string())]).unwrap();
        assert_eq!(subst.apply(&var(0)), Ty::string());
        assert_eq!(subst.apply(&Ty::array(var(1))), Ty::array(Ty::string()));
    }

    #[test]
    fn unbound_variables_stay_unbound() {
        let subst = unify(&[c(var(0), Ty::number())]).unwrap();
        assert_eq!(subst.apply(&var(3)), var(3));
    }

    #[test]
    fn name_mismatch_reports_resolved_types() {
        let err = unify(&[c(var(0), Ty::number()), c(Ty::string(), var(0))]).unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: expected `String`, found `Number`");
        assert_eq!(err.origin().as_str(), "origin");
    }

    #[test]
    fn generic_argument_count_mismatch() {
        let err = unify(&[c(
            Ty::named("Pair", vec![Ty::number()]),
            Ty::named("Pair", vec![Ty::number(), Ty::number()]),
        )])
        .unwrap_err();
        assert!(matches!(
            err,
            UnificationError::GenericArgumentsCountMismatch { .. }
        ));
    }

    #[test]
    fn whole_number_widens_one_way() {
        assert!(unify(&[c(Ty::number(), Ty::whole_number())]).is_ok());
        assert!(unify(&[c(Ty::whole_number(), Ty::number())]).is_err());
    }

    #[test]
    fn optional_accepts_unwrapped_value() {
        let subst = unify(&[c(Ty::optional(var(0)), Ty::color())]).unwrap();
        assert_eq!(subst.apply(&var(0)), Ty::color());
        assert!(unify(&[c(Ty::color(), Ty::optional(Ty::color()))]).is_err());
    }

    #[test]
    fn labeled_arguments_pair_by_label() {
        let declared = Ty::fun(
            vec![
                FnArg::labeled("x", Ty::number()),
                FnArg::labeled("y", Ty::string()),
            ],
            Ty::bool(),
        );
        let call = Ty::fun(vec![FnArg::labeled("y", var(0))], var(1));
        let subst = unify(&[c(declared.clone(), call)]).unwrap();
        assert_eq!(subst.apply(&var(0)), Ty::string());
        assert_eq!(subst.apply(&var(1)), Ty::bool());

        let unknown = Ty::fun(vec![FnArg::labeled("z", var(0))], var(1));
        let err = unify(&[c(declared, unknown)]).unwrap_err();
        assert!(matches!(err, UnificationError::LabelMismatch { .. }));
    }

    #[test]
    fn extra_positional_argument() {
        let declared = Ty::fun(vec![FnArg::positional(Ty::number())], Ty::number());
        let call = Ty::fun(
            vec![FnArg::positional(var(0)), FnArg::positional(var(1))],
            var(2),
        );
        let err = unify(&[c(declared, call)]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "argument count mismatch: expected `(Number) -> Number`, found `(?0, ?1) -> ?2`"
        );
    }

    #[test]
    fn constructor_against_function_is_kind_mismatch() {
        let err = unify(&[c(
            Ty::number(),
            Ty::fun(Vec::new(), Ty::number()),
        )])
        .unwrap_err();
        assert!(matches!(err, UnificationError::KindMismatch { .. }));
    }

    #[test]
    fn occurs_check() {
        let err = unify(&[c(var(0), Ty::array(var(0)))]).unwrap_err();
        assert_eq!(err.to_string(), "infinite type: `?0` occurs in `Array<?0>`");
    }
}
