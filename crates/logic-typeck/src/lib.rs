//! Logic type checker: scope resolution, constraint generation and
//! unification.
//!
//! # Architecture
//!
//! - [`bindings`]: index of every declaration by pattern id
//! - [`scope`]: identifier and member resolution
//! - [`ty`]: type representation (`Ty`, `TyVar`, `Scheme`)
//! - [`infer`]: constraint generation
//! - [`unify`]: union-find constraint solving
//! - [`error`]: unification errors
//! - [`diagnostics`]: ariadne rendering
//!
//! [`prelude`] is the builtin program every user program is joined with.

pub mod bindings;
pub mod diagnostics;
pub mod error;
pub mod infer;
pub mod scope;
pub mod ty;
pub mod unify;

use logic_parser::{ParseError, Program};

use crate::error::UnificationError;
use crate::infer::UnificationContext;
use crate::scope::ScopeContext;
use crate::ty::Ty;
use crate::unify::Substitution;

const PRELUDE_SOURCE: &str = include_str!("prelude.logic");

/// The prelude source text.
pub fn prelude_source() -> &'static str {
    PRELUDE_SOURCE
}

/// Parse the prelude: builtin value types, `Optional`, `Color`, `Shadow`,
/// `TextStyle` and the builtin functions the evaluator implements natively.
pub fn prelude() -> Result<Program, ParseError> {
    logic_parser::parse(PRELUDE_SOURCE)
}

/// Everything the checker learned about a program.
#[derive(Debug)]
pub struct TypeckResult {
    pub scope: ScopeContext,
    pub unification: UnificationContext,
    pub substitution: Result<Substitution, UnificationError>,
}

impl TypeckResult {
    pub fn has_errors(&self) -> bool {
        self.scope.has_errors() || self.substitution.is_err()
    }

    /// The solved type of an expression node.
    pub fn type_of(&self, id: &logic_parser::NodeId) -> Option<Ty> {
        let ty = self.unification.node_type(id)?;
        match &self.substitution {
            Ok(subst) => Some(subst.apply(ty)),
            Err(_) => Some(ty.clone()),
        }
    }
}

/// Resolve, generate constraints for and unify `program`.
pub fn check(program: &Program) -> TypeckResult {
    let scope = scope::build(program);
    let unification = infer::generate(program, &scope);
    let substitution = unify::unify(&unification.constraints);
    TypeckResult {
        scope,
        unification,
        substitution,
    }
}
