//! Logic evaluator: runtime values and a demand-driven, memoized
//! tree-walking interpreter over checked programs.
//!
//! [`evaluate`] takes the outputs of `logic_typeck::check` and computes a
//! [`Value`] for every namespace-level variable and expression. Body-less
//! prelude functions are implemented natively in [`builtins`].

pub mod builtins;
pub mod error;
pub mod eval;
pub mod value;

pub use error::EvaluationError;
pub use eval::{evaluate, EvalOptions, EvaluationContext, DEFAULT_MAX_CALL_DEPTH};
pub use value::{Function, Memory, Value};
