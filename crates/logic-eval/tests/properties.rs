//! Whole-pipeline properties over a corpus of programs:
//! - printing a program as text and parsing it back evaluates to the same
//!   values
//! - the solved substitution satisfies every generated constraint

use logic_eval::{evaluate, EvalOptions, EvaluationContext, Value};
use logic_fmt::PrintOptions;
use logic_parser::ast::{Declaration, Statement};
use logic_parser::{parse, Program};
use logic_typeck::ty::Ty;
use logic_typeck::unify::Substitution;
use logic_typeck::{check, prelude};

const CORPUS: &[&str] = &[
    r##"enum Colors {
  static let primary: Color = #color(css: "#123456")
  static let muted: Color = Color.saturate(color: #color(css: "#CC9999"), percent: 0.5)
}

let accent: Color = Colors.primary
let spacing: Number = Number.multiply(4, 2)
let label: String = String.concat("a", "b")"##,
    r##"struct Card {
  let width: Number = 100
  let title: String
  let shadow: Optional<Shadow> = Optional.none
}

let card: Card = Card(title: "hello")
let wide: Card = Card(width: 320, title: "wide", shadow: Optional.value(Shadow(blur: 4)))
let style: TextStyle = TextStyle(color: Optional.value(Colors.ink), fontWeight: FontWeight.w600)

enum Colors {
  static let ink: Color = #color(css: "black")
}"##,
    r#"func clamp(_ value: Number, max limit: Number = 10) -> Number {
  if value > limit {
    return limit
  }
  return value
}

func pick(_ flag: Boolean) -> String {
  let result: String = "no"
  if flag {
    result = "yes"
  }
  result
}

let a: Number = clamp(12)
let b: Number = clamp(3, max: 5)
let c: String = pick(Boolean.not(false))"#,
    r#"enum Direction {
  case up
  case down
  case offset(Number)
}

let heading: Direction = Direction.offset(Number.subtract(5, 1.5))
let sizes: Array<Number> = [1, 2, 3]
let second: Number = Array.at(sizes, 1)
let count: Number = Array.count(sizes)
let same: Boolean = Direction.up == Direction.up
let ordered: Boolean = "a" < "b"
let fallback: Number = unwrap(Optional.none, default: 7)"#,
];

struct Run {
    program: Program,
    user_start: usize,
    context: EvaluationContext,
}

impl Run {
    fn values(&self) -> Vec<(String, Value)> {
        self.program.block[self.user_start..]
            .iter()
            .filter_map(Statement::as_declaration)
            .filter_map(|d| match d {
                Declaration::Variable(v) => Some(v),
                _ => None,
            })
            .map(|v| {
                let value = self
                    .context
                    .get(&v.name.id)
                    .unwrap_or_else(|| panic!("`{}` was not evaluated", v.name.name));
                (v.name.name.clone(), value.clone())
            })
            .collect()
    }
}

fn run(user: Program) -> Run {
    let prelude = prelude().unwrap();
    let user_start = prelude.block.len();
    let program = Program::join([prelude, user]);
    let checked = check(&program);
    assert!(!checked.scope.has_errors(), "scope errors");
    let substitution = match &checked.substitution {
        Ok(substitution) => substitution,
        Err(err) => panic!("unification failed: {err}"),
    };
    let context = evaluate(
        &program,
        &checked.scope,
        &checked.unification,
        substitution,
        EvaluationContext::new(),
        &EvalOptions::default(),
    )
    .unwrap_or_else(|err| panic!("evaluation failed: {err}"));
    Run {
        program,
        user_start,
        context,
    }
}

#[test]
fn printed_text_evaluates_to_the_same_values() {
    for source in CORPUS {
        let original = parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
        let printed = logic_fmt::print(&original, &PrintOptions::default());
        let reparsed = parse(&printed)
            .unwrap_or_else(|e| panic!("printed text does not parse: {e}\n{printed}"));

        let before = run(original).values();
        let after = run(reparsed).values();
        assert_eq!(before.len(), after.len(), "{printed}");
        for ((name, a), (name_after, b)) in before.iter().zip(&after) {
            assert_eq!(name, name_after);
            assert!(a.same(b), "`{name}`: {a} became {b}\n{printed}");
        }
    }
}

/// Whether `tail` may flow where `head` is expected, following the rules
/// unification solves under: identical types, `WholeNumber` widening to
/// `Number`, a value promoted to `Optional`, and calls that pass a subset of
/// a function's arguments.
fn satisfied(head: &Ty, tail: &Ty) -> bool {
    if head == tail {
        return true;
    }
    match (head, tail) {
        (Ty::Con(expected, expected_args), Ty::Con(found, found_args)) => {
            if expected == found {
                return expected_args.len() == found_args.len()
                    && expected_args
                        .iter()
                        .zip(found_args)
                        .all(|(e, f)| satisfied(e, f));
            }
            if *head == Ty::number() && *tail == Ty::whole_number() {
                return true;
            }
            head.is_optional()
                && expected_args.len() == 1
                && !tail.is_optional()
                && satisfied(&expected_args[0], tail)
        }
        (Ty::Fun(expected_args, expected_ret), Ty::Fun(found_args, found_ret)) => {
            let expected_positional = expected_args.iter().filter(|a| a.label.is_none());
            let found_positional: Vec<_> =
                found_args.iter().filter(|a| a.label.is_none()).collect();
            let positional_ok = expected_positional
                .enumerate()
                .all(|(i, e)| match found_positional.get(i) {
                    Some(f) => satisfied(&e.ty, &f.ty),
                    None => e.has_default,
                });
            let labeled_ok = found_args.iter().filter(|a| a.label.is_some()).all(|f| {
                expected_args
                    .iter()
                    .find(|e| e.label == f.label)
                    .is_some_and(|e| satisfied(&e.ty, &f.ty))
            });
            positional_ok && labeled_ok && satisfied(expected_ret, found_ret)
        }
        _ => false,
    }
}

fn assert_sound(program: &Program) {
    let checked = check(program);
    let substitution: &Substitution = match &checked.substitution {
        Ok(substitution) => substitution,
        Err(err) => panic!("unification failed: {err}"),
    };
    for constraint in &checked.unification.constraints {
        let head = substitution.apply(&constraint.head);
        let tail = substitution.apply(&constraint.tail);
        assert!(
            satisfied(&head, &tail),
            "constraint at {} not satisfied: {head} vs {tail}",
            constraint.origin.as_str()
        );
    }
}

#[test]
fn substitution_satisfies_every_constraint() {
    assert_sound(&prelude().unwrap());
    for source in CORPUS {
        let user = parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
        assert_sound(&Program::join([prelude().unwrap(), user]));
    }
}

#[test]
fn substitution_is_idempotent() {
    for source in CORPUS {
        let user = parse(source).unwrap_or_else(|e| panic!("parse failed: {e}"));
        let program = Program::join([prelude().unwrap(), user]);
        let checked = check(&program);
        let Ok(substitution) = &checked.substitution else {
            panic!("unification failed");
        };
        for constraint in &checked.unification.constraints {
            let once = substitution.apply(&constraint.head);
            assert_eq!(substitution.apply(&once), once);
        }
    }
}
