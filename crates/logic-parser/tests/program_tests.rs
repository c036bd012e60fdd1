//! `Program::join` and import expansion.

use logic_parser::ast::Declaration;
use logic_parser::{expand_imports, parse, CycleError, ImportError, Program};
use rustc_hash::FxHashMap;

fn names(program: &Program) -> Vec<String> {
    program
        .declarations()
        .filter_map(Declaration::name)
        .map(|p| p.name.clone())
        .collect()
}

fn modules(sources: &[(&str, &str)]) -> FxHashMap<String, Program> {
    sources
        .iter()
        .map(|(name, src)| (name.to_string(), parse(src).unwrap()))
        .collect()
}

#[test]
fn join_preserves_order_and_mints_new_id() {
    let prelude = parse("let a: Number = 1").unwrap();
    let user = parse("let b: Number = 2\nlet c: Number = 3").unwrap();
    let prelude_id = prelude.id.clone();

    let joined = Program::join([prelude, user]);
    assert_eq!(names(&joined), vec!["a", "b", "c"]);
    assert_ne!(joined.id, prelude_id);
}

#[test]
fn join_of_nothing_is_empty() {
    assert!(Program::join(Vec::new()).block.is_empty());
}

#[test]
fn imports_are_spliced_transitively_in_place() {
    let mut loader = modules(&[
        ("Colors", "import Base\nlet primary: Number = base"),
        ("Base", "let base: Number = 1"),
    ]);
    let program = parse("let before: Number = 0\nimport Colors\nlet after: Number = 2").unwrap();

    let expanded = expand_imports(program, &mut loader).unwrap();
    assert_eq!(names(&expanded), vec!["before", "base", "primary", "after"]);
}

#[test]
fn module_imported_twice_is_spliced_once() {
    let mut loader = modules(&[
        ("A", "import Shared\nlet a: Number = 1"),
        ("B", "import Shared\nlet b: Number = 2"),
        ("Shared", "let shared: Number = 0"),
    ]);
    let program = parse("import A\nimport B\nimport A").unwrap();

    let expanded = expand_imports(program, &mut loader).unwrap();
    assert_eq!(names(&expanded), vec!["shared", "a", "b"]);
}

#[test]
fn import_cycle_fails_with_path() {
    let mut loader = modules(&[("A", "import B"), ("B", "import A")]);
    let program = parse("import A").unwrap();

    let err = expand_imports(program, &mut loader).unwrap_err();
    assert_eq!(
        err,
        ImportError::Cycle(CycleError {
            cycle_path: vec!["A".into(), "B".into(), "A".into()]
        })
    );
    assert_eq!(err.to_string(), "import cycle detected: A -> B -> A");
}

#[test]
fn self_import_is_a_cycle() {
    let mut loader = modules(&[("Loop", "import Loop")]);
    let err = expand_imports(parse("import Loop").unwrap(), &mut loader).unwrap_err();
    assert_eq!(err.to_string(), "import cycle detected: Loop -> Loop");
}

#[test]
fn missing_module_is_reported() {
    let mut loader = |_: &str| -> Option<Program> { None };
    let err = expand_imports(parse("import Nowhere").unwrap(), &mut loader).unwrap_err();
    assert_eq!(
        err,
        ImportError::NotFound {
            name: "Nowhere".into()
        }
    );
}

#[test]
fn closure_loader_sees_each_module_once() {
    let mut requested = Vec::new();
    let mut loader = |name: &str| {
        requested.push(name.to_string());
        parse("let x: Number = 1").ok()
    };
    let program = parse("import A\nimport A").unwrap();
    let expanded = expand_imports(program, &mut loader).unwrap();
    assert_eq!(names(&expanded), vec!["x"]);
    assert_eq!(requested, vec!["A"]);
}
