//! End-to-end tests for the logicc binary.
//!
//! Each test writes documents into a temp directory and runs one of the
//! subcommands:
//! - `logicc check` passes clean documents and reports scope, type and parse
//!   errors (human-readable and `--json`)
//! - `logicc eval` prints top-level variables and honors `logic.toml` limits
//! - `logicc convert` re-encodes between text, JSON and XML
//! - imports resolve through `logic.toml` module paths

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Locate the logicc binary built by cargo.
fn logicc_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_logicc"))
}

fn logicc(args: &[&str]) -> Output {
    Command::new(logicc_bin())
        .args(args)
        .output()
        .expect("failed to run logicc")
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Every JSON object written to stderr, in order.
fn json_diagnostics(output: &Output) -> Vec<serde_json::Value> {
    let stderr = stderr(output);
    serde_json::Deserializer::from_str(&stderr)
        .into_iter::<serde_json::Value>()
        .collect::<Result<_, _>>()
        .expect("stderr is not a stream of JSON objects")
}

const TOKENS: &str = r##"enum Colors {
  static let primary: Color = #color(css: "#123456")
}

let accent: Color = Colors.primary

let spacing: Number = Number.multiply(4, 2)

let label: String = String.concat("a", "b")
"##;

// ── check ────────────────────────────────────────────────────────────

#[test]
fn check_accepts_a_valid_document() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "tokens.logic", TOKENS);

    let output = logicc(&["check", &file]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
}

#[test]
fn check_reports_undefined_identifiers_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "main.logic", "let x: Number = missing\n");

    let output = logicc(&["check", "--json", &file]);
    assert!(!output.status.success());

    let diagnostics = json_diagnostics(&output);
    let first = &diagnostics[0];
    assert_eq!(first["code"], "E0004");
    assert_eq!(first["severity"], "error");
    assert_eq!(first["message"], "undefined identifier `missing`");
    let span = &first["spans"][0];
    assert_eq!(span["start"], 16);
    assert_eq!(span["end"], 23);
    assert_eq!(span["line"], 1);
    assert_eq!(span["column"], 17);

    // The trailing summary is JSON too.
    let last = diagnostics.last().unwrap();
    assert_eq!(last["code"], "C0001");
    assert!(!stderr(&output).contains("\x1b["));
}

#[test]
fn check_reports_type_mismatches() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "main.logic", "let x: Number = \"hello\"\n");

    let output = logicc(&["check", "--no-color", &file]);
    assert!(!output.status.success());
    let stderr = stderr(&output);
    assert!(stderr.contains("Number"), "stderr: {}", stderr);
    assert!(stderr.contains("String"), "stderr: {}", stderr);
    assert!(stderr.contains("error: Failed due to errors above."));
}

#[test]
fn check_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "main.logic", "let : Number = 1\n");

    let output = logicc(&["check", "--json", &file]);
    assert!(!output.status.success());
    let diagnostics = json_diagnostics(&output);
    assert_eq!(diagnostics[0]["code"], "P0001");
}

#[test]
fn check_rejects_unknown_extensions() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "notes.txt", "let x: Number = 1\n");

    let output = logicc(&["check", &file]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("has no known extension"));
}

// ── eval ─────────────────────────────────────────────────────────────

#[test]
fn eval_prints_top_level_variables() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "tokens.logic", TOKENS);

    let output = logicc(&["eval", &file]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "accent = #color(css: \"#123456\")\nspacing = 8\nlabel = \"ab\"\n"
    );
}

#[test]
fn eval_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "tokens.logic", TOKENS);

    let output = logicc(&["eval", "--json", &file]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let values: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        values,
        serde_json::json!({
            "accent": "#123456",
            "spacing": 8,
            "label": "ab"
        })
    );
}

#[test]
fn eval_honors_the_configured_call_depth() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "logic.toml", "[evaluation]\nmax-call-depth = 8\n");
    let file = write(
        dir.path(),
        "main.logic",
        "func forever(_ n: Number) -> Number {\n  return forever(n)\n}\n\nlet r: Number = forever(1)\n",
    );

    let output = logicc(&["eval", "--no-color", &file]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("recursion limit of 8 calls exceeded"),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn eval_reports_cyclic_initializers() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(
        dir.path(),
        "main.logic",
        "let a: Number = b\n\nlet b: Number = a\n",
    );

    let output = logicc(&["eval", "--json", &file]);
    assert!(!output.status.success());
    let diagnostics = json_diagnostics(&output);
    assert_eq!(diagnostics[0]["code"], "V0001");
    assert!(diagnostics[0]["message"]
        .as_str()
        .unwrap()
        .starts_with("cyclic initializer"));
}

// ── convert ──────────────────────────────────────────────────────────

#[test]
fn convert_round_trips_through_json_and_xml() {
    let dir = tempfile::tempdir().unwrap();
    let source = write(dir.path(), "tokens.logic", TOKENS);

    let json = logicc(&["convert", &source, "--to", "json"]);
    assert!(json.status.success(), "stderr: {}", stderr(&json));
    let json_file = write(dir.path(), "tokens.json", &stdout(&json));

    let xml = logicc(&["convert", &json_file, "--to", "xml"]);
    assert!(xml.status.success(), "stderr: {}", stderr(&xml));
    assert!(stdout(&xml).starts_with("<?xml version=\"1.0\"?>\n<Program>"));
    let xml_file = write(dir.path(), "tokens.xml", &stdout(&xml));

    // Decoded documents check and evaluate like the source.
    let output = logicc(&["eval", &xml_file]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("spacing = 8"));

    let text = logicc(&["convert", &xml_file, "--to", "text"]);
    assert!(text.status.success(), "stderr: {}", stderr(&text));
    assert_eq!(stdout(&text), TOKENS);
}

#[test]
fn convert_uses_the_configured_indent() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "tokens.logic", TOKENS);

    let output = logicc(&["convert", &file, "--to", "text", "--indent", "4"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("\n    static let primary: Color"));

    write(dir.path(), "logic.toml", "[format]\nindent = 3\n");
    let output = logicc(&["convert", &file, "--to", "text"]);
    assert!(stdout(&output).contains("\n   static let primary: Color"));
}

// ── imports ──────────────────────────────────────────────────────────

#[test]
fn imports_resolve_through_module_paths() {
    let dir = tempfile::tempdir().unwrap();
    let lib = dir.path().join("lib");
    std::fs::create_dir_all(&lib).unwrap();
    write(dir.path(), "logic.toml", "[modules]\npaths = [\"lib\"]\n");
    write(&lib, "Palette.logic", "let brand: Color = #color(css: \"teal\")\n");
    let file = write(
        dir.path(),
        "main.logic",
        "import Palette\n\nlet border: Color = brand\n",
    );

    let output = logicc(&["eval", &file]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("border = #color(css: \"teal\")"));
}

#[test]
fn import_cycles_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "A.logic", "import B\n");
    write(dir.path(), "B.logic", "import A\n");
    let file = write(dir.path(), "main.logic", "import A\n");

    let output = logicc(&["check", "--json", &file]);
    assert!(!output.status.success());
    let diagnostics = json_diagnostics(&output);
    assert_eq!(diagnostics[0]["code"], "C0002");
    assert!(diagnostics[0]["message"]
        .as_str()
        .unwrap()
        .starts_with("import cycle detected"));
}

#[test]
fn missing_modules_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let file = write(dir.path(), "main.logic", "import Nowhere\n");

    let output = logicc(&["check", "--no-color", &file]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("module `Nowhere` not found"));
}
