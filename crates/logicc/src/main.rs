//! The Logic command-line tool.
//!
//! Provides the `logicc` command with the following subcommands:
//!
//! - `logicc check <file>` - Resolve and type-check a document
//! - `logicc eval <file>` - Check, then evaluate every top-level variable
//! - `logicc convert <file> --to text|json|xml` - Re-encode a document
//!
//! Documents are `.logic` text, `.json` or `.xml`. Every document is joined
//! with the prelude and has its `import`s expanded from the module paths in
//! `logic.toml` before checking.
//!
//! Options:
//! - `--json` - Output diagnostics as JSON (one object per line)
//! - `--no-color` - Disable colorized output
//! - `--config` - Use this config file instead of `logic.toml` next to the input

mod config;
mod loader;
mod report;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use logic_eval::{evaluate, EvaluationContext, Memory, Value};
use logic_fmt::{json, xml};
use logic_parser::ast::{Declaration, Statement};
use logic_parser::{expand_imports, Program, SourceMap};
use logic_typeck::diagnostics::DiagnosticOptions;
use logic_typeck::TypeckResult;

use crate::config::Settings;
use crate::loader::{Format, LoadError, ModuleLoader};
use crate::report::{Reporter, GENERAL_ERROR, LOAD_ERROR};

const FAILED: &str = "Failed due to errors above.";

#[derive(Parser)]
#[command(name = "logicc", version, about = "Check, evaluate and convert Logic documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct CommonArgs {
    /// Path to a `.logic`, `.json` or `.xml` document
    file: PathBuf,

    /// Output diagnostics as JSON (one object per line) instead of human-readable format
    #[arg(long)]
    json: bool,

    /// Disable colorized output
    #[arg(long = "no-color")]
    no_color: bool,

    /// Config file to use instead of `logic.toml` next to the input
    #[arg(long)]
    config: Option<PathBuf>,
}

impl CommonArgs {
    fn diagnostic_options(&self) -> DiagnosticOptions {
        DiagnosticOptions {
            color: !self.no_color && !self.json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and type-check a document
    Check {
        #[command(flatten)]
        args: CommonArgs,
    },
    /// Check a document, then evaluate and print every top-level variable
    Eval {
        #[command(flatten)]
        args: CommonArgs,
    },
    /// Re-encode a document in another concrete syntax
    Convert {
        #[command(flatten)]
        args: CommonArgs,

        /// Output syntax
        #[arg(long, value_enum)]
        to: Format,

        /// Indentation width for text output (overrides `logic.toml`)
        #[arg(long)]
        indent: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();

    let (args, result) = match &cli.command {
        Commands::Check { args } => (args, check(args)),
        Commands::Eval { args } => (args, eval(args)),
        Commands::Convert { args, to, indent } => (args, convert(args, *to, *indent)),
    };

    if let Err(e) = result {
        if args.json {
            // In JSON mode, emit the final error as JSON too.
            let msg = serde_json::json!({
                "code": GENERAL_ERROR,
                "severity": "error",
                "message": e,
                "file": args.file.display().to_string(),
                "spans": [],
                "fix": null
            });
            eprintln!("{}", msg);
        } else {
            eprintln!("error: {}", e);
        }
        process::exit(1);
    }
}

/// A decoded input document.
struct Loaded {
    source: String,
    program: Program,
    spans: SourceMap,
}

/// A checked program: the prelude followed by the expanded input.
struct Analysis {
    source: String,
    spans: SourceMap,
    program: Program,
    /// Index of the first input statement in `program.block`.
    user_start: usize,
    checked: TypeckResult,
}

/// Read and decode `args.file`, reporting parse errors as diagnostics.
fn load(args: &CommonArgs) -> Result<Loaded, String> {
    let (format, source) = loader::read_source(&args.file).map_err(|e| e.to_string())?;
    match loader::decode(format, &source) {
        Ok((program, spans)) => Ok(Loaded {
            source,
            program,
            spans,
        }),
        Err(LoadError::Parse(error)) => {
            let spans = SourceMap::default();
            reporter(args, &source, &spans).parse_error(&error);
            Err(FAILED.to_string())
        }
        Err(other) => Err(other.to_string()),
    }
}

fn reporter<'a>(args: &CommonArgs, source: &'a str, spans: &'a SourceMap) -> Reporter<'a> {
    Reporter::new(
        args.file.display().to_string(),
        source,
        spans,
        args.diagnostic_options(),
        args.json,
    )
}

/// Load, expand imports, join the prelude and type-check.
fn analyze(args: &CommonArgs, settings: &Settings) -> Result<Analysis, String> {
    let Loaded {
        source,
        program,
        spans,
    } = load(args)?;
    let report = reporter(args, &source, &spans);

    let mut modules = ModuleLoader::new(settings.module_dirs());
    let user = match expand_imports(program, &mut modules) {
        Ok(user) => user,
        Err(e) => {
            for failure in modules.failures() {
                report.error(LOAD_ERROR, &failure.to_string());
            }
            report.error(LOAD_ERROR, &e.to_string());
            return Err(FAILED.to_string());
        }
    };

    let prelude =
        logic_typeck::prelude().map_err(|e| format!("The prelude failed to parse: {}", e))?;
    let user_start = prelude.block.len();
    let program = Program::join([prelude, user]);

    let checked = logic_typeck::check(&program);
    report.scope_errors(&checked.scope, &program);
    if let Err(error) = &checked.substitution {
        report.unification_error(error);
    }
    if checked.has_errors() {
        return Err(FAILED.to_string());
    }

    Ok(Analysis {
        source,
        spans,
        program,
        user_start,
        checked,
    })
}

fn check(args: &CommonArgs) -> Result<(), String> {
    let settings = Settings::for_input(&args.file, args.config.as_deref())?;
    analyze(args, &settings)?;
    Ok(())
}

fn eval(args: &CommonArgs) -> Result<(), String> {
    let settings = Settings::for_input(&args.file, args.config.as_deref())?;
    let analysis = analyze(args, &settings)?;
    let Ok(substitution) = &analysis.checked.substitution else {
        return Err(FAILED.to_string());
    };

    let context = match evaluate(
        &analysis.program,
        &analysis.checked.scope,
        &analysis.checked.unification,
        substitution,
        EvaluationContext::new(),
        &settings.config.eval_options(),
    ) {
        Ok(context) => context,
        Err(error) => {
            reporter(args, &analysis.source, &analysis.spans).evaluation_error(&error);
            return Err(FAILED.to_string());
        }
    };

    let variables = analysis.program.block[analysis.user_start..]
        .iter()
        .filter_map(Statement::as_declaration)
        .filter_map(|d| match d {
            Declaration::Variable(v) => Some(v),
            _ => None,
        })
        .filter_map(|v| Some((v.name.name.as_str(), context.get(&v.name.id)?)));

    if args.json {
        let object: serde_json::Map<String, serde_json::Value> = variables
            .map(|(name, value)| (name.to_string(), value_to_json(value)))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&object).map_err(|e| e.to_string())?
        );
    } else {
        for (name, value) in variables {
            println!("{} = {}", name, value);
        }
    }
    Ok(())
}

fn convert(args: &CommonArgs, to: Format, indent: Option<usize>) -> Result<(), String> {
    let settings = Settings::for_input(&args.file, args.config.as_deref())?;
    let Loaded { program, .. } = load(args)?;

    let output = match to {
        Format::Text => {
            let mut options = settings.config.print_options();
            if let Some(indent) = indent {
                options.indent = indent;
            }
            logic_fmt::print(&program, &options)
        }
        Format::Json => {
            let mut encoded = json::encode_program(&program).map_err(|e| e.to_string())?;
            encoded.push('\n');
            encoded
        }
        Format::Xml => xml::encode_program(&program),
    };
    print!("{}", output);
    Ok(())
}

/// Scalars map to JSON scalars, colors to their CSS string, arrays and
/// records to arrays and objects. Enums and functions use their display
/// form.
fn value_to_json(value: &Value) -> serde_json::Value {
    if let Some(css) = value.as_color() {
        return serde_json::Value::String(css.to_string());
    }
    match &value.memory {
        Memory::Unit => serde_json::Value::Null,
        Memory::Bool(b) => serde_json::Value::Bool(*b),
        Memory::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
            serde_json::Value::from(*n as i64)
        }
        Memory::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Memory::String(s) => serde_json::Value::String(s.clone()),
        Memory::Array(items) => serde_json::Value::Array(items.iter().map(value_to_json).collect()),
        Memory::Record(fields) => serde_json::Value::Object(
            fields
                .iter()
                .map(|(name, field)| (name.clone(), value_to_json(field)))
                .collect(),
        ),
        Memory::Enum { .. } | Memory::Function(_) => serde_json::Value::String(value.to_string()),
    }
}
