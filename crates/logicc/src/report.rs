//! Diagnostic output for the CLI.
//!
//! Human-readable mode prints ariadne reports to stderr. `--json` mode
//! prints one JSON object per diagnostic per line instead:
//! `{ code, severity, message, file, spans: [{ start, end, line, column, label }], fix }`.

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};
use logic_common::span::LineIndex;
use logic_eval::EvaluationError;
use logic_parser::ast::{Expression, SyntaxNode};
use logic_parser::{NodeId, ParseError, Program, SourceMap};
use logic_typeck::diagnostics::{self, DiagnosticOptions};
use logic_typeck::error::UnificationError;
use logic_typeck::scope::ScopeContext;

pub const GENERAL_ERROR: &str = "C0001";
pub const LOAD_ERROR: &str = "C0002";
pub const EVALUATION_ERROR: &str = "V0001";

pub struct Reporter<'a> {
    file: String,
    source: &'a str,
    spans: &'a SourceMap,
    options: DiagnosticOptions,
    json: bool,
}

impl<'a> Reporter<'a> {
    pub fn new(
        file: impl Into<String>,
        source: &'a str,
        spans: &'a SourceMap,
        options: DiagnosticOptions,
        json: bool,
    ) -> Self {
        Reporter {
            file: file.into(),
            source,
            spans,
            options,
            json,
        }
    }

    fn range(&self, id: &NodeId) -> Range<usize> {
        let range = self.spans.get(id).map(|s| s.to_range()).unwrap_or(0..0);
        let start = range.start.min(self.source.len());
        let end = range.end.min(self.source.len()).max(start);
        start..end
    }

    fn emit_json(&self, code: &str, message: &str, spans: &[(Range<usize>, String)]) {
        let lines = LineIndex::new(self.source);
        let spans: Vec<serde_json::Value> = spans
            .iter()
            .map(|(range, label)| {
                let (line, column) = lines.line_col(range.start as u32);
                serde_json::json!({
                    "start": range.start,
                    "end": range.end,
                    "line": line,
                    "column": column,
                    "label": label,
                })
            })
            .collect();
        let diagnostic = serde_json::json!({
            "code": code,
            "severity": "error",
            "message": message,
            "file": self.file,
            "spans": spans,
            "fix": null
        });
        eprintln!("{}", diagnostic);
    }

    pub fn parse_error(&self, error: &ParseError) {
        if self.json {
            let start = (error.span.start as usize).min(self.source.len());
            let end = (error.span.end as usize).max(start);
            self.emit_json(
                diagnostics::PARSE_ERROR,
                &format!("Parse error: {}", error.message),
                &[(start..end, error.message.clone())],
            );
        } else {
            eprint!(
                "{}",
                diagnostics::render_parse_error(error, self.source, &self.options)
            );
        }
    }

    /// Every unresolved identifier and member, identifiers first.
    pub fn scope_errors(&self, scope: &ScopeContext, program: &Program) {
        if !self.json {
            for rendered in
                diagnostics::render_scope_errors(scope, self.source, self.spans, &self.options)
            {
                eprint!("{}", rendered);
            }
            return;
        }

        let identifiers = scope
            .undefined_identifiers
            .iter()
            .map(|id| (id, diagnostics::UNDEFINED_IDENTIFIER, "identifier"));
        let members = scope
            .undefined_member_expressions
            .iter()
            .map(|id| (id, diagnostics::UNDEFINED_MEMBER, "member"));
        for (id, code, what) in identifiers.chain(members) {
            let message = match reference_name(program, id) {
                Some(name) => format!("undefined {} `{}`", what, name),
                None => format!("undefined {}", what),
            };
            self.emit_json(
                code,
                &message,
                &[(self.range(id), "not found in this scope".to_string())],
            );
        }
    }

    pub fn unification_error(&self, error: &UnificationError) {
        if self.json {
            let (expected, found) = error.types();
            self.emit_json(
                diagnostics::error_code(error),
                &error.to_string(),
                &[(
                    self.range(error.origin()),
                    format!("expected {}, found {}", expected, found),
                )],
            );
        } else {
            eprint!(
                "{}",
                diagnostics::render_unification_error(
                    error,
                    self.source,
                    self.spans,
                    &self.options
                )
            );
        }
    }

    pub fn evaluation_error(&self, error: &EvaluationError) {
        let range = error.node().map(|id| self.range(id));
        self.spanned(EVALUATION_ERROR, &error.to_string(), range);
    }

    /// An error with no node to point at, e.g. a failed import.
    pub fn error(&self, code: &str, message: &str) {
        self.spanned(code, message, None);
    }

    fn spanned(&self, code: &str, message: &str, range: Option<Range<usize>>) {
        if self.json {
            let spans: Vec<(Range<usize>, String)> = range
                .into_iter()
                .map(|r| (r, message.to_string()))
                .collect();
            self.emit_json(code, message, &spans);
            return;
        }

        let range = range.unwrap_or(0..0);
        let mut builder = Report::build(ReportKind::Error, range.clone())
            .with_code(code)
            .with_message(message)
            .with_config(ariadne::Config::default().with_color(self.options.color));
        if !range.is_empty() {
            builder.add_label(
                Label::new(range)
                    .with_message(message)
                    .with_color(Color::Red),
            );
        }
        let _ = builder.finish().eprint(Source::from(self.source));
    }
}

/// The written name of an unresolved reference, for documents without spans.
fn reference_name(program: &Program, id: &NodeId) -> Option<String> {
    match program.find(id)? {
        SyntaxNode::Expression(Expression::IdentifierExpression(e)) => {
            Some(e.identifier.string.clone())
        }
        SyntaxNode::Expression(expression @ Expression::MemberExpression(_)) => {
            expression.member_path().map(|path| path.join("."))
        }
        _ => None,
    }
}
