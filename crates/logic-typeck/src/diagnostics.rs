//! Ariadne-based diagnostic rendering for parse, scope and type errors.
//!
//! Errors identify nodes by id; the [`SourceMap`] from
//! [`logic_parser::parse_with_spans`] turns those ids back into byte ranges.
//! Nodes without a span (prelude nodes, decoded JSON/XML documents) are
//! reported at the start of the file.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use logic_parser::{NodeId, ParseError, SourceMap};

use crate::error::UnificationError;
use crate::scope::ScopeContext;
use crate::ty::Ty;

/// Rendering options shared by every diagnostic.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticOptions {
    pub color: bool,
}

impl DiagnosticOptions {
    /// Options for deterministic output: tests, pipes, `--no-color`.
    pub fn colorless() -> Self {
        DiagnosticOptions { color: false }
    }

    fn config(&self) -> Config {
        Config::default().with_color(self.color)
    }
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        DiagnosticOptions { color: true }
    }
}

// ── Error Codes ────────────────────────────────────────────────────────

pub const PARSE_ERROR: &str = "P0001";
pub const UNDEFINED_IDENTIFIER: &str = "E0004";
pub const UNDEFINED_MEMBER: &str = "E0008";

pub fn error_code(err: &UnificationError) -> &'static str {
    match err {
        UnificationError::NameMismatch { .. } => "E0001",
        UnificationError::InfiniteType { .. } => "E0002",
        UnificationError::ArgumentCountMismatch { .. } => "E0003",
        UnificationError::KindMismatch { .. } => "E0005",
        UnificationError::GenericArgumentsCountMismatch { .. } => "E0006",
        UnificationError::LabelMismatch { .. } => "E0007",
    }
}

// ── Span Helpers ───────────────────────────────────────────────────────

/// Keep a range inside the source and at least one byte wide where possible.
fn clamp(range: Range<usize>, source_len: usize) -> Range<usize> {
    let s = range.start.min(source_len);
    let e = range.end.min(source_len).max(s);
    if s == e {
        s..e.saturating_add(1).min(source_len)
    } else {
        s..e
    }
}

fn node_range(id: &NodeId, spans: &SourceMap, source: &str) -> Range<usize> {
    let range = spans.get(id).map(|s| s.to_range()).unwrap_or(0..0);
    clamp(range, source.len())
}

fn fix_suggestion(err: &UnificationError) -> Option<String> {
    let (expected, found) = err.types();
    match err {
        UnificationError::NameMismatch { .. } => {
            if expected.is_optional() && found.is_optional() {
                return None;
            }
            if expected == Ty::bool() {
                return Some("expected a comparison or a boolean value".to_string());
            }
            if expected.is_optional() {
                return Some(format!("the value must be `{}`", expected));
            }
            None
        }
        UnificationError::LabelMismatch { .. } => {
            Some("check the argument labels against the declaration".to_string())
        }
        UnificationError::ArgumentCountMismatch { .. } => {
            let positional = |ty: &Ty| match ty {
                Ty::Fun(args, _) => args.iter().filter(|a| a.label.is_none()).count(),
                _ => 0,
            };
            if positional(&found) < positional(&expected) {
                Some("pass every argument that has no default value".to_string())
            } else {
                Some("remove the extra argument".to_string())
            }
        }
        UnificationError::KindMismatch { .. } if matches!(expected, Ty::Con(..)) => {
            Some("only functions, records and enum cases can be called".to_string())
        }
        _ => None,
    }
}

fn write_report(report: Report<'_, Range<usize>>, source: &str) -> String {
    let mut buf = Vec::new();
    if report.write(Source::from(source), &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

// ── Rendering ──────────────────────────────────────────────────────────

/// Render a unification error at the span of its origin node.
pub fn render_unification_error(
    error: &UnificationError,
    source: &str,
    spans: &SourceMap,
    opts: &DiagnosticOptions,
) -> String {
    let span = node_range(error.origin(), spans, source);
    let (expected, found) = error.types();

    let label = match error {
        UnificationError::InfiniteType { .. } => "recursive type here".to_string(),
        _ => format!("expected {}, found {}", expected, found),
    };

    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_code(error_code(error))
        .with_message(error.to_string())
        .with_config(opts.config())
        .with_label(Label::new(span).with_message(label).with_color(Color::Red));
    if let Some(fix) = fix_suggestion(error) {
        builder.set_help(fix);
    }
    write_report(builder.finish(), source)
}

/// Render every unresolved reference, identifiers first, in id order.
pub fn render_scope_errors(
    scope: &ScopeContext,
    source: &str,
    spans: &SourceMap,
    opts: &DiagnosticOptions,
) -> Vec<String> {
    let identifiers = scope
        .undefined_identifiers
        .iter()
        .map(|id| (id, UNDEFINED_IDENTIFIER, "identifier"));
    let members = scope
        .undefined_member_expressions
        .iter()
        .map(|id| (id, UNDEFINED_MEMBER, "member"));

    identifiers
        .chain(members)
        .map(|(id, code, what)| {
            let span = node_range(id, spans, source);
            let text = spans
                .get(id)
                .and_then(|s| source.get(s.to_range()))
                .unwrap_or_default();
            let msg = if text.is_empty() {
                format!("undefined {}", what)
            } else {
                format!("undefined {} `{}`", what, text)
            };
            let report = Report::build(ReportKind::Error, span.clone())
                .with_code(code)
                .with_message(&msg)
                .with_config(opts.config())
                .with_label(
                    Label::new(span)
                        .with_message("not found in this scope")
                        .with_color(Color::Red),
                )
                .finish();
            write_report(report, source)
        })
        .collect()
}

/// Render a parse error, with its related span when it has one.
pub fn render_parse_error(error: &ParseError, source: &str, opts: &DiagnosticOptions) -> String {
    let span = clamp(error.span.to_range(), source.len());
    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_code(PARSE_ERROR)
        .with_message(&error.message)
        .with_config(opts.config())
        .with_label(
            Label::new(span)
                .with_message(&error.message)
                .with_color(Color::Red),
        );
    if let Some((message, related)) = &error.related {
        builder.add_label(
            Label::new(clamp(related.to_range(), source.len()))
                .with_message(message)
                .with_color(Color::Blue),
        );
    }
    write_report(builder.finish(), source)
}
