//! Logic parser: AST model, textual parser and program assembly.
//!
//! [`parse`] turns source text into a [`Program`]. The result is already
//! normalized: call arguments written as `Optional.value(x)` are replaced by
//! `x` (see [`visit::unwrap_optional_arguments`]). Trees decoded from JSON or
//! XML go through the same pass in their decoders.

pub mod ast;
pub mod error;
mod parser;
pub mod program;
pub mod visit;

use logic_common::span::Span;
use logic_lexer::Lexer;
use rustc_hash::FxHashMap;

pub use ast::{NodeId, Program};
pub use error::{CycleError, ImportError, ParseError};
pub use parser::MAX_NESTING_DEPTH;
pub use program::{expand_imports, ImportLoader};

/// Source spans of parsed nodes, keyed by node id.
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    spans: FxHashMap<NodeId, Span>,
}

impl SourceMap {
    pub fn get(&self, id: &NodeId) -> Option<Span> {
        self.spans.get(id).copied()
    }

    pub fn insert(&mut self, id: NodeId, span: Span) {
        self.spans.insert(id, span);
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Fold another map in, e.g. when joining parsed programs.
    pub fn extend(&mut self, other: SourceMap) {
        self.spans.extend(other.spans);
    }
}

/// A parsed program together with the spans of its nodes.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub program: Program,
    pub source_map: SourceMap,
}

/// Parse a Logic source file into a program.
pub fn parse(source: &str) -> Result<Program, ParseError> {
    parse_with_spans(source).map(|parsed| parsed.program)
}

/// Parse a Logic source file, keeping node spans for diagnostics.
pub fn parse_with_spans(source: &str) -> Result<Parsed, ParseError> {
    let (tokens, lex_errors) = Lexer::tokenize_with_errors(source);
    if let Some(err) = lex_errors.into_iter().next() {
        return Err(err.into());
    }

    let mut p = parser::Parser::new(tokens, source);
    let mut program = parser::items::program(&mut p)?;
    visit::unwrap_optional_arguments(&mut program);

    Ok(Parsed {
        program,
        source_map: p.finish(),
    })
}
