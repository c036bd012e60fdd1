//! Error types for parsing and program assembly.

use std::fmt;

use logic_common::error::LexError;
use logic_common::span::Span;

/// A parse error with location information and optional related span.
///
/// Parse errors carry the primary span where the problem was detected, a
/// human-readable message, and an optional related span for context (e.g.,
/// "block opened here" for unclosed braces).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Primary source location where the error was detected.
    pub span: Span,
    /// Optional related location with context message.
    pub related: Option<(String, Span)>,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            related: None,
        }
    }

    pub fn with_related(
        message: impl Into<String>,
        span: Span,
        related_message: impl Into<String>,
        related_span: Span,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            related: Some((related_message.into(), related_span)),
        }
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(err.kind.to_string(), err.span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// An import graph cycle, e.g. `["A", "B", "A"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    pub cycle_path: Vec<String>,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cycle_path.join(" -> "))
    }
}

impl std::error::Error for CycleError {}

/// Failure while splicing imported modules into a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// The loader has no module with this name.
    NotFound { name: String },
    /// A module imports itself, directly or transitively.
    Cycle(CycleError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::NotFound { name } => write!(f, "module `{name}` not found"),
            ImportError::Cycle(cycle) => write!(f, "import cycle detected: {cycle}"),
        }
    }
}

impl std::error::Error for ImportError {}

#[cfg(test)]
mod tests {
    use super::*;
    use logic_common::error::LexErrorKind;

    #[test]
    fn parse_error_with_related() {
        let err = ParseError::with_related(
            "expected `}` to close block",
            Span::new(50, 51),
            "block opened here",
            Span::new(10, 11),
        );
        assert_eq!(err.to_string(), "expected `}` to close block");
        let (msg, span) = err.related.unwrap();
        assert_eq!(msg, "block opened here");
        assert_eq!(span, Span::new(10, 11));
    }

    #[test]
    fn lex_error_converts() {
        let lex = LexError::new(LexErrorKind::UnterminatedString, Span::new(3, 9));
        let err = ParseError::from(lex);
        assert_eq!(err.message, "unterminated string literal");
        assert_eq!(err.span, Span::new(3, 9));
    }

    #[test]
    fn cycle_display() {
        let err = ImportError::Cycle(CycleError {
            cycle_path: vec!["A".into(), "B".into(), "A".into()],
        });
        assert_eq!(err.to_string(), "import cycle detected: A -> B -> A");
    }
}
