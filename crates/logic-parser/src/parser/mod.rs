//! Recursive descent parser for the textual Logic syntax.
//!
//! The parser builds the AST directly from the token stream. The grammar is
//! newline-insensitive: statements are separated by their own structure and
//! `;` is accepted but never required. Plain comments are dropped before
//! parsing; `///` doc comments stay in the stream and attach to the next
//! declaration.
//!
//! Error strategy is first-error-only: every parse function returns a
//! `Result` and the first [`ParseError`] aborts the parse.

pub(crate) mod expressions;
pub(crate) mod items;

use logic_common::span::Span;
use logic_common::token::{Token, TokenKind};

use crate::ast::NodeId;
use crate::error::ParseError;
use crate::SourceMap;

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Deepest nesting of expressions, type annotations, blocks and
/// declarations the parser accepts.
pub const MAX_NESTING_DEPTH: u32 = 64;

pub(crate) struct Parser<'src> {
    /// Significant tokens, ending with `Eof`.
    tokens: Vec<Token>,
    pos: usize,
    source: &'src str,
    /// Span of every node the parser creates, keyed by node id.
    spans: SourceMap,
    /// Current nesting depth, bounded by [`MAX_NESTING_DEPTH`].
    depth: u32,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        let tokens = tokens
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        Self {
            tokens,
            pos: 0,
            source,
            spans: SourceMap::default(),
            depth: 0,
        }
    }

    pub(crate) fn finish(self) -> SourceMap {
        self.spans
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    pub(crate) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn current_span(&self) -> Span {
        match self.tokens.get(self.pos) {
            Some(token) => token.span,
            None => {
                let end = self.source.len() as u32;
                Span::point(end)
            }
        }
    }

    pub(crate) fn current_text(&self) -> &'src str {
        let span = self.current_span();
        &self.source[span.to_range()]
    }

    /// End offset of the last consumed token.
    pub(crate) fn prev_end(&self) -> u32 {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.span.end,
            None => 0,
        }
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current())
    }

    // ── Consumption ────────────────────────────────────────────────────

    /// Consume the current token and return its span.
    pub(crate) fn advance(&mut self) -> Span {
        let span = self.current_span();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or fail with "expected X, found Y".
    pub(crate) fn expect(&mut self, kind: TokenKind) -> PResult<Span> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    /// Consume an identifier and return its text and span.
    pub(crate) fn expect_ident(&mut self, what: &str) -> PResult<(String, Span)> {
        if self.at(TokenKind::Ident) {
            let text = self.current_text().to_string();
            Ok((text, self.advance()))
        } else {
            Err(self.unexpected(what))
        }
    }

    /// Consume a closing delimiter, pointing back at its opener on failure.
    pub(crate) fn expect_closing(
        &mut self,
        kind: TokenKind,
        opened_at: Span,
        what: &str,
    ) -> PResult<Span> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::with_related(
                format!(
                    "expected {} to close {what}, found {}",
                    kind.describe(),
                    self.current().describe()
                ),
                self.current_span(),
                format!("{what} opened here"),
                opened_at,
            ))
        }
    }

    /// Run `parse` one nesting level deeper, failing past
    /// [`MAX_NESTING_DEPTH`] instead of exhausting the stack.
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(format!(
                "nesting is too deep (the limit is {MAX_NESTING_DEPTH} levels)"
            )));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn skip_semicolons(&mut self) {
        while self.eat(TokenKind::Semicolon) {}
    }

    // ── Errors and spans ───────────────────────────────────────────────

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::new(
            format!("expected {expected}, found {}", self.current().describe()),
            self.current_span(),
        )
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(message, self.current_span())
    }

    /// Record the source span of a freshly built node.
    pub(crate) fn record(&mut self, id: &NodeId, start: u32) {
        let end = self.prev_end().max(start);
        self.spans.insert(id.clone(), Span::new(start, end));
    }

    pub(crate) fn record_span(&mut self, id: &NodeId, span: Span) {
        self.spans.insert(id.clone(), span);
    }
}
