// Logic lexer -- tokenizer for the Swift-like textual syntax.

pub mod cursor;

pub use cursor::Cursor;
use logic_common::error::{LexError, LexErrorKind};
use logic_common::span::Span;
use logic_common::token::{keyword_from_str, Token, TokenKind};

/// The Logic lexer. Converts source text into a stream of tokens.
///
/// Implements `Iterator<Item = Token>`; the final item is always `Eof`.
/// Malformed input produces `Error` tokens, and the matching [`LexError`]s
/// are collected for the parser to report.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    emitted_eof: bool,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, including the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Tokenize the entire source and return the lexer errors alongside.
    pub fn tokenize_with_errors(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.by_ref().collect();
        (tokens, lexer.errors)
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    fn next_token(&mut self) -> Token {
        self.cursor
            .eat_while(|c| c == ' ' || c == '\t' || c == '\r' || c == '\n');

        let start = self.cursor.pos();
        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Single-character delimiters ───────────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ':' => self.single_char_token(TokenKind::Colon, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            '.' => self.single_char_token(TokenKind::Dot, start),
            '#' => self.single_char_token(TokenKind::Hash, start),

            // ── Operators ─────────────────────────────────────────────────
            '=' => self.one_or_two(start, '=', TokenKind::Eq, TokenKind::EqEq),
            '<' => self.one_or_two(start, '=', TokenKind::Lt, TokenKind::LtEq),
            '>' => self.one_or_two(start, '=', TokenKind::Gt, TokenKind::GtEq),
            '-' => self.one_or_two(start, '>', TokenKind::Minus, TokenKind::Arrow),
            '!' => self.lex_bang(start),

            '/' => self.lex_slash(start),
            '0'..='9' => self.lex_number(start),
            '"' => self.lex_string(start),
            c if is_ident_start(c) => self.lex_ident(start),

            _ => {
                self.cursor.advance();
                self.error(
                    LexErrorKind::UnexpectedCharacter(c),
                    start,
                    self.cursor.pos(),
                )
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `a` -> `single`, `a` followed by `second` -> `double`.
    fn one_or_two(&mut self, start: u32, second: char, single: TokenKind, double: TokenKind) -> Token {
        self.cursor.advance();
        let kind = if self.cursor.eat(second) { double } else { single };
        Token::new(kind, start, self.cursor.pos())
    }

    /// `!=` is the only operator starting with `!`.
    fn lex_bang(&mut self, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            Token::new(TokenKind::NotEq, start, self.cursor.pos())
        } else {
            self.error(LexErrorKind::UnexpectedCharacter('!'), start, self.cursor.pos())
        }
    }

    fn error(&mut self, kind: LexErrorKind, start: u32, end: u32) -> Token {
        self.errors.push(LexError::new(kind, Span::new(start, end)));
        Token::new(TokenKind::Error, start, end)
    }

    // ── Comments ─────────────────────────────────────────────────────────

    /// `//` line comment, `///` doc comment, `/* */` block comment.
    fn lex_slash(&mut self, start: u32) -> Token {
        self.cursor.advance();
        match self.cursor.peek() {
            Some('/') => {
                self.cursor.advance();
                let is_doc = self.cursor.peek() == Some('/') && self.cursor.peek_next() != Some('/');
                self.cursor.eat_while(|c| c != '\n');
                let kind = if is_doc {
                    TokenKind::DocComment
                } else {
                    TokenKind::Comment
                };
                Token::new(kind, start, self.cursor.pos())
            }
            Some('*') => {
                self.cursor.advance();
                loop {
                    match self.cursor.advance() {
                        Some('*') if self.cursor.peek() == Some('/') => {
                            self.cursor.advance();
                            return Token::new(TokenKind::Comment, start, self.cursor.pos());
                        }
                        Some(_) => {}
                        None => {
                            return self.error(
                                LexErrorKind::UnterminatedBlockComment,
                                start,
                                self.cursor.pos(),
                            )
                        }
                    }
                }
            }
            _ => self.error(LexErrorKind::UnexpectedCharacter('/'), start, self.cursor.pos()),
        }
    }

    // ── Number literals ──────────────────────────────────────────────────

    /// Decimal digits, an optional `.digits` fraction and an optional exponent.
    ///
    /// A `.` not followed by a digit is left for member access.
    fn lex_number(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            self.cursor.advance();
            if matches!(self.cursor.peek(), Some('+' | '-')) {
                self.cursor.advance();
            }
            if !self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
                let text = self.cursor.slice(start, self.cursor.pos()).to_string();
                return self.error(
                    LexErrorKind::InvalidNumberLiteral(text),
                    start,
                    self.cursor.pos(),
                );
            }
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        Token::new(TokenKind::Number, start, self.cursor.pos())
    }

    // ── String literals ──────────────────────────────────────────────────

    /// A single-line double-quoted string. Escapes are validated here and
    /// decoded later by [`unescape`].
    fn lex_string(&mut self, start: u32) -> Token {
        self.cursor.advance();
        let mut invalid_escape = None;

        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return self.error(LexErrorKind::UnterminatedString, start, self.cursor.pos());
                }
                Some('"') => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    let escape_start = self.cursor.pos();
                    self.cursor.advance();
                    match self.cursor.advance() {
                        Some('"' | '\\' | 'n' | 't' | 'r' | '0') => {}
                        Some('u') if self.cursor.peek() == Some('{') => {
                            self.cursor.eat_while(|c| c != '}' && c != '"' && c != '\n');
                            if !self.cursor.eat('}') {
                                invalid_escape.get_or_insert(('u', escape_start));
                            }
                        }
                        Some(other) => {
                            invalid_escape.get_or_insert((other, escape_start));
                        }
                        None => {
                            return self.error(
                                LexErrorKind::UnterminatedString,
                                start,
                                self.cursor.pos(),
                            );
                        }
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }

        match invalid_escape {
            Some((c, escape_start)) => {
                let end = self.cursor.pos();
                self.errors.push(LexError::new(
                    LexErrorKind::InvalidEscapeSequence(c),
                    Span::new(escape_start, (escape_start + 2).min(end)),
                ));
                Token::new(TokenKind::Error, start, end)
            }
            None => Token::new(TokenKind::String, start, self.cursor.pos()),
        }
    }

    // ── Identifiers and keywords ─────────────────────────────────────────

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, start, self.cursor.pos())
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

/// Decode the escapes of a lexed string token. `raw` includes the quotes.
///
/// Escapes were validated by the lexer; anything unrecognized is kept verbatim.
pub fn unescape(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('u') if chars.peek() == Some(&'{') => {
                chars.next();
                let hex: String = chars.by_ref().take_while(|&c| c != '}').collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u{");
                        out.push_str(&hex);
                        out.push('}');
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Quote a string for the textual syntax, escaping what [`unescape`] decodes.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
