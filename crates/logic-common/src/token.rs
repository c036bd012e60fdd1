use serde::Serialize;

use crate::span::Span;

/// A token produced by the Logic lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token in the Swift-like textual syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords ───────────────────────────────────────────────────────
    Case,
    Enum,
    False,
    Func,
    If,
    Import,
    Let,
    Return,
    Static,
    Struct,
    True,

    // ── Operators ──────────────────────────────────────────────────────
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `-`
    Minus,
    /// `->`
    Arrow,

    // ── Delimiters ─────────────────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    /// `#`, the start of `#color(...)`
    Hash,

    // ── Literals ───────────────────────────────────────────────────────
    /// A decimal number, optionally with fraction and exponent.
    Number,
    /// A double-quoted string including its quotes; escapes are still raw.
    String,

    // ── Comments ───────────────────────────────────────────────────────
    /// `// ...` or `/* ... */`
    Comment,
    /// `/// ...`, attached to the following declaration.
    DocComment,

    // ── Identifiers & special ──────────────────────────────────────────
    Ident,
    Error,
    Eof,
}

impl TokenKind {
    /// Whether the parser skips this token entirely.
    pub fn is_trivia(self) -> bool {
        self == TokenKind::Comment
    }

    /// Human-readable name used in "expected ..." parse errors.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Case => "`case`",
            TokenKind::Enum => "`enum`",
            TokenKind::False => "`false`",
            TokenKind::Func => "`func`",
            TokenKind::If => "`if`",
            TokenKind::Import => "`import`",
            TokenKind::Let => "`let`",
            TokenKind::Return => "`return`",
            TokenKind::Static => "`static`",
            TokenKind::Struct => "`struct`",
            TokenKind::True => "`true`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::LtEq => "`<=`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Minus => "`-`",
            TokenKind::Arrow => "`->`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::Hash => "`#`",
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Comment => "comment",
            TokenKind::DocComment => "doc comment",
            TokenKind::Ident => "identifier",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }
}

/// Look up a keyword by its source text.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "case" => Some(TokenKind::Case),
        "enum" => Some(TokenKind::Enum),
        "false" => Some(TokenKind::False),
        "func" => Some(TokenKind::Func),
        "if" => Some(TokenKind::If),
        "import" => Some(TokenKind::Import),
        "let" => Some(TokenKind::Let),
        "return" => Some(TokenKind::Return),
        "static" => Some(TokenKind::Static),
        "struct" => Some(TokenKind::Struct),
        "true" => Some(TokenKind::True),
        _ => None,
    }
}
