use insta::assert_snapshot;
use logic_lexer::Lexer;

/// Render each token as `Kind "text" start..end`, one per line.
fn tokenize_snapshot(source: &str) -> String {
    Lexer::tokenize(source)
        .into_iter()
        .map(|tok| {
            let text = &source[tok.span.start as usize..tok.span.end as usize];
            format!("{:?} {:?} {}..{}", tok.kind, text, tok.span.start, tok.span.end)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn color_literal() {
    assert_snapshot!(tokenize_snapshot(r##"#color(css: "#FF0000")"##), @r###"
    Hash "#" 0..1
    Ident "color" 1..6
    LParen "(" 6..7
    Ident "css" 7..10
    Colon ":" 10..11
    String "\"#FF0000\"" 12..21
    RParen ")" 21..22
    Eof "" 22..22
    "###);
}

#[test]
fn function_signature() {
    assert_snapshot!(tokenize_snapshot("func f(_ a: Number) -> Boolean {}"), @r###"
    Func "func" 0..4
    Ident "f" 5..6
    LParen "(" 6..7
    Ident "_" 7..8
    Ident "a" 9..10
    Colon ":" 10..11
    Ident "Number" 12..18
    RParen ")" 18..19
    Arrow "->" 20..22
    Ident "Boolean" 23..30
    LBrace "{" 31..32
    RBrace "}" 32..33
    Eof "" 33..33
    "###);
}

#[test]
fn comparison_operators() {
    assert_snapshot!(tokenize_snapshot("a == b != c <= d >= e < f > g = h"), @r###"
    Ident "a" 0..1
    EqEq "==" 2..4
    Ident "b" 5..6
    NotEq "!=" 7..9
    Ident "c" 10..11
    LtEq "<=" 12..14
    Ident "d" 15..16
    GtEq ">=" 17..19
    Ident "e" 20..21
    Lt "<" 22..23
    Ident "f" 24..25
    Gt ">" 26..27
    Ident "g" 28..29
    Eq "=" 30..31
    Ident "h" 32..33
    Eof "" 33..33
    "###);
}

#[test]
fn comments() {
    assert_snapshot!(tokenize_snapshot("/// docs\n// plain\n/* block */ let"), @r###"
    DocComment "/// docs" 0..8
    Comment "// plain" 9..17
    Comment "/* block */" 18..29
    Let "let" 30..33
    Eof "" 33..33
    "###);
}

#[test]
fn unterminated_block_comment_is_error() {
    let (tokens, errors) = Lexer::tokenize_with_errors("let /* never closed");
    assert_eq!(tokens.len(), 3);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "unterminated block comment");
}

#[test]
fn unexpected_character() {
    let (_, errors) = Lexer::tokenize_with_errors("let a = @");
    assert_eq!(errors[0].to_string(), "unexpected character: '@'");
    assert_eq!(errors[0].span.start, 8);
}
