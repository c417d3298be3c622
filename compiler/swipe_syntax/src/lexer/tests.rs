use super::*;
use pretty_assertions::assert_eq;

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn semicolons_inserted_after_line_enders() {
    use TokenKind::*;
    assert_eq!(
        kinds("x := f()\nreturn\n"),
        vec![Ident, Define, Ident, LParen, RParen, Semicolon, Return, Semicolon, Eof]
    );
}

#[test]
fn no_semicolon_after_operator() {
    use TokenKind::*;
    assert_eq!(kinds("a +\nb"), vec![Ident, Add, Ident, Semicolon, Eof]);
}

#[test]
fn semicolon_at_eof() {
    let lexed = tokenize("x");
    let semi = lexed.tokens[1];
    assert_eq!(semi.kind, TokenKind::Semicolon);
    assert!(semi.is_implicit_semicolon());
}

#[test]
fn multiline_block_comment_acts_as_newline() {
    use TokenKind::*;
    assert_eq!(kinds("x /*\n*/ y"), vec![Ident, Semicolon, Ident, Semicolon, Eof]);
}

#[test]
fn numbers() {
    use TokenKind::*;
    assert_eq!(
        kinds("0x1F 0o17 0b101 1_000 3.14 .5 1e9 0x1p-2 2i 017"),
        vec![Int, Int, Int, Int, Float, Float, Float, Float, Imag, Int, Semicolon, Eof]
    );
}

#[test]
fn strings_and_runes() {
    let src = r#""a\"b" `raw
line` '\n' 'x'"#;
    let lexed = tokenize(src);
    let kinds: Vec<_> = lexed.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::String,
            TokenKind::String,
            TokenKind::Char,
            TokenKind::Char,
            TokenKind::Semicolon,
            TokenKind::Eof
        ]
    );
    assert!(lexed.errors.is_empty(), "{:?}", lexed.errors);
    assert_eq!(lexed.tokens[1].line, 1);
    assert_eq!(lexed.tokens[1].end_line, 2);
}

#[test]
fn unterminated_string_is_reported() {
    let lexed = tokenize("\"abc\nx");
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].message, "string literal not terminated");
}

#[test]
fn operators_longest_match() {
    use TokenKind::*;
    assert_eq!(
        kinds("a &^= b <<= c ... <- :="),
        vec![
            Ident, AndNotAssign, Ident, ShlAssign, Ident, Ellipsis, Arrow, Define, Eof
        ]
    );
}

#[test]
fn keywords_are_recognized() {
    use TokenKind::*;
    assert_eq!(
        kinds("package main\nfunc"),
        vec![Package, Ident, Semicolon, Func, Eof]
    );
}

#[test]
fn lead_and_line_comments() {
    let src = "\
package p

// Config is the service config.
// Second line.
type Config struct {
\tName string // the name
}
";
    let lexed = tokenize(src);
    assert_eq!(lexed.groups.len(), 2);

    let type_tok = lexed
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Type)
        .copied();
    let lead = type_tok.and_then(|t| t.lead_comment);
    assert_eq!(lead, Some(0));
    assert_eq!(
        lexed.groups[0].text(),
        "Config is the service config.\nSecond line.\n"
    );

    // `string` on the field line carries the trailing comment.
    let string_tok = lexed
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Ident && &src[t.span.start as usize..t.span.end as usize] == "string")
        .copied();
    assert_eq!(string_tok.and_then(|t| t.line_comment), Some(1));
    assert_eq!(lexed.groups[1].text(), "the name\n");
}

#[test]
fn detached_comment_is_not_lead() {
    let src = "package p\n\n// detached\n\nfunc f() {}\n";
    let lexed = tokenize(src);
    let func_tok = lexed.tokens.iter().find(|t| t.kind == TokenKind::Func).copied();
    assert_eq!(func_tok.and_then(|t| t.lead_comment), None);
}

#[test]
fn directives_are_dropped_from_text() {
    let src = "//go:build swipe\n// +build swipe\n\n// Package p.\npackage p\n";
    let lexed = tokenize(src);
    assert_eq!(lexed.groups[0].text(), "+build swipe\n");
    assert_eq!(lexed.groups[1].text(), "Package p.\n");
}

#[test]
fn annotation_lines_survive() {
    let src = "// Service entry.\n// @swipe:\"Service\"\nfunc Service() {}\n";
    let lexed = tokenize(src);
    assert_eq!(
        lexed.groups[0].lines(),
        vec!["Service entry.".to_string(), "@swipe:\"Service\"".to_string()]
    );
}
