use super::*;
use pretty_assertions::assert_eq;

#[test]
fn unquote_interpreted() {
    assert_eq!(unquote(r#""a\tb\"c""#), Ok("a\tb\"c".to_string()));
    assert_eq!(unquote(r#""\x41\101é""#), Ok("AAé".to_string()));
}

#[test]
fn unquote_raw() {
    assert_eq!(unquote("`a\\n\r\nb`"), Ok("a\\n\nb".to_string()));
}

#[test]
fn unquote_rejects_garbage() {
    assert!(unquote("abc").is_err());
    assert!(unquote(r#""\q""#).is_err());
}

#[test]
fn runes() {
    assert_eq!(unquote_char("'a'"), Ok(97));
    assert_eq!(unquote_char(r"'\n'"), Ok(10));
    assert_eq!(unquote_char(r"'\x41'"), Ok(65));
    assert_eq!(unquote_char(r"'é'"), Ok(0xe9));
    assert_eq!(unquote_char(r"'\101'"), Ok(65));
    assert!(unquote_char("'ab'").is_err());
}

#[test]
fn ints() {
    assert_eq!(parse_int("42"), Some(42));
    assert_eq!(parse_int("0x1F"), Some(31));
    assert_eq!(parse_int("0o17"), Some(15));
    assert_eq!(parse_int("017"), Some(15));
    assert_eq!(parse_int("0b101"), Some(5));
    assert_eq!(parse_int("1_000"), Some(1000));
    assert_eq!(parse_int("0"), Some(0));
    assert_eq!(parse_int("18446744073709551615"), Some(18_446_744_073_709_551_615));
}

#[test]
fn floats() {
    assert_eq!(parse_float("3.5"), Some(3.5));
    assert_eq!(parse_float(".5"), Some(0.5));
    assert_eq!(parse_float("1e3"), Some(1000.0));
    assert_eq!(parse_float("0x1p-2"), Some(0.25));
    assert_eq!(parse_float("0x1.8p1"), Some(3.0));
}

#[test]
fn quote_escapes() {
    assert_eq!(quote("a\"b\\c\n"), r#""a\"b\\c\n""#);
    assert_eq!(quote("\u{1}"), r#""\x01""#);
}
