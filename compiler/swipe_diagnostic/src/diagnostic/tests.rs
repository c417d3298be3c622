use super::*;
use pretty_assertions::assert_eq;

#[test]
fn display_with_position() {
    let d = Diagnostic::config(r#"mux: unbalanced braces in "/users/{id""#)
        .at(Position::new("svc/swipe.go", 12, 5));
    assert_eq!(
        d.to_string(),
        r#"svc/swipe.go:12:5: mux: unbalanced braces in "/users/{id""#
    );
}

#[test]
fn display_without_position() {
    assert_eq!(Diagnostic::load("no packages").to_string(), "no packages");
}

#[test]
fn only_warn_is_non_fatal() {
    assert!(!Diagnostic::warn("x").is_fatal());
    for kind in [
        ErrorKind::Config,
        ErrorKind::Load,
        ErrorKind::Decode,
        ErrorKind::Find,
        ErrorKind::Generate,
        ErrorKind::Format,
        ErrorKind::Io,
        ErrorKind::Cancelled,
    ] {
        assert!(kind.is_fatal(), "{kind} should be fatal");
    }
}

#[test]
fn at_opt_keeps_existing_position() {
    let d = Diagnostic::decode("x")
        .at(Position::new("a.go", 1, 1))
        .at_opt(None);
    assert_eq!(d.pos, Some(Position::new("a.go", 1, 1)));
}
