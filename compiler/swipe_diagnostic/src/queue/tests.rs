use super::*;
use pretty_assertions::assert_eq;
use swipe_ir::Position;

#[test]
fn warnings_are_not_fatal() {
    let mut diags = Diagnostics::new();
    diags.push(Diagnostic::warn("external package fallback"));
    assert!(!diags.has_fatal());
    diags.push(Diagnostic::generate("boom"));
    assert!(diags.has_fatal());
    assert_eq!(diags.count(ErrorKind::Warn), 1);
    assert_eq!(diags.len(), 2);
}

#[test]
fn sorted_by_position_then_insertion() {
    let mut diags = Diagnostics::new();
    diags.push(Diagnostic::io("late"));
    diags.push(Diagnostic::config("b").at(Position::new("a.go", 9, 1)));
    diags.push(Diagnostic::config("a").at(Position::new("a.go", 2, 4)));
    diags.push(Diagnostic::io("later"));

    let messages: Vec<_> = diags
        .into_sorted()
        .into_iter()
        .map(|d| d.message)
        .collect();
    assert_eq!(messages, vec!["a", "b", "late", "later"]);
}
