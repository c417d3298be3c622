use super::directives;

#[test]
fn swipe_log_wins_over_rust_log() {
    assert_eq!(
        directives(Some("swipe_gen=trace".into()), Some("info".into()), false),
        "swipe_gen=trace"
    );
}

#[test]
fn rust_log_is_the_fallback() {
    assert_eq!(directives(None, Some("info".into()), true), "info");
    assert_eq!(directives(Some("  ".into()), Some("info".into()), false), "info");
}

#[test]
fn verbose_raises_the_default() {
    assert_eq!(directives(None, None, false), "warn");
    assert_eq!(directives(None, None, true), "debug");
}
