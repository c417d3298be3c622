use super::*;

fn linux() -> BuildContext {
    BuildContext {
        goos: "linux".into(),
        goarch: "amd64".into(),
        tags: vec!["swipe".into()],
    }
}

#[test]
fn simple_tags() {
    let ctx = linux();
    assert!(ctx.eval("swipe"));
    assert!(!ctx.eval("!swipe"));
    assert!(ctx.eval("linux && amd64"));
    assert!(ctx.eval("windows || linux"));
    assert!(!ctx.eval("windows"));
    assert!(ctx.eval("unix"));
    assert!(ctx.eval("go1.21"));
}

#[test]
fn precedence_and_parens() {
    let ctx = linux();
    assert!(ctx.eval("windows || linux && swipe"));
    assert!(!ctx.eval("(windows || linux) && !swipe"));
    assert!(ctx.eval("!(windows && linux)"));
}

#[test]
fn malformed_is_false() {
    let ctx = linux();
    assert!(!ctx.eval("linux &&"));
    assert!(!ctx.eval("(linux"));
    assert!(!ctx.eval("linux $ amd64"));
}

#[test]
fn file_names() {
    let ctx = linux();
    assert!(file_name_matches(&ctx, "service.go"));
    assert!(!file_name_matches(&ctx, "service_test.go"));
    assert!(file_name_matches(&ctx, "poll_linux.go"));
    assert!(!file_name_matches(&ctx, "poll_windows.go"));
    assert!(file_name_matches(&ctx, "asm_linux_amd64.go"));
    assert!(!file_name_matches(&ctx, "asm_linux_arm64.go"));
    assert!(!file_name_matches(&ctx, "README.md"));
    // A lone OS name is not a suffix constraint.
    assert!(file_name_matches(&ctx, "windows.go"));
}

#[test]
fn header_constraint() {
    let src = "// Copyright\n\n//go:build swipe\n\npackage app\n";
    assert_eq!(find_constraint(src), Some("swipe".to_string()));
    assert_eq!(find_constraint("package app\n//go:build swipe\n"), None);
    assert!(linux().matches("swipe.go", find_constraint(src).as_deref()));
    assert!(!BuildContext {
        tags: vec![],
        ..linux()
    }
    .matches("swipe.go", find_constraint(src).as_deref()));
}
