use pretty_assertions::assert_eq;

use super::{parse, patterns, read, PKGS_FILE};

#[test]
fn skips_blank_and_comment_lines() {
    let src = "# services\n./cmd/api\n\n   ./internal/...  \n#./old\n";
    assert_eq!(parse(src), vec!["./cmd/api", "./internal/..."]);
}

#[test]
fn file_patterns_follow_command_line_ones() {
    assert_eq!(
        patterns(vec!["./a".into()], vec!["./b".into()]),
        vec!["./a", "./b"]
    );
    assert_eq!(patterns(Vec::new(), Vec::new()), vec!["./..."]);
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    assert!(read(dir.path()).unwrap_or_else(|e| panic!("{e}")).is_empty());

    std::fs::write(dir.path().join(PKGS_FILE), "./svc\n").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(read(dir.path()).unwrap_or_else(|e| panic!("{e}")), vec!["./svc"]);
}
