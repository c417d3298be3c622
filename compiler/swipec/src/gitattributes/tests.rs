use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use swipe_diagnostic::{Diagnostic, ErrorKind};

use super::{entries, rewrite, update, GitattributesError, FILENAME};

fn entries_of(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn missing_section_is_appended() {
    let out = update(Path::new(".gitattributes"), "*.png binary\n", &entries_of(&["a.go"]))
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(out, "*.png binary\n\n# /swipe gen\na.go -diff\n# swipe gen/\n");
}

#[test]
fn existing_section_is_replaced_in_place() {
    let before = "*.png binary\n\n# /swipe gen\nold.go -diff\n# swipe gen/\n*.pdf binary\n";
    let out = update(
        Path::new(".gitattributes"),
        before,
        &entries_of(&["svc/swipe_gen_service_endpoint.go", "swipe_gen_config_config.go"]),
    )
    .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        out,
        "*.png binary\n\n# /swipe gen\nsvc/swipe_gen_service_endpoint.go -diff\n\
         swipe_gen_config_config.go -diff\n# swipe gen/\n*.pdf binary\n"
    );
}

#[test]
fn half_present_markers_are_corruption() {
    let only_start = "\n# /swipe gen\na.go -diff\n";
    let err = update(Path::new(".gitattributes"), only_start, &[])
        .err()
        .unwrap_or_else(|| panic!("expected corruption"));
    assert!(matches!(err, GitattributesError::Corrupted { missing: "# swipe gen/", .. }));

    let only_end = "a.go -diff\n# swipe gen/\n";
    let err = update(Path::new(".gitattributes"), only_end, &[])
        .err()
        .unwrap_or_else(|| panic!("expected corruption"));
    assert!(matches!(err, GitattributesError::Corrupted { found: "# swipe gen/", .. }));

    let diagnostic = Diagnostic::from(err);
    assert_eq!(diagnostic.kind, ErrorKind::Io);
}

#[test]
fn entries_are_relative_and_sorted() {
    let root = Path::new("/work");
    let written = vec![
        PathBuf::from("/work/svc/swipe_gen_service_endpoint.go"),
        PathBuf::from("/work/swipe_gen_config_config.go"),
        PathBuf::from("/work/svc/swipe_gen_service_endpoint.go"),
    ];
    assert_eq!(
        entries(root, &written),
        vec!["svc/swipe_gen_service_endpoint.go", "swipe_gen_config_config.go"]
    );
}

#[test]
fn rewrite_creates_and_then_updates_the_file() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    rewrite(root, &[root.join("swipe_gen_config_config.go")]).unwrap_or_else(|e| panic!("{e}"));
    rewrite(root, &[root.join("svc/swipe_gen_service_http_server.go")])
        .unwrap_or_else(|e| panic!("{e}"));
    let content = std::fs::read_to_string(root.join(FILENAME)).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        content,
        "\n# /swipe gen\nsvc/swipe_gen_service_http_server.go -diff\n# swipe gen/\n"
    );
}
