use std::fs;

use pretty_assertions::assert_eq;
use swipe_diagnostic::{Diagnostic, Diagnostics, ErrorKind};
use swipe_gen::GeneratedFile;

use super::{write_atomic, write_files};

#[test]
fn creates_missing_directories_and_replaces_content() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let path = dir.path().join("docs/api/swipe_gen_service_openapi.json");
    write_atomic(&path, b"{}").unwrap_or_else(|e| panic!("{e}"));
    write_atomic(&path, b"{\"openapi\": \"3.0.0\"}").unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("{e}")),
        "{\"openapi\": \"3.0.0\"}"
    );
    // Only the target remains; the temporary file was renamed over it.
    let entries = fs::read_dir(path.parent().unwrap_or_else(|| panic!("no parent")))
        .unwrap_or_else(|e| panic!("{e}"))
        .count();
    assert_eq!(entries, 1);
}

#[test]
fn files_with_generator_errors_are_reported_not_written() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let good = dir.path().join("swipe_gen_config_config.go");
    let bad = dir.path().join("swipe_gen_service_endpoint.go");
    let files = vec![
        GeneratedFile {
            path: good.clone(),
            plugin_id: "Config",
            content: b"package app\n".to_vec(),
            errors: Vec::new(),
        },
        GeneratedFile {
            path: bad.clone(),
            plugin_id: "Service",
            content: b"package app\n".to_vec(),
            errors: vec![Diagnostic::generate("endpoint: boom")],
        },
    ];
    let mut diagnostics = Diagnostics::new();
    let written = write_files(files, &mut diagnostics);
    assert_eq!(written, vec![good.clone()]);
    assert!(good.exists());
    assert!(!bad.exists());
    assert_eq!(diagnostics.count(ErrorKind::Generate), 1);
}
