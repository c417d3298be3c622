use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;

use super::go_list::decode_stream;
use super::*;

fn opts(patterns: &[&str]) -> LoadOptions {
    LoadOptions {
        work_dir: PathBuf::from("/work"),
        env: Vec::new(),
        patterns: patterns.iter().map(ToString::to_string).collect(),
    }
}

#[test]
fn decodes_concatenated_json_objects() {
    let stream = br#"{
        "ImportPath": "context",
        "Name": "context",
        "Dir": "/usr/lib/go/src/context",
        "GoFiles": ["context.go"],
        "Standard": true,
        "DepOnly": true
    }
    {
        "ImportPath": "example.com/app",
        "Name": "app",
        "Dir": "/work",
        "GoFiles": ["svc.go", "swipe.go"],
        "Imports": ["context"],
        "Module": {"Path": "example.com/app", "Dir": "/work", "Main": true},
        "Error": {"Pos": "svc.go:3:1", "Err": "boom"}
    }"#;
    let packages = decode_stream(stream).unwrap_or_else(|e| panic!("decode failed: {e}"));
    assert_eq!(packages.len(), 2);
    assert!(packages[0].standard && packages[0].dep_only);
    let app = &packages[1];
    assert_eq!(app.import_path, "example.com/app");
    assert_eq!(
        app.source_files().collect::<Vec<_>>(),
        vec![PathBuf::from("/work/svc.go"), PathBuf::from("/work/swipe.go")]
    );
    assert_eq!(app.module.as_ref().map(|m| m.main), Some(true));
    assert_eq!(app.error.as_ref().map(|e| e.err.as_str()), Some("boom"));
}

#[test]
fn malformed_stream_is_a_json_error() {
    let err = decode_stream(b"{\"ImportPath\": ").err();
    assert!(matches!(err, Some(LoadError::Json(_))));
}

#[test]
fn memory_driver_lists_dependencies_first() {
    let mut driver = MemoryDriver::new("example.com/app", "/work").with_std_stubs();
    driver
        .add_file("example.com/app", "main.go", "package app\n\nimport \"example.com/app/store\"\n\nvar _ = store.X\n")
        .add_file("example.com/app/store", "store.go", "package store\n\nimport \"context\"\n\nvar X context.Context\n");
    let listed = driver
        .list(&opts(&["."]))
        .unwrap_or_else(|e| panic!("list failed: {e}"));
    let order: Vec<_> = listed.iter().map(|p| p.import_path.as_str()).collect();
    assert_eq!(order, vec!["context", "example.com/app/store", "example.com/app"]);
    assert!(listed[0].standard);
    assert!(listed[1].dep_only);
    assert!(!listed[2].dep_only);
    assert_eq!(listed[1].dir, Path::new("/work/store"));
}

#[test]
fn memory_driver_recursive_pattern() {
    let mut driver = MemoryDriver::new("example.com/app", "/work");
    driver
        .add_file("example.com/app", "a.go", "package app\n")
        .add_file("example.com/app/internal/b", "b.go", "package b\n");
    let listed = driver
        .list(&opts(&["./..."]))
        .unwrap_or_else(|e| panic!("list failed: {e}"));
    assert_eq!(listed.iter().filter(|p| !p.dep_only).count(), 2);
}

#[test]
fn swipe_tag_files_are_visible() {
    let mut driver = MemoryDriver::new("example.com/app", "/work");
    driver
        .add_file("example.com/app", "a.go", "package app\n")
        .add_file("example.com/app", "swipe.go", "//go:build swipe\n\npackage app\n")
        .add_file("example.com/app", "skip.go", "//go:build !swipe\n\npackage app\n");
    let listed = driver
        .list(&opts(&["."]))
        .unwrap_or_else(|e| panic!("list failed: {e}"));
    assert_eq!(listed[0].go_files, vec!["a.go".to_string(), "swipe.go".to_string()]);
}

#[test]
fn unknown_imports_and_excluded_packages_carry_errors() {
    let mut driver = MemoryDriver::new("example.com/app", "/work");
    driver
        .add_file("example.com/app", "a.go", "package app\n\nimport \"example.com/missing\"\n")
        .add_file("example.com/app/gone", "gone.go", "//go:build ignore\n\npackage gone\n");
    let listed = driver
        .list(&opts(&["./..."]))
        .unwrap_or_else(|e| panic!("list failed: {e}"));
    let missing = listed
        .iter()
        .find(|p| p.import_path == "example.com/missing")
        .and_then(|p| p.error.as_ref())
        .map(|e| e.err.clone());
    assert_eq!(missing.as_deref(), Some("cannot find package \"example.com/missing\""));
    let gone = listed
        .iter()
        .find(|p| p.import_path == "example.com/app/gone")
        .and_then(|p| p.error.as_ref())
        .map(|e| e.err.clone())
        .unwrap_or_default();
    assert!(gone.starts_with("build constraints exclude all Go files"), "{gone}");
}

#[test]
fn read_file_reports_unregistered_paths() {
    let driver = MemoryDriver::new("example.com/app", "/work");
    let err = driver.read_file(Path::new("/work/nope.go")).err();
    assert_eq!(err.map(|e| e.kind()), Some(std::io::ErrorKind::NotFound));
}
