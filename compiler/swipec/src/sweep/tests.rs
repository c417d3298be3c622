use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use super::sweep;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("{e}"));
    }
    fs::write(path, "package x\n").unwrap_or_else(|e| panic!("{e}"));
}

#[test]
fn removes_generated_files_outside_vendor() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    touch(root, "swipe_gen_config_config.go");
    touch(root, "svc/swipe_gen_service_endpoint.go");
    touch(root, "docs/swipe_gen_config_config.md");
    touch(root, "svc/service.go");
    touch(root, "vendor/lib/swipe_gen_service_endpoint.go");

    let removed = sweep(root).unwrap_or_else(|e| panic!("{e}"));
    let mut rel: Vec<_> = removed
        .iter()
        .map(|p| p.strip_prefix(root).unwrap_or(p).to_string_lossy().replace('\\', "/"))
        .collect();
    rel.sort();
    assert_eq!(
        rel,
        vec![
            "docs/swipe_gen_config_config.md",
            "svc/swipe_gen_service_endpoint.go",
            "swipe_gen_config_config.go",
        ]
    );
    assert!(root.join("svc/service.go").exists());
    assert!(root.join("vendor/lib/swipe_gen_service_endpoint.go").exists());
}

#[test]
fn empty_tree_removes_nothing() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    assert!(sweep(dir.path()).unwrap_or_else(|e| panic!("{e}")).is_empty());
}
