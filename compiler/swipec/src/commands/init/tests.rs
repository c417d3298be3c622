use std::fs;

use pretty_assertions::assert_eq;

use super::run;

#[test]
fn writes_one_package_per_plugin() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    let written = run(root, "pkg", &swipe_plugins::registry()).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        written,
        vec![
            root.join("pkg/swipe/config/swipe.go"),
            root.join("pkg/swipe/service/swipe.go"),
        ]
    );

    let config = fs::read_to_string(&written[0]).unwrap_or_else(|e| panic!("{e}"));
    assert!(config.starts_with("package config\n\n"), "{config}");
    assert!(config.contains("@swipe:\"Config\""));

    let service = fs::read_to_string(&written[1]).unwrap_or_else(|e| panic!("{e}"));
    assert!(service.starts_with("package service\n\n"));
    assert!(service.contains("func Interface("));
}

#[test]
fn rerunning_overwrites_the_stubs() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    let first = run(root, "internal", &swipe_plugins::registry()).unwrap_or_else(|e| panic!("{e}"));
    fs::write(&first[0], "edited").unwrap_or_else(|e| panic!("{e}"));
    let second = run(root, "internal", &swipe_plugins::registry()).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(first, second);
    let config = fs::read_to_string(&second[0]).unwrap_or_else(|e| panic!("{e}"));
    assert!(config.starts_with("package config"));
}
