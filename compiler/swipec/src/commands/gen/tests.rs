use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use swipe_diagnostic::ErrorKind;
use swipe_gen::Passthrough;
use swipe_ir::CancellationToken;
use swipe_types::MemoryDriver;

use super::{report_lines, run, GenOptions, GenReport, FAILURE_SUMMARY};

const MODULE: &str = "example.com/app";

const APP: &str = "package app

type Config struct {
	Addr  string `env:\"ADDR,required\"`
	Debug bool
}
";

const DSL: &str = "//go:build swipe

package app

import \"example.com/app/pkg/swipe/config\"

func Swipe() {
	config.Config(
		config.Environment(&Config{}),
		config.ConfigMarkdownDoc(\"docs\"),
	)
}
";

fn driver(root: &Path, files: &[(&str, &str)]) -> MemoryDriver {
    let mut driver = MemoryDriver::new(MODULE, root).with_std_stubs();
    for entry in swipe_plugins::registry().iter() {
        let name = entry.package_name();
        let src = format!("package {name}\n\n{}", entry.stub);
        driver.add_file(&format!("{MODULE}/pkg/swipe/{name}"), "swipe.go", &src);
    }
    for (name, src) in files {
        driver.add_file(MODULE, name, src);
    }
    driver
}

fn gen(root: &Path, driver: &MemoryDriver, cancel: &CancellationToken) -> GenReport {
    let opts = GenOptions {
        work_dir: root.to_path_buf(),
        verbose: false,
        patterns: Vec::new(),
    };
    run(&opts, driver, &Passthrough, cancel)
}

fn rel(root: &Path, paths: &[std::path::PathBuf]) -> Vec<String> {
    let mut out: Vec<_> = paths
        .iter()
        .map(|p| p.strip_prefix(root).unwrap_or(p).to_string_lossy().replace('\\', "/"))
        .collect();
    out.sort();
    out
}

#[test]
fn writes_outputs_and_lists_them_in_gitattributes() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    fs::write(root.join("swipe_gen_stale_endpoint.go"), "package app\n")
        .unwrap_or_else(|e| panic!("{e}"));

    let report = gen(root, &driver(root, &[("app.go", APP), ("swipe.go", DSL)]), &CancellationToken::new());
    let messages: Vec<_> = report.diagnostics.iter().map(ToString::to_string).collect();
    assert!(report.is_ok(), "{messages:?}");
    assert_eq!(rel(root, &report.removed), vec!["swipe_gen_stale_endpoint.go"]);
    assert_eq!(
        rel(root, &report.written),
        vec!["docs/swipe_gen_config_config.md", "swipe_gen_config_config.go"]
    );

    let loader = fs::read_to_string(root.join("swipe_gen_config_config.go"))
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(loader.contains("func LoadConfig() (cfg *Config, errs []error)"), "{loader}");
    assert!(!root.join("swipe_gen_stale_endpoint.go").exists());

    let attrs = fs::read_to_string(root.join(".gitattributes")).unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(
        attrs,
        "\n# /swipe gen\ndocs/swipe_gen_config_config.md -diff\n\
         swipe_gen_config_config.go -diff\n# swipe gen/\n"
    );
}

#[test]
fn no_swipe_calls_is_only_a_warning() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    let report = gen(root, &driver(root, &[("app.go", APP)]), &CancellationToken::new());
    assert!(report.is_ok());
    assert!(report.written.is_empty());
    assert_eq!(report.diagnostics.count(ErrorKind::Warn), 1);
}

#[test]
fn configuration_errors_fail_the_run() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    let dsl = DSL.replace("config.Environment(&Config{}),\n", "");
    let report = gen(root, &driver(root, &[("app.go", APP), ("swipe.go", &dsl)]), &CancellationToken::new());
    assert!(!report.is_ok());
    assert_eq!(report.diagnostics.count(ErrorKind::Config), 1);
    assert!(report.written.is_empty());

    let lines = report_lines(&report.diagnostics.into_sorted());
    assert_eq!(lines.last().map(String::as_str), Some(FAILURE_SUMMARY));
    assert!(lines[0].starts_with("config: "), "{lines:?}");
}

#[test]
fn warnings_alone_print_no_failure_summary() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    let report = gen(root, &driver(root, &[("app.go", APP)]), &CancellationToken::new());
    let lines = report_lines(&report.diagnostics.into_sorted());
    assert_eq!(lines.len(), 1);
    assert!(!lines.contains(&FAILURE_SUMMARY.to_string()));
}

#[test]
fn corrupted_gitattributes_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    fs::write(root.join(".gitattributes"), "\n# /swipe gen\nold.go -diff\n")
        .unwrap_or_else(|e| panic!("{e}"));
    let report = gen(root, &driver(root, &[("app.go", APP), ("swipe.go", DSL)]), &CancellationToken::new());
    assert!(!report.is_ok());
    assert_eq!(report.diagnostics.count(ErrorKind::Io), 1);
}

#[test]
fn cancelled_runs_write_nothing() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    let root = dir.path();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = gen(root, &driver(root, &[("app.go", APP), ("swipe.go", DSL)]), &cancel);
    assert_eq!(report.diagnostics.count(ErrorKind::Cancelled), 1);
    assert!(report.written.is_empty());
    assert!(!root.join(".gitattributes").exists());
}
