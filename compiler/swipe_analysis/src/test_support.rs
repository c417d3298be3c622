//! Loading helpers shared by the unit tests.

use std::path::PathBuf;

use swipe_ir::CancellationToken;
use swipe_types::{LoadOptions, MemoryDriver, Program, TypeId};

pub(crate) const MODULE: &str = "example.com/app";

/// Load `files` (`(import path, file name, source)`) as module
/// `example.com/app` rooted at `/work`.
pub(crate) fn load(files: &[(&str, &str, &str)]) -> Program {
    let mut driver = MemoryDriver::new(MODULE, "/work").with_std_stubs();
    for (pkg, name, src) in files {
        driver.add_file(pkg, name, src);
    }
    let opts = LoadOptions {
        work_dir: PathBuf::from("/work"),
        env: Vec::new(),
        patterns: vec!["./...".into()],
    };
    let prog = Program::load(&driver, &opts, &CancellationToken::new())
        .unwrap_or_else(|e| panic!("load failed: {e}"));
    let errors: Vec<_> = prog.errors().map(|(_, e)| e.to_string()).collect();
    assert!(errors.is_empty(), "package errors: {errors:?}");
    prog
}

pub(crate) fn load_app(src: &str) -> Program {
    load(&[(MODULE, "app.go", src)])
}

/// Type of package-level object `name` of package `pkg`.
pub(crate) fn type_in(prog: &Program, pkg: &str, name: &str) -> TypeId {
    let pkg = prog
        .package_by_path(pkg)
        .unwrap_or_else(|| panic!("package {pkg} not loaded"));
    let obj = prog
        .lookup(pkg.id, name)
        .unwrap_or_else(|| panic!("{name} not declared"));
    prog.object(obj).ty
}

pub(crate) fn app_type(prog: &Program, name: &str) -> TypeId {
    type_in(prog, MODULE, name)
}
