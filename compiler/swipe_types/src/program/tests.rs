use std::path::PathBuf;

use pretty_assertions::assert_eq;
use swipe_ir::CancellationToken;

use crate::{BasicKind, LoadOptions, MemoryDriver, Program, TypeId};

fn load(src: &str) -> Program {
    let mut driver = MemoryDriver::new("example.com/app", "/work").with_std_stubs();
    driver.add_file("example.com/app", "app.go", src);
    let opts = LoadOptions {
        work_dir: PathBuf::from("/work"),
        env: Vec::new(),
        patterns: vec![".".into()],
    };
    Program::load(&driver, &opts, &CancellationToken::new())
        .unwrap_or_else(|e| panic!("load failed: {e}"))
}

fn ty(prog: &Program, name: &str) -> TypeId {
    let pkg = prog
        .package_by_path("example.com/app")
        .unwrap_or_else(|| panic!("no app package"));
    let obj = prog
        .lookup(pkg.id, name)
        .unwrap_or_else(|| panic!("{name} not declared"));
    prog.object(obj).ty
}

const SRC: &str = "package app

import \"context\"

type User struct {
	ID   int
	Tags []string
}

type Store interface {
	Get(ctx context.Context, ids ...int) (map[string]*User, error)
	Watch() <-chan User
}

type Alias = User

type Level int

var Levels [3]Level

func Find(ctx context.Context, id int) (user User, err error) { return }
";

#[test]
fn type_strings() {
    let prog = load(SRC);
    assert_eq!(
        prog.type_string(ty(&prog, "Find")),
        "func(ctx context.Context, id int) (user app.User, err error)"
    );
    assert_eq!(
        prog.type_string(prog.underlying(ty(&prog, "User"))),
        "struct{ID int; Tags []string}"
    );
    assert_eq!(
        prog.type_string(prog.underlying(ty(&prog, "Store"))),
        "interface{Get(ctx context.Context, ids ...int) (map[string]*app.User, error); Watch() <-chan app.User}"
    );
    assert_eq!(prog.type_string(ty(&prog, "Levels")), "[3]app.Level");
}

#[test]
fn aliases_share_the_target_type() {
    let prog = load(SRC);
    assert_eq!(ty(&prog, "Alias"), ty(&prog, "User"));
}

#[test]
fn assignability() {
    let prog = load(SRC);
    let level = ty(&prog, "Level");
    let int = TypeId::basic(BasicKind::Int);
    assert!(prog.assignable(TypeId::basic(BasicKind::UntypedInt), level));
    assert!(!prog.assignable(int, level));
    assert!(prog.assignable(level, level));
}

#[test]
fn package_objects_are_sorted() {
    let prog = load(SRC);
    let pkg = prog
        .package_by_path("example.com/app")
        .unwrap_or_else(|| panic!("no app package"));
    let names: Vec<_> = prog
        .package_objects(pkg.id)
        .into_iter()
        .map(|o| prog.object(o).name.clone())
        .collect();
    assert_eq!(names, vec!["Alias", "Find", "Level", "Levels", "Store", "User"]);
    let user = prog
        .lookup(pkg.id, "User")
        .unwrap_or_else(|| panic!("User missing"));
    assert_eq!(prog.qualified_name(user), ("example.com/app", "User"));
}

#[test]
fn main_module_and_roots() {
    let prog = load(SRC);
    assert_eq!(prog.main_module().path, "example.com/app");
    let roots: Vec<_> = prog.root_packages().map(|p| p.path.as_str()).collect();
    assert_eq!(roots, vec!["example.com/app"]);
    assert_eq!(prog.work_dir(), std::path::Path::new("/work"));
    assert_eq!(prog.errors().count(), 0);
}
