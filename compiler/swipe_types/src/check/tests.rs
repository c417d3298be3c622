use std::path::PathBuf;

use pretty_assertions::assert_eq;
use swipe_ir::CancellationToken;
use swipe_syntax::ast::{walk_file, ExprId, ExprKind, File, Visitor};

use crate::{
    ConstValue, FileId, LoadError, LoadOptions, MemoryDriver, ObjKind, Program, SelectionKind,
    TypeData, TypeId,
};

fn driver(files: &[(&str, &str, &str)]) -> MemoryDriver {
    let mut driver = MemoryDriver::new("example.com/app", "/work").with_std_stubs();
    for (pkg, name, src) in files {
        driver.add_file(pkg, name, src);
    }
    driver
}

fn opts(work_dir: &str, patterns: &[&str]) -> LoadOptions {
    LoadOptions {
        work_dir: PathBuf::from(work_dir),
        env: Vec::new(),
        patterns: patterns.iter().map(ToString::to_string).collect(),
    }
}

fn load(src: &str) -> Program {
    let driver = driver(&[("example.com/app", "app.go", src)]);
    Program::load(&driver, &opts("/work", &["./..."]), &CancellationToken::new())
        .unwrap_or_else(|e| panic!("load failed: {e}"))
}

fn app(prog: &Program) -> crate::PkgId {
    prog.package_by_path("example.com/app")
        .map(|p| p.id)
        .unwrap_or_else(|| panic!("app package missing"))
}

fn object_type(prog: &Program, name: &str) -> TypeId {
    let obj = prog
        .lookup(app(prog), name)
        .unwrap_or_else(|| panic!("{name} not declared"));
    prog.object(obj).ty
}

fn const_of(prog: &Program, name: &str) -> Option<ConstValue> {
    let obj = prog.lookup(app(prog), name)?;
    prog.object(obj).const_value().cloned()
}

/// Expressions of a file matching a predicate.
struct Collect<F> {
    pred: F,
    found: Vec<ExprId>,
}

impl<F: FnMut(&File, ExprId) -> bool> Visitor for Collect<F> {
    fn visit_expr(&mut self, file: &File, id: ExprId) -> bool {
        if (self.pred)(file, id) {
            self.found.push(id);
        }
        true
    }
}

fn find_exprs(prog: &Program, pred: impl FnMut(&File, ExprId) -> bool) -> (FileId, Vec<ExprId>) {
    let file = prog.package(app(prog)).files[0];
    let mut collect = Collect {
        pred,
        found: Vec::new(),
    };
    walk_file(&mut collect, &prog.file(file).ast);
    (file, collect.found)
}

fn ident_named(name: &'static str) -> impl FnMut(&File, ExprId) -> bool {
    move |file, id| matches!(&file.expr(id).kind, ExprKind::Ident(i) if i.name == name)
}

#[test]
fn iota_constants() {
    let prog = load(
        "package app

type Status int

const (
	A Status = iota
	B
	_
	D
	E = 10
	F
)

const Name = \"x\" + \"y\"

const Shift = 1 << 3
",
    );
    assert_eq!(const_of(&prog, "A"), Some(ConstValue::Int(0)));
    assert_eq!(const_of(&prog, "B"), Some(ConstValue::Int(1)));
    assert_eq!(const_of(&prog, "D"), Some(ConstValue::Int(3)));
    assert_eq!(const_of(&prog, "E"), Some(ConstValue::Int(10)));
    assert_eq!(const_of(&prog, "F"), Some(ConstValue::Int(10)));
    assert_eq!(const_of(&prog, "Name"), Some(ConstValue::String("xy".into())));
    assert_eq!(const_of(&prog, "Shift"), Some(ConstValue::Int(8)));
    let status = object_type(&prog, "Status");
    assert_eq!(object_type(&prog, "D"), status);
    assert_eq!(prog.type_string(status), "app.Status");
}

#[test]
fn method_sets_respect_pointer_receivers() {
    let prog = load(
        "package app

import \"context\"

type Svc interface {
	Create(ctx context.Context, name string) (int, error)
}

type impl struct{}

func (s *impl) Create(ctx context.Context, name string) (int, error) { return 0, nil }
",
    );
    let svc = object_type(&prog, "Svc");
    let imp = object_type(&prog, "impl");
    assert_eq!(prog.missing_method(imp, svc).as_deref(), Some("Create"));
    assert!(prog.pointer_implements(imp, svc));
    assert!(!prog.pointer_implements(svc, svc));
    assert_eq!(prog.methods(imp).len(), 1);
    assert!(prog.pool().is_interface(svc));
}

#[test]
fn pointer_receiver_types_implement_through_expressions() {
    let prog = load(
        "package app

type Svc interface{ Do() error }

type impl struct{}

func (*impl) Do() error { return nil }

var _ Svc = &impl{}
",
    );
    let svc = object_type(&prog, "Svc");
    let (file, found) = find_exprs(&prog, |f, id| {
        matches!(&f.expr(id).kind, ExprKind::Unary { .. })
    });
    let ty = prog.type_of(file, found[0]);
    assert_eq!(prog.type_string(ty), "*app.impl");
    assert!(prog.implements(ty, svc));
}

#[test]
fn error_types_and_return_constants() {
    let prog = load(
        "package app

type ErrUnauthorized struct{}

func (*ErrUnauthorized) Error() string { return \"unauthorized\" }

func (*ErrUnauthorized) ErrorCode() int { return -32001 }

func create(ok bool) error {
	if !ok {
		return &ErrUnauthorized{}
	}
	return nil
}
",
    );
    let err_ty = object_type(&prog, "ErrUnauthorized");
    let (file, lits) = find_exprs(&prog, |f, id| {
        matches!(&f.expr(id).kind, ExprKind::Unary { x, .. }
            if matches!(f.expr(*x).kind, ExprKind::BasicLit { .. }))
    });
    let info = prog
        .expr_info(file, lits[0])
        .unwrap_or_else(|| panic!("no info for -32001"));
    assert_eq!(info.constant, Some(ConstValue::Int(-32001)));
    assert_eq!(prog.type_string(info.ty), "int");

    let (file, comps) = find_exprs(&prog, |f, id| {
        matches!(&f.expr(id).kind, ExprKind::CompositeLit { .. })
    });
    assert_eq!(prog.type_of(file, comps[0]), err_ty);
    let error = prog
        .lookup_scope(crate::ScopeId::UNIVERSE, "error")
        .map_or(TypeId::INVALID, |o| prog.object(o).ty);
    let (file, addrs) = find_exprs(&prog, |f, id| {
        matches!(&f.expr(id).kind, ExprKind::Unary { x, .. }
            if matches!(f.expr(*x).kind, ExprKind::CompositeLit { .. }))
    });
    assert!(prog.implements(prog.type_of(file, addrs[0]), error));
}

#[test]
fn embedded_fields_and_methods_are_promoted() {
    let prog = load(
        "package app

type Base struct{ ID int }

func (Base) Hello() string { return \"\" }

type User struct {
	Base
	Name string `json:\"name\"`
}
",
    );
    let user = object_type(&prog, "User");
    let id = prog
        .lookup_field_or_method(user, "ID")
        .unwrap_or_else(|| panic!("ID not found"));
    assert_eq!(
        id.kind,
        SelectionKind::Field {
            ty: TypeId::basic(crate::BasicKind::Int),
            index: vec![0, 0],
        }
    );
    let hello = prog.lookup_field_or_method(user, "Hello");
    assert!(hello.and_then(|s| s.method()).is_some());
    let TypeData::Struct(fields) = prog.pool().underlying_data(user) else {
        panic!("User is not a struct");
    };
    assert_eq!(fields[1].tag.as_deref(), Some("json:\"name\""));
    assert!(fields[0].embedded);
}

#[test]
fn local_variables_get_types() {
    let prog = load(
        "package app

import \"fmt\"

func f(m map[string]int, xs []float64) string {
	for k, v := range m {
		_, _ = k, v
	}
	for i, x := range xs {
		_, _ = i, x
	}
	s := fmt.Sprintf(\"%d\", len(m))
	n, ok := m[\"a\"]
	_, _ = n, ok
	return s
}
",
    );
    let check = |name: &'static str, want: &str| {
        let (file, ids) = find_exprs(&prog, ident_named(name));
        let ty = prog.type_of(file, ids[0]);
        assert_eq!(prog.type_string(ty), want, "{name}");
    };
    check("k", "string");
    check("v", "int");
    check("i", "int");
    check("x", "float64");
    check("s", "string");
    check("n", "int");
    check("ok", "bool");
}

#[test]
fn qualified_identifiers_resolve_into_dependencies() {
    let prog = load(
        "package app

import \"context\"

func run(ctx context.Context) error { return ctx.Err() }
",
    );
    let run = object_type(&prog, "run");
    assert_eq!(prog.type_string(run), "func(ctx context.Context) error");
    let (file, calls) = find_exprs(&prog, |f, id| matches!(f.expr(id).kind, ExprKind::Call { .. }));
    assert_eq!(prog.type_string(prog.type_of(file, calls[0])), "error");
    let ctx_pkg = prog
        .package_by_path("context")
        .unwrap_or_else(|| panic!("context not listed"));
    assert!(!ctx_pkg.root);
    assert!(ctx_pkg.standard);
}

#[test]
fn objects_carry_positions() {
    let prog = load("package app\n\nvar Answer = 42\n");
    let obj = prog
        .lookup(app(&prog), "Answer")
        .unwrap_or_else(|| panic!("Answer missing"));
    let pos = prog
        .object_position(obj)
        .unwrap_or_else(|| panic!("no position"));
    assert_eq!((pos.line, pos.column), (3, 5));
    assert_eq!(pos.file, PathBuf::from("/work/app.go"));
    assert!(matches!(prog.object(obj).kind, ObjKind::Var(_)));
    assert_eq!(prog.type_string(prog.object(obj).ty), "int");
}

#[test]
fn syntax_errors_become_package_errors() {
    let prog = load("package app\n\nfunc broken( {\n");
    let errors: Vec<_> = prog.errors().map(|(_, e)| e.clone()).collect();
    assert!(!errors.is_empty());
    assert!(errors[0].pos.is_some());
}

#[test]
fn duplicate_declarations_are_reported() {
    let prog = load("package app\n\nvar X = 1\n\nvar X = 2\n");
    let messages: Vec<_> = prog.errors().map(|(_, e)| e.message.clone()).collect();
    assert_eq!(messages, vec!["X redeclared in this block".to_string()]);
}

#[test]
fn unknown_import_is_a_package_error() {
    let prog = load("package app\n\nimport \"example.com/nowhere\"\n");
    let messages: Vec<_> = prog.errors().map(|(_, e)| e.message.clone()).collect();
    assert!(
        messages.iter().any(|m| m.contains("example.com/nowhere")),
        "{messages:?}"
    );
}

#[test]
fn no_packages_is_fatal() {
    let driver = driver(&[("example.com/app", "app.go", "package app\n")]);
    let err = Program::load(&driver, &opts("/work", &["./missing"]), &CancellationToken::new()).err();
    assert!(matches!(err, Some(LoadError::NoPackages { .. })), "{err:?}");
}

#[test]
fn module_must_live_in_work_dir() {
    let driver = driver(&[("example.com/app", "app.go", "package app\n")]);
    let err = Program::load(
        &driver,
        &opts("/elsewhere", &["example.com/app"]),
        &CancellationToken::new(),
    )
    .err();
    assert!(matches!(err, Some(LoadError::ModuleMissing { .. })), "{err:?}");
}

#[test]
fn cancelled_load_stops() {
    let driver = driver(&[("example.com/app", "app.go", "package app\n")]);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = Program::load(&driver, &opts("/work", &["./..."]), &cancel).err();
    assert!(matches!(err, Some(LoadError::Cancelled)));
}
