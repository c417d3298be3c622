use super::*;
use crate::ast::{ExprKind, StmtKind};
use pretty_assertions::assert_eq;

fn parse_ok(src: &str) -> File {
    let (file, errors) = parse_file(src);
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    file
}

fn func<'a>(file: &'a File, name: &str) -> &'a FuncDecl {
    file.decls
        .iter()
        .find_map(|d| match d {
            Decl::Func(f) if f.name.name == name => Some(f),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no func {name}"))
}

fn type_spec<'a>(file: &'a File, name: &str) -> &'a TypeSpec {
    file.decls
        .iter()
        .filter_map(|d| match d {
            Decl::Gen(g) => Some(g),
            _ => None,
        })
        .flat_map(|g| g.specs.iter())
        .find_map(|s| match s {
            Spec::Type(t) if t.name.name == name => Some(t),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no type {name}"))
}

fn body(file: &File, f: &FuncDecl) -> Vec<StmtKind> {
    let Some(body) = f.body else {
        panic!("no body")
    };
    match &file.stmt(body).kind {
        StmtKind::Block(list) => list.iter().map(|s| file.stmt(*s).kind.clone()).collect(),
        other => panic!("body is {other:?}"),
    }
}

#[test]
fn package_and_imports() {
    let file = parse_ok(
        r#"package app

import "fmt"

import (
	stdlog "log"
	_ "embed"
	"github.com/acme/app/pkg/service"
)
"#,
    );
    assert_eq!(file.package_name(), "app");
    let imports: Vec<(Option<&str>, &str)> = file
        .imports()
        .map(|i| (i.name.as_ref().map(|n| n.name.as_str()), i.path.as_str()))
        .collect();
    assert_eq!(
        imports,
        vec![
            (None, "fmt"),
            (Some("stdlog"), "log"),
            (Some("_"), "embed"),
            (None, "github.com/acme/app/pkg/service"),
        ]
    );
}

#[test]
fn doc_and_line_comments_attach() {
    let file = parse_ok(
        r"// Package app does things.
package app

// Service is the API.
// It has two lines.
type Service interface {
	// Create makes a thing.
	Create(ctx context.Context, name string) (id int, err error) // trailing
}

// Detached comment.

func Loose() {}
",
    );
    assert_eq!(
        file.comment_lines(file.doc),
        vec!["Package app does things.".to_string()]
    );
    let Decl::Gen(decl) = &file.decls[0] else {
        panic!("expected type decl")
    };
    assert_eq!(
        file.comment_lines(decl.doc),
        vec!["Service is the API.".to_string(), "It has two lines.".to_string()]
    );
    let spec = type_spec(&file, "Service");
    let ExprKind::InterfaceType { elems } = &file.expr(spec.ty).kind else {
        panic!("expected interface")
    };
    assert_eq!(elems.len(), 1);
    assert_eq!(elems[0].names[0].name, "Create");
    assert_eq!(
        file.comment_lines(elems[0].doc),
        vec!["Create makes a thing.".to_string()]
    );
    assert_eq!(file.comment_lines(elems[0].comment), vec!["trailing".to_string()]);

    let ExprKind::FuncType(sig) = &file.expr(elems[0].ty).kind else {
        panic!("expected method signature")
    };
    assert_eq!(sig.params.len(), 2);
    assert_eq!(sig.results.len(), 2);
    assert_eq!(sig.results[1].names[0].name, "err");

    // Separated by a blank line: not a doc comment.
    assert_eq!(func(&file, "Loose").doc, None);
}

#[test]
fn grouped_params_share_type() {
    let file = parse_ok("package p\nfunc f(a, b int, c ...string) (int, error) { return 0, nil }\n");
    let f = func(&file, "f");
    let names: Vec<Vec<&str>> = f
        .sig
        .params
        .iter()
        .map(|p| p.names.iter().map(|n| n.name.as_str()).collect())
        .collect();
    assert_eq!(names, vec![vec!["a", "b"], vec!["c"]]);
    assert!(matches!(
        file.expr(f.sig.params[1].ty).kind,
        ExprKind::Ellipsis(Some(_))
    ));
    assert!(f.sig.results.iter().all(|r| r.names.is_empty()));
}

#[test]
fn unnamed_params_are_types() {
    let file = parse_ok("package p\ntype F func(int, *bytes.Buffer, []string)\n");
    let spec = type_spec(&file, "F");
    let ExprKind::FuncType(sig) = &file.expr(spec.ty).kind else {
        panic!("expected func type")
    };
    assert_eq!(sig.params.len(), 3);
    assert!(sig.params.iter().all(|p| p.names.is_empty()));
}

#[test]
fn struct_fields_tags_and_embedding() {
    let file = parse_ok(
        r#"package p
type User struct {
	Base
	*pkg.Other
	ID, Age int `json:"id"`
	Tags    []string
	Grid    [4]int // grid
	Ptr     Generic[int]
}
"#,
    );
    let spec = type_spec(&file, "User");
    let ExprKind::StructType { fields } = &file.expr(spec.ty).kind else {
        panic!("expected struct")
    };
    assert_eq!(fields.len(), 6);
    assert!(fields[0].names.is_empty());
    assert!(fields[1].names.is_empty());
    assert!(matches!(file.expr(fields[1].ty).kind, ExprKind::Star(_)));
    assert_eq!(fields[2].names.len(), 2);
    assert_eq!(fields[2].tag.as_deref(), Some(r#"`json:"id"`"#));
    assert!(matches!(
        file.expr(fields[4].ty).kind,
        ExprKind::ArrayType { len: Some(_), .. }
    ));
    assert_eq!(file.comment_lines(fields[4].comment), vec!["grid".to_string()]);
    assert!(matches!(file.expr(fields[5].ty).kind, ExprKind::Index { .. }));
}

#[test]
fn generic_declarations() {
    let file = parse_ok(
        "package p
type List[T any] struct{ items []T }
type Number interface{ ~int | ~float64 }
type Arr [4]int
func Map[T, U any](xs []T, f func(T) U) []U { return nil }
",
    );
    assert_eq!(type_spec(&file, "List").type_params.len(), 1);
    assert!(type_spec(&file, "Arr").type_params.is_empty());
    let number = type_spec(&file, "Number");
    let ExprKind::InterfaceType { elems } = &file.expr(number.ty).kind else {
        panic!("expected interface")
    };
    assert!(matches!(
        file.expr(elems[0].ty).kind,
        ExprKind::Binary {
            op: TokenKind::Or,
            ..
        }
    ));
    let f = func(&file, "Map");
    assert_eq!(f.sig.type_params[0].names.len(), 2);
}

#[test]
fn composite_literal_in_control_clause() {
    let file = parse_ok(
        "package p
func f() {
	if x == (T{}) {
	}
	for _, v := range []int{1, 2} {
		_ = v
	}
	if v := (Point{X: 1}); v.X > 0 {
	}
	s := map[string][]int{\"a\": {1}}
	_ = s
}
",
    );
    let stmts = body(&file, func(&file, "f"));
    assert_eq!(stmts.len(), 5);
    assert!(matches!(stmts[0], StmtKind::If { init: None, .. }));
    assert!(matches!(stmts[1], StmtKind::Range { define: true, .. }));
    assert!(matches!(stmts[2], StmtKind::If { init: Some(_), .. }));
}

#[test]
fn bare_type_before_brace_is_condition() {
    let file = parse_ok("package p\nfunc f() {\n\tif ok {\n\t\treturn\n\t}\n}\n");
    let stmts = body(&file, func(&file, "f"));
    let StmtKind::If { cond, .. } = &stmts[0] else {
        panic!("expected if")
    };
    assert!(matches!(file.expr(*cond).kind, ExprKind::Ident(_)));
}

#[test]
fn statements() {
    let file = parse_ok(
        "package p
func f(ch chan int, v interface{}) (err error) {
	var x int
	x++
	ch <- x
	go func() {}()
	defer close(ch)
outer:
	for i := 0; i < 3; i++ {
		continue outer
	}
	switch t := v.(type) {
	case nil, *int:
	default:
		_ = t
	}
	switch {
	case x > 1:
		fallthrough
	case x > 0:
	}
	select {
	case y := <-ch:
		_ = y
	case ch <- 1:
	default:
	}
	for range ch {
	}
	return
}
",
    );
    let stmts = body(&file, func(&file, "f"));
    let kinds: Vec<&str> = stmts
        .iter()
        .map(|s| match s {
            StmtKind::Decl(_) => "decl",
            StmtKind::IncDec { .. } => "incdec",
            StmtKind::Send { .. } => "send",
            StmtKind::Go(_) => "go",
            StmtKind::Defer(_) => "defer",
            StmtKind::Labeled { .. } => "labeled",
            StmtKind::TypeSwitch { .. } => "typeswitch",
            StmtKind::Switch { .. } => "switch",
            StmtKind::Select { .. } => "select",
            StmtKind::Range { .. } => "range",
            StmtKind::Return(_) => "return",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "decl",
            "incdec",
            "send",
            "go",
            "defer",
            "labeled",
            "typeswitch",
            "switch",
            "select",
            "range",
            "return"
        ]
    );
}

#[test]
fn methods_and_receivers() {
    let file = parse_ok(
        "package p
func (s *service) Create(ctx context.Context) error { return nil }
func (List[T]) Len() int { return 0 }
",
    );
    let create = func(&file, "Create");
    let recv = create.recv.as_ref().unwrap_or_else(|| panic!("receiver"));
    assert_eq!(recv.names[0].name, "s");
    assert!(matches!(file.expr(recv.ty).kind, ExprKind::Star(_)));
    let len = func(&file, "Len");
    let recv = len.recv.as_ref().unwrap_or_else(|| panic!("receiver"));
    assert!(recv.names.is_empty());
    assert!(matches!(file.expr(recv.ty).kind, ExprKind::Index { .. }));
}

#[test]
fn const_group_iota_positions() {
    let file = parse_ok("package p\nconst (\n\tA = iota\n\tB\n\tC\n)\n");
    let Decl::Gen(decl) = &file.decls[0] else {
        panic!("expected const decl")
    };
    let iotas: Vec<u32> = decl
        .specs
        .iter()
        .map(|s| match s {
            Spec::Value(v) => v.iota,
            _ => u32::MAX,
        })
        .collect();
    assert_eq!(iotas, vec![0, 1, 2]);
}

#[test]
fn build_constraint_recorded() {
    let file = parse_ok("//go:build swipe\n\npackage p\n");
    assert_eq!(file.build_constraint.as_deref(), Some("swipe"));
}

#[test]
fn recovers_after_bad_declaration() {
    let (file, errors) = parse_file("package p\nfunc f( {\n}\nfunc g() {}\n");
    assert!(!errors.is_empty());
    assert!(file
        .decls
        .iter()
        .any(|d| matches!(d, Decl::Func(f) if f.name.name == "g")));
}

#[test]
fn missing_package_clause() {
    let (_, errors) = parse_file("func f() {}\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("'package'"));
    assert_eq!((errors[0].line, errors[0].column), (1, 1));
}

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 2000;
    let src = format!(
        "package p\nvar x = {}1{}\n",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let (_, errors) = parse_file(&src);
    assert!(errors.is_empty());
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parser_never_panics(src in "[a-z(){}\\[\\];:=,. \n\"*&<-]{0,80}") {
            let _ = parse_file(&format!("package p\n{src}"));
        }
    }
}
