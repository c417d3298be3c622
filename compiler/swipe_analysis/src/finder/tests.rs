use pretty_assertions::assert_eq;

use super::{find_errors, find_iface_errors};
use crate::graph::TypeGraph;
use crate::test_support::{app_type, load, load_app, MODULE};

const APP: &str = "package app

import \"context\"

type ErrUnauthorized struct{}

func (*ErrUnauthorized) Error() string { return \"unauthorized\" }

func (*ErrUnauthorized) ErrorCode() int { return -32001 }

type ErrConflict struct{}

func (ErrConflict) Error() string { return \"conflict\" }

func (ErrConflict) StatusCode() int { return 409 }

func (ErrConflict) Code() string { return \"conflict\" }

type notAnError struct{}

func (notAnError) ErrorCode() int {
	if true {
		return 1
	}
	return 2
}

type Store interface {
	Insert(name string) error
}

type memStore struct{}

func (m *memStore) Insert(name string) error {
	if name == \"dup\" {
		return ErrConflict{}
	}
	return nil
}

type Svc interface {
	Create(ctx context.Context, name string) (int, error)
	Delete(ctx context.Context, id int) error
}

type svc struct {
	store Store
}

func (s *svc) Create(ctx context.Context, name string) (int, error) {
	if name == \"\" {
		return 0, &ErrUnauthorized{}
	}
	for i := 0; i < 3; i++ {
		if err := s.store.Insert(name); err != nil {
			return 0, err
		}
	}
	return 1, nil
}

func (s *svc) Delete(ctx context.Context, id int) error {
	return nil
}
";

const STUB: &str = "package service

type ErrStub struct{}

func (ErrStub) Error() string { return \"stub\" }

func (ErrStub) ErrorCode() int { return 1 }
";

fn fixture() -> swipe_types::Program {
    load(&[
        (MODULE, "app.go", APP),
        ("example.com/app/swipe/service", "stub.go", STUB),
    ])
}

#[test]
fn finds_error_types_of_the_module() {
    let prog = fixture();
    let graph = TypeGraph::build(&prog);
    let errors = find_errors(&prog, &graph, MODULE);
    let mut names: Vec<_> = errors.iter().map(|e| e.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["ErrConflict", "ErrUnauthorized"]);

    let unauthorized = errors
        .iter()
        .find(|e| e.name == "ErrUnauthorized")
        .unwrap_or_else(|| panic!("ErrUnauthorized missing"));
    assert_eq!(unauthorized.code(), Some(-32001));
    assert_eq!(unauthorized.status_code, None);
    assert!(unauthorized.pointer);
    assert_eq!(unauthorized.obj_id, "example.com/app.ErrUnauthorized");
    assert_eq!(unauthorized.pkg_name, "app");

    let conflict = errors
        .iter()
        .find(|e| e.name == "ErrConflict")
        .unwrap_or_else(|| panic!("ErrConflict missing"));
    assert_eq!(conflict.error_code, None);
    assert_eq!(conflict.code(), Some(409));
    assert_eq!(conflict.code_str.as_deref(), Some("conflict"));
    assert!(!conflict.pointer);
}

#[test]
fn other_modules_yield_nothing() {
    let prog = fixture();
    let graph = TypeGraph::build(&prog);
    assert!(find_errors(&prog, &graph, "example.com/other").is_empty());
}

#[test]
fn module_path_matches_whole_segments() {
    let prog = fixture();
    let graph = TypeGraph::build(&prog);
    assert!(find_errors(&prog, &graph, "example.com/ap").is_empty());
    assert_eq!(find_errors(&prog, &graph, "example.com").len(), 2);
}

#[test]
fn interface_errors_follow_dependency_interfaces() {
    let prog = fixture();
    let graph = TypeGraph::build(&prog);
    let errors = find_errors(&prog, &graph, MODULE);
    let svc = app_type(&prog, "Svc");
    let found = find_iface_errors(&prog, &graph, &[svc], &errors);

    let methods = found
        .get("example.com/app.Svc")
        .unwrap_or_else(|| panic!("Svc missing: {found:?}"));
    let create: Vec<_> = methods["Create"].iter().map(|e| e.name.as_str()).collect();
    assert_eq!(create, vec!["ErrUnauthorized", "ErrConflict"]);
    assert_eq!(methods["Create"][0].code(), Some(-32001));
    assert!(methods["Delete"].is_empty());
}

#[test]
fn non_interfaces_are_ignored() {
    let prog = fixture();
    let graph = TypeGraph::build(&prog);
    let errors = find_errors(&prog, &graph, MODULE);
    let svc = app_type(&prog, "svc");
    assert!(find_iface_errors(&prog, &graph, &[svc], &errors).is_empty());
}

const DISCARDED: &str = "package app

import \"context\"

type ErrAudit struct{}

func (*ErrAudit) Error() string { return \"audit\" }

func (*ErrAudit) ErrorCode() int { return 1 }

type ErrInvalid struct{}

func (*ErrInvalid) Error() string { return \"invalid\" }

func (*ErrInvalid) ErrorCode() int { return 2 }

func audit(name string) error {
	return &ErrAudit{}
}

func invalid() error {
	return &ErrInvalid{}
}

type Svc interface {
	Create(ctx context.Context, name string) (int, error)
	Check(ctx context.Context, name string) error
}

type svc struct{}

func (s *svc) Create(ctx context.Context, name string) (int, error) {
	_ = audit(name)
	return 1, nil
}

func (s *svc) Check(ctx context.Context, name string) error {
	audit(name)
	if name == \"\" {
		return invalid()
	}
	return nil
}
";

#[test]
fn only_returned_calls_contribute_errors() {
    let prog = load_app(DISCARDED);
    let graph = TypeGraph::build(&prog);
    let errors = find_errors(&prog, &graph, MODULE);
    assert_eq!(errors.len(), 2);
    let svc = app_type(&prog, "Svc");
    let found = find_iface_errors(&prog, &graph, &[svc], &errors);
    let methods = &found["example.com/app.Svc"];

    assert!(methods["Create"].is_empty(), "Create: {:?}", methods["Create"]);
    let check: Vec<_> = methods["Check"].iter().map(|e| e.name.as_str()).collect();
    assert_eq!(check, vec!["ErrInvalid"]);
}
