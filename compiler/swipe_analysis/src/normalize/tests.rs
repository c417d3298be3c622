use pretty_assertions::assert_eq;
use swipe_diagnostic::ErrorKind;
use swipe_ir::{IrArena, IrId, IrType, Named};
use swipe_types::Program;

use super::{Normalizer, Visited};
use crate::comments::CommentIndex;
use crate::test_support::{app_type, load_app};

struct Fixture {
    prog: Program,
    comments: CommentIndex,
    arena: IrArena,
    visited: Visited,
}

impl Fixture {
    fn new(src: &str) -> Self {
        let prog = load_app(src);
        let comments = CommentIndex::build(&prog);
        Fixture {
            prog,
            comments,
            arena: IrArena::new(),
            visited: Visited::default(),
        }
    }

    fn normalize(&mut self, name: &str) -> IrId {
        let ty = app_type(&self.prog, name);
        Normalizer::new(&self.prog, &self.comments, &mut self.arena, &mut self.visited)
            .normalize(ty)
            .unwrap_or_else(|e| panic!("normalize {name}: {e}"))
    }

    fn named(&self, id: IrId) -> &Named {
        self.arena
            .named(id)
            .unwrap_or_else(|| panic!("{:?} is not named", self.arena.get(id)))
    }
}

#[test]
fn cyclic_struct_has_one_node() {
    let mut fx = Fixture::new(
        "package app

type Node struct {
	Value    int
	Next     *Node
	Children []Node
}
",
    );
    let node = fx.normalize("Node");
    assert_eq!(fx.normalize("Node"), node);

    let values: Vec<_> = fx
        .arena
        .iter()
        .filter_map(|(id, t)| match t {
            IrType::Named(n) if n.obj_id == "example.com/app.Node" && !n.is_pointer => Some(id),
            _ => None,
        })
        .collect();
    assert_eq!(values, vec![node]);

    let IrType::Struct(s) = fx.arena.underlying(node) else {
        panic!("Node is not a struct");
    };
    let next = fx.named(s.fields[1].var.ty);
    assert!(next.is_pointer);
    assert_eq!(next.obj_id, "example.com/app.Node");
    let IrType::Slice(children) = fx.arena.get(s.fields[2].var.ty) else {
        panic!("Children is not a slice");
    };
    assert_eq!(children.value, node);
    assert_eq!(s.fields[2].var.zero, "nil");
}

#[test]
fn signatures_name_results_and_detect_context() {
    let mut fx = Fixture::new(
        "package app

import \"context\"

type User struct{ ID int }

type Svc interface {
	Create(ctx context.Context, name string) (int, error)
	Find(ctx context.Context, id int) (user User, err error)
	List(ids ...int)
}
",
    );
    let svc = fx.normalize("Svc");
    let iface = fx
        .arena
        .iface(svc)
        .unwrap_or_else(|| panic!("Svc is not an interface"))
        .clone();
    let by_name = |name: &str| {
        iface
            .methods
            .iter()
            .find(|m| m.name.origin == name)
            .unwrap_or_else(|| panic!("{name} missing"))
            .clone()
    };

    let create = by_name("Create");
    assert_eq!(create.full_name, "example.com/app.Svc.Create");
    assert_eq!(create.sig.recv, Some(svc));
    assert!(create.sig.has_context());
    assert!(fx.arena.is_context(create.sig.params[0].ty));
    let results: Vec<_> = create.sig.results.iter().map(|r| r.name.origin.as_str()).collect();
    assert_eq!(results, vec!["r1", "r2"]);
    assert!(!create.sig.is_named);
    assert!(fx.arena.is_error(create.sig.results[1].ty));
    assert_eq!(create.sig.params_without_context().len(), 1);

    let find = by_name("Find");
    assert!(find.sig.is_named);
    assert_eq!(find.sig.results[0].name.origin, "user");
    assert_eq!(find.sig.results[0].zero, "User{}");

    let list = by_name("List");
    assert!(list.sig.is_variadic);
    assert!(list.sig.params[0].is_variadic);
    assert!(!list.sig.has_context());
    assert!(!list.sig.is_named);
    assert!(matches!(fx.arena.get(list.sig.params[0].ty), IrType::Slice(_)));
}

#[test]
fn struct_fields_carry_tags_comments_and_zero_values() {
    let mut fx = Fixture::new(
        "package app

type Inner struct{ A int }

type Config struct {
	Addr   string `env:\"ADDR,required,desc:Listen address, host:port\"` // listen address
	Port   int
	Debug  bool
	Nested Inner
	Tags   []string
	Ptr    *Inner
	Inner
}
",
    );
    let config = fx.normalize("Config");
    let IrType::Struct(s) = fx.arena.underlying(config).clone() else {
        panic!("Config is not a struct");
    };
    let zeros: Vec<_> = s.fields.iter().map(|f| f.var.zero.as_str()).collect();
    assert_eq!(zeros, vec!["\"\"", "0", "false", "Inner{}", "nil", "nil", "Inner{}"]);

    let addr = &s.fields[0];
    assert!(addr.var.is_field && addr.var.exported);
    assert_eq!(addr.var.comment, "listen address");
    let env = addr.tags.get("env").unwrap_or_else(|| panic!("env tag missing"));
    assert_eq!(env.name, "ADDR");
    assert!(env.has_option("required"));
    assert_eq!(env.option_value("desc"), Some("Listen address, host:port"));

    assert!(s.fields[6].var.embedded);
    let nested = fx.named(s.fields[3].var.ty);
    assert_eq!(nested.name.origin, "Inner");
    assert_eq!(s.fields[6].var.ty, s.fields[3].var.ty);

    let module = fx
        .named(config)
        .pkg
        .as_ref()
        .and_then(|p| p.module.clone())
        .unwrap_or_else(|| panic!("no module"));
    assert_eq!(module.path, "example.com/app");
    assert_eq!(module.id, "app");
    assert!(!module.external);
}

#[test]
fn embedded_interfaces_keep_their_declaring_names() {
    let mut fx = Fixture::new(
        "package app

type Reader interface {
	// Read reads.
	Read() error
}

type ReadWriter interface {
	Reader
	Write(b []byte) error
}
",
    );
    let rw = fx.normalize("ReadWriter");
    let iface = fx.arena.iface(rw).unwrap_or_else(|| panic!("not an interface"));
    let mut names: Vec<_> = iface.methods.iter().map(|m| m.full_name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec!["example.com/app.ReadWriter.Write", "example.com/app.Reader.Read"]
    );
    let explicit: Vec<_> = iface.explicit_methods.iter().map(|m| m.name.origin.as_str()).collect();
    assert_eq!(explicit, vec!["Write"]);
    let read = iface
        .methods
        .iter()
        .find(|m| m.name.origin == "Read")
        .unwrap_or_else(|| panic!("Read missing"));
    assert_eq!(read.comment, vec!["Read reads.".to_string()]);
    assert_eq!(iface.embeddeds.len(), 1);
    let embedded = iface.embeddeds[0];
    assert_eq!(fx.named(embedded).obj_id, "example.com/app.Reader");
}

#[test]
fn named_types_list_declared_methods() {
    let mut fx = Fixture::new(
        "package app

type svc struct{}

// Do does it.
func (s *svc) Do() error { return nil }
",
    );
    let id = fx.normalize("svc");
    let named = fx.named(id);
    assert_eq!(named.methods.len(), 1);
    let method = &named.methods[0];
    assert_eq!(method.full_name, "example.com/app.svc.Do");
    assert_eq!(method.sig.recv, Some(id));
    assert_eq!(method.comment, vec!["Do does it.".to_string()]);
    assert!(method.exported);
}

#[test]
fn standard_library_types_are_opaque() {
    let mut fx = Fixture::new(
        "package app

import \"context\"

type Req struct {
	Ctx context.Context
}
",
    );
    let req = fx.normalize("Req");
    let IrType::Struct(s) = fx.arena.underlying(req).clone() else {
        panic!("Req is not a struct");
    };
    let ctx = s.fields[0].var.ty;
    assert!(fx.arena.is_context(ctx));
    assert!(s.fields[0].var.is_context);
    let named = fx.named(ctx);
    assert!(named.methods.is_empty());
    assert_eq!(named.pkg.as_ref().map(|p| p.path.as_str()), Some("context"));
    assert_eq!(named.pkg.as_ref().and_then(|p| p.module.clone()), None);
}

#[test]
fn channels_are_rejected() {
    let mut fx = Fixture::new(
        "package app

type Events struct {
	C chan int
}
",
    );
    let ty = app_type(&fx.prog, "Events");
    let err = Normalizer::new(&fx.prog, &fx.comments, &mut fx.arena, &mut fx.visited)
        .normalize(ty)
        .err();
    assert_eq!(err.map(|e| e.kind), Some(ErrorKind::Decode));
}
