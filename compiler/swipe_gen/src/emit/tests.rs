use pretty_assertions::assert_eq;
use swipe_ir::{
    Basic, BasicKind, IrArena, IrId, IrType, MapType, Name, Named, Package, Sign, SliceType,
    Struct, Var,
};

use super::{quote, signature_params, signature_results, type_string, zero_value, CodeWriter};
use crate::importer::Importer;

#[test]
fn writer_indents_with_tabs() {
    let mut w = CodeWriter::new();
    w.block("func f()", "}", |w| {
        w.block("if ok", "}", |w| w.line("return"));
    });
    assert_eq!(w.finish(), "func f() {\n\tif ok {\n\t\treturn\n\t}\n}\n");
}

#[test]
fn literals_and_argument_groups_open_without_a_space() {
    let mut w = CodeWriter::new();
    w.literal("codecs := jsonrpc.EndpointCodecMap", "}", |w| {
        w.literal("\"svc.get\": jsonrpc.EndpointCodec", "},", |w| w.line("Endpoint: ep,"));
    });
    w.group("c.get = kithttp.NewClient(", ").Endpoint()", |w| w.line("u,"));
    assert_eq!(
        w.finish(),
        "codecs := jsonrpc.EndpointCodecMap{\n\t\"svc.get\": jsonrpc.EndpointCodec{\n\t\tEndpoint: ep,\n\t},\n}\nc.get = kithttp.NewClient(\n\tu,\n).Endpoint()\n"
    );
}

#[test]
fn writer_macro_splits_embedded_newlines() {
    let mut w = CodeWriter::new();
    w.indent();
    crate::w!(w, "a := {}\nb := {}", 1, 2);
    w.dedent();
    crate::w!(w);
    assert_eq!(w.finish(), "\ta := 1\n\tb := 2\n");
}

#[test]
fn quotes_go_strings() {
    assert_eq!(quote("a \"b\"\n"), "\"a \\\"b\\\"\\n\"");
}

fn basic(arena: &mut IrArena, kind: BasicKind, is_pointer: bool) -> IrId {
    arena.alloc(IrType::Basic(Basic {
        name: kind.go_name().to_string(),
        kind,
        is_pointer,
    }))
}

fn pkg(name: &str, path: &str) -> Option<Package> {
    Some(Package {
        name: name.into(),
        path: path.into(),
        module: None,
    })
}

fn var(name: &str, ty: IrId) -> Var {
    Var {
        name: Name::new(name),
        embedded: false,
        exported: false,
        is_field: false,
        is_variadic: false,
        is_context: false,
        ty,
        comment: String::new(),
        zero: String::new(),
    }
}

fn named(arena: &mut IrArena, package: Option<Package>, name: &str, ty: IrId, ptr: bool) -> IrId {
    let obj_id = match &package {
        Some(p) => format!("{}.{name}", p.path),
        None => name.to_string(),
    };
    arena.alloc(IrType::Named(Named {
        obj_id,
        name: Name::new(name),
        pkg: package,
        ty,
        methods: Vec::new(),
        is_pointer: ptr,
    }))
}

#[test]
fn prints_types_with_qualifiers() {
    let mut arena = IrArena::new();
    let int = basic(&mut arena, BasicKind::Int, false);
    let string = basic(&mut arena, BasicKind::String, false);
    let body = arena.alloc(IrType::Struct(Struct::default()));
    let user = named(&mut arena, pkg("model", "example.com/app/model"), "User", body, true);
    let local = named(&mut arena, pkg("app", "example.com/app"), "Local", body, false);
    let users = arena.alloc(IrType::Slice(SliceType {
        value: user,
        is_pointer: false,
    }));
    let index = arena.alloc(IrType::Map(MapType {
        key: string,
        value: users,
        is_pointer: false,
    }));

    let mut importer = Importer::new("example.com/app");
    assert_eq!(type_string(&arena, &mut importer, index), "map[string][]*model.User");
    assert_eq!(type_string(&arena, &mut importer, local), "Local");
    assert_eq!(type_string(&arena, &mut importer, int), "int");
    assert_eq!(
        importer.sorted_import_lines(),
        vec!["\"example.com/app/model\"".to_string()]
    );
}

#[test]
fn prints_signatures() {
    let mut arena = IrArena::new();
    let int = basic(&mut arena, BasicKind::Int, false);
    let iface = arena.alloc(IrType::Iface(swipe_ir::Iface::default()));
    let error = named(&mut arena, None, "error", iface, false);
    let ctx = named(&mut arena, pkg("context", "context"), "Context", iface, false);
    let ints = arena.alloc(IrType::Slice(SliceType {
        value: int,
        is_pointer: false,
    }));
    let sig = Sign {
        params: vec![var("ctx", ctx), var("ids", ints)],
        results: vec![var("n", int), var("err", error)],
        recv: None,
        is_variadic: true,
        is_named: true,
    };
    let sign = arena.alloc(IrType::Sign(sig.clone()));

    let mut importer = Importer::new("example.com/app");
    assert_eq!(
        signature_params(&arena, &mut importer, &sig.params, sig.is_variadic),
        "ctx context.Context, ids ...int"
    );
    assert_eq!(
        signature_results(&arena, &mut importer, &sig.results, false),
        "(int, error)"
    );
    assert_eq!(
        signature_results(&arena, &mut importer, &sig.results[1..], false),
        "error"
    );
    assert_eq!(
        type_string(&arena, &mut importer, sign),
        "func(ctx context.Context, ids ...int) (n int, err error)"
    );
}

#[test]
fn zero_values_follow_the_underlying_type() {
    let mut arena = IrArena::new();
    let int = basic(&mut arena, BasicKind::Int, false);
    let int_ptr = basic(&mut arena, BasicKind::Int, true);
    let string = basic(&mut arena, BasicKind::String, false);
    let body = arena.alloc(IrType::Struct(Struct::default()));
    let user = named(&mut arena, pkg("model", "example.com/app/model"), "User", body, false);
    let status = named(&mut arena, pkg("model", "example.com/app/model"), "Status", int, false);

    let mut importer = Importer::new("example.com/app");
    assert_eq!(zero_value(&arena, &mut importer, int), "0");
    assert_eq!(zero_value(&arena, &mut importer, int_ptr), "nil");
    assert_eq!(zero_value(&arena, &mut importer, string), "\"\"");
    assert_eq!(zero_value(&arena, &mut importer, user), "model.User{}");
    assert_eq!(zero_value(&arena, &mut importer, status), "0");
}
