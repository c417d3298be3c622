use super::*;
use crate::Name;

fn basic(kind: BasicKind) -> IrType {
    IrType::Basic(Basic {
        name: kind.go_name().to_string(),
        kind,
        is_pointer: false,
    })
}

#[test]
fn basic_predicates() {
    let int64 = Basic {
        name: "int64".into(),
        kind: BasicKind::Int64,
        is_pointer: false,
    };
    assert!(int64.is_any_int());
    assert!(int64.is_numeric());
    assert!(!int64.is_any_uint());
    assert_eq!(int64.bit_size(), 64);

    let byte = Basic {
        name: "byte".into(),
        kind: BasicKind::Byte,
        is_pointer: false,
    };
    assert!(byte.is_byte());
    assert!(byte.is_any_uint());
    assert_eq!(byte.bit_size(), 8);

    let s = Basic {
        name: "string".into(),
        kind: BasicKind::String,
        is_pointer: false,
    };
    assert!(s.is_string());
    assert!(!s.is_numeric());
    assert_eq!(s.bit_size(), 0);
}

#[test]
fn arena_supports_self_reference() {
    let mut arena = IrArena::new();
    let named = arena.alloc(basic(BasicKind::Bool));
    let slice = arena.alloc(IrType::Slice(SliceType {
        value: named,
        is_pointer: true,
    }));
    let st = arena.alloc(IrType::Struct(Struct {
        fields: vec![Field {
            var: Var {
                name: Name::new("Children"),
                embedded: false,
                exported: true,
                is_field: true,
                is_variadic: false,
                is_context: false,
                ty: slice,
                comment: String::new(),
                zero: "nil".into(),
            },
            tags: TagSet::default(),
        }],
        is_pointer: false,
    }));
    arena.replace(
        named,
        IrType::Named(Named {
            obj_id: "example.com/app.Node".into(),
            name: Name::new("Node"),
            pkg: None,
            ty: st,
            methods: vec![],
            is_pointer: false,
        }),
    );

    assert_eq!(arena.named(named).map(|n| n.obj_id.as_str()), Some("example.com/app.Node"));
    let IrType::Struct(s) = arena.underlying(named) else {
        panic!("expected struct");
    };
    let IrType::Slice(sl) = arena.get(s.fields[0].var.ty) else {
        panic!("expected slice");
    };
    assert_eq!(sl.value, named);
}

#[test]
fn foreign_handles_are_not_named() {
    let mut arena = IrArena::new();
    let id = arena.alloc(basic(BasicKind::Int));
    assert!(arena.try_get(id).is_some());
    assert!(arena.named(id).is_none());
    assert!(arena.try_get(IrId::from_raw(42)).is_none());
    assert!(arena.named(IrId::from_raw(42)).is_none());
}

#[test]
fn params_without_context_skips_leading_ctx() {
    let mut arena = IrArena::new();
    let ty = arena.alloc(basic(BasicKind::Int));
    let var = |name: &str, is_context: bool| Var {
        name: Name::new(name),
        embedded: false,
        exported: false,
        is_field: false,
        is_variadic: false,
        is_context,
        ty,
        comment: String::new(),
        zero: "0".into(),
    };
    let sig = Sign {
        params: vec![var("ctx", true), var("id", false)],
        ..Sign::default()
    };
    assert!(sig.has_context());
    assert_eq!(sig.params_without_context().len(), 1);
    assert_eq!(sig.params_without_context()[0].name.origin, "id");
}
