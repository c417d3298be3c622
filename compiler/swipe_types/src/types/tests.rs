use pretty_assertions::assert_eq;

use super::*;

fn param(ty: TypeId) -> Param {
    Param {
        name: String::new(),
        ty,
    }
}

#[test]
fn basic_ids_are_fixed() {
    let pool = Pool::new();
    for kind in BasicKind::ALL {
        assert_eq!(pool.get(TypeId::basic(kind)), &TypeData::Basic(kind));
    }
    assert!(TypeId::basic(BasicKind::Invalid).is_invalid());
}

#[test]
fn structural_types_are_interned() {
    let mut pool = Pool::new();
    let int = TypeId::basic(BasicKind::Int);
    let a = pool.slice(int);
    let b = pool.slice(int);
    assert_eq!(a, b);
    let m1 = pool.map(TypeId::basic(BasicKind::String), a);
    let m2 = pool.map(TypeId::basic(BasicKind::String), b);
    assert_eq!(m1, m2);
    assert_ne!(pool.pointer(int), pool.slice(int));
}

#[test]
fn fresh_types_have_their_own_identity() {
    let mut pool = Pool::new();
    let a = pool.fresh(TypeData::Interface(InterfaceType::default()));
    let b = pool.fresh(TypeData::Interface(InterfaceType::default()));
    assert_ne!(a, b);
    // Empty interfaces are still identical in the Go sense.
    assert!(pool.identical(a, b));
}

#[test]
fn byte_and_uint8_are_identical() {
    let pool = Pool::new();
    assert!(pool.identical(TypeId::basic(BasicKind::Byte), TypeId::basic(BasicKind::Uint8)));
    assert!(pool.identical(TypeId::basic(BasicKind::Rune), TypeId::basic(BasicKind::Int32)));
    assert!(!pool.identical(TypeId::basic(BasicKind::Int), TypeId::basic(BasicKind::Int64)));
    assert_eq!(
        pool.type_hash(TypeId::basic(BasicKind::Byte)),
        pool.type_hash(TypeId::basic(BasicKind::Uint8))
    );
}

#[test]
fn signatures_ignore_parameter_names() {
    let mut pool = Pool::new();
    let int = TypeId::basic(BasicKind::Int);
    let named = pool.func_type(
        vec![Param {
            name: "id".into(),
            ty: int,
        }],
        vec![param(TypeId::basic(BasicKind::String))],
        false,
    );
    let unnamed = pool.func_type(vec![param(int)], vec![param(TypeId::basic(BasicKind::String))], false);
    assert_ne!(named, unnamed);
    assert!(pool.identical(named, unnamed));
    assert_eq!(pool.type_hash(named), pool.type_hash(unnamed));

    let variadic = pool.func_type(vec![param(int)], vec![param(TypeId::basic(BasicKind::String))], true);
    assert!(!pool.identical(named, variadic));
}

#[test]
fn underlying_follows_named_chain() {
    let mut pool = Pool::new();
    let named = pool.fresh(TypeData::Named(NamedType {
        obj: ObjId::from_raw(0),
        underlying: TypeId::basic(BasicKind::String),
        methods: Vec::new(),
    }));
    assert_eq!(pool.underlying(named), TypeId::basic(BasicKind::String));
    assert!(pool.is_named(named));
    assert!(!pool.is_interface(named));
    assert_eq!(pool.deref(named), None);
    let ptr = pool.pointer(named);
    assert_eq!(pool.deref(ptr), Some(named));
}

#[test]
fn untyped_defaults() {
    let pool = Pool::new();
    let cases = [
        (BasicKind::UntypedInt, BasicKind::Int),
        (BasicKind::UntypedFloat, BasicKind::Float64),
        (BasicKind::UntypedRune, BasicKind::Rune),
        (BasicKind::UntypedString, BasicKind::String),
        (BasicKind::UntypedBool, BasicKind::Bool),
        (BasicKind::Int8, BasicKind::Int8),
    ];
    for (from, to) in cases {
        assert_eq!(pool.default_type(TypeId::basic(from)), TypeId::basic(to), "{from:?}");
    }
}
