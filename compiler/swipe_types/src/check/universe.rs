//! Predeclared identifiers and the `unsafe` pseudo-package.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::object::{Builtin, FuncKind, ObjKind, Object, ResolveState, ScopeId};
use crate::program::{Package, PkgId, Program};
use crate::{BasicKind, ConstValue, IfaceMethod, InterfaceType, NamedType, Param, TypeData, TypeId};

const BASIC_NAMES: [BasicKind; 19] = [
    BasicKind::Bool,
    BasicKind::Int,
    BasicKind::Int8,
    BasicKind::Int16,
    BasicKind::Int32,
    BasicKind::Int64,
    BasicKind::Uint,
    BasicKind::Uint8,
    BasicKind::Uint16,
    BasicKind::Uint32,
    BasicKind::Uint64,
    BasicKind::Uintptr,
    BasicKind::Float32,
    BasicKind::Float64,
    BasicKind::Complex64,
    BasicKind::Complex128,
    BasicKind::String,
    BasicKind::Byte,
    BasicKind::Rune,
];

fn predeclared(name: &str, kind: ObjKind, ty: TypeId) -> Object {
    Object {
        name: name.to_string(),
        kind,
        ty,
        pkg: None,
        decl: None,
        pos: None,
        state: ResolveState::Resolved,
    }
}

fn declare(prog: &mut Program, scope: ScopeId, object: Object) {
    let name = object.name.clone();
    let id = prog.alloc_object(object);
    prog.declare(scope, &name, id);
}

pub(crate) fn populate(prog: &mut Program) {
    let universe = ScopeId::UNIVERSE;
    for kind in BASIC_NAMES {
        declare(
            prog,
            universe,
            predeclared(kind.name(), ObjKind::TypeName { alias: false }, TypeId::basic(kind)),
        );
    }

    let empty = prog.pool.fresh(TypeData::Interface(InterfaceType::default()));
    declare(prog, universe, predeclared("any", ObjKind::TypeName { alias: true }, empty));

    let comparable = prog.pool.fresh(TypeData::Interface(InterfaceType {
        constraint: true,
        ..InterfaceType::default()
    }));
    declare(
        prog,
        universe,
        predeclared("comparable", ObjKind::TypeName { alias: false }, comparable),
    );

    declare_error(prog);

    for (name, value) in [("true", true), ("false", false)] {
        declare(
            prog,
            universe,
            predeclared(
                name,
                ObjKind::Const(Some(ConstValue::Bool(value))),
                TypeId::basic(BasicKind::UntypedBool),
            ),
        );
    }
    declare(
        prog,
        universe,
        predeclared("iota", ObjKind::Const(None), TypeId::basic(BasicKind::UntypedInt)),
    );
    declare(
        prog,
        universe,
        predeclared("nil", ObjKind::Nil, TypeId::basic(BasicKind::UntypedNil)),
    );
    for (name, builtin) in Builtin::ALL {
        declare(prog, universe, predeclared(name, ObjKind::Builtin(builtin), TypeId::INVALID));
    }

    declare_unsafe(prog);
}

/// `type error interface { Error() string }`.
fn declare_error(prog: &mut Program) {
    let obj = prog.alloc_object(predeclared(
        "error",
        ObjKind::TypeName { alias: false },
        TypeId::INVALID,
    ));
    let named = prog.pool.fresh(TypeData::Named(NamedType {
        obj,
        underlying: TypeId::INVALID,
        methods: Vec::new(),
    }));
    prog.object_mut(obj).ty = named;
    prog.declare(ScopeId::UNIVERSE, "error", obj);

    let iface = prog.pool.fresh(TypeData::Interface(InterfaceType::default()));
    let sig = prog.pool.func_type(
        Vec::new(),
        vec![Param {
            name: String::new(),
            ty: TypeId::basic(BasicKind::String),
        }],
        false,
    );
    let method = prog.alloc_object(predeclared(
        "Error",
        ObjKind::Func(FuncKind::Interface { iface }),
        sig,
    ));
    let methods = vec![IfaceMethod {
        name: "Error".to_string(),
        sig,
        obj: method,
    }];
    if let Some(data) = prog.pool.interface_mut(iface) {
        data.explicit.clone_from(&methods);
        data.all = methods;
    }
    if let Some(data) = prog.pool.named_mut(named) {
        data.underlying = iface;
    }
}

fn declare_unsafe(prog: &mut Program) {
    let id = PkgId(u32::try_from(prog.packages.len()).unwrap_or(u32::MAX));
    let scope = prog.new_scope(Some(ScopeId::UNIVERSE));
    prog.packages.push(Package {
        id,
        path: "unsafe".to_string(),
        name: "unsafe".to_string(),
        dir: PathBuf::new(),
        module: None,
        files: Vec::new(),
        imports: Vec::new(),
        import_map: BTreeMap::new(),
        root: false,
        standard: true,
        errors: Vec::new(),
        scope,
        sources: Vec::new(),
        collected: true,
    });
    prog.by_path.insert("unsafe".to_string(), id);
    let mut pointer = predeclared(
        "Pointer",
        ObjKind::TypeName { alias: false },
        TypeId::basic(BasicKind::UnsafePointer),
    );
    pointer.pkg = Some(id);
    declare(prog, scope, pointer);
}
