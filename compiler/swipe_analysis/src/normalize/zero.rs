//! Textual zero values.

use swipe_types::{BasicKind, Program, TypeData, TypeId};

/// Go source of the zero value of `ty`: `0`, `""`, `false`, `nil`, or a
/// composite literal such as `Config{}`.
///
/// Named types are written unqualified; the config loader that consumes
/// these lives in the package declaring the type.
pub fn zero_value(prog: &Program, ty: TypeId) -> String {
    let pool = prog.pool();
    match pool.get(ty) {
        TypeData::Basic(kind) => {
            let kind = kind.default_kind();
            if kind.is_boolean() {
                "false".into()
            } else if kind.is_string() {
                "\"\"".into()
            } else if matches!(kind, BasicKind::UntypedNil | BasicKind::UnsafePointer) {
                "nil".into()
            } else {
                "0".into()
            }
        }
        TypeData::Named(named) => match pool.get(named.underlying) {
            TypeData::Struct(_) | TypeData::Array { .. } => {
                format!("{}{{}}", prog.object(named.obj).name)
            }
            _ => zero_value(prog, named.underlying),
        },
        TypeData::Struct(_) | TypeData::Array { .. } => format!("{}{{}}", prog.type_string(ty)),
        TypeData::Pointer(_)
        | TypeData::Slice(_)
        | TypeData::Map { .. }
        | TypeData::Chan { .. }
        | TypeData::Signature(_)
        | TypeData::Interface(_)
        | TypeData::Tuple(_) => "nil".into(),
        TypeData::TypeParam { name, .. } => format!("*new({name})"),
    }
}
