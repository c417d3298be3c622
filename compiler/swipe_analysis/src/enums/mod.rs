//! Enum extraction.
//!
//! Go has no enums; the idiom is a `const ( ... )` group typed with a named
//! integer or string type. The values come straight from the checker's
//! constant evaluation, so `iota` resets and skipped `_` lines behave
//! exactly as the compiler would have it.

use rustc_hash::FxHashMap;
use swipe_syntax::ast::{Decl, Spec};
use swipe_syntax::TokenKind;
use swipe_types::{DeclRef, ObjId, Program, TypeData, TypeId};

use crate::ids::object_id;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnumConst {
    Int(i64),
    String(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: EnumConst,
}

/// Enum members keyed by the identity of their named type.
#[derive(Clone, Debug, Default)]
pub struct EnumMap {
    enums: FxHashMap<String, Vec<EnumValue>>,
}

impl EnumMap {
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn build(prog: &Program) -> Self {
        let mut map = EnumMap::default();
        for pkg in prog.root_packages() {
            for &file in &pkg.files {
                let ast = &prog.file(file).ast;
                for (d, decl) in ast.decls.iter().enumerate() {
                    let Decl::Gen(gen) = decl else { continue };
                    if gen.tok != TokenKind::Const || !gen.grouped {
                        continue;
                    }
                    for (s, spec) in gen.specs.iter().enumerate() {
                        let Spec::Value(vs) = spec else { continue };
                        for (n, name) in vs.names.iter().enumerate() {
                            if name.is_blank() {
                                continue;
                            }
                            let decl = DeclRef::Spec {
                                file,
                                decl: d,
                                spec: s,
                                name: n,
                            };
                            if let Some(obj) = prog.object_of_decl(decl) {
                                map.add_const(prog, obj);
                            }
                        }
                    }
                }
            }
        }
        tracing::debug!(enums = map.enums.len(), "enums extracted");
        map
    }

    fn add_const(&mut self, prog: &Program, obj: ObjId) {
        let object = prog.object(obj);
        let Some(type_name) = enum_type(prog, object.ty) else {
            return;
        };
        let Some(constant) = object.const_value() else {
            return;
        };
        let value = if let Some(s) = constant.as_str() {
            EnumConst::String(s.to_string())
        } else if let Some(i) = constant.as_i64() {
            EnumConst::Int(i)
        } else {
            return;
        };
        self.enums.entry(type_name).or_default().push(EnumValue {
            name: object.name.clone(),
            value,
        });
    }

    /// Members of the enum named `obj_id`, in declaration order.
    pub fn get(&self, obj_id: &str) -> Option<&[EnumValue]> {
        self.enums.get(obj_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty()
    }
}

/// Identity of `ty` if it is a named integer or string type declared
/// outside the standard library.
fn enum_type(prog: &Program, ty: TypeId) -> Option<String> {
    let named = prog.pool().named(ty)?;
    let pkg = prog.object(named.obj).pkg?;
    if prog.package(pkg).standard {
        return None;
    }
    match prog.pool().underlying_data(ty) {
        TypeData::Basic(kind) if kind.is_integer() || kind.is_string() => {
            Some(object_id(prog, named.obj))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests;
