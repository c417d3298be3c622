//! Type normalizer: checker types to the closed IR.
//!
//! # Identity
//!
//! Named and basic types are memoized in a visited map keyed by
//! `[*]<obj_id>`, so every visit of `example.com/app.User` yields the same
//! [`IrId`] and the pointer form `*User` gets a node of its own. A named
//! type is registered with a placeholder before its underlying type is
//! normalized; a field of type `*User` inside `User` finds the key and
//! stops there, which is what makes cyclic types terminate.
//!
//! # Standard library
//!
//! Named types declared in the standard library are normalized opaquely:
//! identity, package and the kind of the underlying type (basic types are
//! kept, interfaces become empty interfaces, everything else an empty
//! struct). Generators only print their names, and their full method sets
//! mention types (channels, unsafe pointers) the IR does not model.

mod zero;

use rustc_hash::FxHashMap;
use swipe_diagnostic::Diagnostic;
use swipe_ir::{
    ensure_sufficient_stack, ArrayType, Basic, Field, Func, Iface, IrArena, IrId, IrType,
    MapType, Module, Name, Named, Package, Sign, SliceType, Struct, TagSet, Var,
};
use swipe_types::{
    BasicKind, IfaceMethod, InterfaceType, ObjId, PkgId, Program, Signature, StructField,
    TypeData, TypeId,
};

use crate::comments::CommentIndex;
use crate::ids::{func_id, method_id, object_id};

pub use zero::zero_value;

/// Memo state of a normalization session.
#[derive(Clone, Debug, Default)]
pub struct Visited {
    ids: FxHashMap<String, IrId>,
    /// Checker type behind each named node.
    origins: FxHashMap<IrId, TypeId>,
}

impl Visited {
    pub fn get(&self, key: &str) -> Option<IrId> {
        self.ids.get(key).copied()
    }

    /// Checker type a named IR node was produced from.
    pub fn origin(&self, id: IrId) -> Option<TypeId> {
        self.origins.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Borrowing view over the pieces a normalization needs.
pub struct Normalizer<'a> {
    prog: &'a Program,
    comments: &'a CommentIndex,
    arena: &'a mut IrArena,
    visited: &'a mut Visited,
}

impl<'a> Normalizer<'a> {
    pub fn new(
        prog: &'a Program,
        comments: &'a CommentIndex,
        arena: &'a mut IrArena,
        visited: &'a mut Visited,
    ) -> Self {
        Normalizer {
            prog,
            comments,
            arena,
            visited,
        }
    }

    pub fn program(&self) -> &'a Program {
        self.prog
    }

    pub fn arena(&self) -> &IrArena {
        self.arena
    }

    /// Normalize `ty`, reusing every node built before.
    pub fn normalize(&mut self, ty: TypeId) -> Result<IrId, Diagnostic> {
        self.ty(ty, false)
    }

    fn ty(&mut self, ty: TypeId, is_pointer: bool) -> Result<IrId, Diagnostic> {
        ensure_sufficient_stack(|| self.ty_inner(ty, is_pointer))
    }

    fn ty_inner(&mut self, ty: TypeId, is_pointer: bool) -> Result<IrId, Diagnostic> {
        let prog = self.prog;
        match prog.pool().get(ty) {
            TypeData::Basic(kind) => self.basic(*kind, is_pointer, ty),
            // `**T` collapses to `*T`; no generator distinguishes them.
            TypeData::Pointer(elem) => self.ty(*elem, true),
            TypeData::Named(_) => self.named(ty, is_pointer),
            TypeData::Struct(fields) => {
                let s = self.struct_fields(None, fields, is_pointer)?;
                Ok(self.arena.alloc(IrType::Struct(s)))
            }
            TypeData::Interface(iface) => {
                let i = self.iface(None, iface)?;
                Ok(self.arena.alloc(IrType::Iface(i)))
            }
            TypeData::Signature(sig) => {
                let s = self.sign(sig, None)?;
                Ok(self.arena.alloc(IrType::Sign(s)))
            }
            TypeData::Map { key, value } => {
                let key = self.ty(*key, false)?;
                let value = self.ty(*value, false)?;
                Ok(self.arena.alloc(IrType::Map(MapType {
                    key,
                    value,
                    is_pointer,
                })))
            }
            TypeData::Slice(elem) => {
                let value = self.ty(*elem, false)?;
                Ok(self.arena.alloc(IrType::Slice(SliceType { value, is_pointer })))
            }
            TypeData::Array { len, elem } => {
                let value = self.ty(*elem, false)?;
                Ok(self.arena.alloc(IrType::Array(ArrayType {
                    value,
                    len: *len,
                    is_pointer,
                })))
            }
            TypeData::Chan { .. } | TypeData::Tuple(_) | TypeData::TypeParam { .. } => Err(
                Diagnostic::decode(format!("unsupported type {}", prog.type_string(ty))),
            ),
        }
    }

    fn basic(
        &mut self,
        kind: BasicKind,
        is_pointer: bool,
        ty: TypeId,
    ) -> Result<IrId, Diagnostic> {
        let Some(ir_kind) = ir_basic_kind(kind.default_kind()) else {
            return Err(Diagnostic::decode(format!(
                "unsupported type {}",
                self.prog.type_string(ty)
            )));
        };
        let name = ir_kind.go_name();
        let key = visit_key(is_pointer, name);
        if let Some(id) = self.visited.get(&key) {
            return Ok(id);
        }
        let id = self.arena.alloc(IrType::Basic(Basic {
            name: name.to_string(),
            kind: ir_kind,
            is_pointer,
        }));
        self.visited.ids.insert(key, id);
        Ok(id)
    }

    fn named(&mut self, ty: TypeId, is_pointer: bool) -> Result<IrId, Diagnostic> {
        let prog = self.prog;
        let Some(named) = prog.pool().named(ty) else {
            return Err(Diagnostic::find(format!(
                "{} is not a named type",
                prog.type_string(ty)
            )));
        };
        let obj_id = object_id(prog, named.obj);
        let key = visit_key(is_pointer, &obj_id);
        if let Some(id) = self.visited.get(&key) {
            return Ok(id);
        }
        let id = self.arena.alloc(IrType::Struct(Struct::default()));
        self.visited.ids.insert(key, id);
        self.visited.origins.insert(id, ty);
        tracing::trace!(%obj_id, is_pointer, "normalizing named type");

        let object = prog.object(named.obj);
        let pkg = object.pkg.map(|p| self.package(p));
        let standard = object.pkg.is_some_and(|p| prog.package(p).standard);

        let (underlying, methods) = if standard {
            (self.opaque(named.underlying)?, Vec::new())
        } else {
            let underlying = match prog.pool().get(named.underlying) {
                TypeData::Struct(fields) => {
                    let s = self.struct_fields(Some(&obj_id), fields, false)?;
                    self.arena.alloc(IrType::Struct(s))
                }
                TypeData::Interface(iface) => {
                    let i = self.iface(Some((id, &obj_id)), iface)?;
                    self.arena.alloc(IrType::Iface(i))
                }
                _ => self.ty(named.underlying, false)?,
            };
            let mut methods = Vec::with_capacity(named.methods.len());
            for &method in &named.methods {
                methods.push(self.method(method, id)?);
            }
            (underlying, methods)
        };

        self.arena.replace(
            id,
            IrType::Named(Named {
                obj_id,
                name: Name::new(object.name.as_str()),
                pkg,
                ty: underlying,
                methods,
                is_pointer,
            }),
        );
        Ok(id)
    }

    fn opaque(&mut self, underlying: TypeId) -> Result<IrId, Diagnostic> {
        match self.prog.pool().get(underlying) {
            TypeData::Basic(_) => self.ty(underlying, false),
            TypeData::Interface(_) => Ok(self.arena.alloc(IrType::Iface(Iface::default()))),
            _ => Ok(self.arena.alloc(IrType::Struct(Struct::default()))),
        }
    }

    /// IR package of `pkg`, module info included.
    pub fn package(&self, pkg: PkgId) -> Package {
        let prog = self.prog;
        let pkg = prog.package(pkg);
        let main = prog.main_module();
        let module = pkg.module.as_ref().map(|m| Module {
            id: m.path.rsplit('/').next().unwrap_or(&m.path).to_string(),
            version: m.version.clone(),
            path: m.path.clone(),
            dir: m.dir.clone(),
            external: m.path != main.path,
        });
        Package {
            name: pkg.name.clone(),
            path: pkg.path.clone(),
            module,
        }
    }

    fn struct_fields(
        &mut self,
        owner: Option<&str>,
        fields: &[StructField],
        is_pointer: bool,
    ) -> Result<Struct, Diagnostic> {
        let mut out = Vec::with_capacity(fields.len());
        for field in fields {
            let comment = owner
                .map(|o| self.comments.field_comment(o, &field.name).to_string())
                .unwrap_or_default();
            let tags = match field.tag.as_deref() {
                Some(raw) => TagSet::parse(raw).unwrap_or_else(|err| {
                    tracing::warn!(field = %field.name, %err, "ignoring malformed struct tag");
                    TagSet::default()
                }),
                None => TagSet::default(),
            };
            let mut var = self.var(&field.name, field.ty, false)?;
            var.is_field = true;
            var.embedded = field.embedded;
            var.comment = comment;
            out.push(Field { var, tags });
        }
        Ok(Struct {
            fields: out,
            is_pointer,
        })
    }

    /// `owner` is the named interface and its identity, when there is one.
    fn iface(
        &mut self,
        owner: Option<(IrId, &str)>,
        iface: &InterfaceType,
    ) -> Result<Iface, Diagnostic> {
        let mut methods = Vec::with_capacity(iface.all.len());
        let mut explicit_methods = Vec::with_capacity(iface.explicit.len());
        for m in &iface.all {
            let full_name = self.iface_method_id(owner.map(|o| o.1), iface, m);
            let func = self.iface_method(m, owner.map(|o| o.0), full_name)?;
            if iface.explicit.iter().any(|e| e.name == m.name) {
                explicit_methods.push(func.clone());
            }
            methods.push(func);
        }
        let mut embeddeds = Vec::with_capacity(iface.embeddeds.len());
        for &embedded in &iface.embeddeds {
            embeddeds.push(self.ty(embedded, false)?);
        }
        Ok(Iface {
            methods,
            embeddeds,
            explicit_methods,
        })
    }

    /// Identity of interface method `m`, named after the interface that
    /// declares it; promoted methods keep their declaring interface.
    fn iface_method_id(
        &self,
        owner: Option<&str>,
        iface: &InterfaceType,
        m: &IfaceMethod,
    ) -> String {
        if iface.explicit.iter().any(|e| e.name == m.name) {
            return match owner {
                Some(owner) => format!("{owner}.{}", m.name),
                None => object_id(self.prog, m.obj),
            };
        }
        self.declaring_iface(iface, &m.name)
            .map_or_else(|| object_id(self.prog, m.obj), |decl| format!("{decl}.{}", m.name))
    }

    fn declaring_iface(&self, iface: &InterfaceType, method: &str) -> Option<String> {
        let prog = self.prog;
        for &embedded in &iface.embeddeds {
            let Some(inner) = prog.pool().interface(embedded) else {
                continue;
            };
            if inner.explicit.iter().any(|e| e.name == method) {
                return prog.pool().named(embedded).map(|n| object_id(prog, n.obj));
            }
            if let Some(found) = self.declaring_iface(inner, method) {
                return Some(found);
            }
        }
        None
    }

    fn iface_method(
        &mut self,
        m: &IfaceMethod,
        recv: Option<IrId>,
        full_name: String,
    ) -> Result<Func, Diagnostic> {
        let prog = self.prog;
        let Some(sig) = prog.pool().signature(m.sig) else {
            return Err(Diagnostic::find(format!("method {} has no signature", m.name)));
        };
        let pkg = prog.object(m.obj).pkg.map(|p| self.package(p));
        let comment = self.comments.func_comment(&full_name).to_vec();
        Ok(Func {
            pkg,
            name: Name::new(m.name.as_str()),
            exported: prog.object(m.obj).exported(),
            sig: self.sign(sig, recv)?,
            comment,
            full_name,
        })
    }

    fn method(&mut self, method: ObjId, recv: IrId) -> Result<Func, Diagnostic> {
        let prog = self.prog;
        let object = prog.object(method);
        let Some(sig) = prog.pool().signature(object.ty) else {
            return Err(Diagnostic::find(format!(
                "method {} has no signature",
                object.name
            )));
        };
        let full_name = func_id(prog, method);
        Ok(Func {
            pkg: object.pkg.map(|p| self.package(p)),
            name: Name::new(object.name.as_str()),
            exported: object.exported(),
            sig: self.sign(sig, Some(recv))?,
            comment: self.comments.func_comment(&full_name).to_vec(),
            full_name,
        })
    }

    /// Normalize a plain function object.
    pub fn func(&mut self, func: ObjId) -> Result<Func, Diagnostic> {
        let prog = self.prog;
        let object = prog.object(func);
        let Some(sig) = prog.pool().signature(object.ty) else {
            return Err(Diagnostic::find(format!("{} is not a function", object.name)));
        };
        let full_name = func_id(prog, func);
        Ok(Func {
            pkg: object.pkg.map(|p| self.package(p)),
            name: Name::new(object.name.as_str()),
            exported: object.exported(),
            sig: self.sign(sig, None)?,
            comment: self.comments.func_comment(&full_name).to_vec(),
            full_name,
        })
    }

    fn sign(&mut self, sig: &Signature, recv: Option<IrId>) -> Result<Sign, Diagnostic> {
        let last = sig.params.len().saturating_sub(1);
        let mut params = Vec::with_capacity(sig.params.len());
        for (i, p) in sig.params.iter().enumerate() {
            let name = if p.name.is_empty() || p.name == "_" {
                format!("p{}", i + 1)
            } else {
                p.name.clone()
            };
            params.push(self.var(&name, p.ty, sig.variadic && i == last)?);
        }
        let is_named = !sig.results.is_empty()
            && sig.results.iter().all(|r| !r.name.is_empty() && r.name != "_");
        let mut results = Vec::with_capacity(sig.results.len());
        for (i, r) in sig.results.iter().enumerate() {
            let name = if r.name.is_empty() || r.name == "_" {
                format!("r{}", i + 1)
            } else {
                r.name.clone()
            };
            results.push(self.var(&name, r.ty, false)?);
        }
        Ok(Sign {
            params,
            results,
            recv,
            is_variadic: sig.variadic,
            is_named,
        })
    }

    /// A variable of type `ty`; a variadic parameter has its slice type.
    fn var(&mut self, name: &str, ty: TypeId, variadic: bool) -> Result<Var, Diagnostic> {
        let prog = self.prog;
        let is_context = is_context(prog, ty);
        let id = self.ty(ty, false)?;
        Ok(Var {
            name: Name::new(name),
            embedded: false,
            exported: name.chars().next().is_some_and(char::is_uppercase),
            is_field: false,
            is_variadic: variadic,
            is_context,
            ty: id,
            comment: String::new(),
            zero: zero_value(prog, ty),
        })
    }
}

fn visit_key(is_pointer: bool, id: &str) -> String {
    if is_pointer {
        format!("*{id}")
    } else {
        id.to_string()
    }
}

/// Whether `ty` is `context.Context`.
pub fn is_context(prog: &Program, ty: TypeId) -> bool {
    prog.pool()
        .named(ty)
        .is_some_and(|n| prog.qualified_name(n.obj) == ("context", "Context"))
}

/// Identity of the method `name` declared on the named type `recv`.
pub fn method_identity(prog: &Program, recv: TypeId, name: &str) -> Option<String> {
    let named = prog.pool().named(recv)?;
    let (path, recv_name) = prog.qualified_name(named.obj);
    Some(method_id(path, recv_name, name))
}

fn ir_basic_kind(kind: BasicKind) -> Option<swipe_ir::BasicKind> {
    use swipe_ir::BasicKind as K;
    Some(match kind {
        BasicKind::Bool => K::Bool,
        BasicKind::Int => K::Int,
        BasicKind::Int8 => K::Int8,
        BasicKind::Int16 => K::Int16,
        BasicKind::Int32 => K::Int32,
        BasicKind::Int64 => K::Int64,
        BasicKind::Uint => K::Uint,
        BasicKind::Uint8 => K::Uint8,
        BasicKind::Uint16 => K::Uint16,
        BasicKind::Uint32 => K::Uint32,
        BasicKind::Uint64 => K::Uint64,
        BasicKind::Uintptr => K::Uintptr,
        BasicKind::Float32 => K::Float32,
        BasicKind::Float64 => K::Float64,
        BasicKind::Complex64 => K::Complex64,
        BasicKind::Complex128 => K::Complex128,
        BasicKind::String => K::String,
        BasicKind::UnsafePointer => K::UnsafePointer,
        BasicKind::Byte => K::Byte,
        BasicKind::Rune => K::Rune,
        BasicKind::Invalid
        | BasicKind::UntypedBool
        | BasicKind::UntypedInt
        | BasicKind::UntypedRune
        | BasicKind::UntypedFloat
        | BasicKind::UntypedString
        | BasicKind::UntypedNil => return None,
    })
}

#[cfg(test)]
mod tests;
