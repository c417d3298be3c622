//! The normalized type model consumed by generators.
//!
//! Every node lives in an [`IrArena`] and is addressed by [`IrId`]. A
//! pointer is not a separate node: the pointee's node is duplicated with
//! `is_pointer = true` (the normalizer keys pointer and non-pointer forms
//! separately), which is what generators want when printing `*T`.
//!
//! # Layout
//!
//! ```text
//! IrArena
//!   ├── Named { obj_id, pkg, ty ──► Struct { fields: [Field { var, tags }] } }
//!   ├── Named { ty ──► Iface { methods: [Func { sig: Sign }] } }
//!   └── Basic / Map / Slice / Array / Sign
//! ```

use std::path::PathBuf;

use crate::{Name, TagSet};

/// Index of a node in the [`IrArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct IrId(u32);

impl IrId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        IrId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

// ─── Basic ──────────────────────────────────────────────────────────────

/// Closed set of predeclared scalar kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Byte,
    Rune,
    UnsafePointer,
}

impl BasicKind {
    pub fn go_name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
            BasicKind::UnsafePointer => "unsafe.Pointer",
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Basic {
    pub name: String,
    pub kind: BasicKind,
    pub is_pointer: bool,
}

impl Basic {
    pub fn is_string(&self) -> bool {
        self.kind == BasicKind::String
    }

    pub fn is_bool(&self) -> bool {
        self.kind == BasicKind::Bool
    }

    pub fn is_byte(&self) -> bool {
        matches!(self.kind, BasicKind::Byte | BasicKind::Uint8)
    }

    pub fn is_any_int(&self) -> bool {
        matches!(
            self.kind,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Rune
        )
    }

    pub fn is_any_uint(&self) -> bool {
        matches!(
            self.kind,
            BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
                | BasicKind::Byte
        )
    }

    pub fn is_any_float(&self) -> bool {
        matches!(self.kind, BasicKind::Float32 | BasicKind::Float64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_any_int()
            || self.is_any_uint()
            || self.is_any_float()
            || matches!(self.kind, BasicKind::Complex64 | BasicKind::Complex128)
    }

    /// Width in bits; `0` for kinds without a fixed width (`string`, `bool`).
    /// `int`/`uint` report 64 (the generator targets 64-bit platforms).
    pub fn bit_size(&self) -> u32 {
        match self.kind {
            BasicKind::Int8 | BasicKind::Uint8 | BasicKind::Byte => 8,
            BasicKind::Int16 | BasicKind::Uint16 => 16,
            BasicKind::Int32 | BasicKind::Uint32 | BasicKind::Float32 | BasicKind::Rune => 32,
            BasicKind::Int
            | BasicKind::Int64
            | BasicKind::Uint
            | BasicKind::Uint64
            | BasicKind::Uintptr
            | BasicKind::Float64
            | BasicKind::Complex64
            | BasicKind::UnsafePointer => 64,
            BasicKind::Complex128 => 128,
            BasicKind::Bool | BasicKind::String => 0,
        }
    }
}

// ─── Packages ───────────────────────────────────────────────────────────

/// A Go module as seen from the invocation site.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Module {
    /// Last path segment of the module path.
    pub id: String,
    pub version: String,
    pub path: String,
    pub dir: PathBuf,
    /// Set iff the module path differs from the invocation module.
    pub external: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Package {
    pub name: String,
    pub path: String,
    pub module: Option<Module>,
}

// ─── Vars, signatures, funcs ────────────────────────────────────────────

/// A variable: parameter, result, or struct field.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Var {
    pub name: Name,
    pub embedded: bool,
    pub exported: bool,
    pub is_field: bool,
    pub is_variadic: bool,
    /// Declared type is the `Context` interface of package `context`.
    pub is_context: bool,
    pub ty: IrId,
    pub comment: String,
    /// Textual zero value of the underlying type (`0`, `""`, `nil`, `T{}`).
    pub zero: String,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Sign {
    pub params: Vec<Var>,
    pub results: Vec<Var>,
    /// Receiver type for methods of named types.
    pub recv: Option<IrId>,
    pub is_variadic: bool,
    /// Every result carried a source name.
    pub is_named: bool,
}

impl Sign {
    /// Parameters other than a leading `context.Context`.
    pub fn params_without_context(&self) -> &[Var] {
        match self.params.first() {
            Some(first) if first.is_context => &self.params[1..],
            _ => &self.params,
        }
    }

    pub fn has_context(&self) -> bool {
        self.params.first().is_some_and(|p| p.is_context)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Func {
    pub pkg: Option<Package>,
    /// `pkg/path.Recv.Name` or `pkg/path.Name`.
    pub full_name: String,
    pub name: Name,
    pub exported: bool,
    pub sig: Sign,
    pub comment: Vec<String>,
}

// ─── Composite nodes ────────────────────────────────────────────────────

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Named {
    /// Globally unique identity: package path + `.` + name.
    pub obj_id: String,
    pub name: Name,
    pub pkg: Option<Package>,
    /// Underlying type.
    pub ty: IrId,
    pub methods: Vec<Func>,
    pub is_pointer: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Field {
    pub var: Var,
    pub tags: TagSet,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Struct {
    pub fields: Vec<Field>,
    pub is_pointer: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Iface {
    /// Own and embedded methods.
    pub methods: Vec<Func>,
    pub embeddeds: Vec<IrId>,
    /// Own methods only.
    pub explicit_methods: Vec<Func>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MapType {
    pub key: IrId,
    pub value: IrId,
    pub is_pointer: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct SliceType {
    pub value: IrId,
    pub is_pointer: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ArrayType {
    pub value: IrId,
    pub len: u64,
    pub is_pointer: bool,
}

/// Closed sum over every form a host type can take.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum IrType {
    Basic(Basic),
    Named(Named),
    Struct(Struct),
    Iface(Iface),
    Sign(Sign),
    Map(MapType),
    Slice(SliceType),
    Array(ArrayType),
}

impl IrType {
    pub fn is_pointer(&self) -> bool {
        match self {
            IrType::Basic(b) => b.is_pointer,
            IrType::Named(n) => n.is_pointer,
            IrType::Struct(s) => s.is_pointer,
            IrType::Map(m) => m.is_pointer,
            IrType::Slice(s) => s.is_pointer,
            IrType::Array(a) => a.is_pointer,
            IrType::Iface(_) | IrType::Sign(_) => false,
        }
    }

    pub fn as_named(&self) -> Option<&Named> {
        match self {
            IrType::Named(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_basic(&self) -> Option<&Basic> {
        match self {
            IrType::Basic(b) => Some(b),
            _ => None,
        }
    }
}

// ─── Arena ──────────────────────────────────────────────────────────────

/// Owner of every IR node.
#[derive(Clone, Debug, Default)]
pub struct IrArena {
    nodes: Vec<IrType>,
}

impl IrArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, ty: IrType) -> IrId {
        let id = IrId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(ty);
        id
    }

    /// Replace a placeholder node allocated for a type under construction.
    ///
    /// Only the normalizer calls this, while it is still filling in a
    /// recursive type.
    pub fn replace(&mut self, id: IrId, ty: IrType) {
        self.nodes[id.index()] = ty;
    }

    /// Node `id`. Handles handed out by this arena are always valid.
    #[inline]
    pub fn get(&self, id: IrId) -> &IrType {
        &self.nodes[id.index()]
    }

    /// Node `id`, or `None` for a handle this arena never allocated.
    #[inline]
    pub fn try_get(&self, id: IrId) -> Option<&IrType> {
        self.nodes.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (IrId, &IrType)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, t)| (IrId(u32::try_from(i).unwrap_or(u32::MAX)), t))
    }

    pub fn named(&self, id: IrId) -> Option<&Named> {
        self.try_get(id).and_then(IrType::as_named)
    }

    /// Follow `Named` links to the first non-named node.
    pub fn underlying(&self, id: IrId) -> &IrType {
        let mut current = id;
        // Named chains are at most a few links; the bound guards against a
        // malformed arena.
        for _ in 0..64 {
            match self.get(current) {
                IrType::Named(n) => current = n.ty,
                other => return other,
            }
        }
        self.get(current)
    }

    /// Interface behind a named interface type.
    pub fn iface(&self, id: IrId) -> Option<&Iface> {
        match self.underlying(id) {
            IrType::Iface(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_error(&self, id: IrId) -> bool {
        matches!(self.get(id), IrType::Named(n) if n.obj_id == "error")
    }

    pub fn is_context(&self, id: IrId) -> bool {
        matches!(self.get(id), IrType::Named(n) if n.obj_id == "context.Context")
    }
}

#[cfg(test)]
mod tests;
