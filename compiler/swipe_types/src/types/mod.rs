//! Go types stored in a [`Pool`] and referenced by [`TypeId`].
//!
//! Predeclared basic types occupy fixed indices, so `TypeId::basic(kind)`
//! needs no pool access. Structural types (pointers, slices, maps,
//! channels, tuples, signatures, structs) are interned; named types and
//! interfaces are allocated fresh because they carry object identities.
//!
//! Identity in the Go sense is [`Pool::identical`]: index equality is
//! sufficient but not necessary (two signatures that differ only in
//! parameter names are distinct entries yet identical).

use rustc_hash::FxHashMap;

use crate::object::ObjId;

mod construct;
mod identity;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// Placeholder for anything that failed to resolve.
    pub const INVALID: TypeId = TypeId(0);

    #[inline]
    pub const fn basic(kind: BasicKind) -> TypeId {
        TypeId(kind as u32)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_invalid(self) -> bool {
        self == TypeId::INVALID
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Predeclared and untyped basic kinds. The discriminant is the fixed
/// [`TypeId`] index.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u32)]
pub enum BasicKind {
    Invalid,
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
    UnsafePointer,
    /// Alias of `uint8` that keeps its spelling.
    Byte,
    /// Alias of `int32` that keeps its spelling.
    Rune,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedString,
    UntypedNil,
}

impl BasicKind {
    pub const ALL: [BasicKind; 27] = [
        BasicKind::Invalid,
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
        BasicKind::UnsafePointer,
        BasicKind::Byte,
        BasicKind::Rune,
        BasicKind::UntypedBool,
        BasicKind::UntypedInt,
        BasicKind::UntypedRune,
        BasicKind::UntypedFloat,
        BasicKind::UntypedString,
        BasicKind::UntypedNil,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Invalid => "invalid type",
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
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::Byte => "byte",
            BasicKind::Rune => "rune",
            BasicKind::UntypedBool => "untyped bool",
            BasicKind::UntypedInt => "untyped int",
            BasicKind::UntypedRune => "untyped rune",
            BasicKind::UntypedFloat => "untyped float",
            BasicKind::UntypedString => "untyped string",
            BasicKind::UntypedNil => "untyped nil",
        }
    }

    /// Kind with aliases replaced by what they stand for.
    pub fn canonical(self) -> BasicKind {
        match self {
            BasicKind::Byte => BasicKind::Uint8,
            BasicKind::Rune => BasicKind::Int32,
            other => other,
        }
    }

    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            BasicKind::UntypedBool
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
                | BasicKind::UntypedFloat
                | BasicKind::UntypedString
                | BasicKind::UntypedNil
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self.canonical(),
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
                | BasicKind::UntypedInt
                | BasicKind::UntypedRune
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            BasicKind::Float32 | BasicKind::Float64 | BasicKind::UntypedFloat
        )
    }

    pub fn is_string(self) -> bool {
        matches!(self, BasicKind::String | BasicKind::UntypedString)
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, BasicKind::Bool | BasicKind::UntypedBool)
    }

    /// Type an untyped constant takes when nothing else constrains it.
    pub fn default_kind(self) -> BasicKind {
        match self {
            BasicKind::UntypedBool => BasicKind::Bool,
            BasicKind::UntypedInt => BasicKind::Int,
            BasicKind::UntypedRune => BasicKind::Rune,
            BasicKind::UntypedFloat => BasicKind::Float64,
            BasicKind::UntypedString => BasicKind::String,
            other => other,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StructField {
    pub name: String,
    pub ty: TypeId,
    pub embedded: bool,
    /// Raw tag text without quotes.
    pub tag: Option<String>,
}

impl StructField {
    pub fn exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: String,
    pub ty: TypeId,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Signature {
    pub params: Vec<Param>,
    pub results: Vec<Param>,
    /// The last parameter is `...T`; its type is stored as `[]T`.
    pub variadic: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct IfaceMethod {
    pub name: String,
    pub sig: TypeId,
    pub obj: ObjId,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct InterfaceType {
    pub explicit: Vec<IfaceMethod>,
    pub embeddeds: Vec<TypeId>,
    /// Explicit plus embedded methods, sorted by name. Filled when the
    /// interface is completed.
    pub all: Vec<IfaceMethod>,
    /// Has type-set terms (`~int | string`); not usable as a value type.
    pub constraint: bool,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct NamedType {
    pub obj: ObjId,
    pub underlying: TypeId,
    pub methods: Vec<ObjId>,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    Basic(BasicKind),
    Pointer(TypeId),
    Slice(TypeId),
    Array { len: u64, elem: TypeId },
    Map { key: TypeId, value: TypeId },
    Chan { dir: ChanDir, elem: TypeId },
    Struct(Vec<StructField>),
    Signature(Signature),
    Interface(InterfaceType),
    /// Multiple results of a call.
    Tuple(Vec<TypeId>),
    Named(NamedType),
    TypeParam { name: String, constraint: TypeId },
}

/// Storage for every type of a program.
#[derive(Clone, Debug)]
pub struct Pool {
    types: Vec<TypeData>,
    interned: FxHashMap<TypeData, TypeId>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    pub fn new() -> Self {
        let types = BasicKind::ALL.iter().map(|k| TypeData::Basic(*k)).collect();
        Pool {
            types,
            interned: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> &TypeData {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn next_id(&self) -> TypeId {
        TypeId(u32::try_from(self.types.len()).unwrap_or(u32::MAX))
    }

    /// Intern a structural type.
    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(id) = self.interned.get(&data) {
            return *id;
        }
        let id = self.next_id();
        self.types.push(data.clone());
        self.interned.insert(data, id);
        id
    }

    /// Allocate a type with its own identity.
    pub fn fresh(&mut self, data: TypeData) -> TypeId {
        let id = self.next_id();
        self.types.push(data);
        id
    }

    pub(crate) fn named_mut(&mut self, id: TypeId) -> Option<&mut NamedType> {
        match self.types.get_mut(id.index()) {
            Some(TypeData::Named(named)) => Some(named),
            _ => None,
        }
    }

    pub(crate) fn interface_mut(&mut self, id: TypeId) -> Option<&mut InterfaceType> {
        match self.types.get_mut(id.index()) {
            Some(TypeData::Interface(iface)) => Some(iface),
            _ => None,
        }
    }

    pub fn basic_kind(&self, id: TypeId) -> Option<BasicKind> {
        match self.get(id) {
            TypeData::Basic(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn named(&self, id: TypeId) -> Option<&NamedType> {
        match self.get(id) {
            TypeData::Named(named) => Some(named),
            _ => None,
        }
    }

    /// Follow named types to their underlying type.
    pub fn underlying(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..32 {
            match self.get(current) {
                TypeData::Named(named) => current = named.underlying,
                TypeData::TypeParam { constraint, .. } => current = *constraint,
                _ => return current,
            }
        }
        TypeId::INVALID
    }

    pub fn underlying_data(&self, id: TypeId) -> &TypeData {
        self.get(self.underlying(id))
    }

    pub fn signature(&self, id: TypeId) -> Option<&Signature> {
        match self.underlying_data(id) {
            TypeData::Signature(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn interface(&self, id: TypeId) -> Option<&InterfaceType> {
        match self.underlying_data(id) {
            TypeData::Interface(iface) => Some(iface),
            _ => None,
        }
    }

    pub fn is_interface(&self, id: TypeId) -> bool {
        self.interface(id).is_some()
    }

    pub fn is_named(&self, id: TypeId) -> bool {
        matches!(self.get(id), TypeData::Named(_))
    }

    /// Element of a pointer type.
    pub fn deref(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            TypeData::Pointer(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn is_untyped(&self, id: TypeId) -> bool {
        self.basic_kind(id).is_some_and(BasicKind::is_untyped)
    }

    /// Untyped constants become their default type; others are unchanged.
    pub fn default_type(&self, id: TypeId) -> TypeId {
        match self.basic_kind(id) {
            Some(kind) if kind.is_untyped() => TypeId::basic(kind.default_kind()),
            _ => id,
        }
    }
}

#[cfg(test)]
mod tests;
